//! Feature emission.
//!
//! Downstream consumers take a flat attribute mapping plus an opaque
//! geometry handle — no schema negotiation, the field set is fixed here.
//! Geometry is whatever the upstream document carried, untouched.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::model::GeometryHandle;
use crate::reach::{Reach, ReachPoint, SideOfRiver};

/// Wraps an upstream GeoJSON value for pass-through.
pub fn build_geometry(geojson: Value) -> GeometryHandle {
    GeometryHandle(geojson)
}

/// One emitted feature: attributes plus optional geometry.
#[derive(Debug, Clone, Serialize)]
pub struct ReachFeature {
    pub attributes: Map<String, Value>,
    pub geometry: Option<Value>,
}

/// The reach as a line feature over its hydroline geometry.
pub fn line_feature(reach: &Reach) -> ReachFeature {
    let mut attributes = Map::new();
    let mut put = |key: &str, value: Value| {
        attributes.insert(key.to_string(), value);
    };

    put("reach_id", json!(reach.reach_id));
    put("river_name", json!(reach.river_name));
    put("section_name", json!(reach.section_name));
    put("name", json!(reach.name()));
    put("description", json!(reach.description));
    put("abstract", json!(reach.abstract_text));
    put("length_mi", json!(reach.length_mi));
    put("difficulty", json!(reach.difficulty));
    put("difficulty_minimum", json!(reach.difficulty_rating.minimum));
    put("difficulty_maximum", json!(reach.difficulty_rating.maximum));
    put("difficulty_outlier", json!(reach.difficulty_rating.outlier));
    put("gauge_id", json!(reach.gauge_id));
    put("gauge_units", json!(reach.gauge_units));
    put("gauge_metric", json!(reach.gauge_metric));
    put("gauge_observation", json!(reach.gauge_observation()));
    put("gauge_min", json!(reach.gauge_min()));
    put("gauge_max", json!(reach.gauge_max()));
    put("range_bias", json!(reach.range_bias().map(|b| b.to_string())));
    put("gauge_stage", json!(reach.gauge_stage().map(|s| s.to_string())));
    put("gauge_runnable", json!(reach.gauge_runnable()));
    put(
        "edited",
        json!(reach.edited.map(|e| e.format("%Y-%m-%d %H:%M:%S").to_string())),
    );
    put("error", json!(reach.error));
    put("notes", json!(reach.notes));

    ReachFeature {
        attributes,
        geometry: reach.geometry().map(|g| g.as_geojson().clone()),
    }
}

/// A reach point as a point feature.
pub fn point_feature(point: &ReachPoint) -> ReachFeature {
    let mut attributes = Map::new();
    let mut put = |key: &str, value: Value| {
        attributes.insert(key.to_string(), value);
    };

    put("reach_id", json!(point.reach_id));
    put("point_type", json!(point.point_type.to_string()));
    put("subtype", json!(point.subtype.map(|s| s.to_string())));
    put("name", json!(point.name));
    put(
        "side_of_river",
        json!(point.side_of_river.map(|s| match s {
            SideOfRiver::Left => "left",
            SideOfRiver::Right => "right",
        })),
    );
    put("update_date", json!(point.update_date));
    put("notes", json!(point.notes));
    put("description", json!(point.description));
    put("difficulty", json!(point.difficulty));

    ReachFeature {
        attributes,
        geometry: point.geometry.as_ref().map(|g| g.as_geojson().clone()),
    }
}

/// Point features for every point a reach owns, in collection order.
pub fn point_features(reach: &Reach) -> Vec<ReachFeature> {
    reach.reach_points().iter().map(point_feature).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
