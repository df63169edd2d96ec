//! Reach and reach point entities.
//!
//! `Reach::from_normalized` maps one raw detail document into the
//! normalized model: identity and naming, difficulty rating, access points,
//! and the eagerly-computed threshold/bias/stage tuple. The entity is owned
//! and mutated by exactly one caller; after construction the only mutation
//! paths are the putin/takeout/intermediate role setters and the gauge
//! observation, each followed by an explicit `recompute_stage`.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::difficulty;
use crate::gauge::stage::{NamingScheme, StageOutcome};
use crate::gauge::{bias, ranges, stage};
use crate::model::{
    Bias, DifficultyRating, GeometryHandle, PointSubtype, PointType, ReachError, Stage,
    ThresholdSet,
};
use crate::shape::DocumentShape;
use crate::text;

/// Upstream timestamp format for the last-edited field.
const EDITED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Abstract fallback derivations are cut to this many characters, then
/// trimmed back to the last word boundary.
const ABSTRACT_MAX_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// Reach points
// ---------------------------------------------------------------------------

/// Which bank a point sits on, facing downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideOfRiver {
    Left,
    Right,
}

impl SideOfRiver {
    fn parse(raw: &str) -> Option<SideOfRiver> {
        match raw.to_ascii_lowercase().as_str() {
            "left" => Some(SideOfRiver::Left),
            "right" => Some(SideOfRiver::Right),
            _ => None,
        }
    }
}

/// A discrete waypoint on a reach: an access, a rapid, a hazard, or a
/// generic marker.
///
/// Immutable after construction, except that the owning reach may
/// reclassify an access between putin/takeout/intermediate through its role
/// setters.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachPoint {
    pub reach_id: String,
    pub point_type: PointType,
    pub subtype: Option<PointSubtype>,
    pub name: Option<String>,
    pub side_of_river: Option<SideOfRiver>,
    pub update_date: Option<String>,
    pub notes: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub geometry: Option<GeometryHandle>,
}

impl ReachPoint {
    /// A bare point with the given classification and geometry.
    pub fn new(
        reach_id: &str,
        point_type: PointType,
        subtype: Option<PointSubtype>,
        geometry: Option<GeometryHandle>,
    ) -> ReachPoint {
        ReachPoint {
            reach_id: reach_id.to_string(),
            point_type,
            subtype,
            name: None,
            side_of_river: None,
            update_date: None,
            notes: None,
            description: None,
            difficulty: None,
            geometry,
        }
    }

    /// Builds a point from one record of the upstream rapids list.
    ///
    /// The primary classification comes from mutually-exclusive boolean
    /// flags, checked in priority order; the portage/waterfall/playspot
    /// flags can co-occur with any primary flag and overlay the subtype for
    /// display purposes.
    pub fn from_point_record(reach_id: &str, record: &Value) -> ReachPoint {
        let (point_type, mut subtype) = if flag(record, "isputin") {
            (PointType::Access, Some(PointSubtype::Putin))
        } else if flag(record, "istakeout") {
            (PointType::Access, Some(PointSubtype::Takeout))
        } else if flag(record, "isaccess") {
            (PointType::Access, Some(PointSubtype::Intermediate))
        } else if flag(record, "israpid") {
            (PointType::Rapid, None)
        } else if flag(record, "ishazard") {
            (PointType::Hazard, None)
        } else {
            (PointType::Generic, None)
        };

        if flag(record, "isportage") {
            subtype = Some(PointSubtype::Portage);
        }
        if flag(record, "iswaterfall") {
            subtype = Some(PointSubtype::Waterfall);
        }
        if flag(record, "isplayspot") {
            subtype = Some(PointSubtype::Playspot);
        }

        let geometry = match (numeric(record.get("rlon")), numeric(record.get("rlat"))) {
            (Some(lon), Some(lat)) => Some(point_geometry(lon, lat)),
            _ => None,
        };

        ReachPoint {
            reach_id: reach_id.to_string(),
            point_type,
            subtype,
            name: string_field(record, "name"),
            side_of_river: string_field(record, "sideofriver")
                .as_deref()
                .and_then(SideOfRiver::parse),
            update_date: string_field(record, "updatedate"),
            notes: string_field(record, "notes"),
            description: string_field(record, "description").map(|d| text::clean_text(&d)),
            difficulty: string_field(record, "difficulty"),
            geometry,
        }
    }
}

/// GeoJSON point for a lon/lat pair. Construction only — the geometry stays
/// opaque from here on.
fn point_geometry(lon: f64, lat: f64) -> GeometryHandle {
    GeometryHandle(serde_json::json!({
        "type": "Point",
        "coordinates": [lon, lat],
    }))
}

// ---------------------------------------------------------------------------
// Reach entity
// ---------------------------------------------------------------------------

/// The derived threshold/bias/stage tuple for a reach.
///
/// `stage` is `None` when no classification exists: empty thresholds, a
/// malformed range block, or an unclassifiable count/bias combination.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GaugeSummary {
    pub bias: Option<Bias>,
    pub stage: Option<Stage>,
    pub runnable: bool,
}

/// A named, bounded river segment tracked as a single recreational unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Reach {
    pub reach_id: String,
    pub river_name: Option<String>,
    pub section_name: Option<String>,
    pub description: Option<String>,
    pub abstract_text: Option<String>,
    pub length_mi: Option<f64>,
    /// Combined difficulty notation as received (e.g. "III-IV+(V)").
    pub difficulty: Option<String>,
    pub difficulty_rating: DifficultyRating,
    pub gauge_id: Option<String>,
    pub gauge_units: Option<String>,
    pub gauge_metric: Option<String>,
    pub edited: Option<NaiveDateTime>,
    /// Set when normalization hit a data-quality problem; details in
    /// `notes`. The rest of the entity stays usable.
    pub error: bool,
    pub notes: Option<String>,
    naming: NamingScheme,
    gauge_observation: Option<f64>,
    geometry: Option<GeometryHandle>,
    reach_points: Vec<ReachPoint>,
    thresholds: ThresholdSet,
    summary: GaugeSummary,
}

impl Reach {
    /// An empty reach with the given id. Used by tests and by callers that
    /// assemble reaches from something other than an upstream document.
    pub fn new(reach_id: &str) -> Reach {
        Reach {
            reach_id: reach_id.to_string(),
            river_name: None,
            section_name: None,
            description: None,
            abstract_text: None,
            length_mi: None,
            difficulty: None,
            difficulty_rating: DifficultyRating::default(),
            gauge_id: None,
            gauge_units: None,
            gauge_metric: None,
            edited: None,
            error: false,
            notes: None,
            naming: NamingScheme::Corrected,
            gauge_observation: None,
            geometry: None,
            reach_points: Vec::new(),
            thresholds: ThresholdSet::default(),
            summary: GaugeSummary::default(),
        }
    }

    /// Builds a reach from a raw detail document.
    ///
    /// Data-quality problems (malformed range block, unparsable difficulty,
    /// unclassifiable stage) never fail construction; they set the entity's
    /// error flag and notes and leave the affected derivation absent.
    /// Ordinary absence — missing gauge, geometry, coordinates — is just
    /// absence.
    pub fn from_normalized(doc: &Value) -> Reach {
        let shape = DocumentShape::resolve(doc);
        let info = shape.info_block(doc);

        let reach_id = info
            .and_then(|i| i.get("id"))
            .and_then(id_string)
            .unwrap_or_default();
        let mut reach = Reach::new(&reach_id);

        if let Some(info) = info {
            reach.river_name = string_field(info, "river").map(|v| text::remove_backslashes(&v));
            reach.section_name =
                string_field(info, "section").map(|v| text::remove_backslashes(&v));
            reach.description = string_field(info, "description_md");
            reach.abstract_text = string_field(info, "abstract_md")
                .or_else(|| reach.description.as_deref().map(derive_abstract));
            reach.length_mi = numeric(info.get("length"));
            reach.edited = string_field(info, "edited")
                .and_then(|v| NaiveDateTime::parse_from_str(&v, EDITED_FORMAT).ok());
            reach.geometry = info
                .get("geom")
                .filter(|g| !g.is_null())
                .cloned()
                .map(GeometryHandle);

            // Difficulty: empty and "none" are ordinary absence; anything
            // else must parse or the entity is flagged.
            if let Some(class) = string_field(info, "class") {
                match difficulty::parse(&class) {
                    Ok(rating) => {
                        if rating != DifficultyRating::default() {
                            reach.difficulty = Some(class);
                        }
                        reach.difficulty_rating = rating;
                    }
                    Err(err) => reach.record_issue(&err),
                }
            }

            // Accesses come from bare coordinate pairs; both halves must be
            // present for a point to exist.
            if let (Some(lon), Some(lat)) = (numeric(info.get("plon")), numeric(info.get("plat")))
            {
                reach.set_putin(ReachPoint::new(
                    &reach_id,
                    PointType::Access,
                    Some(PointSubtype::Putin),
                    Some(point_geometry(lon, lat)),
                ));
            }
            if let (Some(lon), Some(lat)) = (numeric(info.get("tlon")), numeric(info.get("tlat")))
            {
                reach.set_takeout(ReachPoint::new(
                    &reach_id,
                    PointType::Access,
                    Some(PointSubtype::Takeout),
                    Some(point_geometry(lon, lat)),
                ));
            }
        }

        if let Some(gauges) = shape.gauges_block(doc) {
            reach.gauge_id = gauges.get("gauge_id").and_then(id_string);
            reach.gauge_units = string_field(gauges, "gauge_units");
            reach.gauge_metric = string_field(gauges, "gauge_metric");
            reach.gauge_observation = numeric(gauges.get("gauge_reading"));
        }

        if let Some(points) = shape.points_block(doc) {
            for record in points {
                reach
                    .reach_points
                    .push(ReachPoint::from_point_record(&reach_id, record));
            }
        }

        // A malformed range block is fatal to stage computation only: the
        // summary stays empty and the entity is flagged, nothing else.
        match ranges::extract(doc) {
            Ok(thresholds) => {
                reach.thresholds = thresholds;
                if let Err(err) = reach.recompute_stage() {
                    reach.record_issue(&err);
                }
            }
            Err(err) => reach.record_issue(&err),
        }

        reach
    }

    fn record_issue(&mut self, err: &ReachError) {
        self.error = true;
        let message = err.to_string();
        self.notes = Some(match self.notes.take() {
            Some(existing) => format!("{}; {}", existing, message),
            None => message,
        });
    }

    // --- naming -----------------------------------------------------------

    /// Combined display name: river and section when both exist, otherwise
    /// whichever one does.
    pub fn name(&self) -> String {
        match (self.river_name.as_deref(), self.section_name.as_deref()) {
            (Some(river), Some(section)) => format!("{} {}", river, section),
            (Some(river), None) => river.to_string(),
            (None, Some(section)) => section.to_string(),
            (None, None) => String::new(),
        }
    }

    // --- gauge state ------------------------------------------------------

    pub fn gauge_observation(&self) -> Option<f64> {
        self.gauge_observation
    }

    /// Replaces the live observation. Call `recompute_stage` afterwards;
    /// the stage tuple is never silently recomputed on read.
    pub fn set_gauge_observation(&mut self, observation: Option<f64>) {
        self.gauge_observation = observation;
    }

    /// Selects the stage naming vocabulary for subsequent recomputation.
    pub fn set_naming_scheme(&mut self, naming: NamingScheme) {
        self.naming = naming;
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    /// Lowest known threshold value.
    pub fn gauge_min(&self) -> Option<f64> {
        self.thresholds.first()
    }

    /// Highest known threshold value.
    pub fn gauge_max(&self) -> Option<f64> {
        self.thresholds.last()
    }

    pub fn range_bias(&self) -> Option<Bias> {
        self.summary.bias
    }

    pub fn gauge_stage(&self) -> Option<Stage> {
        self.summary.stage
    }

    pub fn gauge_runnable(&self) -> bool {
        self.summary.runnable
    }

    /// Recomputes the bias/stage/runnable tuple from the stored thresholds
    /// and observation.
    ///
    /// Empty thresholds recover as an unknown stage (no error); an
    /// unclassifiable count/bias combination clears the stage and is
    /// returned to the caller, never mapped to a nearest stage.
    pub fn recompute_stage(&mut self) -> Result<(), ReachError> {
        self.summary = GaugeSummary::default();

        if self.thresholds.is_empty() {
            // Missing observation outranks missing thresholds; an empty
            // ladder with an observation recovers as an unknown stage.
            if self.gauge_observation.is_none() {
                self.summary.stage = Some(Stage::NoReading);
            }
            return Ok(());
        }

        let range_bias = bias::classify(&self.thresholds.positions)?;
        self.summary.bias = Some(range_bias);

        match stage::classify_with_naming(
            &self.thresholds,
            range_bias,
            self.gauge_observation,
            self.naming,
        ) {
            Ok(StageOutcome { stage, runnable }) => {
                self.summary.stage = Some(stage);
                self.summary.runnable = runnable;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    // --- points and roles -------------------------------------------------

    pub fn reach_points(&self) -> &[ReachPoint] {
        &self.reach_points
    }

    pub fn geometry(&self) -> Option<&GeometryHandle> {
        self.geometry.as_ref()
    }

    fn access_by_subtype(&self, subtype: PointSubtype) -> Option<&ReachPoint> {
        self.reach_points
            .iter()
            .find(|p| p.point_type == PointType::Access && p.subtype == Some(subtype))
    }

    pub fn putin(&self) -> Option<&ReachPoint> {
        self.access_by_subtype(PointSubtype::Putin)
    }

    pub fn takeout(&self) -> Option<&ReachPoint> {
        self.access_by_subtype(PointSubtype::Takeout)
    }

    pub fn intermediate_accesses(&self) -> Vec<&ReachPoint> {
        self.reach_points
            .iter()
            .filter(|p| {
                p.point_type == PointType::Access && p.subtype == Some(PointSubtype::Intermediate)
            })
            .collect()
    }

    /// Assigns the putin, atomically replacing any prior holder of the
    /// role. The point is reclassified as an access on the way in.
    pub fn set_putin(&mut self, point: ReachPoint) {
        self.set_access_role(point, PointSubtype::Putin);
    }

    /// Assigns the takeout, atomically replacing any prior holder.
    pub fn set_takeout(&mut self, point: ReachPoint) {
        self.set_access_role(point, PointSubtype::Takeout);
    }

    fn set_access_role(&mut self, mut point: ReachPoint, subtype: PointSubtype) {
        self.reach_points.retain(|p| p.subtype != Some(subtype));
        point.point_type = PointType::Access;
        point.subtype = Some(subtype);
        self.reach_points.push(point);
    }

    /// Adds an intermediate access. Any number may exist.
    pub fn add_intermediate_access(&mut self, mut point: ReachPoint) {
        point.point_type = PointType::Access;
        point.subtype = Some(PointSubtype::Intermediate);
        self.reach_points.push(point);
    }
}

// ---------------------------------------------------------------------------
// Field coercion helpers
// ---------------------------------------------------------------------------

/// Boolean flag that may arrive as a bool, a 0/1 number, or a "0"/"1"
/// string.
fn flag(record: &Value, key: &str) -> bool {
    match record.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
        _ => false,
    }
}

/// Numeric field that may arrive as a number or a numeric string. Empty and
/// non-numeric strings are ordinary absence.
fn numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Non-empty string field.
fn string_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Identifier that may arrive as a string or a bare number.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Derives an abstract from a description: strip escape noise, cut to the
/// size cap at a word boundary, mark the truncation.
fn derive_abstract(description: &str) -> String {
    let cleaned = description.replace('\\', "").replace("/n", "");
    let mut cut: String = cleaned.chars().take(ABSTRACT_MAX_CHARS).collect();
    if cut.len() < cleaned.len() {
        // Truncation landed mid-word; back up to the last full word.
        if let Some(last_space) = cut.rfind(' ') {
            cut.truncate(last_space);
        }
    }
    format!("{}...", cut)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
