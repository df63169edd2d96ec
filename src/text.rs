//! Description text cleanup.
//!
//! Upstream description fields are user-authored HTML with erratic
//! whitespace. `clean_text` converts them to markdown so reasonable
//! formatting survives, then normalizes the whitespace noise. Pure string
//! functions, no I/O.

use regex::Regex;

/// Converts an HTML description to cleaned-up markdown.
pub fn clean_text(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    // Markdown conversion first, so any reasonable formatting is retained.
    // A document broken enough to fail conversion falls back to bare tag
    // stripping.
    let converted = htmd::convert(input).unwrap_or_else(|_| strip_html_tags(input));

    let multi_space = Regex::new(r"\s{2,}").expect("valid whitespace regex");
    let multi_newline = Regex::new(r"\n{3,}").expect("valid newline regex");
    let split_line = Regex::new(r"(.)\n(.)").expect("valid line-join regex");
    let trailing_newlines = Regex::new(r"\n+$").expect("valid trailing regex");

    // Collapse runs of spaces but keep single newlines, since those still
    // contribute to formatting; then cap blank runs at one blank line and
    // join lines broken mid-sentence.
    let cleanup = multi_space.replace_all(&converted, " ");
    let cleanup = multi_newline.replace_all(&cleanup, "\n\n");
    let cleanup = split_line.replace_all(&cleanup, "$1 $2");
    let cleanup = trailing_newlines.replace_all(&cleanup, "");

    // Correct any leftover standalone links.
    let cleanup = cleanup.replace('<', "[").replace('>', "]");

    cleanup.trim().to_string()
}

/// Removes HTML tags from a string, keeping only the text content.
pub fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Removes backslashes from a string if there is a string to work with.
///
/// Upstream name fields escape characters that mean nothing once the JSON
/// is decoded.
pub fn remove_backslashes(input: &str) -> String {
    input.replace('\\', "")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
