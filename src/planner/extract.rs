//! Terminal response extraction
//!
//! Turns the model's final free-form text into a [`TripResult`]. All fence
//! stripping lives in [`normalize_terminal_response`].

use super::result::TripResult;
use crate::error::{Result, WanderlustError};
use serde_json::Value;
use tracing::{debug, warn};

/// Placeholder id the instruction template asks the model to fill in
pub const TRIP_ID_PLACEHOLDER: &str = "generate_uuid";

/// Strip code-fence markup and surrounding whitespace
///
/// Every "```json" marker is removed, then every remaining "```", then the
/// result is trimmed. Applying it twice gives the same output as once.
///
/// # Examples
///
/// ```
/// use wanderlust::planner::normalize_terminal_response;
///
/// assert_eq!(normalize_terminal_response("```json\n{}\n```"), "{}");
/// assert_eq!(normalize_terminal_response("  {}  "), "{}");
/// ```
pub fn normalize_terminal_response(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse terminal response text into a trip plan
///
/// Fields are read leniently: `null` takes the field default and quoted
/// numbers are coerced. A missing or placeholder trip id is replaced with a
/// fresh UUID. Structural issues found by [`TripResult::validate`] are
/// logged; with `strict` set they fail the extraction instead.
///
/// # Errors
///
/// Returns `WanderlustError::Parse` if the text is absent, empty after
/// normalization, not a JSON object, or (in strict mode) structurally
/// incomplete. No partial result is returned.
///
/// # Examples
///
/// ```
/// use wanderlust::planner::extract_trip;
///
/// let trip = extract_trip(Some("```json\n{\"destination\": \"Goa\"}\n```"), false).unwrap();
/// assert_eq!(trip.destination, "Goa");
/// assert!(!trip.trip_id.is_empty());
///
/// assert!(extract_trip(Some("not json"), false).is_err());
/// assert!(extract_trip(None, false).is_err());
/// ```
pub fn extract_trip(text: Option<&str>, strict: bool) -> Result<TripResult> {
    let raw = text.ok_or_else(|| WanderlustError::Parse("No text generated".to_string()))?;
    let clean = normalize_terminal_response(raw);
    if clean.is_empty() {
        return Err(WanderlustError::Parse("No text generated".to_string()).into());
    }

    let value: Value = serde_json::from_str(&clean).map_err(|e| {
        debug!("Unparseable terminal response: {}", clean);
        WanderlustError::Parse(e.to_string())
    })?;
    if !value.is_object() {
        return Err(WanderlustError::Parse("expected a JSON object".to_string()).into());
    }
    let mut trip: TripResult =
        serde_json::from_value(value).map_err(|e| WanderlustError::Parse(e.to_string()))?;

    if trip.trip_id.trim().is_empty() || trip.trip_id == TRIP_ID_PLACEHOLDER {
        trip.trip_id = uuid::Uuid::new_v4().to_string();
        debug!("Assigned trip id {}", trip.trip_id);
    }

    let issues = trip.validate();
    if !issues.is_empty() {
        let summary = issues
            .iter()
            .map(|issue| issue.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        if strict {
            return Err(WanderlustError::Parse(format!("incomplete plan: {}", summary)).into());
        }
        warn!("Accepting plan with structural issues: {}", summary);
    }

    Ok(trip)
}
