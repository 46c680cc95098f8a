//! `wanderlust analyze`, `think` and `maps`

use crate::assist::{Assistant, MapsAnswer};
use crate::error::Result;
use crate::providers::{InlineImage, LatLng};
use colored::Colorize;
use std::path::Path;

/// Analyze an image file and print the description
///
/// # Errors
///
/// Returns error if the file is not a readable image or the request fails
pub async fn run_analyze(assistant: &Assistant, file: &Path, prompt: &str) -> Result<String> {
    let image = InlineImage::from_path(file).await?;
    let text = assistant.analyze_content(image, prompt).await?;
    println!("{}", text);
    Ok(text)
}

/// Ask a reasoning question and print the answer
///
/// # Errors
///
/// Returns error if the request fails
pub async fn run_think(assistant: &Assistant, query: &str) -> Result<String> {
    println!("{}", "Thinking...".dimmed());
    let text = assistant.deep_think(query).await?;
    println!("\n{}", text);
    Ok(text)
}

/// Ask a map-grounded question and print the answer with its sources
///
/// # Errors
///
/// Returns error if the request fails
pub async fn run_maps(
    assistant: &Assistant,
    query: &str,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<MapsAnswer> {
    let location = match (lat, lng) {
        (Some(latitude), Some(longitude)) => Some(LatLng {
            latitude,
            longitude,
        }),
        _ => None,
    };
    let answer = assistant.maps_query(query, location).await?;

    if answer.text.is_empty() {
        println!("{}", "No answer returned.".yellow());
    } else {
        println!("{}", answer.text);
    }
    for line in source_lines(&answer.chunks) {
        println!("  {}", line);
    }
    Ok(answer)
}

// Grounding chunks look like {"maps": {"title": .., "uri": ..}} or
// {"web": {...}}; anything else is skipped.
fn source_lines(chunks: &[serde_json::Value]) -> Vec<String> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let source = chunk.get("maps").or_else(|| chunk.get("web"))?;
            let title = source.get("title").and_then(|v| v.as_str()).unwrap_or("");
            let uri = source.get("uri").and_then(|v| v.as_str()).unwrap_or("");
            match (title.is_empty(), uri.is_empty()) {
                (true, true) => None,
                (false, true) => Some(title.to_string()),
                (true, false) => Some(uri.to_string()),
                (false, false) => Some(format!("{} - {}", title, uri.cyan())),
            }
        })
        .collect()
}
