//! Output types for frontend consumption.
//!
//! These structs are serialized to JSON and handed to the renderer, which
//! draws links, label boxes and text from them and keys its draw calls by
//! `key` so highlight updates can be applied without a full redraw.

use serde::Serialize;

use crate::error::{Diagnostic, Error};
use crate::hierarchy::DetachedNode;
use crate::layout::LabelGeometry;
use crate::selection::Highlight;

/// A laid-out node ready to draw
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    /// Stable draw key, shared with highlight updates.
    pub key: usize,
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub stub: bool,
    pub angle: f64,
    pub radius: f64,
    /// Cartesian position of the label anchor.
    pub x: f64,
    pub y: f64,
    pub label: LabelGeometry,
    pub highlight: Highlight,
}

/// A parent -> child link
#[derive(Debug, Clone, Serialize)]
pub struct EdgeOutput {
    pub key: usize,
    pub source: String,
    pub target: String,
    pub source_angle: f64,
    pub source_radius: f64,
    pub target_angle: f64,
    pub target_radius: f64,
    /// SVG path data for the radial link.
    pub path: String,
    pub highlight: Highlight,
}

/// Error information for the inline error message
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub kind: String,
    pub message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(e: &Error) -> Self {
        ErrorInfo {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

/// The full chart sent to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct ChartOutput {
    /// min-x, min-y, width, height
    pub view_box: [f64; 4],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub detached: Vec<DetachedNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ChartOutput {
    pub fn with_error(error: ErrorInfo, view_box: [f64; 4]) -> Self {
        ChartOutput {
            view_box,
            nodes: vec![],
            edges: vec![],
            selected: None,
            detached: vec![],
            diagnostics: vec![],
            error: Some(error),
        }
    }

    pub fn from_error(e: &Error, view_box: [f64; 4]) -> Self {
        Self::with_error(ErrorInfo::from(e), view_box)
    }
}

/// Highlight-only update after a click, indexed by draw key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightOutput {
    pub selected: Option<String>,
    pub nodes: Vec<Highlight>,
    pub edges: Vec<Highlight>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_output_has_no_nodes() {
        let out = ChartOutput::from_error(&Error::EmptyInput, [-400.0, -400.0, 800.0, 800.0]);
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("nodes").is_none());
        assert_eq!(json["error"]["kind"], "empty_input");
        assert_eq!(json["view_box"][2], 800.0);
    }

    #[test]
    fn test_highlight_serializes_snake_case() {
        let out = HighlightOutput {
            selected: Some("1".to_string()),
            nodes: vec![Highlight::Highlighted, Highlight::Dimmed],
            edges: vec![Highlight::Neutral],
        };
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"selected":"1","nodes":["highlighted","dimmed"],"edges":["neutral"]}"#);
    }
}
