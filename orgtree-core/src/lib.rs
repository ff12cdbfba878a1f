//! Radial organization chart core.
//!
//! Flat unit records (CSV or JSON rows) are turned into a rooted hierarchy,
//! laid out on concentric rings and serialized for the browser renderer.
//! Click and hover state lives here too, so the frontend only draws.

mod chart;
mod error;
mod hierarchy;
mod hover;
mod layout;
mod output;
mod records;
mod selection;
mod text;
mod wasm;

pub use chart::{render_records, ChartConfig, OrgChart};
pub use error::{Diagnostic, Error, Result};
pub use hierarchy::{build, DetachedNode, Link, NodeId, OrgNode, OrgTree};
pub use hover::{Tooltip, TooltipContent};
pub use layout::{
    angle_weight, angle_weights, label_geometry, layout_tree, radial_link_path, ring_angles, LabelConfig,
    LabelGeometry, LayoutConfig, PointF, RectF,
};
pub use output::{ChartOutput, EdgeOutput, ErrorInfo, HighlightOutput, NodeOutput};
pub use records::{clean, normalize_records, records_from_csv, records_from_json, RawRecord};
pub use selection::{Classification, ClickTarget, Highlight, Selection, SelectionState};
pub use text::{wrap, DeterministicTextMeasurer, TextMeasurer};
pub use wasm::{init_logging, render_csv, render_rows, CanvasTextMeasurer, OrgChartView};
