use serde::{Deserialize, Serialize};

use crate::hierarchy::OrgNode;
use crate::text::{wrap, TextMeasurer};
use super::RectF;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Characters per label line before wrapping.
    pub max_line_len: usize,
    pub root_font_size: f64,
    pub font_size: f64,
    /// Horizontal padding on each side of the widest line.
    pub padding: f64,
    /// Box height per line.
    pub root_line_height: f64,
    pub line_height: f64,
    /// Distance per line from the anchor to the box top.
    pub root_line_offset: f64,
    pub line_offset: f64,
    pub baseline_shift: f64,
    /// Spacing between stacked lines, in em.
    pub line_spacing_em: f64,
    pub root_dy_em: f64,
    pub single_dy_em: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            max_line_len: 16,
            root_font_size: 16.0,
            font_size: 12.0,
            padding: 10.0,
            root_line_height: 24.0,
            line_height: 18.0,
            root_line_offset: 22.0,
            line_offset: 18.0,
            baseline_shift: 13.0,
            line_spacing_em: 1.1,
            root_dy_em: 0.46,
            single_dy_em: 0.1,
        }
    }
}

/// Everything the renderer needs to draw one node label, centered on the node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelGeometry {
    pub lines: Vec<String>,
    pub font_size: f64,
    /// Vertical offset of each line relative to the previous one.
    pub dy: Vec<String>,
    pub bounds: RectF,
}

pub fn label_geometry(node: &OrgNode, measurer: &dyn TextMeasurer, cfg: &LabelConfig) -> LabelGeometry {
    let root = node.depth == 0;
    let text = if node.name.is_empty() { &node.id } else { &node.name };
    let lines = wrap(text, cfg.max_line_len);
    let font_size = if root { cfg.root_font_size } else { cfg.font_size };

    let max_w = lines
        .iter()
        .map(|l| measurer.text_width(l, font_size))
        .fold(0.0, f64::max);
    let n = lines.len() as f64;
    let (offset, line_height) = if root {
        (cfg.root_line_offset, cfg.root_line_height)
    } else {
        (cfg.line_offset, cfg.line_height)
    };
    let bounds = RectF {
        x: -max_w / 2.0 - cfg.padding,
        y: -n * offset + cfg.baseline_shift,
        w: max_w + 2.0 * cfg.padding,
        h: n * line_height,
    };

    let dy = (0..lines.len())
        .map(|i| {
            if root {
                em(cfg.root_dy_em)
            } else if lines.len() == 1 {
                em(cfg.single_dy_em)
            } else if i == 0 {
                em(-((n - 1.0) / 2.0) * cfg.line_spacing_em)
            } else {
                em(cfg.line_spacing_em)
            }
        })
        .collect();

    LabelGeometry { lines, font_size, dy, bounds }
}

fn em(v: f64) -> String {
    format!("{}em", (v * 1000.0).round() / 1000.0)
}
