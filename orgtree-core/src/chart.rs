// Chart pipeline: records -> tree -> layout -> output, plus interaction state.
//
// Build and layout run once, synchronously, when the chart is created. After
// that only the selection and hover state change; each interaction call
// recomputes its state from scratch.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::hierarchy::{build, NodeId, OrgTree};
use crate::hover::Tooltip;
use crate::layout::{label_geometry, layout_tree, radial_link_path, LabelConfig, LabelGeometry, LayoutConfig, PointF};
use crate::output::{ChartOutput, EdgeOutput, HighlightOutput, NodeOutput};
use crate::records::{records_from_csv, records_from_json, RawRecord};
use crate::selection::{ClickTarget, Selection, SelectionState};
use crate::text::TextMeasurer;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub layout: LayoutConfig,
    pub labels: LabelConfig,
    /// Canvas width; the view box is centered on the root.
    pub width: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            labels: LabelConfig::default(),
            width: 800.0,
        }
    }
}

impl ChartConfig {
    /// Parse a JSON config; an empty string means defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(input)?)
    }

    pub fn view_box(&self) -> [f64; 4] {
        let half = self.width / 2.0;
        [-half, -half, self.width, self.width]
    }
}

pub struct OrgChart {
    cfg: ChartConfig,
    tree: OrgTree,
    labels: Vec<LabelGeometry>,
    selection: SelectionState,
    tooltip: Tooltip,
}

impl OrgChart {
    pub fn from_records(records: &[RawRecord], cfg: ChartConfig, measurer: &dyn TextMeasurer) -> Result<Self> {
        let mut tree = build(records)?;
        layout_tree(&mut tree, &cfg.layout);
        let labels = tree
            .nodes
            .iter()
            .map(|n| label_geometry(n, measurer, &cfg.labels))
            .collect();
        let selection = SelectionState::new(&tree);
        log::info!("chart ready: {} nodes, {} detached", tree.len(), tree.detached.len());
        Ok(Self {
            cfg,
            tree,
            labels,
            selection,
            tooltip: Tooltip::default(),
        })
    }

    pub fn from_csv(input: &str, cfg: ChartConfig, measurer: &dyn TextMeasurer) -> Result<Self> {
        Self::from_records(&records_from_csv(input)?, cfg, measurer)
    }

    pub fn from_json(input: &str, cfg: ChartConfig, measurer: &dyn TextMeasurer) -> Result<Self> {
        Self::from_records(&records_from_json(input)?, cfg, measurer)
    }

    pub fn tree(&self) -> &OrgTree {
        &self.tree
    }

    pub fn config(&self) -> &ChartConfig {
        &self.cfg
    }

    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    fn resolve(&self, id: &str) -> Result<NodeId> {
        self.tree.lookup(id).ok_or_else(|| Error::UnknownNode { id: id.to_string() })
    }

    pub fn click(&mut self, target: ClickTarget) {
        self.selection.click(&self.tree, target);
    }

    pub fn click_node(&mut self, id: &str) -> Result<()> {
        let nid = self.resolve(id)?;
        self.click(ClickTarget::Node(nid));
        Ok(())
    }

    pub fn click_background(&mut self) {
        self.click(ClickTarget::Background);
    }

    pub fn pointer_enter(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        let nid = self.resolve(id)?;
        self.tooltip.pointer_enter(&self.tree, nid, x, y);
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.tooltip.pointer_move(x, y);
    }

    pub fn pointer_leave(&mut self) {
        self.tooltip.pointer_leave();
    }

    fn selected_id(&self) -> Option<String> {
        match self.selection.selection() {
            Selection::Focused(nid) => Some(self.tree.node(nid).id.clone()),
            Selection::Neutral => None,
        }
    }

    pub fn highlights(&self) -> HighlightOutput {
        let c = self.selection.classification();
        HighlightOutput {
            selected: self.selected_id(),
            nodes: c.nodes.clone(),
            edges: c.links.clone(),
        }
    }

    pub fn render(&self) -> ChartOutput {
        let nodes = self
            .tree
            .nodes
            .iter()
            .zip(&self.labels)
            .map(|(n, label)| {
                let p = PointF::from_polar(n.angle, n.radius);
                NodeOutput {
                    key: n.nid.0,
                    id: n.id.clone(),
                    name: n.name.clone(),
                    depth: n.depth,
                    stub: n.stub,
                    angle: n.angle,
                    radius: n.radius,
                    x: p.x,
                    y: p.y,
                    label: label.clone(),
                    highlight: self.selection.node_highlight(n.nid),
                }
            })
            .collect();

        let edges = self
            .tree
            .links()
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let s = self.tree.node(l.source);
                let t = self.tree.node(l.target);
                EdgeOutput {
                    key: i,
                    source: s.id.clone(),
                    target: t.id.clone(),
                    source_angle: s.angle,
                    source_radius: s.radius,
                    target_angle: t.angle,
                    target_radius: t.radius,
                    path: radial_link_path(s.angle, s.radius, t.angle, t.radius),
                    highlight: self.selection.link_highlight(i),
                }
            })
            .collect();

        ChartOutput {
            view_box: self.cfg.view_box(),
            nodes,
            edges,
            selected: self.selected_id(),
            detached: self.tree.detached.clone(),
            diagnostics: self.tree.diagnostics.clone(),
            error: None,
        }
    }
}

/// Build, lay out and render in one go; failures become an inline error.
pub fn render_records(records: Result<Vec<RawRecord>>, cfg: ChartConfig, measurer: &dyn TextMeasurer) -> ChartOutput {
    let view_box = cfg.view_box();
    match records.and_then(|r| OrgChart::from_records(&r, cfg, measurer)) {
        Ok(chart) => chart.render(),
        Err(e) => {
            log::error!("error loading hierarchy: {}", e);
            ChartOutput::from_error(&e, view_box)
        }
    }
}
