//! WASM bindings for the orgtree-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Everything crossing the boundary is a JSON string; errors are reported
//! inside that JSON, never thrown.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::chart::{render_records, ChartConfig, OrgChart};
use crate::error::Result;
use crate::output::{ChartOutput, ErrorInfo};
use crate::records::{records_from_csv, records_from_json};
use crate::text::{DeterministicTextMeasurer, TextMeasurer};

/// Install console logging and the panic hook. Call once before anything else.
#[wasm_bindgen]
pub fn init_logging() {
    let _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    log::info!("Logging initialized");
}

/// Measures text with an offscreen 2d canvas, like the browser will draw it.
pub struct CanvasTextMeasurer {
    ctx: Option<CanvasRenderingContext2d>,
    fallback: DeterministicTextMeasurer,
}

impl CanvasTextMeasurer {
    pub fn new() -> Self {
        let ctx = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.create_element("canvas").ok())
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
            .and_then(|c| c.get_context("2d").ok().flatten())
            .and_then(|o| o.dyn_into::<CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            log::warn!("no 2d canvas available, using approximate text widths");
        }
        Self { ctx, fallback: DeterministicTextMeasurer::default() }
    }
}

impl Default for CanvasTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for CanvasTextMeasurer {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        match &self.ctx {
            Some(ctx) => {
                ctx.set_font(&format!("{}px sans-serif", font_size));
                ctx.measure_text(text)
                    .map(|m| m.width())
                    .unwrap_or_else(|_| self.fallback.text_width(text, font_size))
            }
            None => self.fallback.text_width(text, font_size),
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Error serializing output: {}", e);
        "{\"error\": {\"kind\": \"serialization\", \"message\": \"serialization failed\"}}".to_string()
    })
}

fn config_or_error(config: &str) -> std::result::Result<ChartConfig, String> {
    ChartConfig::from_json(config).map_err(|e| {
        log::error!("Error reading config: {}", e);
        to_json(&ChartOutput::from_error(&e, ChartConfig::default().view_box()))
    })
}

/// One-shot render of CSV text. Returns the chart JSON (or an inline error).
#[wasm_bindgen]
pub fn render_csv(input: &str, config: &str) -> String {
    match config_or_error(config) {
        Ok(cfg) => to_json(&render_records(records_from_csv(input), cfg, &CanvasTextMeasurer::new())),
        Err(json) => json,
    }
}

/// One-shot render of JSON rows. Returns the chart JSON (or an inline error).
#[wasm_bindgen]
pub fn render_rows(input: &str, config: &str) -> String {
    match config_or_error(config) {
        Ok(cfg) => to_json(&render_records(records_from_json(input), cfg, &CanvasTextMeasurer::new())),
        Err(json) => json,
    }
}

/// Interactive chart handle. A failed load leaves it empty: `render` reports
/// the error and every interaction is a no-op.
#[wasm_bindgen]
pub struct OrgChartView {
    chart: std::result::Result<OrgChart, ErrorInfo>,
    view_box: [f64; 4],
}

impl OrgChartView {
    fn load(config: &str, make: impl FnOnce(ChartConfig, &CanvasTextMeasurer) -> Result<OrgChart>) -> Self {
        let (result, view_box) = match ChartConfig::from_json(config) {
            Ok(cfg) => {
                let view_box = cfg.view_box();
                (make(cfg, &CanvasTextMeasurer::new()), view_box)
            }
            Err(e) => (Err(e), ChartConfig::default().view_box()),
        };
        let chart = result.map_err(|e| {
            log::error!("Error loading hierarchy: {}", e);
            ErrorInfo::from(&e)
        });
        Self { chart, view_box }
    }
}

#[wasm_bindgen]
impl OrgChartView {
    pub fn from_csv(input: &str, config: &str) -> OrgChartView {
        Self::load(config, |cfg, m| OrgChart::from_csv(input, cfg, m))
    }

    pub fn from_rows(input: &str, config: &str) -> OrgChartView {
        Self::load(config, |cfg, m| OrgChart::from_json(input, cfg, m))
    }

    /// Full chart JSON, including current highlight state.
    pub fn render(&self) -> String {
        match &self.chart {
            Ok(chart) => to_json(&chart.render()),
            Err(info) => to_json(&ChartOutput::with_error(info.clone(), self.view_box)),
        }
    }

    /// Current highlight classification, indexed by draw key.
    pub fn highlights(&self) -> String {
        match &self.chart {
            Ok(chart) => to_json(&chart.highlights()),
            Err(_) => "null".to_string(),
        }
    }

    /// A click on a node label. The caller must not also forward the same
    /// event to `click_background`.
    pub fn click_node(&mut self, id: &str) -> String {
        let Ok(chart) = &mut self.chart else {
            return "null".to_string();
        };
        match chart.click_node(id) {
            Ok(()) => to_json(&chart.highlights()),
            Err(e) => {
                log::warn!("{}", e);
                to_json(&ErrorInfo::from(&e))
            }
        }
    }

    /// A click that did not land on a node.
    pub fn click_background(&mut self) -> String {
        let Ok(chart) = &mut self.chart else {
            return "null".to_string();
        };
        chart.click_background();
        to_json(&chart.highlights())
    }

    /// Tooltip JSON after the pointer enters a node.
    pub fn pointer_enter(&mut self, id: &str, x: f64, y: f64) -> String {
        let Ok(chart) = &mut self.chart else {
            return "null".to_string();
        };
        match chart.pointer_enter(id, x, y) {
            Ok(()) => to_json(chart.tooltip()),
            Err(e) => to_json(&ErrorInfo::from(&e)),
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> String {
        let Ok(chart) = &mut self.chart else {
            return "null".to_string();
        };
        chart.pointer_move(x, y);
        to_json(chart.tooltip())
    }

    pub fn pointer_leave(&mut self) -> String {
        let Ok(chart) = &mut self.chart else {
            return "null".to_string();
        };
        chart.pointer_leave();
        to_json(chart.tooltip())
    }
}
