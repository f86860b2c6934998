//! Browser collaborators: 2D canvas renderer, DOM score display, game-over overlay

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::{Clock, Display, LifecycleUi, Renderer};
use crate::config::Variant;
use crate::sim::ColorTag;

/// Colors for one variant
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// `None` clears to transparent (page background shows through)
    pub background: Option<&'static str>,
    pub line: &'static str,
    pub normal: &'static str,
    pub hit: &'static str,
    pub miss: &'static str,
    pub font: &'static str,
}

impl Palette {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self {
                background: None,
                line: "red",
                normal: "black",
                hit: "green",
                miss: "red",
                font: "Arial",
            },
            Variant::Retro => Self {
                background: Some("#000000"),
                line: "#aa0000",
                normal: "#55ff55",
                hit: "#ffff55",
                miss: "#ff5555",
                font: "'Courier New', monospace",
            },
        }
    }

    fn color(&self, tag: ColorTag) -> &'static str {
        match tag {
            ColorTag::Normal => self.normal,
            ColorTag::Hit => self.hit,
            ColorTag::Miss => self.miss,
        }
    }
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    palette: Palette,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, palette: Palette) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        Ok(Self {
            canvas,
            ctx,
            palette,
        })
    }

    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    /// Big centered banner (used for GAME OVER)
    pub fn banner(&self, text: &str) {
        let (w, h) = self.size();
        self.ctx.set_font(&format!("60px {}", self.palette.font));
        self.ctx.set_fill_style_str(self.palette.miss);
        if let Err(e) = self.ctx.fill_text(text, w / 2.0, h / 2.0) {
            log::warn!("Banner draw failed: {:?}", e);
        }
    }
}

impl Renderer for CanvasRenderer {
    fn clear(&mut self) {
        let (w, h) = self.size();
        match self.palette.background {
            Some(bg) => {
                self.ctx.set_fill_style_str(bg);
                self.ctx.fill_rect(0.0, 0.0, w, h);
            }
            None => self.ctx.clear_rect(0.0, 0.0, w, h),
        }
    }

    fn draw_line(&mut self, y: f32) {
        let (w, _) = self.size();
        self.ctx.begin_path();
        self.ctx.move_to(0.0, y as f64);
        self.ctx.line_to(w, y as f64);
        self.ctx.set_stroke_style_str(self.palette.line);
        self.ctx.set_line_width(3.0);
        self.ctx.stroke();
    }

    fn draw_letter(&mut self, text: &str, x: f32, y: f32, size: f32, color: ColorTag) {
        let half = size as f64 / 2.0;
        self.ctx.set_font(&format!("{}px {}", size, self.palette.font));
        self.ctx.set_fill_style_str(self.palette.color(color));
        // Text is centered on the first character cell
        if let Err(e) = self.ctx.fill_text(text, x as f64 + half, y as f64 + half) {
            log::warn!("Letter draw failed for '{}': {:?}", text, e);
        }
    }
}

/// Writes the score into `#score` and the typed buffer into `#typed` (if present)
pub struct DomDisplay {
    document: Document,
}

impl DomDisplay {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Display for DomDisplay {
    fn set_score_text(&mut self, score: i64) {
        if let Some(el) = self.document.get_element_by_id("score") {
            el.set_text_content(Some(&format!("Score: {}", score)));
        }
    }

    fn set_buffer_text(&mut self, typed: &str) {
        if let Some(el) = self.document.get_element_by_id("typed") {
            el.set_text_content(Some(typed));
        }
    }
}

/// Paints the GAME OVER banner and reveals the `#restart-btn` button
pub struct DomLifecycle {
    document: Document,
    banner: CanvasRenderer,
}

impl DomLifecycle {
    pub fn new(document: Document, banner: CanvasRenderer) -> Self {
        Self { document, banner }
    }

    /// Toggle the visibility of a DOM element by id
    pub fn set_visible(&self, id: &str, visible: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let class = if visible { "" } else { "hidden" };
            let _ = el.set_attribute("class", class);
        }
    }
}

impl LifecycleUi for DomLifecycle {
    fn on_game_over(&mut self, final_score: i64) {
        log::info!("Game over, final score {}", final_score);
        self.banner.banner("GAME OVER");
        self.set_visible("restart-btn", true);
    }
}

/// `performance.now()`
pub struct WebClock;

impl Clock for WebClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}
