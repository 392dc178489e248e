//! Drawing seam between the scene and the browser canvas.
//!
//! Entities draw through `Painter`, a small subset of the 2D canvas API. The
//! browser implementation forwards to `CanvasRenderingContext2d`; `Recording`
//! keeps a log of the calls so the scene can run headless.

use web_sys::{CanvasGradient, CanvasRenderingContext2d};

/// Fill source: flat color or a gradient with `(offset, color)` stops.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Color(String),
    Linear {
        from: (f64, f64),
        to: (f64, f64),
        stops: Vec<(f32, &'static str)>,
    },
    Radial {
        inner: (f64, f64, f64), // x, y, r
        outer: (f64, f64, f64),
        stops: Vec<(f32, &'static str)>,
    },
}

impl Paint {
    pub fn color(css: impl Into<String>) -> Self {
        Paint::Color(css.into())
    }
}

pub trait Painter {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, x: f64, y: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn set_fill(&mut self, paint: &Paint);
    fn set_stroke(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_shadow(&mut self, color: &str, blur: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
}

// --- Browser canvas ----------------------------------------------------------

fn add_stops(gradient: &CanvasGradient, stops: &[(f32, &str)]) {
    for (offset, color) in stops {
        gradient.add_color_stop(*offset, color).ok();
    }
}

impl Painter for CanvasRenderingContext2d {
    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }
    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }
    fn translate(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::translate(self, x, y).ok();
    }
    fn rotate(&mut self, angle: f64) {
        CanvasRenderingContext2d::rotate(self, angle).ok();
    }
    fn scale(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::scale(self, x, y).ok();
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }
    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }
    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        CanvasRenderingContext2d::quadratic_curve_to(self, cx, cy, x, y);
    }
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        CanvasRenderingContext2d::arc(self, x, y, radius, start, end).ok();
    }
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64) {
        CanvasRenderingContext2d::ellipse(self, x, y, rx, ry, rotation, 0.0, std::f64::consts::TAU).ok();
    }
    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }
    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn set_fill(&mut self, paint: &Paint) {
        match paint {
            Paint::Color(css) => self.set_fill_style_str(css),
            Paint::Linear { from, to, stops } => {
                let g = self.create_linear_gradient(from.0, from.1, to.0, to.1);
                add_stops(&g, stops);
                self.set_fill_style_canvas_gradient(&g);
            }
            Paint::Radial { inner, outer, stops } => {
                match self.create_radial_gradient(inner.0, inner.1, inner.2, outer.0, outer.1, outer.2) {
                    Ok(g) => {
                        add_stops(&g, stops);
                        self.set_fill_style_canvas_gradient(&g);
                    }
                    Err(e) => log::warn!("radial gradient rejected: {e:?}"),
                }
            }
        }
    }
    fn set_stroke(&mut self, color: &str) {
        self.set_stroke_style_str(color);
    }
    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }
    fn set_shadow(&mut self, color: &str, blur: f64) {
        self.set_shadow_color(color);
        self.set_shadow_blur(blur);
    }
    fn set_global_alpha(&mut self, alpha: f64) {
        CanvasRenderingContext2d::set_global_alpha(self, alpha);
    }
    fn set_font(&mut self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }
    fn set_text_align(&mut self, align: &str) {
        CanvasRenderingContext2d::set_text_align(self, align);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        CanvasRenderingContext2d::fill_text(self, text, x, y).ok();
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::clear_rect(self, x, y, w, h);
    }
}

// --- Headless recorder -------------------------------------------------------

/// A recorded draw call. Only the calls that carry positional meaning are
/// kept verbatim; everything else is recorded by name.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Translate(f64, f64),
    FillText { text: String, x: f64, y: f64 },
    FillRect(f64, f64, f64, f64),
    Clear,
    Other(&'static str),
}

/// Painter that only records what it was asked to draw.
#[derive(Debug, Default)]
pub struct Recording {
    pub calls: Vec<DrawCall>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Painter for Recording {
    fn save(&mut self) {
        self.calls.push(DrawCall::Other("save"));
    }
    fn restore(&mut self) {
        self.calls.push(DrawCall::Other("restore"));
    }
    fn translate(&mut self, x: f64, y: f64) {
        self.calls.push(DrawCall::Translate(x, y));
    }
    fn rotate(&mut self, _angle: f64) {
        self.calls.push(DrawCall::Other("rotate"));
    }
    fn scale(&mut self, _x: f64, _y: f64) {
        self.calls.push(DrawCall::Other("scale"));
    }
    fn begin_path(&mut self) {
        self.calls.push(DrawCall::Other("begin_path"));
    }
    fn move_to(&mut self, _x: f64, _y: f64) {}
    fn line_to(&mut self, _x: f64, _y: f64) {}
    fn quadratic_curve_to(&mut self, _cx: f64, _cy: f64, _x: f64, _y: f64) {}
    fn arc(&mut self, _x: f64, _y: f64, _r: f64, _start: f64, _end: f64) {
        self.calls.push(DrawCall::Other("arc"));
    }
    fn ellipse(&mut self, _x: f64, _y: f64, _rx: f64, _ry: f64, _rotation: f64) {
        self.calls.push(DrawCall::Other("ellipse"));
    }
    fn fill(&mut self) {
        self.calls.push(DrawCall::Other("fill"));
    }
    fn stroke(&mut self) {
        self.calls.push(DrawCall::Other("stroke"));
    }
    fn set_fill(&mut self, _paint: &Paint) {}
    fn set_stroke(&mut self, _color: &str) {}
    fn set_line_width(&mut self, _width: f64) {}
    fn set_shadow(&mut self, _color: &str, _blur: f64) {}
    fn set_global_alpha(&mut self, _alpha: f64) {}
    fn set_font(&mut self, _font: &str) {}
    fn set_text_align(&mut self, _align: &str) {}
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.calls.push(DrawCall::FillText { text: text.to_owned(), x, y });
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(DrawCall::FillRect(x, y, w, h));
    }
    fn clear_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {
        self.calls.push(DrawCall::Clear);
    }
}
