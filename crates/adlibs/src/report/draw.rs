//! Vector drawing primitives on a PDF layer.
//!
//! Coordinates are millimetres from the bottom-left corner of the page, as
//! printpdf expects.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{Color, IndirectFontRef, Line, Mm, PdfLayerReference, Point, Polygon, Rgb};

/// Millimetres per typographic point.
const MM_PER_PT: f32 = 0.3528;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// An sRGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint(pub f32, pub f32, pub f32);

impl Paint {
    pub const BLACK: Self = Self(0.0, 0.0, 0.0);
    pub const GREY: Self = Self(0.5, 0.5, 0.5);
    pub const WHITESMOKE: Self = Self(0.96, 0.96, 0.96);
    pub const BEIGE: Self = Self(0.96, 0.96, 0.86);

    /// Parse a CSS `rgb(r, g, b)` string.
    pub fn from_css(css: &str) -> Option<Self> {
        let inner = css.trim().strip_prefix("rgb(")?.strip_suffix(')')?;
        let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
        let (r, g, b) = (parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
        if parts.next().is_some() {
            return None;
        }
        Some(Self(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ))
    }

    fn color(self) -> Color {
        Color::Rgb(Rgb::new(self.0, self.1, self.2, None))
    }
}

/// A rectangle on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn corners(self) -> Vec<(Point, bool)> {
        let Self {
            x,
            y,
            width,
            height,
        } = self;
        [(x, y), (x + width, y), (x + width, y + height), (x, y + height)]
            .into_iter()
            .map(|(px, py)| (point(px, py), false))
            .collect()
    }
}

fn point(x: f32, y: f32) -> Point {
    Point::new(Mm(x), Mm(y))
}

/// Approximate rendered width of `text`.
#[allow(clippy::cast_precision_loss)]
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_WIDTH * MM_PER_PT
}

/// A page layer with the report fonts.
#[derive(Debug, Clone)]
pub struct Canvas {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Canvas {
    pub fn new(layer: PdfLayerReference, regular: IndirectFontRef, bold: IndirectFontRef) -> Self {
        Self {
            layer,
            regular,
            bold,
        }
    }

    pub fn text(&self, text: &str, size: f32, x: f32, y: f32, color: Paint) {
        self.layer.set_fill_color(color.color());
        self.layer.use_text(text, size, Mm(x), Mm(y), &self.regular);
    }

    pub fn bold_text(&self, text: &str, size: f32, x: f32, y: f32, color: Paint) {
        self.layer.set_fill_color(color.color());
        self.layer.use_text(text, size, Mm(x), Mm(y), &self.bold);
    }

    /// Text horizontally centered on `center_x`.
    pub fn centered_text(&self, text: &str, size: f32, center_x: f32, y: f32, bold: bool) {
        let x = center_x - text_width(text, size) / 2.0;
        if bold {
            self.bold_text(text, size, x, y, Paint::BLACK);
        } else {
            self.text(text, size, x, y, Paint::BLACK);
        }
    }

    pub fn fill_rect(&self, area: Area, color: Paint) {
        self.fill_polygon(area.corners(), color);
    }

    pub fn stroke_rect(&self, area: Area, color: Paint, thickness: f32) {
        self.layer.set_outline_color(color.color());
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: area.corners(),
            is_closed: true,
        });
    }

    pub fn line(&self, points: &[(f32, f32)], color: Paint, thickness: f32) {
        if points.len() < 2 {
            return;
        }
        self.layer.set_outline_color(color.color());
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: points.iter().map(|&(x, y)| (point(x, y), false)).collect(),
            is_closed: false,
        });
    }

    fn fill_polygon(&self, ring: Vec<(Point, bool)>, color: Paint) {
        self.layer.set_fill_color(color.color());
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }
}
