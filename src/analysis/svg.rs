//! Minimal SVG drawing primitives for the plot generator.
//!
//! Only what the charts need: rectangles, lines, polylines, markers, text and
//! a data-space panel with linear axes.

/// Series colours, cycled by index
pub const PALETTE: &[&str] = &[
    "#1565C0", "#C62828", "#2E7D32", "#F57C00", "#6A1B9A", "#00838F", "#AD1457", "#4E342E",
];

pub fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Escape text for XML/HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// An SVG document under construction
pub struct SvgDocument {
    width: f64,
    height: f64,
    body: Vec<String>,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        let mut doc = Self {
            width,
            height,
            body: Vec::new(),
        };
        doc.rect(0.0, 0.0, width, height, "#ffffff", None);
        doc
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str, stroke: Option<&str>) {
        let stroke = stroke
            .map(|s| format!(" stroke=\"{}\" stroke-width=\"1\"", s))
            .unwrap_or_default();
        self.body.push(format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"{}/>",
            x,
            y,
            width.max(0.0),
            height.max(0.0),
            fill,
            stroke
        ));
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        self.body.push(format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            x1, y1, x2, y2, stroke, width
        ));
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: &str) {
        if points.is_empty() {
            return;
        }
        let coords: Vec<String> = points.iter().map(|(x, y)| format!("{:.2},{:.2}", x, y)).collect();
        self.body.push(format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>",
            coords.join(" "),
            stroke
        ));
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        self.body.push(format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>",
            cx, cy, r, fill
        ));
    }

    pub fn text(&mut self, x: f64, y: f64, text: &str, size: f64, anchor: Anchor) {
        self.body.push(format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"Arial, sans-serif\" font-size=\"{}\" text-anchor=\"{}\">{}</text>",
            x,
            y,
            size,
            anchor.as_str(),
            escape(text)
        ));
    }

    pub fn finish(self) -> String {
        let mut out = Vec::with_capacity(self.body.len() + 3);
        out.push("<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string());
        out.push(format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height
        ));
        out.extend(self.body);
        out.push("</svg>".to_string());
        out.join("\n")
    }
}

/// Closed value range of one axis; never zero-width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Range spanning the finite values; constant data is padded so the
    /// axis keeps a non-zero width, and no data yields `0..1`
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if !min.is_finite() || !max.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        Self { min, max }.padded()
    }

    /// Widen a degenerate range around its value
    fn padded(self) -> Self {
        let span = self.max - self.min;
        if span > f64::EPSILON * self.max.abs().max(1.0) {
            return self;
        }
        let pad = if self.min == 0.0 { 1.0 } else { self.min.abs() * 0.05 };
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Extend the range so it contains zero (bar charts)
    pub fn including_zero(self) -> Self {
        Self {
            min: self.min.min(0.0),
            max: self.max.max(0.0),
        }
        .padded()
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Fraction of the range covered by `value`, 0 at min and 1 at max
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    /// `count + 1` evenly spaced tick values from min to max
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let count = count.max(1);
        (0..=count)
            .map(|i| self.min + self.span() * i as f64 / count as f64)
            .collect()
    }
}

/// Format a tick label compactly
pub fn tick_label(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-3..1e5).contains(&magnitude) {
        format!("{:.2e}", value)
    } else if magnitude >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.3}", value)
    }
}

/// A plotting area mapped onto data coordinates
pub struct Panel {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
}

impl Panel {
    pub fn px(&self, value: f64) -> f64 {
        self.x + self.x_range.fraction(value) * self.width
    }

    pub fn py(&self, value: f64) -> f64 {
        self.y + self.height - self.y_range.fraction(value) * self.height
    }

    /// Frame, horizontal grid, y tick labels, title and y label
    pub fn draw_frame(&self, doc: &mut SvgDocument, title: &str, y_label: &str) {
        doc.rect(self.x, self.y, self.width, self.height, "#fafafa", Some("#9e9e9e"));

        for tick in self.y_range.ticks(4) {
            let y = self.py(tick);
            doc.line(self.x, y, self.x + self.width, y, "#e0e0e0", 0.5);
            doc.text(self.x - 6.0, y + 4.0, &tick_label(tick), 10.0, Anchor::End);
        }

        doc.text(self.x + self.width / 2.0, self.y - 8.0, title, 13.0, Anchor::Middle);
        doc.text(self.x - 48.0, self.y + self.height / 2.0, y_label, 11.0, Anchor::Middle);
    }

    /// Frame plus a numeric x axis
    pub fn draw_axes(&self, doc: &mut SvgDocument, title: &str, x_label: &str, y_label: &str) {
        self.draw_frame(doc, title, y_label);
        for tick in self.x_range.ticks(4) {
            let x = self.px(tick);
            doc.text(x, self.y + self.height + 14.0, &tick_label(tick), 10.0, Anchor::Middle);
        }
        doc.text(self.x + self.width / 2.0, self.y + self.height + 30.0, x_label, 11.0, Anchor::Middle);
    }
}
