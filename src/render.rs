use crate::config::StyleConfig;
use crate::models::{ChartLayout, LabelPlacement, Metric, PlacedSample};
use crate::palette::rainbow;
use std::f64::consts::TAU;

const HEADER_HEIGHT: f64 = 80.0;
const POINTS_PER_INCH: f64 = 72.0;

/// Maps data space (origin at the chart centre, y up) onto SVG pixels.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
}

impl Viewport {
    pub fn new(style: &StyleConfig) -> Self {
        let width = style.width as f64;
        let plot_height = (style.height as f64 - HEADER_HEIGHT).max(1.0);
        let half = width.min(plot_height) / 2.0;
        Self {
            center_x: width / 2.0,
            center_y: HEADER_HEIGHT + plot_height / 2.0,
            scale: half / style.extent,
        }
    }

    pub fn to_px(&self, x: f64, y: f64) -> (f64, f64) {
        (self.center_x + x * self.scale, self.center_y - y * self.scale)
    }

    pub fn polar_px(&self, radius: f64, angle: f64) -> (f64, f64) {
        self.to_px(radius * angle.cos(), radius * angle.sin())
    }
}

pub fn points_to_px(points: f64, dpi: f64) -> f64 {
    points * dpi / POINTS_PER_INCH
}

/// Marker area is in square points; the circle diameter is its square root.
pub fn bubble_radius_px(marker_area: f64, dpi: f64) -> f64 {
    points_to_px(marker_area.max(0.0).sqrt() / 2.0, dpi)
}

pub fn render_svg(layout: &ChartLayout, style: &StyleConfig) -> String {
    let viewport = Viewport::new(style);
    let width = style.width;
    let height = style.height;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");

    svg.push_str(&header_svg(style));
    svg.push_str(&ring_svg(&viewport, style));
    for label in &layout.labels {
        svg.push_str(&label_svg(&viewport, label, style));
    }
    for sample in &layout.samples {
        svg.push_str(&bubble_svg(&viewport, sample, style));
    }
    svg.push_str(&legend_svg(style));

    svg.push_str("</svg>");
    tracing::debug!(
        bytes = svg.len(),
        bubbles = layout.samples.len(),
        labels = layout.labels.len(),
        "rendered svg"
    );
    svg
}

fn header_svg(style: &StyleConfig) -> String {
    let center = style.width as f64 / 2.0;
    let title_size = points_to_px(14.0, style.dpi);
    let subtitle_size = points_to_px(10.0, style.dpi);
    format!(
        "<text x=\"{center:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{title_size:.2}\" font-weight=\"bold\" fill=\"#000000\">{}</text>\
         <text x=\"{center:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{subtitle_size:.2}\" fill=\"#000000\">{}</text>",
        title_size + 8.0,
        escape_xml(&style.font_family),
        escape_xml(&style.title),
        title_size + subtitle_size + 20.0,
        escape_xml(&style.font_family),
        escape_xml(&style.subtitle),
    )
}

fn ring_svg(viewport: &Viewport, style: &StyleConfig) -> String {
    let mut ring = String::new();
    let radius_px = style.ring_radius * viewport.scale;
    let stroke_px = style.ring_thickness * viewport.scale;
    let segments = style.ring_segments;

    for idx in 0..segments {
        let theta_start = TAU * idx as f64 / segments as f64;
        let theta_end = TAU * (idx + 1) as f64 / segments as f64;
        let (x0, y0) = viewport.polar_px(style.ring_radius, theta_start);
        let (x1, y1) = viewport.polar_px(style.ring_radius, theta_end);
        let large_arc = u8::from(theta_end - theta_start > TAU / 2.0);
        let color = rainbow(idx as f64 / segments as f64).to_hex();
        ring.push_str(&format!(
            "<path d=\"M {x0:.2} {y0:.2} A {radius_px:.2} {radius_px:.2} 0 {large_arc} 0 {x1:.2} {y1:.2}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{stroke_px:.2}\" stroke-linecap=\"butt\"/>",
        ));
    }

    let (cx, cy) = viewport.to_px(0.0, 0.0);
    for edge in [-1.0, 1.0] {
        let border = (style.ring_radius + edge * style.ring_thickness / 2.0) * viewport.scale;
        ring.push_str(&format!(
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{border:.2}\" fill=\"none\" stroke=\"#000000\" stroke-width=\"1\"/>",
        ));
    }

    ring
}

fn label_svg(viewport: &Viewport, label: &LabelPlacement, style: &StyleConfig) -> String {
    let (x, y) = viewport.to_px(label.x, label.y);
    // SVG rotates clockwise with y pointing down.
    let rotation = -label.rotation_deg;
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{}\" dominant-baseline=\"middle\" transform=\"rotate({rotation:.2} {x:.2} {y:.2})\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"#000000\">{}</text>",
        label.anchor.as_svg(),
        escape_xml(&style.font_family),
        points_to_px(style.label_font_size, style.dpi),
        escape_xml(&label.text),
    )
}

fn bubble_svg(viewport: &Viewport, placed: &PlacedSample, style: &StyleConfig) -> String {
    let (cx, cy) = viewport.to_px(placed.x, placed.y);
    let radius = bubble_radius_px(placed.marker_area, style.dpi);
    let color = &placed.sample.color;
    format!(
        "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{radius:.2}\" fill=\"{color}\" stroke=\"{color}\" stroke-width=\"{:.2}\" opacity=\"{}\"><title>{} / {}: {}</title></circle>",
        points_to_px(style.bubble_stroke_width, style.dpi),
        style.bubble_opacity,
        escape_xml(&placed.sample.category),
        escape_xml(placed.sample.metric.label()),
        placed.sample.value,
    )
}

fn legend_svg(style: &StyleConfig) -> String {
    let font_size = points_to_px(style.label_font_size, style.dpi);
    let row_height = font_size + 10.0;
    let box_width = 180.0;
    let box_height = row_height * Metric::ALL.len() as f64 + 12.0;
    let left = style.width as f64 - box_width - 12.0;
    let top = HEADER_HEIGHT + 8.0;

    let mut legend = format!(
        "<g class=\"legend\"><rect x=\"{left:.2}\" y=\"{top:.2}\" width=\"{box_width:.2}\" height=\"{box_height:.2}\" rx=\"4\" ry=\"4\" fill=\"#ffffff\" fill-opacity=\"0.8\" stroke=\"#cccccc\" stroke-width=\"1\"/>",
    );
    for (idx, metric) in Metric::ALL.iter().enumerate() {
        let row_top = top + 6.0 + idx as f64 * row_height;
        let swatch = font_size;
        let text_x = left + 16.0 + swatch;
        let text_y = row_top + swatch / 2.0;
        legend.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{row_top:.2}\" width=\"{swatch:.2}\" height=\"{swatch:.2}\" fill=\"{}\"/>\
             <text x=\"{text_x:.2}\" y=\"{text_y:.2}\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{font_size:.2}\" fill=\"#000000\">{}</text>",
            left + 8.0,
            style.metric_color(*metric),
            escape_xml(&style.font_family),
            escape_xml(metric.label()),
        ));
    }
    legend.push_str("</g>");
    legend
}

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
