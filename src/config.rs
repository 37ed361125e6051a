use crate::errors::{ChartError, ChartResult};
use crate::models::Metric;
use crate::palette::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub angle_spread: f64,
    pub angle_jitter: f64,
    pub radius_base: f64,
    pub radius_jitter: f64,
    pub label_radius: f64,
    pub marker_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            angle_spread: 0.12,
            angle_jitter: 0.003,
            radius_base: 0.92,
            radius_jitter: 0.06,
            label_radius: 1.15,
            marker_scale: 26.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct StyleConfig {
    pub width: u32,
    pub height: u32,
    pub dpi: f64,
    /// Data-space radius mapped onto half of the plot area.
    pub extent: f64,
    pub ring_radius: f64,
    pub ring_thickness: f64,
    pub ring_segments: usize,
    pub bubble_opacity: f64,
    pub bubble_stroke_width: f64,
    pub font_family: String,
    pub label_font_size: f64,
    pub title: String,
    pub subtitle: String,
    /// `#rrggbb` overrides of the built-in bubble color per metric.
    pub metric_colors: BTreeMap<Metric, String>,
}

impl StyleConfig {
    pub fn metric_color(&self, metric: Metric) -> &str {
        self.metric_colors
            .get(&metric)
            .map(String::as_str)
            .unwrap_or_else(|| metric.color())
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            dpi: 100.0,
            extent: 1.6,
            ring_radius: 1.1,
            ring_thickness: 0.055,
            ring_segments: 100,
            bubble_opacity: 0.85,
            bubble_stroke_width: 0.5,
            font_family: "DejaVu Sans, Helvetica, Arial, sans-serif".to_string(),
            label_font_size: 10.0,
            title: "Comparativo de desempeño de aplicaciones móviles según métricas clave".to_string(),
            subtitle: "Tamaño de burbuja proporcional al desempeño por métrica (más grande = mejor)".to_string(),
            metric_colors: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ChartConfig {
    pub seed: u64,
    pub layout: LayoutConfig,
    pub style: StyleConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            layout: LayoutConfig::default(),
            style: StyleConfig::default(),
        }
    }
}

impl ChartConfig {
    pub fn load(path: &Path) -> ChartResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(|value| value.to_ascii_lowercase());
        let config: Self = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)?,
            Some("json") => serde_json::from_str(&raw).map_err(|error| ChartError::Config(error.to_string()))?,
            _ => {
                return Err(ChartError::Config(format!(
                    "unsupported config format: {}",
                    path.display()
                )))
            }
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), seed = config.seed, "loaded chart config");
        Ok(config)
    }

    pub fn validate(&self) -> ChartResult<()> {
        let layout = &self.layout;
        let style = &self.style;

        let non_negative = [
            ("angleSpread", layout.angle_spread),
            ("angleJitter", layout.angle_jitter),
            ("radiusJitter", layout.radius_jitter),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::Config(format!("{} must be finite and >= 0, got {}", name, value)));
            }
        }

        let positive = [
            ("radiusBase", layout.radius_base),
            ("labelRadius", layout.label_radius),
            ("markerScale", layout.marker_scale),
            ("dpi", style.dpi),
            ("extent", style.extent),
            ("ringRadius", style.ring_radius),
            ("ringThickness", style.ring_thickness),
            ("labelFontSize", style.label_font_size),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::Config(format!("{} must be finite and > 0, got {}", name, value)));
            }
        }

        if style.width == 0 || style.height == 0 {
            return Err(ChartError::Config("canvas width and height must be > 0".to_string()));
        }
        if style.ring_segments < 2 {
            return Err(ChartError::Config("ringSegments must be >= 2".to_string()));
        }
        if !(style.bubble_opacity > 0.0 && style.bubble_opacity <= 1.0) {
            return Err(ChartError::Config(format!(
                "bubbleOpacity must be in (0, 1], got {}",
                style.bubble_opacity
            )));
        }
        if !style.bubble_stroke_width.is_finite() || style.bubble_stroke_width < 0.0 {
            return Err(ChartError::Config("bubbleStrokeWidth must be >= 0".to_string()));
        }
        if layout.radius_jitter >= layout.radius_base {
            return Err(ChartError::Config("radiusJitter must be smaller than radiusBase".to_string()));
        }
        for (metric, color) in &style.metric_colors {
            Rgb::from_hex(color)
                .map_err(|error| ChartError::Config(format!("metricColors.{}: {}", metric.label(), error)))?;
        }

        Ok(())
    }
}
