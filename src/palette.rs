use crate::errors::{ChartError, ChartResult};
use crate::models::Metric;
use once_cell::sync::Lazy;
use regex::Regex;
use std::f64::consts::PI;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn from_hex(value: &str) -> ChartResult<Self> {
        let caps = HEX_COLOR
            .captures(value.trim())
            .ok_or_else(|| ChartError::InvalidValue(format!("not a #rrggbb color: {}", value)))?;
        let channel = |idx: usize| {
            u8::from_str_radix(&caps[idx], 16).map_err(|error| ChartError::Internal(error.to_string()))
        };
        Ok(Self {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
        })
    }

    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Metric {
    pub fn color(self) -> &'static str {
        match self {
            Self::DailyUse => "#f06595",
            Self::Interaction => "#fcc419",
            Self::Response => "#20c997",
            Self::Retention => "#5c7cfa",
            Self::Influence => "#adb5bd",
        }
    }
}

/// gnuplot-style rainbow colormap sampled at `t` in [0, 1].
pub fn rainbow(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let r = (2.0 * t - 0.5).abs();
    let g = (PI * t).sin();
    let b = (PI * t / 2.0).cos();
    Rgb::from_unit(r, g, b)
}
