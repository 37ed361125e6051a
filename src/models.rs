use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    DailyUse,
    Interaction,
    Response,
    Retention,
    Influence,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::DailyUse,
        Metric::Interaction,
        Metric::Response,
        Metric::Retention,
        Metric::Influence,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::DailyUse => 0,
            Self::Interaction => 1,
            Self::Response => 2,
            Self::Retention => 3,
            Self::Influence => 4,
        }
    }

    /// Index of the metric that sits on the wedge midpoint.
    pub fn center_index() -> usize {
        (Self::ALL.len() - 1) / 2
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DailyUse => "Uso diario",
            Self::Interaction => "Interacción",
            Self::Response => "Respuesta",
            Self::Retention => "Retención",
            Self::Influence => "Influencia",
        }
    }
}

/// One row of the wide table: a category and its value per metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub name: String,
    pub values: BTreeMap<Metric, f64>,
}

impl CategoryRow {
    pub fn new(name: impl Into<String>, values: &[(Metric, f64)]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().copied().collect(),
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub index: usize,
    pub name: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub mid_angle: f64,
}

impl Category {
    pub fn width(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub category: String,
    pub metric: Metric,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedSample {
    pub sample: MetricSample,
    pub angle: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
    pub marker_area: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPlacement {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub rotation_deg: f64,
    pub anchor: TextAnchor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub seed: u64,
    pub categories: Vec<Category>,
    pub samples: Vec<PlacedSample>,
    pub labels: Vec<LabelPlacement>,
}
