use crate::errors::{ChartError, ChartResult};
use crate::models::{CategoryRow, Metric, MetricSample};
use std::collections::HashSet;

use crate::models::Metric::{DailyUse, Influence, Interaction, Response, Retention};

pub fn sample_table() -> Vec<CategoryRow> {
    vec![
        CategoryRow::new(
            "OTAs",
            &[(DailyUse, 7.0), (Interaction, 22.8), (Response, 10.0), (Retention, 18.0), (Influence, 60.0)],
        ),
        CategoryRow::new(
            "Aerolíneas",
            &[(DailyUse, 6.0), (Interaction, 22.8), (Response, 10.0), (Retention, 18.0), (Influence, 50.0)],
        ),
        CategoryRow::new(
            "Noticias",
            &[(DailyUse, 18.0), (Interaction, 41.0), (Response, 95.0), (Retention, 40.0), (Influence, 40.0)],
        ),
        CategoryRow::new(
            "Banca",
            &[(DailyUse, 12.0), (Interaction, 38.0), (Response, 90.0), (Retention, 45.0), (Influence, 20.0)],
        ),
        CategoryRow::new(
            "Redes Sociales",
            &[(DailyUse, 44.0), (Interaction, 67.0), (Response, 50.0), (Retention, 65.0), (Influence, 58.0)],
        ),
        CategoryRow::new(
            "Apps Gamificadas",
            &[(DailyUse, 25.0), (Interaction, 150.0), (Response, 60.0), (Retention, 50.0), (Influence, 55.0)],
        ),
    ]
}

pub fn category_names(rows: &[CategoryRow]) -> Vec<String> {
    rows.iter().map(|row| row.name.clone()).collect()
}

pub fn validate(rows: &[CategoryRow]) -> ChartResult<()> {
    if rows.is_empty() {
        return Err(ChartError::EmptyLayout);
    }

    let mut seen = HashSet::new();
    for row in rows {
        if !seen.insert(row.name.as_str()) {
            return Err(ChartError::DuplicateCategory(row.name.clone()));
        }
        for (metric, value) in &row.values {
            if !value.is_finite() || *value < 0.0 {
                return Err(ChartError::InvalidValue(format!(
                    "{} / {} = {}",
                    row.name,
                    metric.label(),
                    value
                )));
            }
        }
    }

    Ok(())
}

/// Melts the wide table into one sample per (category, metric), metric-major.
/// Missing values produce no sample.
pub fn unpivot(rows: &[CategoryRow]) -> Vec<MetricSample> {
    Metric::ALL
        .iter()
        .flat_map(|metric| {
            rows.iter().filter_map(move |row| {
                row.value(*metric).map(|value| MetricSample {
                    category: row.name.clone(),
                    metric: *metric,
                    value,
                    color: metric.color().to_string(),
                })
            })
        })
        .collect()
}
