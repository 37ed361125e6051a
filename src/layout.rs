use crate::config::LayoutConfig;
use crate::dataset;
use crate::errors::{ChartError, ChartResult};
use crate::models::{
    Category, CategoryRow, ChartLayout, LabelPlacement, Metric, MetricSample, PlacedSample, TextAnchor,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

pub fn partition(names: &[String]) -> ChartResult<Vec<Category>> {
    if names.is_empty() {
        return Err(ChartError::EmptyLayout);
    }

    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ChartError::DuplicateCategory(name.clone()));
        }
    }

    let count = names.len() as f64;
    Ok(names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let start_angle = TAU * index as f64 / count;
            // The last wedge closes exactly on the full turn.
            let end_angle = if index + 1 == names.len() {
                TAU
            } else {
                TAU * (index + 1) as f64 / count
            };
            Category {
                index,
                name: name.clone(),
                start_angle,
                end_angle,
                mid_angle: (start_angle + end_angle) / 2.0,
            }
        })
        .collect())
}

pub fn metric_offset(metric: Metric, spread: f64) -> f64 {
    (metric.index() as f64 - Metric::center_index() as f64) * spread
}

pub fn marker_area(value: f64, scale: f64) -> f64 {
    value * scale
}

fn symmetric(rng: &mut StdRng, half_width: f64) -> f64 {
    if half_width > 0.0 {
        rng.random_range(-half_width..=half_width)
    } else {
        0.0
    }
}

/// Angles are drawn for every sample first, then radii, so the radius stream
/// does not shift when the angle jitter width changes.
pub fn place_samples(
    categories: &[Category],
    samples: &[MetricSample],
    config: &LayoutConfig,
    rng: &mut StdRng,
) -> ChartResult<Vec<PlacedSample>> {
    let mid_angles: HashMap<&str, f64> = categories
        .iter()
        .map(|category| (category.name.as_str(), category.mid_angle))
        .collect();

    let mut angles = Vec::with_capacity(samples.len());
    for sample in samples {
        let mid = mid_angles
            .get(sample.category.as_str())
            .copied()
            .ok_or_else(|| ChartError::UnknownCategory(sample.category.clone()))?;
        let jitter = symmetric(rng, config.angle_jitter);
        angles.push(mid + metric_offset(sample.metric, config.angle_spread) + jitter);
    }

    let placed = samples
        .iter()
        .zip(angles)
        .map(|(sample, angle)| {
            let radius = config.radius_base + symmetric(rng, config.radius_jitter);
            PlacedSample {
                sample: sample.clone(),
                angle,
                radius,
                x: radius * angle.cos(),
                y: radius * angle.sin(),
                marker_area: marker_area(sample.value, config.marker_scale),
            }
        })
        .collect();

    Ok(placed)
}

/// Samples whose final angle left their category's wedge, e.g. when the
/// configured spread is wide relative to the number of categories.
pub fn overflowing_samples<'a>(categories: &[Category], placed: &'a [PlacedSample]) -> Vec<&'a PlacedSample> {
    let wedges: HashMap<&str, &Category> = categories
        .iter()
        .map(|category| (category.name.as_str(), category))
        .collect();

    placed
        .iter()
        .filter(|sample| {
            wedges
                .get(sample.sample.category.as_str())
                .is_some_and(|category| !category.contains(sample.angle))
        })
        .collect()
}

pub fn label_orientation(angle: f64) -> (f64, TextAnchor) {
    let degrees = angle.to_degrees();
    if degrees > 90.0 && degrees < 270.0 {
        (degrees + 180.0, TextAnchor::End)
    } else {
        (degrees, TextAnchor::Start)
    }
}

pub fn place_labels(categories: &[Category], label_radius: f64) -> Vec<LabelPlacement> {
    categories
        .iter()
        .map(|category| {
            let (rotation_deg, anchor) = label_orientation(category.mid_angle);
            LabelPlacement {
                text: category.name.clone(),
                x: label_radius * category.mid_angle.cos(),
                y: label_radius * category.mid_angle.sin(),
                rotation_deg,
                anchor,
            }
        })
        .collect()
}

pub fn compute_layout(rows: &[CategoryRow], config: &LayoutConfig, seed: u64) -> ChartResult<ChartLayout> {
    dataset::validate(rows)?;
    let categories = partition(&dataset::category_names(rows))?;
    let samples = dataset::unpivot(rows);

    let mut rng = StdRng::seed_from_u64(seed);
    let placed = place_samples(&categories, &samples, config, &mut rng)?;
    let labels = place_labels(&categories, config.label_radius);

    for sample in overflowing_samples(&categories, &placed) {
        tracing::warn!(
            category = %sample.sample.category,
            metric = sample.sample.metric.label(),
            angle = sample.angle,
            wedge_width = categories[0].width(),
            "sample placed outside its wedge"
        );
    }

    tracing::debug!(
        categories = categories.len(),
        samples = placed.len(),
        seed,
        "computed radial layout"
    );

    Ok(ChartLayout {
        seed,
        categories,
        samples: placed,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        compute_layout, label_orientation, marker_area, metric_offset, overflowing_samples, partition, place_labels,
        place_samples,
    };
    use crate::config::LayoutConfig;
    use crate::dataset::sample_table;
    use crate::errors::ChartError;
    use crate::models::{CategoryRow, Metric, MetricSample, TextAnchor};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::{PI, TAU};

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|idx| format!("cat-{}", idx)).collect()
    }

    #[test]
    fn six_categories_get_sixty_degree_wedges() {
        let categories = partition(&names(6)).expect("partition");
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0].start_angle, 0.0);
        assert!((categories[0].end_angle.to_degrees() - 60.0).abs() < 1e-9);
        assert!((categories[0].mid_angle.to_degrees() - 30.0).abs() < 1e-9);
        for category in &categories {
            assert!((category.width().to_degrees() - 60.0).abs() < 1e-9);
        }
        assert!(categories[0].contains(0.0));
        assert!(!categories[0].contains(PI / 3.0));
    }

    #[test]
    fn empty_partition_is_rejected() {
        assert!(matches!(partition(&[]), Err(ChartError::EmptyLayout)));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let names = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert!(matches!(partition(&names), Err(ChartError::DuplicateCategory(_))));
    }

    #[test]
    fn metric_offsets_center_on_middle_metric() {
        assert!((metric_offset(Metric::DailyUse, 0.12) + 0.24).abs() < 1e-12);
        assert_eq!(metric_offset(Metric::Response, 0.12), 0.0);
        assert!((metric_offset(Metric::Influence, 0.12) - 0.24).abs() < 1e-12);
    }

    #[test]
    fn label_rule_flips_left_half() {
        let (rotation, anchor) = label_orientation(PI / 6.0);
        assert!((rotation - 30.0).abs() < 1e-9);
        assert_eq!(anchor, TextAnchor::Start);

        let (rotation, anchor) = label_orientation(5.0 * PI / 6.0);
        assert!((rotation - 330.0).abs() < 1e-9);
        assert_eq!(anchor, TextAnchor::End);

        let (rotation, anchor) = label_orientation(3.0 * PI / 2.0 + 0.1);
        assert!((rotation - (270.0 + 0.1_f64.to_degrees())).abs() < 1e-9);
        assert_eq!(anchor, TextAnchor::Start);

        let (rotation, anchor) = label_orientation(0.0);
        assert_eq!(rotation, 0.0);
        assert_eq!(anchor, TextAnchor::Start);
    }

    #[test]
    fn label_rule_keeps_vertical_axis_unflipped() {
        let (rotation, anchor) = label_orientation(PI / 2.0);
        assert!((rotation - 90.0).abs() < 1e-9);
        assert_eq!(anchor, TextAnchor::Start);

        let (rotation, anchor) = label_orientation(3.0 * PI / 2.0);
        assert!((rotation - 270.0).abs() < 1e-9);
        assert_eq!(anchor, TextAnchor::Start);

        let categories = partition(&names(6)).expect("partition");
        let labels = place_labels(&categories, 1.15);
        assert!((labels[1].rotation_deg - 90.0).abs() < 1e-9);
        assert_eq!(labels[1].anchor, TextAnchor::Start);
        assert!((labels[3].rotation_deg - 390.0).abs() < 1e-9);
        assert_eq!(labels[3].anchor, TextAnchor::End);
        assert!((labels[4].rotation_deg - 270.0).abs() < 1e-9);
        assert_eq!(labels[4].anchor, TextAnchor::Start);
    }

    #[test]
    fn labels_sit_on_label_radius() {
        let categories = partition(&names(6)).expect("partition");
        let labels = place_labels(&categories, 1.15);
        assert_eq!(labels.len(), 6);
        for label in &labels {
            let radius = (label.x * label.x + label.y * label.y).sqrt();
            assert!((radius - 1.15).abs() < 1e-9);
        }
        assert_eq!(labels[0].anchor, TextAnchor::Start);
        assert_eq!(labels[1].anchor, TextAnchor::Start);
        assert_eq!(labels[2].anchor, TextAnchor::End);
        assert_eq!(labels[3].anchor, TextAnchor::End);
        assert_eq!(labels[4].anchor, TextAnchor::Start);
        assert_eq!(labels[5].anchor, TextAnchor::Start);
    }

    #[test]
    fn samples_stay_near_their_wedge_midpoint() {
        let config = LayoutConfig::default();
        let layout = compute_layout(&sample_table(), &config, 42).expect("layout");
        let bound = 2.0 * config.angle_spread + config.angle_jitter + 1e-12;
        for placed in &layout.samples {
            let category = layout
                .categories
                .iter()
                .find(|category| category.name == placed.sample.category)
                .expect("sample category exists");
            assert!((placed.angle - category.mid_angle).abs() <= bound);
            assert!(category.contains(placed.angle));
            assert!((placed.radius - config.radius_base).abs() <= config.radius_jitter + 1e-12);
            let projected = (placed.x.hypot(placed.y) - placed.radius).abs();
            assert!(projected < 1e-9);
        }
    }

    #[test]
    fn metrics_keep_their_relative_order_inside_a_wedge() {
        let layout = compute_layout(&sample_table(), &LayoutConfig::default(), 3).expect("layout");
        for category in &layout.categories {
            let mut in_wedge: Vec<_> = layout
                .samples
                .iter()
                .filter(|placed| placed.sample.category == category.name)
                .collect();
            in_wedge.sort_by_key(|placed| placed.sample.metric.index());
            for pair in in_wedge.windows(2) {
                assert!(pair[0].angle < pair[1].angle);
            }
        }
    }

    #[test]
    fn wide_spread_is_reported_as_overflow() {
        let config = LayoutConfig::default();
        let layout = compute_layout(&sample_table(), &config, 42).expect("layout");
        assert!(overflowing_samples(&layout.categories, &layout.samples).is_empty());

        let wide = LayoutConfig {
            angle_spread: 0.4,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&sample_table(), &wide, 42).expect("layout still builds");
        let overflow = overflowing_samples(&layout.categories, &layout.samples);
        // Offsets of +-0.8 rad leave a 60 degree wedge for the outer two metrics only.
        assert_eq!(overflow.len(), 12);
        assert!(overflow
            .iter()
            .all(|placed| matches!(placed.sample.metric, Metric::DailyUse | Metric::Influence)));
    }

    #[test]
    fn same_seed_is_deterministic() {
        let rows = sample_table();
        let config = LayoutConfig::default();
        let first = compute_layout(&rows, &config, 42).expect("first layout");
        let second = compute_layout(&rows, &config, 42).expect("second layout");
        assert_eq!(first, second);

        let other = compute_layout(&rows, &config, 43).expect("other layout");
        assert_ne!(first.samples, other.samples);
    }

    #[test]
    fn missing_metric_produces_no_sample() {
        let rows = vec![
            CategoryRow::new("A", &[(Metric::DailyUse, 1.0), (Metric::Response, 5.0)]),
            CategoryRow::new("B", &[(Metric::Response, 2.0)]),
        ];
        let layout = compute_layout(&rows, &LayoutConfig::default(), 1).expect("layout");
        assert_eq!(layout.samples.len(), 3);
        assert_eq!(layout.labels.len(), 2);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let categories = partition(&names(2)).expect("partition");
        let samples = vec![MetricSample {
            category: "missing".to_string(),
            metric: Metric::DailyUse,
            value: 1.0,
            color: Metric::DailyUse.color().to_string(),
        }];
        let mut rng = StdRng::seed_from_u64(0);
        let err = place_samples(&categories, &samples, &LayoutConfig::default(), &mut rng)
            .expect_err("unknown category");
        assert!(matches!(err, ChartError::UnknownCategory(name) if name == "missing"));
    }

    #[test]
    fn zero_jitter_is_exact() {
        let config = LayoutConfig {
            angle_jitter: 0.0,
            radius_jitter: 0.0,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&sample_table(), &config, 9).expect("layout");
        let first = &layout.samples[0];
        assert!((first.angle - (PI / 6.0 - 0.24)).abs() < 1e-12);
        assert_eq!(first.radius, 0.92);
    }

    #[test]
    fn larger_values_get_larger_markers() {
        assert_eq!(marker_area(150.0, 26.0), 3900.0);
        assert!(marker_area(7.0, 26.0) < marker_area(7.5, 26.0));
    }

    proptest! {
        #[test]
        fn wedges_tile_the_full_turn(count in 1usize..64) {
            let categories = partition(&names(count)).expect("partition");
            prop_assert_eq!(categories.len(), count);
            prop_assert_eq!(categories[0].start_angle, 0.0);
            prop_assert_eq!(categories[count - 1].end_angle, TAU);
            let expected = TAU / count as f64;
            let mut total = 0.0;
            for (idx, category) in categories.iter().enumerate() {
                prop_assert!((category.width() - expected).abs() < 1e-9);
                if idx > 0 {
                    prop_assert_eq!(categories[idx - 1].end_angle, category.start_angle);
                }
                total += category.width();
            }
            prop_assert!((total - TAU).abs() < 1e-9);
        }

        #[test]
        fn marker_area_is_strictly_increasing(a in 0.0f64..1e6, delta in 1e-3f64..1e3) {
            prop_assert!(marker_area(a, 26.0) < marker_area(a + delta, 26.0));
        }
    }
}
