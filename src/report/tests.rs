use chrono::{DateTime, Duration, Utc};

use super::*;
use crate::models::{AttemptRecord, RawSimilarity};

fn ts(minutes: i64) -> String {
    let base = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    (base + Duration::minutes(minutes)).to_rfc3339()
}

fn threshold(value: f64) -> DisplayThreshold {
    DisplayThreshold::new(value).unwrap()
}

fn points(series: &[RealPoint]) -> Vec<(usize, f64)> {
    series.iter().map(|p| (p.x, p.y)).collect()
}

#[test]
fn test_end_to_end_scenario() {
    let records = vec![
        AttemptRecord::new("pass one", 0.95, ts(1), true),
        AttemptRecord::new("wrong", 0.40, ts(2), false),
        AttemptRecord::new("pass two", 1.2, ts(3), true),
    ];

    let view = ReportView::build(
        &records,
        ReportParams {
            window: DEFAULT_WINDOW,
            threshold: threshold(0.88),
        },
    );

    assert_eq!(points(&view.dataset.success_series), vec![(1, 0.95), (3, 1.0)]);
    assert_eq!(points(&view.dataset.failure_series), vec![(2, 0.40)]);
    assert_eq!(
        view.dataset.threshold_line,
        vec![
            ReferencePoint { x: 0, y: 0.88 },
            ReferencePoint { x: 4, y: 0.88 },
        ]
    );
}

#[test]
fn test_clamping_and_invalid_values() {
    let records = vec![
        AttemptRecord::new("low", -0.3, ts(1), false),
        AttemptRecord::new("high", 1.7, ts(2), true),
        AttemptRecord::new("nan", f64::NAN, ts(3), false),
        AttemptRecord::new("text", RawSimilarity::Text("abc".into()), ts(4), false),
        AttemptRecord::new("missing", RawSimilarity::Missing, ts(5), true),
    ];

    let window = normalize(&records, DEFAULT_WINDOW);
    let values: Vec<f64> = window.iter().map(|a| a.similarity).collect();
    assert_eq!(values, vec![0.0, 1.0, 0.0, 0.0, 0.0]);

    let flags: Vec<bool> = window.iter().map(|a| a.invalid_similarity).collect();
    assert_eq!(flags, vec![false, false, true, true, true]);
}

#[test]
fn test_invalid_flag_does_not_change_classification() {
    let records = vec![AttemptRecord::new("x", RawSimilarity::Missing, ts(1), true)];
    let view = ReportView::build(&records, ReportParams::default());

    assert_eq!(points(&view.dataset.success_series), vec![(1, 0.0)]);
    assert!(view.dataset.failure_series.is_empty());
    assert_eq!(view.summary.invalid_similarity, 1);
}

#[test]
fn test_sanitization_is_idempotent() {
    let records = vec![
        AttemptRecord::new("a", 0.12, ts(3), false),
        AttemptRecord::new("b", 1.3, ts(1), true),
        AttemptRecord::new("c", 0.99, ts(2), true),
        AttemptRecord::new("d", -2.0, ts(4), false),
    ];

    let first = normalize(&records, DEFAULT_WINDOW);
    let again: Vec<AttemptRecord> = first.iter().map(AttemptRecord::from).collect();
    let second = normalize(&again, DEFAULT_WINDOW);

    assert_eq!(first, second);
}

#[test]
fn test_in_range_values_are_unchanged() {
    let values = [0.0, 0.25, 0.5, 0.8812, 1.0];
    let records: Vec<AttemptRecord> = values
        .iter()
        .enumerate()
        .map(|(i, v)| AttemptRecord::new("x", *v, ts(i as i64), true))
        .collect();

    let window = normalize(&records, DEFAULT_WINDOW);
    let out: Vec<f64> = window.iter().map(|a| a.similarity).collect();
    assert_eq!(out, values.to_vec());
}

#[test]
fn test_window_keeps_most_recent_hundred() {
    // Reverse order so sorting actually has work to do
    let records: Vec<AttemptRecord> = (0..150)
        .rev()
        .map(|i| AttemptRecord::new(format!("attempt-{i}"), 0.5, ts(i), i % 2 == 0))
        .collect();

    let window = normalize(&records, DEFAULT_WINDOW);
    assert_eq!(window.len(), 100);
    assert_eq!(window.first().unwrap().input, "attempt-50");
    assert_eq!(window.last().unwrap().input, "attempt-149");

    let positions: Vec<usize> = window.iter().map(|a| a.position).collect();
    assert_eq!(positions, (1..=100).collect::<Vec<_>>());
}

#[test]
fn test_window_smaller_than_limit_keeps_all() {
    let records: Vec<AttemptRecord> = (0..7)
        .map(|i| AttemptRecord::new("x", 0.5, ts(i), true))
        .collect();
    assert_eq!(normalize(&records, DEFAULT_WINDOW).len(), 7);
    assert_eq!(normalize(&records, 3).len(), 3);
}

#[test]
fn test_output_is_chronological() {
    let offsets = [40, 3, 17, 3, 99, 0, 58, 21];
    let records: Vec<AttemptRecord> = offsets
        .iter()
        .map(|m| AttemptRecord::new("x", 0.7, ts(*m), false))
        .collect();

    let window = normalize(&records, DEFAULT_WINDOW);
    let stamps: Vec<DateTime<Utc>> = window
        .iter()
        .map(|a| crate::models::parse_timestamp(&a.timestamp).unwrap())
        .collect();

    assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_ties_and_unparseable_timestamps_keep_original_order() {
    let records = vec![
        AttemptRecord::new("late", 0.5, ts(10), true),
        AttemptRecord::new("tie-a", 0.5, ts(5), true),
        AttemptRecord::new("garbage-1", 0.5, "not a date", false),
        AttemptRecord::new("tie-b", 0.5, ts(5), false),
        AttemptRecord::new("garbage-2", 0.5, "", false),
    ];

    let order: Vec<String> = normalize(&records, DEFAULT_WINDOW)
        .into_iter()
        .map(|a| a.input)
        .collect();

    assert_eq!(order, vec!["garbage-1", "garbage-2", "tie-a", "tie-b", "late"]);
}

#[test]
fn test_partition_is_complete() {
    for n in [0usize, 1, 2, 37, 100, 180] {
        let records: Vec<AttemptRecord> = (0..n)
            .map(|i| AttemptRecord::new("x", 0.6, ts(i as i64), i % 3 == 0))
            .collect();

        let view = ReportView::build(&records, ReportParams::default());
        assert_eq!(
            view.dataset.success_series.len() + view.dataset.failure_series.len(),
            view.window.len()
        );
        assert!(view.dataset.success_series.iter().all(|p| p.passed));
        assert!(view.dataset.failure_series.iter().all(|p| !p.passed));
    }
}

#[test]
fn test_threshold_line_geometry() {
    for n in [1usize, 5, 100] {
        let records: Vec<AttemptRecord> = (0..n)
            .map(|i| AttemptRecord::new("x", 0.9, ts(i as i64), true))
            .collect();

        let window = normalize(&records, DEFAULT_WINDOW);
        let dataset = build_dataset(&window, threshold(0.73));
        assert_eq!(
            dataset.threshold_line,
            vec![
                ReferencePoint { x: 0, y: 0.73 },
                ReferencePoint { x: n + 1, y: 0.73 },
            ]
        );
    }
}

#[test]
fn test_empty_input_builds_empty_dataset() {
    let view = ReportView::build(&[], ReportParams::default());

    assert!(view.is_empty());
    assert!(view.dataset.success_series.is_empty());
    assert!(view.dataset.failure_series.is_empty());
    assert!(view.dataset.threshold_line.is_empty());
    assert_eq!(view.summary, ReportSummary::default());
}

#[test]
fn test_passed_is_never_recomputed() {
    // Verdicts disagree with the display threshold on purpose
    let records = vec![
        AttemptRecord::new("high but failed", 0.99, ts(1), false),
        AttemptRecord::new("low but passed", 0.51, ts(2), true),
    ];

    let view = ReportView::build(
        &records,
        ReportParams {
            window: DEFAULT_WINDOW,
            threshold: threshold(0.9),
        },
    );

    assert_eq!(points(&view.dataset.success_series), vec![(2, 0.51)]);
    assert_eq!(points(&view.dataset.failure_series), vec![(1, 0.99)]);
    assert_eq!(view.summary.successes, 1);
    assert_eq!(view.summary.at_or_above_threshold, 1);
}

#[test]
fn test_reference_points_are_distinguishable() {
    let records = vec![AttemptRecord::new("x", 0.9, ts(1), true)];
    let view = ReportView::build(&records, ReportParams::default());

    let kinds: Vec<bool> = view.dataset.plot_points().map(|p| p.is_reference()).collect();
    assert_eq!(kinds, vec![false, true, true]);
}

#[test]
fn test_summary_figures() {
    let records = vec![
        AttemptRecord::new("a", 0.9, ts(1), true),
        AttemptRecord::new("b", 0.5, ts(2), false),
        AttemptRecord::new("c", 0.7, ts(3), false),
        AttemptRecord::new("d", 1.0, ts(4), true),
    ];

    let summary = ReportView::build(
        &records,
        ReportParams {
            window: DEFAULT_WINDOW,
            threshold: threshold(0.88),
        },
    )
    .summary;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.successes, 2);
    assert_eq!(summary.failures, 2);
    assert_eq!(summary.at_or_above_threshold, 2);
    assert_eq!(summary.pass_rate, Some(0.5));
    let mean = summary.mean_similarity.unwrap();
    assert!((mean - 0.775).abs() < 1e-9);
}
