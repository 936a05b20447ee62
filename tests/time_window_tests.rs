//! Unit tests for the time-window policy and the route evaluator.

use tsptw_ga::time_windows::{RouteEvaluator, TimeWindow};
use tsptw_ga::utils::{format_clock, format_duration};

fn default_window() -> TimeWindow {
    TimeWindow::new(9.0, 21.0)
}

#[test]
fn test_waiting_before_opening() {
    let window = default_window();

    // Arriving at 07:30 waits until opening.
    assert!((window.waiting_time(7.5) - 1.5).abs() < 1e-9);
}

#[test]
fn test_waiting_after_closing_rolls_to_next_day() {
    let window = default_window();

    // Arriving at 22:00 waits through the night until 09:00.
    assert!((window.waiting_time(22.0) - 11.0).abs() < 1e-9);
}

#[test]
fn test_no_waiting_within_window() {
    let window = default_window();

    assert_eq!(window.waiting_time(9.0), 0.0);
    assert_eq!(window.waiting_time(15.25), 0.0);
    assert_eq!(window.waiting_time(21.0), 0.0);
}

#[test]
fn test_waiting_normalizes_multi_day_arrivals() {
    let window = default_window();

    // 31.5 hours is 07:30 on the second day.
    assert!((window.waiting_time(31.5) - 1.5).abs() < 1e-9);
}

#[test]
fn test_penalty_late_arrival() {
    let window = default_window();

    // One hour past closing at weight 100.
    assert!((window.penalty(22.0, 100.0) - 100.0).abs() < 1e-9);
}

#[test]
fn test_penalty_early_arrival_half_weight() {
    let window = default_window();

    // Two hours early at weight 100, charged at half weight.
    assert!((window.penalty(7.0, 100.0) - 100.0).abs() < 1e-9);
}

#[test]
fn test_penalty_zero_within_window() {
    let window = default_window();

    assert_eq!(window.penalty(9.0, 100.0), 0.0);
    assert_eq!(window.penalty(21.0, 100.0), 0.0);
    assert_eq!(window.penalty(12.0, 100.0), 0.0);
}

#[test]
fn test_is_within_window_boundaries() {
    let window = default_window();

    assert!(window.is_within_window(9.0));
    assert!(window.is_within_window(21.0));
    assert!(!window.is_within_window(8.99));
    assert!(!window.is_within_window(21.01));

    // Next-day arrival at 09:00.
    assert!(window.is_within_window(33.0));
}

fn evaluator(start_time: f64) -> RouteEvaluator {
    RouteEvaluator::new(default_window(), 0, start_time, 100.0)
}

#[test]
fn test_evaluate_accrues_waiting_for_early_arrival() {
    // One leg of 22.5 hours: departure at 09:00 lands at 07:30 the next day.
    let matrix = vec![vec![0.0, 22.5], vec![22.5, 0.0]];
    let result = evaluator(9.0).evaluate(&[0, 1], &matrix);

    assert!((result.travel_time - 22.5).abs() < 1e-9);
    assert!((result.waiting_time - 1.5).abs() < 1e-9);
    assert_eq!(result.penalty, 0.0);
    assert!((result.total_time - 24.0).abs() < 1e-9);
}

#[test]
fn test_evaluate_without_waiting_exposes_early_penalty() {
    // Same early arrival, but with waiting disabled the reduced
    // early-arrival penalty branch is live.
    let matrix = vec![vec![0.0, 22.5], vec![22.5, 0.0]];
    let result = evaluator(9.0).evaluate_with(&[0, 1], &matrix, false, true);

    assert!((result.travel_time - 22.5).abs() < 1e-9);
    assert_eq!(result.waiting_time, 0.0);
    assert!((result.penalty - 75.0).abs() < 1e-9);
    assert!((result.total_time - 97.5).abs() < 1e-9);
}

#[test]
fn test_evaluate_late_arrival_penalty_after_wait() {
    // A 13-hour leg from a 09:00 departure arrives at 22:00: the traveler
    // waits 11 hours for the next opening, and the penalty is charged from
    // the wait-adjusted clock (09:00, inside the window), so none accrues.
    let matrix = vec![vec![0.0, 13.0], vec![13.0, 0.0]];
    let result = evaluator(9.0).evaluate(&[0, 1], &matrix);

    assert!((result.travel_time - 13.0).abs() < 1e-9);
    assert!((result.waiting_time - 11.0).abs() < 1e-9);
    assert_eq!(result.penalty, 0.0);
}

#[test]
fn test_evaluate_late_arrival_penalty_without_waiting() {
    let matrix = vec![vec![0.0, 13.0], vec![13.0, 0.0]];
    let result = evaluator(9.0).evaluate_with(&[0, 1], &matrix, false, true);

    // 22:00 arrival, one hour past closing at weight 100.
    assert_eq!(result.waiting_time, 0.0);
    assert!((result.penalty - 100.0).abs() < 1e-9);
}

#[test]
fn test_start_node_exempt_from_window_checks() {
    // Closing return leg arrives back at the start node outside any window
    // concern: only travel time accrues.
    let matrix = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
    let result = evaluator(9.0).evaluate(&[0, 1, 0], &matrix);

    assert!((result.travel_time - 2.0).abs() < 1e-9);
    assert_eq!(result.waiting_time, 0.0);
    assert_eq!(result.penalty, 0.0);
}

#[test]
fn test_fitness_additivity() {
    let matrix = vec![
        vec![0.0, 22.5, 13.0],
        vec![22.5, 0.0, 5.0],
        vec![13.0, 5.0, 0.0],
    ];
    let result = evaluator(9.0).evaluate(&[0, 1, 2], &matrix);

    let sum = result.travel_time + result.waiting_time + result.penalty;
    assert!((result.total_time - sum).abs() < 1e-9);
    assert!(result.travel_time >= 0.0);
    assert!(result.waiting_time >= 0.0);
    assert!(result.penalty >= 0.0);
}

#[test]
fn test_arrival_times_sequence() {
    let matrix = vec![
        vec![0.0, 2.0, 4.0],
        vec![2.0, 0.0, 3.0],
        vec![4.0, 3.0, 0.0],
    ];
    let arrivals = evaluator(9.0).arrival_times(&[0, 1, 2], &matrix);

    assert_eq!(arrivals.len(), 3);
    assert!((arrivals[0] - 9.0).abs() < 1e-9);
    assert!((arrivals[1] - 11.0).abs() < 1e-9);
    assert!((arrivals[2] - 14.0).abs() < 1e-9);
}

#[test]
fn test_arrival_times_include_waiting() {
    // Arrival at 07:30 waits until 09:00; the recorded arrival is post-wait.
    let matrix = vec![vec![0.0, 22.5], vec![22.5, 0.0]];
    let arrivals = evaluator(9.0).arrival_times(&[0, 1], &matrix);

    assert!((arrivals[1] - 33.0).abs() < 1e-9);
}

#[test]
fn test_canonicalize_rotates_start_to_front() {
    let eval = evaluator(9.0);

    assert_eq!(eval.canonicalize(&[2, 0, 1]), vec![0, 2, 1]);
    assert_eq!(eval.canonicalize(&[0, 2, 1]), vec![0, 2, 1]);
}

#[test]
fn test_evaluate_canonicalizes_non_canonical_tour() {
    let matrix = vec![
        vec![0.0, 2.0, 4.0],
        vec![2.0, 0.0, 3.0],
        vec![4.0, 3.0, 0.0],
    ];
    let eval = evaluator(9.0);

    let canonical = eval.evaluate(&[0, 2, 1], &matrix);
    let shuffled = eval.evaluate(&[2, 0, 1], &matrix);

    assert_eq!(canonical, shuffled);
}

#[test]
fn test_nan_entry_degrades_fitness_to_infinity() {
    let matrix = vec![vec![0.0, f64::NAN], vec![1.0, 0.0]];
    let result = evaluator(9.0).evaluate(&[0, 1], &matrix);

    assert!(result.total_time.is_infinite());
}

#[test]
fn test_format_clock() {
    assert_eq!(format_clock(9.5), "Day 1, 09:30");
    assert_eq!(format_clock(33.25), "Day 2, 09:15");
    assert_eq!(format_clock(0.0), "Day 1, 00:00");
}

#[test]
fn test_format_duration() {
    assert_eq!(
        format_duration(std::time::Duration::from_secs(3661)),
        "1h 01m 01s"
    );
}
