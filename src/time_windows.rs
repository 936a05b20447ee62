//! Time-window policy and route evaluation.

use serde::{Deserialize, Serialize};

use crate::individual::{canonicalize_start, Tour};

/// Global business-hour window shared by every node except the start node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeWindow {
    pub opening_hour: f64,
    pub closing_hour: f64,
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow {
            opening_hour: 9.0,
            closing_hour: 21.0,
        }
    }
}

impl TimeWindow {
    /// Create a window with explicit opening and closing hours.
    pub fn new(opening_hour: f64, closing_hour: f64) -> Self {
        TimeWindow {
            opening_hour,
            closing_hour,
        }
    }

    /// True iff the arrival instant falls within the window.
    pub fn is_within_window(&self, arrival_time: f64) -> bool {
        let time_of_day = arrival_time.rem_euclid(24.0);
        self.opening_hour <= time_of_day && time_of_day <= self.closing_hour
    }

    /// Hours to wait before the window opens.
    ///
    /// Arriving before opening waits until the same day's opening; arriving
    /// after closing waits until the next day's opening.
    pub fn waiting_time(&self, arrival_time: f64) -> f64 {
        let time_of_day = arrival_time.rem_euclid(24.0);

        if time_of_day < self.opening_hour {
            return self.opening_hour - time_of_day;
        }

        if time_of_day > self.closing_hour {
            return (24.0 - time_of_day) + self.opening_hour;
        }

        0.0
    }

    /// Hours-equivalent penalty for a window violation.
    ///
    /// Late arrivals are charged at full weight. Early arrivals carry half
    /// weight; when waiting-time resolution runs first this branch is never
    /// reached, but it is live whenever waiting is disabled.
    pub fn penalty(&self, arrival_time: f64, penalty_weight: f64) -> f64 {
        if self.is_within_window(arrival_time) {
            return 0.0;
        }

        let time_of_day = arrival_time.rem_euclid(24.0);

        if time_of_day > self.closing_hour {
            return penalty_weight * (time_of_day - self.closing_hour);
        }

        if time_of_day < self.opening_hour {
            return penalty_weight * (self.opening_hour - time_of_day) * 0.5;
        }

        0.0
    }
}

/// Decomposition of a tour's cost into its accrued components.
///
/// Invariant: `total_time == travel_time + waiting_time + penalty`, except
/// that any non-finite accumulation degrades `total_time` to infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessResult {
    pub travel_time: f64,
    pub waiting_time: f64,
    pub penalty: f64,
    pub total_time: f64,
}

impl FitnessResult {
    /// The zero-cost result of a trivial single-node tour.
    pub fn zero() -> Self {
        FitnessResult {
            travel_time: 0.0,
            waiting_time: 0.0,
            penalty: 0.0,
            total_time: 0.0,
        }
    }
}

/// Walks a tour through the travel-time matrix, accruing travel, waiting,
/// and penalty hours against the window policy.
///
/// Evaluation is a pure function of (tour, matrix, configuration); the
/// evaluator holds no mutable state.
#[derive(Debug, Clone)]
pub struct RouteEvaluator {
    pub time_window: TimeWindow,
    pub start_index: usize,
    pub start_time: f64,
    pub penalty_weight: f64,
    pub include_waiting: bool,
    pub include_penalties: bool,
}

impl RouteEvaluator {
    /// Create an evaluator for the given window and start parameters.
    pub fn new(
        time_window: TimeWindow,
        start_index: usize,
        start_time: f64,
        penalty_weight: f64,
    ) -> Self {
        RouteEvaluator {
            time_window,
            start_index,
            start_time,
            penalty_weight,
            include_waiting: true,
            include_penalties: true,
        }
    }

    /// Set the waiting and penalty accrual flags.
    pub fn with_flags(mut self, include_waiting: bool, include_penalties: bool) -> Self {
        self.include_waiting = include_waiting;
        self.include_penalties = include_penalties;
        self
    }

    /// Rewrite a tour so that it begins at the start node, preserving the
    /// relative order of the remaining nodes.
    pub fn canonicalize(&self, tour: &[usize]) -> Tour {
        canonicalize_start(tour, self.start_index)
    }

    /// Evaluate a tour using the configured accrual flags.
    pub fn evaluate(&self, tour: &[usize], matrix: &[Vec<f64>]) -> FitnessResult {
        self.evaluate_with(tour, matrix, self.include_waiting, self.include_penalties)
    }

    /// Evaluate a tour with explicit accrual flags.
    ///
    /// Waiting advances the clock; penalties accrue from the wait-adjusted
    /// clock without advancing it. The start node is exempt from window
    /// checks, so a closing return leg only adds travel time.
    pub fn evaluate_with(
        &self,
        tour: &[usize],
        matrix: &[Vec<f64>],
        include_waiting: bool,
        include_penalties: bool,
    ) -> FitnessResult {
        let canonical;
        let tour = if tour.first() == Some(&self.start_index) {
            tour
        } else {
            canonical = self.canonicalize(tour);
            &canonical
        };

        let mut current_time = self.start_time;
        let mut travel_time = 0.0;
        let mut waiting_time = 0.0;
        let mut penalty = 0.0;

        for leg in tour.windows(2) {
            let (from, to) = (leg[0], leg[1]);

            let travel = matrix[from][to];
            travel_time += travel;
            current_time += travel;

            if to == self.start_index {
                continue;
            }

            if include_waiting {
                let wait = self.time_window.waiting_time(current_time);
                waiting_time += wait;
                current_time += wait;
            }

            if include_penalties {
                penalty += self.time_window.penalty(current_time, self.penalty_weight);
            }
        }

        let mut total_time = travel_time + waiting_time + penalty;
        if !total_time.is_finite() {
            // A corrupted matrix entry poisons only this individual.
            total_time = f64::INFINITY;
        }

        FitnessResult {
            travel_time,
            waiting_time,
            penalty,
            total_time,
        }
    }

    /// Per-node arrival times (post-wait, pre-penalty), starting with the
    /// departure clock value at the start node.
    pub fn arrival_times(&self, tour: &[usize], matrix: &[Vec<f64>]) -> Vec<f64> {
        let canonical;
        let tour = if tour.first() == Some(&self.start_index) {
            tour
        } else {
            canonical = self.canonicalize(tour);
            &canonical
        };

        let mut current_time = self.start_time;
        let mut arrivals = vec![current_time];

        for leg in tour.windows(2) {
            let (from, to) = (leg[0], leg[1]);

            current_time += matrix[from][to];

            if self.include_waiting && to != self.start_index {
                current_time += self.time_window.waiting_time(current_time);
            }

            arrivals.push(current_time);
        }

        arrivals
    }
}
