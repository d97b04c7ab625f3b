//! Running statistics and the finalized report

use serde::{Deserialize, Serialize};

/// Running totals over a set of trials. Two accumulators over disjoint
/// trials merge into the accumulator of their union.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationStats {
    pub total_trials: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub hit_count: u64,
    pub max_win: f64,
    /// `+inf` until the first trial is recorded
    pub min_win: f64,
}

impl Default for SimulationStats {
    fn default() -> Self {
        Self {
            total_trials: 0,
            total_bet: 0.0,
            total_win: 0.0,
            hit_count: 0,
            max_win: 0.0,
            min_win: f64::INFINITY,
        }
    }
}

impl SimulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one trial
    pub fn record(&mut self, bet: f64, win: f64) {
        self.total_trials += 1;
        self.total_bet += bet;
        self.total_win += win;
        if win > 0.0 {
            self.hit_count += 1;
        }
        self.max_win = self.max_win.max(win);
        self.min_win = self.min_win.min(win);
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: &Self) {
        self.total_trials += other.total_trials;
        self.total_bet += other.total_bet;
        self.total_win += other.total_win;
        self.hit_count += other.hit_count;
        self.max_win = self.max_win.max(other.max_win);
        self.min_win = self.min_win.min(other.min_win);
    }

    /// Merged copy of two accumulators
    pub fn merged(mut self, other: &Self) -> Self {
        self.merge(other);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.total_trials == 0
    }

    /// Total win / total bet (0 with no bets)
    pub fn actual_rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            self.total_win / self.total_bet
        } else {
            0.0
        }
    }

    /// Fraction of trials with a non-zero win
    pub fn hit_frequency(&self) -> f64 {
        if self.total_trials > 0 {
            self.hit_count as f64 / self.total_trials as f64
        } else {
            0.0
        }
    }

    /// Smallest trial win, 0 if nothing was recorded
    pub fn reported_min_win(&self) -> f64 {
        if self.min_win.is_finite() {
            self.min_win
        } else {
            0.0
        }
    }
}

/// Final, read-only simulation report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub actual_rtp: f64,
    pub hit_frequency: f64,
    pub hit_count: u64,
    pub max_win: f64,
    pub min_win: f64,
    /// Target RTP metadata from the config
    pub target_rtp: f64,
    /// House edge metadata from the config
    pub house_edge: f64,
    /// Analytic RTP of the config
    pub theoretical_rtp: f64,
    /// Seed that reproduces this run
    pub seed: u64,
}

impl SimulationReport {
    /// Finalize accumulated stats
    pub fn from_stats(
        stats: &SimulationStats,
        target_rtp: f64,
        house_edge: f64,
        theoretical_rtp: f64,
        seed: u64,
    ) -> Self {
        Self {
            total_spins: stats.total_trials,
            total_bet: stats.total_bet,
            total_win: stats.total_win,
            actual_rtp: stats.actual_rtp(),
            hit_frequency: stats.hit_frequency(),
            hit_count: stats.hit_count,
            max_win: stats.max_win,
            min_win: stats.reported_min_win(),
            target_rtp,
            house_edge,
            theoretical_rtp,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_of(wins: &[f64]) -> SimulationStats {
        let mut stats = SimulationStats::new();
        for &w in wins {
            stats.record(1.0, w);
        }
        stats
    }

    #[test]
    fn test_record() {
        let stats = stats_of(&[0.0, 5.0, 0.0, 20.0]);
        assert_eq!(stats.total_trials, 4);
        assert_eq!(stats.total_bet, 4.0);
        assert_eq!(stats.total_win, 25.0);
        assert_eq!(stats.hit_count, 2);
        assert_eq!(stats.max_win, 20.0);
        assert_eq!(stats.min_win, 0.0);
        assert_eq!(stats.actual_rtp(), 6.25);
        assert_eq!(stats.hit_frequency(), 0.5);
    }

    #[test]
    fn test_empty_stats() {
        let stats = SimulationStats::new();
        assert!(stats.is_empty());
        assert_eq!(stats.actual_rtp(), 0.0);
        assert_eq!(stats.hit_frequency(), 0.0);
        assert_eq!(stats.reported_min_win(), 0.0);
        assert!(stats.min_win.is_infinite());
    }

    #[test]
    fn test_min_only_lowered() {
        let stats = stats_of(&[3.0, 7.0, 2.0, 9.0]);
        assert_eq!(stats.min_win, 2.0);
        assert_eq!(stats.max_win, 9.0);
        assert_eq!(stats.hit_frequency(), 1.0);
    }

    #[test]
    fn test_merge_matches_single_accumulator() {
        let wins = [0.0, 4.0, 12.0, 0.0, 1.0, 30.0, 0.0, 2.0];
        let whole = stats_of(&wins);

        for split in 0..=wins.len() {
            let left = stats_of(&wins[..split]);
            let right = stats_of(&wins[split..]);
            assert_eq!(left.merged(&right), whole, "split at {}", split);
            assert_eq!(right.merged(&left), whole, "reversed split at {}", split);
        }
    }

    #[test]
    fn test_merge_is_associative() {
        let a = stats_of(&[1.0, 0.0]);
        let b = stats_of(&[8.0]);
        let c = stats_of(&[0.0, 0.0, 3.0]);
        assert_eq!(a.merged(&b).merged(&c), a.merged(&b.merged(&c)));
    }

    #[test]
    fn test_report_from_stats() {
        let stats = stats_of(&[0.0, 3.0]);
        let report = SimulationReport::from_stats(&stats, 0.96, 0.04, 1.2, 7);
        assert_eq!(report.total_spins, 2);
        assert_eq!(report.actual_rtp, 1.5);
        assert_eq!(report.hit_frequency, 0.5);
        assert_eq!(report.min_win, 0.0);
        assert_eq!(report.max_win, 3.0);
        assert_eq!(report.target_rtp, 0.96);
        assert_eq!(report.seed, 7);
    }
}
