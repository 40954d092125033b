use rayon::prelude::*;

use crate::params::ModelParams;
use crate::predict::predict_matchup;
use crate::profile::Matchup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub accuracy: f64,
}

impl Metrics {
    fn empty() -> Self {
        Self {
            samples: 0,
            brier: 0.0,
            log_loss: 0.0,
            accuracy: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationBin {
    pub bucket_start: f64,
    pub bucket_end: f64,
    pub count: usize,
    pub avg_pred: f64,
    pub actual_rate: f64,
}

/// Share of matches won by side A.
pub fn empirical_rate(outcomes: &[Outcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.5;
    }
    let wins = outcomes.iter().filter(|o| **o == Outcome::A).count();
    wins as f64 / outcomes.len() as f64
}

/// Scores `p_a` predictions against outcomes. Mismatched or empty input yields
/// an empty `Metrics`.
pub fn evaluate_probs(p_a: &[f64], outcomes: &[Outcome]) -> Metrics {
    if p_a.is_empty() || outcomes.is_empty() || p_a.len() != outcomes.len() {
        return Metrics::empty();
    }

    let mut brier_sum = 0.0_f64;
    let mut log_loss_sum = 0.0_f64;
    let mut correct = 0usize;

    for (p, outcome) in p_a.iter().zip(outcomes) {
        let p = p.clamp(0.0, 1.0);
        let y = match outcome {
            Outcome::A => 1.0,
            Outcome::B => 0.0,
        };
        brier_sum += (p - y).powi(2);

        let actual_prob = match outcome {
            Outcome::A => p,
            Outcome::B => 1.0 - p,
        }
        .clamp(1e-12, 1.0);
        log_loss_sum += -actual_prob.ln();

        let picked = if p >= 0.5 { Outcome::A } else { Outcome::B };
        if picked == *outcome {
            correct += 1;
        }
    }

    let n = p_a.len() as f64;
    Metrics {
        samples: p_a.len(),
        brier: brier_sum / n,
        log_loss: log_loss_sum / n,
        accuracy: correct as f64 / n,
    }
}

pub fn calibration_bins(p_a: &[f64], outcomes: &[Outcome], bins: usize) -> Vec<CalibrationBin> {
    let bins = bins.max(2);
    let mut counts = vec![0usize; bins];
    let mut pred_sum = vec![0.0_f64; bins];
    let mut actual_sum = vec![0.0_f64; bins];

    for (p, outcome) in p_a.iter().zip(outcomes) {
        let p = p.clamp(0.0, 1.0);
        let idx = ((p * bins as f64).floor() as usize).min(bins - 1);
        counts[idx] += 1;
        pred_sum[idx] += p;
        if *outcome == Outcome::A {
            actual_sum[idx] += 1.0;
        }
    }

    (0..bins)
        .map(|i| {
            let count = counts[i];
            let (avg_pred, actual_rate) = if count > 0 {
                (pred_sum[i] / count as f64, actual_sum[i] / count as f64)
            } else {
                (0.0, 0.0)
            };
            CalibrationBin {
                bucket_start: i as f64 / bins as f64,
                bucket_end: (i + 1) as f64 / bins as f64,
                count,
                avg_pred,
                actual_rate,
            }
        })
        .collect()
}

/// Runs the engine over every matchup in parallel and returns `p_a` per row.
pub fn predict_all(matchups: &[&Matchup], params: &ModelParams) -> Vec<f64> {
    matchups
        .par_iter()
        .map(|m| predict_matchup(m, params).probability_a)
        .collect()
}

/// Grid search of the logistic constant over `[0.40, 1.60]`, keeping the
/// value with the lowest log loss. Starts from `base.logistic_k`.
pub fn fit_logistic_k(
    matchups: &[&Matchup],
    outcomes: &[Outcome],
    base: &ModelParams,
) -> (f64, Metrics) {
    if matchups.is_empty() || matchups.len() != outcomes.len() {
        return (base.logistic_k, Metrics::empty());
    }

    let mut best_k = base.logistic_k;
    let mut best = evaluate_probs(&predict_all(matchups, base), outcomes);

    for step in 40..=160 {
        let k = step as f64 / 100.0;
        let params = ModelParams {
            logistic_k: k,
            ..base.clone()
        };
        let metrics = evaluate_probs(&predict_all(matchups, &params), outcomes);
        if metrics.log_loss < best.log_loss {
            best = metrics;
            best_k = k;
        }
    }

    (best_k, best)
}
