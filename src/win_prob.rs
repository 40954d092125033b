use crate::features::FeatureSet;
use crate::params::ModelParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinProb {
    /// Weighted feature sum before squashing.
    pub score: f64,
    pub p_a: f64,
    pub p_b: f64,
}

/// Weighted sum of the features. Factors without a weight contribute nothing.
pub fn weighted_score(features: &FeatureSet, params: &ModelParams) -> f64 {
    features
        .features
        .iter()
        .map(|f| params.weight(f.factor) * f.value)
        .sum()
}

pub fn compute_win_prob(features: &FeatureSet, params: &ModelParams) -> WinProb {
    let score = weighted_score(features, params);
    let p_a = probability_from_score(score, params);
    WinProb {
        score,
        p_a,
        p_b: 1.0 - p_a,
    }
}

/// Logistic squash of `score`, kept away from certainty on both ends.
pub fn probability_from_score(score: f64, params: &ModelParams) -> f64 {
    let floor = params.prob_floor.clamp(1e-6, 0.49);
    // Overflowed scores keep their sign; only NaN carries no direction.
    let score = if score.is_nan() { 0.0 } else { score };
    clamp(logistic(params.logistic_k * score), floor, 1.0 - floor)
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
