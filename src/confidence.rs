use crate::features::Evidence;
use crate::profile::PlayerProfile;

const BASE: f64 = 0.15;
const SAMPLE_SHARE: f64 = 0.35;
const COMPLETENESS_SHARE: f64 = 0.25;
const CLARITY_SHARE: f64 = 0.25;

// Matches played at which the sample term saturates.
const SAMPLE_SATURATION: f64 = 50.0;
const CLARITY_SCALE: f64 = 0.75;

const MIN_CONFIDENCE: f64 = 0.05;
const MAX_CONFIDENCE: f64 = 0.95;

/// How much the inputs back the stated probability, in `[0.05, 0.95]`.
///
/// A near-zero `score` with full data still lands mid-range: a well-documented
/// toss-up is not the same as missing data.
pub fn compute_confidence(
    a: &PlayerProfile,
    b: &PlayerProfile,
    evidence: Evidence,
    score: f64,
) -> f64 {
    let sample = 0.5 * (sample_term(a.matches_played()) + sample_term(b.matches_played()));
    let completeness = evidence.completeness();
    let clarity = clarity_term(score);

    let raw = BASE
        + SAMPLE_SHARE * sample
        + COMPLETENESS_SHARE * completeness
        + CLARITY_SHARE * clarity;
    if !raw.is_finite() {
        return MIN_CONFIDENCE;
    }
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Log-saturating credit for sample size.
fn sample_term(matches: u32) -> f64 {
    ((1.0 + matches as f64).ln() / (1.0 + SAMPLE_SATURATION).ln()).min(1.0)
}

fn clarity_term(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    1.0 - (-score.abs() / CLARITY_SCALE).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::baseline_profile;

    fn pair(matches: u32) -> (PlayerProfile, PlayerProfile) {
        let mut a = baseline_profile("a", "A", 4.0);
        let mut b = baseline_profile("b", "B", 4.0);
        a.wins = matches / 2;
        a.losses = matches - matches / 2;
        b.wins = matches / 2;
        b.losses = matches - matches / 2;
        (a, b)
    }

    #[test]
    fn sample_term_has_diminishing_returns() {
        let d1 = sample_term(10) - sample_term(0);
        let d2 = sample_term(20) - sample_term(10);
        assert!(d1 > d2 && d2 > 0.0);
        assert_eq!(sample_term(0), 0.0);
        assert_eq!(sample_term(500), 1.0);
    }

    #[test]
    fn history_raises_confidence() {
        let none = Evidence { available: 0, possible: 5 };
        let (a0, b0) = pair(0);
        let (a50, b50) = pair(60);
        let low = compute_confidence(&a0, &b0, none, 0.3);
        let high = compute_confidence(&a50, &b50, none, 0.3);
        assert!(low < high);
    }

    #[test]
    fn never_reaches_the_extremes() {
        let full = Evidence { available: 5, possible: 5 };
        let none = Evidence { available: 0, possible: 5 };
        let (a, b) = pair(400);
        let top = compute_confidence(&a, &b, full, 50.0);
        assert!(top < 1.0 && top > 0.9);
        let (a, b) = pair(0);
        let bottom = compute_confidence(&a, &b, none, 0.0);
        assert!(bottom > 0.0 && bottom < 0.4);
    }

    #[test]
    fn documented_toss_up_is_moderate() {
        let full = Evidence { available: 5, possible: 5 };
        let (a, b) = pair(80);
        let c = compute_confidence(&a, &b, full, 0.0);
        assert!(c > 0.5 && c < 0.9, "got {c}");
    }

    #[test]
    fn overflowing_score_is_fully_clear() {
        assert_eq!(clarity_term(f64::INFINITY), 1.0);
        assert_eq!(clarity_term(f64::NEG_INFINITY), 1.0);
        assert_eq!(clarity_term(f64::NAN), 0.0);
    }
}
