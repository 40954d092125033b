use rand::SeedableRng;
use rand::rngs::StdRng;

use netprophet::format_odds;
use netprophet::params::ModelParams;
use netprophet::predict::predict_matchup;
use netprophet::profile::Matchup;
use netprophet::sample::random_matchup;

const CASES: u32 = 400;

fn random_cases(seed: u64) -> Vec<Matchup> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..CASES).map(|i| random_matchup(&mut rng, i)).collect()
}

#[test]
fn probabilities_sum_to_one_and_stay_clamped() {
    let params = ModelParams::default();
    for m in random_cases(11) {
        let r = predict_matchup(&m, &params);
        assert!((r.probability_a + r.probability_b - 1.0).abs() < 1e-12);
        assert!(r.probability_a >= 0.02 && r.probability_a <= 0.98);
        assert!(r.decimal_odds_a >= 1.01);
        assert!(r.decimal_odds_b >= 1.01);
        assert!(r.confidence > 0.0 && r.confidence < 1.0);
    }
}

#[test]
fn favorite_never_gets_the_longer_price() {
    let params = ModelParams::default();
    for m in random_cases(12) {
        let r = predict_matchup(&m, &params);
        if r.probability_a > r.probability_b {
            assert!(r.decimal_odds_a <= r.decimal_odds_b);
        } else if r.probability_a < r.probability_b {
            assert!(r.decimal_odds_a >= r.decimal_odds_b);
        }
    }
}

#[test]
fn raising_a_rating_never_lowers_a_probability() {
    let params = ModelParams::default();
    for mut m in random_cases(13) {
        let mut last = predict_matchup(&m, &params).probability_a;
        for _ in 0..6 {
            m.player_a.skill_rating += 0.35;
            let p = predict_matchup(&m, &params).probability_a;
            assert!(p >= last, "{} dropped {last} -> {p}", m.label());
            last = p;
        }
    }
}

#[test]
fn swapping_sides_mirrors_the_prediction() {
    let params = ModelParams::default();
    for m in random_cases(14) {
        let r = predict_matchup(&m, &params);
        let s = predict_matchup(&m.swapped(), &params);
        assert!((r.probability_a - s.probability_b).abs() < 1e-9);
        assert!((r.probability_b - s.probability_a).abs() < 1e-9);
        assert_eq!(r.decimal_odds_a, s.decimal_odds_b);
        assert_eq!(r.decimal_odds_b, s.decimal_odds_a);
        for ((fa, va), (fb, vb)) in r.factors.iter().zip(s.factors.iter()) {
            assert_eq!(fa, fb);
            assert!((va + vb).abs() < 1e-12, "{} not mirrored", fa.as_str());
        }
        assert!((r.confidence - s.confidence).abs() < 1e-12);
    }
}

#[test]
fn match_history_raises_confidence() {
    let params = ModelParams::default();
    for mut m in random_cases(15) {
        m.player_a.wins = 0;
        m.player_a.losses = 0;
        m.player_b.wins = 0;
        m.player_b.losses = 0;
        let fresh = predict_matchup(&m, &params).confidence;

        m.player_a.wins = 30;
        m.player_a.losses = 25;
        m.player_b.wins = 28;
        m.player_b.losses = 27;
        let seasoned = predict_matchup(&m, &params).confidence;

        assert!(fresh < seasoned, "{fresh} vs {seasoned}");
    }
}

#[test]
fn predictions_are_deterministic() {
    let params = ModelParams::default();
    for m in random_cases(16).iter().take(50) {
        assert_eq!(predict_matchup(m, &params), predict_matchup(m, &params));
    }
}

#[test]
fn formatted_odds_parse_back_within_a_cent() {
    let params = ModelParams::default();
    for m in random_cases(17) {
        let r = predict_matchup(&m, &params);
        for odds in [r.decimal_odds_a, r.decimal_odds_b] {
            let parsed: f64 = format_odds(odds).parse().expect("numeric");
            assert!((parsed - odds).abs() <= 0.01);
        }
    }
}
