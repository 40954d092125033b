use serde::Serialize;
use serde::ser::Serializer;

use crate::features::{Factor, FeatureSet};
use crate::params::ModelParams;
use crate::profile::{InjuryStatus, MatchContext, PlayerProfile, Side};

const RATING_DOMINANCE_MIN: f64 = 0.5;
const H2H_NOTABLE: f64 = 0.10;
const SURFACE_NOTABLE: f64 = 0.10;
const CONDITION_NOTABLE: f64 = 0.10;
const TOSS_UP_BAND: f64 = 0.05;

/// Post-weighting factor contributions in extraction order. Positive favors A.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Factors(Vec<(Factor, f64)>);

impl Factors {
    pub fn from_features(features: &FeatureSet, params: &ModelParams) -> Self {
        Self(
            features
                .features
                .iter()
                .map(|f| (f.factor, params.weight(f.factor) * f.value))
                .collect(),
        )
    }

    pub fn get(&self, factor: Factor) -> Option<f64> {
        self.0.iter().find(|(f, _)| *f == factor).map(|(_, v)| *v)
    }

    pub fn contains(&self, factor: Factor) -> bool {
        self.get(factor).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        self.0.iter().copied()
    }

    /// Factor with the largest absolute contribution; first one wins ties.
    pub fn dominant(&self) -> Option<(Factor, f64)> {
        self.0.iter().copied().fold(None, |best, cur| match best {
            Some((_, v)) if v.abs() >= cur.1.abs() => best,
            _ => Some(cur),
        })
    }
}

impl Serialize for Factors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(f, v)| (f.as_str(), v)))
    }
}

pub struct ExplainInput<'a> {
    pub player_a: &'a PlayerProfile,
    pub player_b: &'a PlayerProfile,
    pub context: &'a MatchContext,
    pub factors: &'a Factors,
    pub p_a: f64,
    pub confidence: f64,
    pub low_confidence: f64,
}

pub fn recommendations(input: &ExplainInput<'_>) -> Vec<String> {
    let mut out = Vec::new();
    let name = |side: Side| match side {
        Side::A => input.player_a.name.as_str(),
        Side::B => input.player_b.name.as_str(),
    };
    let lean = if input.p_a >= 0.5 { Side::A } else { Side::B };
    let favoring = |v: f64| if v >= 0.0 { Side::A } else { Side::B };

    if let (Some((Factor::RatingDifferential, v)), true) = (
        input.factors.dominant(),
        input
            .factors
            .get(Factor::RatingDifferential)
            .is_some_and(|v| v.abs() >= RATING_DOMINANCE_MIN),
    ) {
        push_unique(
            &mut out,
            format!("Strong favorite based on rating gap: {}", name(favoring(v))),
        );
    }

    if let Some(v) = input.factors.get(Factor::HeadToHead)
        && v.abs() >= H2H_NOTABLE
    {
        let side = favoring(v);
        let toss_up = (input.p_a - 0.5).abs() < f64::EPSILON;
        if side != lean && !toss_up {
            push_unique(
                &mut out,
                format!("Historical rivalry favors underdog {}", name(side)),
            );
        } else {
            push_unique(&mut out, format!("Head-to-head history favors {}", name(side)));
        }
    }

    if let Some(v) = input.factors.get(Factor::SurfaceFit)
        && v.abs() >= SURFACE_NOTABLE
    {
        push_unique(
            &mut out,
            format!("{} has the edge on {}", name(favoring(v)), input.context.surface),
        );
    }

    let condition = input.factors.get(Factor::FatigueInjury).unwrap_or(0.0);
    for side in [Side::A, Side::B] {
        let player = match side {
            Side::A => input.player_a,
            Side::B => input.player_b,
        };
        // A negative contribution hurts A, a positive one hurts B.
        let hurt = condition.abs() >= CONDITION_NOTABLE && favoring(condition) != side;
        if player.injury_status == InjuryStatus::Major || hurt {
            push_unique(&mut out, format!("Fitness concerns for {}", name(side)));
        }
    }

    if (input.p_a - 0.5).abs() < TOSS_UP_BAND {
        push_unique(&mut out, "Evenly matched: expect a close contest".to_string());
    }

    if input.confidence < input.low_confidence {
        push_unique(&mut out, "Limited data: treat with caution".to_string());
    }

    out
}

fn push_unique(out: &mut Vec<String>, line: String) {
    if !out.contains(&line) {
        out.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Evidence, Feature};
    use crate::profile::Surface;
    use crate::sample::baseline_profile;

    fn factors(pairs: &[(Factor, f64)]) -> Factors {
        let set = FeatureSet {
            features: pairs
                .iter()
                .map(|(factor, value)| Feature {
                    factor: *factor,
                    value: *value,
                })
                .collect(),
            evidence: Evidence::default(),
        };
        Factors::from_features(&set, &ModelParams::default())
    }

    fn explain(f: &Factors, p_a: f64, confidence: f64) -> Vec<String> {
        let a = baseline_profile("a", "Ana", 4.0);
        let b = baseline_profile("b", "Bea", 4.0);
        recommendations(&ExplainInput {
            player_a: &a,
            player_b: &b,
            context: &MatchContext::on(Surface::Clay),
            factors: f,
            p_a,
            confidence,
            low_confidence: 0.4,
        })
    }

    #[test]
    fn contributions_are_weighted() {
        let f = factors(&[(Factor::RatingDifferential, 2.0), (Factor::Physical, 1.0)]);
        assert!((f.get(Factor::RatingDifferential).unwrap() - 2.0).abs() < 1e-12);
        assert!((f.get(Factor::Physical).unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(f.dominant().map(|(k, _)| k), Some(Factor::RatingDifferential));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let f = factors(&[(Factor::RatingDifferential, 1.0), (Factor::HeadToHead, -1.0)]);
        let json = serde_json::to_string(&f).expect("serialize");
        assert_eq!(json, r#"{"ratingDifferential":1.0,"headToHead":-0.45}"#);
    }

    #[test]
    fn rating_gap_produces_strong_favorite_line() {
        let f = factors(&[(Factor::RatingDifferential, -1.5)]);
        let recs = explain(&f, 0.22, 0.8);
        assert_eq!(recs, vec!["Strong favorite based on rating gap: Bea".to_string()]);
    }

    #[test]
    fn rivalry_against_the_lean_is_flagged() {
        let f = factors(&[(Factor::RatingDifferential, 1.0), (Factor::HeadToHead, -0.5)]);
        let recs = explain(&f, 0.64, 0.8);
        assert!(recs.contains(&"Historical rivalry favors underdog Bea".to_string()));
    }

    #[test]
    fn low_confidence_and_toss_up_lines() {
        let f = factors(&[(Factor::RatingDifferential, 0.0)]);
        let recs = explain(&f, 0.5, 0.2);
        assert_eq!(
            recs,
            vec![
                "Evenly matched: expect a close contest".to_string(),
                "Limited data: treat with caution".to_string(),
            ]
        );
    }

    #[test]
    fn condition_penalty_names_the_hurt_side() {
        let f = factors(&[(Factor::FatigueInjury, 1.0)]);
        let recs = explain(&f, 0.53, 0.8);
        assert!(recs.contains(&"Fitness concerns for Bea".to_string()));
        assert!(!recs.contains(&"Fitness concerns for Ana".to_string()));
    }
}
