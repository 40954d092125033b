//! Turns a pair of profiles into named, signed features. Every feature reads
//! "how much this dimension favors A over B": positive favors A.

use crate::params::ModelParams;
use crate::profile::{HeadToHeadRecord, Hand, InjuryStatus, MatchContext, PlayerProfile};

const FORM_WINDOW: usize = 5;
const STREAK_CAP: f64 = 5.0;
const FORM_RECENCY_SHARE: f64 = 0.7;
const FORM_STREAK_SHARE: f64 = 0.3;

const H2H_TALLY_SHARE: f64 = 0.6;
const H2H_LAST_MEETING_SHARE: f64 = 0.4;

const FATIGUE_SCALE: f64 = 0.5;
const MINOR_INJURY_PENALTY: f64 = 0.35;
const MAJOR_INJURY_PENALTY: f64 = 1.0;

const LEFT_HAND_EDGE: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Factor {
    RatingDifferential,
    SurfaceFit,
    RecentForm,
    SeasonalForm,
    HeadToHead,
    FatigueInjury,
    Physical,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::RatingDifferential,
        Factor::SurfaceFit,
        Factor::RecentForm,
        Factor::SeasonalForm,
        Factor::HeadToHead,
        Factor::FatigueInjury,
        Factor::Physical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Factor::RatingDifferential => "ratingDifferential",
            Factor::SurfaceFit => "surfaceFit",
            Factor::RecentForm => "recentForm",
            Factor::SeasonalForm => "seasonalForm",
            Factor::HeadToHead => "headToHead",
            Factor::FatigueInjury => "fatigueInjury",
            Factor::Physical => "physical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    pub factor: Factor,
    pub value: f64,
}

/// How many optional signals were backed by data on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evidence {
    pub available: u8,
    pub possible: u8,
}

impl Evidence {
    fn record(&mut self, present: bool) {
        self.possible += 1;
        if present {
            self.available += 1;
        }
    }

    pub fn completeness(&self) -> f64 {
        if self.possible == 0 {
            return 0.0;
        }
        self.available as f64 / self.possible as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub features: Vec<Feature>,
    pub evidence: Evidence,
}

impl FeatureSet {
    pub fn get(&self, factor: Factor) -> Option<f64> {
        self.features
            .iter()
            .find(|f| f.factor == factor)
            .map(|f| f.value)
    }
}

pub fn extract_features(
    a: &PlayerProfile,
    b: &PlayerProfile,
    ctx: &MatchContext,
    h2h: &HeadToHeadRecord,
    params: &ModelParams,
) -> FeatureSet {
    debug_assert!(a.has_consistent_streak(), "streak out of sync for {}", a.id);
    debug_assert!(b.has_consistent_streak(), "streak out of sync for {}", b.id);

    let mut features = Vec::with_capacity(Factor::ALL.len());
    let mut evidence = Evidence::default();
    let mut push = |factor: Factor, value: f64| {
        // Anything non-finite degrades to neutral.
        let value = if value.is_finite() { value } else { 0.0 };
        features.push(Feature { factor, value });
    };

    push(Factor::RatingDifferential, rating_differential(a, b));

    let surface_a = surface_score(a, ctx, params);
    let surface_b = surface_score(b, ctx, params);
    evidence.record(
        a.surface_rate(ctx.surface).is_some() && b.surface_rate(ctx.surface).is_some(),
    );
    push(
        Factor::SurfaceFit,
        surface_a.unwrap_or(0.0) - surface_b.unwrap_or(0.0),
    );

    let form_a = form_score(a, params.recency_decay);
    let form_b = form_score(b, params.recency_decay);
    evidence.record(!a.recent_form.is_empty() && !b.recent_form.is_empty());
    push(Factor::RecentForm, form_a - form_b);

    let seasonal = seasonal_differential(a, b);
    evidence.record(seasonal.is_some());
    if let Some(v) = seasonal {
        push(Factor::SeasonalForm, v);
    }

    evidence.record(h2h.meetings() > 0);
    push(Factor::HeadToHead, head_to_head(h2h));

    evidence.record(a.fatigue_level.is_some() && b.fatigue_level.is_some());
    push(
        Factor::FatigueInjury,
        condition_penalty(b) - condition_penalty(a),
    );

    push(Factor::Physical, physical_edge(a, b));

    FeatureSet { features, evidence }
}

fn rating_differential(a: &PlayerProfile, b: &PlayerProfile) -> f64 {
    a.skill_rating - b.skill_rating
}

/// Centred surface win rate, or the preferred-surface bonus when no explicit
/// rate exists for the match surface.
fn surface_score(p: &PlayerProfile, ctx: &MatchContext, params: &ModelParams) -> Option<f64> {
    if let Some(rate) = p.surface_rate(ctx.surface) {
        return Some(rate - 0.5);
    }
    (p.preferred_surface == ctx.surface).then_some(params.preferred_surface_bonus)
}

/// Exponentially recency-weighted result score blended with the signed streak.
/// The most recent result weighs 1.0, the one before it `decay`, then
/// `decay^2` and so on over at most five results.
pub fn form_score(p: &PlayerProfile, decay: f64) -> f64 {
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    for (k, outcome) in p.recent_form.iter().rev().take(FORM_WINDOW).enumerate() {
        let w = decay.powi(k as i32);
        weighted += w * outcome.sign();
        weight_sum += w;
    }
    let recency = if weight_sum > 0.0 {
        weighted / weight_sum
    } else {
        0.0
    };

    let streak = p.signed_streak().clamp(-STREAK_CAP, STREAK_CAP) / STREAK_CAP;
    FORM_RECENCY_SHARE * recency + FORM_STREAK_SHARE * streak
}

fn seasonal_differential(a: &PlayerProfile, b: &PlayerProfile) -> Option<f64> {
    let sa = a.seasonal_form.filter(|v| v.is_finite())?.clamp(0.0, 1.0);
    let sb = b.seasonal_form.filter(|v| v.is_finite())?.clamp(0.0, 1.0);
    Some(sa - sb)
}

fn head_to_head(h2h: &HeadToHeadRecord) -> f64 {
    let meetings = h2h.meetings();
    if meetings == 0 {
        return 0.0;
    }
    let tally = (h2h.wins_for_side_a as f64 - h2h.wins_for_side_b as f64) / meetings as f64;
    match h2h.last_meeting_result {
        Some(side) => H2H_TALLY_SHARE * tally + H2H_LAST_MEETING_SHARE * side.sign(),
        None => tally,
    }
}

/// Fatigue plus injury penalty. Missing fatigue counts as no penalty.
fn condition_penalty(p: &PlayerProfile) -> f64 {
    let fatigue = p
        .fatigue_level
        .filter(|f| f.is_finite())
        .map(|f| f.clamp(0.0, 10.0) / 10.0)
        .unwrap_or(0.0);
    let injury = match p.injury_status {
        InjuryStatus::Healthy => 0.0,
        InjuryStatus::Minor => MINOR_INJURY_PENALTY,
        InjuryStatus::Major => MAJOR_INJURY_PENALTY,
    };
    FATIGUE_SCALE * fatigue + injury
}

fn physical_edge(a: &PlayerProfile, b: &PlayerProfile) -> f64 {
    let attr = |v: u8| v.clamp(1, 10) as f64;
    let gap = 0.4 * (attr(a.stamina) - attr(b.stamina))
        + 0.4 * (attr(a.consistency) - attr(b.consistency))
        + 0.2 * (attr(a.aggressiveness) - attr(b.aggressiveness));
    let hand = match (a.dominant_hand, b.dominant_hand) {
        (Hand::Left, Hand::Right) => LEFT_HAND_EDGE,
        (Hand::Right, Hand::Left) => -LEFT_HAND_EDGE,
        _ => 0.0,
    };
    gap / 9.0 + hand
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{MatchOutcome, Side, Surface};
    use crate::sample::{baseline_profile, with_recent_form as with_form};

    fn extract(a: &PlayerProfile, b: &PlayerProfile, h2h: &HeadToHeadRecord) -> FeatureSet {
        extract_features(
            a,
            b,
            &MatchContext::on(Surface::Hard),
            h2h,
            &ModelParams::default(),
        )
    }

    #[test]
    fn identical_players_are_neutral() {
        let a = baseline_profile("a", "A", 4.0);
        let b = baseline_profile("b", "B", 4.0);
        let set = extract(&a, &b, &HeadToHeadRecord::default());
        for f in &set.features {
            assert_eq!(f.value, 0.0, "{} not neutral", f.factor.as_str());
        }
    }

    #[test]
    fn factor_order_is_stable() {
        let mut a = baseline_profile("a", "A", 4.0);
        let mut b = baseline_profile("b", "B", 4.0);
        a.seasonal_form = Some(0.6);
        b.seasonal_form = Some(0.5);
        let set = extract(&a, &b, &HeadToHeadRecord::default());
        let names: Vec<_> = set.features.iter().map(|f| f.factor).collect();
        assert_eq!(names, Factor::ALL.to_vec());
    }

    #[test]
    fn seasonal_form_is_omitted_when_one_side_lacks_it() {
        let mut a = baseline_profile("a", "A", 4.0);
        let b = baseline_profile("b", "B", 4.0);
        a.seasonal_form = Some(0.8);
        let set = extract(&a, &b, &HeadToHeadRecord::default());
        assert!(set.get(Factor::SeasonalForm).is_none());
        assert_eq!(set.features.len(), Factor::ALL.len() - 1);
    }

    #[test]
    fn recent_results_weigh_more_than_older_ones() {
        use MatchOutcome::{Loss, Win};
        // Same counts, opposite order: won lately vs lost lately.
        let hot = with_form(baseline_profile("a", "A", 4.0), &[Loss, Loss, Win, Win]);
        let cold = with_form(baseline_profile("b", "B", 4.0), &[Win, Win, Loss, Loss]);
        let decay = ModelParams::default().recency_decay;
        assert!(form_score(&hot, decay) > 0.0);
        assert!(form_score(&cold, decay) < 0.0);
        let set = extract(&hot, &cold, &HeadToHeadRecord::default());
        assert!(set.get(Factor::RecentForm).unwrap() > 0.0);
    }

    #[test]
    fn only_the_last_five_results_count() {
        use MatchOutcome::{Loss, Win};
        let decay = ModelParams::default().recency_decay;
        let long = with_form(
            baseline_profile("a", "A", 4.0),
            &[Loss, Loss, Loss, Win, Win, Win, Win, Win],
        );
        let short = with_form(baseline_profile("a", "A", 4.0), &[Win, Win, Win, Win, Win]);
        assert!((form_score(&long, decay) - form_score(&short, decay)).abs() < 1e-12);
        // Five wins and a five-match streak saturate the score.
        assert!((form_score(&short, decay) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn last_meeting_outweighs_aggregate_tally() {
        let h2h = HeadToHeadRecord {
            wins_for_side_a: 5,
            wins_for_side_b: 4,
            last_meeting_result: Some(Side::B),
            last_meeting_date: None,
        };
        assert!(head_to_head(&h2h) < 0.0);
        assert_eq!(head_to_head(&HeadToHeadRecord::default()), 0.0);
        let swept = HeadToHeadRecord {
            wins_for_side_b: 3,
            ..HeadToHeadRecord::default()
        };
        assert!((head_to_head(&swept) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn last_meeting_without_a_tally_is_ignored() {
        let h2h = HeadToHeadRecord {
            last_meeting_result: Some(Side::A),
            ..HeadToHeadRecord::default()
        };
        assert_eq!(head_to_head(&h2h), 0.0);
        let a = baseline_profile("a", "A", 4.0);
        let b = baseline_profile("b", "B", 4.0);
        let set = extract(&a, &b, &h2h);
        assert_eq!(set.get(Factor::HeadToHead), Some(0.0));
        assert_eq!(set.evidence.available, 0);
    }

    #[test]
    fn fatigue_missing_on_both_sides_is_neutral() {
        let mut a = baseline_profile("a", "A", 4.0);
        let mut b = baseline_profile("b", "B", 4.0);
        a.fatigue_level = None;
        b.fatigue_level = None;
        let set = extract(&a, &b, &HeadToHeadRecord::default());
        assert_eq!(set.get(Factor::FatigueInjury), Some(0.0));

        b.injury_status = InjuryStatus::Major;
        let set = extract(&a, &b, &HeadToHeadRecord::default());
        assert!(set.get(Factor::FatigueInjury).unwrap() > 0.0);
    }

    #[test]
    fn injury_ordering_is_healthy_minor_major() {
        let mut p = baseline_profile("a", "A", 4.0);
        let healthy = condition_penalty(&p);
        p.injury_status = InjuryStatus::Minor;
        let minor = condition_penalty(&p);
        p.injury_status = InjuryStatus::Major;
        let major = condition_penalty(&p);
        assert!(healthy < minor && minor < major);
    }

    #[test]
    fn preferred_surface_bonus_applies_without_explicit_rate() {
        let mut a = baseline_profile("a", "A", 4.0);
        let mut b = baseline_profile("b", "B", 4.0);
        a.preferred_surface = Surface::Hard;
        b.preferred_surface = Surface::Clay;
        let set = extract(&a, &b, &HeadToHeadRecord::default());
        assert!(set.get(Factor::SurfaceFit).unwrap() > 0.0);
        assert_eq!(set.evidence.available, 0);

        // An explicit rate beats the preference fallback, but only explicit
        // rates on both sides count as evidence.
        b.surface_affinity.insert(Surface::Hard, 0.9);
        let set = extract(&a, &b, &HeadToHeadRecord::default());
        assert!(set.get(Factor::SurfaceFit).unwrap() < 0.0);
        assert_eq!(set.evidence.available, 0);
        a.surface_affinity.insert(Surface::Hard, 0.55);
        let set = extract(&a, &b, &HeadToHeadRecord::default());
        assert_eq!(set.evidence.available, 1);
    }

    #[test]
    fn evidence_counts_every_optional_signal() {
        use MatchOutcome::Win;
        let mut a = with_form(baseline_profile("a", "A", 4.0), &[Win]);
        let mut b = with_form(baseline_profile("b", "B", 4.0), &[Win]);
        for p in [&mut a, &mut b] {
            p.surface_affinity.insert(Surface::Hard, 0.5);
            p.fatigue_level = Some(2.0);
            p.seasonal_form = Some(0.5);
        }
        let h2h = HeadToHeadRecord {
            wins_for_side_a: 1,
            ..HeadToHeadRecord::default()
        };
        let set = extract(&a, &b, &h2h);
        assert_eq!(set.evidence, Evidence { available: 5, possible: 5 });
        assert!((set.evidence.completeness() - 1.0).abs() < 1e-12);

        let bare = extract(
            &baseline_profile("a", "A", 4.0),
            &baseline_profile("b", "B", 4.0),
            &HeadToHeadRecord::default(),
        );
        assert_eq!(bare.evidence, Evidence { available: 0, possible: 5 });
    }

    #[test]
    fn left_hander_gets_a_small_edge() {
        let mut a = baseline_profile("a", "A", 4.0);
        let b = baseline_profile("b", "B", 4.0);
        a.dominant_hand = Hand::Left;
        let set = extract(&a, &b, &HeadToHeadRecord::default());
        assert!((set.get(Factor::Physical).unwrap() - LEFT_HAND_EDGE).abs() < 1e-12);
    }
}
