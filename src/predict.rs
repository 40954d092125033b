use serde::Serialize;

use crate::confidence::compute_confidence;
use crate::explain::{self, ExplainInput, Factors};
use crate::features::extract_features;
use crate::odds::display_odds;
use crate::params::ModelParams;
use crate::profile::{HeadToHeadRecord, MatchContext, Matchup, PlayerProfile};
use crate::win_prob::compute_win_prob;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub probability_a: f64,
    pub probability_b: f64,
    pub decimal_odds_a: f64,
    pub decimal_odds_b: f64,
    pub factors: Factors,
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

/// Predicts `a` against `b` with the built-in calibration.
pub fn predict_match(
    a: &PlayerProfile,
    b: &PlayerProfile,
    ctx: &MatchContext,
    h2h: &HeadToHeadRecord,
) -> PredictionResult {
    predict_match_with(a, b, ctx, h2h, &ModelParams::default())
}

pub fn predict_match_with(
    a: &PlayerProfile,
    b: &PlayerProfile,
    ctx: &MatchContext,
    h2h: &HeadToHeadRecord,
    params: &ModelParams,
) -> PredictionResult {
    let features = extract_features(a, b, ctx, h2h, params);
    let win = compute_win_prob(&features, params);
    let confidence = compute_confidence(a, b, features.evidence, win.score);
    let factors = Factors::from_features(&features, params);

    let recommendations = explain::recommendations(&ExplainInput {
        player_a: a,
        player_b: b,
        context: ctx,
        factors: &factors,
        p_a: win.p_a,
        confidence,
        low_confidence: params.low_confidence,
    });

    tracing::debug!(
        a = %a.id,
        b = %b.id,
        surface = %ctx.surface,
        score = win.score,
        p_a = win.p_a,
        confidence,
        "match predicted"
    );

    PredictionResult {
        probability_a: win.p_a,
        probability_b: win.p_b,
        decimal_odds_a: display_odds(win.p_a, params.margin, params.min_odds),
        decimal_odds_b: display_odds(win.p_b, params.margin, params.min_odds),
        factors,
        confidence,
        recommendations,
    }
}

pub fn predict_matchup(matchup: &Matchup, params: &ModelParams) -> PredictionResult {
    predict_match_with(
        &matchup.player_a,
        &matchup.player_b,
        &matchup.context,
        &matchup.head_to_head,
        params,
    )
}
