use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::odds::format_odds;
use crate::params::ModelParams;
use crate::predict::{PredictionResult, predict_matchup};
use crate::profile::{Matchup, Side};
use crate::sample;

const MAX_LOGS: usize = 200;
const RATING_STEP: f64 = 0.25;
const RATING_MIN: f64 = 1.0;
const RATING_MAX: f64 = 7.0;

/// State of the demo tool: a list of matchups and the one under the cursor.
pub struct DemoState {
    pub matchups: Vec<Matchup>,
    pub selected: usize,
    pub params: ModelParams,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    rng: StdRng,
    random_serial: u32,
}

impl DemoState {
    pub fn new(matchups: Vec<Matchup>, params: ModelParams) -> Self {
        let mut state = Self {
            matchups,
            selected: 0,
            params,
            help_overlay: false,
            logs: VecDeque::new(),
            rng: StdRng::from_entropy(),
            random_serial: 0,
        };
        let loaded = state.matchups.len();
        state.push_log(format!("[INFO] Loaded {loaded} matchups"));
        state
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn selected_matchup(&self) -> Option<&Matchup> {
        self.matchups.get(self.selected)
    }

    pub fn prediction(&self) -> Option<PredictionResult> {
        self.selected_matchup()
            .map(|m| predict_matchup(m, &self.params))
    }

    pub fn select_next(&mut self) {
        let total = self.matchups.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.matchups.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn cycle_surface(&mut self) {
        let Some(m) = self.matchups.get_mut(self.selected) else {
            return;
        };
        m.context.surface = m.context.surface.next();
        let msg = format!("[INFO] Surface set to {}", m.context.surface);
        self.push_log(msg);
    }

    pub fn adjust_rating(&mut self, side: Side, delta: f64) {
        let Some(m) = self.matchups.get_mut(self.selected) else {
            return;
        };
        let player = match side {
            Side::A => &mut m.player_a,
            Side::B => &mut m.player_b,
        };
        player.skill_rating = (player.skill_rating + delta).clamp(RATING_MIN, RATING_MAX);
        let msg = format!("[INFO] {} rating {:.2}", player.name, player.skill_rating);
        self.push_log(msg);
    }

    pub fn bump_rating(&mut self, side: Side, up: bool) {
        let delta = if up { RATING_STEP } else { -RATING_STEP };
        self.adjust_rating(side, delta);
    }

    /// Swaps A and B, reorienting the head-to-head record with them.
    pub fn swap_sides(&mut self) {
        let Some(m) = self.matchups.get_mut(self.selected) else {
            return;
        };
        *m = m.swapped();
        let msg = format!("[INFO] Swapped sides: {}", m.label());
        self.push_log(msg);
    }

    pub fn push_random(&mut self) {
        self.random_serial += 1;
        let m = sample::random_matchup(&mut self.rng, self.random_serial);
        let label = m.label();
        self.matchups.push(m);
        self.selected = self.matchups.len() - 1;
        self.push_log(format!("[INFO] Added {label}"));
    }

    /// One-line summary for the matchup list.
    pub fn row_summary(&self, idx: usize) -> Option<String> {
        let m = self.matchups.get(idx)?;
        let p = predict_matchup(m, &self.params);
        Some(format!(
            "{:<36} {:>5.1}% {:>6} {:>6}",
            m.label(),
            p.probability_a * 100.0,
            format_odds(p.decimal_odds_a),
            format_odds(p.decimal_odds_b)
        ))
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
