use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    Hard,
    Clay,
    Grass,
    Indoor,
}

impl Surface {
    pub const ALL: [Surface; 4] = [Surface::Hard, Surface::Clay, Surface::Grass, Surface::Indoor];

    pub fn label(self) -> &'static str {
        match self {
            Surface::Hard => "Hard Court",
            Surface::Clay => "Clay",
            Surface::Grass => "Grass",
            Surface::Indoor => "Indoor",
        }
    }

    pub fn next(self) -> Surface {
        match self {
            Surface::Hard => Surface::Clay,
            Surface::Clay => Surface::Grass,
            Surface::Grass => Surface::Indoor,
            Surface::Indoor => Surface::Hard,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Win,
    Loss,
}

impl MatchOutcome {
    pub fn sign(self) -> f64 {
        match self {
            MatchOutcome::Win => 1.0,
            MatchOutcome::Loss => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InjuryStatus {
    #[default]
    Healthy,
    Minor,
    Major,
}

/// Which profile of an ordered `(A, B)` pair something refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// +1 for A, -1 for B, matching the "positive favors A" convention.
    pub fn sign(self) -> f64 {
        match self {
            Side::A => 1.0,
            Side::B => -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: String,
    pub name: String,
    pub skill_rating: f64,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    // Oldest first, most recent last. Only the trailing five are read.
    #[serde(default)]
    pub recent_form: Vec<MatchOutcome>,
    #[serde(default)]
    pub current_streak: u32,
    pub streak_type: MatchOutcome,
    #[serde(default)]
    pub surface_affinity: HashMap<Surface, f64>,
    pub preferred_surface: Surface,
    pub aggressiveness: u8,
    pub stamina: u8,
    pub consistency: u8,
    pub age: u8,
    pub dominant_hand: Hand,
    #[serde(default)]
    pub fatigue_level: Option<f64>,
    #[serde(default)]
    pub injury_status: InjuryStatus,
    #[serde(default)]
    pub seasonal_form: Option<f64>,
    #[serde(default)]
    pub last_match_date: Option<NaiveDate>,
}

impl PlayerProfile {
    pub fn matches_played(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// Win rate on `surface`, if the player has an explicit entry for it.
    pub fn surface_rate(&self, surface: Surface) -> Option<f64> {
        self.surface_affinity
            .get(&surface)
            .copied()
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 1.0))
    }

    /// Length of the trailing run of identical outcomes in `recent_form`.
    pub fn trailing_run(&self) -> Option<(MatchOutcome, u32)> {
        let last = *self.recent_form.last()?;
        let run = self
            .recent_form
            .iter()
            .rev()
            .take_while(|o| **o == last)
            .count() as u32;
        Some((last, run))
    }

    /// Checks `current_streak`/`streak_type` against `recent_form`. A streak
    /// may run longer than the stored window when the whole window agrees.
    pub fn has_consistent_streak(&self) -> bool {
        let Some((last, run)) = self.trailing_run() else {
            return true;
        };
        if self.current_streak == 0 || self.streak_type != last {
            return false;
        }
        if run as usize == self.recent_form.len() {
            self.current_streak >= run
        } else {
            self.current_streak == run
        }
    }

    /// Signed streak: wins positive, losses negative.
    pub fn signed_streak(&self) -> f64 {
        self.current_streak as f64 * self.streak_type.sign()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchContext {
    pub surface: Surface,
}

impl MatchContext {
    pub fn on(surface: Surface) -> Self {
        Self { surface }
    }
}

/// Head-to-head tally, already oriented so that `wins_for_side_a` belongs to
/// the profile passed as A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadRecord {
    #[serde(default)]
    pub wins_for_side_a: u32,
    #[serde(default)]
    pub wins_for_side_b: u32,
    #[serde(default)]
    pub last_meeting_result: Option<Side>,
    #[serde(default)]
    pub last_meeting_date: Option<NaiveDate>,
}

impl HeadToHeadRecord {
    pub fn meetings(&self) -> u32 {
        self.wins_for_side_a.saturating_add(self.wins_for_side_b)
    }

    /// The same record seen from B's side.
    pub fn flipped(&self) -> Self {
        Self {
            wins_for_side_a: self.wins_for_side_b,
            wins_for_side_b: self.wins_for_side_a,
            last_meeting_result: self.last_meeting_result.map(Side::other),
            last_meeting_date: self.last_meeting_date,
        }
    }
}

/// Everything `predict_match` needs for one ordered pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub player_a: PlayerProfile,
    pub player_b: PlayerProfile,
    pub context: MatchContext,
    #[serde(default)]
    pub head_to_head: HeadToHeadRecord,
}

impl Matchup {
    pub fn swapped(&self) -> Self {
        Self {
            player_a: self.player_b.clone(),
            player_b: self.player_a.clone(),
            context: self.context,
            head_to_head: self.head_to_head.flipped(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} vs {}", self.player_a.name, self.player_b.name)
    }
}
