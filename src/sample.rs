//! Demo matchups and random, internally consistent profiles for the demo tool,
//! benches and property tests.

use std::collections::HashMap;

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::profile::{
    Hand, HeadToHeadRecord, InjuryStatus, MatchContext, MatchOutcome, Matchup, PlayerProfile, Side,
    Surface,
};

const FIRST_NAMES: [&str; 10] = [
    "Alex", "Bruna", "Chen", "Dario", "Elif", "Femi", "Greta", "Hugo", "Ines", "Jonas",
];
const LAST_NAMES: [&str; 10] = [
    "Moreau", "Okafor", "Lindqvist", "Sato", "Novak", "Ferreira", "Kowalski", "Haddad", "Ruiz",
    "Brandt",
];

/// A plain mid-level profile with every optional field left empty.
pub fn baseline_profile(id: &str, name: &str, skill_rating: f64) -> PlayerProfile {
    PlayerProfile {
        id: id.to_string(),
        name: name.to_string(),
        skill_rating,
        wins: 10,
        losses: 10,
        recent_form: Vec::new(),
        current_streak: 0,
        streak_type: MatchOutcome::Win,
        surface_affinity: HashMap::new(),
        preferred_surface: Surface::Hard,
        aggressiveness: 5,
        stamina: 5,
        consistency: 5,
        age: 25,
        dominant_hand: Hand::Right,
        fatigue_level: None,
        injury_status: InjuryStatus::Healthy,
        seasonal_form: None,
        last_match_date: None,
    }
}

/// Sets `recent_form` and derives a matching streak.
pub fn with_recent_form(mut p: PlayerProfile, form: &[MatchOutcome]) -> PlayerProfile {
    p.recent_form = form.to_vec();
    match p.trailing_run() {
        Some((last, run)) => {
            p.streak_type = last;
            p.current_streak = run;
        }
        None => {
            p.streak_type = MatchOutcome::Win;
            p.current_streak = 0;
        }
    }
    p
}

pub fn demo_matchups() -> Vec<Matchup> {
    use MatchOutcome::{Loss, Win};

    let mut moreau = with_recent_form(
        baseline_profile("p-001", "Alex Moreau", 4.5),
        &[Win, Loss, Win, Win, Win],
    );
    moreau.wins = 15;
    moreau.losses = 8;
    moreau.surface_affinity = HashMap::from([(Surface::Hard, 0.68), (Surface::Clay, 0.52)]);
    moreau.stamina = 7;
    moreau.consistency = 6;
    moreau.aggressiveness = 8;
    moreau.fatigue_level = Some(3.0);
    moreau.seasonal_form = Some(0.64);
    moreau.last_match_date = NaiveDate::from_ymd_opt(2026, 10, 11);

    let mut okafor = with_recent_form(
        baseline_profile("p-002", "Bruna Okafor", 3.5),
        &[Loss, Win, Loss, Loss],
    );
    okafor.wins = 12;
    okafor.losses = 10;
    okafor.surface_affinity = HashMap::from([(Surface::Hard, 0.50), (Surface::Clay, 0.71)]);
    okafor.preferred_surface = Surface::Clay;
    okafor.dominant_hand = Hand::Left;
    okafor.fatigue_level = Some(5.5);
    okafor.injury_status = InjuryStatus::Minor;
    okafor.seasonal_form = Some(0.55);

    let mut sato = with_recent_form(
        baseline_profile("p-003", "Chen Sato", 4.0),
        &[Win, Win, Loss, Win],
    );
    sato.wins = 31;
    sato.losses = 22;
    sato.preferred_surface = Surface::Grass;
    sato.consistency = 8;

    let mut novak = with_recent_form(
        baseline_profile("p-004", "Elif Novak", 4.0),
        &[Loss, Win, Win, Win],
    );
    novak.wins = 2;
    novak.losses = 1;
    novak.preferred_surface = Surface::Indoor;

    vec![
        Matchup {
            player_a: moreau.clone(),
            player_b: okafor.clone(),
            context: MatchContext::on(Surface::Hard),
            head_to_head: HeadToHeadRecord {
                wins_for_side_a: 1,
                wins_for_side_b: 2,
                last_meeting_result: Some(Side::B),
                last_meeting_date: NaiveDate::from_ymd_opt(2026, 6, 2),
            },
        },
        Matchup {
            player_a: okafor,
            player_b: sato.clone(),
            context: MatchContext::on(Surface::Clay),
            head_to_head: HeadToHeadRecord::default(),
        },
        Matchup {
            player_a: sato,
            player_b: novak,
            context: MatchContext::on(Surface::Grass),
            head_to_head: HeadToHeadRecord {
                wins_for_side_a: 0,
                wins_for_side_b: 3,
                last_meeting_result: None,
                last_meeting_date: None,
            },
        },
    ]
}

pub fn random_profile<R: Rng + ?Sized>(rng: &mut R, id: &str) -> PlayerProfile {
    let name = format!(
        "{} {}",
        FIRST_NAMES.choose(rng).copied().unwrap_or("Sam"),
        LAST_NAMES.choose(rng).copied().unwrap_or("Doe")
    );
    let skill = (rng.gen_range(2.0..6.5_f64) * 4.0).round() / 4.0;
    let mut p = baseline_profile(id, &name, skill);

    p.wins = rng.gen_range(0..60);
    p.losses = rng.gen_range(0..60);

    let form_len = rng.gen_range(0..=5);
    let form: Vec<MatchOutcome> = (0..form_len)
        .map(|_| {
            if rng.gen_bool(0.5) {
                MatchOutcome::Win
            } else {
                MatchOutcome::Loss
            }
        })
        .collect();
    p = with_recent_form(p, &form);
    if p.current_streak == 5 && rng.gen_bool(0.3) {
        // The streak may reach back past the stored window.
        p.current_streak += rng.gen_range(0..4);
    }

    for surface in Surface::ALL {
        if rng.gen_bool(0.5) {
            p.surface_affinity
                .insert(surface, (rng.gen_range(0.2..0.85_f64) * 100.0).round() / 100.0);
        }
    }
    p.preferred_surface = *Surface::ALL.choose(rng).unwrap_or(&Surface::Hard);
    p.aggressiveness = rng.gen_range(1..=10);
    p.stamina = rng.gen_range(1..=10);
    p.consistency = rng.gen_range(1..=10);
    p.age = rng.gen_range(16..=38);
    p.dominant_hand = if rng.gen_bool(0.15) {
        Hand::Left
    } else {
        Hand::Right
    };
    p.fatigue_level = rng
        .gen_bool(0.6)
        .then(|| (rng.gen_range(0.0..10.0_f64) * 10.0).round() / 10.0);
    p.injury_status = match rng.gen_range(0..10) {
        0 => InjuryStatus::Major,
        1 | 2 => InjuryStatus::Minor,
        _ => InjuryStatus::Healthy,
    };
    p.seasonal_form = rng
        .gen_bool(0.6)
        .then(|| (rng.gen_range(0.1..0.9_f64) * 100.0).round() / 100.0);
    p
}

pub fn random_matchup<R: Rng + ?Sized>(rng: &mut R, serial: u32) -> Matchup {
    let player_a = random_profile(rng, &format!("r-{serial}-a"));
    let player_b = random_profile(rng, &format!("r-{serial}-b"));
    let wins_for_side_a = rng.gen_range(0..6);
    let wins_for_side_b = rng.gen_range(0..6);
    let last_meeting_result = if wins_for_side_a + wins_for_side_b == 0 {
        None
    } else if rng.gen_bool(0.5) {
        Some(Side::A)
    } else {
        Some(Side::B)
    };
    Matchup {
        player_a,
        player_b,
        context: MatchContext::on(*Surface::ALL.choose(rng).unwrap_or(&Surface::Hard)),
        head_to_head: HeadToHeadRecord {
            wins_for_side_a,
            wins_for_side_b,
            last_meeting_result,
            last_meeting_date: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn demo_profiles_have_consistent_streaks() {
        for m in demo_matchups() {
            assert!(m.player_a.has_consistent_streak(), "{}", m.player_a.name);
            assert!(m.player_b.has_consistent_streak(), "{}", m.player_b.name);
        }
    }

    #[test]
    fn random_profiles_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..200 {
            let p = random_profile(&mut rng, &format!("p{i}"));
            assert!(p.has_consistent_streak());
            assert!(p.recent_form.len() <= 5);
            assert!((1..=10).contains(&p.stamina));
            assert!(p.fatigue_level.is_none_or(|f| (0.0..=10.0).contains(&f)));
            assert!(p.seasonal_form.is_none_or(|s| (0.0..=1.0).contains(&s)));
        }
    }
}
