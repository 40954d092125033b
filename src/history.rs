use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calibration::Outcome;
use crate::profile::{Matchup, Side};

/// A settled match, stored with the pre-match profiles as they were known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalMatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub matchup: Matchup,
    pub winner: Side,
    #[serde(default)]
    pub played_on: Option<NaiveDate>,
}

impl HistoricalMatch {
    pub fn outcome(&self) -> Outcome {
        match self.winner {
            Side::A => Outcome::A,
            Side::B => Outcome::B,
        }
    }
}

pub fn parse_history_json(raw: &str) -> Result<Vec<HistoricalMatch>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("parse history json")
}

/// Loads a history file, oldest match first. Rows without a date keep their
/// file order after dated rows.
pub fn load_history(path: &Path) -> Result<Vec<HistoricalMatch>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read history {}", path.display()))?;
    let mut rows = parse_history_json(&raw)
        .with_context(|| format!("history file {}", path.display()))?;
    rows.sort_by_key(|m| m.played_on.unwrap_or(NaiveDate::MAX));
    Ok(rows)
}

pub fn parse_matchups_json(raw: &str) -> Result<Vec<Matchup>> {
    let value: serde_json::Value = serde_json::from_str(raw).context("parse matchup json")?;
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(_) => serde_json::from_value(value).context("matchup list"),
        serde_json::Value::Object(_) => Ok(vec![
            serde_json::from_value(value).context("single matchup")?,
        ]),
        other => Err(anyhow!("expected a matchup object or list, got {other}")),
    }
}

pub fn load_matchups(path: &Path) -> Result<Vec<Matchup>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read matchups {}", path.display()))?;
    parse_matchups_json(&raw).with_context(|| format!("matchup file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_history_is_empty() {
        assert!(parse_history_json("null").expect("null parses").is_empty());
        assert!(parse_history_json("  ").expect("blank parses").is_empty());
    }

    #[test]
    fn scalar_matchup_json_is_rejected() {
        assert!(parse_matchups_json("42").is_err());
        assert!(parse_matchups_json("null").expect("null parses").is_empty());
    }
}
