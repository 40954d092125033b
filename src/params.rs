use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::features::Factor;

pub const PARAMS_ENV: &str = "NETPROPHET_PARAMS";

/// Calibration of the whole pipeline. Passed by reference into every stage so
/// alternate calibrations can run side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelParams {
    // Keyed by factor name. Missing names weigh 0; unknown names are ignored.
    pub weights: BTreeMap<String, f64>,
    pub logistic_k: f64,
    // pA is clamped to [prob_floor, 1 - prob_floor].
    pub prob_floor: f64,
    pub margin: f64,
    pub min_odds: f64,
    pub recency_decay: f64,
    pub preferred_surface_bonus: f64,
    pub low_confidence: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        let weights = [
            (Factor::RatingDifferential, 1.00),
            (Factor::SurfaceFit, 0.45),
            (Factor::RecentForm, 0.20),
            (Factor::SeasonalForm, 0.30),
            (Factor::HeadToHead, 0.45),
            (Factor::FatigueInjury, 0.15),
            (Factor::Physical, 0.10),
        ]
        .into_iter()
        .map(|(f, w)| (f.as_str().to_string(), w))
        .collect();

        Self {
            weights,
            logistic_k: 0.85,
            prob_floor: 0.02,
            margin: 0.05,
            min_odds: 1.01,
            recency_decay: 0.80,
            preferred_surface_bonus: 0.10,
            low_confidence: 0.40,
        }
    }
}

impl ModelParams {
    pub fn weight(&self, factor: Factor) -> f64 {
        self.weights
            .get(factor.as_str())
            .copied()
            .filter(|w| w.is_finite())
            .unwrap_or(0.0)
    }

    pub fn with_weight(mut self, factor: Factor, weight: f64) -> Self {
        self.weights.insert(factor.as_str().to_string(), weight);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.logistic_k.is_finite() || self.logistic_k <= 0.0 {
            return Err(anyhow!("logisticK must be positive, got {}", self.logistic_k));
        }
        if !(self.prob_floor > 0.0 && self.prob_floor < 0.5) {
            return Err(anyhow!("probFloor must lie in (0, 0.5), got {}", self.prob_floor));
        }
        if !(0.0..=0.25).contains(&self.margin) {
            return Err(anyhow!("margin must lie in [0, 0.25], got {}", self.margin));
        }
        if !self.min_odds.is_finite() || self.min_odds < 1.0 {
            return Err(anyhow!("minOdds must be at least 1.0, got {}", self.min_odds));
        }
        if !(self.recency_decay > 0.0 && self.recency_decay <= 1.0) {
            return Err(anyhow!(
                "recencyDecay must lie in (0, 1], got {}",
                self.recency_decay
            ));
        }
        if !(0.0..=1.0).contains(&self.low_confidence) {
            return Err(anyhow!(
                "lowConfidence must lie in [0, 1], got {}",
                self.low_confidence
            ));
        }
        if let Some((name, w)) = self.weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(anyhow!("weight for {name} is not finite: {w}"));
        }
        Ok(())
    }

    /// Loads `NETPROPHET_PARAMS` when set, otherwise the built-in table.
    pub fn from_env() -> Self {
        let Some(path) = env::var(PARAMS_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        else {
            return Self::default();
        };
        match load_params(Path::new(&path)) {
            Ok(params) => params,
            Err(err) => {
                tracing::warn!("falling back to default model params: {err:#}");
                Self::default()
            }
        }
    }
}

pub fn load_params(path: &Path) -> Result<ModelParams> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read model params {}", path.display()))?;
    let params: ModelParams = serde_json::from_str(&raw)
        .with_context(|| format!("parse model params {}", path.display()))?;
    params.validate()?;
    Ok(params)
}

pub fn save_params(path: &Path, params: &ModelParams) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(params).context("serialize model params")?;
    fs::write(&tmp, json).context("write model params")?;
    fs::rename(&tmp, path).context("swap model params")?;
    Ok(())
}
