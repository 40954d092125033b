pub mod calibration;
pub mod confidence;
pub mod explain;
pub mod features;
pub mod history;
pub mod odds;
pub mod params;
pub mod predict;
pub mod profile;
pub mod report_export;
pub mod sample;
pub mod state;
pub mod win_prob;

pub use odds::format_odds;
pub use predict::{PredictionResult, predict_match, predict_match_with};
