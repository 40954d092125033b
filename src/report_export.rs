use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::calibration::CalibrationBin;
use crate::history::HistoricalMatch;
use crate::odds::format_odds;
use crate::predict::PredictionResult;
use crate::profile::Side;

pub struct ExportReport {
    pub predictions: usize,
    pub bins: usize,
}

pub fn export_backtest(
    path: &Path,
    rows: &[(&HistoricalMatch, &PredictionResult)],
    bins: &[CalibrationBin],
) -> Result<ExportReport> {
    let mut prediction_rows = vec![vec![
        "Match".to_string(),
        "Date".to_string(),
        "Surface".to_string(),
        "Player A".to_string(),
        "Player B".to_string(),
        "P(A)".to_string(),
        "Odds A".to_string(),
        "Odds B".to_string(),
        "Confidence".to_string(),
        "Winner".to_string(),
        "Recommendations".to_string(),
    ]];

    for (idx, (hist, pred)) in rows.iter().enumerate() {
        let m = &hist.matchup;
        let winner = match hist.winner {
            Side::A => &m.player_a.name,
            Side::B => &m.player_b.name,
        };
        prediction_rows.push(vec![
            hist.id.clone().unwrap_or_else(|| format!("#{}", idx + 1)),
            hist.played_on.map(|d| d.to_string()).unwrap_or_default(),
            m.context.surface.label().to_string(),
            m.player_a.name.clone(),
            m.player_b.name.clone(),
            format!("{:.3}", pred.probability_a),
            format_odds(pred.decimal_odds_a),
            format_odds(pred.decimal_odds_b),
            format!("{:.2}", pred.confidence),
            winner.clone(),
            pred.recommendations.join("; "),
        ]);
    }

    let mut bin_rows = vec![vec![
        "Bucket".to_string(),
        "Count".to_string(),
        "Avg P(A)".to_string(),
        "Actual A rate".to_string(),
    ]];
    for bin in bins {
        bin_rows.push(vec![
            format!("{:.2}-{:.2}", bin.bucket_start, bin.bucket_end),
            bin.count.to_string(),
            format!("{:.3}", bin.avg_pred),
            format!("{:.3}", bin.actual_rate),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Predictions")?;
        write_rows(sheet, &prediction_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Calibration")?;
        write_rows(sheet, &bin_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        predictions: prediction_rows.len().saturating_sub(1),
        bins: bin_rows.len().saturating_sub(1),
    })
}

fn write_rows(sheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            sheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
