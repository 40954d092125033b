use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use netprophet::calibration::{self, Outcome};
use netprophet::history::{HistoricalMatch, load_history};
use netprophet::params::{ModelParams, load_params, save_params};
use netprophet::predict::{PredictionResult, predict_matchup};
use netprophet::profile::Matchup;
use netprophet::report_export;

const DEFAULT_BINS: usize = 10;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let history_path = positional_arg()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/history.json"));
    let fit = has_flag("--fit");
    let bins = parse_usize_arg("--bins")
        .unwrap_or(DEFAULT_BINS)
        .clamp(2, 50);
    let xlsx = parse_string_arg("--xlsx").map(PathBuf::from);
    let save_to = parse_string_arg("--save-params").map(PathBuf::from);

    let params = match parse_string_arg("--params") {
        Some(p) => load_params(&PathBuf::from(p))?,
        None => ModelParams::from_env(),
    };

    let rows = load_history(&history_path)?;
    if rows.is_empty() {
        return Err(anyhow!(
            "no historical matches found in {}",
            history_path.display()
        ));
    }
    tracing::info!(rows = rows.len(), path = %history_path.display(), "history loaded");

    let matchups: Vec<&Matchup> = rows.iter().map(|m| &m.matchup).collect();
    let outcomes: Vec<Outcome> = rows.iter().map(HistoricalMatch::outcome).collect();

    let p_a = calibration::predict_all(&matchups, &params);
    let model = calibration::evaluate_probs(&p_a, &outcomes);

    let coin = calibration::evaluate_probs(&vec![0.5; outcomes.len()], &outcomes);
    let base_rate = calibration::empirical_rate(&outcomes);
    let empirical = calibration::evaluate_probs(&vec![base_rate; outcomes.len()], &outcomes);

    print_metrics("Coin flip", coin);
    print_metrics(&format!("Empirical A rate ({base_rate:.3})"), empirical);
    print_metrics(&format!("Model (k={:.2})", params.logistic_k), model);

    let bin_rows = calibration::calibration_bins(&p_a, &outcomes, bins);
    println!("Reliability:");
    for bin in bin_rows.iter().filter(|b| b.count > 0) {
        println!(
            "  {:.2}-{:.2}  n={:<4} pred={:.3} actual={:.3}",
            bin.bucket_start, bin.bucket_end, bin.count, bin.avg_pred, bin.actual_rate
        );
    }

    if fit {
        let (best_k, fitted) = calibration::fit_logistic_k(&matchups, &outcomes, &params);
        print_metrics(&format!("Fitted (k={best_k:.2})"), fitted);
        if let Some(path) = &save_to {
            let tuned = ModelParams {
                logistic_k: best_k,
                ..params.clone()
            };
            save_params(path, &tuned)?;
            println!("Saved tuned params to {}", path.display());
        }
    }

    if let Some(path) = xlsx {
        let results: Vec<PredictionResult> = matchups
            .iter()
            .map(|m| predict_matchup(m, &params))
            .collect();
        let paired: Vec<(&HistoricalMatch, &PredictionResult)> =
            rows.iter().zip(results.iter()).collect();
        let report = report_export::export_backtest(&path, &paired, &bin_rows)
            .with_context(|| format!("export backtest to {}", path.display()))?;
        println!(
            "Wrote {} predictions and {} bins to {}",
            report.predictions,
            report.bins,
            path.display()
        );
    }

    Ok(())
}

fn print_metrics(label: &str, metrics: calibration::Metrics) {
    println!("{label}:");
    println!(
        "  samples={} brier={:.4} log_loss={:.4} accuracy={:.3}",
        metrics.samples, metrics.brier, metrics.log_loss, metrics.accuracy
    );
}

fn positional_arg() -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if matches!(
            arg.as_str(),
            "--bins" | "--xlsx" | "--params" | "--save-params"
        ) {
            skip_next = true;
            continue;
        }
        if !arg.starts_with("--") {
            return Some(arg.clone());
        }
    }
    None
}

fn parse_string_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && !raw.trim().is_empty()
        {
            return Some(raw.trim().to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn parse_usize_arg(name: &str) -> Option<usize> {
    parse_string_arg(name).and_then(|v| v.parse::<usize>().ok())
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
