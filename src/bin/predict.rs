use std::path::PathBuf;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use netprophet::history::load_matchups;
use netprophet::params::{ModelParams, load_params};
use netprophet::predict::predict_matchup;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = positional_arg()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/matchup.json"));

    let params = match parse_path_arg("--params") {
        Some(p) => load_params(&p)?,
        None => ModelParams::from_env(),
    };

    // Loads one or more matchups and prints each prediction as JSON. No I/O
    // beyond the input file, meant for checking calibration changes by hand.
    let matchups = load_matchups(&path)?;
    if matchups.is_empty() {
        return Err(anyhow!("no matchups found in {}", path.display()));
    }

    for matchup in &matchups {
        let result = predict_matchup(matchup, &params);
        tracing::info!(matchup = %matchup.label(), "predicted");
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

fn positional_arg() -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--params" {
            skip_next = true;
            continue;
        }
        if !arg.starts_with("--") {
            return Some(arg.clone());
        }
    }
    None
}

fn parse_path_arg(name: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && !raw.trim().is_empty()
        {
            return Some(PathBuf::from(raw.trim()));
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next.trim()));
        }
    }
    None
}
