//! Churn Dashboard - command line front end
//!
//! Usage:
//!   churn_dashboard --csv fix.csv --status Churned --risk "High Risk"
//!   churn_dashboard --config dashboard.json --cltv-min 2000 --cltv-max 6000 --json

use anyhow::{Context, Result};
use churn_dashboard::data::{FilterSelection, Selector};
use churn_dashboard::report::TextReport;
use churn_dashboard::{DashboardApp, DashboardConfig};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = match arg_value(&args, "--config") {
        Some(path) => DashboardConfig::from_json_file(Path::new(path))
            .with_context(|| format!("loading config {path}"))?,
        None => DashboardConfig::default(),
    };
    if let Some(csv) = arg_value(&args, "--csv") {
        config.csv_path = csv.into();
    }
    let as_json = args.iter().any(|a| a == "--json");

    let app = DashboardApp::new(config);
    let mut selection = app
        .default_selection()
        .with_context(|| format!("loading {}", app.config().csv_path.display()))?;
    apply_args(&mut selection, &args)?;

    let view = app.render(&selection)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", TextReport::render(&view));
    }

    Ok(())
}

fn apply_args(selection: &mut FilterSelection, args: &[String]) -> Result<()> {
    if let Some(v) = arg_value(args, "--status") {
        selection.status = Selector::parse(v);
    }
    if let Some(v) = arg_value(args, "--satisfaction") {
        selection.satisfaction = Selector::parse(v);
    }
    if let Some(v) = arg_value(args, "--risk") {
        selection.risk = Selector::parse(v);
    }
    if let Some(v) = arg_value(args, "--cltv-min") {
        selection.cltv_range.min = v.parse().with_context(|| format!("--cltv-min {v}"))?;
    }
    if let Some(v) = arg_value(args, "--cltv-max") {
        selection.cltv_range.max = v.parse().with_context(|| format!("--cltv-max {v}"))?;
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
