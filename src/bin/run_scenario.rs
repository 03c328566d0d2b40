//! 场景驱动入口
//!
//! 从 JSON 场景文件装配协议链并运行全部交换。

use clap::Parser;
use netsim_rs::scenario::{ScenarioSpec, run_scenario};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "run-scenario",
    about = "Run scenario.json through the netsim-rs protocol chain"
)]
struct Args {
    /// Path to scenario.json
    #[arg(long)]
    scenario: PathBuf,

    /// Output report JSON file
    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    let raw = fs::read_to_string(&args.scenario).expect("read scenario.json");
    let spec: ScenarioSpec = serde_json::from_str(&raw).expect("parse scenario.json");

    info!(
        schema_version = spec.schema_version,
        exchanges = spec.exchanges.len(),
        "场景加载完成"
    );

    let report = run_scenario(&spec).unwrap_or_else(|e| panic!("run scenario: {e}"));

    for (i, exchange) in report.exchanges.iter().enumerate() {
        println!(
            "exchange {i}: payload_bytes={} wire_bytes={} segments={} round_trip_ok={}",
            exchange.payload_bytes,
            exchange.wire_bytes,
            exchange.segments,
            exchange.round_trip_ok
        );
    }

    if let Some(path) = &args.report_json {
        let rendered = serde_json::to_string_pretty(&report).expect("serialize report");
        fs::write(path, rendered).expect("write report json");
        info!(path = %path.display(), "报告已写出");
    }
}
