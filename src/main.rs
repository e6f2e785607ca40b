use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use settlement_planner::{
    console::{write_plan_status, Console},
    engine::Engine,
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Settlement construction planner")]
struct Cli {
    /// Path to the scenario file (YAML, or the line-oriented config format)
    #[arg(long, default_value = "scenarios/demo.yaml")]
    scenario: PathBuf,

    /// Run this many ticks headless instead of reading commands from stdin
    #[arg(long)]
    ticks: Option<u64>,

    /// Print the final world as JSON instead of per-plan status
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("settlement_planner=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let world = scenario.build_world()?;
    let mut engine = Engine::new(world);

    let Some(ticks) = scenario.ticks(cli.ticks) else {
        let mut console = Console::new(engine, io::stdout().lock(), io::stderr());
        return console.run(io::stdin().lock());
    };

    engine.step(ticks)?;
    let mut out = io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &engine.world().snapshot())?;
        writeln!(out)?;
    } else {
        for plan in engine.world().plans() {
            write_plan_status(&mut out, plan)?;
        }
    }
    tracing::info!(
        scenario = %scenario.name,
        ticks,
        plans = engine.world().plans().len(),
        "run completed"
    );
    Ok(())
}
