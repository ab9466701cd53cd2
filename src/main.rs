use anyhow::Result;
use clap::Parser;
use nectar_core::init_logging;
use nectar_lib::app::{EpisodeSummary, MeadowConfig, PolicyKind};
use nectar_lib::meadow_harness;
use nectar_lib::model::config::AppConfig;
use rayon::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Episodes to run per environment
    #[arg(short, long, default_value_t = 5)]
    episodes: u32,

    /// Base seed; environment `i` uses `seed + i`
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override training mode from the config file
    #[arg(long)]
    training: Option<bool>,

    /// Scripted policy driving the agent
    #[arg(short, long, value_enum, default_value = "seek")]
    policy: PolicyKind,

    /// Step cap per episode, also applied outside training
    #[arg(long, default_value_t = 2000)]
    steps: u32,

    /// Independent environments run in parallel
    #[arg(long, default_value_t = 1)]
    envs: u32,

    /// Print one JSON object per episode instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let mut config = AppConfig::load(&args.config);
    if let Some(training) = args.training {
        config.agent.training_mode = training;
    }
    config.validate()?;

    let meadow = MeadowConfig {
        diameter: config.area.diameter,
        ..Default::default()
    };
    let base_seed = args.seed.or(config.sim.seed).unwrap_or_else(rand::random);
    tracing::info!(
        base_seed,
        envs = args.envs,
        episodes = args.episodes,
        training = config.agent.training_mode,
        "Starting headless run"
    );

    let runs: Vec<Result<Vec<EpisodeSummary>>> = (0..args.envs)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(u64::from(i));
            let mut harness = meadow_harness(config.clone(), &meadow, args.policy, seed)?;
            let summaries = harness.run(args.episodes, args.steps)?;
            harness.env.metrics().log_summary();
            Ok(summaries)
        })
        .collect();

    for (i, run) in runs.into_iter().enumerate() {
        for summary in run? {
            if args.json {
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                println!(
                    "env {:>2} | episode {:>3} | steps {:>5} | nectar {:>6.3} | reward {:>8.3} | walls {:>3}{}",
                    i,
                    summary.episode,
                    summary.steps,
                    summary.nectar,
                    summary.reward,
                    summary.boundary_hits,
                    if summary.safe_spawn { "" } else { " | unsafe spawn" }
                );
            }
        }
    }

    Ok(())
}
