//! Headless simulation driver (default binary).
//!
//! Runs the engine against a synthetic 60 Hz host clock with a scripted input
//! stream and prints a summary. Equal seeds and scripts give equal results,
//! which makes this handy for smoke runs and for checking determinism.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;

use blockfall::core::{EventLog, GameStats, RenderSnapshot};
use blockfall::engine::{EngineState, GameEngine, InputEvent};
use blockfall::types::{InputAction, InputPhase};
use blockfall::Settings;

const DEFAULT_SCRIPT: &str = "left,rotate,right,right,down,drop,hold,rotateCcw,left,drop";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Piece sequence seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,
    /// Number of host frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u32,
    /// Settings JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Feed one scripted action every N frames
    #[arg(long, default_value_t = 12)]
    input_every: u32,
    /// Comma-separated action script, repeated until the run ends
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    script: String,
    /// Print the summary and final snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    seed: Option<u64>,
    frames: u32,
    steps: u64,
    state: EngineState,
    score: u32,
    level: u32,
    lines: u32,
    stats: GameStats,
    events: usize,
    snapshot: RenderSnapshot,
}

fn parse_script(script: &str) -> Result<Vec<InputAction>> {
    let actions = script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match InputAction::from_str(s) {
            Some(action) => Ok(action),
            None => bail!("unknown action {:?} in script", s),
        })
        .collect::<Result<Vec<_>>>()?;
    if actions.is_empty() {
        bail!("input script is empty");
    }
    Ok(actions)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match cli.config {
        Some(ref path) => {
            let settings = Settings::load(path)?;
            log::info!("loaded settings from {}", path.display());
            settings
        }
        None => Settings::default(),
    };
    if cli.seed.is_some() {
        settings.logic.seed = cli.seed;
    }
    log::info!(
        "simulating {} frames at {} Hz, seed {:?}",
        cli.frames,
        settings.engine.fixed_step_hz,
        settings.logic.seed
    );
    let script = parse_script(&cli.script)?;
    let input_every = cli.input_every.max(1);

    let log = Rc::new(RefCell::new(EventLog::new()));
    let mut engine = GameEngine::new(settings.logic.clone(), settings.engine.clone());
    engine.add_observer(Box::new(Rc::clone(&log)));
    engine.start();

    let frame = Duration::from_secs(1) / settings.engine.fixed_step_hz.max(1);
    let mut next_action = script.iter().cycle();
    let mut frames = 0;
    for n in 0..cli.frames {
        if n % input_every == 0 {
            if let Some(&action) = next_action.next() {
                engine.push_input(InputEvent::new(
                    action,
                    InputPhase::Press,
                    frame.as_secs_f64() * 1000.0 * f64::from(n),
                ));
            }
        }
        frames = n + 1;
        if !engine.frame(frame * n) {
            break;
        }
    }

    let (score, level, lines) = engine
        .scorer()
        .map_or((0, 0, 0), |k| (k.score(), k.level(), k.lines()));
    let summary = Summary {
        seed: settings.logic.seed,
        frames,
        steps: engine.steps(),
        state: engine.state(),
        score,
        level,
        lines,
        stats: *engine.logic().stats(),
        events: log.borrow().events.len(),
        snapshot: engine.snapshot(),
    };
    log::info!(
        "run finished: {:?} after {} frames, score {}, {} events",
        summary.state,
        summary.frames,
        summary.score,
        summary.events
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "state:  {:?} after {} frames ({} steps)",
            summary.state, summary.frames, summary.steps
        );
        println!(
            "score:  {} (level {}, {} lines)",
            summary.score, summary.level, summary.lines
        );
        println!(
            "pieces: {} placed, {} held, {} t-spins",
            summary.stats.pieces_placed, summary.stats.holds, summary.stats.t_spins
        );
        println!("events: {}", summary.events);
    }
    Ok(())
}
