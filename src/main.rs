//! Spin Arena headless runner
//!
//! Usage: `spin-arena [telemetry.json] [TICKER ...]`
//!
//! Runs one match at a fixed 60 Hz step and prints the result. Settings are
//! read from the file named by `SPIN_ARENA_SETTINGS` when set.

use anyhow::{Context, Result};

use spin_arena::Settings;
use spin_arena::consts::FRAME_DT;
use spin_arena::cues::LogSink;
use spin_arena::sim::{Match, MatchPhase, TelemetryBook};

/// Give up after this much simulated time
const TIME_LIMIT_SECS: f32 = 120.0;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Spin Arena (headless) starting...");

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let book = if args.first().is_some_and(|a| a.ends_with(".json")) {
        let path = args.remove(0);
        TelemetryBook::load(&path).with_context(|| format!("loading telemetry from {path}"))?
    } else {
        TelemetryBook::default()
    };

    let settings = match std::env::var("SPIN_ARENA_SETTINGS") {
        Ok(path) => Settings::load(&path).with_context(|| format!("loading settings from {path}"))?,
        Err(_) => Settings::default(),
    };

    let tickers: Vec<String> = if args.len() >= 2 {
        args
    } else {
        let from_book: Vec<String> = book.tickers().take(2).map(str::to_string).collect();
        if from_book.len() == 2 {
            from_book
        } else {
            vec!["ALPHA".to_string(), "OMEGA".to_string()]
        }
    };

    let mut arena = Match::new(settings);
    arena.start(tickers.as_slice(), &book).context("starting match")?;

    let max_ticks = (TIME_LIMIT_SECS / FRAME_DT) as u64;
    let mut sink = LogSink;
    while arena.should_schedule() && arena.time_ticks < max_ticks {
        arena.tick_with(FRAME_DT, &mut sink);
    }

    match &arena.phase {
        MatchPhase::Terminated { winner: Some(ticker) } => {
            println!("{ticker} wins after {} ticks", arena.time_ticks)
        }
        MatchPhase::Terminated { winner: None } => {
            println!("No one wins ({} ticks)", arena.time_ticks)
        }
        _ => println!("Time limit reached after {} ticks", arena.time_ticks),
    }

    let frame = serde_json::to_string_pretty(&arena.frame()).context("serializing final frame")?;
    println!("{frame}");
    Ok(())
}
