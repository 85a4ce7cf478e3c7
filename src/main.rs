//! Lane Runner headless demo
//!
//! Plays a few autopiloted runs in one session and logs how the spawner
//! adapts. The browser build uses the `web` bindings instead.
//!
//! Usage: `lane-runner [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), lane_runner::TuningError> {
    use lane_runner::Tuning;
    use lane_runner::consts::FRAME_MS;
    use lane_runner::sim::{Session, TickInput, TickOutcome};

    /// Runs per demo session
    const DEMO_RUNS: usize = 5;
    /// Give up on a run the autopilot can't lose
    const MAX_TICKS_PER_RUN: u64 = 36_000;
    const DEMO_SEED: u64 = 0x5EED;

    env_logger::init();
    log::info!("Lane Runner (native) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::from_file(&path)?,
        None => Tuning::default(),
    };

    let mut session = Session::new(DEMO_SEED, tuning);
    let mut now = 0.0;

    for run in 1..=DEMO_RUNS {
        session.restart(now);
        let input_at = |now| TickInput {
            now,
            autopilot: true,
        };
        loop {
            now += FRAME_MS;
            match session.tick(&input_at(now)) {
                TickOutcome::Ended(report) => {
                    log::info!(
                        "Run {}: score {} after {} ticks, {} mistakes total",
                        run,
                        report.score,
                        report.ticks,
                        report.total_mistakes
                    );
                    break;
                }
                _ if session.run.score >= MAX_TICKS_PER_RUN => {
                    log::warn!("Run {} survived {} ticks, stopping", run, session.run.score);
                    break;
                }
                _ => {}
            }
        }

        let hud = session.hud(now);
        log::info!(
            "HUD: favored lane {}, timing \"{}\", speed {}",
            hud.favored_lane,
            hud.timing,
            hud.speed
        );
    }

    if session.high_scores.is_empty() {
        println!("No runs made the leaderboard");
    }
    for (rank, entry) in session.high_scores.entries.iter().enumerate() {
        println!(
            "{:>2}. {:>6}  ({} ticks, {} mistakes)",
            rank + 1,
            entry.score,
            entry.ticks,
            entry.total_mistakes
        );
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::init`, this is just to satisfy the compiler
}
