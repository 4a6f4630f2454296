//! Star Skater headless runner
//!
//! Plays the game with the autopilot for a fixed number of ticks and prints a
//! JSON summary. Useful for soak testing tuning files.
//!
//! Usage: `star-skater [ticks] [tuning.json] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde::Serialize;

    use star_skater::audio::LogSound;
    use star_skater::highscores::HighScoreEntry;
    use star_skater::platform::DrawRecorder;
    use star_skater::sim::{GameSession, SessionStatus, autopilot};
    use star_skater::{Settings, Tuning};

    const DEFAULT_TICKS: u64 = 60 * 60 * 5;

    #[derive(Debug, Serialize)]
    struct RunSummary {
        seed: u64,
        ticks: u64,
        runs: u64,
        final_status: String,
        final_score: u64,
        high_scores: Vec<HighScoreEntry>,
    }

    fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
        let tuning = Tuning::from_json(&json).map_err(|e| format!("{}: {}", path, e))?;
        log::info!("Loaded tuning from {}", path);
        Ok(tuning)
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    pub fn run() {
        env_logger::init();
        log::info!("Star Skater (headless) starting...");

        let args: Vec<String> = std::env::args().skip(1).collect();
        let ticks = match args.first().map(|a| a.parse::<u64>()) {
            None => DEFAULT_TICKS,
            Some(Ok(ticks)) => ticks,
            Some(Err(e)) => {
                log::error!("Invalid tick count {:?}: {}", args[0], e);
                std::process::exit(1);
            }
        };

        let tuning = match load_tuning(args.get(1).map(String::as_str)) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                std::process::exit(1);
            }
        };

        let settings = args
            .get(2)
            .map(|p| Settings::load(Path::new(p)))
            .unwrap_or_default();
        let seed = settings.seed.unwrap_or_else(clock_seed);

        let mut session = match GameSession::new(tuning, seed, Box::new(LogSound)) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                std::process::exit(1);
            }
        };
        session.audio_mut().apply_settings(&settings);

        let mut screen = DrawRecorder::default();
        let mut text = DrawRecorder::default();
        let mut runs = 0;

        for _ in 0..ticks {
            let before = session.status();
            let input = autopilot(&session);
            *session.input_mut() = input;
            session.update();
            if before != SessionStatus::Playing && session.status() == SessionStatus::Playing {
                runs += 1;
            }
            text.texts.clear();
            session.draw(&mut screen, &mut text);
        }

        let summary = RunSummary {
            seed,
            ticks,
            runs,
            final_status: format!("{:?}", session.status()),
            final_score: session.score(),
            high_scores: session.high_scores().entries.clone(),
        };
        log::info!("Done after {} runs, {} draw frames", runs, screen.frames);

        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `GameSession` directly through the library
}
