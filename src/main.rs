//! Cosmic Catcher entry point
//!
//! On the web this hands off to the browser platform. Natively it runs a
//! headless demo: the autopilot plays back-to-back runs against synthetic
//! 60 Hz timestamps and the best score persists to a JSON file.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = cosmic_catcher::platform::web::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use cosmic_catcher::audio::{LogSink, ToneAudio};
    use cosmic_catcher::autopilot;
    use cosmic_catcher::sim::{GamePhase, Viewport};
    use cosmic_catcher::{Game, JsonFileStore, PersistenceError, Tuning};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DEFAULT_SEED: u64 = 0xC0FFEE;
    const DEFAULT_FRAMES: u64 = 60 * 60;
    const DEFAULT_SAVE: &str = "cosmic_catcher_save.json";
    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub fn run() -> Result<(), PersistenceError> {
        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let frames = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FRAMES);
        let save_path =
            std::env::var("COSMIC_CATCHER_SAVE").unwrap_or_else(|_| DEFAULT_SAVE.to_string());

        log::info!("Cosmic Catcher (native) starting: seed {}, {} frames", seed, frames);

        let tuning = match std::env::var("COSMIC_CATCHER_TUNING") {
            Ok(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&std::fs::read_to_string(path)?)?
            }
            Err(_) => Tuning::default(),
        };

        let store = JsonFileStore::open(&save_path)?;
        let mut game = Game::new(tuning, Viewport::new(480.0, 800.0), seed, store)
            .with_audio(ToneAudio::new(LogSink, Pcg32::seed_from_u64(seed), 0.05));

        let mut runs = 0u32;
        let mut best_this_session = 0u64;
        game.start();

        for i in 0..frames {
            let input = autopilot::steer(game.context());
            game.frame(i as f64 * FRAME_MS, &input);

            if game.phase() == GamePhase::GameOver {
                runs += 1;
                best_this_session = best_this_session.max(game.score());
                log::info!("Run {} over at frame {} with score {}", runs, i, game.score());
                game.start();
            }
        }

        best_this_session = best_this_session.max(game.score());
        log::info!(
            "Finished {} runs, session best {}, stored best {} ({})",
            runs,
            best_this_session,
            game.high_score(),
            game.store().path().display()
        );
        println!("score {} best {}", best_this_session, game.high_score());
        Ok(())
    }
}
