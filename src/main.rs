//! Side Runner headless driver
//!
//! Plays one scripted run at a fixed frame rate and logs the outcome.
//!
//! Usage: `side-runner [runner|shooter|<tuning.json>] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use side_runner::consts::FRAME_MS;
    use side_runner::highscores::JsonFileStore;
    use side_runner::sim::{EntityKind, GamePhase, InputEvent, RenderSnapshot};
    use side_runner::{GameMode, Session, Tuning, TuningError};

    /// Two minutes at the nominal frame rate
    const MAX_FRAMES: u64 = 120 * 1000 / FRAME_MS;

    pub fn load_tuning(arg: Option<&str>) -> Result<Tuning, TuningError> {
        let Some(arg) = arg else {
            return Ok(Tuning::runner());
        };
        if let Some(mode) = GameMode::from_str(arg) {
            return Ok(Tuning::from_mode(mode));
        }
        log::info!("Loading tuning from {arg}");
        Tuning::from_file(arg)
    }

    /// Jump over what is close, buy invincibility when a hit looks certain
    fn runner_inputs(view: &RenderSnapshot, was_jumping: &mut bool) -> Vec<InputEvent> {
        let player = &view.player.rect;
        let threat = view
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Obstacle && e.rect.right() > player.x)
            .map(|e| e.rect.x - player.right())
            .fold(f32::INFINITY, f32::min);

        let mut inputs = Vec::new();
        if *was_jumping {
            inputs.push(InputEvent::JumpReleased);
            *was_jumping = false;
        } else if view.player.grounded && threat < 4.0 * view.game_speed + 20.0 {
            inputs.push(InputEvent::JumpPressed);
            *was_jumping = true;
        }
        if threat < 10.0 && !view.player.grounded && !view.player.is_on_cooldown {
            inputs.push(InputEvent::AbilityActivatePressed);
        }
        inputs
    }

    /// Track the lowest enemy and keep firing
    fn shooter_inputs(view: &RenderSnapshot) -> Vec<InputEvent> {
        let player = &view.player.rect;
        let centre = player.x + player.width / 2.0;
        let target = view
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Enemy)
            .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y));

        let mut inputs = vec![InputEvent::FireActive];
        if let Some(enemy) = target {
            let enemy_centre = enemy.rect.x + enemy.rect.width / 2.0;
            if enemy_centre < centre - 2.0 {
                inputs.push(InputEvent::MoveLeftActive);
            } else if enemy_centre > centre + 2.0 {
                inputs.push(InputEvent::MoveRightActive);
            }
        }
        inputs
    }

    pub fn run(tuning: Tuning, seed: u64) -> Result<(), TuningError> {
        let mode = tuning.mode;
        let store = JsonFileStore::in_dir(std::env::temp_dir());
        let mut session = Session::new(tuning, seed, store)?;

        let mut was_jumping = false;
        let mut frame = 0;
        while session.phase() == GamePhase::Playing && frame < MAX_FRAMES {
            let view = session.snapshot();
            let inputs = match mode {
                GameMode::Runner => runner_inputs(&view, &mut was_jumping),
                GameMode::Shooter => shooter_inputs(&view),
            };
            session.update(frame * FRAME_MS, &inputs);
            for event in session.events() {
                log::debug!("frame {frame}: {event:?}");
            }
            frame += 1;
        }

        let view = session.snapshot();
        log::info!(
            "{} run finished after {} frames: score {}, best {}, hp {}",
            mode.as_str(),
            view.frame,
            view.score,
            view.best_score,
            view.player.hp
        );
        println!("score={} best={} frames={}", view.score, view.best_score, view.frame);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Side Runner (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    let result = headless::load_tuning(args.first().map(String::as_str))
        .and_then(|tuning| headless::run(tuning, seed));
    if let Err(e) = result {
        log::error!("{e}");
        eprintln!("side-runner: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the page; nothing to run here
}
