//! Flappy Gates - headless native runner
//!
//! Drives the simulation with an autopilot and writes every intent to the
//! log. A windowed front-end plugs its own `InputSource` and `EffectSink`
//! into the same `Game`.
//!
//! Usage: `flappy-gates [--ticks N] [--settings PATH]`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use flappy_gates::assets::FsSkinCatalog;
use flappy_gates::consts::TICK_RATE;
use flappy_gates::persistence::open_or_memory;
use flappy_gates::platform::InputEvent;
use flappy_gates::sim::{Effect, GameState, MenuState};
use flappy_gates::tuning::Tuning;
use flappy_gates::{EffectSink, Game, GameError, InputSource, Settings};

/// Flaps toward the middle of the next gap and restarts after each death
#[derive(Default)]
struct Autopilot {
    died_at: Option<u64>,
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> Vec<InputEvent> {
        let now = state.time_ticks;
        match state.menu.state() {
            MenuState::Main => {
                self.died_at = None;
                if now > 0 && now % TICK_RATE as u64 == 0 {
                    vec![InputEvent::space()]
                } else {
                    vec![]
                }
            }
            MenuState::Play => {
                let player = &state.player;
                let (_, h) = state.tuning.player.hitbox_size;
                let center = player.pos.y + state.tuning.player.hitbox_offset.1 + h / 2.0;
                let target = state
                    .obstacles
                    .obstacles
                    .iter()
                    .find(|o| o.right() > player.pos.x)
                    .map(|o| o.gap_y + o.gap / 2.0 + 20.0)
                    .unwrap_or(state.tuning.screen_height / 2.0);
                if center > target && player.vy >= 0.0 {
                    vec![InputEvent::space()]
                } else {
                    vec![]
                }
            }
            MenuState::Death => {
                let died_at = *self.died_at.get_or_insert(now);
                if now - died_at >= TICK_RATE as u64 {
                    vec![InputEvent::Restart]
                } else {
                    vec![]
                }
            }
            MenuState::Creator | MenuState::Delete => vec![InputEvent::ToolClosed],
        }
    }
}

/// Logs intents instead of drawing them
#[derive(Default)]
struct LogSink {
    frames: u64,
}

impl EffectSink for LogSink {
    fn present(&mut self, effects: &[Effect]) {
        self.frames += 1;
        for effect in effects {
            match effect {
                Effect::PlaySound(kind) => log::debug!("sound {kind:?}"),
                Effect::PersistBest(best) => log::info!("New best score: {best}"),
                Effect::AchievementUnlocked(a) => log::info!("Unlocked {} badge", a.as_str()),
                Effect::SkinChanged(skin) => log::info!("Skin changed to {skin}"),
                Effect::OpenTool(key) => log::info!("Skin tool requested: {key:?}"),
                Effect::DrawHud(hud) if self.frames % TICK_RATE as u64 == 0 => {
                    log::debug!(
                        "{:?}: score {} best {}{}",
                        hud.menu,
                        hud.score,
                        hud.best,
                        if hud.decrypt_warning { " (score file was reset)" } else { "" }
                    );
                }
                _ => {}
            }
        }
    }
}

struct Args {
    ticks: Option<u64>,
    settings: PathBuf,
}

fn parse_args() -> Result<Args, GameError> {
    let mut args = Args {
        ticks: None,
        settings: PathBuf::from(Settings::FILE_NAME),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .ok_or_else(|| GameError::Configuration(format!("{name} needs a value")))
        };
        match arg.as_str() {
            "--ticks" => {
                let raw = value("--ticks")?;
                let ticks = raw
                    .parse()
                    .map_err(|_| GameError::Configuration(format!("bad tick count '{raw}'")))?;
                args.ticks = Some(ticks);
            }
            "--settings" => args.settings = PathBuf::from(value("--settings")?),
            other => {
                return Err(GameError::Configuration(format!("unknown argument '{other}'")));
            }
        }
    }
    Ok(args)
}

fn run() -> Result<(), GameError> {
    let args = parse_args()?;
    let settings = Settings::load(&args.settings)?;
    let tuning = Tuning::load(&settings.tuning_path)?;

    let skins = FsSkinCatalog::open(settings.skins_dir()).map_err(|e| {
        GameError::Configuration(format!("cannot open skins: {e}"))
    })?;
    let store = open_or_memory(settings.score_path(), &settings.key_path());

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let mut game = Game::new(&settings, tuning, seed, skins, store)?;

    let stop = game.stop_signal();
    if let Err(e) = ctrlc::set_handler(move || stop.stop()) {
        log::warn!("Failed to install Ctrl-C handler: {e}");
    }

    let mut autopilot = Autopilot::default();
    let mut sink = LogSink::default();
    match args.ticks {
        Some(ticks) => game.run_for(ticks, &mut autopilot, &mut sink)?,
        None => game.run(&mut autopilot, &mut sink)?,
    }

    log::info!(
        "Stopped after {} ticks, best score {}",
        game.state().time_ticks,
        game.state().score.best
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Flappy Gates (native) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
