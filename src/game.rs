//! Simulation loop
//!
//! Owns the game state and its collaborators, turns wall-clock time into
//! fixed ticks, and services the storage intents each tick produces. Drawing
//! and sound are left to an [`EffectSink`].

use std::time::{Duration, Instant};

use crate::assets::SkinCatalog;
use crate::error::GameError;
use crate::persistence::{PersistenceError, ScoreStore};
use crate::platform::{FixedStep, InputEvent, InputQueue, StopSignal};
use crate::settings::Settings;
use crate::sim::{Effect, GameState, TickInput, TickOutput, load_skin, tick};
use crate::tuning::Tuning;

/// Where input comes from (window events, autopilot, replay)
pub trait InputSource {
    /// Events that happened since the previous poll
    fn poll(&mut self, state: &GameState) -> Vec<InputEvent>;
}

/// Where intents go (renderer + mixer, or a log)
pub trait EffectSink {
    fn present(&mut self, effects: &[Effect]);
}

/// Game instance holding all state
pub struct Game<S: ScoreStore, C: SkinCatalog> {
    state: GameState,
    store: S,
    skins: C,
    input: InputQueue,
    clock: FixedStep,
    stop: StopSignal,
}

impl<S: ScoreStore, C: SkinCatalog> Game<S, C> {
    /// Build the state, pick a skin and load the best score.
    ///
    /// Fails only when no skin in the catalog can be loaded.
    pub fn new(
        settings: &Settings,
        tuning: Tuning,
        seed: u64,
        skins: C,
        store: S,
    ) -> Result<Self, GameError> {
        let skin = load_skin(&skins, &settings.skin)?;
        log::info!("Skin '{}' with {} frames", skin.skin, skin.len());

        let mut state = GameState::new(seed, tuning, settings.mode, skin);
        state.sound_on = settings.sound_on;

        let mut game = Self {
            state,
            store,
            skins,
            input: InputQueue::new(),
            clock: FixedStep::default(),
            stop: StopSignal::new(),
        };
        game.load_best();

        log::info!(
            "Game ready: mode {}, seed {seed}, best {}",
            game.state.mode.as_str(),
            game.state.score.best
        );
        Ok(game)
    }

    fn load_best(&mut self) {
        match self.store.load_best_score() {
            Ok(best) => self.state.score.on_new_best(best),
            Err(PersistenceError::NotFound) => {
                log::info!("No saved best score, starting from 0");
                self.persist(0);
            }
            Err(PersistenceError::Decryption(why)) => {
                log::warn!("Best score unreadable ({why}), resetting to 0");
                let ticks = self.state.tuning.decrypt_warning_ticks;
                self.state.score.flag_decrypt_error(ticks);
                self.persist(0);
            }
            Err(e) => log::warn!("Failed to load best score: {e}"),
        }

        // Badges already earned are restored silently
        let restored = self.state.score.evaluate_achievements();
        if !restored.is_empty() {
            log::debug!("Restored {} achievements", restored.len());
        }
    }

    fn persist(&mut self, score: u32) {
        match self.store.save_best_score(score) {
            Ok(()) => self.state.score.save_pending = false,
            Err(e) => {
                log::warn!("Failed to save best score {score}: {e}");
                self.state.score.save_pending = true;
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for editors and scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Skin tools edit the catalog while the creator/delete menu is open
    pub fn skins_mut(&mut self) -> &mut C {
        &mut self.skins
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run exactly one tick with everything queued so far
    pub fn step(&mut self) -> Result<TickOutput, GameError> {
        let input = TickInput::from_events(self.input.drain());
        let out = tick(&mut self.state, &input, &mut self.skins)?;

        for effect in &out.effects {
            if let Effect::PersistBest(best) = effect {
                self.persist(*best);
            }
        }
        if out.quit {
            log::info!("Quit requested at tick {}", self.state.time_ticks);
            self.stop.stop();
        }
        Ok(out)
    }

    /// Advance by wall-clock seconds.
    ///
    /// The first tick of the frame consumes the queued input; catch-up ticks
    /// run with none. Returns every non-draw intent plus the last tick's
    /// draw list.
    pub fn update(&mut self, elapsed: f32) -> Result<Vec<Effect>, GameError> {
        let ticks = self.clock.advance(elapsed);

        let mut effects = Vec::new();
        let mut last_draws = Vec::new();
        for _ in 0..ticks {
            let out = self.step()?;
            let (draws, other): (Vec<Effect>, Vec<Effect>) =
                out.effects.into_iter().partition(Effect::is_draw);
            effects.extend(other);
            last_draws = draws;
            if self.stop.is_stopped() {
                break;
            }
        }
        effects.extend(last_draws);
        Ok(effects)
    }

    /// Real-time loop until stopped
    pub fn run(
        &mut self,
        source: &mut dyn InputSource,
        sink: &mut dyn EffectSink,
    ) -> Result<(), GameError> {
        let mut last = Instant::now();
        while !self.stop.is_stopped() {
            for event in source.poll(&self.state) {
                self.push_input(event);
            }

            let now = Instant::now();
            let effects = self.update(now.duration_since(last).as_secs_f32())?;
            last = now;
            if !effects.is_empty() {
                sink.present(&effects);
            }

            std::thread::sleep(Duration::from_secs_f32(self.clock.until_next()));
        }
        Ok(())
    }

    /// Run `ticks` ticks back to back, ignoring wall-clock time
    pub fn run_for(
        &mut self,
        ticks: u64,
        source: &mut dyn InputSource,
        sink: &mut dyn EffectSink,
    ) -> Result<(), GameError> {
        for _ in 0..ticks {
            if self.stop.is_stopped() {
                break;
            }
            for event in source.poll(&self.state) {
                self.push_input(event);
            }
            let out = self.step()?;
            sink.present(&out.effects);
        }
        Ok(())
    }
}
