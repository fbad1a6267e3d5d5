//! Game session
//!
//! Owns one [`GameState`] and one best-score store. The host calls
//! [`Session::update`] once per frame and reads [`Session::snapshot`] back.
//! Sessions share nothing, so any number can run side by side.

use crate::highscores::{BestScore, MemoryStore};
use crate::sim::{
    AbilityRejection, GameEvent, GamePhase, GameState, InputEvent, RenderSnapshot, tick,
};
use crate::tuning::{Tuning, TuningError};

pub struct Session<S: BestScore = MemoryStore> {
    state: GameState,
    store: S,
    best_score: u64,
    ready: bool,
}

impl Session<MemoryStore> {
    /// Session without persistence
    pub fn in_memory(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        Self::new(tuning, seed, MemoryStore::new())
    }
}

impl<S: BestScore> Session<S> {
    /// Validate `tuning`, read the stored best score and start playing.
    ///
    /// A store that cannot be read counts as no best score yet.
    pub fn new(tuning: Tuning, seed: u64, mut store: S) -> Result<Self, TuningError> {
        let state = GameState::new(tuning, seed)?;
        let best_score = match store.load() {
            Ok(best) => best.unwrap_or(0),
            Err(e) => {
                log::warn!("Best score unavailable, keeping it in memory only: {e}");
                0
            }
        };
        log::info!(
            "Session started: {} mode, seed {}, best score {}",
            state.tuning.mode.as_str(),
            seed,
            best_score
        );

        Ok(Self {
            state,
            store,
            best_score,
            ready: true,
        })
    }

    /// Run one frame. Does nothing while the host reports not ready, or in
    /// `GameOver` unless `RestartRequested` is among the inputs.
    pub fn update(&mut self, now_ms: u64, inputs: &[InputEvent]) {
        if !self.ready {
            return;
        }

        let was_playing = self.state.phase == GamePhase::Playing;
        tick(&mut self.state, inputs, now_ms);
        if was_playing && self.state.phase == GamePhase::GameOver {
            self.record_best();
        }
    }

    fn record_best(&mut self) {
        let score = self.state.score;
        if score <= self.best_score {
            return;
        }

        self.best_score = score;
        self.state.events.push(GameEvent::NewBestScore { score });
        log::info!("New best score: {}", score);

        if let Err(e) = self.store.save(score) {
            log::warn!("Best score not persisted: {e}");
        }
    }

    /// Direct activation, for hosts that want the result synchronously
    pub fn activate_invincibility(&mut self, now_ms: u64) -> Result<(), AbilityRejection> {
        self.state.activate_invincibility(now_ms)
    }

    /// Start over with construction defaults. The best score is kept.
    pub fn reset(&mut self) {
        self.state.reset();
        log::info!("Session reset");
    }

    /// Gate updates on the host having finished loading
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        self.state.snapshot(self.best_score)
    }

    /// Events from the last update, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.state.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
