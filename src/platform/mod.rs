//! Platform abstraction layer
//!
//! Everything between the outside world and the tick:
//! - Input events and per-tick batching
//! - Fixed-step timing
//! - Cooperative stop signal

pub mod input;
pub mod time;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use input::{InputEvent, InputQueue, MenuKey};
pub use time::FixedStep;

/// Shared flag that ends the loop after the current tick
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
