//! Baseline strategies that never look at the scores.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use parley_model::Item;

use super::{Player, TurnView};

/// Probability that [`RandomPausePlayer`] proposes on a turn.
pub const RANDOM_PAUSE_SPEAK_RATE: f64 = 0.75;

/// Proposes a uniformly random item from its whole memory every turn,
/// including items already said.
#[derive(Debug, Default)]
pub struct RandomPlayer;

impl RandomPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Player for RandomPlayer {
    fn label(&self) -> &str {
        "random"
    }

    fn propose(&mut self, turn: &TurnView<'_>, rng: &mut dyn RngCore) -> Option<Item> {
        turn.memory.items().choose(rng).copied()
    }
}

/// Like [`RandomPlayer`], but stays silent a quarter of the time.
#[derive(Debug, Default)]
pub struct RandomPausePlayer;

impl RandomPausePlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Player for RandomPausePlayer {
    fn label(&self) -> &str {
        "random_pause"
    }

    fn propose(&mut self, turn: &TurnView<'_>, rng: &mut dyn RngCore) -> Option<Item> {
        if rng.gen_bool(RANDOM_PAUSE_SPEAK_RATE) {
            turn.memory.items().choose(rng).copied()
        } else {
            None
        }
    }
}

/// Never proposes.
#[derive(Debug, Default)]
pub struct PausePlayer;

impl PausePlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Player for PausePlayer {
    fn label(&self) -> &str {
        "pause"
    }

    fn propose(&mut self, _turn: &TurnView<'_>, _rng: &mut dyn RngCore) -> Option<Item> {
        None
    }
}
