//! Thread-rng backed randomness.

use rand::seq::SliceRandom;

use citadels_domain::QuarterName;

use crate::infrastructure::ports::RandomPort;

/// Production randomness source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl RandomPort for SystemRandom {
    fn shuffle_quarters(&self, deck: &mut Vec<QuarterName>) {
        deck.shuffle(&mut rand::thread_rng());
    }
}
