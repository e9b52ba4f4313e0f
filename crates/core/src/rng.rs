//! RNG module - piece generation
//!
//! Two randomizers are available:
//! - **Uniform**: every draw picks one of the 7 kinds independently (classic).
//! - **SevenBag**: each bag holds one of each kind, shuffled, drawn until empty.
//!
//! Both are driven by a simple LCG so a seed reproduces the whole sequence.

use serde::{Deserialize, Serialize};

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Piece randomizer selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Randomizer {
    /// Independent uniform draws
    #[default]
    Uniform,
    /// Shuffled bag of all seven kinds
    SevenBag,
}

/// Seeded piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    randomizer: Randomizer,
    /// Current bag of pieces (SevenBag only)
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    rng: SimpleRng,
    seed: u32,
}

impl PieceQueue {
    pub fn new(seed: u32, randomizer: Randomizer) -> Self {
        let mut queue = Self {
            randomizer,
            bag: PieceKind::ALL,
            bag_index: 7,
            rng: SimpleRng::new(seed),
            seed,
        };
        if randomizer == Randomizer::SevenBag {
            queue.refill_bag();
        }
        queue
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        match self.randomizer {
            Randomizer::Uniform => PieceKind::ALL[self.rng.next_range(7) as usize],
            Randomizer::SevenBag => {
                if self.bag_index >= 7 {
                    self.refill_bag();
                }
                let piece = self.bag[self.bag_index];
                self.bag_index += 1;
                piece
            }
        }
    }

    pub fn randomizer(&self) -> Randomizer {
        self.randomizer
    }

    /// Seed the queue was created with (for replaying the same sequence)
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Current RNG state; seeding a new queue with it continues the stream.
    pub fn state(&self) -> u32 {
        self.rng.state
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1, Randomizer::default())
    }
}
