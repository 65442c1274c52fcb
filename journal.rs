//! journal - Bounded, most-recent-first history of triggered experiments

use heapless::Deque;
use rand::Rng;

use crate::particles::Neon;

pub const JOURNAL_CAPACITY: usize = 10;
/// Entries shown on screen.
pub const JOURNAL_VISIBLE: usize = 5;

pub const EXPERIMENT_NAMES: [&str; 15] = [
    "QUANTUM CHAOS",
    "NEON STORM",
    "PIXEL RAIN",
    "GRAVITY FLIP",
    "COLOR BURST",
    "GLITCH WAVE",
    "PARTICLE NOVA",
    "MATRIX FLOW",
    "CYBER BLOOM",
    "VOID SPIRAL",
    "PLASMA DANCE",
    "BYTE TORNADO",
    "SYNTH ERUPTION",
    "DATA CASCADE",
    "RETRO BURST",
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Experiment {
    pub id: u32,
    pub name: &'static str,
    pub color: Neon,
    /// Session time in seconds.
    pub timestamp: f32,
}

impl Experiment {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, id: u32, timestamp: f32) -> Self {
        Self {
            id,
            name: EXPERIMENT_NAMES[rng.gen_range(0..EXPERIMENT_NAMES.len())],
            color: Neon::random(rng),
            timestamp,
        }
    }
}

#[derive(Default)]
pub struct Journal {
    entries: Deque<Experiment, JOURNAL_CAPACITY>,
    recorded: u32,
}

impl Journal {
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            recorded: 0,
        }
    }

    /// Prepend an entry, evicting the oldest when full.
    pub fn record(&mut self, experiment: Experiment) {
        if self.entries.is_full() {
            self.entries.pop_back();
        }
        let _ = self.entries.push_front(experiment);
        self.recorded = self.recorded.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entries ever recorded, including evicted ones.
    pub fn recorded(&self) -> u32 {
        self.recorded
    }

    pub fn latest(&self) -> Option<&Experiment> {
        self.entries.front()
    }

    /// Most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Experiment> {
        self.entries.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Experiment> {
        self.iter().take(JOURNAL_VISIBLE)
    }
}
