//! neon_lab - Particle toy core: spawn patterns, simulate, log experiments
//! No heap allocation, no_std compatible

#![cfg_attr(not(test), no_std)]

pub mod effects;
pub mod journal;
pub mod particles;
pub mod patterns;

#[cfg(feature = "embedded-graphics")]
pub mod driver;
#[cfg(feature = "embedded-graphics")]
pub mod render;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use effects::Pulse;
use journal::{Experiment, Journal};
use particles::{Neon, ParticleSet};
use patterns::Pattern;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settings {
    // Physics
    /// Added to vertical velocity every frame.
    pub gravity: f32,
    /// Opacity reaches 1 at this many frames of remaining life.
    pub fade_frames: u32,
    /// How far below the bottom edge a particle may fall before it is dropped.
    pub offscreen_margin: f32,

    // Rendering
    pub glow_radius: u32,

    // Effects, in seconds
    pub flash_duration: f32,
    pub shake_duration: f32,
    pub shake_offset: i32,

    // RNG seed
    pub rng_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            fade_frames: 50,
            offscreen_margin: 100.0,
            glow_radius: 15,
            flash_duration: 0.3,
            shake_duration: 0.2,
            shake_offset: 4,
            rng_seed: 0x1234_5678,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Whole application state: live particles, experiment log, transient effects.
pub struct Lab<const MAX_PARTICLES: usize> {
    particles: ParticleSet<MAX_PARTICLES>,
    journal: Journal,

    flash: Pulse,
    flash_color: Neon,
    shake: Pulse,

    viewport: Viewport,
    /// Session time in seconds.
    time: f32,
    next_id: u32,

    rng: SmallRng,
    settings: Settings,
}

impl<const MAX_PARTICLES: usize> Lab<MAX_PARTICLES> {
    pub fn new(settings: Settings, viewport: Viewport) -> Self {
        Self {
            particles: ParticleSet::new(),
            journal: Journal::new(),
            flash: Pulse::new(),
            flash_color: Neon::Cyan,
            shake: Pulse::new(),
            viewport,
            time: 0.0,
            next_id: 0,
            rng: SmallRng::seed_from_u64(settings.rng_seed),
            settings,
        }
    }

    /// Spawn a random pattern, log it and kick off the flash and shake effects.
    pub fn trigger(&mut self) -> Pattern {
        let pattern = Pattern::random(&mut self.rng);
        let batch = pattern.spawn(&mut self.rng, self.next_id, self.viewport);
        self.next_id = self.next_id.wrapping_add(batch.len() as u32);

        let spawned = batch.len();
        let dropped = self.particles.extend_from(batch);
        if dropped > 0 {
            log::debug!("particle pool full, dropped {} of {} {:?} particles", dropped, spawned, pattern);
        }

        let id = self.journal.recorded();
        let experiment = Experiment::random(&mut self.rng, id, self.time);
        log::debug!("experiment #{} {} -> {:?} ({} particles)", id, experiment.name, pattern, spawned);
        self.journal.record(experiment);

        self.flash_color = Neon::random(&mut self.rng);
        self.flash.arm(self.settings.flash_duration);
        self.shake.arm(self.settings.shake_duration);

        pattern
    }

    /// Advance one frame: timers by `dt` seconds, particles by one step.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        self.flash.tick(dt);
        self.shake.tick(dt);
        self.particles.step(self.viewport, &self.settings);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!("viewport {}x{} -> {}x{}", self.viewport.width, self.viewport.height, viewport.width, viewport.height);
        self.viewport = viewport;
    }

    pub fn cancel_effects(&mut self) {
        self.flash.cancel();
        self.shake.cancel();
    }

    pub fn particles(&self) -> &ParticleSet<MAX_PARTICLES> {
        &self.particles
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Background flash color while the flash effect runs.
    pub fn flash(&self) -> Option<Neon> {
        self.flash.is_active().then_some(self.flash_color)
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_active()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }
}
