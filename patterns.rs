//! patterns - The four particle generators
//!
//! Each generator is a pure function of the RNG, the first id to hand out
//! and the spawn geometry. Particle `i` of a batch gets id `first_id + i`.

use core::f32::consts::{PI, TAU};

use heapless::Vec;
use rand::Rng;

use crate::particles::{Neon, Particle, Shape};
use crate::Viewport;

/// Largest batch any generator produces (explosion upper bound).
pub const MAX_BATCH: usize = 149;

pub type Batch = Vec<Particle, MAX_BATCH>;

pub const RAIN_COUNT: usize = 100;
pub const SPIRAL_COUNT: usize = 80;
pub const WAVE_COUNT: usize = 60;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    Explosion,
    Rain,
    Spiral,
    Wave,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [Pattern::Explosion, Pattern::Rain, Pattern::Spiral, Pattern::Wave];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Generate this pattern centered on the viewport.
    pub fn spawn<R: Rng + ?Sized>(self, rng: &mut R, first_id: u32, viewport: Viewport) -> Batch {
        let (cx, cy) = viewport.center();
        match self {
            Pattern::Explosion => explosion(rng, first_id, cx, cy),
            Pattern::Rain => rain(rng, first_id, viewport),
            Pattern::Spiral => spiral(rng, first_id, cx, cy),
            Pattern::Wave => wave(rng, first_id, viewport),
        }
    }
}

fn push(batch: &mut Batch, particle: Particle) {
    // Counts are fixed below MAX_BATCH, a failed push cannot happen.
    let _ = batch.push(particle);
}

/// 50 to 149 particles bursting radially out of `(cx, cy)`.
pub fn explosion<R: Rng + ?Sized>(rng: &mut R, first_id: u32, cx: f32, cy: f32) -> Batch {
    let mut batch = Batch::new();
    let count = rng.gen_range(50..=MAX_BATCH);

    for i in 0..count {
        let angle = TAU * i as f32 / count as f32 + rng.gen_range(0.0..0.5);
        let speed = rng.gen_range(2.0..10.0);
        push(
            &mut batch,
            Particle {
                id: first_id.wrapping_add(i as u32),
                x: cx,
                y: cy,
                vx: libm::cosf(angle) * speed,
                vy: libm::sinf(angle) * speed,
                color: Neon::random(rng),
                size: rng.gen_range(5.0..25.0),
                shape: Shape::random(rng),
                rotation: rng.gen_range(0.0..360.0),
                rotation_speed: rng.gen_range(-10.0..10.0),
                opacity: 1.0,
                life: rng.gen_range(100..200),
            },
        );
    }
    batch
}

/// 100 squares falling from above the top edge.
pub fn rain<R: Rng + ?Sized>(rng: &mut R, first_id: u32, viewport: Viewport) -> Batch {
    let mut batch = Batch::new();
    let base = Neon::random(rng);
    let width = viewport.width as f32;

    for i in 0..RAIN_COUNT {
        let color = if i % 3 == 0 { base } else { Neon::random(rng) };
        push(
            &mut batch,
            Particle {
                id: first_id.wrapping_add(i as u32),
                x: if width > 0.0 { rng.gen_range(0.0..width) } else { 0.0 },
                y: -50.0 - rng.gen_range(0.0..500.0),
                vx: rng.gen_range(-1.0..1.0),
                vy: rng.gen_range(5.0..15.0),
                color,
                size: rng.gen_range(3.0..11.0),
                shape: Shape::Square,
                rotation: 0.0,
                rotation_speed: 0.0,
                opacity: 0.8,
                life: rng.gen_range(200..300),
            },
        );
    }
    batch
}

/// 80 stars laid along an 8-turn spiral, moving tangentially.
pub fn spiral<R: Rng + ?Sized>(rng: &mut R, first_id: u32, cx: f32, cy: f32) -> Batch {
    let mut batch = Batch::new();
    let base = Neon::random(rng);

    for i in 0..SPIRAL_COUNT {
        let angle = spiral_angle(i);
        let radius = i as f32 * 2.0;
        let tangent = angle + PI / 2.0;
        push(
            &mut batch,
            Particle {
                id: first_id.wrapping_add(i as u32),
                x: cx + libm::cosf(angle) * radius,
                y: cy + libm::sinf(angle) * radius,
                vx: libm::cosf(tangent) * 3.0,
                vy: libm::sinf(tangent) * 3.0,
                color: if i % 2 == 0 { base } else { Neon::random(rng) },
                size: 8.0 + libm::sinf(i as f32 * 0.2) * 5.0,
                shape: Shape::Star,
                rotation: angle.to_degrees(),
                rotation_speed: 5.0,
                opacity: 1.0,
                life: 150,
            },
        );
    }
    batch
}

/// Angle in radians of spiral particle `i`.
pub fn spiral_angle(i: usize) -> f32 {
    i as f32 / SPIRAL_COUNT as f32 * PI * 8.0
}

/// 60 circles across the full width, on a sine around mid-height.
pub fn wave<R: Rng + ?Sized>(rng: &mut R, first_id: u32, viewport: Viewport) -> Batch {
    let mut batch = Batch::new();
    let width = viewport.width as f32;
    let mid = viewport.height as f32 / 2.0;

    for i in 0..WAVE_COUNT {
        let t = i as f32;
        push(
            &mut batch,
            Particle {
                id: first_id.wrapping_add(i as u32),
                x: t / WAVE_COUNT as f32 * width,
                y: mid + libm::sinf(t * 0.3) * 100.0,
                vx: 0.0,
                vy: rng.gen_range(-5.0..5.0),
                color: Neon::random(rng),
                size: 15.0 + libm::sinf(t * 0.2) * 10.0,
                shape: Shape::Circle,
                rotation: 0.0,
                rotation_speed: 0.0,
                opacity: 1.0,
                life: 120,
            },
        );
    }
    batch
}
