//! particles - Particle model and the per-frame simulation step
//! No heap allocation: the live set is a fixed-capacity pool

use heapless::Vec;

use crate::{Settings, Viewport};

/// Neon palette shared by particles, log entries and the flash effect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Neon {
    Cyan,
    Magenta,
    Lime,
    HotPink,
    Chartreuse,
    Orange,
    SpringGreen,
    Purple,
}

impl Neon {
    pub const ALL: [Neon; 8] = [
        Neon::Cyan,
        Neon::Magenta,
        Neon::Lime,
        Neon::HotPink,
        Neon::Chartreuse,
        Neon::Orange,
        Neon::SpringGreen,
        Neon::Purple,
    ];

    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Neon::Cyan => (0x00, 0xff, 0xff),
            Neon::Magenta => (0xff, 0x00, 0xff),
            Neon::Lime => (0x00, 0xff, 0x00),
            Neon::HotPink => (0xff, 0x00, 0x80),
            Neon::Chartreuse => (0x80, 0xff, 0x00),
            Neon::Orange => (0xff, 0x80, 0x00),
            Neon::SpringGreen => (0x00, 0xff, 0x80),
            Neon::Purple => (0x80, 0x00, 0xff),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Star,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Star];

    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// Particle structure
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Neon,
    pub size: f32,
    pub shape: Shape,
    /// Degrees.
    pub rotation: f32,
    /// Degrees per frame.
    pub rotation_speed: f32,
    pub opacity: f32,
    /// Frames left before the particle expires.
    pub life: i32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            id: 0,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            color: Neon::Cyan,
            size: 1.0,
            shape: Shape::Circle,
            rotation: 0.0,
            rotation_speed: 0.0,
            opacity: 1.0,
            life: 0,
        }
    }
}

impl Particle {
    /// Advance one frame. Position moves with the velocity from before gravity applies.
    pub fn advance(&mut self, settings: &Settings) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += settings.gravity;
        self.rotation += self.rotation_speed;
        self.life -= 1;
        self.opacity = fade(self.life, settings.fade_frames);
    }

    pub fn is_alive(&self, viewport: Viewport, settings: &Settings) -> bool {
        self.life > 0 && self.y < viewport.height as f32 + settings.offscreen_margin
    }
}

/// Opacity for a remaining life, clamped to [0, 1] for any input.
pub fn fade(life: i32, fade_frames: u32) -> f32 {
    if fade_frames == 0 {
        return if life > 0 { 1.0 } else { 0.0 };
    }
    (life as f32 / fade_frames as f32).clamp(0.0, 1.0)
}

/// Live particles, in draw order.
pub struct ParticleSet<const MAX_PARTICLES: usize> {
    pool: Vec<Particle, MAX_PARTICLES>,
}

impl<const MAX_PARTICLES: usize> Default for ParticleSet<MAX_PARTICLES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MAX_PARTICLES: usize> ParticleSet<MAX_PARTICLES> {
    pub const fn new() -> Self {
        Self { pool: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Particle> {
        self.pool.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.pool
    }

    /// Append a batch in order. Returns how many particles did not fit.
    pub fn extend_from(&mut self, batch: impl IntoIterator<Item = Particle>) -> usize {
        let mut dropped = 0;
        for particle in batch {
            if self.pool.push(particle).is_err() {
                dropped += 1;
            }
        }
        dropped
    }

    /// Advance every particle one frame, then drop the ones that are no longer live.
    pub fn step(&mut self, viewport: Viewport, settings: &Settings) {
        // PERF: single in-place pass, order of survivors is preserved
        self.pool.retain_mut(|p| {
            p.advance(settings);
            p.is_alive(viewport, settings)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(800, 600);

    fn particle(y: f32, vy: f32, life: i32) -> Particle {
        Particle {
            x: 10.0,
            y,
            vy,
            life,
            ..Particle::default()
        }
    }

    #[test]
    fn test_step_integrates_closed_form() {
        let settings = Settings::default();
        let mut set: ParticleSet<4> = ParticleSet::new();
        let (y0, vy0, life0) = (100.0_f32, -3.0_f32, 80);
        set.extend_from([particle(y0, vy0, life0)]);

        let n = 30;
        for _ in 0..n {
            set.step(VIEW, &settings);
        }

        let p = set.as_slice()[0];
        assert_eq!(p.life, life0 - n);
        let n = n as f32;
        let expected = y0 + n * vy0 + settings.gravity * n * (n - 1.0) / 2.0;
        assert!((p.y - expected).abs() < 1e-2, "y = {}, expected {}", p.y, expected);
        assert!((p.vy - (vy0 + settings.gravity * n)).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_advances_by_speed() {
        let settings = Settings::default();
        let mut p = Particle {
            rotation: 350.0,
            rotation_speed: 20.0,
            life: 10,
            ..Particle::default()
        };
        p.advance(&settings);
        assert_eq!(p.rotation, 370.0);
    }

    #[test]
    fn test_fade_is_clamped() {
        for life in [i32::MIN, -500, -1, 0, 1, 25, 50, 51, 1000, i32::MAX] {
            let opacity = fade(life, 50);
            assert!((0.0..=1.0).contains(&opacity), "life {} -> {}", life, opacity);
        }
        assert_eq!(fade(25, 50), 0.5);
        assert_eq!(fade(200, 50), 1.0);
        assert_eq!(fade(-10, 50), 0.0);
    }

    #[test]
    fn test_last_frame_particle_removed_next_step() {
        let settings = Settings::default();
        let mut set: ParticleSet<4> = ParticleSet::new();
        set.extend_from([particle(100.0, 0.0, 2)]);

        set.step(VIEW, &settings);
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].life, 1);

        set.step(VIEW, &settings);
        assert!(set.is_empty());
    }

    #[test]
    fn test_below_cutoff_removed() {
        let settings = Settings::default();
        let cutoff = VIEW.height as f32 + settings.offscreen_margin;
        let mut set: ParticleSet<4> = ParticleSet::new();
        set.extend_from([particle(cutoff - 1.0, 0.5, 100), particle(cutoff - 20.0, 0.5, 100)]);

        set.step(VIEW, &settings);
        assert_eq!(set.len(), 2);

        set.step(VIEW, &settings);
        assert_eq!(set.len(), 1);
        assert!(set.as_slice()[0].y < cutoff);
    }

    #[test]
    fn test_step_keeps_order() {
        let settings = Settings::default();
        let mut set: ParticleSet<8> = ParticleSet::new();
        set.extend_from((0..5).map(|i| Particle {
            id: i,
            life: if i == 2 { 1 } else { 10 },
            ..Particle::default()
        }));
        set.step(VIEW, &settings);
        let ids: heapless::Vec<u32, 8> = set.iter().map(|p| p.id).collect();
        assert_eq!(ids.as_slice(), &[0, 1, 3, 4]);
    }

    #[test]
    fn test_extend_reports_overflow() {
        let mut set: ParticleSet<3> = ParticleSet::new();
        let dropped = set.extend_from((0..5).map(|_| particle(0.0, 0.0, 10)));
        assert_eq!(dropped, 2);
        assert_eq!(set.len(), 3);
    }
}
