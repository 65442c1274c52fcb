//! driver - Per-frame loop body: clear, step, draw, publish

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

use crate::render::{self, BACKGROUND};
use crate::{Lab, Viewport};

/// What one frame produced, for counters and debug output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub live_particles: usize,
    pub experiments: usize,
}

pub struct Driver {
    running: bool,
    hovering: bool,
    frame: u64,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    pub const fn new() -> Self {
        Self {
            running: true,
            hovering: false,
            frame: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Run one frame. Returns `None` without touching anything when stopped
    /// or when there is no surface area to draw on.
    pub fn tick<D, const MAX_PARTICLES: usize>(
        &mut self,
        lab: &mut Lab<MAX_PARTICLES>,
        display: &mut D,
        dt: f32,
    ) -> Result<Option<FrameStats>, D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let surface = display.bounding_box().size;
        if !self.running || lab.viewport().is_empty() || surface.width == 0 || surface.height == 0 {
            return Ok(None);
        }

        display.clear(BACKGROUND)?;
        lab.update(dt);
        render::draw_scene(display, lab, self.hovering)?;

        self.frame += 1;
        let stats = FrameStats {
            frame: self.frame,
            live_particles: lab.particles().len(),
            experiments: lab.journal().len(),
        };
        log::trace!("{:?}", stats);
        Ok(Some(stats))
    }

    /// Adopt a new viewport. The surface content is discarded.
    pub fn resize<D, const MAX_PARTICLES: usize>(
        &mut self,
        lab: &mut Lab<MAX_PARTICLES>,
        display: &mut D,
        viewport: Viewport,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        lab.resize(viewport);
        display.clear(BACKGROUND)
    }

    /// Teardown: no more frames, pending effects cancelled.
    pub fn stop<const MAX_PARTICLES: usize>(&mut self, lab: &mut Lab<MAX_PARTICLES>) {
        self.running = false;
        lab.cancel_effects();
        log::debug!("driver stopped after {} frames", self.frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::Pattern;
    use crate::render::tests::TestCanvas;
    use crate::Settings;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn lab(width: u32, height: u32) -> Lab<4096> {
        Lab::new(Settings::default(), Viewport::new(width, height))
    }

    #[test]
    fn test_tick_steps_and_publishes() {
        let mut lab = lab(800, 600);
        let mut canvas = TestCanvas::new(800, 600);
        let mut driver = Driver::new();
        lab.trigger();
        let spawned = lab.particles().len();

        let stats = driver.tick(&mut lab, &mut canvas, DT).unwrap().unwrap();
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.experiments, 1);
        assert!(stats.live_particles <= spawned);
        assert!(canvas.lit() > 0);
    }

    #[test]
    fn test_hover_highlights_button() {
        let mut lab = lab(800, 600);
        let mut driver = Driver::new();
        let mut idle = TestCanvas::new(800, 600);
        driver.tick(&mut lab, &mut idle, DT).unwrap();

        driver.set_hovering(true);
        assert!(driver.is_hovering());
        let mut hovered = TestCanvas::new(800, 600);
        driver.tick(&mut lab, &mut hovered, DT).unwrap();

        let center = render::button_area(lab.viewport()).top_left + Point::new(8, 8);
        assert_ne!(idle.at(center.x, center.y), hovered.at(center.x, center.y));
    }

    #[test]
    fn test_frames_are_sequential() {
        let mut lab = lab(800, 600);
        let mut canvas = TestCanvas::new(800, 600);
        let mut driver = Driver::new();
        for expected in 1..=5 {
            let stats = driver.tick(&mut lab, &mut canvas, DT).unwrap().unwrap();
            assert_eq!(stats.frame, expected);
        }
    }

    #[test]
    fn test_empty_surface_is_skipped() {
        let mut lab = lab(0, 0);
        let mut canvas = TestCanvas::new(0, 0);
        let mut driver = Driver::new();
        assert_eq!(driver.tick(&mut lab, &mut canvas, DT).unwrap(), None);
        assert_eq!(lab.time(), 0.0);
    }

    #[test]
    fn test_stop_cancels_frames_and_effects() {
        let mut lab = lab(800, 600);
        let mut canvas = TestCanvas::new(800, 600);
        let mut driver = Driver::new();
        lab.trigger();
        driver.stop(&mut lab);

        assert!(!driver.is_running());
        assert!(lab.flash().is_none());
        assert!(!lab.is_shaking());
        assert_eq!(driver.tick(&mut lab, &mut canvas, DT).unwrap(), None);
    }

    #[test]
    fn test_resize_clears_and_next_wave_spans_new_width() {
        let mut lab = lab(800, 600);
        let mut driver = Driver::new();
        let mut small = TestCanvas::new(800, 600);
        driver.tick(&mut lab, &mut small, DT).unwrap();

        let mut large = TestCanvas::new(1200, 800);
        driver.resize(&mut lab, &mut large, Viewport::new(1200, 800)).unwrap();
        assert!(large.pixels.iter().all(|&c| c == BACKGROUND));
        assert_eq!(lab.viewport(), Viewport::new(1200, 800));

        let mut rng = SmallRng::seed_from_u64(8);
        let wave = Pattern::Wave.spawn(&mut rng, 0, lab.viewport());
        let widest = wave.iter().map(|p| p.x).fold(0.0_f32, f32::max);
        assert!(widest > 1100.0 && widest < 1200.0);
        assert!(wave.iter().all(|p| (p.y - 400.0).abs() <= 100.0 + 1e-3));

        assert!(driver.tick(&mut lab, &mut large, DT).unwrap().is_some());
    }

    #[test]
    fn test_short_lived_particles_leave_after_their_frames() {
        let mut lab = lab(800, 600);
        let mut canvas = TestCanvas::new(800, 600);
        let mut driver = Driver::new();
        for _ in 0..3 {
            lab.trigger();
        }
        for _ in 0..300 {
            driver.tick(&mut lab, &mut canvas, DT).unwrap();
        }
        assert_eq!(lab.particles().len(), 0);
    }
}
