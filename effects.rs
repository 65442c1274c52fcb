//! effects - One-shot transient timers (background flash, screen shake)

/// A countdown that is active from `arm` until its duration has elapsed.
/// Re-arming restarts it; `cancel` stops it immediately.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pulse {
    remaining: f32,
}

impl Pulse {
    pub const fn new() -> Self {
        Self { remaining: 0.0 }
    }

    pub fn arm(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    pub fn cancel(&mut self) {
        self.remaining = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_expires() {
        let mut pulse = Pulse::new();
        assert!(!pulse.is_active());
        pulse.arm(0.3);
        pulse.tick(0.2);
        assert!(pulse.is_active());
        pulse.tick(0.2);
        assert!(!pulse.is_active());
        assert_eq!(pulse.remaining(), 0.0);
    }

    #[test]
    fn test_rearm_restarts() {
        let mut pulse = Pulse::new();
        pulse.arm(0.2);
        pulse.tick(0.15);
        pulse.arm(0.2);
        pulse.tick(0.15);
        assert!(pulse.is_active());
    }

    #[test]
    fn test_cancel() {
        let mut pulse = Pulse::new();
        pulse.arm(1.0);
        pulse.cancel();
        assert!(!pulse.is_active());
        pulse.tick(0.1);
        assert!(!pulse.is_active());
    }
}
