//! main.rs - Desktop simulator for the neon lab
//! Handles the window, input, frame pacing and resizing

use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::ContainsPoint};
use embedded_graphics_simulator::{
    OutputSettings, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use log::{debug, info};

use neon_lab::driver::Driver;
use neon_lab::render;
use neon_lab::{Lab, Settings, Viewport};

const MAX_PARTICLES: usize = 2048;
const TITLE: &str = "Neon Lab - What Happens?";

/// Sizes cycled through with `R`.
const VIEWPORTS: [Viewport; 2] = [Viewport::new(800, 600), Viewport::new(1200, 800)];

enum Action {
    Trigger,
    Hover(Point),
    Resize,
    Quit,
}

fn surface(viewport: Viewport) -> SimulatorDisplay<Rgb888> {
    SimulatorDisplay::new(Size::new(viewport.width, viewport.height))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

fn action(event: SimulatorEvent, viewport: Viewport) -> Option<Action> {
    match event {
        SimulatorEvent::Quit => Some(Action::Quit),
        SimulatorEvent::MouseButtonUp { point, .. } => {
            render::button_area(viewport).contains(point).then_some(Action::Trigger)
        }
        SimulatorEvent::MouseMove { point } => Some(Action::Hover(point)),
        SimulatorEvent::KeyDown { keycode, repeat: false, .. } => {
            let key = format!("{:?}", keycode).to_lowercase();
            match key.as_str() {
                "space" | "return" => Some(Action::Trigger),
                "r" => Some(Action::Resize),
                "q" | "escape" => Some(Action::Quit),
                _ => None,
            }
        }
        _ => None,
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings {
        rng_seed: clock_seed(),
        ..Settings::default()
    };
    let mut size_index = 0;
    let mut viewport = VIEWPORTS[size_index];

    let mut display = surface(viewport);
    let output_settings: OutputSettings = OutputSettingsBuilder::new().scale(1).build();
    let mut window = Window::new(TITLE, &output_settings);

    let mut lab: Lab<MAX_PARTICLES> = Lab::new(settings, viewport);
    let mut driver = Driver::new();

    let target_fps = 60;
    let frame_duration = Duration::from_secs_f32(1.0 / target_fps as f32);
    let mut last_update = Instant::now();

    info!("neon lab starting at {}x{}", viewport.width, viewport.height);
    info!("click the button or press Space/Enter to trigger, R to resize, Q to quit");

    'main_loop: while driver.is_running() {
        let now = Instant::now();
        let dt = now.duration_since(last_update).as_secs_f32();
        last_update = now;

        driver.tick(&mut lab, &mut display, dt)?;
        window.update(&display);

        let actions: Vec<Action> = window.events().filter_map(|e| action(e, viewport)).collect();
        for action in actions {
            match action {
                Action::Trigger => {
                    let pattern = lab.trigger();
                    debug!("{:?}, {} live particles", pattern, lab.particles().len());
                }
                Action::Hover(point) => {
                    driver.set_hovering(render::button_area(viewport).contains(point));
                }
                Action::Resize => {
                    size_index = (size_index + 1) % VIEWPORTS.len();
                    viewport = VIEWPORTS[size_index];
                    display = surface(viewport);
                    driver.resize(&mut lab, &mut display, viewport)?;
                    // The SDL window is sized on first update, so it has to be rebuilt.
                    window = Window::new(TITLE, &output_settings);
                    info!("resized to {}x{}", viewport.width, viewport.height);
                }
                Action::Quit => {
                    driver.stop(&mut lab);
                    break 'main_loop;
                }
            }
        }

        // Frame rate limiting
        let elapsed = now.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    info!("{} experiments triggered, bye", lab.journal().recorded());
    Ok(())
}
