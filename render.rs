//! render - Draws particles and the overlay onto any `embedded-graphics` target
//!
//! Targets have no alpha channel, so opacity is applied by fading a color
//! toward the background. The glow is a dimmed halo drawn under each shape.

use core::f32::consts::PI;
use core::fmt::Write;

use embedded_graphics::{
    draw_target::DrawTargetExt,
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, Triangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::String;

use crate::journal::Journal;
use crate::particles::{Neon, Particle, Shape};
use crate::{Lab, Viewport};

pub const BACKGROUND: Rgb888 = Rgb888::new(0x0a, 0x0a, 0x0f);
const DIM_TEXT: Rgb888 = Rgb888::new(0x6b, 0x72, 0x80);
const FAINT_TEXT: Rgb888 = Rgb888::new(0x4b, 0x55, 0x63);
const ENTRY_BORDER: Rgb888 = Rgb888::new(0x1f, 0x29, 0x37);

const GLOW_STRENGTH: f32 = 0.25;
const FLASH_STRENGTH: f32 = 0x22 as f32 / 255.0;
const GRID_SPACING: u32 = 50;
/// Diagonal backdrop gradient peaks at this color halfway across.
const BACKDROP_MID: Rgb888 = Rgb888::new(0x1a, 0x1a, 0x2e);
const BACKDROP_BANDS: usize = 33;
const GRID_STRENGTH: f32 = 0.06;

const BUTTON_SIZE: Size = Size::new(240, 44);
const ENTRY_HEIGHT: i32 = 22;
const ENTRY_WIDTH: u32 = 340;
const CORNER: i32 = 64;

pub fn neon(color: Neon) -> Rgb888 {
    let (r, g, b) = color.rgb();
    Rgb888::new(r, g, b)
}

/// Mix `fg` over `bg` with coverage `alpha` in [0, 1].
pub fn blend(fg: Rgb888, bg: Rgb888, alpha: f32) -> Rgb888 {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (b as f32 + (f as f32 - b as f32) * a + 0.5) as u8;
    Rgb888::new(mix(fg.r(), bg.r()), mix(fg.g(), bg.g()), mix(fg.b(), bg.b()))
}

fn to_point(x: f32, y: f32) -> Point {
    Point::new(libm::roundf(x) as i32, libm::roundf(y) as i32)
}

/// Rotate the local offset `(dx, dy)` by the particle's rotation and move it onto the particle.
fn place(p: &Particle, (sin, cos): (f32, f32), dx: f32, dy: f32) -> Point {
    to_point(p.x + dx * cos - dy * sin, p.y + dx * sin + dy * cos)
}

/// Corners of the shape in local coordinates, split into filled triangles.
fn triangles(shape: Shape, size: f32) -> heapless::Vec<[(f32, f32); 3], 5> {
    let h = size / 2.0;
    let mut out = heapless::Vec::new();
    match shape {
        Shape::Circle => {}
        Shape::Square => {
            let _ = out.push([(-h, -h), (h, -h), (h, h)]);
            let _ = out.push([(-h, -h), (h, h), (-h, h)]);
        }
        Shape::Triangle => {
            let _ = out.push([(0.0, -h), (h, h), (-h, h)]);
        }
        Shape::Star => {
            // Pentagram path: consecutive vertices are 144 degrees apart.
            let vertex = |i: usize| {
                let angle = i as f32 * 4.0 * PI / 5.0 - PI / 2.0;
                (libm::cosf(angle) * h, libm::sinf(angle) * h)
            };
            for i in 0..5 {
                let _ = out.push([(0.0, 0.0), vertex(i), vertex((i + 1) % 5)]);
            }
        }
    }
    out
}

/// Draw one particle: glow, then the shape, both faded by its opacity.
pub fn draw_particle<D>(display: &mut D, p: &Particle, glow_radius: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    if p.opacity <= 0.0 || p.size <= 0.0 {
        return Ok(());
    }

    // Cull anything whose glow cannot reach the target.
    let reach = p.size / 2.0 + glow_radius as f32;
    let bounds = display.bounding_box();
    let (left, top) = (bounds.top_left.x as f32, bounds.top_left.y as f32);
    if p.x + reach < left
        || p.y + reach < top
        || p.x - reach > left + bounds.size.width as f32
        || p.y - reach > top + bounds.size.height as f32
    {
        return Ok(());
    }

    let base = neon(p.color);
    let center = to_point(p.x, p.y);
    let diameter = libm::roundf(p.size) as u32;

    if glow_radius > 0 {
        let halo = blend(base, BACKGROUND, p.opacity * GLOW_STRENGTH);
        Circle::with_center(center, diameter + 2 * glow_radius)
            .into_styled(PrimitiveStyle::with_fill(halo))
            .draw(display)?;
    }

    let fill = PrimitiveStyle::with_fill(blend(base, BACKGROUND, p.opacity));
    if p.shape == Shape::Circle {
        return Circle::with_center(center, diameter.max(1)).into_styled(fill).draw(display);
    }

    let radians = p.rotation.to_radians();
    let rot = (libm::sinf(radians), libm::cosf(radians));
    for [a, b, c] in triangles(p.shape, p.size) {
        Triangle::new(place(p, rot, a.0, a.1), place(p, rot, b.0, b.1), place(p, rot, c.0, c.1))
            .into_styled(fill)
            .draw(display)?;
    }
    Ok(())
}

/// Draw particles in order; later ones end up on top.
pub fn draw_particles<'a, D>(
    display: &mut D,
    particles: impl IntoIterator<Item = &'a Particle>,
    glow_radius: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    for p in particles {
        draw_particle(display, p, glow_radius)?;
    }
    Ok(())
}

/// Area of the trigger button for a viewport.
pub fn button_area(viewport: Viewport) -> Rectangle {
    let center = Point::new(viewport.width as i32 / 2, viewport.height as i32 * 45 / 100);
    Rectangle::with_center(center, BUTTON_SIZE)
}

fn centered<D>(display: &mut D, text: &str, at: Point, style: MonoTextStyle<'_, Rgb888>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let layout = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    Text::with_text_style(text, at, style, layout).draw(display)?;
    Ok(())
}

/// Backdrop color at `(x, y)`: a 135 degree gradient, dark at the top-left and
/// bottom-right corners, lightest along the anti-diagonal. Quantized into bands.
pub fn backdrop_color(x: i32, y: i32, viewport: Viewport) -> Rgb888 {
    let span = (viewport.width + viewport.height).max(1) as i32;
    let band = ((x + y).clamp(0, span) as usize * (BACKDROP_BANDS - 1)) / span as usize;
    // 0 at either end, 1 in the middle.
    let t = 1.0 - libm::fabsf(band as f32 / (BACKDROP_BANDS - 1) as f32 * 2.0 - 1.0);
    blend(BACKDROP_MID, BACKGROUND, t)
}

/// Gradient backdrop, faint grid and the flash glow when active.
pub fn draw_backdrop<D>(display: &mut D, viewport: Viewport, flash: Option<Neon>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let (width, height) = (viewport.width as i32, viewport.height as i32);
    let area = Rectangle::new(Point::zero(), Size::new(viewport.width, viewport.height));
    let gradient = (0..height).flat_map(|y| (0..width).map(move |x| backdrop_color(x, y, viewport)));
    display.fill_contiguous(&area, gradient)?;

    if let Some(color) = flash {
        let (cx, cy) = viewport.center();
        let diameter = viewport.width.max(viewport.height);
        Circle::with_center(to_point(cx, cy), diameter)
            .into_styled(PrimitiveStyle::with_fill(blend(neon(color), BACKGROUND, FLASH_STRENGTH)))
            .draw(display)?;
    }

    let grid = PrimitiveStyle::with_stroke(blend(neon(Neon::Cyan), BACKGROUND, GRID_STRENGTH), 1);
    let (w, h) = (viewport.width as i32, viewport.height as i32);
    for x in (0..w).step_by(GRID_SPACING as usize) {
        Line::new(Point::new(x, 0), Point::new(x, h)).into_styled(grid).draw(display)?;
    }
    for y in (0..h).step_by(GRID_SPACING as usize) {
        Line::new(Point::new(0, y), Point::new(w, y)).into_styled(grid).draw(display)?;
    }
    Ok(())
}

fn draw_journal<D>(display: &mut D, journal: &Journal, top: i32, cx: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    if journal.is_empty() {
        return Ok(());
    }
    centered(display, "// EXPERIMENT LOG", Point::new(cx, top), MonoTextStyle::new(&FONT_6X10, DIM_TEXT))?;

    let left = cx - ENTRY_WIDTH as i32 / 2;
    for (index, experiment) in journal.visible().enumerate() {
        let fade = 1.0 - index as f32 * 0.15;
        let color = blend(neon(experiment.color), BACKGROUND, fade);
        let y = top + 14 + index as i32 * (ENTRY_HEIGHT + 4);

        let border = if index == 0 { neon(experiment.color) } else { ENTRY_BORDER };
        Rectangle::new(Point::new(left, y), Size::new(ENTRY_WIDTH, ENTRY_HEIGHT as u32))
            .into_styled(
                PrimitiveStyleBuilder::new()
                    .stroke_color(blend(border, BACKGROUND, fade))
                    .stroke_width(1)
                    .fill_color(Rgb888::BLACK)
                    .build(),
            )
            .draw(display)?;

        let middle = y + ENTRY_HEIGHT / 2;
        Circle::with_center(Point::new(left + 14, middle), 6)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)?;
        Text::with_baseline(
            experiment.name,
            Point::new(left + 26, middle),
            MonoTextStyle::new(&FONT_6X10, color),
            Baseline::Middle,
        )
        .draw(display)?;

        let secs = experiment.timestamp.max(0.0) as u32;
        let mut stamp: String<16> = String::new();
        let _ = write!(&mut stamp, "T+{:02}:{:02}", secs / 60, secs % 60);
        let layout = TextStyleBuilder::new()
            .alignment(Alignment::Right)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(
            &stamp,
            Point::new(left + ENTRY_WIDTH as i32 - 10, middle),
            MonoTextStyle::new(&FONT_6X10, blend(FAINT_TEXT, BACKGROUND, fade)),
            layout,
        )
        .draw(display)?;
    }
    Ok(())
}

fn draw_corners<D>(display: &mut D, viewport: Viewport) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let (w, h) = (viewport.width as i32, viewport.height as i32);
    // (corner, horizontal direction, vertical direction, color)
    let corners = [
        (Point::new(16, 16), 1, 1, Neon::Cyan),
        (Point::new(w - 16, 16), -1, 1, Neon::Magenta),
        (Point::new(16, h - 64), 1, -1, Neon::Lime),
        (Point::new(w - 16, h - 64), -1, -1, Neon::Orange),
    ];
    for (at, sx, sy, color) in corners {
        let style = PrimitiveStyle::with_stroke(blend(neon(color), BACKGROUND, 0.5), 2);
        Line::new(at, at + Point::new(sx * CORNER, 0)).into_styled(style).draw(display)?;
        Line::new(at, at + Point::new(0, sy * CORNER)).into_styled(style).draw(display)?;
    }
    Ok(())
}

/// Title, counter, trigger button, experiment log, hint and corner brackets.
pub fn draw_overlay<D, const MAX_PARTICLES: usize>(
    display: &mut D,
    lab: &Lab<MAX_PARTICLES>,
    hovering: bool,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let viewport = lab.viewport();
    let (w, h) = (viewport.width as i32, viewport.height as i32);
    let cx = w / 2;

    let cyan = neon(Neon::Cyan);
    let magenta = neon(Neon::Magenta);
    centered(display, "LET'S SEE", Point::new(cx, h * 16 / 100), MonoTextStyle::new(&FONT_10X20, cyan))?;
    centered(display, "WHAT HAPPENS", Point::new(cx, h * 16 / 100 + 26), MonoTextStyle::new(&FONT_10X20, magenta))?;

    // Counter
    let counter_top = h * 29 / 100;
    centered(display, "EXPERIMENTS TRIGGERED", Point::new(cx, counter_top), MonoTextStyle::new(&FONT_6X10, DIM_TEXT))?;
    let mut count: String<12> = String::new();
    let _ = write!(&mut count, "{:03}", lab.journal().recorded());
    centered(display, &count, Point::new(cx, counter_top + 22), MonoTextStyle::new(&FONT_10X20, neon(Neon::Lime)))?;

    // Button
    let button = button_area(viewport);
    let (fill, stroke, stroke_width) = if hovering { (cyan, magenta, 3) } else { (magenta, cyan, 2) };
    button
        .into_styled(
            PrimitiveStyleBuilder::new()
                .fill_color(fill)
                .stroke_color(stroke)
                .stroke_width(stroke_width)
                .build(),
        )
        .draw(display)?;
    centered(display, "WHAT HAPPENS?", button.center(), MonoTextStyle::new(&FONT_10X20, Rgb888::BLACK))?;

    draw_journal(display, lab.journal(), h * 55 / 100, cx)?;

    centered(
        display,
        "[ CLICK THE BUTTON TO UNLEASH CHAOS ]",
        Point::new(cx, h - 90),
        MonoTextStyle::new(&FONT_6X10, FAINT_TEXT),
    )?;

    draw_corners(display, viewport)
}

/// Everything after the clear: backdrop, particles, overlay.
/// The whole scene shifts sideways while the shake effect runs.
pub fn draw_scene<D, const MAX_PARTICLES: usize>(
    display: &mut D,
    lab: &Lab<MAX_PARTICLES>,
    hovering: bool,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let offset = if lab.is_shaking() { lab.settings().shake_offset } else { 0 };
    let mut target = display.translated(Point::new(offset, 0));

    draw_backdrop(&mut target, lab.viewport(), lab.flash())?;
    draw_particles(&mut target, lab.particles().iter(), lab.settings().glow_radius)?;
    draw_overlay(&mut target, lab, hovering)
}
