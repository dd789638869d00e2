//! Procedural skyline.
//!
//! Everything random in the static pass comes from one [`SeededRng`] seeded
//! with [`LAYOUT_SEED`], consumed in a fixed order: stars, buildings (with
//! their window cells), trees, aircraft. The animated overlay does not keep
//! any of this geometry; it re-walks the same stream up to the buildings to
//! find the antenna tips again (see [`replay_antennas`]). Any change to how
//! many values a phase consumes must be made in both walks, which is why the
//! star skip, [`next_building`] and [`walk_windows`] are shared helpers.

use crate::canvas::{Pixel, PixelCanvas};
use crate::city::{CityConfig, Energy, Transport};
use crate::rng::{SeededRng, LAYOUT_SEED, SOLAR_SEED};
use crate::theme::Theme;

/// Sky covers the top 60% of the raster.
pub const HORIZON: f32 = 0.6;
/// Building bases sit a little below the horizon line.
pub const STREET: f32 = 0.72;
pub const WINDOW_PITCH: f32 = 8.0;
pub const LIT_THRESHOLD: f64 = 0.45;
/// Buildings taller than this share of the maximum carry an antenna.
pub const ANTENNA_RATIO: f32 = 0.6;
pub const ANTENNA_LEN: f32 = 10.0;
/// Reference width at which one layout unit is one pixel.
pub const REFERENCE_WIDTH: f32 = 480.0;

pub const TURBINE_X: [f32; 3] = [0.07, 0.88, 0.95];
pub const BEAM_X: [f32; 3] = [0.2, 0.5, 0.8];
pub const TUBES: usize = 2;
pub const SOLAR_PANELS: usize = 4;

/// Size factor for a raster of the given dimensions.
pub fn scale_for(width: u32, height: u32) -> f32 {
    let span = (width as f32).min(height as f32 * 2.0);
    (span / REFERENCE_WIDTH).clamp(0.25, 4.0)
}

/// Geometry derived from the raster size and the configuration alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLayout {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub horizon: f32,
    pub street: f32,
    pub star_count: usize,
    pub building_count: usize,
    pub max_height: f32,
    pub slot: f32,
    pub antennas: bool,
}

impl SceneLayout {
    pub fn new(width: u32, height: u32, scale: f32, config: &CityConfig) -> Self {
        let (w, h) = (width as f32, height as f32);
        let pop = config.population() as f32;
        // counts are taken in f64 so products like 60 * 0.15 land on 9
        let building_count = (6.0 + config.population() as f64 * 0.15).floor() as usize;
        Self {
            width,
            height,
            scale,
            horizon: h * HORIZON,
            street: h * STREET,
            star_count: (15.0 + config.tech() as f64 * 0.2).floor() as usize,
            building_count,
            max_height: h * 0.12 + (pop / 100.0) * h * 0.3,
            slot: w / building_count as f32,
            antennas: config.tech() > 50,
        }
    }

    pub fn w(&self) -> f32 {
        self.width as f32
    }

    pub fn h(&self) -> f32 {
        self.height as f32
    }

    /// Height of the hyperloop tube `k` at column `x`.
    pub fn tube_y(&self, k: usize, x: f32) -> f32 {
        let half = self.w() * 0.5;
        let apex = self.street - self.h() * (0.30 + 0.07 * k as f32);
        let u = if half > 0.0 { (x - half) / half } else { 0.0 };
        apex + self.h() * 0.16 * u * u
    }

    /// Hub position of wind turbine `i`.
    pub fn turbine_hub(&self, i: usize) -> (f32, f32) {
        (self.w() * TURBINE_X[i], self.street - self.h() * 0.24)
    }

    pub fn window_grid(&self, b: &Building) -> (usize, usize) {
        let pitch = WINDOW_PITCH * self.scale;
        if pitch <= 0.0 {
            return (0, 0);
        }
        let rows = (b.h / pitch).floor().max(0.0) as usize;
        let cols = (b.w / pitch).floor().max(0.0) as usize;
        (rows, cols)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Building {
    pub index: usize,
    pub x: f32,
    pub w: f32,
    pub h: f32,
    /// Facade shade multiplier.
    pub tone: f32,
}

impl Building {
    pub fn top(&self, layout: &SceneLayout) -> f32 {
        layout.street - self.h
    }

    pub fn has_antenna(&self, layout: &SceneLayout) -> bool {
        layout.antennas && self.h > layout.max_height * ANTENNA_RATIO
    }

    pub fn antenna_tip(&self, layout: &SceneLayout) -> AntennaTip {
        AntennaTip {
            building: self.index,
            x: self.x + self.w * 0.5,
            y: self.top(layout) - ANTENNA_LEN * layout.scale,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AntennaTip {
    pub building: usize,
    pub x: f32,
    pub y: f32,
}

/// Position in the layout stream, taken right after a building's windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RngMark {
    pub draws: u64,
    pub state: u64,
}

impl RngMark {
    fn of(rng: &SeededRng) -> Self {
        Self {
            draws: rng.draws(),
            state: rng.state(),
        }
    }
}

/// Three draws: tone, width, height. The x position depends on the index only.
pub fn next_building(rng: &mut SeededRng, layout: &SceneLayout, index: usize) -> Building {
    let jitter = rng.next_f32();
    let rw = rng.next_f32();
    let rh = rng.next_f32();
    let w = layout.slot * (0.5 + rw * 0.42);
    Building {
        index,
        x: index as f32 * layout.slot + layout.slot * 0.08,
        w,
        h: layout.max_height * (0.3 + rh * 0.7),
        tone: 0.8 + jitter * 0.4,
    }
}

/// One draw per window cell decides whether it is lit; lit cells take a second
/// draw for brightness. Dark cells still take their draw.
pub fn walk_windows(
    rng: &mut SeededRng,
    rows: usize,
    cols: usize,
    mut lit: impl FnMut(usize, usize, f32),
) {
    for row in 0..rows {
        for col in 0..cols {
            if rng.next_f64() > LIT_THRESHOLD {
                let brightness = rng.next_f32();
                lit(row, col, brightness);
            }
        }
    }
}

/// Result of the static pass.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticScene {
    pub canvas: PixelCanvas,
    pub layout: SceneLayout,
    pub antennas: Vec<AntennaTip>,
    /// Stream position after each building, indexed by building.
    pub marks: Vec<RngMark>,
}

pub fn render_static(
    width: u32,
    height: u32,
    scale: f32,
    theme: &Theme,
    config: &CityConfig,
) -> StaticScene {
    let layout = SceneLayout::new(width, height, scale, config);
    let mut canvas = PixelCanvas::new(width, height);
    let mut rng = SeededRng::new(LAYOUT_SEED);

    draw_sky(&mut canvas, &layout, theme);
    draw_stars(&mut canvas, &layout, &mut rng);
    draw_ground(&mut canvas, &layout, theme);
    let (antennas, marks) = draw_buildings(&mut canvas, &layout, theme, &mut rng);
    if config.greenery() > 10 {
        draw_trees(&mut canvas, &layout, config.greenery(), &mut rng);
    }

    match config.transport {
        Transport::Aerial if config.tech() > 40 => {
            draw_aircraft(&mut canvas, &layout, config.tech(), theme, &mut rng)
        }
        Transport::Aerial => {}
        Transport::Hyperloop => draw_tubes(&mut canvas, &layout, theme),
        Transport::Teleport => draw_beams(&mut canvas, &layout, theme),
    }

    match config.energy {
        Energy::Fusion => draw_fusion(&mut canvas, &layout, theme),
        Energy::Solar => draw_solar(&mut canvas, &layout, theme),
        Energy::Wind => draw_turbine_poles(&mut canvas, &layout),
        Energy::Tidal => {}
    }

    StaticScene {
        canvas,
        layout,
        antennas,
        marks,
    }
}

fn draw_sky(canvas: &mut PixelCanvas, layout: &SceneLayout, theme: &Theme) {
    canvas.vertical_gradient(0.0, layout.horizon, theme.sky_top, theme.sky_bottom);
}

fn draw_stars(canvas: &mut PixelCanvas, layout: &SceneLayout, rng: &mut SeededRng) {
    for _ in 0..layout.star_count {
        let x = rng.next_f32() * layout.w();
        let y = rng.next_f32() * layout.horizon * 0.75;
        let size = (0.4 + rng.next_f32() * 1.2) * layout.scale;
        let alpha = 0.25 + rng.next_f32() * 0.75;
        canvas.fill_circle(x, y, size, Pixel::WHITE.alpha(alpha));
    }
}

fn draw_ground(canvas: &mut PixelCanvas, layout: &SceneLayout, theme: &Theme) {
    canvas.vertical_gradient(layout.horizon, layout.h(), theme.ground, theme.ground.scale(0.55));
    canvas.radial_glow(
        layout.w() * 0.5,
        layout.horizon,
        layout.w() * 0.55,
        layout.h() * 0.14,
        theme.accent.alpha(0.35),
    );
}

fn draw_buildings(
    canvas: &mut PixelCanvas,
    layout: &SceneLayout,
    theme: &Theme,
    rng: &mut SeededRng,
) -> (Vec<AntennaTip>, Vec<RngMark>) {
    let s = layout.scale;
    let pitch = WINDOW_PITCH * s;
    let facade = theme.sky_top.lerp(theme.ground, 0.5);
    let glass = Pixel::hex(0xffe9a8).lerp(theme.accent, 0.3);
    let mast = Pixel::hex(0x8890a8);
    let beacon = Pixel::hex(0xff4d6d);

    let mut antennas = Vec::new();
    let mut marks = Vec::with_capacity(layout.building_count);

    for i in 0..layout.building_count {
        let b = next_building(rng, layout, i);
        let top = b.top(layout);
        canvas.fill_rect(b.x, top, b.w, b.h, facade.scale(b.tone));
        canvas.fill_rect(b.x, top, b.w, s.max(1.0), theme.accent.alpha(0.35));

        let (rows, cols) = layout.window_grid(&b);
        walk_windows(rng, rows, cols, |row, col, brightness| {
            canvas.fill_rect(
                b.x + col as f32 * pitch + pitch * 0.25,
                top + row as f32 * pitch + pitch * 0.25,
                pitch * 0.5,
                pitch * 0.5,
                glass.alpha(0.35 + brightness * 0.6),
            );
        });

        if b.has_antenna(layout) {
            let tip = b.antenna_tip(layout);
            canvas.line(tip.x, top, tip.x, tip.y, (0.8 * s).max(1.0), mast);
            canvas.fill_circle(tip.x, tip.y, 1.5 * s, beacon.alpha(0.9));
            antennas.push(tip);
        }
        marks.push(RngMark::of(rng));
    }
    (antennas, marks)
}

fn draw_trees(canvas: &mut PixelCanvas, layout: &SceneLayout, greenery: u8, rng: &mut SeededRng) {
    let s = layout.scale;
    let count = (greenery as f64 * 0.2).floor() as usize;
    let alpha = if greenery > 50 { 0.9 } else { 0.65 };
    let trunk = Pixel::hex(0x4a3526).alpha(alpha);
    for _ in 0..count {
        let x = rng.next_f32() * layout.w();
        let y = layout.street + rng.next_f32() * layout.h() * 0.1;
        let size = (2.5 + rng.next_f32() * 3.5) * s;
        let green = 140.0 + rng.next_f32() * 80.0;
        canvas.fill_rect(x - 0.5 * s, y, s.max(1.0), size * 0.8, trunk);
        canvas.fill_circle(x, y, size, Pixel::rgb(40, green as u8, 70).alpha(alpha));
    }
}

fn draw_aircraft(
    canvas: &mut PixelCanvas,
    layout: &SceneLayout,
    tech: u8,
    theme: &Theme,
    rng: &mut SeededRng,
) {
    let s = layout.scale;
    let count = ((tech as f64 * 0.03).floor() as usize).min(3);
    for _ in 0..count {
        let x = layout.w() * 0.1 + rng.next_f32() * layout.w() * 0.8;
        let y = layout.h() * 0.06 + rng.next_f32() * layout.h() * 0.22;
        canvas.line(x - 18.0 * s, y, x - 4.0 * s, y, (0.6 * s).max(1.0), theme.accent.alpha(0.35));
        canvas.fill_ellipse(x, y, 4.0 * s, 1.6 * s, Pixel::WHITE.alpha(0.85));
    }
}

fn tube_points(layout: &SceneLayout, k: usize) -> Vec<(f32, f32)> {
    let step = 4.0_f32.max(layout.scale * 4.0);
    let n = (layout.w() / step).ceil() as usize;
    (0..=n)
        .map(|i| {
            let x = (i as f32 * step).min(layout.w());
            (x, layout.tube_y(k, x))
        })
        .collect()
}

fn draw_tubes(canvas: &mut PixelCanvas, layout: &SceneLayout, theme: &Theme) {
    let s = layout.scale;
    for k in 0..TUBES {
        let points = tube_points(layout, k);
        canvas.polyline(&points, (2.2 * s).max(1.0), theme.accent.alpha(0.45));
        canvas.polyline(&points, 1.0, Pixel::WHITE.alpha(0.25));
    }
}

fn draw_beams(canvas: &mut PixelCanvas, layout: &SceneLayout, theme: &Theme) {
    let s = layout.scale;
    let width = (5.0 * s).max(1.0);
    for fx in BEAM_X {
        let x = layout.w() * fx;
        canvas.vertical_band(
            x - width * 0.5,
            width,
            0.0,
            layout.street,
            theme.accent.alpha(0.0),
            theme.accent.alpha(0.4),
        );
        canvas.fill_ellipse(x, layout.street, width * 1.4, width * 0.4, theme.accent.alpha(0.6));
    }
}

fn draw_fusion(canvas: &mut PixelCanvas, layout: &SceneLayout, theme: &Theme) {
    let s = layout.scale;
    let (x, y) = (layout.w() * 0.82, layout.h() * 0.22);
    canvas.radial_glow(x, y, 38.0 * s, 38.0 * s, theme.accent.alpha(0.55));
    canvas.fill_circle(x, y, 5.0 * s, Pixel::WHITE.alpha(0.9));
}

fn draw_solar(canvas: &mut PixelCanvas, layout: &SceneLayout, theme: &Theme) {
    let s = layout.scale;
    let mut rng = SeededRng::new(SOLAR_SEED);
    let panel = Pixel::rgb(30, 60, 130);
    for _ in 0..SOLAR_PANELS {
        let x = rng.next_f32() * layout.w() * 0.9;
        let y = layout.street + 2.0 * s + rng.next_f32() * layout.h() * 0.12;
        canvas.fill_rect(x, y, 14.0 * s, 5.0 * s, panel);
        canvas.fill_rect(x, y, 14.0 * s, (0.6 * s).max(1.0), theme.accent.alpha(0.4));
    }
}

fn draw_turbine_poles(canvas: &mut PixelCanvas, layout: &SceneLayout) {
    let s = layout.scale;
    for i in 0..TURBINE_X.len() {
        let (x, hub_y) = layout.turbine_hub(i);
        canvas.line(x, layout.street, x, hub_y, (1.2 * s).max(1.0), Pixel::hex(0xc8d0e0));
        canvas.fill_circle(x, hub_y, 1.8 * s, Pixel::WHITE);
    }
}

/// Antenna tips re-derived from a fresh layout stream.
#[derive(Clone, Debug, PartialEq)]
pub struct AntennaReplay {
    pub tips: Vec<AntennaTip>,
    pub marks: Vec<RngMark>,
}

/// Walk the layout stream the way the static pass does, up to the end of the
/// buildings, without drawing. Stars are skipped four draws apiece; each
/// building takes its three body draws and its window draws.
pub fn replay_antennas(layout: &SceneLayout) -> AntennaReplay {
    let mut rng = SeededRng::new(LAYOUT_SEED);
    rng.skip(4 * layout.star_count as u64);

    let mut tips = Vec::new();
    let mut marks = Vec::with_capacity(layout.building_count);
    for i in 0..layout.building_count {
        let b = next_building(&mut rng, layout, i);
        let (rows, cols) = layout.window_grid(&b);
        walk_windows(&mut rng, rows, cols, |_, _, _| {});
        if b.has_antenna(layout) {
            tips.push(b.antenna_tip(layout));
        }
        marks.push(RngMark::of(&rng));
    }
    AntennaReplay { tips, marks }
}
