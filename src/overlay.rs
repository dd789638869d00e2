use crate::canvas::{Pixel, PixelCanvas};
use crate::city::{CityConfig, Energy, Transport};
use crate::scene::{replay_antennas, StaticScene, TUBES, TURBINE_X};
use crate::theme::Theme;
use std::f32::consts::TAU;

/// Milliseconds for a capsule to cross the whole raster.
pub const CAPSULE_PERIOD_MS: f64 = 6000.0;
/// Blade rotation in radians per millisecond.
pub const BLADE_SPEED: f64 = 0.0015;
pub const BLADE_PHASE: f32 = 2.1;
pub const BLINK_PERIOD_MS: f64 = 1500.0;

/// Beacon alpha at `t_ms`: a sinusoid around 0.3 with amplitude 0.3.
pub fn blink_alpha(t_ms: f64) -> f32 {
    (0.3 + 0.3 * (t_ms / BLINK_PERIOD_MS * std::f64::consts::TAU).sin()) as f32
}

/// Capsule position along tube `k` as a fraction of the width.
pub fn capsule_phase(t_ms: f64, k: usize) -> f32 {
    (t_ms / CAPSULE_PERIOD_MS + k as f64 * 0.5).rem_euclid(1.0) as f32
}

pub fn blade_angle(t_ms: f64, turbine: usize) -> f32 {
    ((t_ms * BLADE_SPEED).rem_euclid(std::f64::consts::TAU)) as f32 + turbine as f32 * BLADE_PHASE
}

/// Draw one animation frame: the cached static scene plus the moving parts.
pub fn composite(
    target: &mut PixelCanvas,
    cached: &StaticScene,
    config: &CityConfig,
    theme: &Theme,
    t_ms: f64,
) {
    if target.is_empty() {
        return;
    }
    target.clear(Pixel::TRANSPARENT);
    target.blit(&cached.canvas);

    let layout = &cached.layout;
    let s = layout.scale;

    if config.transport == Transport::Hyperloop {
        for k in 0..TUBES {
            let x = capsule_phase(t_ms, k) * layout.w();
            let y = layout.tube_y(k, x);
            target.radial_glow(x, y, 10.0 * s, 6.0 * s, theme.accent.alpha(0.5));
            target.fill_ellipse(x, y, 5.0 * s, 2.2 * s, Pixel::WHITE.alpha(0.95));
        }
    }

    if config.energy == Energy::Wind {
        let len = layout.h() * 0.07;
        let width = (0.8 * s).max(1.0);
        for i in 0..TURBINE_X.len() {
            let (hx, hy) = layout.turbine_hub(i);
            let base = blade_angle(t_ms, i);
            for blade in 0..3 {
                let a = base + blade as f32 * TAU / 3.0;
                target.line(hx, hy, hx + a.cos() * len, hy + a.sin() * len, width, Pixel::WHITE.alpha(0.85));
            }
        }
    }

    if config.tech() > 50 {
        let alpha = blink_alpha(t_ms);
        let beacon = Pixel::hex(0xff4d6d);
        for tip in replay_antennas(layout).tips {
            target.radial_glow(tip.x, tip.y, 5.0 * s, 5.0 * s, beacon.alpha(alpha * 0.6));
            target.fill_circle(tip.x, tip.y, 2.5 * s, beacon.alpha(alpha));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{Environment, Transport};
    use crate::scene::{render_static, scale_for};
    use crate::theme::theme_for;

    #[test]
    fn blink_stays_in_range() {
        for t in (0..3000).step_by(37) {
            let a = blink_alpha(t as f64);
            assert!((0.0..=0.6 + 1e-6).contains(&a), "alpha {a} at {t}");
        }
        assert!((blink_alpha(0.0) - 0.3).abs() < 1e-6);
        assert!((blink_alpha(375.0) - 0.6).abs() < 1e-5);
    }

    #[test]
    fn capsules_wrap_and_start_half_a_lap_apart() {
        assert_eq!(capsule_phase(0.0, 0), 0.0);
        assert!((capsule_phase(0.0, 1) - 0.5).abs() < 1e-6);
        assert!((capsule_phase(CAPSULE_PERIOD_MS * 3.25, 0) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn frames_differ_over_time_but_keep_static_pixels() {
        let c = CityConfig::new(Environment::Coastal, 70, Energy::Wind, 40, Transport::Hyperloop, 80);
        let theme = theme_for(c.environment);
        let scene = render_static(200, 100, scale_for(200, 100), &theme, &c);
        let mut a = PixelCanvas::new(200, 100);
        let mut b = PixelCanvas::new(200, 100);
        composite(&mut a, &scene, &c, &theme, 0.0);
        composite(&mut b, &scene, &c, &theme, 1234.0);
        assert_ne!(a, b);
        // top-left sky corner has no overlay element
        assert_eq!(a.get(0, 0), scene.canvas.get(0, 0));
    }

    #[test]
    fn capsules_ride_the_static_tube_arc() {
        let c = CityConfig::new(Environment::Coastal, 70, Energy::Solar, 40, Transport::Hyperloop, 40);
        let theme = theme_for(c.environment);
        let scene = render_static(200, 100, scale_for(200, 100), &theme, &c);
        let mut frame = PixelCanvas::new(200, 100);
        let t = 1500.0;
        composite(&mut frame, &scene, &c, &theme, t);

        for k in 0..TUBES {
            let x = capsule_phase(t, k) * scene.layout.w();
            let y = scene.layout.tube_y(k, x);
            let p = frame.get(x as u32, y as u32).expect("capsule on canvas");
            assert!(p.r >= 230 && p.g >= 230 && p.b >= 230, "tube {k}: {p:?} at ({x}, {y})");
        }
    }

    #[test]
    fn blades_start_at_the_turbine_hubs() {
        let c = CityConfig::new(Environment::Mountain, 30, Energy::Wind, 40, Transport::Teleport, 40);
        let theme = theme_for(c.environment);
        let scene = render_static(200, 100, scale_for(200, 100), &theme, &c);
        let mut frame = PixelCanvas::new(200, 100);
        let t = 800.0;
        composite(&mut frame, &scene, &c, &theme, t);

        let len = scene.layout.h() * 0.07;
        for i in 0..TURBINE_X.len() {
            let (hx, hy) = scene.layout.turbine_hub(i);
            for blade in 0..3 {
                let a = blade_angle(t, i) + blade as f32 * TAU / 3.0;
                let (tx, ty) = (hx + a.cos() * len, hy + a.sin() * len);
                // the last point the stroke plots, measured from the hub
                let (px, py) = ((hx + (tx - hx)).floor(), (hy + (ty - hy)).floor());
                let p = frame.get(px as u32, py as u32).expect("blade tip on canvas");
                assert!(p.r >= 210 && p.g >= 210 && p.b >= 210, "turbine {i} blade {blade}: {p:?}");
            }
        }
    }

    #[test]
    fn empty_target_is_left_alone() {
        let c = CityConfig::default();
        let theme = theme_for(c.environment);
        let scene = render_static(50, 30, 0.5, &theme, &c);
        let mut empty = PixelCanvas::new(0, 0);
        composite(&mut empty, &scene, &c, &theme, 10.0);
        assert!(empty.px.is_empty());
    }
}
