use futurecity::city::{CityConfig, Energy, Environment, Transport};
use futurecity::export::render_frame;
use futurecity::rng::{SeededRng, LAYOUT_SEED};
use futurecity::scene::{
    next_building, render_static, replay_antennas, scale_for, walk_windows, Building, StaticScene,
};
use futurecity::theme::theme_for;

fn configs() -> Vec<CityConfig> {
    vec![
        CityConfig::default(),
        CityConfig::new(Environment::Coastal, 20, Energy::Tidal, 90, Transport::Hyperloop, 90),
        CityConfig::new(Environment::Mountain, 95, Energy::Wind, 5, Transport::Teleport, 51),
        CityConfig::new(Environment::Desert, 0, Energy::Solar, 100, Transport::Hyperloop, 100),
        CityConfig::new(Environment::Arctic, 100, Energy::Fusion, 0, Transport::Aerial, 0),
    ]
}

fn render(c: &CityConfig, w: u32, h: u32) -> StaticScene {
    render_static(w, h, scale_for(w, h), &theme_for(c.environment), c)
}

#[test]
fn static_pass_is_bit_identical() {
    for c in configs() {
        let a = render(&c, 200, 120);
        let b = render(&c, 200, 120);
        assert_eq!(a, b, "static pass differs for {c:?}");
    }
}

#[test]
fn replay_matches_static_pass() {
    for c in configs() {
        for (w, h) in [(120, 60), (333, 187), (640, 360)] {
            let scene = render(&c, w, h);
            let replay = replay_antennas(&scene.layout);
            assert_eq!(replay.marks, scene.marks, "stream drift for {c:?} at {w}x{h}");
            assert_eq!(replay.tips, scene.antennas, "tips differ for {c:?} at {w}x{h}");
            if c.tech() <= 50 {
                assert!(replay.tips.is_empty());
            }
        }
    }
}

#[test]
fn antennas_sit_above_their_buildings() {
    let c = CityConfig::new(Environment::Urban, 100, Energy::Solar, 0, Transport::Aerial, 100);
    let scene = render(&c, 480, 240);
    let layout = scene.layout;

    let mut rng = SeededRng::new(LAYOUT_SEED);
    rng.skip(4 * layout.star_count as u64);
    let buildings: Vec<Building> = (0..layout.building_count)
        .map(|i| {
            let b = next_building(&mut rng, &layout, i);
            let (rows, cols) = layout.window_grid(&b);
            walk_windows(&mut rng, rows, cols, |_, _, _| {});
            b
        })
        .collect();

    assert!(!scene.antennas.is_empty());
    for tip in &scene.antennas {
        let b = buildings[tip.building];
        assert!(tip.y < b.top(&layout), "tip {tip:?} not above {b:?}");
        assert!(tip.x > b.x && tip.x < b.x + b.w, "tip {tip:?} off the roof of {b:?}");
    }
}

#[test]
fn frames_repeat_at_equal_timestamps() {
    let c = CityConfig::default();
    assert_eq!(render_frame(&c, 160, 90, 1234.0), render_frame(&c, 160, 90, 1234.0));
}

#[test]
fn beacons_animate_over_time() {
    // tech 75 puts blinking beacons on the antenna tips
    let c = CityConfig::default();
    assert!(!render(&c, 320, 160).antennas.is_empty());
    assert_ne!(render_frame(&c, 320, 160, 0.0), render_frame(&c, 320, 160, 375.0));
}

#[test]
fn frame_contains_the_static_scene_when_nothing_moves() {
    let c = CityConfig::new(Environment::Desert, 40, Energy::Solar, 0, Transport::Teleport, 30);
    let scene = render(&c, 160, 90);
    assert_eq!(render_frame(&c, 160, 90, 999.0).px, scene.canvas.px);
}
