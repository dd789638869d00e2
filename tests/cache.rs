use futurecity::cache::{scene_key, SceneCache};
use futurecity::city::{CityConfig, Energy, Environment, Field, Transport};
use std::rc::Rc;

#[test]
fn repeated_requests_share_one_render() {
    let mut cache = SceneCache::new();
    let c = CityConfig::default();
    let a = cache.get_or_render(&c, 200, 100);
    let b = cache.get_or_render(&c, 200, 100);
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(cache.renders(), 1);
    assert_eq!(cache.key(), Some(scene_key(&c, 200, 100).as_str()));
}

#[test]
fn every_field_is_part_of_the_key() {
    let base = CityConfig::default();
    let mut cache = SceneCache::new();
    let first = cache.get_or_render(&base, 200, 100);

    for field in Field::ALL {
        let mut changed = base;
        changed.nudge(field, 1);
        assert_ne!(changed, base);
        let scene = cache.get_or_render(&changed, 200, 100);
        assert!(!Rc::ptr_eq(&first, &scene), "{field:?} did not miss");
        // back to base so the next field starts from a known entry
        cache.get_or_render(&base, 200, 100);
    }
    assert_eq!(cache.renders(), 1 + 2 * Field::ALL.len() as u64);
}

#[test]
fn size_is_part_of_the_key() {
    let c = CityConfig::new(Environment::Arctic, 10, Energy::Wind, 50, Transport::Teleport, 60);
    let mut cache = SceneCache::new();
    let small = cache.get_or_render(&c, 120, 60);
    let wide = cache.get_or_render(&c, 121, 60);
    let tall = cache.get_or_render(&c, 121, 61);
    assert!(!Rc::ptr_eq(&small, &wide));
    assert!(!Rc::ptr_eq(&wide, &tall));
    assert_eq!(cache.renders(), 3);
}

#[test]
fn only_one_entry_is_kept() {
    let a = CityConfig::default();
    let b = CityConfig::new(Environment::Coastal, 20, Energy::Tidal, 90, Transport::Hyperloop, 90);
    let mut cache = SceneCache::new();
    let first = cache.get_or_render(&a, 100, 50);
    cache.get_or_render(&b, 100, 50);
    let again = cache.get_or_render(&a, 100, 50);
    assert!(!Rc::ptr_eq(&first, &again));
    assert_eq!(*first, *again);
    assert_eq!(cache.renders(), 3);
}

#[test]
fn invalidate_forces_a_fresh_render() {
    let c = CityConfig::default();
    let mut cache = SceneCache::new();
    let before = cache.get_or_render(&c, 150, 80);
    cache.invalidate();
    assert_eq!(cache.key(), None);
    let after = cache.get_or_render(&c, 150, 80);
    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(before.canvas, after.canvas);
}
