use futurecity::city::{CityConfig, Energy, Environment, Transport};
use futurecity::presets;
use futurecity::score::{compare, compute_scores, Metric, Scores};
use futurecity::share::parse_query;
use rand::{rngs::StdRng, SeedableRng};

fn scores(s: [u8; 5]) -> Scores {
    Scores {
        sustainability: s[0],
        innovation: s[1],
        quality: s[2],
        resilience: s[3],
        livability: s[4],
    }
}

#[test]
fn default_city() {
    // innovation 68.5 and resilience 69.5 round up
    assert_eq!(compute_scores(&CityConfig::default()), scores([58, 69, 46, 70, 61]));
}

#[test]
fn green_coastal_city() {
    let c = CityConfig::new(Environment::Coastal, 20, Energy::Tidal, 90, Transport::Hyperloop, 90);
    assert_eq!(compute_scores(&c), scores([100, 85, 83, 93, 90]));
}

#[test]
fn saturated_metrics_clamp_at_100() {
    let c = CityConfig::new(Environment::Coastal, 0, Energy::Tidal, 100, Transport::Hyperloop, 100);
    assert_eq!(compute_scores(&c), scores([100, 92, 93, 100, 96]));
}

#[test]
fn crowded_barren_city() {
    let c = CityConfig::new(Environment::Desert, 100, Energy::Fusion, 0, Transport::Teleport, 0);
    assert_eq!(compute_scores(&c), scores([18, 13, 5, 25, 15]));
}

#[test]
fn preset_scores() {
    let neon = presets::find("neon-megalopolis").expect("preset").config();
    assert_eq!(compute_scores(&neon), scores([37, 81, 37, 61, 54]));
    let summit = presets::find("Summit Collective").expect("preset by title").config();
    assert_eq!(compute_scores(&summit), scores([81, 62, 68, 77, 72]));
}

#[test]
fn scores_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let c = CityConfig::random(&mut rng);
        let s = compute_scores(&c);
        for m in Metric::ALL {
            assert!(s.get(m) <= 100, "{m:?} out of range for {c:?}");
        }
    }
}

#[test]
fn scores_are_pure() {
    let c = CityConfig::new(Environment::Arctic, 12, Energy::Wind, 88, Transport::Teleport, 33);
    assert_eq!(compute_scores(&c), compute_scores(&c));
}

#[test]
fn unknown_environment_scores_as_urban() {
    let shared = parse_query("env=swamp&pop=60&nrg=solar&grn=45&trn=aerial&tch=75");
    assert_eq!(shared.config.environment, Environment::Urban);
    assert_eq!(compute_scores(&shared.config), compute_scores(&CityConfig::default()));
}

#[test]
fn compare_against_tech_bump() {
    let base = CityConfig::default();
    let mut bumped = base;
    bumped.set_tech(100);
    let rows = compare(&compute_scores(&base), &compute_scores(&bumped));
    let by = |m: Metric| rows.iter().find(|r| r.metric == m).expect("metric row");

    assert_eq!(by(Metric::Sustainability).delta, 0);
    assert_eq!(by(Metric::Innovation).right, 86);
    assert_eq!(by(Metric::Innovation).delta, 17);
    assert_eq!(by(Metric::Quality).delta, 5);
    assert_eq!(by(Metric::Resilience).delta, 7);
    assert_eq!(by(Metric::Livability).delta, 7);
}
