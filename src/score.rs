use crate::city::{CityConfig, Energy, Environment, Transport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scores {
    pub sustainability: u8,
    pub innovation: u8,
    pub quality: u8,
    pub resilience: u8,
    pub livability: u8,
}

pub fn energy_bonus(e: Energy) -> f64 {
    match e {
        Energy::Solar => 20.0,
        Energy::Fusion => 15.0,
        Energy::Wind => 18.0,
        Energy::Tidal => 22.0,
    }
}

pub fn transport_bonus(t: Transport) -> f64 {
    match t {
        Transport::Aerial => 10.0,
        Transport::Hyperloop => 15.0,
        Transport::Teleport => 8.0,
    }
}

pub fn environment_bonus(e: Environment) -> f64 {
    match e {
        Environment::Urban => 5.0,
        Environment::Coastal => 12.0,
        Environment::Mountain => 10.0,
        Environment::Desert => 3.0,
        Environment::Arctic => 7.0,
    }
}

// Inputs are never negative, so half-away-from-zero is half-up here.
fn metric(v: f64) -> u8 {
    v.round().clamp(0.0, 100.0) as u8
}

pub fn compute_scores(c: &CityConfig) -> Scores {
    let green = c.greenery() as f64;
    let tech = c.tech() as f64;
    let space = 100.0 - c.population() as f64;
    let eb = energy_bonus(c.energy);
    let tb = transport_bonus(c.transport);
    let env = environment_bonus(c.environment);

    let sustainability = metric(green * 0.6 + eb + space * 0.15 + env);
    let innovation = metric(tech * 0.7 + tb + eb * 0.3);
    let quality = metric(green * 0.3 + space * 0.25 + tech * 0.2 + env * 1.5);
    let resilience = metric(space * 0.2 + green * 0.2 + tech * 0.3 + eb + 10.0);

    let sum = sustainability as f64 + innovation as f64 + quality as f64 + resilience as f64;
    Scores {
        sustainability,
        innovation,
        quality,
        resilience,
        livability: metric(sum / 4.0),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Sustainability,
    Innovation,
    Quality,
    Resilience,
    Livability,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Sustainability,
        Metric::Innovation,
        Metric::Quality,
        Metric::Resilience,
        Metric::Livability,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Sustainability => "Sustainability",
            Metric::Innovation => "Innovation",
            Metric::Quality => "Quality of life",
            Metric::Resilience => "Resilience",
            Metric::Livability => "Livability",
        }
    }
}

impl Scores {
    pub fn get(&self, m: Metric) -> u8 {
        match m {
            Metric::Sustainability => self.sustainability,
            Metric::Innovation => self.innovation,
            Metric::Quality => self.quality,
            Metric::Resilience => self.resilience,
            Metric::Livability => self.livability,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetricDelta {
    pub metric: Metric,
    pub left: u8,
    pub right: u8,
    pub delta: i16,
}

/// Side-by-side comparison; `delta` is `right - left`.
pub fn compare(left: &Scores, right: &Scores) -> [MetricDelta; 5] {
    Metric::ALL.map(|metric| {
        let (l, r) = (left.get(metric), right.get(metric));
        MetricDelta {
            metric,
            left: l,
            right: r,
            delta: r as i16 - l as i16,
        }
    })
}
