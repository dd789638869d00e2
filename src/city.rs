use rand::Rng;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    #[default]
    Urban,
    Coastal,
    Mountain,
    Desert,
    Arctic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Energy {
    #[default]
    Solar,
    Fusion,
    Wind,
    Tidal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Transport {
    #[default]
    Aerial,
    Hyperloop,
    Teleport,
}

/// Shared behaviour of the three categorical fields.
pub trait Choice: Copy + Default + PartialEq + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Unknown names resolve to the default variant.
    fn parse_lenient(s: &str) -> Self {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .unwrap_or_default()
    }

    fn cycle(self, delta: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let i = Self::ALL.iter().position(|v| *v == self).unwrap_or(0) as i32;
        Self::ALL[(i + delta).rem_euclid(len) as usize]
    }
}

impl Choice for Environment {
    const ALL: &'static [Self] = &[
        Environment::Urban,
        Environment::Coastal,
        Environment::Mountain,
        Environment::Desert,
        Environment::Arctic,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Environment::Urban => "urban",
            Environment::Coastal => "coastal",
            Environment::Mountain => "mountain",
            Environment::Desert => "desert",
            Environment::Arctic => "arctic",
        }
    }
}

impl Choice for Energy {
    const ALL: &'static [Self] = &[Energy::Solar, Energy::Fusion, Energy::Wind, Energy::Tidal];

    fn as_str(self) -> &'static str {
        match self {
            Energy::Solar => "solar",
            Energy::Fusion => "fusion",
            Energy::Wind => "wind",
            Energy::Tidal => "tidal",
        }
    }
}

impl Choice for Transport {
    const ALL: &'static [Self] = &[Transport::Aerial, Transport::Hyperloop, Transport::Teleport];

    fn as_str(self) -> &'static str {
        match self {
            Transport::Aerial => "aerial",
            Transport::Hyperloop => "hyperloop",
            Transport::Teleport => "teleport",
        }
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Environment, Energy, Transport);

/// The user's city. Numeric fields are percentages kept in [0,100].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CityConfig {
    pub environment: Environment,
    population: u8,
    pub energy: Energy,
    greenery: u8,
    pub transport: Transport,
    tech: u8,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Urban,
            population: 60,
            energy: Energy::Solar,
            greenery: 45,
            transport: Transport::Aerial,
            tech: 75,
        }
    }
}

fn clamp_pct(v: i64) -> u8 {
    v.clamp(0, 100) as u8
}

impl CityConfig {
    pub fn new(
        environment: Environment,
        population: i64,
        energy: Energy,
        greenery: i64,
        transport: Transport,
        tech: i64,
    ) -> Self {
        Self {
            environment,
            population: clamp_pct(population),
            energy,
            greenery: clamp_pct(greenery),
            transport,
            tech: clamp_pct(tech),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        fn pick<T: Choice, R: Rng + ?Sized>(rng: &mut R) -> T {
            T::ALL[rng.gen_range(0..T::ALL.len())]
        }
        Self {
            environment: pick(rng),
            population: rng.gen_range(0..=100),
            energy: pick(rng),
            greenery: rng.gen_range(0..=100),
            transport: pick(rng),
            tech: rng.gen_range(0..=100),
        }
    }

    pub fn population(&self) -> u8 {
        self.population
    }

    pub fn greenery(&self) -> u8 {
        self.greenery
    }

    pub fn tech(&self) -> u8 {
        self.tech
    }

    pub fn set_population(&mut self, v: i64) {
        self.population = clamp_pct(v);
    }

    pub fn set_greenery(&mut self, v: i64) {
        self.greenery = clamp_pct(v);
    }

    pub fn set_tech(&mut self, v: i64) {
        self.tech = clamp_pct(v);
    }

    pub fn get(&self, field: Field) -> String {
        match field {
            Field::Environment => self.environment.to_string(),
            Field::Population => self.population.to_string(),
            Field::Energy => self.energy.to_string(),
            Field::Greenery => self.greenery.to_string(),
            Field::Transport => self.transport.to_string(),
            Field::Tech => self.tech.to_string(),
        }
    }

    /// Step a field: numeric fields move by `delta`, categorical ones cycle
    /// by its sign.
    pub fn nudge(&mut self, field: Field, delta: i32) {
        let step = delta.signum();
        match field {
            Field::Environment => self.environment = self.environment.cycle(step),
            Field::Energy => self.energy = self.energy.cycle(step),
            Field::Transport => self.transport = self.transport.cycle(step),
            Field::Population => self.set_population(self.population as i64 + delta as i64),
            Field::Greenery => self.set_greenery(self.greenery as i64 + delta as i64),
            Field::Tech => self.set_tech(self.tech as i64 + delta as i64),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Environment,
    Population,
    Energy,
    Greenery,
    Transport,
    Tech,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Environment,
        Field::Population,
        Field::Energy,
        Field::Greenery,
        Field::Transport,
        Field::Tech,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Environment => "Environment",
            Field::Population => "Density",
            Field::Energy => "Energy",
            Field::Greenery => "Greenery",
            Field::Transport => "Transport",
            Field::Tech => "Tech level",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Population | Field::Greenery | Field::Tech)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn defaults_match_startup_city() {
        let c = CityConfig::default();
        assert_eq!(c.environment, Environment::Urban);
        assert_eq!(c.population(), 60);
        assert_eq!(c.energy, Energy::Solar);
        assert_eq!(c.greenery(), 45);
        assert_eq!(c.transport, Transport::Aerial);
        assert_eq!(c.tech(), 75);
    }

    #[test]
    fn numeric_fields_are_clamped() {
        let mut c = CityConfig::new(Environment::Desert, 140, Energy::Wind, -3, Transport::Teleport, 100);
        assert_eq!(c.population(), 100);
        assert_eq!(c.greenery(), 0);
        c.nudge(Field::Tech, 5);
        assert_eq!(c.tech(), 100);
        c.nudge(Field::Greenery, -5);
        assert_eq!(c.greenery(), 0);
    }

    #[test]
    fn unknown_names_fall_back_to_default_variant() {
        assert_eq!(Environment::parse_lenient("swamp"), Environment::Urban);
        assert_eq!(Energy::parse_lenient("coal"), Energy::Solar);
        assert_eq!(Transport::parse_lenient(""), Transport::Aerial);
        assert_eq!(Environment::parse_lenient(" Arctic "), Environment::Arctic);
    }

    #[test]
    fn categorical_nudge_wraps() {
        let mut c = CityConfig::default();
        c.nudge(Field::Transport, -5);
        assert_eq!(c.transport, Transport::Teleport);
        c.nudge(Field::Transport, 1);
        assert_eq!(c.transport, Transport::Aerial);
        c.nudge(Field::Energy, 1);
        assert_eq!(c.energy, Energy::Fusion);
    }

    #[test]
    fn random_cities_stay_valid() {
        let mut rng = StdRng::seed_from_u64(0xC17E);
        for _ in 0..200 {
            let c = CityConfig::random(&mut rng);
            assert!(c.population() <= 100 && c.greenery() <= 100 && c.tech() <= 100);
        }
    }
}
