use crate::city::{CityConfig, Energy, Environment, Transport};

/// A scenario card: a named city to start from.
#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub slug: &'static str,
    pub title: &'static str,
    pub tagline: &'static str,
    environment: Environment,
    population: i64,
    energy: Energy,
    greenery: i64,
    transport: Transport,
    tech: i64,
}

impl Preset {
    pub fn config(&self) -> CityConfig {
        CityConfig::new(
            self.environment,
            self.population,
            self.energy,
            self.greenery,
            self.transport,
            self.tech,
        )
    }
}

pub const PRESETS: [Preset; 5] = [
    Preset {
        slug: "neon-megalopolis",
        title: "Neon Megalopolis",
        tagline: "Fusion-lit towers packed shoulder to shoulder.",
        environment: Environment::Urban,
        population: 90,
        energy: Energy::Fusion,
        greenery: 25,
        transport: Transport::Aerial,
        tech: 95,
    },
    Preset {
        slug: "verdant-shores",
        title: "Verdant Shores",
        tagline: "A low-rise coast city riding the tides.",
        environment: Environment::Coastal,
        population: 40,
        energy: Energy::Tidal,
        greenery: 85,
        transport: Transport::Hyperloop,
        tech: 60,
    },
    Preset {
        slug: "summit-collective",
        title: "Summit Collective",
        tagline: "Wind farms on the ridge, beams down the valley.",
        environment: Environment::Mountain,
        population: 30,
        energy: Energy::Wind,
        greenery: 70,
        transport: Transport::Teleport,
        tech: 70,
    },
    Preset {
        slug: "dune-array",
        title: "Dune Array",
        tagline: "Solar fields and tube trains across the sand.",
        environment: Environment::Desert,
        population: 55,
        energy: Energy::Solar,
        greenery: 20,
        transport: Transport::Hyperloop,
        tech: 75,
    },
    Preset {
        slug: "aurora-station",
        title: "Aurora Station",
        tagline: "A polar outpost under the northern lights.",
        environment: Environment::Arctic,
        population: 25,
        energy: Energy::Fusion,
        greenery: 40,
        transport: Transport::Teleport,
        tech: 90,
    },
];

/// Case-insensitive lookup by slug or title.
pub fn find(name: &str) -> Option<&'static Preset> {
    let name = name.trim();
    PRESETS
        .iter()
        .find(|p| p.slug.eq_ignore_ascii_case(name) || p.title.eq_ignore_ascii_case(name))
}
