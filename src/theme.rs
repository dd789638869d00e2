use crate::canvas::Pixel;
use crate::city::Environment;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub sky_top: Pixel,
    pub sky_bottom: Pixel,
    pub ground: Pixel,
    pub accent: Pixel,
}

const URBAN: Theme = Theme {
    sky_top: Pixel::hex(0x0a0e27),
    sky_bottom: Pixel::hex(0x2a1f5e),
    ground: Pixel::hex(0x12152e),
    accent: Pixel::hex(0x00f0ff),
};

const COASTAL: Theme = Theme {
    sky_top: Pixel::hex(0x0b1d3a),
    sky_bottom: Pixel::hex(0x1e5d8b),
    ground: Pixel::hex(0x0e2a3d),
    accent: Pixel::hex(0x3dd6d0),
};

const MOUNTAIN: Theme = Theme {
    sky_top: Pixel::hex(0x141b2d),
    sky_bottom: Pixel::hex(0x3b4a6b),
    ground: Pixel::hex(0x1f2a1f),
    accent: Pixel::hex(0xa3e4a1),
};

const DESERT: Theme = Theme {
    sky_top: Pixel::hex(0x2b1a3d),
    sky_bottom: Pixel::hex(0xd98c4a),
    ground: Pixel::hex(0x5c3b1e),
    accent: Pixel::hex(0xffb347),
};

const ARCTIC: Theme = Theme {
    sky_top: Pixel::hex(0x0d1b2a),
    sky_bottom: Pixel::hex(0x5a7fa8),
    ground: Pixel::hex(0xb8cfe0),
    accent: Pixel::hex(0x9ff3ff),
};

pub fn theme_for(env: Environment) -> Theme {
    match env {
        Environment::Urban => URBAN,
        Environment::Coastal => COASTAL,
        Environment::Mountain => MOUNTAIN,
        Environment::Desert => DESERT,
        Environment::Arctic => ARCTIC,
    }
}
