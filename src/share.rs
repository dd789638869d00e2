//! Shareable links: the city encoded as query parameters with short keys
//! (`env`, `pop`, `nrg`, `grn`, `trn`, `tch`, `name`).

use crate::city::{Choice, CityConfig, Energy, Environment, Transport};
use std::fmt::Write as _;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SharedCity {
    pub config: CityConfig,
    pub name: Option<String>,
}

/// Missing, unknown or malformed values fall back to the default of that
/// field; numbers are rounded and clamped into [0,100].
pub fn parse_query(query: &str) -> SharedCity {
    let defaults = CityConfig::default();
    let mut config = defaults;
    let mut name = None;

    let query = query.trim();
    let query = query.split_once('?').map_or(query, |(_, q)| q);
    let query = query.split('#').next().unwrap_or_default();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_component(raw);
        match key {
            "env" => config.environment = Environment::parse_lenient(&value),
            "nrg" => config.energy = Energy::parse_lenient(&value),
            "trn" => config.transport = Transport::parse_lenient(&value),
            "pop" => config.set_population(parse_pct(&value).unwrap_or(defaults.population() as i64)),
            "grn" => config.set_greenery(parse_pct(&value).unwrap_or(defaults.greenery() as i64)),
            "tch" => config.set_tech(parse_pct(&value).unwrap_or(defaults.tech() as i64)),
            "name" => {
                let trimmed = value.trim();
                name = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            _ => {}
        }
    }

    SharedCity { config, name }
}

fn parse_pct(s: &str) -> Option<i64> {
    let v: f64 = s.trim().parse().ok()?;
    v.is_finite().then(|| v.round() as i64)
}

pub fn to_query(config: &CityConfig, name: Option<&str>) -> String {
    let mut out = format!(
        "env={}&pop={}&nrg={}&grn={}&trn={}&tch={}",
        config.environment,
        config.population(),
        config.energy,
        config.greenery(),
        config.transport,
        config.tech()
    );
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        out.push_str("&name=");
        out.push_str(&encode_component(name));
    }
    out
}

pub fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => {
                let _ = write!(out, "%{b:02X}");
            }
        }
    }
    out
}

/// `+` becomes a space and `%XX` a byte; broken escapes are kept literally.
pub fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push(hex_val(bytes[i + 1]) << 4 | hex_val(bytes[i + 2]));
                i += 3;
                continue;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}
