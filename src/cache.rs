use crate::city::CityConfig;
use crate::scene::{render_static, scale_for, StaticScene};
use crate::theme::theme_for;
use std::rc::Rc;
use tracing::debug;

/// Canonical key of a static scene: every configuration field plus the
/// raster size, joined with `|` (no field value can contain one).
pub fn scene_key(config: &CityConfig, width: u32, height: u32) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}",
        config.environment,
        config.population(),
        config.energy,
        config.greenery(),
        config.transport,
        config.tech(),
        width,
        height
    )
}

struct Entry {
    key: String,
    scene: Rc<StaticScene>,
}

/// Single-entry memo of the static pass. A key mismatch replaces the entry.
#[derive(Default)]
pub struct SceneCache {
    entry: Option<Entry>,
    renders: u64,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_render(&mut self, config: &CityConfig, width: u32, height: u32) -> Rc<StaticScene> {
        let key = scene_key(config, width, height);
        if let Some(entry) = &self.entry {
            if entry.key == key {
                return Rc::clone(&entry.scene);
            }
        }

        let scene = Rc::new(render_static(
            width,
            height,
            scale_for(width, height),
            &theme_for(config.environment),
            config,
        ));
        self.renders += 1;
        debug!(%key, renders = self.renders, "static scene rendered");
        self.entry = Some(Entry {
            key,
            scene: Rc::clone(&scene),
        });
        scene
    }

    /// Drop the entry regardless of key. Called on every applied resize.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("static scene invalidated");
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.entry.as_ref().map(|e| e.key.as_str())
    }

    /// Number of static renders performed so far.
    pub fn renders(&self) -> u64 {
        self.renders
    }
}
