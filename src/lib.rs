//! A seeded, deterministic future-city skyline with a scoring model.
//!
//! The static skyline is rendered once per configuration and size, cached,
//! and an animated overlay is composited on top of it every frame.

pub mod app;
pub mod cache;
pub mod canvas;
pub mod city;
pub mod export;
pub mod input;
pub mod overlay;
pub mod presets;
pub mod rng;
pub mod scene;
pub mod score;
pub mod settings;
pub mod share;
pub mod term;
pub mod theme;
