pub mod assistant;
pub mod export;
pub mod presets;
pub mod saved_builds;
pub mod wiring;
