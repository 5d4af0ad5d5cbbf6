//! Core of the build planner: the entity model, the build store with its
//! history and autosave, derived metrics, and the compatibility engine.
//!
//! Everything in here is single-threaded and synchronous. Persistence is
//! reached only through the [`kv::KeyValueStore`] seam.

pub mod autosave;
pub mod build;
pub mod category;
pub mod compat;
pub mod component;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod kv;
pub mod metrics;
pub mod output;
pub mod schemas;
pub mod slots;
pub mod store;
pub mod time;
