//! The build store: owner of the slot map, its undo/redo history and the
//! debounced draft autosave.
//!
//! Every slot-map change goes through one private entry point, `apply`,
//! tagged with a [`MutationOrigin`]. User mutations snapshot history, clear the
//! redo stack and (re)arm the autosave debounce. History replay (undo/redo)
//! only swaps the map in, so it can neither corrupt the stacks nor schedule a
//! draft of its own.
//!
//! Derived values (metrics, alerts, score) are recomputed from the live map on
//! every call.

use crate::core::autosave::{Debouncer, DraftRing};
use crate::core::build::Build;
use crate::core::category::Category;
use crate::core::compat::{self, Alert, CategoryStatus, Evaluation};
use crate::core::component::Component;
use crate::core::config::QuadcalcConfig;
use crate::core::history::History;
use crate::core::kv::{KeyValueStore, MemoryKv};
use crate::core::metrics::{self, BuildMetrics, WeightBreakdown};
use crate::core::schemas;
use crate::core::slots::{SlotKey, SlotMap};
use crate::core::time::{Clock, SystemClock};

/// Name given to a loaded build document that carries none.
pub const LOADED_BUILD_NAME: &str = "Loaded Build";

/// Who is changing the slot map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOrigin {
    /// A forward edit: records history, clears redo, schedules autosave.
    User,
    /// Restoring a snapshot during undo/redo.
    HistoryReplay,
}

pub struct BuildStore {
    slots: SlotMap,
    name: String,
    history: History,
    autosave: Debouncer,
    drafts: DraftRing,
    config: QuadcalcConfig,
    kv: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
}

impl BuildStore {
    /// Construct a store and, if it starts empty, recover the most recent draft.
    pub fn new(
        kv: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        config: QuadcalcConfig,
    ) -> Self {
        let mut store = Self {
            slots: SlotMap::new(),
            name: config.default_build_name.clone(),
            history: History::new(config.history_limit),
            autosave: Debouncer::new(config.autosave_debounce_ms),
            drafts: DraftRing::new(schemas::DRAFTS_KEY, config.draft_limit),
            config,
            kv,
            clock,
        };
        store.recover_draft();
        store
    }

    /// Volatile store with default configuration.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryKv::new()),
            Box::new(SystemClock),
            QuadcalcConfig::default(),
        )
    }

    fn recover_draft(&mut self) {
        if !self.slots.is_empty() {
            return;
        }
        let Some(draft) = self.drafts.latest(self.kv.as_ref()) else {
            return;
        };
        tracing::info!(
            "Recovered draft '{}' from {} ({} filled slots)",
            draft.name,
            draft.timestamp,
            metrics::filled_count(&draft.components)
        );
        self.slots = draft.components;
        if !draft.name.is_empty() {
            self.name = draft.name;
        }
    }

    // ----- state -----------------------------------------------------------

    pub fn components(&self) -> &SlotMap {
        &self.slots
    }

    pub fn get(&self, category: Category) -> Option<&Component> {
        self.slots.get(category)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &QuadcalcConfig {
        &self.config
    }

    pub fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.undo_len() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history.redo_len() > 0
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_len()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ----- mutations -------------------------------------------------------

    fn apply(&mut self, next: SlotMap, origin: MutationOrigin) {
        match origin {
            MutationOrigin::User => {
                let before = std::mem::replace(&mut self.slots, next);
                self.history.record(before);
                self.autosave.schedule(self.clock.now_ms());
            }
            MutationOrigin::HistoryReplay => {
                self.slots = next;
            }
        }
    }

    /// Copy `component` into the slot, stamping its category with the slot key.
    pub fn set_component(&mut self, category: Category, component: &Component) {
        self.set_slot(SlotKey::Registered(category), component);
    }

    /// String-keyed variant. Keys outside the registry are accepted and stored
    /// as inert entries; the parsed key is returned so callers can tell.
    pub fn set_component_by_key(&mut self, key: &str, component: &Component) -> SlotKey {
        let slot = SlotKey::parse(key);
        if let SlotKey::Unregistered(k) = &slot {
            tracing::debug!("Storing '{}' under unregistered key '{}'", component.id, k);
        }
        self.set_slot(slot.clone(), component);
        slot
    }

    fn set_slot(&mut self, slot: SlotKey, component: &Component) {
        tracing::debug!("set {} = {}", slot.as_str(), component.id);
        let mut next = self.slots.clone();
        next.set(&slot, component.stamped(slot.as_str()));
        self.apply(next, MutationOrigin::User);
    }

    pub fn clear_component(&mut self, category: Category) {
        self.clear_slot(SlotKey::Registered(category));
    }

    pub fn clear_component_by_key(&mut self, key: &str) -> SlotKey {
        let slot = SlotKey::parse(key);
        self.clear_slot(slot.clone());
        slot
    }

    fn clear_slot(&mut self, slot: SlotKey) {
        tracing::debug!("clear {}", slot.as_str());
        let mut next = self.slots.clone();
        next.clear(&slot);
        self.apply(next, MutationOrigin::User);
    }

    /// Empty every slot and reset the name. One history entry.
    pub fn clear_all(&mut self) {
        tracing::debug!("clear all slots");
        self.name = self.config.default_build_name.clone();
        self.apply(SlotMap::new(), MutationOrigin::User);
    }

    /// Replace every slot and the name from a build document. One history entry.
    pub fn load_build(&mut self, build: &Build) {
        tracing::debug!("load build '{}'", build.name);
        self.name = if build.name.is_empty() {
            LOADED_BUILD_NAME.to_string()
        } else {
            build.name.clone()
        };
        let next = self.slots.replaced_by(&build.components);
        self.apply(next, MutationOrigin::User);
    }

    /// Rename the build. Not a history entry, but it does arm the autosave.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.autosave.schedule(self.clock.now_ms());
    }

    /// Returns false (and does nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(&self.slots) else {
            return false;
        };
        tracing::debug!("undo ({} left)", self.history.undo_len());
        self.apply(previous, MutationOrigin::HistoryReplay);
        true
    }

    /// Returns false (and does nothing) when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(&self.slots) else {
            return false;
        };
        tracing::debug!("redo ({} left)", self.history.redo_len());
        self.apply(next, MutationOrigin::HistoryReplay);
        true
    }

    /// Snapshot of the current build stamped with the current time.
    pub fn export_build(&self) -> Build {
        Build {
            name: self.name.clone(),
            timestamp: self.clock.now_ms(),
            components: self.slots.clone(),
        }
    }

    // ----- autosave --------------------------------------------------------

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Poll the debounce timer; writes a draft if the quiet period has elapsed.
    pub fn tick(&mut self) -> bool {
        if !self.autosave.fire_if_due(self.clock.now_ms()) {
            return false;
        }
        self.write_draft();
        true
    }

    /// Write any pending draft immediately, e.g. before the process exits.
    pub fn flush_autosave(&mut self) -> bool {
        if !self.autosave.is_pending() {
            return false;
        }
        self.autosave.cancel();
        self.write_draft();
        true
    }

    fn write_draft(&self) {
        let draft = self.export_build();
        match self.drafts.push(self.kv.as_ref(), draft) {
            Ok(()) => tracing::debug!("draft saved for '{}'", self.name),
            Err(e) => tracing::warn!("Draft autosave failed, keeping in-memory state: {}", e),
        }
    }

    /// Stored drafts, oldest first.
    pub fn drafts(&self) -> Vec<Build> {
        self.drafts.load(self.kv.as_ref())
    }

    // ----- derived ---------------------------------------------------------

    pub fn filled_count(&self) -> usize {
        metrics::filled_count(&self.slots)
    }

    pub fn total_cost(&self) -> i64 {
        metrics::total_cost(&self.slots)
    }

    pub fn total_weight(&self) -> i64 {
        metrics::total_weight(&self.slots)
    }

    pub fn weight_breakdown(&self) -> WeightBreakdown {
        metrics::weight_breakdown(&self.slots)
    }

    pub fn thrust_to_weight_ratio(&self) -> Option<f64> {
        metrics::thrust_to_weight_ratio(&self.slots)
    }

    pub fn estimated_flight_time(&self) -> Option<f64> {
        metrics::estimated_flight_time(&self.slots)
    }

    pub fn metrics(&self) -> BuildMetrics {
        metrics::compute(&self.slots)
    }

    pub fn evaluation(&self) -> Evaluation {
        compat::evaluate(&self.slots)
    }

    pub fn alerts(&self) -> Vec<Alert> {
        compat::engine::alerts(&self.slots)
    }

    pub fn compatibility_score(&self) -> u32 {
        compat::compatibility_score(&self.slots)
    }

    pub fn category_status(&self, category: Category) -> CategoryStatus {
        compat::category_status(&self.slots, category)
    }
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "store",
        "version": "0.3.0",
        "description": "Build state: fourteen slots, undo/redo history and debounced draft autosave",
        "commands": [
            { "name": "show", "parameters": ["format"] },
            { "name": "set", "parameters": ["category", "preset|file"] },
            { "name": "clear", "parameters": ["category"] },
            { "name": "reset", "parameters": [] },
            { "name": "rename", "parameters": ["name"] },
            { "name": "check", "parameters": ["format", "strict"] }
        ],
        "storage": [schemas::KV_DB_NAME, schemas::DRAFTS_KEY],
        "config": schemas::CONFIG_FILE_NAME
    })
}
