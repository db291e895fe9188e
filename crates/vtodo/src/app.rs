#![forbid(unsafe_code)]

//! The application session.

use std::rc::Rc;

#[cfg(feature = "list-config")]
use std::path::Path;

use tracing::debug;

use vtodo_core::{Item, ItemId, RowCallbacks, TodoList, ViewportMetrics};
use vtodo_runtime::{ListConfig, TodoActions, TodoStore};
use vtodo_widgets::{
    MaterializedRows, MaterializerStats, RenderDescriptor, RowMaterializer, VirtualizedList,
};

use crate::Result;

/// One todo list session.
///
/// Owns the store (through [`TodoActions`]), the scroll state, and the row
/// cache. Host events go in through `on_*`; frames come out of
/// [`frame`](Self::frame) or [`visible_descriptors`](Self::visible_descriptors).
#[derive(Debug)]
pub struct TodoApp {
    actions: TodoActions,
    callbacks: RowCallbacks,
    list: VirtualizedList,
    materializer: RowMaterializer,
    config: ListConfig,
}

impl TodoApp {
    /// Session seeded with `config.bulk_count` generated items.
    pub fn new(config: ListConfig) -> Result<Self> {
        let store = TodoStore::with_bulk(config.bulk_count);
        Self::with_store(config, Rc::new(store))
    }

    /// Session seeded with literal `items`. `config.bulk_count` is ignored.
    pub fn with_items(config: ListConfig, items: impl IntoIterator<Item = Item>) -> Result<Self> {
        Self::with_store(config, Rc::new(TodoStore::with_items(items)))
    }

    /// Session over an existing store.
    pub fn with_store(config: ListConfig, store: Rc<TodoStore>) -> Result<Self> {
        let config = config.validated()?;
        let metrics = config.to_metrics(0.0)?;
        let actions = TodoActions::new(store);
        let callbacks = actions.row_callbacks();
        debug!(
            len = actions.store().len(),
            overscan = config.overscan,
            cache_slack = config.cache_slack,
            "todo session started"
        );
        Ok(Self {
            actions,
            callbacks,
            list: VirtualizedList::new(metrics).with_overscan(config.overscan),
            materializer: RowMaterializer::new(config.cache_slack),
            config,
        })
    }

    /// Session from a TOML (`.toml`) or JSON (anything else) config file.
    #[cfg(feature = "list-config")]
    pub fn from_config(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.extension().is_some_and(|ext| ext == "toml") {
            ListConfig::load_toml_file(path)?
        } else {
            ListConfig::load_json_file(path)?
        };
        Self::new(config)
    }

    #[must_use]
    pub fn actions(&self) -> &TodoActions {
        &self.actions
    }

    #[must_use]
    pub fn store(&self) -> &Rc<TodoStore> {
        self.actions.store()
    }

    #[must_use]
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn on_insert(&self, text: impl Into<String>) {
        self.actions.on_insert(text);
    }

    pub fn on_remove(&self, id: ItemId) {
        self.actions.on_remove(id);
    }

    pub fn on_toggle(&self, id: ItemId) {
        self.actions.on_toggle(id);
    }

    /// Current list snapshot.
    #[must_use]
    pub fn snapshot(&self) -> TodoList {
        self.actions.store().snapshot()
    }

    #[must_use]
    pub fn list_state(&self) -> &VirtualizedList {
        &self.list
    }

    /// Scroll state, for host-driven scrolling between frames.
    pub fn list_state_mut(&mut self) -> &mut VirtualizedList {
        &mut self.list
    }

    #[must_use]
    pub fn materializer_stats(&self) -> MaterializerStats {
        self.materializer.stats()
    }

    /// Adopt host-reported `metrics` and return the descriptors to draw.
    ///
    /// The host's scroll offset is windowed as given, without clamping to
    /// the scrollable extent: an offset past the end yields the trailing
    /// rows from `floor(scroll / item_extent)` (capped at the last index).
    pub fn visible_descriptors(&mut self, metrics: &ViewportMetrics) -> Vec<Rc<RenderDescriptor>> {
        self.list.set_metrics(*metrics);
        let snapshot = self.snapshot();
        self.materialize(&snapshot).rows
    }

    /// Materialize the current render range against the latest snapshot.
    ///
    /// A stored scroll offset left past the end by a shrink is clamped
    /// first.
    pub fn frame(&mut self) -> MaterializedRows {
        let snapshot = self.snapshot();
        self.list.clamp_to(snapshot.len());
        self.materialize(&snapshot)
    }

    fn materialize(&mut self, snapshot: &TodoList) -> MaterializedRows {
        let range = self.list.render_range(snapshot.len());
        self.materializer.materialize(
            snapshot,
            range,
            self.list.metrics().item_extent(),
            &self.callbacks,
        )
    }
}
