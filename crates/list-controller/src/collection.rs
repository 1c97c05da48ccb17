//! # Resource Collection
//!
//! The loaded list of one screen plus its client-side filter. The filtered
//! view is derived state: it is recomputed whenever the items or the filter
//! change, never patched by callers.

use std::fmt;
use std::sync::Arc;

/// Client-side predicate over a loaded item.
pub type Filter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Build a [`Filter`] from a closure.
pub fn filter<T, F>(predicate: F) -> Filter<T>
where
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Arc::new(predicate)
}

/// Load state of a collection.
///
/// Goes `Idle -> Loading -> Loaded | Error`; every new load restarts at
/// `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Items in server order, the active filter and the visible subset.
pub struct ResourceCollection<T> {
    items: Vec<T>,
    filter: Option<Filter<T>>,
    visible: Vec<T>,
    status: LoadStatus,
    error: Option<String>,
}

impl<T: Clone> ResourceCollection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            filter: None,
            visible: Vec::new(),
            status: LoadStatus::Idle,
            error: None,
        }
    }

    /// Everything the last successful load returned, in server order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// `items` narrowed by the active filter (all of them when there is none).
    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Message of the last failed load; cleared by the next load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub(crate) fn begin_loading(&mut self) {
        self.status = LoadStatus::Loading;
        self.error = None;
    }

    pub(crate) fn finish_loading(&mut self, items: Vec<T>) {
        self.items = items;
        self.status = LoadStatus::Loaded;
        self.recompute();
    }

    pub(crate) fn fail_loading(&mut self, message: String) {
        self.status = LoadStatus::Error;
        self.error = Some(message);
    }

    pub(crate) fn set_filter(&mut self, filter: Option<Filter<T>>) {
        self.filter = filter;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = match &self.filter {
            Some(keep) => self.items.iter().filter(|item| keep(*item)).cloned().collect(),
            None => self.items.clone(),
        };
    }
}

impl<T: Clone> Default for ResourceCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ResourceCollection<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            filter: self.filter.clone(),
            visible: self.visible.clone(),
            status: self.status,
            error: self.error.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ResourceCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCollection")
            .field("items", &self.items)
            .field("filtered", &self.filter.is_some())
            .field("visible", &self.visible.len())
            .field("status", &self.status)
            .field("error", &self.error)
            .finish()
    }
}
