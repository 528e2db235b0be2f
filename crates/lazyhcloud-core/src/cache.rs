//! Per-kind resource cache with lazy-load bookkeeping

use lazyhcloud_provider::{Resource, ResourceKind};

/// Cached listing for one resource kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheEntry {
    /// Items are current. When false the items are not shown.
    pub loaded: bool,
    pub items: Vec<Resource>,
    /// Highlighted row
    pub cursor: usize,
}

impl CacheEntry {
    pub fn selected(&self) -> Option<&Resource> {
        if !self.loaded {
            return None;
        }
        self.items.get(self.cursor)
    }

    /// Move the highlight, wrapping at either end
    pub fn move_cursor(&mut self, down: bool) {
        let len = self.items.len();
        if !self.loaded || len == 0 {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % len
        } else {
            self.cursor.checked_sub(1).unwrap_or(len - 1)
        };
    }
}

/// What the list area should show for a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    /// Loaded, and there is nothing to show
    Empty,
    Ready,
}

/// One [`CacheEntry`] per [`ResourceKind`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCache {
    entries: [CacheEntry; 6],
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, kind: ResourceKind) -> &CacheEntry {
        &self.entries[kind.index()]
    }

    pub fn entry_mut(&mut self, kind: ResourceKind) -> &mut CacheEntry {
        &mut self.entries[kind.index()]
    }

    pub fn is_loaded(&self, kind: ResourceKind) -> bool {
        self.entry(kind).loaded
    }

    /// Record a completed listing. The highlight is kept where possible.
    pub fn store(&mut self, kind: ResourceKind, items: Vec<Resource>) {
        let entry = self.entry_mut(kind);
        entry.cursor = entry.cursor.min(items.len().saturating_sub(1));
        entry.items = items;
        entry.loaded = true;
    }

    /// Mark a kind stale. Existing items are kept until the reload lands.
    pub fn invalidate(&mut self, kind: ResourceKind) {
        self.entry_mut(kind).loaded = false;
    }

    /// Drop every cached listing
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn list_status(&self, kind: ResourceKind) -> ListStatus {
        let entry = self.entry(kind);
        match (entry.loaded, entry.items.is_empty()) {
            (false, _) => ListStatus::Loading,
            (true, true) => ListStatus::Empty,
            (true, false) => ListStatus::Ready,
        }
    }

    /// Look up a cached item by ID, regardless of load state
    pub fn find(&self, kind: ResourceKind, id: u64) -> Option<&Resource> {
        self.entry(kind).items.iter().find(|r| r.id() == id)
    }
}
