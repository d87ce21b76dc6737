use std::sync::Arc;

/// Immutable, versioned copy of a whole collection.
///
/// Cloning is cheap (the items are shared). `version` increases by one with
/// every published mutation, so a reader can tell which of two snapshots is
/// newer.
#[derive(Debug)]
pub struct Snapshot<T> {
    version: u64,
    items: Arc<[T]>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Snapshot<T> {
    pub fn new(version: u64, items: Arc<[T]>) -> Self {
        Self { version, items }
    }

    pub fn empty() -> Self {
        Self::new(0, Arc::from(Vec::new()))
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn shared_items(&self) -> Arc<[T]> {
        Arc::clone(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Next snapshot in the sequence.
    pub fn succeed(&self, items: Vec<T>) -> Self {
        Self::new(self.version + 1, Arc::from(items))
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}
