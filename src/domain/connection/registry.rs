use super::descriptor::ConnectionDescriptor;
use super::id::ConnectionId;

/// Non-favorite entries kept before the oldest is evicted.
pub const MAX_RECENT_CONNECTIONS: usize = 10;

/// Saved connections in load order, unique by id.
///
/// Entries with `is_favorite` are favorites, every other entry is a recent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionRegistry {
    entries: Vec<ConnectionDescriptor>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from loaded records. A repeated id keeps its first record.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ConnectionDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            if !registry.contains(&descriptor.id) {
                registry.entries.push(descriptor);
            }
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionDescriptor> {
        self.entries.iter()
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&ConnectionDescriptor> {
        self.entries.iter().find(|d| &d.id == id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.get(id).is_some()
    }

    pub fn favorites(&self) -> impl Iterator<Item = &ConnectionDescriptor> {
        self.entries.iter().filter(|d| d.is_favorite)
    }

    pub fn recents(&self) -> impl Iterator<Item = &ConnectionDescriptor> {
        self.entries.iter().filter(|d| !d.is_favorite)
    }

    pub fn recent_count(&self) -> usize {
        self.recents().count()
    }

    /// Replaces the entry with the same id in place, or appends.
    /// Returns `true` when the descriptor was appended.
    pub fn upsert(&mut self, descriptor: ConnectionDescriptor) -> bool {
        match self.entries.iter_mut().find(|d| d.id == descriptor.id) {
            Some(existing) => {
                *existing = descriptor;
                false
            }
            None => {
                self.entries.push(descriptor);
                true
            }
        }
    }

    pub fn remove(&mut self, id: &ConnectionId) -> Option<ConnectionDescriptor> {
        let index = self.entries.iter().position(|d| &d.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Recents that must go before `candidate` can be added without
    /// exceeding [`MAX_RECENT_CONNECTIONS`], oldest first.
    ///
    /// Favorites and entries already in the registry never evict. Entries
    /// without `last_used` count as oldest; equal timestamps keep registry order.
    pub fn eviction_candidates(
        &self,
        candidate: &ConnectionDescriptor,
    ) -> Vec<ConnectionDescriptor> {
        if candidate.is_favorite || self.contains(&candidate.id) {
            return Vec::new();
        }

        let mut recents: Vec<&ConnectionDescriptor> = self.recents().collect();
        if recents.len() < MAX_RECENT_CONNECTIONS {
            return Vec::new();
        }

        let excess = recents.len() + 1 - MAX_RECENT_CONNECTIONS;
        recents.sort_by_key(|d| d.last_used);
        recents.into_iter().take(excess).cloned().collect()
    }
}

impl<'a> IntoIterator for &'a ConnectionRegistry {
    type Item = &'a ConnectionDescriptor;
    type IntoIter = std::slice::Iter<'a, ConnectionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
