use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Opaque id of one stored artifact. Ids are never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactId(u64);

impl ArtifactId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Revocable reference to downloadable chart bytes.
///
/// A handle only names the bytes; they live in the [`ArtifactStore`] that
/// issued it and stop resolving once revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHandle {
    id: ArtifactId,
    extension: String,
    media_type: String,
    len: usize,
}

impl ArtifactHandle {
    #[must_use]
    pub fn id(&self) -> ArtifactId {
        self.id
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Download name, `chart.<extension>`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("chart.{}", self.extension)
    }
}

/// Owner of every live artifact's bytes.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    next_id: u64,
    entries: IndexMap<ArtifactId, Vec<u8>>,
}

impl ArtifactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        bytes: Vec<u8>,
        extension: impl Into<String>,
        media_type: impl Into<String>,
    ) -> ArtifactHandle {
        let id = ArtifactId(self.next_id);
        self.next_id += 1;
        let handle = ArtifactHandle {
            id,
            extension: extension.into(),
            media_type: media_type.into(),
            len: bytes.len(),
        };
        self.entries.insert(id, bytes);
        trace!(id = id.0, len = handle.len, live = self.entries.len(), "artifact created");
        handle
    }

    /// Bytes behind `handle`, or `None` once it has been revoked.
    #[must_use]
    pub fn resolve(&self, handle: &ArtifactHandle) -> Option<&[u8]> {
        self.entries.get(&handle.id).map(Vec::as_slice)
    }

    /// Releases the bytes behind `handle`. Returns `false` if already revoked.
    pub fn revoke(&mut self, handle: &ArtifactHandle) -> bool {
        let removed = self.entries.shift_remove(&handle.id).is_some();
        if removed {
            trace!(id = handle.id.0, live = self.entries.len(), "artifact revoked");
        }
        removed
    }

    pub fn revoke_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    #[must_use]
    pub fn is_live(&self, handle: &ArtifactHandle) -> bool {
        self.entries.contains_key(&handle.id)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_resolve_until_revoked() {
        let mut store = ArtifactStore::new();
        let handle = store.insert(vec![0x89, 0x50, 0x4e, 0x47], "png", "image/png");

        assert_eq!(handle.file_name(), "chart.png");
        assert_eq!(store.resolve(&handle), Some(&[0x89, 0x50, 0x4e, 0x47][..]));
        assert!(store.revoke(&handle));
        assert!(!store.revoke(&handle));
        assert_eq!(store.resolve(&handle), None);
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn ids_are_not_reused_after_revocation() {
        let mut store = ArtifactStore::new();
        let first = store.insert(vec![1], "png", "image/png");
        store.revoke(&first);
        let second = store.insert(vec![2], "png", "image/png");

        assert_ne!(first.id(), second.id());
        assert_eq!(store.resolve(&first), None);
        assert_eq!(store.resolve(&second), Some(&[2u8][..]));
    }

    #[test]
    fn revoke_all_empties_the_store() {
        let mut store = ArtifactStore::new();
        store.insert(vec![1], "png", "image/png");
        store.insert(vec![2], "svg", "image/svg+xml");
        assert_eq!(store.revoke_all(), 2);
        assert_eq!(store.live_count(), 0);
    }
}
