use async_trait::async_trait;
use dashmap::DashMap;

use super::{Document, ObjectKey, ObjectKind, ObjectStore, StoreError};
use crate::trust::ResolveContext;

/// DashMap-backed [`ObjectStore`] for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: DashMap<ObjectKey, Document>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object.
    pub fn insert(&self, key: ObjectKey, document: Document) {
        self.objects.insert(key, document);
    }

    /// Builder-style insert of a config map.
    pub fn with_config_map(
        self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        document: Document,
    ) -> Self {
        self.insert(ObjectKey::new(ObjectKind::ConfigMap, namespace, name), document);
        self
    }

    /// Builder-style insert of a secret.
    pub fn with_secret(
        self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        document: Document,
    ) -> Self {
        self.insert(ObjectKey::new(ObjectKind::Secret, namespace, name), document);
        self
    }

    pub fn remove(&self, key: &ObjectKey) -> Option<Document> {
        self.objects.remove(key).map(|(_, document)| document)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(
        &self,
        _ctx: &ResolveContext,
        key: &ObjectKey,
    ) -> std::result::Result<Option<Document>, StoreError> {
        Ok(self.objects.get(key).map(|entry| entry.value().clone()))
    }
}
