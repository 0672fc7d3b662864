//! # Shared Objects
//!
//! Type-keyed singleton store made available to every configurer of a build.
//!
//! Values are keyed by the `TypeId` of the stored type, so at most one value
//! per exact type is held. Lookups by trait or wrapper type never match.
//! The store is a concurrent map and is not covered by the builder's
//! lifecycle lock.

use dashmap::DashMap;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A stored shared value along with the name of its type
#[derive(Clone)]
pub struct SharedObject {
    pub type_name: &'static str,
    pub value: Arc<dyn Any + Send + Sync>,
}

impl SharedObject {
    pub fn downcast<V>(&self) -> Option<Arc<V>>
    where
        V: Any + Send + Sync,
    {
        Arc::clone(&self.value).downcast::<V>().ok()
    }
}

impl std::fmt::Debug for SharedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedObject")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct SharedObjects {
    objects: DashMap<TypeId, SharedObject>,
}

impl SharedObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` as the singleton for its type, replacing any previous value
    pub fn set<V>(&self, value: V) -> Option<SharedObject>
    where
        V: Any + Send + Sync,
    {
        self.set_arc(Arc::new(value))
    }

    pub fn set_arc<V>(&self, value: Arc<V>) -> Option<SharedObject>
    where
        V: Any + Send + Sync,
    {
        debug!(shared_type = type_name::<V>(), "Setting shared object");
        self.objects.insert(
            TypeId::of::<V>(),
            SharedObject {
                type_name: type_name::<V>(),
                value,
            },
        )
    }

    pub fn get<V>(&self) -> Option<Arc<V>>
    where
        V: Any + Send + Sync,
    {
        self.objects
            .get(&TypeId::of::<V>())
            .and_then(|entry| entry.downcast::<V>())
    }

    pub fn remove<V>(&self) -> Option<Arc<V>>
    where
        V: Any + Send + Sync,
    {
        self.objects
            .remove(&TypeId::of::<V>())
            .and_then(|(_, entry)| entry.downcast::<V>())
    }

    pub fn contains<V>(&self) -> bool
    where
        V: Any + Send + Sync,
    {
        self.objects.contains_key(&TypeId::of::<V>())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Read-only copy of every stored value
    pub fn snapshot(&self) -> HashMap<TypeId, SharedObject> {
        self.objects
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }
}

impl std::fmt::Debug for SharedObjects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.objects.iter().map(|e| e.value().type_name).collect();
        names.sort_unstable();
        f.debug_struct("SharedObjects").field("types", &names).finish()
    }
}
