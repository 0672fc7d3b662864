//! # Configurer Registry
//!
//! Ordered registry holding at most one instance per exact concrete type.
//!
//! ## Overview
//!
//! Each entry is keyed by the `TypeId` of the concrete value that was
//! registered. Lookups never consider trait objects or wrapper types: a
//! `SessionConfigurer` is only found by asking for `SessionConfigurer`.
//!
//! Entries keep two handles to the same allocation: a type-erased `Any`
//! handle used for typed lookups, and a dispatch handle (`Arc<D>`, usually a
//! trait object) used to drive the lifecycle callbacks.
//!
//! Re-registering a type replaces the instance but keeps the original
//! insertion position.

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

/// A single registered value
pub struct RegistryEntry<D: ?Sized> {
    type_id: TypeId,
    type_name: &'static str,
    instance: Arc<dyn Any + Send + Sync>,
    handle: Arc<D>,
}

impl<D: ?Sized> RegistryEntry<D> {
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn handle(&self) -> &Arc<D> {
        &self.handle
    }

    /// Address of the registered allocation, stable for the life of the instance
    pub fn instance_id(&self) -> usize {
        instance_id(&self.handle)
    }
}

impl<D: ?Sized> Clone for RegistryEntry<D> {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            type_name: self.type_name,
            instance: Arc::clone(&self.instance),
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<D: ?Sized> std::fmt::Debug for RegistryEntry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("type_name", &self.type_name)
            .field("instance_id", &self.instance_id())
            .finish()
    }
}

/// Identity of an `Arc` allocation, ignoring any trait object metadata
pub fn instance_id<D: ?Sized>(handle: &Arc<D>) -> usize {
    Arc::as_ptr(handle) as *const () as usize
}

/// Exact-type keyed registry preserving insertion order
pub struct ConfigurerRegistry<D: ?Sized> {
    entries: Vec<RegistryEntry<D>>,
}

impl<D: ?Sized> ConfigurerRegistry<D> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `instance` under its concrete type.
    ///
    /// `handle` must point at the same allocation as `instance`; it is the
    /// dispatch view the registry hands back from [`Self::handles`]. Returns
    /// the entry that was replaced, if any.
    pub fn insert<C>(&mut self, instance: Arc<C>, handle: Arc<D>) -> Option<RegistryEntry<D>>
    where
        C: Any + Send + Sync,
    {
        debug_assert_eq!(instance_id(&instance), instance_id(&handle));

        let entry = RegistryEntry {
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            instance,
            handle,
        };

        match self.position(entry.type_id) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index], entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    /// Look up the instance registered for exactly `C`
    pub fn get<C>(&self) -> Option<Arc<C>>
    where
        C: Any + Send + Sync,
    {
        self.position(TypeId::of::<C>())
            .and_then(|index| Arc::clone(&self.entries[index].instance).downcast::<C>().ok())
    }

    /// Remove and return the instance registered for exactly `C`
    pub fn remove<C>(&mut self) -> Option<Arc<C>>
    where
        C: Any + Send + Sync,
    {
        let index = self.position(TypeId::of::<C>())?;
        let entry = self.entries.remove(index);
        entry.instance.downcast::<C>().ok()
    }

    pub fn contains<C>(&self) -> bool
    where
        C: Any + Send + Sync,
    {
        self.position(TypeId::of::<C>()).is_some()
    }

    /// Fixed copy of the entries in insertion order
    pub fn snapshot(&self) -> Vec<RegistryEntry<D>> {
        self.entries.clone()
    }

    /// Dispatch handles in insertion order
    pub fn handles(&self) -> Vec<Arc<D>> {
        self.entries
            .iter()
            .map(|entry| Arc::clone(&entry.handle))
            .collect()
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.type_name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, type_id: TypeId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.type_id == type_id)
    }
}

impl<D: ?Sized> Default for ConfigurerRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized> std::fmt::Debug for ConfigurerRegistry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.type_names()).finish()
    }
}
