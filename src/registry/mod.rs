//! # Registry Infrastructure
//!
//! Type-keyed registries backing the configured builder.
//!
//! ## Available Registries
//!
//! - **ConfigurerRegistry**: ordered, exact-type keyed store of configurers
//! - **SharedObjects**: singleton-per-type values shared between configurers
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── ConfigurerRegistry   (insertion ordered, replaced in place)
//! └── SharedObjects        (concurrent, unordered)
//! ```
//!
//! Neither registry considers type hierarchies: a value is only found through
//! the exact concrete type it was stored under.

pub mod configurer_registry;
pub mod shared_objects;

pub use configurer_registry::{instance_id, ConfigurerRegistry, RegistryEntry};
pub use shared_objects::{SharedObject, SharedObjects};
