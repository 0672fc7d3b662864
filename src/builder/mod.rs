//! # Builder
//!
//! The configured builder, the configurer contract it consumes and the
//! template-method hooks a build target supplies.
//!
//! ```text
//! ConfiguredBuilder<T>
//! ├── Configurer<T>      (init / configure, applied by callers)
//! │   └── ConfigurerAdapter  (per-configurer post processing)
//! ├── BuildLifecycle     (T: before_init / before_configure / perform_build)
//! └── ObjectBuilder      (build-once contract)
//! ```

pub mod adapter;
pub mod configured_builder;
pub mod configurer;
pub mod lifecycle;

pub use adapter::ConfigurerAdapter;
pub use configured_builder::{BuilderStats, ConfiguredBuilder};
pub use configurer::Configurer;
pub use lifecycle::{BuildLifecycle, ObjectBuilder};
