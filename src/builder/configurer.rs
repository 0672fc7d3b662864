use super::{BuildLifecycle, ConfiguredBuilder, ConfigurerAdapter};
use crate::error::BuilderResult;
use std::any::Any;

/// A pluggable unit of configuration applied to a [`ConfiguredBuilder`].
///
/// During `build()` every configurer first receives [`init`](Self::init),
/// then, once all configurers are initialized, [`configure`](Self::configure).
/// `init` may still apply further configurers or share objects; `configure`
/// should only read shared state and contribute to the build target.
///
/// Both callbacks default to doing nothing. Configurers are held behind an
/// `Arc`, so per-configurer mutable state needs interior mutability.
pub trait Configurer<T: BuildLifecycle>: Any + Send + Sync {
    fn init(&self, builder: &ConfiguredBuilder<T>) -> BuilderResult<()> {
        let _ = builder;
        Ok(())
    }

    fn configure(&self, builder: &ConfiguredBuilder<T>) -> BuilderResult<()> {
        let _ = builder;
        Ok(())
    }

    /// Post processing owned by this configurer.
    ///
    /// Configurers returning an adapter have the builder's strategy added to
    /// it when they are applied.
    fn adapter(&self) -> Option<&ConfigurerAdapter> {
        None
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
