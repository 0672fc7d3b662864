use super::ConfiguredBuilder;
use crate::error::BuilderResult;
use std::sync::Arc;

/// Extension points invoked by the fixed `build()` driver.
///
/// The implementor is the build target: it owns whatever state configurers
/// contribute to (reachable through [`ConfiguredBuilder::target`]) and turns
/// it into the final object in [`perform_build`](Self::perform_build).
pub trait BuildLifecycle: Sized + Send + Sync + 'static {
    type Output;

    /// Runs before any configurer is initialized
    fn before_init(&self, builder: &ConfiguredBuilder<Self>) -> BuilderResult<()> {
        let _ = builder;
        Ok(())
    }

    /// Runs after every configurer is initialized, before any is configured
    fn before_configure(&self, builder: &ConfiguredBuilder<Self>) -> BuilderResult<()> {
        let _ = builder;
        Ok(())
    }

    fn perform_build(&self, builder: &ConfiguredBuilder<Self>) -> BuilderResult<Self::Output>;
}

/// Something that produces a single object, once
pub trait ObjectBuilder {
    type Output;

    /// Build the object. Only the first call may succeed.
    fn build(&self) -> BuilderResult<Arc<Self::Output>>;

    /// The object produced by a successful [`build`](Self::build)
    fn get_object(&self) -> BuilderResult<Arc<Self::Output>>;
}
