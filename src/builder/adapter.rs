//! # Configurer Adapter
//!
//! Per-configurer post processing. A configurer that embeds a
//! [`ConfigurerAdapter`] and exposes it through [`Configurer::adapter`] gets
//! its own [`CompositeObjectPostProcessor`]. When the configurer is applied,
//! the adapter records the builder's current strategy, so objects the
//! configurer post-processes go through the builder's strategy first and then
//! through the configurer's own processors (ascending `order()`, stable).
//!
//! ```rust
//! use configured_builder::{
//!     typed_post_processor, BuildLifecycle, BuilderResult, ConfiguredBuilder, Configurer,
//!     ConfigurerAdapter,
//! };
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct FilterChainTarget {
//!     filters: Mutex<Vec<String>>,
//! }
//!
//! impl BuildLifecycle for FilterChainTarget {
//!     type Output = Vec<String>;
//!
//!     fn perform_build(&self, _: &ConfiguredBuilder<Self>) -> BuilderResult<Vec<String>> {
//!         Ok(self.filters.lock().clone())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct LogoutConfigurer {
//!     adapter: ConfigurerAdapter,
//! }
//!
//! impl Configurer<FilterChainTarget> for LogoutConfigurer {
//!     fn configure(&self, builder: &ConfiguredBuilder<FilterChainTarget>) -> BuilderResult<()> {
//!         let filter = self.adapter.post_process(String::from("logout"))?;
//!         builder.target().filters.lock().push(filter);
//!         Ok(())
//!     }
//!
//!     fn adapter(&self) -> Option<&ConfigurerAdapter> {
//!         Some(&self.adapter)
//!     }
//! }
//!
//! let logout = LogoutConfigurer::default();
//! logout
//!     .adapter
//!     .add_object_post_processor(Arc::new(typed_post_processor(|f: String| Ok(format!("{f}+csrf")))));
//!
//! let builder = ConfiguredBuilder::new(FilterChainTarget::default());
//! builder.apply(logout)?;
//! assert_eq!(*builder.build()?, vec!["logout+csrf".to_string()]);
//! # Ok::<(), configured_builder::BuilderError>(())
//! ```
//!
//! [`Configurer::adapter`]: super::Configurer::adapter

use crate::error::BuilderResult;
use crate::post_process::{post_process_typed, CompositeObjectPostProcessor, ObjectPostProcessor};
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
pub struct ConfigurerAdapter {
    builder_post_processor: RwLock<Option<Arc<dyn ObjectPostProcessor>>>,
    post_processors: RwLock<CompositeObjectPostProcessor>,
}

impl ConfigurerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a processor to this configurer's own chain
    pub fn add_object_post_processor(&self, processor: Arc<dyn ObjectPostProcessor>) {
        debug!(post_processor = processor.name(), "Adding configurer post processor");
        self.post_processors.write().add_processor(processor);
    }

    /// Run `object` through the builder's strategy, then this configurer's chain
    pub fn post_process<P>(&self, object: P) -> BuilderResult<P>
    where
        P: Any + Send,
    {
        let builder_processor = self.builder_post_processor.read().clone();
        let chain = self.post_processors.read().clone();

        let object = match builder_processor {
            Some(processor) => post_process_typed(processor.as_ref(), object)?,
            None => object,
        };
        post_process_typed(&chain, object)
    }

    /// Names of the builder strategy (when attached) and the own chain, in run order
    pub fn post_processor_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .builder_post_processor
            .read()
            .iter()
            .map(|processor| processor.name())
            .collect();
        names.extend(self.post_processors.read().processor_names());
        names
    }

    /// Record the strategy of the builder this configurer was applied to.
    ///
    /// Applying again replaces it rather than chaining a second copy.
    pub(crate) fn attach_builder_post_processor(&self, processor: Arc<dyn ObjectPostProcessor>) {
        *self.builder_post_processor.write() = Some(processor);
    }
}

impl std::fmt::Debug for ConfigurerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurerAdapter")
            .field("post_processors", &self.post_processor_names())
            .finish()
    }
}
