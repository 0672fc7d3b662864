//! # Configured Builder
//!
//! Builder that accumulates [`Configurer`]s and drives them through a fixed
//! lifecycle to produce one object.
//!
//! ## Lifecycle
//!
//! ```text
//! build()
//!   │  state → INITIALIZING
//!   ├─ target.before_init()
//!   ├─ configurer.init()       (insertion order; late arrivals initialized on apply)
//!   │  state → CONFIGURING
//!   ├─ target.before_configure()
//!   ├─ configurer.configure()  (insertion order)
//!   │  state → BUILDING
//!   ├─ target.perform_build()
//!   │  state → BUILT
//!   ▼
//! Arc<Output>
//! ```
//!
//! ## Locking
//!
//! A single re-entrant lock guards the configurer registry and every state
//! transition, and is held for the whole of `build()`. Configurer callbacks
//! run on the building thread while the lock is held, so they can call back
//! into the builder; other threads calling `apply` wait until the build ends.
//! Shared objects live in a separate concurrent map.
//!
//! ## Usage
//!
//! ```rust
//! use configured_builder::{BuildLifecycle, BuilderResult, ConfiguredBuilder, Configurer};
//! use parking_lot::Mutex;
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
//! struct CsrfConfigurer;
//!
//! impl Configurer<FilterChainTarget> for CsrfConfigurer {
//!     fn configure(&self, builder: &ConfiguredBuilder<FilterChainTarget>) -> BuilderResult<()> {
//!         builder.target().filters.lock().push("csrf".to_string());
//!         Ok(())
//!     }
//! }
//!
//! let builder = ConfiguredBuilder::new(FilterChainTarget::default());
//! builder.apply(CsrfConfigurer)?;
//! let chain = builder.build()?;
//! assert_eq!(*chain, vec!["csrf".to_string()]);
//! # Ok::<(), configured_builder::BuilderError>(())
//! ```

use super::{BuildLifecycle, Configurer, ObjectBuilder};
use crate::config::BuilderConfig;
use crate::error::{illegal_state, BuilderError, BuilderResult};
use crate::logging::{log_lifecycle_transition, log_registry_operation};
use crate::post_process::{post_process_typed, ObjectPostProcessor, QuiescentPostProcessor};
use crate::registry::{instance_id, ConfigurerRegistry, SharedObject, SharedObjects};
use crate::state_machine::BuildState;
use parking_lot::{ReentrantMutex, RwLock};
use serde::Serialize;
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, instrument, trace, warn};

type ConfigurerHandle<T> = Arc<dyn Configurer<T>>;

/// Everything guarded by the lifecycle lock
struct LifecycleState<T: BuildLifecycle> {
    state: BuildState,
    configurers: ConfigurerRegistry<dyn Configurer<T>>,
    /// Configurers whose `init` already ran during the current phase, keyed by
    /// instance identity. Holding the handle keeps the address from being reused.
    initialized: HashMap<usize, ConfigurerHandle<T>>,
}

/// Point-in-time view of a builder
#[derive(Debug, Clone, Serialize)]
pub struct BuilderStats {
    pub name: String,
    pub state: BuildState,
    pub configurers: usize,
    pub configurer_types: Vec<&'static str>,
    pub shared_objects: usize,
}

pub struct ConfiguredBuilder<T: BuildLifecycle> {
    config: BuilderConfig,
    target: T,
    lifecycle: ReentrantMutex<RefCell<LifecycleState<T>>>,
    shared_objects: SharedObjects,
    post_processor: RwLock<Arc<dyn ObjectPostProcessor>>,
    building: AtomicBool,
    object: OnceLock<Arc<T::Output>>,
}

impl<T: BuildLifecycle> ConfiguredBuilder<T> {
    /// Create a builder with default configuration and no post processing
    pub fn new(target: T) -> Self {
        Self::from_parts(
            target,
            BuilderConfig::default(),
            Arc::new(QuiescentPostProcessor),
        )
    }

    pub fn with_config(target: T, config: BuilderConfig) -> BuilderResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(
            target,
            config,
            Arc::new(QuiescentPostProcessor),
        ))
    }

    /// Create a builder that post-processes objects with `post_processor`
    pub fn with_post_processor(target: T, post_processor: Arc<dyn ObjectPostProcessor>) -> Self {
        Self::from_parts(target, BuilderConfig::default(), post_processor)
    }

    fn from_parts(
        target: T,
        config: BuilderConfig,
        post_processor: Arc<dyn ObjectPostProcessor>,
    ) -> Self {
        debug!(builder = %config.name, target = type_name::<T>(), "Creating configured builder");
        Self {
            config,
            target,
            lifecycle: ReentrantMutex::new(RefCell::new(LifecycleState {
                state: BuildState::Unbuilt,
                configurers: ConfigurerRegistry::new(),
                initialized: HashMap::new(),
            })),
            shared_objects: SharedObjects::new(),
            post_processor: RwLock::new(post_processor),
            building: AtomicBool::new(false),
            object: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// The build target configurers contribute to
    pub fn target(&self) -> &T {
        &self.target
    }

    // ----- configurer registry -------------------------------------------

    /// Apply a configurer, replacing any configurer of the exact same type.
    ///
    /// Fails with [`BuilderError::IllegalState`] once the builder is
    /// configuring or later. While the builder is initializing the
    /// configurer's `init` runs before this returns.
    ///
    /// A configurer with a [`ConfigurerAdapter`](super::ConfigurerAdapter)
    /// gets the current post processing strategy added to it.
    pub fn apply<C: Configurer<T>>(&self, configurer: C) -> BuilderResult<Arc<C>> {
        self.apply_arc(Arc::new(configurer))
    }

    /// [`apply`](Self::apply) for a configurer the caller keeps a handle to
    pub fn apply_arc<C: Configurer<T>>(&self, configurer: Arc<C>) -> BuilderResult<Arc<C>> {
        let _scope = self.lifecycle.lock();
        let handle: ConfigurerHandle<T> = configurer.clone();

        let outcome = self.with_state(|lifecycle| {
            if lifecycle.state.is_configured() {
                return Err(lifecycle.state);
            }
            let replaced = lifecycle
                .configurers
                .insert(Arc::clone(&configurer), Arc::clone(&handle));
            Ok((lifecycle.state, replaced.is_some()))
        });

        let state = match outcome {
            Ok((state, replaced)) => {
                if let Some(adapter) = Configurer::<T>::adapter(&*configurer) {
                    adapter.attach_builder_post_processor(self.current_post_processor());
                }
                log_registry_operation(
                    &self.config.name,
                    "apply",
                    type_name::<C>(),
                    state,
                    replaced.then_some("replaced configurer of the same type"),
                );
                state
            }
            Err(state) => {
                warn!(
                    builder = %self.config.name,
                    configurer = type_name::<C>(),
                    state = %state,
                    "Rejected configurer applied to already configured builder"
                );
                return Err(illegal_state(format!("apply {}", type_name::<C>()), state));
            }
        };

        if state.is_initializing() {
            self.init_configurer(&handle)?;
        }

        Ok(configurer)
    }

    /// The configurer registered for exactly `C`
    pub fn get_configurer<C: Configurer<T>>(&self) -> Option<Arc<C>> {
        self.with_state(|lifecycle| lifecycle.configurers.get::<C>())
    }

    /// Remove and return the configurer registered for exactly `C`
    pub fn remove_configurer<C: Configurer<T>>(&self) -> Option<Arc<C>> {
        let (removed, state) = self.with_state(|lifecycle| {
            (lifecycle.configurers.remove::<C>(), lifecycle.state)
        });

        if removed.is_some() {
            log_registry_operation(&self.config.name, "remove", type_name::<C>(), state, None);
        }
        removed
    }

    pub fn configurer_count(&self) -> usize {
        self.with_state(|lifecycle| lifecycle.configurers.len())
    }

    /// Names of the registered configurer types in insertion order
    pub fn configurer_type_names(&self) -> Vec<&'static str> {
        self.with_state(|lifecycle| lifecycle.configurers.type_names())
    }

    // ----- shared objects ------------------------------------------------

    /// Share `value` with every configurer, keyed by its exact type
    pub fn set_shared_object<V>(&self, value: V)
    where
        V: Any + Send + Sync,
    {
        self.shared_objects.set(value);
    }

    pub fn set_shared_arc<V>(&self, value: Arc<V>)
    where
        V: Any + Send + Sync,
    {
        self.shared_objects.set_arc(value);
    }

    pub fn get_shared_object<V>(&self) -> Option<Arc<V>>
    where
        V: Any + Send + Sync,
    {
        self.shared_objects.get::<V>()
    }

    /// Read-only copy of all shared objects
    pub fn shared_objects(&self) -> HashMap<TypeId, SharedObject> {
        self.shared_objects.snapshot()
    }

    // ----- post processing -----------------------------------------------

    /// Replace the post processing strategy
    pub fn object_post_processor(&self, post_processor: Arc<dyn ObjectPostProcessor>) -> &Self {
        debug!(
            builder = %self.config.name,
            post_processor = post_processor.name(),
            "Replacing object post processor"
        );
        *self.post_processor.write() = post_processor;
        self
    }

    /// Run `object` through the post processing strategy.
    ///
    /// The strategy may replace the object but must keep its type.
    pub fn post_process<P>(&self, object: P) -> BuilderResult<P>
    where
        P: Any + Send,
    {
        post_process_typed(self.current_post_processor().as_ref(), object)
    }

    /// The strategy currently in effect
    pub fn current_post_processor(&self) -> Arc<dyn ObjectPostProcessor> {
        Arc::clone(&*self.post_processor.read())
    }

    // ----- lifecycle -----------------------------------------------------

    pub fn build_state(&self) -> BuildState {
        self.with_state(|lifecycle| lifecycle.state)
    }

    pub fn is_built(&self) -> bool {
        self.object.get().is_some()
    }

    /// Build the object.
    ///
    /// Only one build may be attempted. Any error from a hook or configurer
    /// aborts the build and is returned unchanged; the builder stays in the
    /// state reached when the error occurred.
    #[instrument(skip(self), fields(builder = %self.config.name))]
    pub fn build(&self) -> BuilderResult<Arc<T::Output>> {
        if self
            .building
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Build requested on a builder that was already built");
            return Err(BuilderError::AlreadyBuilt);
        }

        info!(configurers = self.configurer_count(), "Starting build");

        match self.do_build() {
            Ok(object) => {
                let object = Arc::clone(self.object.get_or_init(|| Arc::new(object)));
                info!("Build complete");
                Ok(object)
            }
            Err(error) => {
                warn!(state = %self.build_state(), error = %error, "Build aborted");
                Err(error)
            }
        }
    }

    /// The object produced by a successful build
    pub fn get_object(&self) -> BuilderResult<Arc<T::Output>> {
        self.object.get().cloned().ok_or(BuilderError::NotBuilt)
    }

    pub fn stats(&self) -> BuilderStats {
        let (state, configurers, configurer_types) = self.with_state(|lifecycle| {
            (
                lifecycle.state,
                lifecycle.configurers.len(),
                lifecycle.configurers.type_names(),
            )
        });

        BuilderStats {
            name: self.config.name.clone(),
            state,
            configurers,
            configurer_types,
            shared_objects: self.shared_objects.len(),
        }
    }

    fn do_build(&self) -> BuilderResult<T::Output> {
        let _scope = self.lifecycle.lock();

        self.transition(BuildState::Initializing);
        self.target.before_init(self)?;
        self.init_configurers()?;

        self.transition(BuildState::Configuring);
        self.target.before_configure(self)?;
        self.configure_configurers()?;

        self.transition(BuildState::Building);
        let result = self.target.perform_build(self)?;

        self.transition(BuildState::Built);
        Ok(result)
    }

    /// Run `init` on every configurer present at any point of the phase.
    ///
    /// Configurers applied while this runs are initialized by `apply`
    /// itself; the identity set stops the snapshot from initializing them a
    /// second time.
    fn init_configurers(&self) -> BuilderResult<()> {
        let snapshot = self.with_state(|lifecycle| lifecycle.configurers.handles());

        for configurer in &snapshot {
            self.init_configurer(configurer)?;
        }

        let initialized =
            self.with_state(|lifecycle| std::mem::take(&mut lifecycle.initialized).len());
        debug!(builder = %self.config.name, initialized, "Configurers initialized");
        Ok(())
    }

    fn init_configurer(&self, configurer: &ConfigurerHandle<T>) -> BuilderResult<()> {
        let first_init = self.with_state(|lifecycle| {
            lifecycle
                .initialized
                .insert(instance_id(configurer), Arc::clone(configurer))
                .is_none()
        });

        if !first_init {
            return Ok(());
        }

        if self.config.trace_callbacks {
            trace!(builder = %self.config.name, configurer = configurer.name(), "init");
        }
        configurer.init(self)
    }

    fn configure_configurers(&self) -> BuilderResult<()> {
        let snapshot = self.with_state(|lifecycle| lifecycle.configurers.handles());

        for configurer in &snapshot {
            if self.config.trace_callbacks {
                trace!(builder = %self.config.name, configurer = configurer.name(), "configure");
            }
            configurer.configure(self)?;
        }
        Ok(())
    }

    fn transition(&self, to: BuildState) {
        let from = self.with_state(|lifecycle| std::mem::replace(&mut lifecycle.state, to));
        debug_assert!(to > from, "build state regressed from {from} to {to}");
        log_lifecycle_transition(&self.config.name, from, to);
    }

    /// Borrow the guarded state for the duration of `f`.
    ///
    /// `f` must not call back into configurers or the build target.
    fn with_state<R>(&self, f: impl FnOnce(&mut LifecycleState<T>) -> R) -> R {
        let guard = self.lifecycle.lock();
        let mut lifecycle = guard.borrow_mut();
        f(&mut lifecycle)
    }
}

impl<T: BuildLifecycle> ObjectBuilder for ConfiguredBuilder<T> {
    type Output = T::Output;

    fn build(&self) -> BuilderResult<Arc<T::Output>> {
        ConfiguredBuilder::build(self)
    }

    fn get_object(&self) -> BuilderResult<Arc<T::Output>> {
        ConfiguredBuilder::get_object(self)
    }
}

impl<T: BuildLifecycle> std::fmt::Debug for ConfiguredBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredBuilder")
            .field("name", &self.config.name)
            .field("state", &self.build_state())
            .field("configurers", &self.configurer_type_names())
            .field("shared_objects", &self.shared_objects)
            .finish_non_exhaustive()
    }
}
