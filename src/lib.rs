#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Configured Builder
//!
//! Builder-with-configurers core for security configuration.
//!
//! ## Overview
//!
//! A [`ConfiguredBuilder`] accumulates pluggable [`Configurer`]s and runs them
//! through an ordered lifecycle (init → configure → build) to produce a single
//! object. Independent configuration concerns (session management, login,
//! authorization, ...) register themselves without the builder knowing about
//! them ahead of time.
//!
//! ## Module Organization
//!
//! - [`builder`] - The lifecycle driver, configurer contract and build hooks
//! - [`registry`] - Exact-type configurer registry and shared objects
//! - [`state_machine`] - Build lifecycle states
//! - [`post_process`] - Object post-processing strategies
//! - [`config`] - Builder configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Key Properties
//!
//! - **Exact-type registries**: configurers and shared objects are keyed by
//!   their concrete type; hierarchies are never considered
//! - **Insertion order**: configurers are initialized and configured in the
//!   order they were first applied
//! - **Late registration**: configurers applied during initialization are
//!   initialized straight away, exactly once
//! - **No rollback**: a failing callback aborts the build and leaves the state
//!   where it failed
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod logging;
pub mod post_process;
pub mod registry;
pub mod state_machine;

pub use builder::{
    BuildLifecycle, BuilderStats, ConfiguredBuilder, Configurer, ConfigurerAdapter, ObjectBuilder,
};
pub use crate::config::BuilderConfig;
pub use error::{BuilderError, BuilderResult};
pub use post_process::{
    typed_post_processor, CompositeObjectPostProcessor, ObjectPostProcessor,
    post_process_typed, QuiescentPostProcessor, TypedPostProcessor,
};
pub use registry::{ConfigurerRegistry, SharedObject, SharedObjects};
pub use state_machine::BuildState;
