//! # Object Post-Processing
//!
//! Strategies that may transform a freshly constructed object before it is
//! considered final.
//!
//! Post-processors work on type-erased objects so that a single strategy can
//! be handed every kind of object a build produces. The builder restores the
//! concrete type afterwards and rejects strategies that change it.
//!
//! ## Available Strategies
//!
//! - **QuiescentPostProcessor**: passthrough, the builder default
//! - **TypedPostProcessor**: transforms objects of one exact type, passes the rest through
//! - **CompositeObjectPostProcessor**: ordered chain of strategies

pub mod composite;
pub mod typed;

pub use composite::CompositeObjectPostProcessor;
pub use typed::{typed_post_processor, TypedPostProcessor};

use crate::error::{invalid_argument, BuilderResult};
use std::any::{type_name, Any};

/// A type-erased object travelling through post-processing
pub type ErasedObject = Box<dyn Any + Send>;

/// Strategy applied to objects created during a build
pub trait ObjectPostProcessor: Send + Sync {
    /// Return the object to use in place of `object`, possibly the same one
    fn post_process(&self, object: ErasedObject) -> BuilderResult<ErasedObject>;

    /// Position within a composite; lower runs first
    fn order(&self) -> i32 {
        0
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Run `object` through `processor` and restore its concrete type.
///
/// Fails with [`BuilderError::InvalidArgument`](crate::BuilderError::InvalidArgument)
/// when the processor returns an object of another type.
pub fn post_process_typed<P>(processor: &dyn ObjectPostProcessor, object: P) -> BuilderResult<P>
where
    P: Any + Send,
{
    let processed = processor.post_process(Box::new(object))?;

    processed.downcast::<P>().map(|boxed| *boxed).map_err(|_| {
        invalid_argument(
            "object",
            format!(
                "post processor '{}' did not return a {}",
                processor.name(),
                type_name::<P>()
            ),
        )
    })
}

/// Passthrough strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct QuiescentPostProcessor;

impl ObjectPostProcessor for QuiescentPostProcessor {
    fn post_process(&self, object: ErasedObject) -> BuilderResult<ErasedObject> {
        Ok(object)
    }

    fn name(&self) -> &'static str {
        "quiescent"
    }
}
