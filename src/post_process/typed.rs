use super::{ErasedObject, ObjectPostProcessor};
use crate::error::BuilderResult;
use std::any::{type_name, Any};
use std::marker::PhantomData;
use tracing::trace;

/// Applies a transformation to objects of exactly type `P`.
///
/// Objects of any other type pass through untouched.
pub struct TypedPostProcessor<P, F> {
    transform: F,
    order: i32,
    _object: PhantomData<fn(P) -> P>,
}

impl<P, F> TypedPostProcessor<P, F>
where
    P: Any + Send,
    F: Fn(P) -> BuilderResult<P> + Send + Sync,
{
    pub fn new(transform: F) -> Self {
        Self {
            transform,
            order: 0,
            _object: PhantomData,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl<P, F> ObjectPostProcessor for TypedPostProcessor<P, F>
where
    P: Any + Send,
    F: Fn(P) -> BuilderResult<P> + Send + Sync,
{
    fn post_process(&self, object: ErasedObject) -> BuilderResult<ErasedObject> {
        match object.downcast::<P>() {
            Ok(typed) => {
                trace!(object_type = type_name::<P>(), "Applying typed post processor");
                let processed = (self.transform)(*typed)?;
                Ok(Box::new(processed))
            }
            Err(other) => Ok(other),
        }
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn name(&self) -> &'static str {
        type_name::<P>()
    }
}

/// Shorthand for [`TypedPostProcessor::new`]
pub fn typed_post_processor<P, F>(transform: F) -> TypedPostProcessor<P, F>
where
    P: Any + Send,
    F: Fn(P) -> BuilderResult<P> + Send + Sync,
{
    TypedPostProcessor::new(transform)
}
