use super::{ErasedObject, ObjectPostProcessor};
use crate::error::BuilderResult;
use std::sync::Arc;
use tracing::trace;

/// Chains several post-processors.
///
/// Processors run in ascending [`ObjectPostProcessor::order`]; processors with
/// equal order keep the order they were added in. Each one receives the
/// previous one's output.
#[derive(Default, Clone)]
pub struct CompositeObjectPostProcessor {
    processors: Vec<Arc<dyn ObjectPostProcessor>>,
}

impl CompositeObjectPostProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_processor(mut self, processor: Arc<dyn ObjectPostProcessor>) -> Self {
        self.add_processor(processor);
        self
    }

    pub fn add_processor(&mut self, processor: Arc<dyn ObjectPostProcessor>) {
        self.processors.push(processor);
        // sort_by_key is stable
        self.processors.sort_by_key(|p| p.order());
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn processor_names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }
}

impl ObjectPostProcessor for CompositeObjectPostProcessor {
    fn post_process(&self, object: ErasedObject) -> BuilderResult<ErasedObject> {
        self.processors.iter().try_fold(object, |current, processor| {
            trace!(processor = processor.name(), "Running composite post processor");
            processor.post_process(current)
        })
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}

impl std::fmt::Debug for CompositeObjectPostProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeObjectPostProcessor")
            .field("processors", &self.processor_names())
            .finish()
    }
}
