use proptest::prelude::*;

/// Number of distinct configurer types the strategies draw from
pub const CONFIGURER_KINDS: usize = 4;

/// A single `apply` call: which configurer type, and the label it carries
#[derive(Debug, Clone)]
pub struct ApplyOp {
    pub kind: usize,
    pub label: String,
}

/// Strategy for configurer labels
pub fn label_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

/// Strategy for a single apply call
pub fn apply_op_strategy() -> impl Strategy<Value = ApplyOp> {
    (0..CONFIGURER_KINDS, label_strategy()).prop_map(|(kind, label)| ApplyOp { kind, label })
}

/// Strategy for a sequence of apply calls, repeats allowed
pub fn apply_sequence_strategy() -> impl Strategy<Value = Vec<ApplyOp>> {
    prop::collection::vec(apply_op_strategy(), 0..16)
}
