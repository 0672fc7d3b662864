// Build lifecycle state
//
// The configured builder walks a strictly linear state machine; no cycles and
// no cancellation path.

pub mod states;

pub use states::BuildState;
