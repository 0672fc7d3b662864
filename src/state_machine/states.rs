use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a configured builder.
///
/// States only ever advance in declaration order; the derived `Ord` follows
/// that order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    /// Before `build()` is invoked
    #[default]
    Unbuilt,
    /// From the start of `build()` until every configurer's `init` has run
    Initializing,
    /// From after all `init` calls until every configurer's `configure` has run
    Configuring,
    /// From after all `configure` calls until `perform_build` returns
    Building,
    /// After the object has been completely built
    Built,
}

impl BuildState {
    pub fn order(&self) -> u8 {
        match self {
            Self::Unbuilt => 0,
            Self::Initializing => 1,
            Self::Configuring => 2,
            Self::Building => 3,
            Self::Built => 4,
        }
    }

    /// True only while configurers are being initialized
    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    /// True for CONFIGURING or any later state
    pub fn is_configured(&self) -> bool {
        self.order() >= Self::Configuring.order()
    }

    /// Linear successor, `None` once built
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Unbuilt => Some(Self::Initializing),
            Self::Initializing => Some(Self::Configuring),
            Self::Configuring => Some(Self::Building),
            Self::Building => Some(Self::Built),
            Self::Built => None,
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbuilt => write!(f, "unbuilt"),
            Self::Initializing => write!(f, "initializing"),
            Self::Configuring => write!(f, "configuring"),
            Self::Building => write!(f, "building"),
            Self::Built => write!(f, "built"),
        }
    }
}

impl std::str::FromStr for BuildState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unbuilt" => Ok(Self::Unbuilt),
            "initializing" => Ok(Self::Initializing),
            "configuring" => Ok(Self::Configuring),
            "building" => Ok(Self::Building),
            "built" => Ok(Self::Built),
            _ => Err(format!("Invalid build state: {s}")),
        }
    }
}
