//! Enumeration types for the Reservoir economy.
//!
//! Every selector the host can send (capacity tier, routing policy,
//! extraction method, storage pool) is a closed enum. Parsing from the
//! host's string form goes through [`core::str::FromStr`] and fails with
//! [`ParseSelectorError`] rather than falling back to a default.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An unrecognised selector string received from the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind}: {value:?}")]
pub struct ParseSelectorError {
    /// Which selector was being parsed (e.g. "capacity tier").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseSelectorError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Capacity tier
// ---------------------------------------------------------------------------

/// Base capacity class of a character.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum CapacityTier {
    /// Smallest base capacity.
    Small,
    /// Default base capacity.
    #[default]
    Medium,
    /// Largest base capacity.
    Large,
}

impl CapacityTier {
    /// Lowercase label used in messages and host selectors.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl core::fmt::Display for CapacityTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl core::str::FromStr for CapacityTier {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(ParseSelectorError::new("capacity tier", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage pools and routing
// ---------------------------------------------------------------------------

/// One of the two shared storage pools.
///
/// Both pools live in the global store scope and are visible to every
/// character bound to the same store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Pool {
    /// Primary pool; the default routing destination.
    A,
    /// Secondary pool.
    B,
}

impl Pool {
    /// Label used in messages and host selectors.
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "pool A",
            Self::B => "pool B",
        }
    }
}

impl core::fmt::Display for Pool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl core::str::FromStr for Pool {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "pool_a" | "poola" | "global" => Ok(Self::A),
            "b" | "pool_b" | "poolb" | "personal" => Ok(Self::B),
            _ => Err(ParseSelectorError::new("pool", s)),
        }
    }
}

/// Where extracted resource goes for methods that store their yield.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum RoutingPolicy {
    /// Credit [`Pool::A`].
    #[default]
    PoolA,
    /// Credit [`Pool::B`].
    PoolB,
    /// Throw the extracted amount away.
    Discard,
}

impl RoutingPolicy {
    /// The pool this policy credits, or `None` when it discards.
    pub const fn pool(self) -> Option<Pool> {
        match self {
            Self::PoolA => Some(Pool::A),
            Self::PoolB => Some(Pool::B),
            Self::Discard => None,
        }
    }

    /// Label used in messages and host selectors.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PoolA => "pool A",
            Self::PoolB => "pool B",
            Self::Discard => "discard",
        }
    }
}

impl From<Pool> for RoutingPolicy {
    fn from(pool: Pool) -> Self {
        match pool {
            Pool::A => Self::PoolA,
            Pool::B => Self::PoolB,
        }
    }
}

impl core::fmt::Display for RoutingPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl core::str::FromStr for RoutingPolicy {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" | "waste" => Ok(Self::Discard),
            other => match other.parse::<Pool>() {
                Ok(pool) => Ok(Self::from(pool)),
                Err(_) => Err(ParseSelectorError::new("routing policy", s)),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// How resource is extracted from a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ExtractionMethod {
    /// By hand: small batches, stored per routing policy.
    Manual,
    /// Direct consumption: never stored, highest experience per unit.
    Direct,
    /// Machine-assisted: large batches, lowest experience per unit.
    Mechanical,
}

impl ExtractionMethod {
    /// All methods, in panel order.
    pub const ALL: [Self; 3] = [Self::Manual, Self::Direct, Self::Mechanical];

    /// Lowercase label used in messages and host selectors.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Direct => "direct",
            Self::Mechanical => "mechanical",
        }
    }
}

impl core::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl core::str::FromStr for ExtractionMethod {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" | "hands" => Ok(Self::Manual),
            "direct" => Ok(Self::Direct),
            "mechanical" | "machine" => Ok(Self::Mechanical),
            _ => Err(ParseSelectorError::new("extraction method", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Overflow warnings
// ---------------------------------------------------------------------------

/// Escalating overflow warning raised while a character sits at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum WarningLevel {
    /// First tick at capacity.
    Discomfort,
    /// Sustained overflow.
    Pain,
    /// Severe overflow; repeats every tick.
    SeverePain,
}
