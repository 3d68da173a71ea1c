/*! Branded ID types for type-safe entity references. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Element identifier. Sequential within one read; 1-based pre-order
/// position (spec §3.1). Not stable across reads — see [`Ref`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From, Into,
)]
pub struct ElementId(pub u32);

/// Process identifier, as reported by the platform adapter.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
pub struct ProcessId(pub u32);

/// Window identifier, as reported by the platform adapter.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
pub struct WindowId(pub u32);

/// A short, deterministic, advisory identifier for a logical element
/// (spec §3.3). Stable across reads of an unchanged tree with high
/// probability; resolution by `Ref` falls back to text when it misses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
pub struct Ref(pub String);

impl Ref {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}
