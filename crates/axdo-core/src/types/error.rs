/*! Error types for the core engine (spec §7). */

use crate::a11y::RoleTag;
use crate::model::ElementSummary;
use crate::types::ElementId;

/// The seven error kinds from spec §7.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
  /// The adapter does not provide the requested interface.
  #[error("capability not supported by this platform adapter: {0}")]
  UnsupportedCapability(&'static str),

  /// No app/window/pid given and the action requires one.
  #[error("no scope given for an action that requires one")]
  ScopeMissing,

  /// No match, or more than one match survived disambiguation.
  #[error(transparent)]
  Resolution(#[from] ResolutionError),

  /// The adapter's synthesis/perform/set call failed.
  #[error("execution failed: {0}")]
  Execution(String),

  /// A wait or assert condition never became true within its timeout.
  #[error("timed out waiting for condition")]
  WaitTimeout {
    /// Last observed tree state, for callers that want to inspect it.
    last_observed: Option<Vec<ElementSummary>>,
  },

  /// Malformed batch program; aborts before any action runs.
  #[error("failed to parse batch program: {0}")]
  Parse(String),
}

/// Resolution-specific failure (spec §4.3 step f, §7 kind 3).
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
  /// Nothing matched the query.
  #[error("no element matched {query:?}")]
  NoMatch { query: String },

  /// More than one candidate survived the disambiguation ladder.
  #[error(
    "ambiguous match for {query:?}: {} candidates ({candidates:?}); retry with a tighter `roles` or a direct `id`",
    candidates.len()
  )]
  Ambiguous {
    query: String,
    candidates: Vec<Candidate>,
  },

  /// Neither `by_id`, `by_ref`, nor `by_text` was given.
  #[error("no targeting specified")]
  NoTargetingSpecified,
}

/// One disambiguation candidate, as surfaced in an ambiguous-match error.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
  pub id: ElementId,
  pub role: RoleTag,
  pub title: String,
  pub description: String,
}

/// Result type for core engine operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ambiguous_error_names_candidates() {
    let err = ResolutionError::Ambiguous {
      query: "Subject".into(),
      candidates: vec![Candidate {
        id: ElementId(1),
        role: RoleTag::Input,
        title: String::new(),
        description: "Subject".into(),
      }],
    };
    let msg = err.to_string();
    assert!(msg.contains("ambiguous"));
    assert!(msg.contains("Subject"));
  }
}
