/*! Core scalar types shared across the engine. */

mod error;
mod geometry;
mod ids;
mod scope;

pub use error::{Candidate, CoreError, CoreResult, ResolutionError};
pub use geometry::{Bounds, Point};
pub use ids::{ElementId, ProcessId, Ref, WindowId};
pub use scope::Scope;
