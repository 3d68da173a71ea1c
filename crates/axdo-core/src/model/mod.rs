/*!
Element Model: entity types, invariants, pruning, flattening, ref
generation, diff, and snapshotting (spec §4.1, §3).
*/

mod element;
mod filter;
mod flatten;
mod prune;
mod refs;
mod snapshot;
mod web;
mod window;

#[cfg(test)]
mod proptests;

pub use element::{Element, ElementSummary, FlatElement, PreorderIter};
pub use filter::{filter_by_bounds, filter_by_focused, filter_by_roles, filter_by_text, filter_visible};
pub(crate) use filter::text_matches;
pub use flatten::{diff, flatten, DiffOptions, DiffRecord};
pub(crate) use flatten::role_label;
pub use prune::{prune_empty_groups, prune_empty_groups_flat};
pub use refs::{assign_ids, assign_refs, finalize_read};
pub use snapshot::ElementSnapshot;
pub use web::has_web_content;
pub use window::Window;
