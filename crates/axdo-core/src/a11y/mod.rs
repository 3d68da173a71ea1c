/*! Accessibility vocabulary: role tags, meta-roles, and action tags. */

mod action;
mod role;

pub use action::ActionTag;
pub use role::{expand_roles, RoleFilterTag, RoleTag, INTERACTIVE_ROLES, TEXT_ROLES};
