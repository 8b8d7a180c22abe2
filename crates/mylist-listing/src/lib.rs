//! MyList Listing
//!
//! Renders a user's stored entries into a `DisplayDocument`:
//! - No filter: grouped by category, in the declared category order
//! - Filter: one `title | category | status` line per row, in store order
//! - Another user's list: prefixed with their display name

mod document;
mod engine;

pub use document::{DisplayDocument, FormField, SelectOption, Visibility, Widget};
pub use engine::{group_by_category, ListQueryEngine};
