//! Role-gated visibility and filtering for a cybercrime case desk.
//!
//! Every screen feeds the caller's [`models::Role`], a record collection and
//! its current [`visibility::FilterCriteria`] into
//! [`visibility::visible_records`], and asks [`visibility::can_mutate`] before
//! offering an edit action.

pub mod dashboard;
pub mod models;
pub mod navigation;
pub mod render;
pub mod store;
pub mod visibility;
