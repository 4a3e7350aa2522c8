//! Trestle - dependency graph and critical-path analysis for work items.
//!
//! This crate owns the blocking topology of a work-item tracker: which items
//! block which, whether the graph stays acyclic, what the longest unresolved
//! dependency chain is, and which items are in everyone's way. Item CRUD,
//! workflow transitions, and presentation live in other crates; trestle only
//! references items by opaque id and resolves display metadata through the
//! [`lookup::ItemLookup`] boundary.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod domain;
pub mod engine;
pub mod error;
pub mod lookup;
