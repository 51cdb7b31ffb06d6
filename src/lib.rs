//! beorders - Purchase order service with scope-based ownership.
//!
//! Orders are served on an admin tree and a public tree. Every request is
//! narrowed to a visibility scope derived from the caller's role and the
//! tree it used; reads and writes outside that scope behave as if the
//! order did not exist.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
