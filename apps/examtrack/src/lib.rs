//! # examtrack (app library)
//!
//! The application side of examtrack: CLI surface, the JSON store file,
//! and the feedback copy shown when a stage resolves.
//!
//! All rules live in `examtrack-core`; this crate only does I/O and
//! presentation.

pub mod cli;
pub mod feedback;
pub mod store;
