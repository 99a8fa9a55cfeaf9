//! Domain logic for the Marro agency backend.
//!
//! This crate performs no I/O of its own. It holds the project lifecycle
//! vocabulary, the default timeline generator, the backfill pass that gives
//! every project a timeline, and the [`store::TimelineStore`] seam that the
//! database and cache tiers implement.

pub mod backfill;
pub mod error;
pub mod lifecycle;
pub mod portal;
pub mod store;
pub mod timeline;
pub mod types;
