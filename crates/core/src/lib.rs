//! Seedbed core data models.
//!
//! This crate defines the fixture contract and the ordering metadata the
//! registry and resolver operate on. It is a leaf crate: nothing here
//! depends on ordering logic.

#![warn(missing_docs)]

mod fixture;
mod meta;

pub use fixture::Fixture;
pub use meta::{FixtureMeta, DEFAULT_GROUP};
