//! Place aggregation and ranking: vote tallies, comment threads, list and
//! detail views, sorting, filtering, pagination and mutation guards.
//!
//! Everything here is pure; storage and transport live in `visit-db` and
//! `visit-api`.

pub mod authorize;
pub mod comments;
pub mod country;
pub mod error;
pub mod hierarchy;
pub mod id;
pub mod page;
pub mod sort;
pub mod tally;
pub mod view;

pub use error::{Error, ErrorKind, Result};
