//! Core types for the roster search service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! holds the person model, filter requests, tenant column policy, the rate
//! limiter, and the search engine that runs over any [`store::PeopleStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod columns;
pub mod engine;
pub mod error;
pub mod facets;
pub mod filter;
pub mod person;
pub mod ratelimit;
pub mod store;

pub use error::{Error, Result};
