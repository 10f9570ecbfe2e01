//! The `PeopleStore` trait, the read-only boundary to the backing store.
//!
//! Implemented by storage backends (e.g. `roster-store-sqlite`). The search
//! engine depends on this abstraction only. Every method is a single read;
//! no transaction spans calls, so a count and a page fetched back to back may
//! disagree under concurrent writes.

use std::future::Future;

use crate::{
  filter::{Page, PersonFilter},
  person::Person,
};

/// A filterable field whose distinct values can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetField {
  Status,
  Location,
  Company,
  Department,
  Position,
}

impl FacetField {
  /// The store column holding this field.
  pub fn column_name(self) -> &'static str {
    match self {
      Self::Status => "status",
      Self::Location => "location",
      Self::Company => "company",
      Self::Department => "department",
      Self::Position => "position",
    }
  }
}

/// Abstraction over a people store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PeopleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Number of people in `tenant_id` matching `filter`.
  fn count<'a>(
    &'a self,
    tenant_id: &'a str,
    filter: &'a PersonFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// One page of people in `tenant_id` matching `filter`, ordered by first
  /// name then last name ascending. An offset past the end yields an empty
  /// page.
  fn fetch_page<'a>(
    &'a self,
    tenant_id: &'a str,
    filter: &'a PersonFilter,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Distinct values of `field` within `tenant_id`, ascending, truncated to
  /// `limit` when given.
  fn distinct_values<'a>(
    &'a self,
    tenant_id: &'a str,
    field: FacetField,
    limit: Option<u32>,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;
}
