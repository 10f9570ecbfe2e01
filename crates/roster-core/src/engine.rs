//! The search engine: tenant validation, store reads, facet discovery and
//! column projection.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
  Error, Result,
  columns::ColumnPolicy,
  facets::{self, AvailableFilters},
  filter::{Page, PersonFilter},
  person::Column,
  store::PeopleStore,
};

/// A projected page of people plus the totals and facets that accompany it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
  /// Each record reduced to the tenant's visible columns.
  pub people:            Vec<Map<String, Value>>,
  /// Matches across all pages. Counted separately from the page, so the two
  /// may disagree under concurrent writes.
  pub total_count:       u64,
  pub available_filters: AvailableFilters,
}

/// Orchestrates searches over a [`PeopleStore`].
///
/// Cloning is cheap; both the store and the policy are shared.
pub struct SearchEngine<S> {
  store:   Arc<S>,
  columns: Arc<ColumnPolicy>,
}

impl<S> Clone for SearchEngine<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), columns: Arc::clone(&self.columns) }
  }
}

impl<S: PeopleStore> SearchEngine<S> {
  pub fn new(store: Arc<S>, columns: Arc<ColumnPolicy>) -> Self {
    Self { store, columns }
  }

  pub fn store(&self) -> &S { &self.store }

  /// Visible columns for `tenant_id`.
  pub fn columns(&self, tenant_id: &str) -> &[Column] {
    self.columns.columns(tenant_id)
  }

  /// Run `filter` for `tenant_id` and return one projected page.
  ///
  /// Fails with [`Error::MissingTenant`] before any store access when the
  /// tenant id is empty.
  pub async fn search(
    &self,
    tenant_id: &str,
    filter: &PersonFilter,
    page: Page,
  ) -> Result<SearchResult> {
    let tenant_id = require_tenant(tenant_id)?;

    let total_count = self
      .store
      .count(tenant_id, filter)
      .await
      .map_err(Error::store)?;
    let rows = self
      .store
      .fetch_page(tenant_id, filter, page)
      .await
      .map_err(Error::store)?;
    let available_filters =
      facets::available_filters(self.store.as_ref(), tenant_id).await?;

    let visible = self.columns(tenant_id);
    let people = rows.iter().map(|p| p.project(visible)).collect::<Vec<_>>();

    tracing::debug!(
      tenant = tenant_id,
      total_count,
      returned = people.len(),
      limit = page.limit,
      offset = page.offset,
      "search complete"
    );

    Ok(SearchResult { people, total_count, available_filters })
  }

  /// Facets for `tenant_id`, independent of any search filters.
  pub async fn available_filters(
    &self,
    tenant_id: &str,
  ) -> Result<AvailableFilters> {
    let tenant_id = require_tenant(tenant_id)?;
    facets::available_filters(self.store.as_ref(), tenant_id).await
  }
}

fn require_tenant(tenant_id: &str) -> Result<&str> {
  let trimmed = tenant_id.trim();
  if trimmed.is_empty() {
    return Err(Error::MissingTenant);
  }
  Ok(trimmed)
}
