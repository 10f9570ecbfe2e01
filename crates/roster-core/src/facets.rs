//! Facet discovery: the filter choices available to a tenant.
//!
//! Facets are tenant-global. They are computed from every record the tenant
//! owns and do not narrow as search filters are applied.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  store::{FacetField, PeopleStore},
};

/// Only the first positions alphabetically are offered; the field is free
/// text and can be large.
pub const POSITION_FACET_LIMIT: u32 = 20;

/// Distinct values per filterable field, each list ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableFilters {
  pub status:      Vec<String>,
  pub locations:   Vec<String>,
  pub companies:   Vec<String>,
  pub departments: Vec<String>,
  pub positions:   Vec<String>,
}

/// Read every facet for `tenant_id` from `store`.
pub async fn available_filters<S>(
  store: &S,
  tenant_id: &str,
) -> Result<AvailableFilters>
where
  S: PeopleStore,
{
  let distinct = |field: FacetField, limit: Option<u32>| async move {
    store
      .distinct_values(tenant_id, field, limit)
      .await
      .map_err(Error::store)
  };

  Ok(AvailableFilters {
    status:      distinct(FacetField::Status, None).await?,
    locations:   distinct(FacetField::Location, None).await?,
    companies:   distinct(FacetField::Company, None).await?,
    departments: distinct(FacetField::Department, None).await?,
    positions:   distinct(FacetField::Position, Some(POSITION_FACET_LIMIT))
      .await?,
  })
}
