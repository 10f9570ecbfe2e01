//! Handler for `GET /search`.
//!
//! Filter keys may repeat: `?status=active&status=not_started` selects either
//! status. `query` and `position` are scalar; the last occurrence wins.
//! Unrecognised keys are ignored.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use roster_core::{
  facets::AvailableFilters,
  filter::{FilterValue, Page, PersonFilter, non_empty},
  person::Column,
  store::PeopleStore,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{AppState, error::ApiError, identity::Admitted};

/// A fully validated search request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
  pub filter: PersonFilter,
  pub page:   Page,
}

impl SearchParams {
  /// Fold raw query pairs into a typed filter and page.
  pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, ApiError> {
    let mut filter = PersonFilter::default();
    let mut status = Vec::new();
    let mut department = Vec::new();
    let mut location = Vec::new();
    let mut company = Vec::new();
    let mut limit = None;
    let mut offset = None;

    for (key, value) in pairs {
      if value.is_empty() {
        continue;
      }
      match key.as_str() {
        "query" => filter.query = non_empty(value),
        "position" => filter.position = non_empty(value),
        "status" => status.push(value.parse()?),
        "department" => department.push(value.parse()?),
        "location" => location.push(value.parse()?),
        "company" => company.push(value.parse()?),
        "limit" => limit = Some(parse_int("limit", &value)?),
        "offset" => offset = Some(parse_int("offset", &value)?),
        _ => {}
      }
    }

    filter.status = FilterValue::from_values(status);
    filter.department = FilterValue::from_values(department);
    filter.location = FilterValue::from_values(location);
    filter.company = FilterValue::from_values(company);

    Ok(Self { filter, page: Page::new(limit, offset)? })
  }
}

fn parse_int(name: &str, value: &str) -> Result<i64, ApiError> {
  value.trim().parse().map_err(|_| {
    ApiError::InvalidParameter(format!("{name} must be an integer, got {value:?}"))
  })
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
  pub people:            Vec<Map<String, Value>>,
  pub total_count:       u64,
  pub limit:             u32,
  pub offset:            u64,
  /// The tenant's visible columns, in policy order.
  pub columns:           Vec<Column>,
  pub available_filters: AvailableFilters,
}

/// `GET /search[?query=...][&status=...]*[&department=...]*[&location=...]*[&company=...]*[&position=...][&limit=...][&offset=...]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Admitted(identity): Admitted,
  query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError>
where
  S: PeopleStore + Clone + Send + Sync + 'static,
{
  let Query(pairs) = query?;
  let SearchParams { filter, page } = SearchParams::from_pairs(pairs)?;
  let tenant = identity.tenant_id.as_str();

  let result = state.engine.search(tenant, &filter, page).await?;

  Ok(Json(SearchResponse {
    people:            result.people,
    total_count:       result.total_count,
    limit:             page.limit,
    offset:            page.offset,
    columns:           state.engine.columns(tenant).to_vec(),
    available_filters: result.available_filters,
  }))
}

#[cfg(test)]
mod tests {
  use roster_core::person::{Department, Location, Status};

  use super::*;

  fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw
      .iter()
      .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
      .collect()
  }

  #[test]
  fn no_params_is_unfiltered_default_page() {
    assert_eq!(SearchParams::from_pairs(vec![]).unwrap(), SearchParams::default());
  }

  #[test]
  fn repeated_keys_become_many() {
    let p = SearchParams::from_pairs(pairs(&[
      ("status", "active"),
      ("department", "engineering"),
      ("status", "not_started"),
    ]))
    .unwrap();
    assert_eq!(
      p.filter.status,
      Some(FilterValue::Many(vec![Status::Active, Status::NotStarted]))
    );
    assert_eq!(
      p.filter.department,
      Some(FilterValue::Single(Department::Engineering))
    );
    assert_eq!(p.filter.location, None);
  }

  #[test]
  fn scalars_take_last_occurrence_and_blanks_are_ignored() {
    let p = SearchParams::from_pairs(pairs(&[
      ("position", "Lead"),
      ("position", "Architect"),
      ("query", ""),
      ("location", ""),
      ("location", "tokyo"),
      ("limit", "10"),
      ("offset", "20"),
      ("sort", "ignored"),
    ]))
    .unwrap();
    assert_eq!(p.filter.position.as_deref(), Some("Architect"));
    assert_eq!(p.filter.query, None);
    assert_eq!(p.filter.location, Some(FilterValue::Single(Location::Tokyo)));
    assert_eq!(p.page, Page { limit: 10, offset: 20 });
  }

  #[test]
  fn rejects_bad_values() {
    for bad in [
      &[("status", "retired")][..],
      &[("location", "mars")][..],
      &[("limit", "0")][..],
      &[("limit", "1001")][..],
      &[("limit", "ten")][..],
      &[("offset", "-1")][..],
    ] {
      assert!(
        matches!(
          SearchParams::from_pairs(pairs(bad)),
          Err(ApiError::InvalidParameter(_))
        ),
        "{bad:?}"
      );
    }
  }
}
