//! Handler for `GET /filters`.

use axum::{Json, extract::State};
use roster_core::{facets::AvailableFilters, store::PeopleStore};

use crate::{AppState, error::ApiError, identity::Admitted};

/// `GET /filters`: every filter value present for the caller's tenant.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Admitted(identity): Admitted,
) -> Result<Json<AvailableFilters>, ApiError>
where
  S: PeopleStore + Clone + Send + Sync + 'static,
{
  let filters = state.engine.available_filters(&identity.tenant_id).await?;
  Ok(Json(filters))
}
