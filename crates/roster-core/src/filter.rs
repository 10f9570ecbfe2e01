//! The structured filter request and pagination bounds.

use std::slice;

use crate::{
  Error, Result,
  person::{Company, Department, Location, Status},
};

// ─── FilterValue ─────────────────────────────────────────────────────────────

/// One or more accepted values for a field. Values inside a field are
/// OR-combined; fields are AND-combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue<T> {
  Single(T),
  Many(Vec<T>),
}

impl<T> FilterValue<T> {
  /// Normalise the occurrences of a parameter: none is no restriction, one
  /// is `Single`, several are `Many` in the order supplied.
  pub fn from_values(mut values: Vec<T>) -> Option<Self> {
    match values.len() {
      0 => None,
      1 => values.pop().map(Self::Single),
      _ => Some(Self::Many(values)),
    }
  }

  pub fn values(&self) -> &[T] {
    match self {
      Self::Single(v) => slice::from_ref(v),
      Self::Many(vs) => vs,
    }
  }

  pub fn contains(&self, value: &T) -> bool
  where
    T: PartialEq,
  {
    self.values().contains(value)
  }
}

impl<T> From<T> for FilterValue<T> {
  fn from(value: T) -> Self { Self::Single(value) }
}

// ─── PersonFilter ────────────────────────────────────────────────────────────

/// Parameters for a people search, minus tenant and pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
  /// Substring matched against first name, last name, email and position.
  pub query:      Option<String>,
  pub status:     Option<FilterValue<Status>>,
  pub department: Option<FilterValue<Department>>,
  pub location:   Option<FilterValue<Location>>,
  pub company:    Option<FilterValue<Company>>,
  /// Substring match on position. Scalar only; there is no multi-valued
  /// position filter.
  pub position:   Option<String>,
}

impl PersonFilter {
  pub fn with_query(mut self, query: impl Into<String>) -> Self {
    self.query = non_empty(query.into());
    self
  }

  pub fn with_status(mut self, status: impl Into<FilterValue<Status>>) -> Self {
    self.status = Some(status.into());
    self
  }

  pub fn with_department(
    mut self,
    department: impl Into<FilterValue<Department>>,
  ) -> Self {
    self.department = Some(department.into());
    self
  }

  pub fn with_location(
    mut self,
    location: impl Into<FilterValue<Location>>,
  ) -> Self {
    self.location = Some(location.into());
    self
  }

  pub fn with_company(mut self, company: impl Into<FilterValue<Company>>) -> Self {
    self.company = Some(company.into());
    self
  }

  pub fn with_position(mut self, position: impl Into<String>) -> Self {
    self.position = non_empty(position.into());
    self
  }
}

/// Empty free-text parameters impose no restriction.
pub fn non_empty(s: String) -> Option<String> {
  if s.is_empty() { None } else { Some(s) }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// A validated limit/offset window, applied after ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub limit:  u32,
  pub offset: u64,
}

impl Page {
  pub const DEFAULT_LIMIT: u32 = 50;
  pub const MAX_LIMIT: u32 = 1000;

  /// Validate raw bounds. `limit` must lie in `1..=1000` and `offset` must
  /// not be negative; absent values take their defaults.
  pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self> {
    let limit = limit.unwrap_or(i64::from(Self::DEFAULT_LIMIT));
    if !(1..=i64::from(Self::MAX_LIMIT)).contains(&limit) {
      return Err(Error::InvalidParameter(format!(
        "limit must be between 1 and {}, got {limit}",
        Self::MAX_LIMIT
      )));
    }
    let offset = offset.unwrap_or(0);
    if offset < 0 {
      return Err(Error::InvalidParameter(format!(
        "offset must not be negative, got {offset}"
      )));
    }
    Ok(Self { limit: limit as u32, offset: offset as u64 })
  }
}

impl Default for Page {
  fn default() -> Self { Self { limit: Self::DEFAULT_LIMIT, offset: 0 } }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_values_normalises_occurrences() {
    assert_eq!(FilterValue::<Status>::from_values(vec![]), None);
    assert_eq!(
      FilterValue::from_values(vec![Status::Active]),
      Some(FilterValue::Single(Status::Active))
    );
    assert_eq!(
      FilterValue::from_values(vec![Status::Terminated, Status::Active]),
      Some(FilterValue::Many(vec![Status::Terminated, Status::Active]))
    );
  }

  #[test]
  fn values_and_contains() {
    let many = FilterValue::Many(vec![Location::Tokyo, Location::Paris]);
    assert_eq!(many.values(), &[Location::Tokyo, Location::Paris]);
    assert!(many.contains(&Location::Paris));
    assert!(!many.contains(&Location::London));
    assert_eq!(FilterValue::Single(Location::London).values().len(), 1);
  }

  #[test]
  fn empty_text_filters_are_absent() {
    let f = PersonFilter::default().with_query("").with_position("");
    assert_eq!(f, PersonFilter::default());
  }

  #[test]
  fn page_defaults() {
    assert_eq!(Page::new(None, None).unwrap(), Page { limit: 50, offset: 0 });
  }

  #[test]
  fn page_accepts_bounds() {
    assert_eq!(Page::new(Some(1), Some(0)).unwrap().limit, 1);
    assert_eq!(Page::new(Some(1000), Some(5000)).unwrap().offset, 5000);
  }

  #[test]
  fn page_rejects_out_of_range() {
    for (limit, offset) in [(Some(0), None), (Some(1001), None), (None, Some(-1))] {
      assert!(matches!(
        Page::new(limit, offset),
        Err(Error::InvalidParameter(_))
      ));
    }
  }
}
