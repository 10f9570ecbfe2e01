//! Per-tenant column visibility.
//!
//! A [`ColumnPolicy`] is plain configuration. It is constructed once (from
//! the server config or [`ColumnPolicy::default`]) and injected wherever it
//! is needed; there is no global table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::person::Column;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPolicy {
  /// Columns for any tenant without an entry in `tenants`.
  #[serde(default = "ColumnPolicy::default_columns")]
  pub default: Vec<Column>,
  #[serde(default)]
  pub tenants: HashMap<String, Vec<Column>>,
}

impl ColumnPolicy {
  pub fn new(default: Vec<Column>) -> Self {
    Self { default, tenants: HashMap::new() }
  }

  pub fn with_tenant(
    mut self,
    tenant_id: impl Into<String>,
    columns: Vec<Column>,
  ) -> Self {
    self.tenants.insert(tenant_id.into(), columns);
    self
  }

  /// Visible columns for `tenant_id`. Never fails: unknown tenants get the
  /// default list.
  pub fn columns(&self, tenant_id: &str) -> &[Column] {
    self
      .tenants
      .get(tenant_id)
      .map(Vec::as_slice)
      .unwrap_or(&self.default)
  }

  pub fn default_columns() -> Vec<Column> {
    use Column::*;
    vec![
      FirstName, LastName, Email, Status, Department, Location, Company,
      Position,
    ]
  }
}

impl Default for ColumnPolicy {
  fn default() -> Self {
    use Column::*;
    Self::new(Self::default_columns())
      .with_tenant("org_1", vec![
        FirstName, LastName, Email, Status, Department, Location, Company,
        Position, Phone, HireDate,
      ])
      .with_tenant("org_2", vec![
        FirstName, LastName, Status, Department, Position, HireDate,
      ])
      .with_tenant("org_3", vec![FirstName, LastName, Email, Status, Position])
  }
}
