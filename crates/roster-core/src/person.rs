//! Person records and the closed vocabularies their attributes draw from.
//!
//! Records are owned by the backing store. This crate only reads them and
//! projects them into tenant-visible JSON objects.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::Error;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Declares a `snake_case` string enumeration with `as_str`, `ALL`,
/// `Display` and `FromStr`. The string form is what the store holds and what
/// clients send as filter values.
macro_rules! vocabulary {
  (
    $(#[$meta:meta])*
    $name:ident { $($variant:ident => $text:literal),+ $(,)? }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum $name {
      $(
        #[serde(rename = $text)]
        $variant,
      )+
    }

    impl $name {
      pub const ALL: &'static [Self] = &[$(Self::$variant),+];

      pub fn as_str(self) -> &'static str {
        match self {
          $(Self::$variant => $text,)+
        }
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl FromStr for $name {
      type Err = Error;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
          $($text => Ok(Self::$variant),)+
          other => Err(Error::InvalidParameter(format!(
            "unknown {} {other:?}",
            stringify!($name).to_lowercase(),
          ))),
        }
      }
    }
  };
}

vocabulary! {
  /// Employment status.
  Status {
    Active => "active",
    NotStarted => "not_started",
    Terminated => "terminated",
  }
}

vocabulary! {
  Department {
    Engineering => "engineering",
    Marketing => "marketing",
    Sales => "sales",
    Hr => "hr",
    Finance => "finance",
    Operations => "operations",
    It => "it",
    Product => "product",
    Design => "design",
  }
}

vocabulary! {
  /// Office a person works from.
  Location {
    NewYork => "new_york",
    London => "london",
    Tokyo => "tokyo",
    Berlin => "berlin",
    Singapore => "singapore",
    Paris => "paris",
    Sydney => "sydney",
    Vietnam => "vietnam",
    Mumbai => "mumbai",
  }
}

vocabulary! {
  /// Legal entity within the tenant's organisation.
  Company {
    Headquarters => "headquarters",
    Branch1 => "branch_1",
    Branch2 => "branch_2",
    Subsidiary1 => "subsidiary_1",
    Subsidiary2 => "subsidiary_2",
  }
}

vocabulary! {
  /// A projectable person attribute. The tenant id is deliberately absent:
  /// it is never exposed through a column policy.
  Column {
    Id => "id",
    FirstName => "first_name",
    LastName => "last_name",
    Email => "email",
    Status => "status",
    Department => "department",
    Location => "location",
    Company => "company",
    Position => "position",
    Phone => "phone",
    HireDate => "hire_date",
    TerminationDate => "termination_date",
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A tenant-scoped roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  /// Unique within the tenant.
  pub id:               String,
  pub tenant_id:        String,
  pub first_name:       String,
  pub last_name:        String,
  pub email:            String,
  pub status:           Status,
  pub department:       Department,
  pub location:         Location,
  pub company:          Company,
  /// Free-text job title.
  pub position:         String,
  pub phone:            Option<String>,
  pub hire_date:        Option<NaiveDate>,
  /// Expected only when `status` is [`Status::Terminated`]; not enforced.
  pub termination_date: Option<NaiveDate>,
}

impl Person {
  /// The JSON value of a single attribute. Unset optional attributes are
  /// `null`.
  pub fn value_of(&self, column: Column) -> Value {
    match column {
      Column::Id => json!(self.id),
      Column::FirstName => json!(self.first_name),
      Column::LastName => json!(self.last_name),
      Column::Email => json!(self.email),
      Column::Status => json!(self.status),
      Column::Department => json!(self.department),
      Column::Location => json!(self.location),
      Column::Company => json!(self.company),
      Column::Position => json!(self.position),
      Column::Phone => json!(self.phone),
      Column::HireDate => json!(self.hire_date),
      Column::TerminationDate => json!(self.termination_date),
    }
  }

  /// Reduce the record to exactly `columns`.
  pub fn project(&self, columns: &[Column]) -> Map<String, Value> {
    columns
      .iter()
      .map(|&c| (c.as_str().to_owned(), self.value_of(c)))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn alice() -> Person {
    Person {
      id:               "p1".into(),
      tenant_id:        "org_1".into(),
      first_name:       "Alice".into(),
      last_name:        "Liddell".into(),
      email:            "alice@example.com".into(),
      status:           Status::NotStarted,
      department:       Department::Hr,
      location:         Location::NewYork,
      company:          Company::Branch1,
      position:         "QA Engineer".into(),
      phone:            None,
      hire_date:        NaiveDate::from_ymd_opt(2023, 1, 15),
      termination_date: None,
    }
  }

  #[test]
  fn vocabulary_round_trips_through_strings() {
    for s in Status::ALL {
      assert_eq!(s.as_str().parse::<Status>().unwrap(), *s);
    }
    assert_eq!(Location::NewYork.to_string(), "new_york");
    assert_eq!("branch_2".parse::<Company>().unwrap(), Company::Branch2);
  }

  #[test]
  fn unknown_vocabulary_is_invalid_parameter() {
    let err = "retired".parse::<Status>().unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(m) if m.contains("retired")));
  }

  #[test]
  fn serde_matches_as_str() {
    assert_eq!(json!(Status::NotStarted), json!("not_started"));
    let c: Column = serde_json::from_value(json!("hire_date")).unwrap();
    assert_eq!(c, Column::HireDate);
  }

  #[test]
  fn project_keeps_only_listed_columns() {
    let cols = [Column::Status, Column::FirstName, Column::Phone];
    let row = alice().project(&cols);
    assert_eq!(row.len(), 3);
    assert!(!row.contains_key("email"));
    assert_eq!(row["first_name"], json!("Alice"));
    assert_eq!(row["status"], json!("not_started"));
    assert_eq!(row["phone"], Value::Null);
  }

  #[test]
  fn dates_project_as_iso_strings() {
    let row = alice().project(&[Column::HireDate, Column::TerminationDate]);
    assert_eq!(row["hire_date"], json!("2023-01-15"));
    assert_eq!(row["termination_date"], Value::Null);
  }
}
