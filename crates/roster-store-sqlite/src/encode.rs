//! Decoding helpers between SQLite text columns and the person model.
//!
//! Dates are stored as `YYYY-MM-DD`; enumerations as their `snake_case`
//! names.

use std::str::FromStr;

use chrono::NaiveDate;
use roster_core::person::Person;

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_vocab<T: FromStr>(column: &'static str, value: String) -> Result<T> {
  value
    .parse()
    .map_err(|_| Error::UnknownValue { column, value })
}

/// Raw strings read directly from a `people` row, in
/// [`crate::query::PERSON_COLUMNS`] order.
pub struct RawPerson {
  pub id:               String,
  pub tenant_id:        String,
  pub first_name:       String,
  pub last_name:        String,
  pub email:            String,
  pub status:           String,
  pub department:       String,
  pub location:         String,
  pub company:          String,
  pub position:         String,
  pub phone:            Option<String>,
  pub hire_date:        Option<String>,
  pub termination_date: Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      tenant_id:        row.get(1)?,
      first_name:       row.get(2)?,
      last_name:        row.get(3)?,
      email:            row.get(4)?,
      status:           row.get(5)?,
      department:       row.get(6)?,
      location:         row.get(7)?,
      company:          row.get(8)?,
      position:         row.get(9)?,
      phone:            row.get(10)?,
      hire_date:        row.get(11)?,
      termination_date: row.get(12)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:               self.id,
      tenant_id:        self.tenant_id,
      first_name:       self.first_name,
      last_name:        self.last_name,
      email:            self.email,
      status:           decode_vocab("status", self.status)?,
      department:       decode_vocab("department", self.department)?,
      location:         decode_vocab("location", self.location)?,
      company:          decode_vocab("company", self.company)?,
      position:         self.position,
      phone:            self.phone,
      hire_date:        self.hire_date.as_deref().map(decode_date).transpose()?,
      termination_date: self
        .termination_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
    })
  }
}
