//! Translates a [`PersonFilter`] into a parameterised SQL predicate.
//!
//! Rules:
//! - `tenant_id = ?` is always the first clause.
//! - `query` matches first name, last name, email or position as a substring.
//! - Enumerated fields emit `col = ?` for a single value and `col IN (...)`
//!   for several; an empty set emits nothing.
//! - `position` is a substring match and only ever scalar.
//!
//! Substring matching uses `LIKE` with user wildcards escaped, so it is
//! case-insensitive for ASCII letters and case-sensitive otherwise.

use roster_core::filter::{FilterValue, Page, PersonFilter};
use rusqlite::types::Value;

/// Columns selected for a full person row, in [`crate::encode::RawPerson`]
/// field order.
pub const PERSON_COLUMNS: &str = "id, tenant_id, first_name, last_name, email, \
                                  status, department, location, company, \
                                  position, phone, hire_date, termination_date";

/// A conjunction of SQL clauses with positional `?` parameters bound in
/// clause order.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
  clauses: Vec<String>,
  params:  Vec<Value>,
}

impl Predicate {
  pub fn build(tenant_id: &str, filter: &PersonFilter) -> Self {
    let mut p = Self {
      clauses: vec!["tenant_id = ?".to_owned()],
      params:  vec![Value::Text(tenant_id.to_owned())],
    };

    if let Some(q) = &filter.query {
      let pattern = like_pattern(q);
      p.clauses.push(
        "(first_name LIKE ? ESCAPE '\\' OR last_name LIKE ? ESCAPE '\\' \
         OR email LIKE ? ESCAPE '\\' OR position LIKE ? ESCAPE '\\')"
          .to_owned(),
      );
      p.params.extend(std::iter::repeat_n(Value::Text(pattern), 4));
    }

    p.push_values("status", filter.status.as_ref(), |v| v.as_str());
    p.push_values("department", filter.department.as_ref(), |v| v.as_str());
    p.push_values("location", filter.location.as_ref(), |v| v.as_str());
    p.push_values("company", filter.company.as_ref(), |v| v.as_str());

    if let Some(position) = &filter.position {
      p.clauses.push("position LIKE ? ESCAPE '\\'".to_owned());
      p.params.push(Value::Text(like_pattern(position)));
    }

    p
  }

  fn push_values<T: Copy>(
    &mut self,
    column: &str,
    filter: Option<&FilterValue<T>>,
    as_str: impl Fn(T) -> &'static str,
  ) {
    let values = match filter {
      Some(f) if !f.values().is_empty() => f.values(),
      _ => return,
    };

    match filter {
      Some(FilterValue::Single(_)) => {
        self.clauses.push(format!("{column} = ?"));
      }
      _ => {
        let placeholders = vec!["?"; values.len()].join(", ");
        self.clauses.push(format!("{column} IN ({placeholders})"));
      }
    }
    self
      .params
      .extend(values.iter().map(|&v| Value::Text(as_str(v).to_owned())));
  }

  /// The clauses joined with `AND`, without the `WHERE` keyword.
  pub fn where_clause(&self) -> String { self.clauses.join(" AND ") }

  pub fn params(&self) -> &[Value] { &self.params }

  /// `SELECT COUNT(*)` over the predicate.
  pub fn count_sql(&self) -> String {
    format!("SELECT COUNT(*) FROM people WHERE {}", self.where_clause())
  }

  /// Ordered, paginated row query plus its full parameter list. `rowid`
  /// breaks name ties in insertion order.
  pub fn page_sql(&self, page: Page) -> (String, Vec<Value>) {
    let sql = format!(
      "SELECT {PERSON_COLUMNS} FROM people WHERE {}
       ORDER BY first_name, last_name, rowid
       LIMIT ? OFFSET ?",
      self.where_clause()
    );
    let mut params = self.params.clone();
    params.push(Value::Integer(i64::from(page.limit)));
    params.push(Value::Integer(i64::try_from(page.offset).unwrap_or(i64::MAX)));
    (sql, params)
  }
}

/// `%term%` with `LIKE` metacharacters in `term` escaped by `\`.
pub fn like_pattern(term: &str) -> String {
  let mut out = String::with_capacity(term.len() + 2);
  out.push('%');
  for c in term.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

#[cfg(test)]
mod tests {
  use roster_core::person::{Company, Department, Location, Status};

  use super::*;

  fn text(s: &str) -> Value { Value::Text(s.to_owned()) }

  #[test]
  fn tenant_clause_is_always_first() {
    let p = Predicate::build("org_1", &PersonFilter::default());
    assert_eq!(p.where_clause(), "tenant_id = ?");
    assert_eq!(p.params(), &[text("org_1")]);
  }

  #[test]
  fn free_text_binds_four_patterns() {
    let p = Predicate::build("org_1", &PersonFilter::default().with_query("eng"));
    assert!(p.where_clause().contains("first_name LIKE ?"));
    assert!(p.where_clause().contains("OR position LIKE ?"));
    assert_eq!(p.params().len(), 5);
    assert!(p.params()[1..].iter().all(|v| *v == text("%eng%")));
  }

  #[test]
  fn single_and_many_values() {
    let filter = PersonFilter::default()
      .with_status(Status::Active)
      .with_location(FilterValue::Many(vec![Location::Tokyo, Location::London]));
    let p = Predicate::build("org_1", &filter);
    assert_eq!(
      p.where_clause(),
      "tenant_id = ? AND status = ? AND location IN (?, ?)"
    );
    assert_eq!(p.params(), &[
      text("org_1"),
      text("active"),
      text("tokyo"),
      text("london"),
    ]);
  }

  #[test]
  fn empty_many_emits_nothing() {
    let filter = PersonFilter {
      department: Some(FilterValue::Many(vec![])),
      ..Default::default()
    };
    let p = Predicate::build("org_1", &filter);
    assert_eq!(p.where_clause(), "tenant_id = ?");
    assert_eq!(p.params().len(), 1);
  }

  #[test]
  fn clause_order_is_fixed() {
    let filter = PersonFilter::default()
      .with_position("Lead")
      .with_company(Company::Branch1)
      .with_department(Department::Sales)
      .with_query("x");
    let p = Predicate::build("t", &filter);
    let w = p.where_clause();
    let at = |needle: &str| w.find(needle).unwrap();
    assert!(at("tenant_id") < at("first_name"));
    assert!(at("first_name") < at("department ="));
    assert!(at("department =") < at("company ="));
    assert!(at("company =") < w.rfind("position LIKE").unwrap());
    assert!(w.ends_with("AND position LIKE ? ESCAPE '\\'"));
    assert_eq!(p.params().last(), Some(&text("%Lead%")));
  }

  #[test]
  fn like_metacharacters_are_escaped() {
    assert_eq!(like_pattern("100%"), "%100\\%%");
    assert_eq!(like_pattern("a_b"), "%a\\_b%");
    assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    assert_eq!(like_pattern(""), "%%");
  }

  #[test]
  fn page_sql_appends_limit_and_offset() {
    let p = Predicate::build("org_1", &PersonFilter::default());
    let (sql, params) = p.page_sql(Page { limit: 25, offset: 50 });
    assert!(sql.contains("ORDER BY first_name, last_name"));
    assert!(sql.trim_end().ends_with("LIMIT ? OFFSET ?"));
    assert_eq!(params, vec![text("org_1"), Value::Integer(25), Value::Integer(50)]);
  }
}
