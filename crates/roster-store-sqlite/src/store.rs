//! [`SqliteStore`], the SQLite implementation of [`PeopleStore`].

use std::path::Path;

use roster_core::{
  filter::{Page, PersonFilter},
  person::Person,
  store::{FacetField, PeopleStore},
};
use rusqlite::{params_from_iter, types::Value};

use crate::{
  Result,
  encode::{RawPerson, encode_date},
  query::Predicate,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A people store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert `people` in one transaction. Ingestion lives outside the search
  /// path; this exists for seeding and tests.
  pub async fn insert_people(&self, people: Vec<Person>) -> Result<usize> {
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO people (
               id, tenant_id, first_name, last_name, email, status,
               department, location, company, position, phone,
               hire_date, termination_date
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          )?;
          for p in &people {
            stmt.execute(rusqlite::params![
              p.id,
              p.tenant_id,
              p.first_name,
              p.last_name,
              p.email,
              p.status.as_str(),
              p.department.as_str(),
              p.location.as_str(),
              p.company.as_str(),
              p.position,
              p.phone,
              p.hire_date.map(encode_date),
              p.termination_date.map(encode_date),
            ])?;
          }
        }
        tx.commit()?;
        Ok(people.len())
      })
      .await?;

    tracing::debug!(inserted, "inserted people");
    Ok(inserted)
  }

  /// Total rows across all tenants.
  pub async fn len(&self) -> Result<u64> {
    let n = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM people", [], |r| {
          r.get::<_, i64>(0)
        })?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }

  pub async fn is_empty(&self) -> Result<bool> { Ok(self.len().await? == 0) }
}

// ─── PeopleStore impl ────────────────────────────────────────────────────────

impl PeopleStore for SqliteStore {
  type Error = crate::Error;

  async fn count(&self, tenant_id: &str, filter: &PersonFilter) -> Result<u64> {
    let predicate = Predicate::build(tenant_id, filter);
    let sql = predicate.count_sql();
    let params: Vec<Value> = predicate.params().to_vec();

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, params_from_iter(params.iter()), |r| {
          r.get::<_, i64>(0)
        })?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }

  async fn fetch_page(
    &self,
    tenant_id: &str,
    filter: &PersonFilter,
    page: Page,
  ) -> Result<Vec<Person>> {
    let (sql, params) = Predicate::build(tenant_id, filter).page_sql(page);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(params.iter()), RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn distinct_values(
    &self,
    tenant_id: &str,
    field: FacetField,
    limit: Option<u32>,
  ) -> Result<Vec<String>> {
    let column = field.column_name();
    let mut sql = format!(
      "SELECT DISTINCT {column} FROM people WHERE tenant_id = ?1 ORDER BY {column}"
    );
    let mut params = vec![Value::Text(tenant_id.to_owned())];
    if let Some(limit) = limit {
      sql.push_str(" LIMIT ?2");
      params.push(Value::Integer(i64::from(limit)));
    }

    let values = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(params.iter()), |r| r.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(values)
  }
}
