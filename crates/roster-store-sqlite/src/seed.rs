//! Deterministic sample roster for demos and tests.
//!
//! Two tenants of 200 people each. Attributes cycle through the vocabularies
//! by index so that every filter combination has predictable matches.

use chrono::NaiveDate;
use roster_core::person::{Company, Department, Location, Person, Status};

use crate::{Result, SqliteStore};

pub const PEOPLE_PER_TENANT: usize = 200;

const POSITIONS: [&str; 13] = [
  "Software Engineer",
  "Senior Software Engineer",
  "Product Manager",
  "UX Designer",
  "Data Scientist",
  "DevOps Engineer",
  "QA Engineer",
  "Technical Lead",
  "Engineering Manager",
  "Frontend Developer",
  "Backend Developer",
  "Full Stack Developer",
  "System Architect",
];

fn pick<T: Copy>(options: &[T], i: usize) -> T { options[i % options.len()] }

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(y, m, d)
}

/// Sample people for `org_1`.
pub fn org_1() -> Vec<Person> {
  use Department::*;
  use Location::*;

  (0..PEOPLE_PER_TENANT)
    .map(|i| {
      let status = pick(
        &[Status::Active, Status::NotStarted, Status::Terminated],
        i,
      );
      let department = pick(&[Engineering, Marketing, Sales, Hr, Finance], i);
      let location = pick(&[NewYork, London, Tokyo, Vietnam], i);
      let company = pick(
        &[Company::Headquarters, Company::Branch1, Company::Branch2],
        i,
      );
      Person {
        id:               format!("org1-{i}"),
        tenant_id:        "org_1".to_owned(),
        first_name:       format!("Ada{i}"),
        last_name:        format!("Lovelace{i}"),
        email:            format!("ada.lovelace{i}@org1.example"),
        status,
        department,
        location,
        company,
        position:         pick(&POSITIONS, i).to_owned(),
        phone:            Some(format!("+1-555-{i:04}")),
        hire_date:        date(2023, 1, 15),
        termination_date: (status == Status::Terminated)
          .then(|| date(2024, 1, 15))
          .flatten(),
      }
    })
    .collect()
}

/// Sample people for `org_2`.
pub fn org_2() -> Vec<Person> {
  use Department::*;
  use Location::*;

  (0..PEOPLE_PER_TENANT)
    .map(|i| {
      let status = pick(
        &[
          Status::Active,
          Status::NotStarted,
          Status::Terminated,
          Status::Terminated,
        ],
        i,
      );
      let department = pick(&[Marketing, Sales, Operations, It], i);
      let location = pick(&[London, Berlin, Paris], i);
      let company = pick(&[Company::Subsidiary1, Company::Subsidiary2], i);
      Person {
        id:               format!("org2-{i}"),
        tenant_id:        "org_2".to_owned(),
        first_name:       format!("Grace{i}"),
        last_name:        format!("Hopper{i}"),
        email:            format!("grace.hopper{i}@org2.example"),
        status,
        department,
        location,
        company,
        position:         pick(&POSITIONS, i + 5).to_owned(),
        phone:            Some(format!("+44-20-{i:04}")),
        hire_date:        date(2023, 2, 20),
        termination_date: (status == Status::Terminated)
          .then(|| date(2024, 2, 20))
          .flatten(),
      }
    })
    .collect()
}

pub fn sample_people() -> Vec<Person> {
  let mut people = org_1();
  people.extend(org_2());
  people
}

impl SqliteStore {
  /// Insert [`sample_people`] if the store holds no rows. Returns the number
  /// inserted.
  pub async fn seed_if_empty(&self) -> Result<usize> {
    if !self.is_empty().await? {
      tracing::info!("store already populated; skipping seed");
      return Ok(0);
    }
    let n = self.insert_people(sample_people()).await?;
    tracing::info!(inserted = n, "seeded sample roster");
    Ok(n)
  }
}
