//! SQL schema for the roster SQLite store.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS people (
    id               TEXT NOT NULL,
    tenant_id        TEXT NOT NULL,
    first_name       TEXT NOT NULL,
    last_name        TEXT NOT NULL,
    email            TEXT NOT NULL,
    status           TEXT NOT NULL
                     CHECK (status IN ('active', 'not_started', 'terminated')),
    department       TEXT NOT NULL,
    location         TEXT NOT NULL,
    company          TEXT NOT NULL,
    position         TEXT NOT NULL,
    phone            TEXT,
    hire_date        TEXT,            -- YYYY-MM-DD
    termination_date TEXT,            -- YYYY-MM-DD; set for terminated people
    created_at       TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (tenant_id, id)
);

CREATE INDEX IF NOT EXISTS people_tenant_idx ON people(tenant_id);
CREATE INDEX IF NOT EXISTS people_filter_idx
    ON people(tenant_id, status, department, location, company, position);
CREATE INDEX IF NOT EXISTS people_name_idx ON people(first_name, last_name);

PRAGMA user_version = 1;
";
