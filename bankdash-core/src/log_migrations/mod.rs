//! Log database migrations
//!
//! Each migration is a tuple of (name, sql). They are applied in order and
//! recorded in `sys_migrations`; the first one creates that table.

pub const BOOTSTRAP_MIGRATION: &str = "000_migrations";

const CREATE_MIGRATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sys_migrations (
    migration_name VARCHAR PRIMARY KEY,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
"#;

const CREATE_EVENTS: &str = r#"
CREATE TABLE IF NOT EXISTS sys_logs (
    id UBIGINT PRIMARY KEY,
    timestamp BIGINT NOT NULL,
    entry_point VARCHAR NOT NULL,
    app_version VARCHAR NOT NULL,
    platform VARCHAR NOT NULL,
    event VARCHAR NOT NULL,
    page VARCHAR,
    command VARCHAR,
    error_message VARCHAR,
    error_details VARCHAR
);
CREATE INDEX IF NOT EXISTS idx_sys_logs_timestamp ON sys_logs (timestamp);
"#;

/// All log migrations in the order they apply
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    (BOOTSTRAP_MIGRATION, CREATE_MIGRATIONS),
    ("001_event_log", CREATE_EVENTS),
];
