//! SQLite Entity Source
//!
//! Reads the five funnel tables from a SQLite database. Key columns may be
//! INTEGER or TEXT; timestamp columns may be ISO-8601 TEXT or unix seconds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, Type, ValueRef};
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::domain::models::{
    ChargeStatus, Collection, Download, EntitySnapshot, Platform, Review, RideRequest, Signup,
    Transaction,
};
use crate::domain::ports::EntitySource;
use crate::error::{Result, StorageError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS download (
    download_key TEXT PRIMARY KEY,
    platform TEXT,
    download_timestamp TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS signup (
    session_key TEXT NOT NULL,
    user_id TEXT PRIMARY KEY,
    signup_timestamp TEXT NOT NULL,
    age_range TEXT
);

CREATE TABLE IF NOT EXISTS ride_request (
    ride_id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    driver_id TEXT,
    request_timestamp TEXT NOT NULL,
    accept_timestamp TEXT,
    pickup_timestamp TEXT,
    dropoff_timestamp TEXT,
    cancel_timestamp TEXT
);

CREATE TABLE IF NOT EXISTS "transaction" (
    ride_id TEXT NOT NULL,
    charge_status TEXT NOT NULL,
    purchase_amount REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS review (
    review_id TEXT PRIMARY KEY,
    ride_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    rating INTEGER NOT NULL,
    review_text TEXT
);

CREATE INDEX IF NOT EXISTS idx_signup_session ON signup(session_key);
CREATE INDEX IF NOT EXISTS idx_ride_request_user ON ride_request(user_id);
CREATE INDEX IF NOT EXISTS idx_transaction_ride ON "transaction"(ride_id);
CREATE INDEX IF NOT EXISTS idx_review_ride ON review(ride_id);
"#;

/// SQLite-based EntitySource implementation
#[derive(Debug, Clone)]
pub struct SqliteEntitySource {
    conn: Arc<Mutex<Connection>>,
    label: String,
}

impl SqliteEntitySource {
    /// Open an existing database read-only
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            StorageError::source_unavailable(path.display().to_string(), e.to_string())
                .with_source(e)
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            label: path.display().to_string(),
        })
    }

    /// Create (or open) a writable database with the funnel schema
    pub fn create(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            label: path.display().to_string(),
        })
    }

    /// Create an in-memory database with the funnel schema (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            label: ":memory:".to_string(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::database("SQLite connection mutex poisoned"))
    }

    /// Write a whole snapshot in one transaction (fixtures, seeding)
    pub fn insert_snapshot(&self, snapshot: &EntitySnapshot) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        for d in &snapshot.downloads {
            tx.execute(
                "INSERT INTO download (download_key, platform, download_timestamp)
                 VALUES (?1, ?2, ?3)",
                params![
                    &d.download_key,
                    d.platform.map(|p| p.as_str()),
                    d.download_timestamp
                ],
            )?;
        }

        for s in &snapshot.signups {
            tx.execute(
                "INSERT INTO signup (session_key, user_id, signup_timestamp, age_range)
                 VALUES (?1, ?2, ?3, ?4)",
                params![&s.session_key, &s.user_id, s.signup_timestamp, &s.age_range],
            )?;
        }

        for r in &snapshot.ride_requests {
            tx.execute(
                "INSERT INTO ride_request (ride_id, user_id, driver_id, request_timestamp,
                    accept_timestamp, pickup_timestamp, dropoff_timestamp, cancel_timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    &r.ride_id,
                    &r.user_id,
                    &r.driver_id,
                    r.request_timestamp,
                    r.accept_timestamp,
                    r.pickup_timestamp,
                    r.dropoff_timestamp,
                    r.cancel_timestamp
                ],
            )?;
        }

        for t in &snapshot.transactions {
            tx.execute(
                "INSERT INTO \"transaction\" (ride_id, charge_status, purchase_amount)
                 VALUES (?1, ?2, ?3)",
                params![&t.ride_id, t.charge_status.as_str(), t.purchase_amount],
            )?;
        }

        for r in &snapshot.reviews {
            tx.execute(
                "INSERT INTO review (review_id, ride_id, user_id, rating, review_text)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![&r.review_id, &r.ride_id, &r.user_id, r.rating, &r.review_text],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Run a collection query; statement failures mean the collection is unavailable
    ///
    /// Rows come back in insertion (rowid) order. Views and `WITHOUT ROWID`
    /// tables have no rowid and are read in the order SQLite returns them.
    fn read_collection<T, F>(&self, collection: Collection, sql: &str, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let unavailable = |e: rusqlite::Error| {
            StorageError::source_unavailable(collection.table_name(), e.to_string()).with_source(e)
        };

        let conn = self.lock()?;
        let ordered = format!("{} ORDER BY rowid", sql);
        let mut stmt = match conn.prepare(&ordered) {
            Ok(stmt) => stmt,
            Err(e) => {
                debug!(collection = %collection, error = %e, "no rowid ordering, reading unordered");
                conn.prepare(sql).map_err(unavailable)?
            }
        };
        let rows = stmt.query_map([], map).map_err(unavailable)?;

        let mut out = Vec::new();
        for row in rows {
            let record = row.map_err(|e| {
                StorageError::serialization(format!(
                    "Failed to decode {} row {}: {}",
                    collection,
                    out.len(),
                    e
                ))
                .with_source(e)
            })?;
            out.push(record);
        }

        debug!(collection = %collection, rows = out.len(), "collection read");
        Ok(out)
    }
}

fn conversion_failure(idx: usize, ty: Type, message: impl Into<String>) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        ty,
        Box::new(StorageError::serialization(message)),
    )
}

/// Key column accepting TEXT or INTEGER
fn key_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    opt_key_at(row, idx)?.ok_or_else(|| conversion_failure(idx, Type::Null, "key is NULL"))
}

fn opt_key_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => Ok(Some(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Real(f) => Ok(Some(f.to_string())),
        ValueRef::Blob(_) => Err(conversion_failure(idx, Type::Blob, "key is a BLOB")),
    }
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    opt_timestamp_at(row, idx)?
        .ok_or_else(|| conversion_failure(idx, Type::Null, "timestamp is NULL"))
}

/// Timestamp column accepting ISO-8601 TEXT or unix seconds
fn opt_timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let value = row.get_ref(idx)?;
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0)
            .map(Some)
            .ok_or_else(|| {
                conversion_failure(
                    idx,
                    Type::Integer,
                    format!("timestamp {} out of range", secs),
                )
            }),
        ValueRef::Text(_) => DateTime::<Utc>::column_result(value)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        other => Err(conversion_failure(
            idx,
            other.data_type(),
            "expected timestamp",
        )),
    }
}

fn platform_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Platform>> {
    match opt_key_at(row, idx)? {
        None => Ok(None),
        Some(raw) => raw
            .parse::<Platform>()
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
    }
}

#[async_trait]
impl EntitySource for SqliteEntitySource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn downloads(&self) -> Result<Vec<Download>> {
        self.read_collection(
            Collection::Download,
            "SELECT download_key, platform, download_timestamp FROM download",
            |row| {
                Ok(Download {
                    download_key: key_at(row, 0)?,
                    platform: platform_at(row, 1)?,
                    download_timestamp: timestamp_at(row, 2)?,
                })
            },
        )
    }

    async fn signups(&self) -> Result<Vec<Signup>> {
        self.read_collection(
            Collection::Signup,
            "SELECT session_key, user_id, signup_timestamp, age_range FROM signup",
            |row| {
                Ok(Signup {
                    session_key: key_at(row, 0)?,
                    user_id: key_at(row, 1)?,
                    signup_timestamp: timestamp_at(row, 2)?,
                    age_range: row.get(3)?,
                })
            },
        )
    }

    async fn ride_requests(&self) -> Result<Vec<RideRequest>> {
        self.read_collection(
            Collection::RideRequest,
            "SELECT ride_id, user_id, driver_id, request_timestamp, accept_timestamp,
                    pickup_timestamp, dropoff_timestamp, cancel_timestamp
             FROM ride_request",
            |row| {
                Ok(RideRequest {
                    ride_id: key_at(row, 0)?,
                    user_id: key_at(row, 1)?,
                    driver_id: opt_key_at(row, 2)?,
                    request_timestamp: timestamp_at(row, 3)?,
                    accept_timestamp: opt_timestamp_at(row, 4)?,
                    pickup_timestamp: opt_timestamp_at(row, 5)?,
                    dropoff_timestamp: opt_timestamp_at(row, 6)?,
                    cancel_timestamp: opt_timestamp_at(row, 7)?,
                })
            },
        )
    }

    async fn transactions(&self) -> Result<Vec<Transaction>> {
        let mut seq = 0u64;
        self.read_collection(
            Collection::Transaction,
            "SELECT ride_id, charge_status, purchase_amount FROM \"transaction\"",
            move |row| {
                let status: String = row.get(1)?;
                let tx = Transaction {
                    transaction_seq: seq,
                    ride_id: key_at(row, 0)?,
                    charge_status: ChargeStatus::parse(&status),
                    purchase_amount: row.get(2)?,
                };
                seq += 1;
                Ok(tx)
            },
        )
    }

    async fn reviews(&self) -> Result<Vec<Review>> {
        self.read_collection(
            Collection::Review,
            "SELECT review_id, ride_id, user_id, rating, review_text FROM review",
            |row| {
                Ok(Review {
                    review_id: key_at(row, 0)?,
                    ride_id: key_at(row, 1)?,
                    user_id: key_at(row, 2)?,
                    rating: row.get(3)?,
                    review_text: row.get(4)?,
                })
            },
        )
    }
}
