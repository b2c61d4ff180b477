//! Compatibility results and the persistent result sink.

use accord_core::{LicensePair, ResultStore, StoreError, Verdict};
use tracing::debug;

use crate::DbHandle;
use crate::error::DatabaseError;

/// One row of `comp_result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResult {
    pub pfile: i64,
    pub agent: i64,
    pub first: i64,
    pub second: i64,
    pub code: char,
}

fn row_to_result(row: &libsql::Row) -> Result<StoredResult, DatabaseError> {
    let code = row.get::<String>(4)?;
    let mut chars = code.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(DatabaseError::InvalidState(format!(
            "result code '{code}' is not a single character"
        )));
    };
    Ok(StoredResult {
        pfile: row.get::<i64>(0)?,
        agent: row.get::<i64>(1)?,
        first: row.get::<i64>(2)?,
        second: row.get::<i64>(3)?,
        code: c,
    })
}

const SELECT_COLS: &str = "pfile_fk, agent_fk, first_rf_fk, second_rf_fk, result";

impl DbHandle {
    /// Whether any result exists for this file and unordered license pair.
    pub async fn result_exists(&self, pfile: i64, a: i64, b: i64) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT EXISTS(SELECT 1 FROM comp_result
                 WHERE ((first_rf_fk = ?1 AND second_rf_fk = ?2) OR (first_rf_fk = ?2 AND second_rf_fk = ?1))
                   AND pfile_fk = ?3)",
                libsql::params![a, b, pfile],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)? != 0)
    }

    pub async fn insert_result(
        &self,
        pfile: i64,
        agent: i64,
        first: i64,
        second: i64,
        code: char,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO comp_result (pfile_fk, agent_fk, first_rf_fk, second_rf_fk, result)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![pfile, agent, first, second, code.to_string()],
            )
            .await?;
        Ok(())
    }

    /// Results for one file in insertion order.
    pub async fn results_for_file(&self, pfile: i64) -> Result<Vec<StoredResult>, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM comp_result WHERE pfile_fk = ?1 ORDER BY cr_pk");
        let mut rows = self.conn().query(&sql, [pfile]).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_result(&row)?);
        }
        Ok(results)
    }
}

/// Persistent sink and dedup guard for one file.
pub struct DbResultStore<'a> {
    handle: &'a DbHandle,
    pfile: i64,
    agent: i64,
    default_marker: char,
}

impl<'a> DbResultStore<'a> {
    #[must_use]
    pub const fn new(handle: &'a DbHandle, pfile: i64, agent: i64, default_marker: char) -> Self {
        Self {
            handle,
            pfile,
            agent,
            default_marker,
        }
    }
}

impl ResultStore<i64> for DbResultStore<'_> {
    async fn exists(&self, pair: &LicensePair<i64>) -> Result<bool, StoreError> {
        self.handle
            .result_exists(self.pfile, pair.main.key, pair.sub.key)
            .await
            .map_err(|e| StoreError::Lookup(e.to_string()))
    }

    async fn record(&mut self, pair: &LicensePair<i64>, verdict: Verdict) -> Result<(), StoreError> {
        let code = verdict.outcome.code(self.default_marker);
        self.handle
            .insert_result(self.pfile, self.agent, pair.main.key, pair.sub.key, code)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        debug!(
            pfile = self.pfile,
            main = pair.main.key,
            sub = pair.sub.key,
            tier = %verdict.tier,
            %code,
            "result stored"
        );
        Ok(())
    }
}
