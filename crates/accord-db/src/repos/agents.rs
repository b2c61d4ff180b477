//! Agent registration and per-upload run records.

use chrono::{DateTime, Utc};

use crate::DbHandle;
use crate::error::DatabaseError;
use crate::helpers::{flag, get_flag, get_opt_string, parse_datetime, parse_optional_datetime};

/// One row of `compatibility_ars`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub id: i64,
    pub agent: i64,
    pub upload: i64,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

fn row_to_run(row: &libsql::Row) -> Result<RunRecord, DatabaseError> {
    Ok(RunRecord {
        id: row.get::<i64>(0)?,
        agent: row.get::<i64>(1)?,
        upload: row.get::<i64>(2)?,
        success: get_flag(row, 3)?,
        started_at: parse_datetime(&row.get::<String>(4)?)?,
        ended_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
    })
}

const SELECT_COLS: &str =
    "ars_pk, agent_fk, upload_fk, ars_success, ars_starttime, ars_endtime";

impl DbHandle {
    /// Id of the agent with this name and revision, registering it if needed.
    pub async fn register_agent(
        &self,
        name: &str,
        revision: &str,
        description: &str,
    ) -> Result<i64, DatabaseError> {
        self.conn()
            .execute(
                "INSERT OR IGNORE INTO agent (agent_name, agent_rev, agent_desc) VALUES (?1, ?2, ?3)",
                libsql::params![name, revision, description],
            )
            .await?;

        let mut rows = self
            .conn()
            .query(
                "SELECT agent_pk, agent_enabled FROM agent WHERE agent_name = ?1 AND agent_rev = ?2",
                libsql::params![name, revision],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        if !get_flag(&row, 1)? {
            return Err(DatabaseError::InvalidState(format!(
                "agent {name} {revision} is disabled"
            )));
        }
        Ok(row.get::<i64>(0)?)
    }

    /// Open a run record for one upload. `ars_success` starts false.
    pub async fn start_run(&self, agent: i64, upload: i64) -> Result<i64, DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO compatibility_ars (agent_fk, upload_fk, ars_success, ars_starttime) VALUES (?1, ?2, 0, ?3)",
                libsql::params![agent, upload, Utc::now().to_rfc3339()],
            )
            .await?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Close a run record.
    pub async fn finish_run(&self, run: i64, success: bool) -> Result<(), DatabaseError> {
        let changed = self
            .conn()
            .execute(
                "UPDATE compatibility_ars SET ars_success = ?1, ars_endtime = ?2 WHERE ars_pk = ?3",
                libsql::params![flag(success), Utc::now().to_rfc3339(), run],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    pub async fn run_record(&self, run: i64) -> Result<RunRecord, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM compatibility_ars WHERE ars_pk = ?1");
        let mut rows = self.conn().query(&sql, [run]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_run(&row)
    }
}
