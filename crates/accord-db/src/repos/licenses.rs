//! License catalogue and per-file license findings.

use accord_core::entities::distinct_in_order;
use accord_core::License;

use crate::DbHandle;
use crate::error::DatabaseError;

/// Pseudo-licenses that never take part in a pair.
pub const PSEUDO_LICENSES: [&str; 3] = ["Dual-license", "No_license_found", "Void"];

fn row_to_license(row: &libsql::Row) -> Result<License<i64>, DatabaseError> {
    Ok(License::new(
        row.get::<i64>(0)?,
        row.get::<String>(1)?,
        row.get::<Option<String>>(2)?.unwrap_or_default(),
    ))
}

const SELECT_COLS: &str = "rf_pk, rf_shortname, rf_licensetype";

impl DbHandle {
    pub async fn insert_license(&self, name: &str, license_type: &str) -> Result<i64, DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO license_ref (rf_shortname, rf_licensetype) VALUES (?1, ?2)",
                libsql::params![name, license_type],
            )
            .await?;
        Ok(self.conn().last_insert_rowid())
    }

    pub async fn license_by_id(&self, id: i64) -> Result<License<i64>, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM license_ref WHERE rf_pk = ?1");
        let mut rows = self.conn().query(&sql, [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_license(&row)
    }

    pub async fn license_by_name(&self, name: &str) -> Result<Option<License<i64>>, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM license_ref WHERE rf_shortname = ?1");
        let mut rows = self.conn().query(&sql, [name]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_license(&row)?)),
            None => Ok(None),
        }
    }

    /// Record a license finding for a file.
    pub async fn attach_license(&self, pfile: i64, license: i64) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO license_file (rf_fk, pfile_fk) VALUES (?1, ?2)",
                libsql::params![license, pfile],
            )
            .await?;
        Ok(())
    }

    /// Distinct license ids found in a file, in first-seen order.
    ///
    /// Pseudo-licenses are excluded.
    pub async fn license_ids_for_file(&self, pfile: i64) -> Result<Vec<i64>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT lf.rf_fk FROM license_file AS lf
                 INNER JOIN license_ref AS lr ON lf.rf_fk = lr.rf_pk
                 WHERE lf.pfile_fk = ?1
                   AND lr.rf_shortname NOT IN (?2, ?3, ?4)
                 ORDER BY lf.fl_pk",
                libsql::params![
                    pfile,
                    PSEUDO_LICENSES[0],
                    PSEUDO_LICENSES[1],
                    PSEUDO_LICENSES[2]
                ],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<i64>(0)?);
        }
        Ok(distinct_in_order(ids))
    }

    /// Name and type for each id, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if an id has no catalogue row.
    pub async fn license_details(&self, ids: &[i64]) -> Result<Vec<License<i64>>, DatabaseError> {
        let mut licenses = Vec::with_capacity(ids.len());
        for &id in ids {
            let license = self.license_by_id(id).await.map_err(|e| match e {
                DatabaseError::NoResult => {
                    DatabaseError::InvalidState(format!("license {id} is not in license_ref"))
                }
                other => other,
            })?;
            licenses.push(license);
        }
        Ok(licenses)
    }
}
