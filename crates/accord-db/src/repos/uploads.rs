//! Scan inventory: pfiles and upload trees.

use crate::DbHandle;
use crate::error::DatabaseError;

/// `ufile_mode` bits marking artifacts, containers, directories, and
/// replaced entries. Files with any of them set are never evaluated.
pub const SKIPPED_MODE_MASK: i64 = 0x3C00_0000;

impl DbHandle {
    pub async fn insert_pfile(&self, sha1: &str, md5: &str, size: i64) -> Result<i64, DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO pfile (pfile_sha1, pfile_md5, pfile_size) VALUES (?1, ?2, ?3)",
                libsql::params![sha1, md5, size],
            )
            .await?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Add one entry to an upload tree.
    pub async fn insert_upload_entry(
        &self,
        upload: i64,
        pfile: i64,
        mode: i64,
        name: &str,
    ) -> Result<i64, DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO uploadtree (upload_fk, pfile_fk, ufile_mode, ufile_name) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![upload, pfile, mode, name],
            )
            .await?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Files of an upload that still need evaluating by `agent`.
    ///
    /// A file qualifies when it has license findings, has no result from this
    /// agent yet, and is a plain file (no bit of [`SKIPPED_MODE_MASK`]).
    pub async fn files_pending_for_upload(
        &self,
        upload: i64,
        agent: i64,
    ) -> Result<Vec<i64>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT DISTINCT ut.pfile_fk FROM uploadtree AS ut
                 INNER JOIN license_file AS lf ON ut.pfile_fk = lf.pfile_fk
                 LEFT JOIN comp_result AS cr ON ut.pfile_fk = cr.pfile_fk AND cr.agent_fk = ?2
                 WHERE cr.pfile_fk IS NULL
                   AND ut.upload_fk = ?1
                   AND (ut.ufile_mode & ?3) = 0
                 ORDER BY ut.pfile_fk",
                libsql::params![upload, agent, SKIPPED_MODE_MASK],
            )
            .await?;

        let mut files = Vec::new();
        while let Some(row) = rows.next().await? {
            files.push(row.get::<i64>(0)?);
        }
        Ok(files)
    }

    /// Repository name of a pfile: `<sha1>.<md5>.<size>`.
    pub async fn pfile_name(&self, pfile: i64) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT pfile_sha1 || '.' || pfile_md5 || '.' || pfile_size FROM pfile WHERE pfile_pk = ?1",
                [pfile],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}
