//! Shared test utilities for accord-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use crate::AccordDb;

    /// Open an in-memory database. Only the primary handle sees its data.
    pub async fn test_db() -> AccordDb {
        AccordDb::open_local(":memory:").await.unwrap()
    }

    /// Insert licenses and return their ids in the given order.
    pub async fn seed_licenses(db: &AccordDb, licenses: &[(&str, &str)]) -> Vec<i64> {
        let mut ids = Vec::with_capacity(licenses.len());
        for (name, license_type) in licenses {
            ids.push(
                db.primary()
                    .insert_license(name, license_type)
                    .await
                    .unwrap(),
            );
        }
        ids
    }
}
