//! Integration tests against an on-disk database shared by several handles.

use accord_core::rules::RuleDocument;
use accord_db::AccordDb;
use accord_db::repos::rules::NewRule;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

async fn file_db(dir: &TempDir) -> AccordDb {
    let path = dir.path().join("accord.db");
    AccordDb::open_local(path.to_str().unwrap()).await.unwrap()
}

#[tokio::test]
async fn reopening_keeps_data_and_reruns_migrations() {
    let dir = TempDir::new().unwrap();
    {
        let db = file_db(&dir).await;
        db.primary().insert_license("MIT", "permissive").await.unwrap();
    }

    let db = file_db(&dir).await;
    let mit = db.primary().license_by_name("MIT").await.unwrap().unwrap();
    assert_eq!(mit.license_type, "permissive");
}

#[tokio::test]
async fn worker_handle_sees_primary_writes() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    let primary = db.primary();

    let mit = primary.insert_license("MIT", "permissive").await.unwrap();
    let gpl = primary.insert_license("GPL-2.0-only", "copyleft").await.unwrap();
    let pfile = primary.insert_pfile("aa", "bb", 5).await.unwrap();
    primary.insert_upload_entry(1, pfile, 0, "a.c").await.unwrap();
    primary.attach_license(pfile, mit).await.unwrap();
    primary.attach_license(pfile, gpl).await.unwrap();
    let agent = primary.register_agent("compatibility", "1", "").await.unwrap();

    let worker = db.spawn().await.unwrap();
    assert_eq!(worker.files_pending_for_upload(1, agent).await.unwrap(), vec![pfile]);
    assert_eq!(worker.license_ids_for_file(pfile).await.unwrap(), vec![mit, gpl]);

    worker.insert_result(pfile, agent, mit, gpl, 'f').await.unwrap();
    assert!(primary.result_exists(pfile, gpl, mit).await.unwrap());
}

#[tokio::test]
async fn exported_rules_load_as_a_rule_document() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    let h = db.primary();
    let mit = h.insert_license("MIT", "permissive").await.unwrap();
    h.insert_rule(&NewRule::by_mixed(mit, "copyleft", true))
        .await
        .unwrap();

    let yaml = h.export_rules().await.unwrap().to_yaml_string().unwrap();
    let doc = RuleDocument::from_yaml_str(&yaml).unwrap();

    assert!(!doc.default);
    assert_eq!(doc.rules.len(), 1);
    assert_eq!(doc.rules[0].mainname.as_deref(), Some("MIT"));
    assert_eq!(doc.rules[0].subtype.as_deref(), Some("copyleft"));
    assert_eq!(doc.rules[0].subname, None);
}
