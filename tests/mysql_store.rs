//! Runs against a real MySQL server only when LEADDESK_TEST_DATABASE names a
//! scratch database. The database is dropped and recreated.

use chrono::NaiveDate;
use leaddesk::config::DatabaseConfig;
use leaddesk::storage::{LeadStore, MySqlStore};
use leaddesk::types::{NewNote, NoteTarget};

const SCHEMA: &str = include_str!("../sql/schema.sql");

fn test_database() -> Option<DatabaseConfig> {
    let name = std::env::var("LEADDESK_TEST_DATABASE").ok().filter(|v| !v.is_empty())?;
    let mut config = DatabaseConfig {
        name,
        ..DatabaseConfig::default()
    };
    if let Ok(host) = std::env::var("LEADDESK_TEST_DB_HOST") {
        config.host = host;
    }
    Some(config)
}

async fn fresh_store(config: &DatabaseConfig) -> MySqlStore {
    let server = MySqlStore::connect_server(config);
    server.recreate_database(&config.name).await.unwrap();
    server.close().await.unwrap();

    let store = MySqlStore::connect(config);
    store.run_script(SCHEMA).await.unwrap();
    store
}

async fn row_count(store: &MySqlStore, table: &str) -> Option<u64> {
    store
        .table_counts()
        .await
        .unwrap()
        .into_iter()
        .find(|(name, _)| *name == table)
        .and_then(|(_, rows)| rows)
}

#[tokio::test]
async fn failed_parent_update_rolls_back_note() {
    let Some(config) = test_database() else {
        return;
    };
    let store = fresh_store(&config).await;
    store
        .run_script(
            "INSERT INTO customers (cust_id, cust_fname, cust_mobile) \
             VALUES (10, 'Ravi', '9000000001'); \
             ALTER TABLE customers DROP COLUMN followup_time;",
        )
        .await
        .unwrap();

    let note = NewNote {
        target: NoteTarget::Customer(10),
        note: "call back".into(),
        added_by: "Asha".into(),
        status: Some("Follow up".into()),
        followup_date: NaiveDate::from_ymd_opt(2024, 6, 12),
        followup_time: Some("10:00".into()),
    };
    assert!(store.add_note(&note).await.is_err());
    assert_eq!(row_count(&store, "customer_notes").await, Some(0));

    // without a parent update the insert alone commits
    let plain = NewNote {
        status: None,
        followup_date: None,
        followup_time: None,
        ..note
    };
    store.add_note(&plain).await.unwrap();
    assert_eq!(row_count(&store, "customer_notes").await, Some(1));

    store.close().await.unwrap();
}
