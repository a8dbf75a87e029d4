use crossterm::event::KeyCode;
use customer_manager::config::DatabaseConfig;
use customer_manager::{App, CustomerFields, CustomerStore, SqliteStore, StoreError};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> SqliteStore {
    let store = SqliteStore::connected(
        dir.path().join("customers.sqlite"),
        DatabaseConfig::default(),
    );
    assert!(store.is_connected(), "{:?}", store.connect_error());
    store
}

fn globex() -> CustomerFields {
    CustomerFields {
        coid: "G-42".to_string(),
        company_name: "Globex Corporation".to_string(),
        short_name: "Globex".to_string(),
        contact_person: "Hank Scorpio".to_string(),
        phone: "+1 555 0142".to_string(),
        email: "hank@globex.test".to_string(),
        address_line1: "42 Cypress Creek".to_string(),
        address_line2: String::new(),
        city: "Cypress Creek".to_string(),
        state: "OR".to_string(),
        postal_code: "97000".to_string(),
        country: "USA".to_string(),
        is_active: true,
    }
}

#[test]
fn inserted_record_comes_back_exactly_once() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let id = store.insert(&globex()).unwrap();
    let rows = store.list().unwrap();

    let matching: Vec<_> = rows.iter().filter(|row| row.fields == globex()).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, id);
}

#[test]
fn rows_survive_reconnecting() {
    let dir = TempDir::new().unwrap();
    let id = {
        let mut store = open_store(&dir);
        let id = store.insert(&globex()).unwrap();
        store.disconnect();
        id
    };

    let store = open_store(&dir);
    let rows = store.list().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
}

#[test]
fn updating_with_current_values_changes_nothing_but_the_timestamp() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let id = store.insert(&globex()).unwrap();
    let before = store.list().unwrap().remove(0);

    store.update(id, &before.fields).unwrap();
    let after = store.list().unwrap().remove(0);

    assert_eq!(after.id, before.id);
    assert_eq!(after.fields, before.fields);
    assert_eq!(after.date_created, before.date_created);
    assert!(after.date_updated >= before.date_updated);
}

#[test]
fn deleted_id_is_gone() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let keep = store.insert(&globex()).unwrap();
    let gone = store
        .insert(&CustomerFields {
            coid: "I-1".to_string(),
            company_name: "Initech".to_string(),
            ..CustomerFields::default()
        })
        .unwrap();

    store.delete(gone).unwrap();

    let ids: Vec<i64> = store.list().unwrap().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![keep]);
}

#[test]
fn unreachable_database_loads_sample_rows() {
    let dir = TempDir::new().unwrap();
    let settings = DatabaseConfig {
        create_schema: false,
        ..DatabaseConfig::default()
    };
    let store = SqliteStore::connected(dir.path().join("missing.sqlite"), settings);
    assert!(!store.is_connected());

    let app = App::new(Box::new(store));
    assert!(app.table().is_placeholder());
    assert!(!app.table().is_empty());
}

#[test]
fn forced_update_failure_leaves_table_untouched() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let id = store.insert(&globex()).unwrap();
    store
        .connection()
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER reject_updates BEFORE UPDATE ON customers
             BEGIN SELECT RAISE(ABORT, 'read only'); END;",
        )
        .unwrap();

    let direct = store.update(id, &globex());
    assert!(matches!(direct, Err(StoreError::Statement { .. })));

    let mut app = App::new(Box::new(store));
    let before = app.table().rows().to_vec();

    app.edit();
    app.handle_key(KeyCode::Char('!'));
    app.handle_key(KeyCode::Enter);

    assert_eq!(app.alert(), Some("Failed to update customer."));
    assert_eq!(app.table().rows(), before.as_slice());
}
