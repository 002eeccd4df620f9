use mailcamp_core::domain::CustomFields;
use mailcamp_core::CoreError;
use mailcamp_store::error::StoreError;
use mailcamp_store::repo::{ContactNew, ContactUpdate};
use mailcamp_store::Store;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn ada() -> ContactNew {
    let mut custom_fields = CustomFields::new();
    custom_fields.insert("department".to_string(), "Engineering".to_string());
    ContactNew {
        email: "Ada@Example.com".to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        company: Some("Analytical Engines".to_string()),
        custom_fields,
    }
}

#[test]
fn contact_crud_roundtrip() {
    let store = store();
    let now = 1_700_000_000;

    let contact = store.contacts().create(now, ada()).expect("create contact");
    assert_eq!(contact.email, "ada@example.com");

    let fetched = store
        .contacts()
        .get_by_email("ADA@example.com ")
        .expect("get contact")
        .expect("contact exists");
    assert_eq!(fetched, contact);

    let mut fields = CustomFields::new();
    fields.insert("city".to_string(), "London".to_string());
    let updated = store
        .contacts()
        .update(
            now + 10,
            "ada@example.com",
            ContactUpdate {
                last_name: Some(Some("Byron".to_string())),
                company: Some(None),
                custom_fields: Some(fields.clone()),
                ..Default::default()
            },
        )
        .expect("update contact");
    assert_eq!(updated.first_name.as_deref(), Some("Ada"));
    assert_eq!(updated.last_name.as_deref(), Some("Byron"));
    assert!(updated.company.is_none());
    assert_eq!(updated.custom_fields, fields);
    assert_eq!(updated.updated_at, now + 10);

    store.contacts().delete("ada@example.com").expect("delete contact");
    assert!(store
        .contacts()
        .get_by_email("ada@example.com")
        .expect("get contact")
        .is_none());
}

#[test]
fn create_rejects_duplicate_email_case_insensitively() {
    let store = store();
    store.contacts().create(1, ada()).expect("create contact");

    let err = store
        .contacts()
        .create(
            2,
            ContactNew {
                email: "ada@EXAMPLE.com".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail(ref email) if email == "ada@example.com"));
    assert_eq!(store.contacts().list_all().expect("list").len(), 1);
}

#[test]
fn create_rejects_invalid_email() {
    let store = store();
    for email in ["", "not-an-email", "ada@localhost"] {
        let err = store
            .contacts()
            .create(
                1,
                ContactNew {
                    email: email.to_string(),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(
            matches!(err, StoreError::Core(CoreError::InvalidEmail(_))),
            "unexpected error for {email:?}: {err}"
        );
    }
    assert!(store.contacts().list_all().expect("list").is_empty());
}

#[test]
fn blank_optional_fields_are_stored_as_none() {
    let store = store();
    let contact = store
        .contacts()
        .create(
            1,
            ContactNew {
                email: "grace@example.com".to_string(),
                first_name: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .expect("create contact");
    assert!(contact.first_name.is_none());
}

#[test]
fn update_and_delete_missing_contact_report_not_found() {
    let store = store();
    let err = store
        .contacts()
        .update(1, "ghost@example.com", ContactUpdate::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    let err = store.contacts().delete("ghost@example.com").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}
