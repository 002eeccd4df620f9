use mailcamp_store::error::StoreError;
use mailcamp_store::repo::ContactNew;
use mailcamp_store::Store;

fn store_with_contacts(emails: &[&str]) -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    for email in emails {
        store
            .contacts()
            .create(
                1,
                ContactNew {
                    email: email.to_string(),
                    ..Default::default()
                },
            )
            .expect("create contact");
    }
    store
}

fn emails(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn add_members_skips_unknown_and_existing_emails() {
    let store = store_with_contacts(&["ada@example.com", "grace@example.com"]);
    let list = store
        .lists()
        .create(1, "Newsletter", "Main newsletter list")
        .expect("create list");

    let added = store
        .lists()
        .add_members(
            2,
            "Newsletter",
            &emails(&["Ada@Example.com", "nobody@example.com", "grace@example.com"]),
        )
        .expect("add members");
    assert_eq!(added, 2);

    let again = store
        .lists()
        .add_members(3, "Newsletter", &emails(&["ada@example.com"]))
        .expect("add again");
    assert_eq!(again, 0);

    let members = store.lists().members(list.id).expect("members");
    assert_eq!(members, emails(&["ada@example.com", "grace@example.com"]));
}

#[test]
fn membership_survives_contact_deletion_but_contacts_skip_it() {
    let store = store_with_contacts(&["ada@example.com", "grace@example.com"]);
    let list = store.lists().create(1, "Team", "").expect("create list");
    store
        .lists()
        .add_members(2, "Team", &emails(&["ada@example.com", "grace@example.com"]))
        .expect("add members");

    store.contacts().delete("ada@example.com").expect("delete contact");

    let members = store.lists().members(list.id).expect("members");
    assert_eq!(members.len(), 2);
    let contacts = store.lists().contacts(list.id).expect("contacts");
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].email, "grace@example.com");
}

#[test]
fn remove_members_and_counts() {
    let store = store_with_contacts(&["ada@example.com", "grace@example.com"]);
    store.lists().create(1, "Team", "").expect("create list");
    store.lists().create(1, "Empty", "").expect("create list");
    store
        .lists()
        .add_members(2, "Team", &emails(&["ada@example.com", "grace@example.com"]))
        .expect("add members");

    let removed = store
        .lists()
        .remove_members("Team", &emails(&["GRACE@example.com", "nobody@example.com"]))
        .expect("remove members");
    assert_eq!(removed, 1);

    let counts: Vec<(String, i64)> = store
        .lists()
        .list_with_counts()
        .expect("list counts")
        .into_iter()
        .map(|(list, count)| (list.name, count))
        .collect();
    assert_eq!(
        counts,
        vec![("Empty".to_string(), 0), ("Team".to_string(), 1)]
    );
}

#[test]
fn list_names_are_unique() {
    let store = store_with_contacts(&[]);
    store.lists().create(1, "Team", "").expect("create list");
    let err = store.lists().create(2, "Team", "again").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName { kind: "contact list", .. }));
}

#[test]
fn missing_list_reports_not_found() {
    let store = store_with_contacts(&["ada@example.com"]);
    let err = store
        .lists()
        .add_members(1, "Nope", &emails(&["ada@example.com"]))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    let err = store.lists().delete("Nope").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn delete_list_drops_membership() {
    let store = store_with_contacts(&["ada@example.com"]);
    let list = store.lists().create(1, "Team", "").expect("create list");
    store
        .lists()
        .add_members(2, "Team", &emails(&["ada@example.com"]))
        .expect("add members");

    store.lists().delete("Team").expect("delete list");
    assert!(store.lists().get(list.id).expect("get").is_none());
    assert!(store.lists().members(list.id).expect("members").is_empty());
}
