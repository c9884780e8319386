//! End-to-end directory behaviour over the in-memory store

use std::sync::Arc;

use directory::models::ProfileRow;
use directory::store::{InMemoryProfileStore, StoreFault};
use directory::{DirectoryConfig, EXISTS_ON_ERROR, Outcome, UserDirectory, UserProfile};

fn setup() -> (InMemoryProfileStore, UserDirectory) {
    let store = InMemoryProfileStore::new();
    let directory = UserDirectory::new(Arc::new(store.clone()), DirectoryConfig::default());
    (store, directory)
}

fn full_profile(username: &str, lastname: &str) -> UserProfile {
    UserProfile::new(username, format!("{}@example.com", username), "pw")
        .with_name("Pat", lastname)
        .with_company("Acme", "Engineer")
        .with_department("Platform")
        .with_work_address("1 Main St", "Springfield", "IL", "62701")
        .with_phone("555-0100")
}

fn seeded_row(username: &str, lastname: &str, department: Option<&str>) -> ProfileRow {
    ProfileRow {
        id: 0,
        firstname: "Sam".to_string(),
        lastname: lastname.to_string(),
        email: format!("{}@example.com", username),
        company: "Acme".to_string(),
        department: department.map(str::to_string),
        title: "Analyst".to_string(),
        work_address: "2 Side St".to_string(),
        work_city: "Shelbyville".to_string(),
        work_state: "IL".to_string(),
        work_zip: "62565".to_string(),
        phone: "555-0199".to_string(),
        username: username.to_string(),
    }
}

#[tokio::test]
async fn test_insert_then_search_by_last_name() {
    let (_store, directory) = setup();

    let profile = UserProfile::new("jdoe", "jdoe@example.com", "s3cret").with_name("John", "Doe");
    let outcome = directory.insert_user(&profile).await;

    assert!(outcome.write_succeeded());
    assert!(outcome.verified_exists_after_write());
    assert!(directory.user_exists("jdoe", "jdoe@example.com").await);

    let found = directory.search_by_last_name("Doe").await.into_profiles();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].email, "jdoe@example.com");
    assert_eq!(found[0].department, "");
    assert_eq!(found[0].firstname, "John");
    assert!(found[0].id.is_some());
}

#[tokio::test]
async fn test_absent_user_does_not_exist() {
    let (_store, directory) = setup();
    directory.insert_user(&full_profile("alice", "Smith")).await;

    assert!(!directory.user_exists("bob", "bob@example.com").await);
    assert!(
        !directory
            .check_user_exists("bob", "bob@example.com")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_duplicate_insert_reports_existing_row() {
    let (store, directory) = setup();
    directory.insert_user(&full_profile("alice", "Smith")).await;

    let duplicate = UserProfile::new("alice", "different@example.com", "pw").with_name("A", "Smith");
    let outcome = directory.insert_user(&duplicate).await;

    assert!(!outcome.write_succeeded());
    assert!(outcome.write_error.as_ref().unwrap().is_store_error());
    // A row with that username is present, so the post-check still says yes
    assert!(outcome.verified_exists_after_write());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_store_fault_makes_existence_fail_safe() {
    let (store, directory) = setup();
    store.set_fault(Some(StoreFault::Connection)).await;

    assert_eq!(
        directory.user_exists("ghost", "ghost@example.com").await,
        EXISTS_ON_ERROR
    );
    assert!(directory.user_exists("ghost", "ghost@example.com").await);
}

#[tokio::test]
async fn test_insert_during_outage_reports_write_error_and_fail_safe_check() {
    let (store, directory) = setup();
    store.set_fault(Some(StoreFault::Connection)).await;

    let outcome = directory.insert_user(&full_profile("carol", "Jones")).await;

    assert!(!outcome.write_succeeded());
    assert!(outcome.verified_exists_after_write());

    store.set_fault(None).await;
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_search_matches_exact_last_name_only() {
    let (_store, directory) = setup();
    directory.insert_user(&full_profile("s1", "Smith")).await;
    directory.insert_user(&full_profile("s2", "Smith")).await;
    directory.insert_user(&full_profile("s3", "smith")).await;
    directory.insert_user(&full_profile("s4", "Smithers")).await;

    let found = directory.search_by_last_name("Smith").await.into_profiles();
    assert_eq!(found.len(), 2);

    let mut emails: Vec<String> = found.iter().map(|p| p.email.clone()).collect();
    emails.sort();
    assert_eq!(emails, vec!["s1@example.com", "s2@example.com"]);

    for profile in &found {
        assert_eq!(profile.lastname, "Smith");
        assert_eq!(profile.department, "Platform");
        // Outside the search projection
        assert!(profile.company.is_empty());
        assert!(profile.phone.is_empty());
        assert!(profile.username.is_empty());
        assert!(profile.password.is_empty());
    }
}

#[tokio::test]
async fn test_search_maps_null_department_to_empty() {
    let (store, directory) = setup();
    store.seed(seeded_row("nodept", "Brown", None), "pw").await;

    let found = directory.search_by_last_name("Brown").await.into_profiles();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].department, "");
}

#[tokio::test]
async fn test_search_distinguishes_no_match_from_failure() {
    let (store, directory) = setup();

    assert!(directory.search_by_last_name("Nobody").await.is_empty());

    store.set_fault(Some(StoreFault::Query)).await;
    let failed = directory.search_by_last_name("Nobody").await;
    assert!(failed.is_failed());
    assert!(failed.into_profiles().is_empty());

    store.set_fault(Some(StoreFault::Mapping)).await;
    let outcome = directory.search_by_last_name("Nobody").await;
    assert_eq!(outcome.error().map(|e| e.category()), Some("mapping"));
}

#[tokio::test]
async fn test_search_by_department_and_list_all() {
    let (store, directory) = setup();
    directory.insert_user(&full_profile("p1", "Smith")).await;
    directory
        .insert_user(&full_profile("s1", "Jones").with_department("Sales"))
        .await;
    store.seed(seeded_row("nodept", "Brown", None), "pw").await;

    let platform = directory.search_by_department("Platform").await.into_profiles();
    assert_eq!(platform.len(), 1);
    assert_eq!(platform[0].lastname, "Smith");

    // Unset departments are NULL in the store and never match
    assert!(directory.search_by_department("").await.is_empty());

    let all = directory.list_all().await.into_profiles();
    assert_eq!(all.len(), 3);
    assert!(all.iter().any(|p| p.lastname == "Brown" && p.department.is_empty()));
}

#[tokio::test]
async fn test_access_update_and_delete_by_id() {
    let (_store, directory) = setup();
    directory.insert_user(&full_profile("dana", "White")).await;

    let id = directory.search_by_last_name("White").await.into_profiles()[0]
        .id
        .unwrap();

    let mut profile = directory.access_profile(id).await.into_value().unwrap();
    assert_eq!(profile.username, "dana");
    assert_eq!(profile.work_city, "Springfield");
    assert!(profile.password.is_empty());

    profile.title = "Manager".to_string();
    profile.department = "Operations".to_string();
    assert!(directory.update_profile(&profile).await.applied());

    let updated = directory.access_profile(id).await.into_value().unwrap();
    assert_eq!(updated.title, "Manager");
    assert_eq!(updated.department, "Operations");
    assert_eq!(updated.username, "dana");

    assert!(directory.delete_user(id).await.applied());
    assert!(directory.access_profile(id).await.is_empty());
    assert!(directory.delete_user(id).await.is_empty());
    assert!(!directory.user_exists("dana", "dana@example.com").await);
}

#[tokio::test]
async fn test_update_of_missing_row_is_empty() {
    let (_store, directory) = setup();

    let mut ghost = full_profile("ghost", "Gray");
    ghost.id = Some(42);

    assert!(directory.update_profile(&ghost).await.is_empty());
}

#[tokio::test]
async fn test_update_of_missing_row_with_taken_email_is_empty() {
    let (_store, directory) = setup();
    directory.insert_user(&full_profile("holder", "Green")).await;

    let mut ghost = full_profile("ghost", "Gray");
    ghost.email = "holder@example.com".to_string();
    ghost.id = Some(42);

    assert!(directory.update_profile(&ghost).await.is_empty());
}

#[tokio::test]
async fn test_profile_without_department_is_not_found_by_empty_department() {
    let (_store, directory) = setup();
    directory
        .insert_user(&UserProfile::new("jdoe", "jdoe@example.com", "pw").with_name("John", "Doe"))
        .await;

    assert!(directory.search_by_department("").await.is_empty());

    let profile = directory.access_profile(1).await.into_value().unwrap();
    assert_eq!(profile.department, "");
}

#[tokio::test]
async fn test_every_operation_releases_its_connection() {
    let (store, directory) = setup();
    directory.insert_user(&full_profile("erin", "Black")).await;
    directory.search_by_last_name("Black").await;
    directory.access_profile(1).await;

    store.set_fault(Some(StoreFault::Query)).await;
    directory.insert_user(&full_profile("frank", "Black")).await;
    directory.list_all().await;
    directory.delete_user(1).await;

    assert_eq!(store.open_connections(), 0);
    assert!(store.acquired_connections() > 0);
}

#[tokio::test]
async fn test_failed_outcomes_keep_their_cause() {
    let (store, directory) = setup();
    store.set_fault(Some(StoreFault::Connection)).await;

    match directory.access_profile(1).await {
        Outcome::Failed(err) => assert!(err.is_store_error()),
        other => panic!("expected failure, got {:?}", other),
    }
}
