//! User storage integration tests


use qresume_core::{CoreError, Details, DetailsUpdate, User, UserStore};
use qresume_storage::{users, StorageError};
use std::time::Duration;
use test_helpers::TestDb;

fn sample_update() -> DetailsUpdate {
    DetailsUpdate {
        name: "Ada Lovelace".to_string(),
        details: Details {
            phone: "+44 20 7946 0000".to_string(),
            linkedin: "https://linkedin.com/in/ada".to_string(),
            github: "https://github.com/ada".to_string(),
            leetcode: "https://leetcode.com/ada".to_string(),
            geeks_for_geeks: String::new(),
            scaler: "https://scaler.com/ada".to_string(),
            qr_code_url: "http://localhost:8080/qrcodes/ada@example.com_combined.png".to_string(),
            qr_code_leetcode: "http://localhost:8080/qrcodes/ada@example.com_leetcode.png"
                .to_string(),
            qr_code_scaler: String::new(),
            qr_code_geeks_for_geeks: String::new(),
        },
        qr_code_path: Some("/tmp/qrcodes/ada@example.com_combined.png".to_string()),
    }
}

#[tokio::test]
async fn test_create_and_fetch_user() {
    let db = TestDb::new().await;
    let store = db.store();

    let user = User::new("ada@example.com", "$2b$04$hash");
    store.create_user(&user).await.unwrap();

    let by_email = store
        .get_user_by_email("ada@example.com")
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(by_email.id, user.id);
    assert_eq!(by_email.password_hash, "$2b$04$hash");
    assert_eq!(by_email.details, Details::default());
    assert!(by_email.qr_code_path.is_none());

    let by_id = store
        .get_user_by_id(user.id.as_str())
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(by_id.email, "ada@example.com");
}

#[tokio::test]
async fn test_missing_user_is_none() {
    let db = TestDb::new().await;
    let store = db.store();

    assert!(store
        .get_user_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_reported_as_duplicate() {
    let db = TestDb::new().await;

    users::create(&db.pool, &User::new("ada@example.com", "first"))
        .await
        .unwrap();

    let err = users::create(&db.pool, &User::new("ada@example.com", "second"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, StorageError::Duplicate(_)),
        "expected duplicate, got {err:?}"
    );

    // Through the trait the same failure becomes a core duplicate
    let err = db
        .store()
        .create_user(&User::new("ada@example.com", "third"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());

    // The original row is untouched
    let stored = users::get_by_email(&db.pool, "ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.password_hash, "first");
}

#[tokio::test]
async fn test_update_by_email_overwrites_profile_only() {
    let db = TestDb::new().await;
    let store = db.store();

    let user = User::new("ada@example.com", "hash");
    store.create_user(&user).await.unwrap();

    let update = sample_update();
    let updated = store
        .update_by_email("ada@example.com", &update)
        .await
        .unwrap();

    assert_eq!(updated.id, user.id);
    assert_eq!(updated.password_hash, "hash");
    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.details, update.details);
    assert_eq!(updated.qr_code_path, update.qr_code_path);
    assert!(updated.updated_at >= user.created_at);

    // A second update with cleared links replaces, not merges
    let cleared = DetailsUpdate {
        name: "Ada".to_string(),
        details: Details::default(),
        qr_code_path: None,
    };
    let updated = store
        .update_by_email("ada@example.com", &cleared)
        .await
        .unwrap();
    assert_eq!(updated.details, Details::default());
    assert!(updated.qr_code_path.is_none());
}

#[tokio::test]
async fn test_update_unknown_email_is_not_found() {
    let db = TestDb::new().await;

    let err = db
        .store()
        .update_by_email("ghost@example.com", &sample_update())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_get_all_users_sorted_by_email() {
    let db = TestDb::new().await;
    let store = db.store();

    for email in ["zoe@example.com", "ada@example.com", "max@example.com"] {
        store.create_user(&User::new(email, "hash")).await.unwrap();
    }

    let emails: Vec<String> = store
        .get_all_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.email)
        .collect();
    assert_eq!(
        emails,
        vec!["ada@example.com", "max@example.com", "zoe@example.com"]
    );
}

#[tokio::test]
async fn test_in_memory_pool_shares_one_database() {
    let pool = qresume_storage::create_pool("sqlite::memory:").await.unwrap();
    qresume_storage::run_migrations(&pool).await.unwrap();

    users::create(&pool, &User::new("ada@example.com", "hash"))
        .await
        .unwrap();

    // A second query must see the row, so it has to hit the same connection
    let all = users::get_all(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_connect_with_retry_gives_up_after_fixed_attempts() {
    let temp_dir = tempfile::tempdir().unwrap();
    // A database file inside a missing directory can never be created
    let url = format!(
        "sqlite://{}",
        temp_dir.path().join("missing/dir/test.db").display()
    );

    let err = qresume_storage::connect_with_retry(&url, 2, Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Connection(_)));
}

#[tokio::test]
async fn test_connect_with_retry_succeeds_first_time() {
    let temp_dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", temp_dir.path().join("ok.db").display());

    let pool = qresume_storage::connect_with_retry(&url, 3, Duration::from_millis(10))
        .await
        .unwrap();
    qresume_storage::run_migrations(&pool).await.unwrap();
}
