//! Database integration tests
//!
//! These tests exercise the TursoClient credential store, in memory and on disk.

use expense_manager::{
    db::find_user_with_timeout,
    types::{AppError, NewUser},
    CredentialStore, TursoClient,
};
use serde_json::json;
use std::time::Duration;

/// Test helper to create a TursoClient with in-memory database
async fn create_test_client() -> TursoClient {
    TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database")
}

fn new_user(user_name: &str) -> NewUser {
    NewUser {
        user_name: user_name.to_string(),
        password_hash: "hashed_password_here".to_string(),
        full_name: "Test User".to_string(),
    }
}

#[tokio::test]
async fn test_create_and_find_user() {
    let client = create_test_client().await;

    let created = client.create_user(&new_user("alice")).await.unwrap();
    assert_eq!(created.user_name, "alice");
    assert!(created.expense_manager_data.is_none());

    let found = client
        .find_by_user_name("alice")
        .await
        .unwrap()
        .expect("alice should exist");
    assert_eq!(found.user_name, "alice");
    assert_eq!(found.password_hash, "hashed_password_here");
    assert_eq!(found.full_name, "Test User");
    assert_eq!(found.created_at, created.created_at);
}

#[tokio::test]
async fn test_find_unknown_user() {
    let client = create_test_client().await;

    let found = client.find_by_user_name("nobody").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_user_names_are_case_sensitive() {
    let client = create_test_client().await;
    client.create_user(&new_user("alice")).await.unwrap();

    assert!(client.find_by_user_name("Alice").await.unwrap().is_none());
    assert!(client.create_user(&new_user("Alice")).await.is_ok());
}

#[tokio::test]
async fn test_create_duplicate_user_fails() {
    let client = create_test_client().await;
    client.create_user(&new_user("alice")).await.unwrap();

    let result = client.create_user(&new_user("alice")).await;

    match result {
        Err(AppError::Validation { message, location }) => {
            assert_eq!(message, "Username already taken");
            assert_eq!(location, "userName");
        }
        other => panic!("expected validation error, got {:?}", other.map(|u| u.user_name)),
    }
}

#[tokio::test]
async fn test_list_users_in_insertion_order() {
    let client = create_test_client().await;
    assert!(client.list_users().await.unwrap().is_empty());

    for name in ["carol", "alice", "bob"] {
        client.create_user(&new_user(name)).await.unwrap();
    }

    let names: Vec<String> = client
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.user_name)
        .collect();
    assert_eq!(names, vec!["carol", "alice", "bob"]);
}

#[tokio::test]
async fn test_set_expense_manager_data() {
    let client = create_test_client().await;
    client.create_user(&new_user("alice")).await.unwrap();

    let data = json!({ "expenses": [{ "label": "rent", "amount": 800 }] });
    assert!(client.set_expense_manager_data("alice", &data).await.unwrap());
    assert!(!client.set_expense_manager_data("nobody", &data).await.unwrap());

    let found = client.find_by_user_name("alice").await.unwrap().unwrap();
    assert_eq!(found.expense_manager_data, Some(data));
}

#[tokio::test]
async fn test_find_user_with_timeout() {
    let client = create_test_client().await;
    client.create_user(&new_user("alice")).await.unwrap();

    let found = find_user_with_timeout(&client, "alice", Duration::from_secs(5))
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn test_file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("users.db");
    let path = path.to_str().unwrap();

    {
        let client = TursoClient::new_local(path)
            .await
            .expect("Failed to create local database");
        client.create_user(&new_user("alice")).await.unwrap();
    }

    let reopened = TursoClient::new_local(path)
        .await
        .expect("Failed to reopen local database");
    let found = reopened.find_by_user_name("alice").await.unwrap();
    assert!(found.is_some());

    let duplicate = reopened.create_user(&new_user("alice")).await;
    assert!(matches!(duplicate, Err(AppError::Validation { .. })));
}
