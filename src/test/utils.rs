// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{BlogMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::services::DelegatingPasswordEncoder;
use crate::types::internal::{Member, NewMember, NewPost};

pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

/// Creates an in-memory database with the blog schema applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    BlogMigrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates AppData over a fresh in-memory database
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::new(db, Arc::new(test_encoder())))
}

pub fn test_encoder() -> DelegatingPasswordEncoder {
    DelegatingPasswordEncoder::with_pepper(TEST_PEPPER)
}

/// Transient member with the fixture profile used across store tests
pub fn new_member(username: &str) -> Member {
    Member::new(NewMember {
        username: username.to_string(),
        password: "1234567890".to_string(),
        name: "Member1".to_string(),
        nick_name: "NickName1".to_string(),
        age: 22,
    })
}

pub fn new_post(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: format!("content of {}", title),
    }
}
