// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use blog_membership::services::DelegatingPasswordEncoder;
use blog_membership::types::internal::NewMember;
use blog_membership::AppData;
use migration::{BlogMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

pub const TEST_PEPPER: &str = "integration-test-pepper";

/// Creates an in-memory blog database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    BlogMigrator::up(&db, None)
        .await
        .expect("Failed to run blog migrations");

    db
}

/// Creates AppData wired the way the binary wires it
pub async fn setup_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::new(
        db,
        Arc::new(DelegatingPasswordEncoder::with_pepper(TEST_PEPPER)),
    ))
}

pub fn registration(username: &str, password: &str) -> NewMember {
    NewMember {
        username: username.to_string(),
        password: password.to_string(),
        name: "Member1".to_string(),
        nick_name: "NickName1".to_string(),
        age: 22,
    }
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
