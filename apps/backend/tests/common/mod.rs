//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for creating test data
//! - Cleanup helpers for rows created by a test
//!
//! # Requirements
//! Database-backed tests require a PostgreSQL database (set DATABASE_URL).
//! Tests built on `TestContext::without_database` need nothing running.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use classroom_backend::db::Database;
use classroom_backend::models::{DbUser, NewUser, Role};
use classroom_backend::{build_router, AppState};

/// Test context containing database connection and router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context against a real database.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self::with_database(db)
    }

    /// Create a context whose pool never connects unless a query runs.
    ///
    /// Use this for requests that are rejected before reaching storage.
    pub fn without_database() -> Self {
        let db = Database::connect_lazy("postgres://nobody@127.0.0.1:1/unused")
            .expect("Failed to build lazy pool");
        Self::with_database(db)
    }

    fn with_database(db: Database) -> Self {
        let db = Arc::new(db);
        let app = build_router(AppState { db: db.clone() });
        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }

    /// Create a student directly in the database.
    pub async fn create_student(&self, email: &str, password: &str) -> DbUser {
        self.db
            .create_user(NewUser {
                name: "Test Student".to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role: Role::Student,
                class_name: Some("3A".to_string()),
            })
            .await
            .expect("Failed to create test student")
    }

    /// Remove a user and everything that references them.
    pub async fn cleanup_user(&self, user_id: &str) {
        let _ = sqlx::query("DELETE FROM results WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM student_schedules WHERE student_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }

    pub async fn cleanup_user_by_email(&self, email: &str) {
        if let Ok(Some(user)) = self.db.get_user_by_email(email).await {
            self.cleanup_user(&user.id).await;
        }
    }

    pub async fn cleanup_exam(&self, exam_id: &str) {
        let _ = sqlx::query("DELETE FROM results WHERE exam_id = $1")
            .bind(exam_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(exam_id)
            .execute(self.db.pool())
            .await;
    }

    pub async fn cleanup_lesson(&self, lesson_id: &str) {
        let _ = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(self.db.pool())
            .await;
    }

    pub async fn cleanup_module(&self, module_id: &str) {
        let _ = sqlx::query("UPDATE lessons SET module_id = NULL WHERE module_id = $1")
            .bind(module_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(module_id)
            .execute(self.db.pool())
            .await;
    }
}
