//! PostgreSQL database operations
//!
//! Single-statement writes rely on PostgreSQL's implicit transaction.
//! Anything touching more than one statement opens an explicit transaction;
//! returning early drops it, which rolls it back.

use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::credentials;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that opens connections on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Insert a user, hashing the plaintext password
    pub async fn create_user(&self, user: NewUser) -> Result<DbUser> {
        let password = credentials::hash_password(&user.password)?;

        let created = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (id, name, email, password, role, class_name, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING id, name, email, password, role, class_name, is_active
            "#,
        )
        .bind(new_id())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&password)
        .bind(user.role.as_str())
        .bind(&user.class_name)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = %created.id, role = %created.role, "created user");
        Ok(created)
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, name, email, password, role, class_name, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, name, email, password, role, class_name, is_active
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<DbUser>> {
        let users = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, name, email, password, role, class_name, is_active
            FROM users
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Apply a partial update to a user
    pub async fn update_user(&self, id: &str, changes: UserChanges) -> Result<DbUser> {
        // Hash before locking the row.
        let password = changes
            .password
            .as_deref()
            .map(credentials::hash_password)
            .transpose()?;

        let mut tx = self.pool.begin().await?;

        let mut user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, name, email, password, role, class_name, is_active
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password) = password {
            user.password = password;
        }
        if let Some(role) = changes.role {
            user.role = role.as_str().to_string();
        }
        if let Some(class_name) = changes.class_name {
            user.class_name = class_name;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }

        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password = $4, role = $5, class_name = $6, is_active = $7
            WHERE id = $1
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.role)
        .bind(&user.class_name)
        .bind(user.is_active)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user.id, "updated user");
        Ok(user)
    }

    /// Re-hash and store a new password
    pub async fn update_password(&self, user_id: &str, new_password: &str) -> Result<()> {
        let changes = UserChanges {
            password: Some(new_password.to_string()),
            ..Default::default()
        };
        self.update_user(user_id, changes).await.map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            other => other,
        })?;
        Ok(())
    }

    /// Delete a user together with their results and schedule
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let results = sqlx::query("DELETE FROM results WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM student_schedules WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApiError::NotFound("Student not found".to_string()));
        }

        tx.commit().await?;

        tracing::info!(
            user_id = %id,
            results = results.rows_affected(),
            "deleted user"
        );
        Ok(())
    }

    // === Module Repository ===

    pub async fn create_module(&self, module: NewModule) -> Result<Module> {
        let created = sqlx::query_as::<_, Module>(
            r#"
            INSERT INTO modules (id, name, description, class_name, sort_order, is_visible)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, class_name, sort_order, is_visible
            "#,
        )
        .bind(new_id())
        .bind(&module.name)
        .bind(&module.description)
        .bind(&module.class_name)
        .bind(module.sort_order)
        .bind(module.is_visible)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_module(&self, id: &str) -> Result<Option<Module>> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, name, description, class_name, sort_order, is_visible
            FROM modules
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(module)
    }

    /// List modules, optionally for one class
    pub async fn list_modules(&self, class_name: Option<&str>) -> Result<Vec<Module>> {
        let modules = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, name, description, class_name, sort_order, is_visible
            FROM modules
            WHERE $1::text IS NULL OR class_name = $1
            ORDER BY sort_order, name
            "#,
        )
        .bind(class_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(modules)
    }

    pub async fn update_module(&self, id: &str, changes: ModuleChanges) -> Result<Module> {
        let mut tx = self.pool.begin().await?;

        let mut module = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, name, description, class_name, sort_order, is_visible
            FROM modules
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

        if let Some(name) = changes.name {
            module.name = name;
        }
        if let Some(description) = changes.description {
            module.description = description;
        }
        if let Some(class_name) = changes.class_name {
            module.class_name = class_name;
        }
        if let Some(sort_order) = changes.sort_order {
            module.sort_order = sort_order;
        }
        if let Some(is_visible) = changes.is_visible {
            module.is_visible = is_visible;
        }

        sqlx::query(
            r#"
            UPDATE modules
            SET name = $2, description = $3, class_name = $4, sort_order = $5, is_visible = $6
            WHERE id = $1
            "#,
        )
        .bind(&module.id)
        .bind(&module.name)
        .bind(&module.description)
        .bind(&module.class_name)
        .bind(module.sort_order)
        .bind(module.is_visible)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(module)
    }

    /// Delete a module; its lessons are kept and detached
    pub async fn delete_module(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let detached = sqlx::query("UPDATE lessons SET module_id = NULL WHERE module_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApiError::NotFound("Module not found".to_string()));
        }

        tx.commit().await?;

        tracing::info!(module_id = %id, lessons = detached.rows_affected(), "deleted module");
        Ok(())
    }

    // === Lesson Repository ===

    pub async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson> {
        let created = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (id, title, description, class_name, module_id,
                                 sort_order, is_visible, slides, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, class_name, module_id,
                      sort_order, is_visible, slides, created_at
            "#,
        )
        .bind(new_id())
        .bind(&lesson.title)
        .bind(&lesson.description)
        .bind(&lesson.class_name)
        .bind(&lesson.module_id)
        .bind(lesson.sort_order)
        .bind(lesson.is_visible)
        .bind(Json(&lesson.slides))
        .bind(now_millis())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_lesson(&self, id: &str) -> Result<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, title, description, class_name, module_id,
                   sort_order, is_visible, slides, created_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lesson)
    }

    /// Only the slides of a lesson
    pub async fn get_lesson_slides(&self, id: &str) -> Result<Option<Vec<String>>> {
        let slides = sqlx::query_scalar::<_, Json<Vec<String>>>(
            "SELECT slides FROM lessons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slides.map(|Json(s)| s))
    }

    /// List lessons without slides, optionally for one class
    pub async fn list_lessons(&self, class_name: Option<&str>) -> Result<Vec<LessonSummary>> {
        let lessons = sqlx::query_as::<_, LessonSummary>(
            r#"
            SELECT id, title, description, class_name, module_id,
                   sort_order, is_visible, created_at
            FROM lessons
            WHERE $1::text IS NULL OR class_name = $1
            ORDER BY sort_order, created_at
            "#,
        )
        .bind(class_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    pub async fn update_lesson(&self, id: &str, changes: LessonChanges) -> Result<Lesson> {
        let mut tx = self.pool.begin().await?;

        let mut lesson = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, title, description, class_name, module_id,
                   sort_order, is_visible, slides, created_at
            FROM lessons
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

        if let Some(title) = changes.title {
            lesson.title = title;
        }
        if let Some(description) = changes.description {
            lesson.description = description;
        }
        if let Some(class_name) = changes.class_name {
            lesson.class_name = class_name;
        }
        if let Some(module_id) = changes.module_id {
            lesson.module_id = module_id;
        }
        if let Some(sort_order) = changes.sort_order {
            lesson.sort_order = sort_order;
        }
        if let Some(is_visible) = changes.is_visible {
            lesson.is_visible = is_visible;
        }
        if let Some(slides) = changes.slides {
            lesson.slides = Json(slides);
        }

        sqlx::query(
            r#"
            UPDATE lessons
            SET title = $2, description = $3, class_name = $4, module_id = $5,
                sort_order = $6, is_visible = $7, slides = $8
            WHERE id = $1
            "#,
        )
        .bind(&lesson.id)
        .bind(&lesson.title)
        .bind(&lesson.description)
        .bind(&lesson.class_name)
        .bind(&lesson.module_id)
        .bind(lesson.sort_order)
        .bind(lesson.is_visible)
        .bind(&lesson.slides)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(lesson)
    }

    pub async fn delete_lesson(&self, id: &str) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApiError::NotFound("Lesson not found".to_string()));
        }
        Ok(())
    }

    // === Exam Repository ===

    pub async fn create_exam(&self, exam: NewExam) -> Result<Exam> {
        let created = sqlx::query_as::<_, Exam>(
            r#"
            INSERT INTO exams (id, title, class_name, duration, questions, confirm_on_submit)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, class_name, duration, questions, confirm_on_submit
            "#,
        )
        .bind(new_id())
        .bind(&exam.title)
        .bind(&exam.class_name)
        .bind(exam.duration)
        .bind(Json(&exam.questions))
        .bind(exam.confirm_on_submit)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_exam(&self, id: &str) -> Result<Option<Exam>> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, title, class_name, duration, questions, confirm_on_submit
            FROM exams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exam)
    }

    /// List exams, optionally for one class
    pub async fn list_exams(&self, class_name: Option<&str>) -> Result<Vec<Exam>> {
        let exams = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, title, class_name, duration, questions, confirm_on_submit
            FROM exams
            WHERE $1::text IS NULL OR class_name = $1
            ORDER BY title, id
            "#,
        )
        .bind(class_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(exams)
    }

    pub async fn update_exam(&self, id: &str, changes: ExamChanges) -> Result<Exam> {
        let mut tx = self.pool.begin().await?;

        let mut exam = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, title, class_name, duration, questions, confirm_on_submit
            FROM exams
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

        if let Some(title) = changes.title {
            exam.title = title;
        }
        if let Some(class_name) = changes.class_name {
            exam.class_name = class_name;
        }
        if let Some(duration) = changes.duration {
            exam.duration = duration;
        }
        if let Some(questions) = changes.questions {
            exam.questions = Json(questions);
        }
        if let Some(confirm_on_submit) = changes.confirm_on_submit {
            exam.confirm_on_submit = confirm_on_submit;
        }

        sqlx::query(
            r#"
            UPDATE exams
            SET title = $2, class_name = $3, duration = $4, questions = $5, confirm_on_submit = $6
            WHERE id = $1
            "#,
        )
        .bind(&exam.id)
        .bind(&exam.title)
        .bind(&exam.class_name)
        .bind(exam.duration)
        .bind(&exam.questions)
        .bind(exam.confirm_on_submit)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(exam)
    }

    /// Delete an exam together with all of its results
    pub async fn delete_exam(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let results = sqlx::query("DELETE FROM results WHERE exam_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApiError::NotFound("Exam not found".to_string()));
        }

        tx.commit().await?;

        tracing::info!(exam_id = %id, results = results.rows_affected(), "deleted exam");
        Ok(())
    }

    // === Result Repository ===

    pub async fn get_result(&self, id: &str) -> Result<Option<ExamResult>> {
        let result = sqlx::query_as::<_, ExamResult>(
            r#"
            SELECT id, user_id, exam_id, score, total, submitted_at, student_answers
            FROM results
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// List results, optionally filtered by user and/or exam
    pub async fn list_results(
        &self,
        user_id: Option<&str>,
        exam_id: Option<&str>,
    ) -> Result<Vec<ExamResult>> {
        let results = sqlx::query_as::<_, ExamResult>(
            r#"
            SELECT id, user_id, exam_id, score, total, submitted_at, student_answers
            FROM results
            WHERE ($1::text IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR exam_id = $2)
            ORDER BY submitted_at, id
            "#,
        )
        .bind(user_id)
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    /// Grade a submission and store it as a new result
    pub async fn submit_exam(&self, submission: &SubmitExamRequest) -> Result<ExamResult> {
        let mut tx = self.pool.begin().await?;

        // FOR SHARE keeps the exam and user from being deleted before the insert.
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, title, class_name, duration, questions, confirm_on_submit
            FROM exams
            WHERE id = $1
            FOR SHARE
            "#,
        )
        .bind(&submission.exam_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

        sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE id = $1 FOR SHARE")
            .bind(&submission.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let grade = classroom_core::grade(&exam.questions, &submission.student_answers);

        let result = sqlx::query_as::<_, ExamResult>(
            r#"
            INSERT INTO results (id, user_id, exam_id, score, total, submitted_at, student_answers)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, exam_id, score, total, submitted_at, student_answers
            "#,
        )
        .bind(new_id())
        .bind(&submission.user_id)
        .bind(&exam.id)
        .bind(grade.score)
        .bind(grade.total)
        .bind(submission.submitted_at)
        .bind(Json(&submission.student_answers))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            user_id = %result.user_id,
            exam_id = %result.exam_id,
            score = result.score,
            total = result.total,
            "graded exam submission"
        );
        Ok(result)
    }

    // === Schedule Repository ===

    /// Insert or replace the entry for (student, day, time)
    pub async fn upsert_schedule_entry(&self, entry: &SaveScheduleRequest) -> Result<Upserted> {
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO student_schedules (student_id, day, time, subject, teacher)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT ON CONSTRAINT student_schedules_slot_key DO UPDATE SET
                subject = EXCLUDED.subject,
                teacher = EXCLUDED.teacher
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(&entry.student_id)
        .bind(&entry.day)
        .bind(&entry.time)
        .bind(&entry.subject)
        .bind(&entry.teacher)
        .fetch_one(&self.pool)
        .await?;

        Ok(if inserted {
            Upserted::Inserted
        } else {
            Upserted::Updated
        })
    }

    pub async fn delete_schedule_entry(&self, slot: &ScheduleSlot) -> Result<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM student_schedules
            WHERE student_id = $1 AND day = $2 AND time = $3
            "#,
        )
        .bind(&slot.student_id)
        .bind(&slot.day)
        .bind(&slot.time)
        .execute(&self.pool)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApiError::NotFound("Schedule entry not found".to_string()));
        }
        Ok(())
    }

    /// All schedule rows in insertion order
    pub async fn list_schedule_rows(&self) -> Result<Vec<DbScheduleEntry>> {
        let rows = sqlx::query_as::<_, DbScheduleEntry>(
            r#"
            SELECT id, student_id, day, time, subject, teacher
            FROM student_schedules
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
