// src/repository.rs

//! Data access for questions and their choices.
//!
//! Writes run inside one transaction each. Dropping a `Transaction` without
//! committing rolls it back, so every early return (`?` or not-found) leaves
//! the store untouched.

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{
    choice::{Choice, NewChoice},
    question::{NewQuestion, Question, QuestionView},
};

/// Inserts a question and all of its choices as one unit of work.
pub async fn create_question(
    pool: &SqlitePool,
    new: &NewQuestion,
) -> Result<QuestionView, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let question = sqlx::query_as::<_, Question>(
        "INSERT INTO questions (question_text) VALUES (?) RETURNING id, question_text",
    )
    .bind(&new.question_text)
    .fetch_one(&mut *tx)
    .await?;

    let choices = insert_choices(&mut tx, question.id, &new.choices).await?;

    tx.commit().await?;

    Ok(QuestionView::from_rows(question, choices))
}

/// Lists every question with its choices, both ordered by id.
/// Both reads share one transaction so they see the same snapshot.
pub async fn list_questions(pool: &SqlitePool) -> Result<Vec<QuestionView>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let questions =
        sqlx::query_as::<_, Question>("SELECT id, question_text FROM questions ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;

    let all_choices = sqlx::query_as::<_, Choice>(
        "SELECT id, question_id, choice_text, is_correct FROM choices ORDER BY id",
    )
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let mut by_question: HashMap<i64, Vec<Choice>> = HashMap::new();
    for choice in all_choices {
        by_question.entry(choice.question_id).or_default().push(choice);
    }

    Ok(questions
        .into_iter()
        .map(|q| {
            let choices = by_question.remove(&q.id).unwrap_or_default();
            QuestionView::from_rows(q, choices)
        })
        .collect())
}

/// Fetches one question with its choices. `None` if the id does not exist.
pub async fn get_question(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<QuestionView>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(question) =
        sqlx::query_as::<_, Question>("SELECT id, question_text FROM questions WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
    else {
        return Ok(None);
    };

    let choices = fetch_choices(&mut tx, question.id).await?;

    tx.commit().await?;

    Ok(Some(QuestionView::from_rows(question, choices)))
}

/// Overwrites the question text and replaces all of its choices.
/// `None` if the id does not exist, in which case nothing is written.
pub async fn update_question(
    pool: &SqlitePool,
    id: i64,
    new: &NewQuestion,
) -> Result<Option<QuestionView>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(question) = sqlx::query_as::<_, Question>(
        "UPDATE questions SET question_text = ? WHERE id = ? RETURNING id, question_text",
    )
    .bind(&new.question_text)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM choices WHERE question_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let choices = insert_choices(&mut tx, id, &new.choices).await?;

    tx.commit().await?;

    Ok(Some(QuestionView::from_rows(question, choices)))
}

/// Deletes a question and its choices. Returns `false` if the id does not exist.
///
/// The first statement is a write so the transaction takes the write lock up
/// front and concurrent deletes queue on it instead of failing.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM choices WHERE question_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    tx.commit().await?;

    Ok(true)
}

async fn insert_choices(
    conn: &mut SqliteConnection,
    question_id: i64,
    new_choices: &[NewChoice],
) -> Result<Vec<Choice>, sqlx::Error> {
    let mut choices = Vec::with_capacity(new_choices.len());

    for choice in new_choices {
        let row = sqlx::query_as::<_, Choice>(
            r#"
            INSERT INTO choices (question_id, choice_text, is_correct)
            VALUES (?, ?, ?)
            RETURNING id, question_id, choice_text, is_correct
            "#,
        )
        .bind(question_id)
        .bind(&choice.choice_text)
        .bind(choice.is_correct)
        .fetch_one(&mut *conn)
        .await?;

        choices.push(row);
    }

    Ok(choices)
}

async fn fetch_choices(
    conn: &mut SqliteConnection,
    question_id: i64,
) -> Result<Vec<Choice>, sqlx::Error> {
    sqlx::query_as::<_, Choice>(
        "SELECT id, question_id, choice_text, is_correct FROM choices WHERE question_id = ? ORDER BY id",
    )
    .bind(question_id)
    .fetch_all(conn)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::TempDir;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::migrate(&pool).await.unwrap();
        pool
    }

    /// Choice text that the trigger from `reject_poisoned_choices` refuses to insert.
    const POISON: &str = "poison";

    async fn reject_poisoned_choices(pool: &SqlitePool) {
        sqlx::query(
            r#"
            CREATE TRIGGER reject_poisoned_choice
            BEFORE INSERT ON choices
            WHEN NEW.choice_text = 'poison'
            BEGIN
                SELECT RAISE(ABORT, 'poisoned choice');
            END
            "#,
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn new_question(text: &str, choices: &[(&str, bool)]) -> NewQuestion {
        NewQuestion {
            question_text: text.to_string(),
            choices: choices
                .iter()
                .map(|(t, c)| NewChoice {
                    choice_text: t.to_string(),
                    is_correct: *c,
                })
                .collect(),
        }
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_assigns_distinct_choice_ids() {
        let pool = test_pool().await;

        let created = create_question(
            &pool,
            &new_question("2+2?", &[("4", true), ("5", false), ("22", false)]),
        )
        .await
        .unwrap();

        assert_eq!(created.question_text, "2+2?");
        assert_eq!(created.choices.len(), 3);
        let mut ids: Vec<i64> = created.choices.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn create_with_no_choices() {
        let pool = test_pool().await;

        let created = create_question(&pool, &new_question("Empty?", &[]))
            .await
            .unwrap();

        assert!(created.choices.is_empty());
        let fetched = get_question(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn update_replaces_choices() {
        let pool = test_pool().await;
        let created = create_question(&pool, &new_question("Q", &[("A", true), ("B", false)]))
            .await
            .unwrap();

        let updated = update_question(&pool, created.id, &new_question("Q2", &[("C", true)]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.question_text, "Q2");
        let fetched = get_question(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.choices.len(), 1);
        assert_eq!(fetched.choices[0].choice_text, "C");
        assert_eq!(count(&pool, "choices").await, 1);
    }

    #[tokio::test]
    async fn update_missing_question_writes_nothing() {
        let pool = test_pool().await;

        let result = update_question(&pool, 42, &new_question("Q", &[("A", true)]))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(count(&pool, "choices").await, 0);
    }

    #[tokio::test]
    async fn delete_removes_choices() {
        let pool = test_pool().await;
        let keep = create_question(&pool, &new_question("keep", &[("x", true)]))
            .await
            .unwrap();
        let doomed = create_question(&pool, &new_question("drop", &[("y", true), ("z", false)]))
            .await
            .unwrap();

        assert!(delete_question(&pool, doomed.id).await.unwrap());

        assert!(get_question(&pool, doomed.id).await.unwrap().is_none());
        assert!(get_question(&pool, keep.id).await.unwrap().is_some());
        assert_eq!(count(&pool, "choices").await, 1);
    }

    #[tokio::test]
    async fn delete_missing_question_returns_false() {
        let pool = test_pool().await;
        assert!(!delete_question(&pool, 9_999_999).await.unwrap());
    }

    #[tokio::test]
    async fn list_groups_choices_by_question() {
        let pool = test_pool().await;
        let first = create_question(&pool, &new_question("one", &[("a", true)]))
            .await
            .unwrap();
        let second = create_question(&pool, &new_question("two", &[("b", false), ("c", true)]))
            .await
            .unwrap();

        let listed = list_questions(&pool).await.unwrap();

        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn orphan_choice_is_rejected() {
        let pool = test_pool().await;
        let mut tx = pool.begin().await.unwrap();

        let result = insert_choices(&mut tx, 12345, &[NewChoice {
            choice_text: "orphan".into(),
            is_correct: false,
        }])
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn failed_create_leaves_no_rows() {
        let pool = test_pool().await;
        reject_poisoned_choices(&pool).await;

        let result =
            create_question(&pool, &new_question("Q", &[("fine", true), (POISON, false)])).await;

        assert!(result.is_err());
        assert_eq!(count(&pool, "questions").await, 0);
        assert_eq!(count(&pool, "choices").await, 0);
    }

    #[tokio::test]
    async fn failed_update_keeps_previous_state() {
        let pool = test_pool().await;
        let created = create_question(&pool, &new_question("old", &[("A", true), ("B", false)]))
            .await
            .unwrap();
        reject_poisoned_choices(&pool).await;

        let result = update_question(
            &pool,
            created.id,
            &new_question("new", &[("C", true), (POISON, false)]),
        )
        .await;

        assert!(result.is_err());
        let fetched = get_question(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(count(&pool, "choices").await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deletes_all_succeed() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            database_url: format!("sqlite://{}", dir.path().join("quiz.db").display()),
            listen_addr: ([127, 0, 0, 1], 0).into(),
            db_max_connections: 5,
            rust_log: "error".to_string(),
            log_dir: "logs".to_string(),
        };
        let pool = crate::db::connect(&config).await.unwrap();
        crate::db::migrate(&pool).await.unwrap();

        let mut ids = Vec::new();
        for i in 0..40 {
            let text = format!("Q{i}");
            let created = create_question(&pool, &new_question(&text, &[("a", true), ("b", false)]))
                .await
                .unwrap();
            ids.push(created.id);
        }

        let handles: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let pool = pool.clone();
                tokio::spawn(async move { delete_question(&pool, id).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().unwrap());
        }

        assert_eq!(count(&pool, "questions").await, 0);
        assert_eq!(count(&pool, "choices").await, 0);
    }
}
