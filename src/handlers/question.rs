// src/handlers/question.rs

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::question::{NewQuestion, QuestionView},
    repository,
    utils::validated_json::ValidatedJson,
};

/// Creates a question together with its choices.
///
/// * Responds 201 with the stored question and a `Location` header.
/// * Any store failure rolls the whole insert back and responds 400.
#[utoipa::path(
    post,
    path = "/questions/",
    request_body = NewQuestion,
    responses(
        (status = 201, description = "Question created", body = QuestionView),
        (status = 400, description = "Invalid body or failed insert")
    )
)]
pub async fn create_question(
    State(pool): State<SqlitePool>,
    ValidatedJson(payload): ValidatedJson<NewQuestion>,
) -> Result<impl IntoResponse, AppError> {
    let question = repository::create_question(&pool, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::BadRequest(e.to_string())
        })?;

    tracing::info!(
        id = question.id,
        choices = question.choices.len(),
        "Question created"
    );

    let location = format!("/questions/{}", question.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(question),
    ))
}

/// Lists all questions with their choices.
#[utoipa::path(
    get,
    path = "/questions/",
    responses((status = 200, description = "All questions", body = [QuestionView]))
)]
pub async fn list_questions(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<QuestionView>>, AppError> {
    let questions = repository::list_questions(&pool).await.map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(questions))
}

/// Retrieves a single question by ID.
#[utoipa::path(
    get,
    path = "/questions/{id}",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, description = "The question", body = QuestionView),
        (status = 404, description = "No question with this id")
    )
)]
pub async fn get_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Json<QuestionView>, AppError> {
    let question = repository::get_question(&pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(question))
}

/// Replaces a question's text and all of its choices.
#[utoipa::path(
    put,
    path = "/questions/{id}",
    params(("id" = i64, Path, description = "Question id")),
    request_body = NewQuestion,
    responses(
        (status = 200, description = "Question updated", body = QuestionView),
        (status = 400, description = "Invalid body or failed update"),
        (status = 404, description = "No question with this id")
    )
)]
pub async fn update_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<NewQuestion>,
) -> Result<Json<QuestionView>, AppError> {
    let question = repository::update_question(&pool, id, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update question {}: {:?}", id, e);
            AppError::BadRequest(e.to_string())
        })?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(question))
}

/// Deletes a question and its choices.
#[utoipa::path(
    delete,
    path = "/questions/{id}",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 400, description = "Failed delete"),
        (status = 404, description = "No question with this id")
    )
)]
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = repository::delete_question(&pool, id).await.map_err(|e| {
        tracing::error!("Failed to delete question {}: {:?}", id, e);
        AppError::BadRequest(e.to_string())
    })?;

    if !deleted {
        return Err(not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Question {id} not found"))
}
