// src/handlers/docs.rs

use axum::Json;
use utoipa::OpenApi;

use crate::{
    handlers::{health, question},
    models::{
        choice::{ChoiceView, NewChoice},
        question::{NewQuestion, QuestionView},
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Quiz API", description = "Questions with multiple choice answers"),
    paths(
        health::root,
        question::create_question,
        question::list_questions,
        question::get_question,
        question::update_question,
        question::delete_question,
    ),
    components(schemas(NewChoice, NewQuestion, ChoiceView, QuestionView))
)]
pub struct ApiDoc;

/// Serves the OpenAPI document for every public endpoint.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
