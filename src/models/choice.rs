// src/models/choice.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents the 'choices' table in the database.
/// Every row belongs to exactly one question.
#[derive(Debug, Clone, FromRow)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub is_correct: bool,
}

/// DTO for one answer option inside a create/update request.
/// The text may be empty.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewChoice {
    pub choice_text: String,
    pub is_correct: bool,
}

/// DTO for sending a choice to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChoiceView {
    pub id: i64,
    pub choice_text: String,
    pub is_correct: bool,
}

impl From<Choice> for ChoiceView {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id,
            choice_text: choice.choice_text,
            is_correct: choice.is_correct,
        }
    }
}
