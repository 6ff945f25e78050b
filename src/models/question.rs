// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::choice::{Choice, ChoiceView, NewChoice};

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i64,

    /// The prompt shown to the quiz taker.
    pub question_text: String,
}

/// DTO for creating or replacing a question together with its choices.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewQuestion {
    #[validate(length(min = 1, message = "Question text must not be empty."))]
    pub question_text: String,

    /// May be empty; a question with no choices is valid.
    #[validate(nested)]
    pub choices: Vec<NewChoice>,
}

/// DTO for sending a question and its choices to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionView {
    pub id: i64,
    pub question_text: String,
    pub choices: Vec<ChoiceView>,
}

impl QuestionView {
    /// Joins a question row with its choice rows, in the order given.
    pub fn from_rows(question: Question, choices: Vec<Choice>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            choices: choices.into_iter().map(ChoiceView::from).collect(),
        }
    }
}
