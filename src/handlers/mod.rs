// src/handlers/mod.rs

pub mod docs;
pub mod health;
pub mod question;
