// src/utils/mod.rs

pub mod validated_json;
