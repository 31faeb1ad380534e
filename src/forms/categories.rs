use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::NewCategory;

/// Maximum length allowed for a category name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum length allowed for a category description.
const DESCRIPTION_MAX_LEN: usize = 2048;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = DESCRIPTION_MAX_LEN as u64;

/// Result type returned by the category form helpers.
pub type CategoryFormResult<T> = Result<T, CategoryFormError>;

/// Errors that can occur while processing category forms.
#[derive(Debug, Error)]
pub enum CategoryFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("category name cannot be empty")]
    EmptyName,
}

/// Form payload emitted when submitting the "Add category" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCategoryForm {
    /// Name entered by the user.
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Optional description for the category.
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
}

impl AddCategoryForm {
    /// Validates and sanitizes the payload into a domain `NewCategory`.
    pub fn into_new_category(self) -> CategoryFormResult<NewCategory> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(CategoryFormError::EmptyName);
        }

        let sanitized_description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());

        let mut new_category = NewCategory::new(sanitized_name);
        if let Some(description) = sanitized_description {
            new_category = new_category.with_description(description);
        }

        Ok(new_category)
    }
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        let is_empty = line.is_empty();
        if is_empty {
            if previous_empty {
                continue;
            }
            previous_empty = true;
            result.push(String::new());
        } else {
            previous_empty = false;
            result.push(line);
        }
    }

    result.join("\n")
}
