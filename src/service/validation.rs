//! Request validation beyond JSON shape: string widths match the VARCHAR(255) columns.

use crate::error::AppError;
use crate::models::{ItemCreate, SoldierCreate, SoldierUpdate};

pub const MAX_TEXT_LENGTH: usize = 255;

pub struct RequestValidator;

impl RequestValidator {
    pub fn validate_item(item: &ItemCreate) -> Result<(), AppError> {
        validate_text("first_name", &item.first_name)?;
        validate_text("last_name", &item.last_name)?;
        Ok(())
    }

    pub fn validate_soldier(soldier: &SoldierCreate) -> Result<(), AppError> {
        validate_text("first_name", &soldier.first_name)?;
        validate_text("last_name", &soldier.last_name)?;
        validate_text("rank", &soldier.rank)?;
        Ok(())
    }

    /// Validate only the fields present (partial update).
    pub fn validate_soldier_update(update: &SoldierUpdate) -> Result<(), AppError> {
        for (col, value) in [
            ("first_name", &update.first_name),
            ("last_name", &update.last_name),
            ("rank", &update.rank),
        ] {
            if let Some(v) = value {
                validate_text(col, v)?;
            }
        }
        Ok(())
    }
}

fn validate_text(col: &str, v: &str) -> Result<(), AppError> {
    if v.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be blank", col)));
    }
    if v.chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            col, MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_oversized_names_are_rejected() {
        let blank = ItemCreate {
            first_name: "  ".into(),
            last_name: "Doe".into(),
        };
        assert_eq!(
            RequestValidator::validate_item(&blank).unwrap_err().to_string(),
            "validation: first_name must not be blank"
        );

        let long = ItemCreate {
            first_name: "Jane".into(),
            last_name: "x".repeat(MAX_TEXT_LENGTH + 1),
        };
        assert!(RequestValidator::validate_item(&long).is_err());
    }

    #[test]
    fn width_counts_characters_not_bytes() {
        let item = ItemCreate {
            first_name: "é".repeat(MAX_TEXT_LENGTH),
            last_name: "Doe".into(),
        };
        assert!(RequestValidator::validate_item(&item).is_ok());
    }

    #[test]
    fn partial_update_checks_only_present_fields() {
        let update = SoldierUpdate {
            rank: Some("Major".into()),
            ..Default::default()
        };
        assert!(RequestValidator::validate_soldier_update(&update).is_ok());
        assert!(RequestValidator::validate_soldier_update(&SoldierUpdate::default()).is_ok());

        let blank_rank = SoldierUpdate {
            rank: Some(String::new()),
            ..Default::default()
        };
        assert!(RequestValidator::validate_soldier_update(&blank_rank).is_err());
    }
}
