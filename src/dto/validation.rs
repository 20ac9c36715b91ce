//! Validation helpers for DTOs.

use validator::ValidationError;

/// Grades served by the game, inclusive bounds.
const GRADE_RANGE: (u8, u8) = (6, 9);
/// Longest accepted student name.
const NAME_MAX_CHARS: usize = 60;

/// Validates that a student name is non-blank and reasonably short.
pub fn validate_student_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("student_name_blank");
        err.message = Some("Student name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > NAME_MAX_CHARS {
        let mut err = ValidationError::new("student_name_length");
        err.message =
            Some(format!("Student name must be at most {NAME_MAX_CHARS} characters").into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a grade level falls inside the served range (6 through 9).
pub fn validate_grade_level(grade: u8) -> Result<(), ValidationError> {
    let (min, max) = GRADE_RANGE;
    if grade < min || grade > max {
        let mut err = ValidationError::new("grade_level_range");
        err.message = Some(format!("Grade level must be between {min} and {max} (got {grade})").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_student_name_valid() {
        assert!(validate_student_name("Ana").is_ok());
        assert!(validate_student_name("João Pedro").is_ok());
    }

    #[test]
    fn test_validate_student_name_invalid() {
        assert!(validate_student_name("").is_err());
        assert!(validate_student_name("   ").is_err());
        assert!(validate_student_name(&"a".repeat(61)).is_err());
    }

    #[test]
    fn test_validate_grade_level_bounds() {
        assert!(validate_grade_level(6).is_ok());
        assert!(validate_grade_level(9).is_ok());
        assert!(validate_grade_level(5).is_err());
        assert!(validate_grade_level(10).is_err());
        assert!(validate_grade_level(0).is_err());
    }
}
