//! Course domain constants and validation.

use crate::error::CoreError;

/// Valid `minimum_skill` values, in increasing order of difficulty.
pub const MINIMUM_SKILLS: &[&str] = &["beginner", "intermediate", "advanced"];

/// Validate a course `minimum_skill` value.
pub fn validate_minimum_skill(value: &str) -> Result<(), CoreError> {
    if MINIMUM_SKILLS.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "minimum_skill must be one of beginner, intermediate, advanced; got `{value}`"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_known_skill_levels() {
        for skill in MINIMUM_SKILLS {
            assert!(validate_minimum_skill(skill).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_skill_level() {
        let err = validate_minimum_skill("wizard").unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }
}
