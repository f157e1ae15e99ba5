/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Validate an Uzbek mobile number (`+998XXXXXXXXX`)
pub fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    let digits = phone.strip_prefix("+998").unwrap_or("");
    if digits.len() == 9 && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("phone");
        err.message = Some("Phone number must follow the format: +998XXXXXXXXX".into());
        Err(err)
    }
}

/// Names are letters, spaces, apostrophes and dashes
pub fn validate_person_name(name: &str) -> Result<(), validator::ValidationError> {
    let allowed = |c: char| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-';
    if !name.trim().is_empty() && name.chars().all(allowed) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("name");
        err.message =
            Some("Name must contain only letters, spaces, apostrophes, or dashes".into());
        Err(err)
    }
}

/// Password must have at least one letter and one digit
pub fn validate_password(password: &str) -> Result<(), validator::ValidationError> {
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if has_letter && has_digit {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("password");
        err.message = Some("Password must include at least one letter and one number.".into());
        Err(err)
    }
}
