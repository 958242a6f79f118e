//! Value parsers for command line arguments

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a non-empty queue name
pub fn validate_queue_name(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Queue name cannot be empty".to_string());
    }
    if trimmed.chars().any(char::is_control) {
        return Err(format!("Queue name '{}' contains control characters", trimmed));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_int() {
        assert_eq!(validate_positive_int("8"), Ok(8));
        assert_eq!(validate_positive_int(" 16 "), Ok(16));
        assert!(validate_positive_int("0").is_err());
        assert!(validate_positive_int("-3").is_err());
        assert!(validate_positive_int("many").is_err());
    }

    #[test]
    fn test_validate_queue_name() {
        assert_eq!(validate_queue_name(" decoder "), Ok("decoder".to_string()));
        assert!(validate_queue_name("   ").is_err());
        assert!(validate_queue_name("bad\tname").is_err());
    }
}
