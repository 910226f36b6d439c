//! Registration input checks. All run before any write; a failure leaves
//! nothing to roll back.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

/// Score a password over five checks: length >= 8, a digit, an uppercase
/// letter, a lowercase letter, a non-alphanumeric character. Fewer than two
/// is weak, fewer than four is medium.
pub fn password_strength(password: &str) -> PasswordStrength {
    let mut score = 0;

    if password.len() >= 8 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_alphanumeric()) {
        score += 1;
    }

    if score < 2 {
        PasswordStrength::Weak
    } else if score < 4 {
        PasswordStrength::Medium
    } else {
        PasswordStrength::Strong
    }
}

/// Minimal shape check: one '@' with a dotted domain after it.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.contains(' ')
        && !domain.contains('@')
}

/// Trinidad landline/mobile format as entered by the original forms:
/// "(868) XXX-XXXX", 14 characters total.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.starts_with("(868) ") && phone.len() == 14
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength_thresholds() {
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        assert_eq!(password_strength(""), PasswordStrength::Weak);
        // lowercase + length = 2 checks
        assert_eq!(password_strength("abcdefgh"), PasswordStrength::Medium);
        // lowercase + uppercase + digit = 3 checks
        assert_eq!(password_strength("Abc123"), PasswordStrength::Medium);
        // all five checks
        assert_eq!(password_strength("Abcdef1!"), PasswordStrength::Strong);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("driver@example.com"));
        assert!(is_valid_email("a.b@mail.co.tt"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("(868) 555-1234"));
        assert!(!is_valid_phone("(868)555-1234"));
        assert!(!is_valid_phone("(869) 555-1234"));
        assert!(!is_valid_phone("(868) 555-12345"));
    }
}
