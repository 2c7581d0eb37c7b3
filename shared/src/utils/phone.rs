//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// E.164: '+', a non-zero country digit, 7 to 15 digits in total
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").unwrap());

/// Characters users commonly type between digits
const FORMATTING_CHARS: [char; 5] = [' ', '-', '.', '(', ')'];

/// Normalize a user-entered phone number to E.164.
///
/// Formatting characters are stripped and a leading `+` is added when absent.
/// Returns `None` when anything else is present or the result is not E.164.
///
/// ```
/// use kh_shared::utils::phone::normalize_e164;
///
/// assert_eq!(normalize_e164("966 50 123 4567").as_deref(), Some("+966501234567"));
/// assert_eq!(normalize_e164("abc"), None);
/// ```
pub fn normalize_e164(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let mut digits = String::with_capacity(trimmed.len() + 1);

    for (i, c) in trimmed.chars().enumerate() {
        match c {
            '+' if i == 0 => {}
            c if c.is_ascii_digit() => digits.push(c),
            c if FORMATTING_CHARS.contains(&c) => {}
            _ => return None,
        }
    }

    let normalized = format!("+{}", digits);
    is_valid_e164(&normalized).then_some(normalized)
}

/// Check if a phone number is already valid E.164
pub fn is_valid_e164(phone: &str) -> bool {
    E164_REGEX.is_match(phone)
}

/// Mask a phone number for logs (e.g., +96****4567)
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() >= 7 {
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_plus() {
        assert_eq!(normalize_e164("966501234567").as_deref(), Some("+966501234567"));
        assert_eq!(normalize_e164("+966501234567").as_deref(), Some("+966501234567"));
    }

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize_e164(" +966 (50) 123-4567 ").as_deref(), Some("+966501234567"));
        assert_eq!(normalize_e164("1.415.555.2671").as_deref(), Some("+14155552671"));
    }

    #[test]
    fn test_normalize_rejects_malformed() {
        assert_eq!(normalize_e164(""), None);
        assert_eq!(normalize_e164("abc"), None);
        assert_eq!(normalize_e164("96650abc4567"), None);
        assert_eq!(normalize_e164("++966501234567"), None);
        assert_eq!(normalize_e164("0501234567"), None); // Leading zero is not a country code
        assert_eq!(normalize_e164("12345"), None); // Too short
        assert_eq!(normalize_e164("1234567890123456"), None); // Too long
    }

    #[test]
    fn test_is_valid_e164() {
        assert!(is_valid_e164("+14155552671"));
        assert!(!is_valid_e164("14155552671"));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+966501234567"), "+96****4567");
        assert_eq!(mask_phone_number("12345"), "****");
    }
}
