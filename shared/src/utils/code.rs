//! Verification code format

/// Longest verification code accepted anywhere
pub const MAX_CODE_LENGTH: usize = 10;

/// 1 to 10 visible ASCII characters, no whitespace.
///
/// ```
/// use kh_shared::utils::code::is_valid_code_format;
///
/// assert!(is_valid_code_format("AbC123"));
/// assert!(!is_valid_code_format("12 34"));
/// ```
pub fn is_valid_code_format(code: &str) -> bool {
    !code.is_empty() && code.len() <= MAX_CODE_LENGTH && code.chars().all(|c| c.is_ascii_graphic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_format() {
        assert!(is_valid_code_format("111111"));
        assert!(is_valid_code_format("0123456789"));
        assert!(!is_valid_code_format(""));
        assert!(!is_valid_code_format("01234567890"));
        assert!(!is_valid_code_format("12 34"));
        assert!(!is_valid_code_format("١٢٣٤"));
    }
}
