use super::errors::SignupError;
use crate::MIN_PASSWORD_LENGTH;

/// Whitespace as matched by `\s` in the email pattern: the ECMAScript
/// WhiteSpace and LineTerminator sets. U+0085 is not included, U+FEFF is.
fn is_pattern_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Check the `local@domain.tld` shape: no whitespace, exactly one `@`,
/// a non-empty local part and a domain with a dot that has text on both sides
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(is_pattern_whitespace) {
        return false;
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Format, length and confirmation rules of signup, in that order.
/// Uniqueness needs the user collection and is checked by the store.
pub fn validate_signup_fields(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), SignupError> {
    if !is_valid_email(email) {
        return Err(SignupError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(SignupError::PasswordTooShort);
    }
    if password != confirm_password {
        return Err(SignupError::PasswordMismatch);
    }
    Ok(())
}
