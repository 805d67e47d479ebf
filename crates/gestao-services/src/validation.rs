//! Field format validators
//!
//! Pure functions implementing the format rules the services enforce. They
//! take no ambient state, so the services that use them stay trivially
//! testable.

use validator::ValidateEmail;

/// Validate a Brazilian taxpayer id (CPF)
///
/// Accepts exactly 11 ASCII digits and verifies both mod-11 check digits.
/// Sequences of a single repeated digit satisfy the checksum but are not
/// valid ids, so they are rejected.
pub fn is_valid_cpf(cpf: &str) -> bool {
    if cpf.len() != 11 || !cpf.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9], 10) == digits[9] && check_digit(&digits[..10], 11) == digits[10]
}

/// Compute one CPF check digit over `digits` with weights descending from
/// `start_weight` to 2.
fn check_digit(digits: &[u32], start_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=start_weight).rev())
        .map(|(d, w)| d * w)
        .sum();

    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

/// Validate an email address format
pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

/// Validate a phone number: exactly 11 ASCII digits
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 11 && phone.chars().all(|c| c.is_ascii_digit())
}

/// Validate an account reference in `MM-YYYY` format
pub fn is_valid_reference(reference: &str) -> bool {
    let Some((month, year)) = reference.split_once('-') else {
        return false;
    };

    if month.len() != 2 || year.len() != 4 {
        return false;
    }
    if !month.chars().all(|c| c.is_ascii_digit()) || !year.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    matches!(month.parse::<u32>(), Ok(1..=12))
}
