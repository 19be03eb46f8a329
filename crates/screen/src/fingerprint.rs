//! Identity fingerprint shared by both record sources.
//!
//! The digest is the only join key between the registry and the blacklist,
//! so every caller must go through [`fingerprint`]. Normalization:
//!
//! 1. trim each name part (absent parts are empty)
//! 2. render the birth date as `DD/MM/YYYY` (absent date is empty)
//! 3. concatenate `last + first + middle + birth_date`, no separators
//! 4. MD5 over the UTF-8 bytes, lowercase hex

use chrono::NaiveDate;

/// Birth dates are hashed and serialized in this form.
pub const BIRTH_DATE_FORMAT: &str = "%d/%m/%Y";

/// Render a birth date the way it is fed into the digest.
pub fn format_birth_date(date: NaiveDate) -> String {
    date.format(BIRTH_DATE_FORMAT).to_string()
}

/// Compute the 32-character fingerprint for a person.
pub fn fingerprint(
    last_name: &str,
    first_name: &str,
    middle_name: &str,
    birth_date: Option<NaiveDate>,
) -> String {
    let birth = birth_date.map(format_birth_date).unwrap_or_default();
    let key = format!(
        "{}{}{}{}",
        last_name.trim(),
        first_name.trim(),
        middle_name.trim(),
        birth
    );
    format!("{:x}", md5::compute(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, BIRTH_DATE_FORMAT).unwrap()
    }

    #[test]
    fn known_digest() {
        // md5("IvanovIvan01/01/1980")
        let expected = format!("{:x}", md5::compute(b"IvanovIvan01/01/1980"));
        assert_eq!(fingerprint("Ivanov", "Ivan", "", Some(date("01/01/1980"))), expected);
    }

    #[test]
    fn lowercase_hex_32_chars() {
        let h = fingerprint("Smith", "John", "Paul", Some(date("15/03/1975")));
        assert_eq!(h.len(), 32);
        assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn trims_name_parts() {
        let dob = Some(date("01/01/1980"));
        assert_eq!(
            fingerprint("Smith ", " John", "", dob),
            fingerprint("Smith", "John", "", dob)
        );
        assert_eq!(
            fingerprint("  Smith\t", "John", "  ", dob),
            fingerprint("Smith", "John", "", dob)
        );
    }

    #[test]
    fn deterministic() {
        let a = fingerprint("Petrov", "Petr", "Petrovich", Some(date("05/05/1990")));
        let b = fingerprint("Petrov", "Petr", "Petrovich", Some(date("05/05/1990")));
        assert_eq!(a, b);
    }

    #[test]
    fn missing_birth_date_hashes_empty() {
        let expected = format!("{:x}", md5::compute(b"PetrovPetr"));
        assert_eq!(fingerprint("Petrov", "Petr", "", None), expected);
        assert_eq!(fingerprint("", "", "", None), format!("{:x}", md5::compute(b"")));
    }

    #[test]
    fn birth_date_is_zero_padded() {
        assert_eq!(format_birth_date(NaiveDate::from_ymd_opt(1980, 1, 2).unwrap()), "02/01/1980");
    }

    #[test]
    fn different_dates_differ() {
        assert_ne!(
            fingerprint("Smith", "John", "", Some(date("01/01/1980"))),
            fingerprint("Smith", "John", "", Some(date("02/01/1980")))
        );
    }
}
