//! RailPay Reference - Transfer reference generation and validation
//!
//! Every outbound transfer is identified by a reference of the form
//! `BANK_CODE(2-3) + ULID(12) + HMAC(6) + CHECK(2)`, 22-23 characters:
//!
//! - The ULID segment (10 timestamp + 2 random chars, Crockford base32)
//!   makes references approximately time-sortable without a central
//!   sequence authority. Two references from the same millisecond are
//!   ordered only lexicographically by the random tail.
//! - The HMAC segment binds the reference to a process-wide secret so a
//!   third party cannot cheaply forge plausible references.
//! - The Mod-97 check digits (ISO 7064) catch the large majority of
//!   single-character corruptions with no external state.
//!
//! Generation is infallible and uses only per-call clock reads and
//! randomness, so it is safe under concurrent calls. Validation and
//! extraction are sentinel-returning parsers for untrusted input.
//! `generate()` with the default bank code yields a 22-character
//! reference starting `FM`.

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use ulid::Ulid;

type HmacSha256 = Hmac<Sha256>;

/// Crockford base32 alphabet used by the ULID segment
const ENCODING: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Platform default bank code
pub const DEFAULT_BANK_CODE: &str = "FM";

const ULID_SEGMENT_LEN: usize = 12;
const ULID_TIME_LEN: usize = 10;
const HMAC_SEGMENT_LEN: usize = 6;
const CHECK_LEN: usize = 2;
/// ULID timestamps are 48-bit milliseconds
const TIME_MAX: u64 = (1 << 48) - 1;

/// Generates transfer references bound to an injected secret.
///
/// The secret is supplied by the startup configuration, never read from
/// the process environment here.
#[derive(Clone)]
pub struct ReferenceGenerator {
    secret: Vec<u8>,
    default_bank_code: String,
}

impl ReferenceGenerator {
    /// Create a generator with the given HMAC secret and default bank code
    pub fn new(secret: impl AsRef<[u8]>, default_bank_code: impl Into<String>) -> Self {
        let default_bank_code =
            normalize_bank_code(&default_bank_code.into()).unwrap_or_else(|| DEFAULT_BANK_CODE.to_string());
        Self {
            secret: secret.as_ref().to_vec(),
            default_bank_code,
        }
    }

    /// Generate a reference using the platform default bank code
    pub fn generate(&self) -> String {
        self.generate_for(&self.default_bank_code)
    }

    /// Generate a reference for a specific bank code.
    ///
    /// The code is normalized to 2-3 uppercase alphanumerics; anything
    /// that cannot be normalized falls back to the default.
    pub fn generate_for(&self, bank_code: &str) -> String {
        let bank_code =
            normalize_bank_code(bank_code).unwrap_or_else(|| self.default_bank_code.clone());

        // Time-sortable core: fresh ULID, truncated to 10 timestamp
        // chars + 2 random chars. Per-call clock and CSPRNG only.
        let ulid = Ulid::new().to_string();
        let core = &ulid[..ULID_SEGMENT_LEN];

        // HMAC suffix binds bank code + core to the secret
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(bank_code.as_bytes());
        mac.update(core.as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());
        let suffix = digest[..HMAC_SEGMENT_LEN].to_uppercase();

        let mut reference = format!("{bank_code}{core}{suffix}");
        reference.push_str(&mod97_check(&reference));
        reference
    }
}

/// Normalize a bank code to 2-3 uppercase alphanumeric characters.
/// Returns `None` when fewer than 2 usable characters remain.
fn normalize_bank_code(code: &str) -> Option<String> {
    let cleaned: String = code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(3)
        .collect();
    if cleaned.len() >= 2 {
        Some(cleaned)
    } else {
        None
    }
}

/// ISO 7064 Mod-97 check digits over an alphanumeric string.
///
/// Letters map to two digits (A=10 .. Z=35); the remainder is folded
/// incrementally so no big-integer arithmetic is needed.
fn mod97_check(s: &str) -> String {
    let mut rem: u32 = 0;
    for c in s.chars() {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_digit() {
            rem = (rem * 10 + (c as u32 - '0' as u32)) % 97;
        } else if c.is_ascii_uppercase() {
            let value = c as u32 - 'A' as u32 + 10;
            rem = (rem * 10 + value / 10) % 97;
            rem = (rem * 10 + value % 10) % 97;
        }
    }
    format!("{:02}", 98 - rem)
}

/// Validate a reference's length, charset, and check digits.
///
/// Purely positional: needs no secret and no external state. Detection
/// of corruption is probabilistic, not a guarantee.
pub fn validate(reference: &str) -> bool {
    let len = reference.len();
    if !(22..=23).contains(&len) {
        return false;
    }
    if !reference
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return false;
    }

    let (body, check) = reference.split_at(len - CHECK_LEN);
    if !check.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    mod97_check(body) == check
}

/// Extract the bank code from a reference, `None` on malformed input
pub fn extract_bank_code(reference: &str) -> Option<&str> {
    let bank_len = bank_code_len(reference)?;
    let code = &reference[..bank_len];
    if code
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        Some(code)
    } else {
        None
    }
}

/// Decode the timestamp embedded in a reference's ULID segment,
/// `None` on malformed input
pub fn extract_timestamp(reference: &str) -> Option<DateTime<Utc>> {
    let bank_len = bank_code_len(reference)?;
    let time_str = reference.get(bank_len..bank_len + ULID_TIME_LEN)?;

    let mut millis: u64 = 0;
    for c in time_str.chars() {
        let value = ENCODING.iter().position(|&e| e as char == c)? as u64;
        millis = millis * ENCODING.len() as u64 + value;
    }
    if millis > TIME_MAX {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

/// Bank code length implied by the total reference length
fn bank_code_len(reference: &str) -> Option<usize> {
    let fixed = ULID_SEGMENT_LEN + HMAC_SEGMENT_LEN + CHECK_LEN;
    match reference.len().checked_sub(fixed)? {
        2 => Some(2),
        3 => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> ReferenceGenerator {
        ReferenceGenerator::new("test-transfer-ref-secret", DEFAULT_BANK_CODE)
    }

    #[test]
    fn test_generate_default_bank_code() {
        let reference = generator().generate();
        assert_eq!(reference.len(), 22);
        assert!(reference.starts_with("FM"));
        assert!(validate(&reference));
    }

    #[test]
    fn test_generate_numeric_bank_code() {
        let reference = generator().generate_for("513");
        assert_eq!(reference.len(), 23);
        assert!(reference.starts_with("513"));
        assert!(validate(&reference));
    }

    #[test]
    fn test_bank_code_normalization() {
        let gen = generator();
        // Lowercased and over-long codes are cleaned up and truncated
        let reference = gen.generate_for("fmfb");
        assert!(reference.starts_with("FMF"));
        // Unusable codes fall back to the default
        let reference = gen.generate_for("!");
        assert!(reference.starts_with("FM"));
        assert_eq!(reference.len(), 22);
    }

    #[test]
    fn test_validate_rejects_malformed() {
        assert!(!validate(""));
        assert!(!validate("FM123"));
        assert!(!validate(&"A".repeat(30)));
        // Lowercase is outside the reference charset
        let reference = generator().generate().to_lowercase();
        assert!(!validate(&reference));
    }

    #[test]
    fn test_flipped_character_detected() {
        let reference = generator().generate();
        // Spec example: corrupt the 10th character
        let flipped = substitute(&reference, 9);
        assert!(!validate(&flipped));
    }

    #[test]
    fn test_single_substitution_detected_at_every_position() {
        let reference = generator().generate();
        for i in 0..reference.len() {
            let corrupted = substitute(&reference, i);
            assert!(
                !validate(&corrupted),
                "substitution at {i} not caught: {corrupted}"
            );
        }
    }

    /// Replace the char at `i` with a different char of the same class
    /// (digit for digit, letter for letter); same-class substitutions
    /// are always caught by Mod-97.
    fn substitute(reference: &str, i: usize) -> String {
        let mut chars: Vec<char> = reference.chars().collect();
        let old = chars[i];
        chars[i] = if old.is_ascii_digit() {
            if old == '0' {
                '1'
            } else {
                '0'
            }
        } else if old == 'A' {
            'B'
        } else {
            'A'
        };
        chars.into_iter().collect()
    }

    #[test]
    fn test_extract_bank_code() {
        let gen = generator();
        assert_eq!(extract_bank_code(&gen.generate()), Some("FM"));
        assert_eq!(extract_bank_code(&gen.generate_for("513")), Some("513"));
        assert_eq!(extract_bank_code("short"), None);
    }

    #[test]
    fn test_extract_timestamp_close_to_now() {
        let before = Utc::now();
        let reference = generator().generate();
        let after = Utc::now();

        let ts = extract_timestamp(&reference).unwrap();
        assert!(ts >= before - chrono::Duration::milliseconds(1));
        assert!(ts <= after + chrono::Duration::milliseconds(1));
    }

    #[test]
    fn test_extract_timestamp_malformed() {
        assert_eq!(extract_timestamp(""), None);
        assert_eq!(extract_timestamp("FM!!!!!!!!!!!!!!!!!!!!"), None);
    }

    #[test]
    fn test_references_sort_by_time() {
        let gen = generator();
        let r1 = gen.generate();
        std::thread::sleep(std::time::Duration::from_millis(3));
        let r2 = gen.generate();

        let t1 = extract_timestamp(&r1).unwrap();
        let t2 = extract_timestamp(&r2).unwrap();
        assert!(t2 >= t1);
    }

    #[test]
    fn test_references_are_unique() {
        let gen = generator();
        let a = gen.generate();
        let b = gen.generate();
        assert_ne!(a, b);
    }
}
