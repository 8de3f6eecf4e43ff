//! Retrieval codes.
//!
//! Eight characters drawn uniformly and independently from an alphabet
//! without the look-alikes `0 O 1 I`.

use rand::Rng;

pub const RETRIEVAL_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const RETRIEVAL_CODE_LENGTH: usize = 8;

pub fn generate_retrieval_code() -> String {
    let mut rng = rand::rng();
    (0..RETRIEVAL_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..RETRIEVAL_CODE_ALPHABET.len());
            RETRIEVAL_CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Canonical form of user-typed code: trimmed and uppercased.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Whether `code` has the shape of a retrieval code.
///
/// Only the length is enforced so that codes minted elsewhere with a wider
/// alphabet can still be looked up.
pub fn is_well_formed(code: &str) -> bool {
    code.chars().count() == RETRIEVAL_CODE_LENGTH && code.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_use_safe_alphabet() {
        for _ in 0..2_000 {
            let code = generate_retrieval_code();
            assert_eq!(code.len(), RETRIEVAL_CODE_LENGTH);
            assert!(
                code.bytes().all(|b| RETRIEVAL_CODE_ALPHABET.contains(&b)),
                "unexpected character in {code}"
            );
        }
    }

    #[test]
    fn test_alphabet_excludes_lookalikes() {
        assert_eq!(RETRIEVAL_CODE_ALPHABET.len(), 32);
        for c in [b'0', b'O', b'1', b'I'] {
            assert!(!RETRIEVAL_CODE_ALPHABET.contains(&c));
        }
    }

    #[test]
    fn test_codes_vary() {
        let a = generate_retrieval_code();
        let b = generate_retrieval_code();
        let c = generate_retrieval_code();
        // 32^8 space; three equal draws would mean a broken generator
        assert!(!(a == b && b == c));
    }

    #[test]
    fn test_normalize_and_shape() {
        assert_eq!(normalize_code("  abcd2345 "), "ABCD2345");
        assert!(is_well_formed("ABCD2345"));
        assert!(!is_well_formed("ABCD234"));
        assert!(!is_well_formed("ABCD-2345"));
    }
}
