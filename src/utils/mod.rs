use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Alphabet for generated short codes: `[a-zA-Z0-9]`.
pub const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated short codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 5;

/// Generate a random short code drawn uniformly from [`CODE_ALPHABET`].
///
/// Not cryptographically secure. Collisions are the caller's problem.
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Generate a URL-safe random secret of `bytes` bytes of entropy.
pub fn generate_secure_token(bytes: usize) -> String {
    let buf: Vec<u8> = (0..bytes).map(|_| rand::random::<u8>()).collect();
    URL_SAFE_NO_PAD.encode(buf)
}

/// Number of distinct codes of `length` characters, saturating at `u64::MAX`.
pub fn keyspace_size(length: usize) -> u64 {
    (CODE_ALPHABET.len() as u64).saturating_pow(length as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_random_code_length() {
        for len in [1, 5, 8, 16] {
            assert_eq!(generate_random_code(len).len(), len);
        }
        assert!(generate_random_code(0).is_empty());
    }

    #[test]
    fn test_generate_random_code_alphabet() {
        let code = generate_random_code(500);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generate_random_code_varies() {
        let codes: HashSet<String> = (0..100)
            .map(|_| generate_random_code(DEFAULT_CODE_LENGTH))
            .collect();
        // 62^5 ≈ 9.1 亿，100 个里出现大量重复几乎不可能
        assert!(codes.len() > 95);
    }

    #[test]
    fn test_generate_secure_token() {
        let a = generate_secure_token(32);
        let b = generate_secure_token(32);
        assert_ne!(a, b);
        // 32 bytes -> 43 chars of unpadded base64
        assert_eq!(a.len(), 43);
    }

    #[test]
    fn test_keyspace_size() {
        assert_eq!(CODE_ALPHABET.len(), 62);
        assert_eq!(keyspace_size(1), 62);
        assert_eq!(keyspace_size(5), 916_132_832);
        assert_eq!(keyspace_size(64), u64::MAX);
    }
}
