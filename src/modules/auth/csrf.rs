use rand_chacha::ChaCha8Rng;
use rand_core::RngCore;

/// Generates a 256 bit CSRF token, hex encoded.
///
/// the token is stored on the session row and must be echoed on the
/// `x-csrf-token` header of every state changing admin request.
pub fn generate_csrf_token(rng: &mut ChaCha8Rng) -> String {
    let mut bytes = [0u8; 32];

    rng.fill_bytes(&mut bytes);

    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Compares a header supplied token against the session token in constant
/// time, so the comparison timing cannot be used to guess the session value.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();

    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;

    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }

    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    #[test]
    fn token_is_64_hex_chars() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let token = generate_csrf_token(&mut rng);

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn consecutive_tokens_differ() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_ne!(generate_csrf_token(&mut rng), generate_csrf_token(&mut rng));
    }

    #[test]
    fn constant_time_eq_matches_equal_strings() {
        assert!(constant_time_eq("abc123", "abc123"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn constant_time_eq_rejects_differences() {
        assert!(!constant_time_eq("abc123", "abc124"));
        assert!(!constant_time_eq("abc123", "abc12"));
        assert!(!constant_time_eq("abc123", ""));
    }
}
