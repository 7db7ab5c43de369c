/// Check an `Authorization` header value against the configured secret.
///
/// Only `Bearer <token>` is accepted. Missing, malformed and mismatched
/// headers are all reported the same way.
pub fn authorize(header: Option<&str>, secret: &str) -> bool {
    let Some((scheme, token)) = header.and_then(|value| value.trim().split_once(' ')) else {
        return false;
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return false;
    }

    let token = token.trim();
    !token.is_empty() && tokens_match(token.as_bytes(), secret.as_bytes())
}

// Compares every byte so timing does not reveal the matching prefix length.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "secret123";

    #[test]
    fn accepts_matching_bearer_token() {
        assert!(authorize(Some("Bearer secret123"), SECRET));
        assert!(authorize(Some("bearer secret123"), SECRET));
    }

    #[test]
    fn rejects_wrong_token() {
        assert!(!authorize(Some("Bearer wrong"), SECRET));
        assert!(!authorize(Some("Bearer secret1234"), SECRET));
    }

    #[test]
    fn rejects_missing_header() {
        assert!(!authorize(None, SECRET));
    }

    #[test]
    fn rejects_other_schemes_and_malformed_values() {
        assert!(!authorize(Some("secret123"), SECRET));
        assert!(!authorize(Some("Basic secret123"), SECRET));
        assert!(!authorize(Some("Bearer"), SECRET));
        assert!(!authorize(Some("Bearer "), SECRET));
        assert!(!authorize(Some(""), SECRET));
    }

    #[test]
    fn empty_secret_never_authorizes() {
        assert!(!authorize(Some("Bearer "), ""));
    }
}
