//! Test fixtures with sample data.

use serde_json::{Value, json};

/// Token claims for a principal in the given groups, as the identity
/// provider emits them (groups as a JSON array, advisory `name` claim).
#[must_use]
pub fn token_claims(groups: &[&str], name: &str) -> Value {
    json!({
        "sub": "user-123",
        "name": name,
        "groups": groups,
        "exp": 4_102_444_800_i64,
        "iat": 1_700_000_000_i64
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_claims_shape() {
        let claims = token_claims(&["G1", "G2"], "ada@contoso.com");
        assert_eq!(claims["groups"].as_array().map(Vec::len), Some(2));
        assert_eq!(claims["name"], "ada@contoso.com");
        assert!(claims["exp"].as_i64().unwrap() > claims["iat"].as_i64().unwrap());
    }
}
