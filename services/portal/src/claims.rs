//! Claims sourced from the authenticated principal.

use serde_json::Value;

/// A typed attribute asserted about the authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Claim type (e.g. `groups`, `name`)
    pub claim_type: String,
    /// Claim value
    pub value: String,
}

impl Claim {
    /// Create a claim.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// Flatten a decoded token claim map into individual claims.
///
/// Array-valued claims become one claim per element, so a principal in N
/// groups carries N `groups` claims. Nested objects are skipped.
#[must_use]
pub fn claims_from_token(token_claims: &serde_json::Map<String, Value>) -> Vec<Claim> {
    let mut claims = Vec::new();

    for (claim_type, value) in token_claims {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        claims.push(Claim::new(claim_type, text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    claims.push(Claim::new(claim_type, text));
                }
            }
        }
    }

    claims
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_groups_array_flattens() {
        let claims = claims_from_token(&map(json!({"groups": ["G1", "G2"]})));
        assert_eq!(claims.len(), 2);
        assert!(claims.contains(&Claim::new("groups", "G1")));
        assert!(claims.contains(&Claim::new("groups", "G2")));
    }

    #[test]
    fn test_scalar_claims() {
        let claims = claims_from_token(&map(json!({
            "name": "ada@contoso.com",
            "exp": 4102444800_i64
        })));
        assert!(claims.contains(&Claim::new("name", "ada@contoso.com")));
        assert!(claims.contains(&Claim::new("exp", "4102444800")));
    }

    #[test]
    fn test_nested_objects_skipped() {
        let claims = claims_from_token(&map(json!({"nested": {"a": 1}, "name": "x"})));
        assert_eq!(claims, vec![Claim::new("name", "x")]);
    }
}
