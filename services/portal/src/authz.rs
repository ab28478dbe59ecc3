//! Authorization gate.
//!
//! Pure predicates over an explicit claim-set argument. The access
//! decision matches on type AND value with exact string equality; the
//! type-only lookup is advisory (username extraction) and never gates
//! access. An empty claim set always evaluates to denied.

use crate::claims::Claim;

/// True iff at least one claim matches both type and value exactly.
///
/// This is the access decision: absence of the required claim, or an
/// empty claim set, evaluates to `false`. No partial or fuzzy matching.
#[must_use]
pub fn match_by_type_and_value(claims: &[Claim], claim_type: &str, value: &str) -> bool {
    claims
        .iter()
        .any(|claim| claim.claim_type == claim_type && claim.value == value)
}

/// First claim with the given type, if any. Advisory lookups only.
#[must_use]
pub fn match_by_type<'a>(claims: &'a [Claim], claim_type: &str) -> Option<&'a Claim> {
    claims.iter().find(|claim| claim.claim_type == claim_type)
}

/// Value of the first claim with the given type.
#[must_use]
pub fn claim_value<'a>(claims: &'a [Claim], claim_type: &str) -> Option<&'a str> {
    match_by_type(claims, claim_type).map(|claim| claim.value.as_str())
}

/// Tenant name derived from a UPN-shaped claim value: the part after the
/// final `@`, or the whole value when no `@` is present.
#[must_use]
pub fn tenant_from_upn(upn: &str) -> &str {
    upn.rsplit_once('@').map_or(upn, |(_, tenant)| tenant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Vec<Claim> {
        vec![
            Claim::new("groups", "G1"),
            Claim::new("groups", "G2"),
            Claim::new("name", "ada@contoso.com"),
        ]
    }

    #[test]
    fn test_empty_claim_set_denied() {
        assert!(!match_by_type_and_value(&[], "groups", "G1"));
    }

    #[test]
    fn test_exact_match_allowed() {
        assert!(match_by_type_and_value(&sample_claims(), "groups", "G1"));
        assert!(match_by_type_and_value(&sample_claims(), "groups", "G2"));
    }

    #[test]
    fn test_matching_type_different_value_denied() {
        assert!(!match_by_type_and_value(&sample_claims(), "groups", "G3"));
    }

    #[test]
    fn test_no_partial_value_match() {
        assert!(!match_by_type_and_value(&sample_claims(), "groups", "G"));
        assert!(!match_by_type_and_value(&sample_claims(), "group", "G1"));
    }

    #[test]
    fn test_match_by_type_advisory() {
        let claims = sample_claims();
        assert_eq!(
            match_by_type(&claims, "name").map(|c| c.value.as_str()),
            Some("ada@contoso.com")
        );
        assert!(match_by_type(&claims, "roles").is_none());
    }

    #[test]
    fn test_claim_value() {
        let claims = sample_claims();
        assert_eq!(claim_value(&claims, "name"), Some("ada@contoso.com"));
        assert_eq!(claim_value(&claims, "missing"), None);
    }

    #[test]
    fn test_tenant_from_upn() {
        assert_eq!(tenant_from_upn("ada@contoso.com"), "contoso.com");
        assert_eq!(tenant_from_upn("a@b@contoso.com"), "contoso.com");
        assert_eq!(tenant_from_upn("no-at-sign"), "no-at-sign");
    }
}
