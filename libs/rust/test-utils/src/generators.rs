//! Shared proptest generators for the portal's domain values.

use proptest::prelude::*;

/// Generate claim type strings.
pub fn claim_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("groups".to_string()),
        Just("name".to_string()),
        Just("roles".to_string()),
        "[a-z][a-z_]{2,15}",
    ]
}

/// Generate claim value strings (group object ids, UPNs, plain values).
pub fn claim_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
        "[a-z0-9._%+-]{1,16}@[a-z0-9-]{2,12}\\.[a-z]{2,4}",
        "[A-Za-z0-9._-]{1,24}",
    ]
}

/// Generate search hostnames, including ones that are not valid secret
/// names (the vault's own validation is the safety net).
pub fn hostname_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{1,20}",
        "[a-z]{2,10}\\.[a-z]{2,10}\\.[a-z]{2,4}",
        "[A-Za-z0-9 _./]{1,24}",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_claim_values_are_non_empty(value in claim_value_strategy()) {
            prop_assert!(!value.is_empty());
        }

        #[test]
        fn prop_hostnames_are_bounded(hostname in hostname_strategy()) {
            prop_assert!(!hostname.is_empty());
            prop_assert!(hostname.len() <= 32);
        }
    }
}
