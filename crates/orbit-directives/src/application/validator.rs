//! Per-directive policy checks.

use orbit_core::record::CharacterRecord;

use super::clamper::clamp_increments;
use crate::domain::directive::{Directive, DirectiveValue};
use crate::domain::errors::DirectiveError;
use crate::domain::outcome::DirectiveOps;
use crate::domain::policy::PathPolicy;

/// Checks every entry of `directive` against the policy tables without
/// clamping.
///
/// Numbers are increment candidates and are summed per path; every other
/// value is a set candidate and the last write wins. A rejected key never
/// affects the others.
pub(crate) fn check_entries(directive: &Directive, policy: &PathPolicy) -> DirectiveOps {
    let mut ops = DirectiveOps::default();

    for (path, value) in directive.entries() {
        match value {
            DirectiveValue::Number(delta) => {
                let Some(bounds) = policy.increment_rule(path) else {
                    ops.errors
                        .push(DirectiveError::IncrementPathNotAllowed(path.to_owned()));
                    continue;
                };
                if !bounds.contains(*delta) {
                    ops.errors.push(DirectiveError::DeltaOutOfRange {
                        path: path.to_owned(),
                        delta: *delta,
                        min: bounds.min,
                        max: bounds.max,
                    });
                    continue;
                }
                *ops.increments.entry(path.to_owned()).or_insert(0.0) += delta;
            }
            other => {
                let Some(kind) = policy.set_rule(path) else {
                    ops.errors
                        .push(DirectiveError::SetPathNotAllowed(path.to_owned()));
                    continue;
                };
                if !kind.accepts(other) {
                    ops.errors.push(DirectiveError::TypeMismatch {
                        path: path.to_owned(),
                        expected: kind.name(),
                        found: other.kind_name(),
                    });
                    continue;
                }
                ops.sets.insert(path.to_owned(), other.to_json());
            }
        }
    }

    ops
}

/// Validates one directive, clamping against `current` when it is given.
#[must_use]
pub fn validate_one(
    directive: &Directive,
    policy: &PathPolicy,
    current: Option<&CharacterRecord>,
) -> DirectiveOps {
    let mut ops = check_entries(directive, policy);
    if let Some(record) = current {
        ops.warnings = clamp_increments(&mut ops.increments, policy, |path| {
            record.number_at(path)
        });
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directive(source: &str) -> Directive {
        serde_json::from_str(source).unwrap()
    }

    fn record(value: serde_json::Value) -> CharacterRecord {
        CharacterRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_in_bounds_increment_is_accepted() {
        // Arrange
        let directive = directive(r#"{"stats.combat.strength": 2}"#);

        // Act
        let ops = validate_one(&directive, &PathPolicy::standard(), None);

        // Assert
        assert!(ops.errors.is_empty());
        assert!(ops.warnings.is_empty());
        assert_eq!(ops.increments.get("stats.combat.strength"), Some(&2.0));
    }

    #[test]
    fn test_delta_above_max_is_rejected_not_clamped() {
        let directive = directive(r#"{"stats.combat.strength": 3}"#);

        let ops = validate_one(&directive, &PathPolicy::standard(), None);

        assert!(ops.increments.is_empty());
        assert_eq!(
            ops.errors,
            vec![DirectiveError::DeltaOutOfRange {
                path: "stats.combat.strength".to_owned(),
                delta: 3.0,
                min: -2.0,
                max: 2.0,
            }]
        );
    }

    #[test]
    fn test_unknown_increment_path_is_rejected() {
        let directive = directive(r#"{"identity.age": 1}"#);

        let ops = validate_one(&directive, &PathPolicy::standard(), None);

        assert_eq!(
            ops.errors,
            vec![DirectiveError::IncrementPathNotAllowed("identity.age".to_owned())]
        );
    }

    #[test]
    fn test_number_on_settable_path_is_an_increment_error() {
        let directive = directive(r#"{"status.location": 4}"#);

        let ops = validate_one(&directive, &PathPolicy::standard(), None);

        assert_eq!(
            ops.errors,
            vec![DirectiveError::IncrementPathNotAllowed("status.location".to_owned())]
        );
    }

    #[test]
    fn test_boolean_on_increment_path_is_a_set_error() {
        let directive = directive(r#"{"stats.combat.strength": true}"#);

        let ops = validate_one(&directive, &PathPolicy::standard(), None);

        assert_eq!(
            ops.errors,
            vec![DirectiveError::SetPathNotAllowed("stats.combat.strength".to_owned())]
        );
    }

    #[test]
    fn test_set_type_mismatch_is_rejected() {
        let directive = directive(r#"{"status.location": null}"#);

        let ops = validate_one(&directive, &PathPolicy::standard(), None);

        assert!(ops.sets.is_empty());
        assert_eq!(
            ops.errors,
            vec![DirectiveError::TypeMismatch {
                path: "status.location".to_owned(),
                expected: "string",
                found: "null",
            }]
        );
    }

    #[test]
    fn test_repeated_keys_sum_increments_and_keep_last_set() {
        let directive = directive(
            r#"{"stats.combat.ranged": 1, "status.location": "Stout", "stats.combat.ranged": 2, "status.location": "Squin"}"#,
        );

        let ops = validate_one(&directive, &PathPolicy::standard(), None);

        assert!(ops.errors.is_empty());
        assert_eq!(ops.increments.get("stats.combat.ranged"), Some(&3.0));
        assert_eq!(ops.sets.get("status.location"), Some(&json!("Squin")));
    }

    #[test]
    fn test_bad_key_does_not_block_good_key() {
        let directive = directive(r#"{"identity.name": "Bob", "stats.utility.stealth": -1}"#);

        let ops = validate_one(&directive, &PathPolicy::standard(), None);

        assert_eq!(ops.errors.len(), 1);
        assert_eq!(ops.increments.get("stats.utility.stealth"), Some(&-1.0));
    }

    #[test]
    fn test_current_state_clamps_to_ceiling() {
        let directive = directive(r#"{"status.integrity": 20}"#);
        let current = record(json!({"status": {"integrity": 90.0}}));

        let ops = validate_one(&directive, &PathPolicy::standard(), Some(&current));

        assert!(ops.errors.is_empty());
        assert_eq!(ops.increments.get("status.integrity"), Some(&10.0));
        assert_eq!(ops.warnings.len(), 1);
        assert_eq!(ops.warnings[0].path, "status.integrity");
    }

    #[test]
    fn test_missing_current_value_skips_clamp() {
        let directive = directive(r#"{"status.integrity": -500}"#);
        let current = record(json!({"status": {"location": "Stout"}}));

        let ops = validate_one(&directive, &PathPolicy::standard(), Some(&current));

        assert!(ops.warnings.is_empty());
        assert_eq!(ops.increments.get("status.integrity"), Some(&-500.0));
    }

    #[test]
    fn test_any_kind_accepts_nested_values() {
        let policy = PathPolicy::empty()
            .with_set("status.flags", crate::ValueKind::Any)
            .unwrap();
        let directive = directive(r#"{"status.flags": {"bleeding": true}}"#);

        let ops = validate_one(&directive, &policy, None);

        assert!(ops.errors.is_empty());
        assert_eq!(ops.sets.get("status.flags"), Some(&json!({"bleeding": true})));
    }
}
