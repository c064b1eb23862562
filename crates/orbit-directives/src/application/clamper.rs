//! Absolute range clamping.

use orbit_core::mutation::IncrementOps;

use crate::domain::errors::{ClampEdge, ClampWarning};
use crate::domain::policy::PathPolicy;

/// Shrinks increments whose result would leave the path's absolute range.
///
/// `baseline` resolves the value an increment is added to. Paths without an
/// absolute range, or whose baseline is unknown, are left as they are.
/// Returns one warning per clamped path, in the order the policy declares
/// its absolute ranges.
pub fn clamp_increments<F>(
    increments: &mut IncrementOps,
    policy: &PathPolicy,
    baseline: F,
) -> Vec<ClampWarning>
where
    F: Fn(&str) -> Option<f64>,
{
    let mut warnings = Vec::new();

    for (path, range) in policy.absolute_ranges() {
        let Some(delta) = increments.get_mut(path) else {
            continue;
        };
        let Some(base) = baseline(path) else {
            continue;
        };

        let requested = *delta;
        let (edge, bound) = if base + requested < range.min {
            (ClampEdge::Floor, range.min)
        } else if base + requested > range.max {
            (ClampEdge::Ceiling, range.max)
        } else {
            continue;
        };

        *delta = bound - base;
        warnings.push(ClampWarning {
            path: path.to_owned(),
            edge,
            bound,
            requested,
            applied: *delta,
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(entries: &[(&str, f64)]) -> IncrementOps {
        entries
            .iter()
            .map(|&(path, delta)| (path.to_owned(), delta))
            .collect()
    }

    #[test]
    fn test_increment_within_range_is_untouched() {
        // Arrange
        let mut increments = ops(&[("status.integrity", -10.0)]);

        // Act
        let warnings =
            clamp_increments(&mut increments, &PathPolicy::standard(), |_| Some(50.0));

        // Assert
        assert!(warnings.is_empty());
        assert_eq!(increments, ops(&[("status.integrity", -10.0)]));
    }

    #[test]
    fn test_increment_below_floor_is_raised() {
        let mut increments = ops(&[("status.integrity", -999.0)]);

        let warnings =
            clamp_increments(&mut increments, &PathPolicy::standard(), |_| Some(100.0));

        assert_eq!(increments, ops(&[("status.integrity", -100.0)]));
        assert_eq!(
            warnings,
            vec![ClampWarning {
                path: "status.integrity".to_owned(),
                edge: ClampEdge::Floor,
                bound: 0.0,
                requested: -999.0,
                applied: -100.0,
            }]
        );
    }

    #[test]
    fn test_increment_above_ceiling_is_lowered() {
        let mut increments = ops(&[("status.core_stability", 20.0)]);

        let warnings =
            clamp_increments(&mut increments, &PathPolicy::standard(), |_| Some(95.0));

        assert_eq!(increments, ops(&[("status.core_stability", 5.0)]));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].edge, ClampEdge::Ceiling);
    }

    #[test]
    fn test_landing_exactly_on_edge_is_not_clamped() {
        let mut increments = ops(&[("status.integrity", -40.0)]);

        let warnings =
            clamp_increments(&mut increments, &PathPolicy::standard(), |_| Some(40.0));

        assert!(warnings.is_empty());
        assert_eq!(increments, ops(&[("status.integrity", -40.0)]));
    }

    #[test]
    fn test_unknown_baseline_skips_clamping() {
        let mut increments = ops(&[("status.integrity", -999.0)]);

        let warnings = clamp_increments(&mut increments, &PathPolicy::standard(), |_| None);

        assert!(warnings.is_empty());
        assert_eq!(increments, ops(&[("status.integrity", -999.0)]));
    }

    #[test]
    fn test_paths_without_absolute_range_are_ignored() {
        let mut increments = ops(&[("stats.combat.strength", 2.0)]);

        let warnings =
            clamp_increments(&mut increments, &PathPolicy::standard(), |_| Some(1_000.0));

        assert!(warnings.is_empty());
        assert_eq!(increments, ops(&[("stats.combat.strength", 2.0)]));
    }

    #[test]
    fn test_warnings_follow_declared_range_order() {
        // Arrange
        let mut increments = ops(&[
            ("status.core_stability", -500.0),
            ("status.integrity", -500.0),
        ]);

        // Act
        let warnings =
            clamp_increments(&mut increments, &PathPolicy::standard(), |_| Some(100.0));

        // Assert
        let paths: Vec<&str> = warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["status.integrity", "status.core_stability"]);
    }
}
