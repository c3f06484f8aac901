//! Duplicate scenario detection.
//!
//! Bucketing is greedy and single-pass: the first unclaimed scenario
//! becomes a bucket's origin, every remaining scenario equal to that
//! origin joins the bucket and leaves the pool, and the scan restarts
//! from the next unclaimed scenario. Membership is decided against the
//! origin only, never transitively across members, so the grouping is
//! intentionally not an equivalence-class partition.

use std::fmt;

use crate::model::Scenario;

/// How a bucket member relates to its bucket's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    /// The scenario that seeded the bucket.
    Origin,
    /// Step texts identical to the origin's, pairwise.
    Full,
    /// Same bound definition sequence as the origin, parameter values
    /// aside.
    IgnoreParameters,
}

impl DuplicateKind {
    /// Report label for this equality kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "ORIGIN",
            Self::Full => "FULL",
            Self::IgnoreParameters => "IGNORE PARAMETERS",
        }
    }
}

impl fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scenario in a duplicate bucket, tagged with how it matched.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateMember<'a> {
    /// The bucketed scenario.
    pub scenario: &'a Scenario,
    /// How it relates to the bucket's origin.
    pub kind: DuplicateKind,
}

/// A reported bucket: the origin plus at least one duplicate.
#[derive(Debug, Clone)]
pub struct DuplicateGroup<'a> {
    /// Members in pool order, the origin first.
    pub members: Vec<DuplicateMember<'a>>,
}

/// Buckets `scenarios` by equality to a greedily chosen origin.
///
/// Full equality is tried before the looser ignore-parameters relation,
/// so identical scenarios always report as `FULL` even when they are
/// also equal by bound definitions. Only buckets with at least one
/// non-origin member are returned.
#[must_use]
pub fn find_duplicated_scenarios<'a>(scenarios: &[&'a Scenario]) -> Vec<DuplicateGroup<'a>> {
    let mut pool: Vec<&'a Scenario> = scenarios.to_vec();
    let mut groups = Vec::new();
    while !pool.is_empty() {
        let origin = pool.remove(0);
        let mut members = vec![DuplicateMember {
            scenario: origin,
            kind: DuplicateKind::Origin,
        }];
        pool.retain(|&candidate| {
            let kind = if origin.is_fully_equal_to(candidate) {
                DuplicateKind::Full
            } else if origin.is_equal_to_ignore_parameters(candidate) {
                DuplicateKind::IgnoreParameters
            } else {
                return true;
            };
            members.push(DuplicateMember {
                scenario: candidate,
                kind,
            });
            false
        });
        if members.len() > 1 {
            groups.push(DuplicateGroup { members });
        }
    }
    groups
}
