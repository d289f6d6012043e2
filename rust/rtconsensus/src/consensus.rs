//! Collapse same-identity records into a single representative line.

use rust_decimal::Decimal;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeSet;

use crate::errors::InvalidRecordError;
use crate::models::AnnotationRecord;
use crate::models::record::bool_label;

/// Which member lends the non-overwritten fields (class, species, fragment
/// type, polarity, comment ...) to the consensus record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonorPolicy {
    /// The last member of the sub-population in scan order. Score and RT
    /// still come from the best scoring member. Long standing behaviour,
    /// tables downstream were generated with it.
    #[default]
    #[serde(rename = "last_scanned")]
    LastScanned,
    /// The best scoring member donates every field.
    #[serde(rename = "best_scoring")]
    BestScoring,
}

/// Reduce `members` to one record for the `target_true_positive`
/// sub-population, using [`DonorPolicy::LastScanned`].
///
/// Returns `Ok(None)` when no member carries the requested label.
///
/// Example:
/// ```
/// use rtconsensus::AnnotationRecord;
/// use rtconsensus::consensus::reduce_to_consensus;
///
/// let base = AnnotationRecord {
///     lipid_class: "PC".into(),
///     lipid_species: "PC 34:1".into(),
///     molecular_species: "PC 16:0_18:1".into(),
///     adduct: "+H+".into(),
///     score: "5.0".into(),
///     retention_time_group: "10.0".into(),
///     true_positive: "true".into(),
///     fragment_type: "MLSSF".into(),
///     polarity: None,
///     comment: None,
/// };
/// let other = AnnotationRecord {
///     adduct: "+Na+".into(),
///     score: "8.0".into(),
///     retention_time_group: "10.2".into(),
///     ..base.clone()
/// };
///
/// let out = reduce_to_consensus(&[base, other], true).unwrap().unwrap();
/// assert_eq!(out.adduct, "+H+,+Na+");
/// assert_eq!(out.score, "8.0");
/// assert_eq!(out.retention_time_group, "10.2");
/// ```
pub fn reduce_to_consensus(
    members: &[AnnotationRecord],
    target_true_positive: bool,
) -> Result<Option<AnnotationRecord>, InvalidRecordError> {
    reduce_to_consensus_with_policy(members, target_true_positive, DonorPolicy::LastScanned)
}

pub fn reduce_to_consensus_with_policy(
    members: &[AnnotationRecord],
    target_true_positive: bool,
    policy: DonorPolicy,
) -> Result<Option<AnnotationRecord>, InvalidRecordError> {
    let mut adducts: BTreeSet<&str> = BTreeSet::new();
    // (score, member) of the first member reaching the running maximum.
    let mut best: Option<(Decimal, &AnnotationRecord)> = None;
    let mut last: Option<&AnnotationRecord> = None;

    for member in members {
        if member.true_positive_flag()? != target_true_positive {
            continue;
        }
        let score = member.score_value()?;
        adducts.insert(member.adduct.as_str());
        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, member)),
        }
        last = Some(member);
    }

    let (Some((_, best)), Some(last)) = (best, last) else {
        return Ok(None);
    };

    let donor = match policy {
        DonorPolicy::LastScanned => last,
        DonorPolicy::BestScoring => best,
    };

    let mut out = donor.clone();
    out.adduct = adducts.into_iter().collect::<Vec<_>>().join(",");
    out.score = best.score.clone();
    out.retention_time_group = best.retention_time_group.clone();
    out.true_positive = bool_label(target_true_positive);
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::test_utils::record;

    #[test]
    fn test_adduct_union_and_best_score() {
        let members = vec![
            record("+H+", "5.0", "10.0", "true"),
            record("+Na+", "8.0", "10.2", "true"),
        ];
        let out = reduce_to_consensus(&members, true).unwrap().unwrap();
        assert_eq!(out.adduct, "+H+,+Na+");
        assert_eq!(out.score, "8.0");
        assert_eq!(out.retention_time_group, "10.2");
        assert_eq!(out.true_positive, "true");
    }

    #[test]
    fn test_adducts_are_deduplicated_and_sorted() {
        let members = vec![
            record("+NH4+", "1", "10.0", "true"),
            record("+H+", "2", "10.1", "true"),
            record("+NH4+", "3", "10.2", "true"),
        ];
        let out = reduce_to_consensus(&members, true).unwrap().unwrap();
        assert_eq!(out.adduct, "+H+,+NH4+");
    }

    #[test]
    fn test_absent_sub_population() {
        let members = vec![
            record("+H+", "5.0", "10.0", "true"),
            record("+Na+", "8.0", "10.2", "TRUE"),
        ];
        assert!(reduce_to_consensus(&members, false).unwrap().is_none());
        assert!(reduce_to_consensus(&[], true).unwrap().is_none());
    }

    #[test]
    fn test_only_target_sub_population_contributes() {
        let members = vec![
            record("+H+", "5.0", "10.0", "true"),
            record("+Na+", "99.0", "11.0", "false"),
        ];
        let out = reduce_to_consensus(&members, true).unwrap().unwrap();
        assert_eq!(out.adduct, "+H+");
        assert_eq!(out.score, "5.0");

        let out = reduce_to_consensus(&members, false).unwrap().unwrap();
        assert_eq!(out.adduct, "+Na+");
        assert_eq!(out.true_positive, "false");
    }

    #[test]
    fn test_first_maximum_wins_ties() {
        let members = vec![
            record("+H+", "8.0", "10.0", "true"),
            record("+Na+", "8.00", "10.3", "true"),
        ];
        let out = reduce_to_consensus(&members, true).unwrap().unwrap();
        assert_eq!(out.score, "8.0");
        assert_eq!(out.retention_time_group, "10.0");
    }

    #[test]
    fn test_last_scanned_member_donates_structure() {
        let mut first = record("+H+", "9.0", "10.0", "true");
        first.comment = Some("best".to_string());
        first.polarity = Some("positive".to_string());
        let mut second = record("+Na+", "1.0", "10.3", "true");
        second.comment = Some("last".to_string());

        let members = vec![first, second];
        let out = reduce_to_consensus(&members, true).unwrap().unwrap();
        assert_eq!(out.comment.as_deref(), Some("last"));
        assert_eq!(out.polarity, None);
        assert_eq!(out.score, "9.0");
        assert_eq!(out.retention_time_group, "10.0");

        let strict =
            reduce_to_consensus_with_policy(&members, true, DonorPolicy::BestScoring)
                .unwrap()
                .unwrap();
        assert_eq!(strict.comment.as_deref(), Some("best"));
        assert_eq!(strict.polarity.as_deref(), Some("positive"));
        assert_eq!(strict.adduct, "+H+,+Na+");
    }

    #[test]
    fn test_label_is_normalized() {
        let members = vec![record("+H+", "1", "10.0", "TRUE")];
        let out = reduce_to_consensus(&members, true).unwrap().unwrap();
        assert_eq!(out.true_positive, "true");
    }

    #[test]
    fn test_malformed_score_is_an_error() {
        let members = vec![
            record("+H+", "1", "10.0", "true"),
            record("+Na+", "high", "10.1", "true"),
        ];
        let err = reduce_to_consensus(&members, true).unwrap_err();
        assert_eq!(err.field, "score");
    }

    #[test]
    fn test_malformed_label_is_an_error() {
        let members = vec![record("+H+", "1", "10.0", "yes")];
        let err = reduce_to_consensus(&members, true).unwrap_err();
        assert_eq!(err.field, "true_positive");
    }
}
