//! Single pass chain-linkage clustering of same-identity records over
//! retention time.
//!
//! Records are sorted by RT (ties by their true-positive label) and walked
//! once. A record joins the open cluster when its RT is within tolerance of
//! the *last record added* to that cluster and it carries the exact same
//! true-positive label. Each closed cluster yields one record: singletons are
//! returned untouched, larger clusters are reduced with
//! [`crate::consensus::reduce_to_consensus_with_policy`].

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::consensus::{
    DonorPolicy,
    reduce_to_consensus_with_policy,
};
use crate::errors::{
    InvalidArgumentError,
    Result,
};
use crate::models::{
    AnnotationRecord,
    RtTolerance,
};

pub fn cluster_by_retention_time(
    records: &[AnnotationRecord],
    tolerance: RtTolerance,
) -> Result<Vec<AnnotationRecord>> {
    cluster_by_retention_time_with_policy(records, tolerance, DonorPolicy::LastScanned)
}

pub fn cluster_by_retention_time_with_policy(
    records: &[AnnotationRecord],
    tolerance: RtTolerance,
    policy: DonorPolicy,
) -> Result<Vec<AnnotationRecord>> {
    if records.is_empty() {
        return Err(InvalidArgumentError::EmptyRecords.into());
    }

    // Every RT has to parse before anything is emitted.
    let mut sorted: Vec<(Decimal, &AnnotationRecord)> = records
        .iter()
        .map(|r| r.rt_value().map(|rt| (rt, r)))
        .collect::<std::result::Result<_, _>>()?;
    sorted.sort_by(|(rt_a, a), (rt_b, b)| {
        rt_a.cmp(rt_b)
            .then_with(|| a.true_positive.cmp(&b.true_positive))
    });

    let mut out = Vec::new();
    let mut current: Vec<&AnnotationRecord> = Vec::new();
    let mut last_rt = Decimal::ZERO;

    for (rt, record) in sorted {
        let extends = current.last().is_some_and(|last| {
            tolerance.links(last_rt, rt) && record.true_positive == last.true_positive
        });
        if !extends && !current.is_empty() {
            out.push(close_cluster(&current, policy)?);
            current.clear();
        }
        current.push(record);
        last_rt = rt;
    }
    out.push(close_cluster(&current, policy)?);

    Ok(dedup_records(out))
}

fn close_cluster(
    members: &[&AnnotationRecord],
    policy: DonorPolicy,
) -> Result<AnnotationRecord> {
    let first = members[0];
    if members.len() == 1 {
        return Ok(first.clone());
    }

    let label = first.true_positive_flag()?;
    let owned: Vec<AnnotationRecord> = members.iter().map(|m| (*m).clone()).collect();
    let consensus = reduce_to_consensus_with_policy(&owned, label, policy)?;
    // All members share the label, the reducer always has a sub-population.
    Ok(consensus.unwrap_or_else(|| first.clone()))
}

/// Drop exact (all fields equal) duplicates, keeping the first occurrence.
pub fn dedup_records(records: Vec<AnnotationRecord>) -> Vec<AnnotationRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RtConsensusError;
    use crate::models::record::test_utils::record;

    #[test]
    fn test_singleton_passthrough() {
        let mut rec = record("+H+", "5.0", "10.0", "TRUE");
        rec.comment = Some("kept".to_string());
        let out = cluster_by_retention_time(&[rec.clone()], RtTolerance::default()).unwrap();
        assert_eq!(out, vec![rec]);
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let err = cluster_by_retention_time(&[], RtTolerance::default()).unwrap_err();
        assert!(matches!(
            err,
            RtConsensusError::InvalidArgument(InvalidArgumentError::EmptyRecords)
        ));
    }

    #[test]
    fn test_non_numeric_rt_aborts_batch() {
        let records = vec![
            record("+H+", "5.0", "10.0", "true"),
            record("+Na+", "5.0", "ten", "true"),
        ];
        let err = cluster_by_retention_time(&records, RtTolerance::default()).unwrap_err();
        match err {
            RtConsensusError::InvalidRecord(e) => {
                assert_eq!(e.field, "retention_time_group");
                assert_eq!(e.value, "ten");
            }
            other => panic!("Unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_input_order_does_not_matter_for_disjoint_rts() {
        let records = vec![
            record("+Na+", "8.0", "10.2", "true"),
            record("+H+", "5.0", "10.0", "true"),
            record("+H+", "3.0", "15.0", "true"),
        ];
        let out = cluster_by_retention_time(&records, RtTolerance::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].adduct, "+H+,+Na+");
        assert_eq!(out[0].retention_time_group, "10.2");
        assert_eq!(out[1], records[2]);
    }

    #[test]
    fn test_label_comparison_is_case_sensitive() {
        let records = vec![
            record("+H+", "5.0", "10.0", "TRUE"),
            record("+Na+", "8.0", "10.1", "true"),
        ];
        let out = cluster_by_retention_time(&records, RtTolerance::default()).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_duplicates_collapse() {
        // "TRUE" sorts before "true", so the two upper case rows cluster
        // together and the lower case row stands alone. The consensus of
        // the first cluster normalizes its label and becomes identical to
        // the singleton.
        let upper = record("+H+", "5.0", "10.0", "TRUE");
        let lower = record("+H+", "5.0", "10.0", "true");
        let out = cluster_by_retention_time(
            &[lower.clone(), upper.clone(), upper],
            RtTolerance::default(),
        )
        .unwrap();
        assert_eq!(out, vec![lower]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let a = record("+H+", "1", "1", "true");
        let b = record("+Na+", "1", "1", "true");
        let out = dedup_records(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(out, vec![a, b]);
    }
}
