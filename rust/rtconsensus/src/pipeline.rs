use serde::{
    Deserialize,
    Serialize,
};
use std::fmt::Display;
use tracing::{
    debug,
    info,
    warn,
};

use crate::clustering::{
    cluster_by_retention_time_with_policy,
    dedup_records,
};
use crate::consensus::{
    DonorPolicy,
    reduce_to_consensus_with_policy,
};
use crate::errors::Result;
use crate::grouping::IdentityGroups;
use crate::models::{
    AnnotationRecord,
    MLSSF_FRAGMENT_TYPE,
    RtTolerance,
};

/// How the records of one molecular identity are consolidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConsensusMode {
    /// Chain cluster over RT, one consensus line per cluster.
    #[serde(rename = "clustered")]
    RtClustered {
        #[serde(default)]
        tolerance: RtTolerance,
    },
    /// Members are interchangeable regardless of RT, one "true" and one
    /// "false" line per identity at most.
    #[serde(rename = "flat")]
    Flat,
}

impl Default for ConsensusMode {
    fn default() -> Self {
        Self::RtClustered {
            tolerance: RtTolerance::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsensusStats {
    pub input_records: usize,
    pub passthrough_records: usize,
    pub molecular_groups: usize,
    pub consensus_records: usize,
    pub true_positive_records: usize,
    pub false_positive_records: usize,
}

impl Display for ConsensusStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} input rows, {} passed through, {} molecular groups -> {} consensus rows ({} TP / {} FP)",
            self.input_records,
            self.passthrough_records,
            self.molecular_groups,
            self.consensus_records,
            self.true_positive_records,
            self.false_positive_records,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ConsensusOutput {
    /// Consensus and passthrough rows, deduplicated and in natural order.
    pub records: Vec<AnnotationRecord>,
    pub stats: ConsensusStats,
}

#[derive(Debug, Clone)]
pub struct ConsensusPipeline {
    pub mode: ConsensusMode,
    pub donor_policy: DonorPolicy,
    pub fragment_type: String,
}

impl Default for ConsensusPipeline {
    fn default() -> Self {
        Self {
            mode: ConsensusMode::default(),
            donor_policy: DonorPolicy::default(),
            fragment_type: MLSSF_FRAGMENT_TYPE.to_string(),
        }
    }
}

impl ConsensusPipeline {
    pub fn partition(
        &self,
        records: Vec<AnnotationRecord>,
    ) -> (IdentityGroups, Vec<AnnotationRecord>) {
        IdentityGroups::partition(records, &self.fragment_type)
    }

    /// Consolidate the records of a single molecular identity.
    pub fn process_group(&self, group: &[AnnotationRecord]) -> Result<Vec<AnnotationRecord>> {
        if group.is_empty() {
            return Ok(Vec::new());
        }
        let out = match self.mode {
            ConsensusMode::RtClustered { tolerance } => {
                cluster_by_retention_time_with_policy(group, tolerance, self.donor_policy)?
            }
            ConsensusMode::Flat => [true, false]
                .into_iter()
                .map(|target| reduce_to_consensus_with_policy(group, target, self.donor_policy))
                .filter_map(|x| x.transpose())
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };
        debug!(
            "{}: {} records -> {} consensus",
            group[0].identity_key(),
            group.len(),
            out.len()
        );
        Ok(out)
    }

    /// Deduplicate and sort the final table.
    pub fn finish(&self, records: Vec<AnnotationRecord>) -> Vec<AnnotationRecord> {
        let mut out = dedup_records(records);
        out.sort();
        out
    }

    pub fn run(&self, records: Vec<AnnotationRecord>) -> Result<ConsensusOutput> {
        self.run_with_progress(records, |_, _| {})
    }

    /// Same as [`ConsensusPipeline::run`], calling `on_group(done, total)`
    /// after every molecular group.
    pub fn run_with_progress<F>(
        &self,
        records: Vec<AnnotationRecord>,
        mut on_group: F,
    ) -> Result<ConsensusOutput>
    where
        F: FnMut(usize, usize),
    {
        let input_records = records.len();
        let (groups, passthrough) = self.partition(records);
        if groups.is_empty() {
            warn!(
                "No '{}' rows found, all {} rows pass through unchanged",
                self.fragment_type, input_records
            );
        }
        let molecular = groups.molecular_groups();
        info!(
            "Consolidating {} molecular groups over {} lipid classes ({:?})",
            molecular.len(),
            groups.num_classes(),
            self.mode
        );

        let mut consensus = Vec::new();
        for (i, group) in molecular.iter().enumerate() {
            consensus.extend(self.process_group(group)?);
            on_group(i + 1, molecular.len());
        }

        let stats = ConsensusStats::from_parts(
            input_records,
            passthrough.len(),
            molecular.len(),
            &consensus,
        );
        info!("{}", stats);

        consensus.extend(passthrough);
        Ok(ConsensusOutput {
            records: self.finish(consensus),
            stats,
        })
    }
}

impl ConsensusStats {
    pub fn from_parts(
        input_records: usize,
        passthrough_records: usize,
        molecular_groups: usize,
        consensus: &[AnnotationRecord],
    ) -> Self {
        let true_positive_records = consensus
            .iter()
            .filter(|r| matches!(r.true_positive_flag(), Ok(true)))
            .count();
        let false_positive_records = consensus
            .iter()
            .filter(|r| matches!(r.true_positive_flag(), Ok(false)))
            .count();
        Self {
            input_records,
            passthrough_records,
            molecular_groups,
            consensus_records: consensus.len(),
            true_positive_records,
            false_positive_records,
        }
    }
}
