//! Retention time consensus for lipid annotation tables.
//!
//! Detections of the same molecular species (same lipid class, lipid species
//! and molecular species) are merged into consensus calls per true/false
//! positive sub-population, linking detections whose retention times are
//! close enough to be the same chromatographic peak.
//!
//! ```
//! use rtconsensus::{
//!     ConsensusPipeline,
//!     serde::read_record_table_from_reader,
//! };
//!
//! let table = "Lipid Class\tLipid Species\tMolecular Species\tAdduct\tScore\tFragment Type\tRT Group\tTrue Positive\n\
//!              PC\tPC 34:1\tPC 16:0_18:1\t+H+\t5.0\tMLSSF\t10.0\ttrue\n\
//!              PC\tPC 34:1\tPC 16:0_18:1\t+Na+\t8.0\tMLSSF\t10.4\ttrue\n";
//! let records = read_record_table_from_reader(table.as_bytes(), b'\t').unwrap();
//! let out = ConsensusPipeline::default().run(records).unwrap();
//! assert_eq!(out.records.len(), 1);
//! assert_eq!(out.records[0].adduct, "+H+,+Na+");
//! ```

pub mod clustering;
pub mod consensus;
pub mod errors;
pub mod grouping;
pub mod models;
pub mod pipeline;
pub mod serde;

pub use crate::clustering::{
    cluster_by_retention_time,
    cluster_by_retention_time_with_policy,
};
pub use crate::consensus::{
    DonorPolicy,
    reduce_to_consensus,
    reduce_to_consensus_with_policy,
};
pub use crate::errors::{
    InvalidArgumentError,
    InvalidRecordError,
    RecordTableError,
    RtConsensusError,
};
pub use crate::grouping::{
    IdentityGroups,
    filter_by_reference,
};
pub use crate::models::{
    AnnotationRecord,
    IdentityKey,
    MLSSF_FRAGMENT_TYPE,
    RtTolerance,
};
pub use crate::pipeline::{
    ConsensusMode,
    ConsensusOutput,
    ConsensusPipeline,
    ConsensusStats,
};
