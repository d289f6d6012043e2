use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use rtconsensus::{
    AnnotationRecord,
    ConsensusOutput,
    ConsensusPipeline,
    RtConsensusError,
};
use std::time::Instant;
use tracing::info;

/// Runs the pipeline with a progress bar over the molecular groups.
pub fn consolidate_with_progress(
    pipeline: &ConsensusPipeline,
    records: Vec<AnnotationRecord>,
) -> Result<ConsensusOutput, RtConsensusError> {
    let start = Instant::now();
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .expect("Progress template should be valid");
    let pb = ProgressBar::new(0).with_style(style);

    let out = pipeline.run_with_progress(records, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    });
    pb.finish_and_clear();

    info!("Finished consolidation in {:?}", start.elapsed());
    out
}
