use rtconsensus::filter_by_reference;
use rtconsensus::serde::{
    read_record_table,
    write_record_table,
};
use tracing::{
    info,
    instrument,
};

use crate::cli::{
    ConsensusArgs,
    FilterArgs,
    WriteTemplateArgs,
};
use crate::config::Config;
use crate::error::CliError;
use crate::processing::consolidate_with_progress;

const CONFIG_TEMPLATE: &str = r#"{
  "input": { "path": "annotations.tsv" },
  "analysis": {
    "mode": { "type": "clustered", "tolerance": 0.4 },
    "donor_policy": "last_scanned",
    "fragment_type": "MLSSF"
  },
  "output": { "path": "consensus.tsv" }
}"#;

/// Main function for the 'consensus' subcommand.
#[instrument(skip_all)]
pub fn main_consensus(args: ConsensusArgs) -> Result<(), CliError> {
    let config = Config::with_cli_args(&args)?;
    info!("Using configuration: {:#?}", config);

    let records = read_record_table(&config.input)?;
    let pipeline = config.analysis.pipeline();
    let out = consolidate_with_progress(&pipeline, records)?;
    info!("{}", out.stats);

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_record_table(&config.output, &out.records)?;
    println!(
        "Wrote {} rows to {}",
        out.records.len(),
        config.output.display()
    );
    Ok(())
}

/// Main function for the 'filter' subcommand.
#[instrument(skip_all)]
pub fn main_filter(args: FilterArgs) -> Result<(), CliError> {
    let records = read_record_table(&args.input)?;
    let reference = read_record_table(&args.reference)?;
    let n_in = records.len();
    let kept = filter_by_reference(records, &reference);
    info!(
        "Kept {} of {} rows present in {}",
        kept.len(),
        n_in,
        args.reference.display()
    );
    write_record_table(&args.output, &kept)?;
    Ok(())
}

/// Main function for the 'write-template' subcommand.
pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    let target_dir = args.output_path;
    std::fs::create_dir_all(&target_dir)?;

    let config_path = target_dir.join("consensus_config_template.json");
    std::fs::write(&config_path, CONFIG_TEMPLATE)?;
    println!("Wrote config template to: {}", config_path.display());
    Ok(())
}
