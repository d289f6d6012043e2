use rtconsensus::{
    ConsensusMode,
    ConsensusPipeline,
    DonorPolicy,
    MLSSF_FRAGMENT_TYPE,
    RtTolerance,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};
use tracing::warn;

use crate::cli::{
    ConsensusArgs,
    PossibleMode,
};
use crate::error::CliError;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub mode: ConsensusMode,
    #[serde(default)]
    pub donor_policy: DonorPolicy,
    #[serde(default = "default_fragment_type")]
    pub fragment_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub path: PathBuf,
}

fn default_fragment_type() -> String {
    MLSSF_FRAGMENT_TYPE.to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mode: ConsensusMode::default(),
            donor_policy: DonorPolicy::default(),
            fragment_type: default_fragment_type(),
        }
    }
}

impl AnalysisConfig {
    pub fn pipeline(&self) -> ConsensusPipeline {
        ConsensusPipeline {
            mode: self.mode,
            donor_policy: self.donor_policy,
            fragment_type: self.fragment_type.clone(),
        }
    }
}

/// Configuration with every required location resolved.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub analysis: AnalysisConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file (if any) and apply the command line overrides.
    pub fn with_cli_args(args: &ConsensusArgs) -> Result<ResolvedConfig, CliError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(input) = &args.input {
            config.input = Some(InputConfig {
                path: input.clone(),
            });
        }
        if let Some(output) = &args.output {
            config.output = Some(OutputConfig {
                path: output.clone(),
            });
        }
        if let Some(mode) = args.mode {
            config.analysis.mode = match (mode, config.analysis.mode) {
                (PossibleMode::Flat, _) => ConsensusMode::Flat,
                (PossibleMode::Clustered, ConsensusMode::RtClustered { tolerance }) => {
                    ConsensusMode::RtClustered { tolerance }
                }
                (PossibleMode::Clustered, ConsensusMode::Flat) => ConsensusMode::default(),
            };
        }
        if let Some(tolerance) = args.rt_tolerance {
            let tolerance = RtTolerance::try_from(tolerance)
                .map_err(|e| CliError::Config(e.to_string()))?;
            match config.analysis.mode {
                ConsensusMode::RtClustered { .. } => {
                    config.analysis.mode = ConsensusMode::RtClustered { tolerance };
                }
                ConsensusMode::Flat => {
                    warn!("Ignoring RT tolerance {} in flat mode", tolerance.minutes());
                }
            }
        }

        let input = config.input.map(|x| x.path).ok_or_else(|| {
            CliError::Config(
                "No input provided, please provide one in either the config file or with the --input flag"
                    .to_string(),
            )
        })?;
        let output = config.output.map(|x| x.path).ok_or_else(|| {
            CliError::Config(
                "No output provided, please provide one in either the config file or with the --output flag"
                    .to_string(),
            )
        })?;

        Ok(ResolvedConfig {
            input,
            output,
            analysis: config.analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ConsensusArgs {
        ConsensusArgs {
            config: None,
            input: Some(PathBuf::from("in.tsv")),
            output: Some(PathBuf::from("out.tsv")),
            mode: None,
            rt_tolerance: None,
        }
    }

    #[test]
    fn test_defaults_without_config_file() {
        let resolved = Config::with_cli_args(&args()).unwrap();
        assert_eq!(resolved.input, PathBuf::from("in.tsv"));
        assert_eq!(resolved.analysis.mode, ConsensusMode::default());
        assert_eq!(resolved.analysis.donor_policy, DonorPolicy::LastScanned);
        assert_eq!(resolved.analysis.fragment_type, "MLSSF");
    }

    #[test]
    fn test_missing_output_is_a_config_error() {
        let mut args = args();
        args.output = None;
        let err = Config::with_cli_args(&args).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_cli_overrides() {
        let mut args = args();
        args.rt_tolerance = Some(0.25);
        let resolved = Config::with_cli_args(&args).unwrap();
        let expected = RtTolerance::try_from(0.25).unwrap();
        assert_eq!(
            resolved.analysis.mode,
            ConsensusMode::RtClustered {
                tolerance: expected
            }
        );

        args.mode = Some(PossibleMode::Flat);
        let resolved = Config::with_cli_args(&args).unwrap();
        assert_eq!(resolved.analysis.mode, ConsensusMode::Flat);

        args.rt_tolerance = Some(-1.0);
        args.mode = None;
        assert!(Config::with_cli_args(&args).is_err());
    }

    #[test]
    fn test_config_file_is_read() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            r#"{
                "input": { "path": "annotations.tsv" },
                "analysis": { "mode": { "type": "flat" }, "donor_policy": "best_scoring" },
                "output": { "path": "consensus.tsv" }
            }"#,
        )
        .unwrap();
        let args = ConsensusArgs {
            config: Some(tmp.path().to_path_buf()),
            input: None,
            output: None,
            mode: None,
            rt_tolerance: None,
        };
        let resolved = Config::with_cli_args(&args).unwrap();
        assert_eq!(resolved.input, PathBuf::from("annotations.tsv"));
        assert_eq!(resolved.output, PathBuf::from("consensus.tsv"));
        assert_eq!(resolved.analysis.mode, ConsensusMode::Flat);
        assert_eq!(resolved.analysis.donor_policy, DonorPolicy::BestScoring);
        assert_eq!(resolved.analysis.fragment_type, "MLSSF");
    }
}
