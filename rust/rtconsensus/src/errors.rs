use std::fmt::Display;
use std::path::PathBuf;

/// A record whose content cannot be used by the consensus step.
///
/// This is fatal for the batch the record belongs to, there is no
/// attempt to substitute a default value.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidRecordError {
    pub field: &'static str,
    pub value: String,
    pub context: String,
}

impl InvalidRecordError {
    pub fn new(field: &'static str, value: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            context: context.into(),
        }
    }
}

impl Display for InvalidRecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid value {:?} for field '{}' ({})",
            self.value, self.field, self.context
        )
    }
}

impl std::error::Error for InvalidRecordError {}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidArgumentError {
    EmptyRecords,
    NonPositiveTolerance(String),
}

impl Display for InvalidArgumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRecords => write!(f, "Expected at least one record to cluster"),
            Self::NonPositiveTolerance(x) => {
                write!(f, "RT tolerance must be a positive number, got {}", x)
            }
        }
    }
}

impl std::error::Error for InvalidArgumentError {}

#[derive(Debug)]
pub enum RecordTableError {
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    Csv(csv::Error),
    MissingColumns(Vec<&'static str>),
    UnsupportedExtension(String),
}

impl Display for RecordTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                source,
                path: Some(path),
            } => write!(f, "Error accessing {}: {}", path.display(), source),
            Self::Io { source, path: None } => write!(f, "I/O error: {}", source),
            Self::Csv(e) => write!(f, "Error parsing table: {}", e),
            Self::MissingColumns(cols) => {
                write!(f, "Table is missing required columns: {}", cols.join(", "))
            }
            Self::UnsupportedExtension(ext) => {
                write!(f, "Unsupported table extension: .{}", ext)
            }
        }
    }
}

impl std::error::Error for RecordTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for RecordTableError {
    fn from(e: csv::Error) -> Self {
        RecordTableError::Csv(e)
    }
}

impl From<std::io::Error> for RecordTableError {
    fn from(e: std::io::Error) -> Self {
        RecordTableError::Io {
            source: e,
            path: None,
        }
    }
}

#[derive(Debug)]
pub enum RtConsensusError {
    InvalidRecord(InvalidRecordError),
    InvalidArgument(InvalidArgumentError),
    RecordTable(RecordTableError),
}

impl Display for RtConsensusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRecord(e) => write!(f, "{}", e),
            Self::InvalidArgument(e) => write!(f, "{}", e),
            Self::RecordTable(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RtConsensusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRecord(e) => Some(e),
            Self::InvalidArgument(e) => Some(e),
            Self::RecordTable(e) => Some(e),
        }
    }
}

impl From<InvalidRecordError> for RtConsensusError {
    fn from(x: InvalidRecordError) -> Self {
        Self::InvalidRecord(x)
    }
}

impl From<InvalidArgumentError> for RtConsensusError {
    fn from(x: InvalidArgumentError) -> Self {
        Self::InvalidArgument(x)
    }
}

impl From<RecordTableError> for RtConsensusError {
    fn from(x: RecordTableError) -> Self {
        Self::RecordTable(x)
    }
}

pub type Result<T> = std::result::Result<T, RtConsensusError>;
