use serde::{
    Deserialize,
    Serialize,
};
use std::io::{
    Read,
    Write,
};
use std::path::Path;
use tracing::{
    debug,
    info,
};

use crate::errors::RecordTableError;
use crate::models::AnnotationRecord;

/// Columns every annotation table must carry (canonical names).
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "lipid_class",
    "lipid_species",
    "molecular_species",
    "adduct",
    "score",
    "fragment_type",
    "retention_time_group",
    "true_positive",
];

/// Header spellings seen in the wild, after normalization
/// (lowercase, alphanumerics only), mapped to the canonical column.
const COLUMN_ALIASES: [(&str, &[&str]); 10] = [
    ("lipid_class", &["lipidclass", "class"]),
    ("lipid_species", &["lipidspecies", "species"]),
    ("molecular_species", &["molecularspecies", "molecule"]),
    ("adduct", &["adduct", "adducts"]),
    ("score", &["score"]),
    ("fragment_type", &["fragmenttype", "fragment"]),
    ("polarity", &["polarity", "ionmode"]),
    (
        "retention_time_group",
        &["rtgroup", "retentiontimegroup", "rt", "retentiontime"],
    ),
    ("true_positive", &["truepositive", "tp"]),
    ("comment", &["comment", "comments"]),
];

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Maps a raw header to its canonical column name, if it is one we know.
pub fn canonical_column(header: &str) -> Option<&'static str> {
    let normalized = normalize_header(header);
    COLUMN_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&normalized.as_str()))
        .map(|(canonical, _)| *canonical)
}

pub fn missing_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> Vec<&'static str> {
    let found: Vec<&'static str> = headers.into_iter().filter_map(canonical_column).collect();
    REQUIRED_COLUMNS
        .into_iter()
        .filter(|col| !found.contains(col))
        .collect()
}

/// Column delimiter implied by the file extension.
pub fn delimiter_for_path(path: &Path) -> Result<u8, RecordTableError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "tsv" | "txt" | "tab" => Ok(b'\t'),
        "csv" => Ok(b','),
        other => Err(RecordTableError::UnsupportedExtension(other.to_string())),
    }
}

/// Row as read, keyed by canonical column names.
#[derive(Debug, Clone, Deserialize)]
struct RecordTableRow {
    lipid_class: String,
    lipid_species: String,
    molecular_species: String,
    adduct: String,
    score: String,
    fragment_type: String,
    polarity: Option<String>,
    retention_time_group: String,
    true_positive: String,
    comment: Option<String>,
}

impl From<RecordTableRow> for AnnotationRecord {
    fn from(row: RecordTableRow) -> Self {
        AnnotationRecord {
            lipid_class: row.lipid_class,
            lipid_species: row.lipid_species,
            molecular_species: row.molecular_species,
            adduct: row.adduct,
            score: row.score,
            retention_time_group: row.retention_time_group,
            true_positive: row.true_positive,
            fragment_type: row.fragment_type,
            polarity: row.polarity.filter(|x| !x.trim().is_empty()),
            comment: row.comment.filter(|x| !x.trim().is_empty()),
        }
    }
}

/// Row as written, with the human facing header.
#[derive(Debug, Serialize)]
struct RecordTableRowRef<'a> {
    #[serde(rename = "Lipid Class")]
    lipid_class: &'a str,
    #[serde(rename = "Lipid Species")]
    lipid_species: &'a str,
    #[serde(rename = "Molecular Species")]
    molecular_species: &'a str,
    #[serde(rename = "Adduct")]
    adduct: &'a str,
    #[serde(rename = "Score")]
    score: &'a str,
    #[serde(rename = "Fragment Type")]
    fragment_type: &'a str,
    #[serde(rename = "Polarity")]
    polarity: Option<&'a str>,
    #[serde(rename = "RT Group")]
    retention_time_group: &'a str,
    #[serde(rename = "True Positive")]
    true_positive: &'a str,
    #[serde(rename = "Comment")]
    comment: Option<&'a str>,
}

impl<'a> From<&'a AnnotationRecord> for RecordTableRowRef<'a> {
    fn from(x: &'a AnnotationRecord) -> Self {
        Self {
            lipid_class: &x.lipid_class,
            lipid_species: &x.lipid_species,
            molecular_species: &x.molecular_species,
            adduct: &x.adduct,
            score: &x.score,
            fragment_type: &x.fragment_type,
            polarity: x.polarity.as_deref(),
            retention_time_group: &x.retention_time_group,
            true_positive: &x.true_positive,
            comment: x.comment.as_deref(),
        }
    }
}

pub fn read_record_table<T: AsRef<Path>>(
    path: T,
) -> Result<Vec<AnnotationRecord>, RecordTableError> {
    let path = path.as_ref();
    let delimiter = delimiter_for_path(path)?;
    let handle = std::fs::File::open(path).map_err(|e| RecordTableError::Io {
        source: e,
        path: Some(path.to_path_buf()),
    })?;
    info!("Reading annotation table from {}", path.display());
    let records = read_record_table_from_reader(handle, delimiter)?;
    info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

pub fn read_record_table_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
) -> Result<Vec<AnnotationRecord>, RecordTableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let raw_headers = rdr.headers()?.clone();
    let missing = missing_columns(raw_headers.iter());
    if !missing.is_empty() {
        return Err(RecordTableError::MissingColumns(missing));
    }

    // Only the first column mapping to a canonical name is read. Every other
    // column gets a positional name the row type ignores.
    let mut mapped: Vec<&'static str> = Vec::new();
    let headers: csv::StringRecord = raw_headers
        .iter()
        .enumerate()
        .map(|(i, h)| match canonical_column(h) {
            Some(canonical) if !mapped.contains(&canonical) => {
                mapped.push(canonical);
                canonical.to_string()
            }
            _ => format!("__ignored_{i}"),
        })
        .collect();
    debug!("Resolved headers {:?} -> {:?}", raw_headers, headers);

    let mut out = Vec::new();
    for result in rdr.records() {
        let row = result?;
        if row.iter().all(|x| x.trim().is_empty()) {
            continue;
        }
        let row: RecordTableRow = row.deserialize(Some(&headers))?;
        out.push(row.into());
    }
    Ok(out)
}

pub fn write_record_table<T: AsRef<Path>>(
    path: T,
    records: &[AnnotationRecord],
) -> Result<(), RecordTableError> {
    let path = path.as_ref();
    let delimiter = delimiter_for_path(path)?;
    let handle = std::fs::File::create(path).map_err(|e| RecordTableError::Io {
        source: e,
        path: Some(path.to_path_buf()),
    })?;
    write_record_table_to_writer(handle, delimiter, records)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn write_record_table_to_writer<W: Write>(
    writer: W,
    delimiter: u8,
    records: &[AnnotationRecord],
) -> Result<(), RecordTableError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    for record in records {
        wtr.serialize(RecordTableRowRef::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}
