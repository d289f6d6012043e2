use rust_decimal::Decimal;
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt::Display;
use std::str::FromStr;

use crate::errors::InvalidRecordError;

/// Fragment type tag marking rows eligible for species level consensus.
pub const MLSSF_FRAGMENT_TYPE: &str = "MLSSF";

/// One decoded row of an annotation table.
///
/// Numeric columns (score and RT group) are kept as the text that was read,
/// so a record that passes through untouched is written back byte for byte.
/// They are parsed on demand with [`AnnotationRecord::score_value`] and
/// [`AnnotationRecord::rt_value`].
///
/// The derived ordering is the natural output order: lipid class, lipid
/// species, molecular species, adduct, then the remaining fields so the
/// order is total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub lipid_class: String,
    pub lipid_species: String,
    pub molecular_species: String,
    pub adduct: String,
    pub score: String,
    pub retention_time_group: String,
    pub true_positive: String,
    pub fragment_type: String,
    pub polarity: Option<String>,
    pub comment: Option<String>,
}

/// Key under which two records denote the same molecular identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub lipid_class: String,
    pub lipid_species: String,
    pub molecular_species: String,
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} / {}",
            self.lipid_class, self.lipid_species, self.molecular_species
        )
    }
}

impl AnnotationRecord {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            lipid_class: self.lipid_class.clone(),
            lipid_species: self.lipid_species.clone(),
            molecular_species: self.molecular_species.clone(),
        }
    }

    /// Retention time group as an exact decimal, in minutes.
    ///
    /// Fails on non-numeric text and on values outside the `Decimal` range.
    pub fn rt_value(&self) -> Result<Decimal, InvalidRecordError> {
        parse_decimal(&self.retention_time_group)
            .ok_or_else(|| self.invalid("retention_time_group", &self.retention_time_group))
    }

    pub fn score_value(&self) -> Result<Decimal, InvalidRecordError> {
        parse_decimal(&self.score).ok_or_else(|| self.invalid("score", &self.score))
    }

    /// Case insensitive "true"/"false" label.
    pub fn true_positive_flag(&self) -> Result<bool, InvalidRecordError> {
        let label = self.true_positive.trim();
        if label.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if label.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(self.invalid("true_positive", &self.true_positive))
        }
    }

    pub fn is_fragment_type(&self, tag: &str) -> bool {
        self.fragment_type.trim().eq_ignore_ascii_case(tag)
    }

    fn invalid(&self, field: &'static str, value: &str) -> InvalidRecordError {
        InvalidRecordError::new(
            field,
            value,
            format!("{} [{}]", self.identity_key(), self.adduct),
        )
    }
}

pub(crate) fn bool_label(value: bool) -> String {
    if value {
        "true".to_string()
    } else {
        "false".to_string()
    }
}

/// Parses plain ("10.4") and scientific ("1.04e1") notation.
///
/// `Decimal` holds 96 bits of mantissa, so magnitudes beyond about 7.9e28
/// (e.g. "1e30") are rejected along with non-numeric text.
fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::AnnotationRecord;

    pub fn record(adduct: &str, score: &str, rt: &str, tp: &str) -> AnnotationRecord {
        AnnotationRecord {
            lipid_class: "PC".to_string(),
            lipid_species: "PC 34:1".to_string(),
            molecular_species: "PC 16:0_18:1".to_string(),
            adduct: adduct.to_string(),
            score: score.to_string(),
            retention_time_group: rt.to_string(),
            true_positive: tp.to_string(),
            fragment_type: "MLSSF".to_string(),
            polarity: None,
            comment: None,
        }
    }
}
