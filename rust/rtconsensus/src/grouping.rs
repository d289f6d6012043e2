use std::collections::{
    BTreeMap,
    HashSet,
};

use crate::models::{
    AnnotationRecord,
    IdentityKey,
};

/// Records grouped by lipid class, then lipid species.
///
/// Built once per input batch. Within a species the records keep the
/// order they were read in.
#[derive(Debug, Clone, Default)]
pub struct IdentityGroups {
    classes: BTreeMap<String, BTreeMap<String, Vec<AnnotationRecord>>>,
}

impl IdentityGroups {
    /// Split `records` into the ones with the given fragment type (grouped)
    /// and everything else (returned as is, in input order).
    pub fn partition(
        records: impl IntoIterator<Item = AnnotationRecord>,
        fragment_type: &str,
    ) -> (Self, Vec<AnnotationRecord>) {
        let mut groups = Self::default();
        let mut passthrough = Vec::new();
        for record in records {
            if record.is_fragment_type(fragment_type) {
                groups.push(record);
            } else {
                passthrough.push(record);
            }
        }
        (groups, passthrough)
    }

    pub fn push(&mut self, record: AnnotationRecord) {
        self.classes
            .entry(record.lipid_class.clone())
            .or_default()
            .entry(record.lipid_species.clone())
            .or_default()
            .push(record);
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn num_records(&self) -> usize {
        self.classes
            .values()
            .flat_map(|species| species.values())
            .map(|x| x.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn species(&self, lipid_class: &str, lipid_species: &str) -> Option<&[AnnotationRecord]> {
        self.classes
            .get(lipid_class)
            .and_then(|x| x.get(lipid_species))
            .map(|x| x.as_slice())
    }

    /// One group per molecular identity (class, species, molecular species),
    /// in key order.
    pub fn molecular_groups(&self) -> Vec<Vec<AnnotationRecord>> {
        let mut out = Vec::new();
        for species in self.classes.values() {
            for records in species.values() {
                let mut by_molecule: BTreeMap<&str, Vec<AnnotationRecord>> = BTreeMap::new();
                for record in records {
                    by_molecule
                        .entry(record.molecular_species.as_str())
                        .or_default()
                        .push(record.clone());
                }
                out.extend(by_molecule.into_values());
            }
        }
        out
    }
}

/// Keep the records whose molecular identity also occurs in `reference`.
pub fn filter_by_reference(
    records: Vec<AnnotationRecord>,
    reference: &[AnnotationRecord],
) -> Vec<AnnotationRecord> {
    let known: HashSet<IdentityKey> = reference.iter().map(|r| r.identity_key()).collect();
    records
        .into_iter()
        .filter(|r| known.contains(&r.identity_key()))
        .collect()
}
