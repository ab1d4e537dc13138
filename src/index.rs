//! The gene to phenotype mapping queried by all annotation operations
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::parser::binary::{self, BinaryRecordIterator};
use crate::term::{HpoTerm, TermSet};
use crate::{PhenomapError, PhenomapResult};

/// The value stored for one gene of the [`PhenotypeIndex`]
///
/// Most entries hold the gene's [`TermSet`]. An entry whose persisted
/// payload could not be decoded is kept as [`IndexEntry::Corrupt`], so a
/// lookup can report it per gene instead of the whole index failing to
/// load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    /// The deduplicated set of terms associated with the gene
    Terms(TermSet),
    /// The persisted data for this gene was not a decodable term collection
    Corrupt,
}

impl IndexEntry {
    /// The term set of a valid entry
    pub fn terms(&self) -> Option<&TermSet> {
        match self {
            IndexEntry::Terms(terms) => Some(terms),
            IndexEntry::Corrupt => None,
        }
    }
}

/// `PhenotypeIndex` maps gene symbols to their associated phenotype terms
///
/// The index is built once from an association file (see
/// [`crate::parser::genes_to_phenotype`]), persisted with
/// [`PhenotypeIndex::save`] and loaded read-only by all annotation
/// operations. It is never mutated after the build step.
///
/// Gene symbols are case-sensitive and matched exactly.
///
/// # Examples
///
/// ```
/// use phenomap::parser::genes_to_phenotype;
///
/// let source = "\
/// 10\tNAT2\tHP:0000007\tAutosomal recessive inheritance\t-\tOMIM:243400
/// 10\tNAT2\tHP:0001939\tAbnormality of metabolism/homeostasis\t-\tOMIM:243400
/// ";
/// let index = genes_to_phenotype::parse(source.as_bytes()).unwrap();
///
/// let entry = index.lookup("NAT2").unwrap();
/// assert_eq!(entry.terms().unwrap().len(), 2);
///
/// assert!(index.lookup("nat2").is_none());
/// ```
#[derive(Debug, Default)]
pub struct PhenotypeIndex {
    genes: HashMap<String, IndexEntry>,
}

impl PhenotypeIndex {
    /// Constructs a new, empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of genes in the index
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if the index contains no genes
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns the entry of the given gene symbol
    ///
    /// Returns `None` if the gene is not a key of the index.
    pub fn lookup(&self, symbol: &str) -> Option<&IndexEntry> {
        self.genes.get(symbol)
    }

    /// Records one `(gene, term)` association
    ///
    /// Returns whether the term was newly added to the gene's set.
    /// Repeated associations of the same pair collapse into one entry.
    /// Associations for a gene whose entry is corrupt are discarded.
    pub fn add_association(&mut self, symbol: &str, term: HpoTerm) -> bool {
        match self.genes.entry(symbol.to_string()) {
            Entry::Occupied(entry) => match entry.into_mut() {
                IndexEntry::Terms(terms) => terms.insert(term),
                IndexEntry::Corrupt => false,
            },
            Entry::Vacant(entry) => {
                let mut terms = TermSet::new();
                terms.insert(term);
                entry.insert(IndexEntry::Terms(terms));
                true
            }
        }
    }

    /// Inserts a fully decoded entry, replacing any previous one
    pub(crate) fn insert_entry(&mut self, symbol: String, entry: IndexEntry) {
        self.genes.insert(symbol, entry);
    }

    /// Iterates all `(symbol, entry)` pairs, in no particular order
    pub fn genes(&self) -> std::collections::hash_map::Iter<'_, String, IndexEntry> {
        self.genes.iter()
    }

    /// Returns a binary representation of the index
    ///
    /// The layout is a 4 byte header (magic bytes + format version)
    /// followed by one length-prefixed record per gene. Records are
    /// written in lexical symbol order, so the same content always
    /// serializes to the same bytes.
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut res = binary::header();

        let mut entries: Vec<(&String, &IndexEntry)> = self.genes.iter().collect();
        entries.sort_by_key(|(symbol, _)| *symbol);
        for (symbol, entry) in entries {
            res.append(&mut binary::record_bytes(symbol, entry));
        }
        res
    }

    /// Builds an index from bytes as produced by [`PhenotypeIndex::as_bytes`]
    ///
    /// # Errors
    ///
    /// [`PhenomapError::ParseBinaryError`]: empty payload, unknown header
    /// or broken record framing. A single undecodable entry body does not
    /// fail the load, the affected gene becomes [`IndexEntry::Corrupt`].
    pub fn from_bytes(bytes: &[u8]) -> PhenomapResult<Self> {
        let bytes = binary::version(bytes)?;
        debug!("parsing index from bytes v{}", bytes.version());

        let mut index = PhenotypeIndex::new();
        for record in BinaryRecordIterator::new(bytes) {
            let (symbol, entry) = record?;
            index.insert_entry(symbol, entry);
        }

        // a persisted index is never empty, an empty payload means the
        // file was truncated or never written completely
        if index.is_empty() {
            return Err(PhenomapError::ParseBinaryError);
        }
        Ok(index)
    }

    /// Loads a persisted index from disk
    ///
    /// # Errors
    ///
    /// - [`PhenomapError::SourceNotFound`]: file not present or can't be opened
    /// - [`PhenomapError::CorruptIndex`]: file content is empty or unreadable
    pub fn load<P: AsRef<Path>>(file: P) -> PhenomapResult<Self> {
        let filename = file.as_ref().display().to_string();
        let mut fh =
            File::open(file).map_err(|_| PhenomapError::SourceNotFound(filename.clone()))?;

        let mut bytes = Vec::new();
        fh.read_to_end(&mut bytes)
            .map_err(|_| PhenomapError::CorruptIndex(filename.clone()))?;

        Self::from_bytes(&bytes).map_err(|_| PhenomapError::CorruptIndex(filename))
    }

    /// Persists the index to disk
    ///
    /// # Errors
    ///
    /// [`PhenomapError::CannotWriteFile`]: target can't be created or written
    pub fn save<P: AsRef<Path>>(&self, file: P) -> PhenomapResult<()> {
        let filename = file.as_ref().display().to_string();
        let mut fh =
            File::create(file).map_err(|_| PhenomapError::CannotWriteFile(filename.clone()))?;
        fh.write_all(&self.as_bytes())
            .map_err(|_| PhenomapError::CannotWriteFile(filename))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn example_index() -> PhenotypeIndex {
        let mut index = PhenotypeIndex::new();
        index.add_association("NAT2", HpoTerm::new("HP:0000007", "Autosomal recessive inheritance"));
        index.add_association("NAT2", HpoTerm::new("HP:0001939", "Abnormality of metabolism/homeostasis"));
        index.add_association("AARS1", HpoTerm::new("HP:0002460", "Distal muscle weakness"));
        index
    }

    #[test]
    fn add_association_dedups() {
        let mut index = PhenotypeIndex::new();
        assert!(index.add_association("NAT2", HpoTerm::new("HP:0000007", "foobar")));
        assert!(!index.add_association("NAT2", HpoTerm::new("HP:0000007", "foobar")));

        let terms = index
            .lookup("NAT2")
            .expect("NAT2 was added")
            .terms()
            .expect("NAT2 is a valid entry");
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let index = example_index();
        assert!(index.lookup("NAT2").is_some());
        assert!(index.lookup("Nat2").is_none());
    }

    #[test]
    fn corrupt_entries_discard_associations() {
        let mut index = PhenotypeIndex::new();
        index.insert_entry("BRCA1".to_string(), IndexEntry::Corrupt);
        assert!(!index.add_association("BRCA1", HpoTerm::new("HP:0001250", "Seizure")));
        assert_eq!(index.lookup("BRCA1"), Some(&IndexEntry::Corrupt));
    }

    #[test]
    fn index_to_and_from_bytes() {
        let index = example_index();
        let bytes = index.as_bytes();

        let loaded = PhenotypeIndex::from_bytes(&bytes).expect("valid bytes");
        assert_eq!(loaded.len(), index.len());
        for (symbol, entry) in index.genes() {
            assert_eq!(loaded.lookup(symbol), Some(entry));
        }
    }

    #[test]
    fn serialization_is_deterministic() {
        let a = example_index();
        let mut b = PhenotypeIndex::new();
        // same associations, different insertion order
        b.add_association("AARS1", HpoTerm::new("HP:0002460", "Distal muscle weakness"));
        b.add_association("NAT2", HpoTerm::new("HP:0001939", "Abnormality of metabolism/homeostasis"));
        b.add_association("NAT2", HpoTerm::new("HP:0000007", "Autosomal recessive inheritance"));

        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn empty_payload_is_an_error() {
        assert!(PhenotypeIndex::from_bytes(&[]).is_err());
        // a header without any records is an empty index
        let header = [0x50, 0x48, 0x4d, 1u8];
        assert!(PhenotypeIndex::from_bytes(&header).is_err());
    }

    #[test]
    fn load_missing_file() {
        let res = PhenotypeIndex::load("does/not/exist.phm");
        assert!(matches!(res, Err(PhenomapError::SourceNotFound(_))));
    }
}
