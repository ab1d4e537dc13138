//! Map genes to Human Phenotype Ontology terms and merge the annotations
//! into variant tables
//!
//! The crate is built around the [`PhenotypeIndex`], a deduplicated mapping
//! from gene symbol to the set of HPO terms associated with the gene. The
//! index is built once from a `genes_to_phenotype.txt`-style association
//! file, persisted in a binary format and loaded read-only by the
//! annotation operations.
//!
//! # Examples
//!
//! ```
//! use phenomap::annotate::annotate_gene_list;
//! use phenomap::parser::genes_to_phenotype;
//!
//! let source = "\
//! ncbi_gene_id\tgene_symbol\thpo_id\thpo_name\tfrequency\tdisease_id
//! 672\tBRCA1\tHP:0001250\tSeizure\t10/20\tOMIM:113705
//! 672\tBRCA1\tHP:0001250\tSeizure\t5/20\tOMIM:604370
//! ";
//!
//! let index = genes_to_phenotype::parse(source.as_bytes()).unwrap();
//! assert_eq!(index.len(), 1);
//!
//! let genes = vec!["BRCA1".to_string(), "UNKNOWN".to_string()];
//! let table = annotate_gene_list(&index, &genes).unwrap();
//! assert_eq!(table.rows()[0], vec!["BRCA1", "Seizure", "HP:0001250"]);
//! assert_eq!(table.rows()[1][1], phenomap::NO_TERMS_FOUND);
//! ```
use thiserror::Error;

pub mod annotate;
pub mod index;
pub mod parser;
pub mod table;
pub mod term;

pub use annotate::{Annotation, MergeConfig};
pub use index::{IndexEntry, PhenotypeIndex};
pub use table::{Row, Table};
pub use term::{HpoTerm, TermSet};

/// Placeholder written to the terms field of a gene without any association
pub const NO_TERMS_FOUND: &str = "No HPO terms found";
/// Placeholder written to the terms field of a gene with a corrupt index entry
pub const INVALID_DATA_FORMAT: &str = "Invalid data format";
/// Placeholder written to the ids field when no real data exists
pub const NOT_AVAILABLE: &str = "N/A";

/// Zero-based column holding the gene symbol in the default variant-table schema
pub const DEFAULT_GENE_COLUMN: usize = 4;
/// Default offset from the gene column at which annotation columns are inserted
pub const DEFAULT_INSERT_OFFSET: usize = 20;

#[derive(Error, Debug)]
pub enum PhenomapError {
    #[error("unable to open {0}")]
    SourceNotFound(String),
    #[error("index data in {0} is empty or corrupted")]
    CorruptIndex(String),
    #[error("malformed association record in line {line}: {content}")]
    MalformedRecord { line: usize, content: String },
    #[error("no input data: {0}")]
    NoInputData(String),
    #[error("column {column} is out of range in row {row}")]
    ColumnOutOfRange { row: usize, column: usize },
    #[error("unable to parse binary index data")]
    ParseBinaryError,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unable to write {0}")]
    CannotWriteFile(String),
}

pub type PhenomapResult<T> = Result<T, PhenomapError>;

/// Reads the first 4 bytes as a big-endian `u32`
///
/// Callers must check the length beforehand.
pub(crate) fn u32_from_bytes(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Reads the first 2 bytes as a big-endian `u16`
pub(crate) fn u16_from_bytes(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}
