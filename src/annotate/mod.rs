//! Annotation of genes and variant tables against a [`PhenotypeIndex`]
//!
//! All operations take the index as an explicit parameter, nothing is
//! loaded implicitly. The index is queried read-only.
mod gene_list;
mod projection;
mod variant_table;

pub use gene_list::{annotate_gene_list, GENE_LIST_HEADER};
pub use projection::{parse_column_selection, project_columns};
pub use variant_table::{annotate_variant_table, MergeConfig, IDS_COLUMN_NAME, TERMS_COLUMN_NAME};

use crate::index::{IndexEntry, PhenotypeIndex};
use crate::{INVALID_DATA_FORMAT, NOT_AVAILABLE, NO_TERMS_FOUND};

/// The outcome of annotating a single gene symbol
///
/// Every lookup resolves to exactly one variant; rendering to output
/// cells is the same on all annotation paths: the terms field first,
/// the ids field second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// The gene is in the index, both fields are joined from the same
    /// term iteration and therefore pairwise consistent
    Found {
        /// All term names, comma-joined
        terms: String,
        /// All term ids, comma-joined
        ids: String,
    },
    /// The gene is not a key of the index
    NotFound,
    /// The gene's index entry could not be decoded
    Corrupt,
}

impl Annotation {
    /// Annotates one gene symbol against the index
    pub fn new(index: &PhenotypeIndex, symbol: &str) -> Self {
        match index.lookup(symbol) {
            Some(IndexEntry::Terms(terms)) => Annotation::Found {
                terms: terms.joined_names(),
                ids: terms.joined_ids(),
            },
            Some(IndexEntry::Corrupt) => Annotation::Corrupt,
            None => Annotation::NotFound,
        }
    }

    /// The value of the terms output field
    pub fn terms_cell(&self) -> &str {
        match self {
            Annotation::Found { terms, .. } => terms,
            Annotation::NotFound => NO_TERMS_FOUND,
            Annotation::Corrupt => INVALID_DATA_FORMAT,
        }
    }

    /// The value of the ids output field
    pub fn ids_cell(&self) -> &str {
        match self {
            Annotation::Found { ids, .. } => ids,
            Annotation::NotFound | Annotation::Corrupt => NOT_AVAILABLE,
        }
    }
}
