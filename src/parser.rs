//! Parsing the gene to phenotype association masterdata

pub(crate) mod binary;

/// Module to parse gene - phenotype association files
///
/// The expected input is the `genes_to_phenotype.txt` file provided by
/// Jax, or any other source following the same six column layout.
pub mod genes_to_phenotype {
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use std::path::Path;

    use tracing::debug;

    use crate::index::PhenotypeIndex;
    use crate::term::HpoTerm;
    use crate::{PhenomapError, PhenomapResult};

    /// First field of the header line, marking a line to skip
    const HEADER_TOKEN: &str = "ncbi_gene_id";

    /// Number of tab separated fields in a valid association record
    const RECORD_FIELDS: usize = 6;

    struct ParsedAssociation<'a> {
        symbol: &'a str,
        hpo_id: &'a str,
        hpo_name: &'a str,
    }

    /// Parses a single line of `genes_to_phenotype.txt`
    ///
    /// Returns `None` for the header line. The numeric gene id, frequency
    /// and disease id fields are not used, but a line without exactly six
    /// fields fails the whole build.
    ///
    /// ```text
    /// ncbi_gene_id    gene_symbol hpo_id  hpo_name    frequency   disease_id
    /// 10  NAT2    HP:0000007  Autosomal recessive inheritance         -       OMIM:243400
    /// 16  AARS1   HP:0002460  Distal muscle weakness                  15/15   OMIM:613287
    /// ```
    fn association_line(line: &str, line_nr: usize) -> PhenomapResult<Option<ParsedAssociation<'_>>> {
        let fields: Vec<&str> = line.split('\t').collect();

        if fields[0] == HEADER_TOKEN {
            return Ok(None);
        }

        if fields.len() != RECORD_FIELDS {
            return Err(PhenomapError::MalformedRecord {
                line: line_nr,
                content: line.to_string(),
            });
        }

        Ok(Some(ParsedAssociation {
            symbol: fields[1],
            hpo_id: fields[2],
            hpo_name: fields[3],
        }))
    }

    /// Builds a [`PhenotypeIndex`] from association records
    ///
    /// Repeated `(gene, term)` pairs from different disease or frequency
    /// rows collapse into a single entry.
    ///
    /// # Errors
    ///
    /// - [`PhenomapError::MalformedRecord`]: a line does not have exactly
    ///   six fields. The build is aborted, no partial index is returned.
    /// - [`PhenomapError::InvalidInput`]: the input stream could not be read
    pub fn parse<R: BufRead>(reader: R) -> PhenomapResult<PhenotypeIndex> {
        let mut index = PhenotypeIndex::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|err| {
                PhenomapError::InvalidInput(format!("unable to read line {}: {}", idx + 1, err))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(assoc) = association_line(&line, idx + 1)? {
                index.add_association(assoc.symbol, HpoTerm::new(assoc.hpo_id, assoc.hpo_name));
            }
        }

        debug!("built index for {} genes", index.len());
        Ok(index)
    }

    /// Parse a `genes_to_phenotype.txt` file into a [`PhenotypeIndex`]
    ///
    /// # Errors
    ///
    /// - [`PhenomapError::SourceNotFound`]: file not present or can't be opened
    /// - everything [`parse`] can fail with
    pub fn parse_file<P: AsRef<Path>>(file: P) -> PhenomapResult<PhenotypeIndex> {
        let filename = file.as_ref().display().to_string();
        let file = File::open(file).map_err(|_| PhenomapError::SourceNotFound(filename))?;
        parse(BufReader::new(file))
    }

}
