use tracing::warn;

use crate::annotate::Annotation;
use crate::index::PhenotypeIndex;
use crate::table::{Row, Table};
use crate::{PhenomapError, PhenomapResult, DEFAULT_GENE_COLUMN, DEFAULT_INSERT_OFFSET};

/// Header name of the inserted terms column
pub const TERMS_COLUMN_NAME: &str = "HPO_Terms";
/// Header name of the inserted ids column
pub const IDS_COLUMN_NAME: &str = "HPO_ID";

/// Configuration for merging annotations into a variant table
///
/// Both values depend on the shape of the variant-table schema in use
/// and must come from the caller, they are not derivable from the data.
/// The defaults describe the schema the tool was originally written for.
#[derive(Debug, Clone, Copy)]
pub struct MergeConfig {
    /// Zero-based index of the column holding the gene symbol
    pub gene_column: usize,
    /// The two annotation columns are inserted at `gene_column + insert_offset`
    pub insert_offset: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            gene_column: DEFAULT_GENE_COLUMN,
            insert_offset: DEFAULT_INSERT_OFFSET,
        }
    }
}

impl MergeConfig {
    fn insert_at(&self) -> usize {
        self.gene_column + self.insert_offset
    }
}

/// Annotates every row of a variant table
///
/// For each data row the gene symbol is taken from the configured column
/// and looked up exactly like in gene list annotation. The terms cell and
/// the ids cell are inserted at `gene_column + insert_offset`, growing
/// every row by exactly two columns. Row count and row order are
/// preserved, this is a 1:1 augmentation, not a filter.
///
/// Bad rows do not abort the run: a row too narrow to hold the gene
/// column is annotated with the not-found sentinels, a row too narrow
/// for the insertion point gets the two cells appended at its end. Both
/// conditions are logged with the row number.
///
/// # Errors
///
/// [`PhenomapError::NoInputData`]: the table has no data rows
pub fn annotate_variant_table(
    index: &PhenotypeIndex,
    table: &Table,
    config: &MergeConfig,
) -> PhenomapResult<Table> {
    if table.is_empty() {
        return Err(PhenomapError::NoInputData(
            "the variant table has no data rows".to_string(),
        ));
    }

    let mut out = Table::new();

    if let Some(header) = table.header() {
        let mut header = header.clone();
        if insert_cells(
            &mut header,
            config.insert_at(),
            TERMS_COLUMN_NAME.to_string(),
            IDS_COLUMN_NAME.to_string(),
        ) {
            warn!(
                "header has fewer than {} columns, annotation columns appended at its end",
                config.insert_at()
            );
        }
        out.set_header(header);
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let annotation = match row.get(config.gene_column) {
            Some(symbol) => Annotation::new(index, symbol),
            None => {
                warn!(
                    "row {} has no column {}, annotating as not found",
                    idx + 1,
                    config.gene_column
                );
                Annotation::NotFound
            }
        };

        let mut row = row.clone();
        if insert_cells(
            &mut row,
            config.insert_at(),
            annotation.terms_cell().to_string(),
            annotation.ids_cell().to_string(),
        ) {
            warn!(
                "row {} has fewer than {} columns, annotation columns appended at its end",
                idx + 1,
                config.insert_at()
            );
        }
        out.push_row(row);
    }
    Ok(out)
}

/// Inserts the two annotation cells, keeping the row aligned 1:1 with its
/// input. Returns `true` if the insertion point had to be clamped to the
/// row's end.
fn insert_cells(row: &mut Row, at: usize, terms: String, ids: String) -> bool {
    let clamped = at > row.len();
    let at = if clamped { row.len() } else { at };
    row.insert(at, terms);
    row.insert(at + 1, ids);
    clamped
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::term::HpoTerm;
    use crate::{NOT_AVAILABLE, NO_TERMS_FOUND};

    fn example_index() -> PhenotypeIndex {
        let mut index = PhenotypeIndex::new();
        index.add_association("BRCA1", HpoTerm::new("HP:0001250", "Seizure"));
        index.add_association("BRCA1", HpoTerm::new("HP:0000252", "Microcephaly"));
        index
    }

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|s| s.to_string()).collect()
    }

    /// 6 columns, gene symbol in column 2, insertion right behind it
    fn config() -> MergeConfig {
        MergeConfig {
            gene_column: 2,
            insert_offset: 1,
        }
    }

    fn example_table() -> Table {
        let mut table = Table::with_header(row(&["Chrom", "Pos", "Gene", "Ref", "Alt", "Effect"]));
        table.push_row(row(&["chr1", "100", "BRCA1", "A", "T", "missense"]));
        table.push_row(row(&["chr2", "200", "UNKNOWN", "C", "G", "synonymous"]));
        table
    }

    #[test]
    fn rows_and_order_are_preserved() {
        let out = annotate_variant_table(&example_index(), &example_table(), &config())
            .expect("table has data rows");

        assert_eq!(out.n_rows(), 2);
        assert_eq!(out.rows()[0][0], "chr1");
        assert_eq!(out.rows()[1][0], "chr2");
    }

    #[test]
    fn cells_are_inserted_at_the_configured_offset() {
        let out = annotate_variant_table(&example_index(), &example_table(), &config())
            .expect("table has data rows");

        // every row grows by exactly two columns
        assert_eq!(out.header().expect("header is kept").len(), 8);
        assert!(out.rows().iter().all(|row| row.len() == 8));

        assert_eq!(out.header().expect("header is kept")[3], TERMS_COLUMN_NAME);
        assert_eq!(out.header().expect("header is kept")[4], IDS_COLUMN_NAME);

        assert_eq!(out.rows()[0][3], "Microcephaly, Seizure");
        assert_eq!(out.rows()[0][4], "HP:0000252, HP:0001250");
        // original columns survive around the insertion
        assert_eq!(out.rows()[0][2], "BRCA1");
        assert_eq!(out.rows()[0][5], "A");
    }

    #[test]
    fn missing_gene_gets_sentinels() {
        let out = annotate_variant_table(&example_index(), &example_table(), &config())
            .expect("table has data rows");

        assert_eq!(out.rows()[1][3], NO_TERMS_FOUND);
        assert_eq!(out.rows()[1][4], NOT_AVAILABLE);
    }

    #[test]
    fn narrow_row_is_annotated_as_not_found() {
        let mut table = example_table();
        table.push_row(row(&["chr3", "300"]));

        let out = annotate_variant_table(&example_index(), &table, &config())
            .expect("table has data rows");

        assert_eq!(out.n_rows(), 3);
        // gene column is out of range, cells are appended at the row's end
        assert_eq!(out.rows()[2], row(&["chr3", "300", NO_TERMS_FOUND, NOT_AVAILABLE]));
    }

    #[test]
    fn empty_table_is_an_error() {
        let table = Table::with_header(row(&["Chrom", "Pos", "Gene"]));
        let res = annotate_variant_table(&example_index(), &table, &config());
        assert!(matches!(res, Err(PhenomapError::NoInputData(_))));
    }

    #[test]
    fn default_config_matches_source_schema() {
        let config = MergeConfig::default();
        assert_eq!(config.gene_column, 4);
        assert_eq!(config.insert_at(), 24);
    }
}
