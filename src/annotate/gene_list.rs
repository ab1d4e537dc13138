use crate::annotate::Annotation;
use crate::index::PhenotypeIndex;
use crate::table::Table;
use crate::{PhenomapError, PhenomapResult};

/// Header row of gene list annotation output
pub const GENE_LIST_HEADER: [&str; 3] = ["Gene", "HPO Terms", "HPO IDs"];

/// Annotates an explicit list of gene symbols
///
/// Produces one output row per input gene, in input order. The list is
/// not deduplicated, repeated genes produce repeated rows. Genes without
/// an index entry and genes with a corrupt entry get their sentinel
/// values instead of real data.
///
/// # Errors
///
/// [`PhenomapError::NoInputData`]: the gene list is empty, no output is
/// produced
///
/// # Examples
///
/// ```
/// use phenomap::annotate::annotate_gene_list;
/// use phenomap::{HpoTerm, PhenotypeIndex};
///
/// let mut index = PhenotypeIndex::new();
/// index.add_association("BRCA1", HpoTerm::new("HP:0001250", "Seizure"));
///
/// let genes = vec!["BRCA1".to_string(), "UNKNOWN".to_string()];
/// let table = annotate_gene_list(&index, &genes).unwrap();
///
/// assert_eq!(table.rows()[0], vec!["BRCA1", "Seizure", "HP:0001250"]);
/// assert_eq!(table.rows()[1], vec!["UNKNOWN", "No HPO terms found", "N/A"]);
/// ```
pub fn annotate_gene_list(index: &PhenotypeIndex, genes: &[String]) -> PhenomapResult<Table> {
    if genes.is_empty() {
        return Err(PhenomapError::NoInputData("the gene list is empty".to_string()));
    }

    let mut table = Table::with_header(GENE_LIST_HEADER.iter().map(|s| s.to_string()).collect());

    for gene in genes {
        let annotation = Annotation::new(index, gene);
        table.push_row(vec![
            gene.clone(),
            annotation.terms_cell().to_string(),
            annotation.ids_cell().to_string(),
        ]);
    }
    Ok(table)
}
