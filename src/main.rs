use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use phenomap::annotate::{
    annotate_gene_list, annotate_variant_table, parse_column_selection, project_columns,
    MergeConfig,
};
use phenomap::parser::genes_to_phenotype;
use phenomap::table::{gene_list_from_path, Table};
use phenomap::{PhenotypeIndex, DEFAULT_GENE_COLUMN, DEFAULT_INSERT_OFFSET};

/// Suffix appended to the input filename when no output path is given
const OUTPUT_SUFFIX: &str = "_mapped_terms";

/// Columns kept by `merge --truncate` unless `--columns` is given
const DEFAULT_TRUNCATE_COLUMNS: &str = "0-4,7,9,14-18,20-40";

/// Annotate genes and variant tables with HPO terms.
#[derive(Parser, Debug)]
#[command(name = "phenomap")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a phenotype index from a gene to phenotype association file
    Build(BuildArgs),

    /// Annotate a list of genes with their HPO terms and ids
    Genes(GenesArgs),

    /// Annotate a variant table and merge the annotation columns into it
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Tab separated association file (genes_to_phenotype.txt)
    #[arg(long, short)]
    associations: PathBuf,

    /// Output file for the serialized index
    #[arg(long, short)]
    index: PathBuf,
}

#[derive(Args, Debug)]
struct GenesArgs {
    /// Input file with one gene symbol in the first column of each row
    #[arg(long, short)]
    genes: PathBuf,

    /// Serialized phenotype index
    #[arg(long, short)]
    index: PathBuf,

    /// Output file. Derived from the input name when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Variant table (tab separated, with a header row)
    #[arg(long, short)]
    variants: PathBuf,

    /// Serialized phenotype index
    #[arg(long, short)]
    index: PathBuf,

    /// Zero-based index of the gene symbol column
    #[arg(long, default_value_t = DEFAULT_GENE_COLUMN)]
    gene_column: usize,

    /// Annotation columns are inserted at gene-column + this offset
    #[arg(long, default_value_t = DEFAULT_INSERT_OFFSET)]
    insert_offset: usize,

    /// Reduce the output to a fixed column selection
    #[arg(long, short)]
    truncate: bool,

    /// Column selection for --truncate, e.g. "0-4,7,9,14-18,20-40"
    #[arg(long, requires = "truncate")]
    columns: Option<String>,

    /// Output file. Derived from the input name when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phenomap=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => build(args),
        Command::Genes(args) => genes(args),
        Command::Merge(args) => merge(args),
    }
}

fn build(args: BuildArgs) -> Result<()> {
    let index = genes_to_phenotype::parse_file(&args.associations).with_context(|| {
        format!("unable to build an index from {}", args.associations.display())
    })?;
    index.save(&args.index)?;
    println!(
        "Saved index with {} genes to {}",
        index.len(),
        args.index.display()
    );
    Ok(())
}

fn genes(args: GenesArgs) -> Result<()> {
    let index = PhenotypeIndex::load(&args.index)?;
    let gene_list = gene_list_from_path(&args.genes)?;

    let annotated = annotate_gene_list(&index, &gene_list)
        .with_context(|| format!("no genes found in {}", args.genes.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| derive_output_path(&args.genes));
    annotated.write_to_path(&output)?;
    println!("Processing complete. Results saved to {}", output.display());
    Ok(())
}

fn merge(args: MergeArgs) -> Result<()> {
    let index = PhenotypeIndex::load(&args.index)?;
    let variants = Table::from_path(&args.variants, true)?;

    let config = MergeConfig {
        gene_column: args.gene_column,
        insert_offset: args.insert_offset,
    };
    let mut annotated = annotate_variant_table(&index, &variants, &config)
        .with_context(|| format!("no variants found in {}", args.variants.display()))?;

    if args.truncate {
        let spec = args.columns.as_deref().unwrap_or(DEFAULT_TRUNCATE_COLUMNS);
        let columns = parse_column_selection(spec)?;
        annotated = project_columns(&annotated, &columns)
            .with_context(|| format!("column selection {spec} does not fit the table"))?;
    }

    let output = args
        .output
        .unwrap_or_else(|| derive_output_path(&args.variants));
    annotated.write_to_path(&output)?;
    println!("Processing complete. Results saved to {}", output.display());
    Ok(())
}

/// `variants.tsv` becomes `variants_mapped_terms.tsv`
fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let mut name = format!("{stem}{OUTPUT_SUFFIX}");
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    input.with_file_name(name)
}
