//! In-memory model of delimited tables
//!
//! Tables are loaded fully into memory for the duration of one run. Cells
//! are written back verbatim, without any quoting or escaping.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::{PhenomapError, PhenomapResult};

/// One table row, an ordered sequence of string cells
pub type Row = Vec<String>;

/// Field delimiter of variant tables and annotation output
const DELIMITER: char = '\t';

/// An ordered sequence of rows with an optional header row
///
/// Rows keep their input order. The header is carried separately so that
/// row-wise operations never mistake it for data.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Table {
    header: Option<Row>,
    rows: Vec<Row>,
}

impl Table {
    /// Constructs a new, empty table without a header
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty table with the given header row
    pub fn with_header(header: Row) -> Self {
        Self {
            header: Some(header),
            rows: Vec::new(),
        }
    }

    /// The header row, if present
    pub fn header(&self) -> Option<&Row> {
        self.header.as_ref()
    }

    /// Replaces the header row
    pub fn set_header(&mut self, header: Row) {
        self.header = Some(header);
    }

    /// Appends a data row
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// The data rows, header excluded
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows, header excluded
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Reads a tab separated table
    ///
    /// Blank lines are skipped. With `has_header` the first non-blank
    /// line becomes the header row.
    ///
    /// # Errors
    ///
    /// [`PhenomapError::InvalidInput`]: the input stream could not be read
    pub fn read<R: BufRead>(reader: R, has_header: bool) -> PhenomapResult<Table> {
        let mut table = Table::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|err| {
                PhenomapError::InvalidInput(format!("unable to read line {}: {}", idx + 1, err))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let row: Row = line.split(DELIMITER).map(str::to_string).collect();
            if has_header && table.header.is_none() {
                table.set_header(row);
            } else {
                table.push_row(row);
            }
        }
        Ok(table)
    }

    /// Reads a tab separated table from a file
    ///
    /// # Errors
    ///
    /// - [`PhenomapError::SourceNotFound`]: file not present or can't be opened
    /// - everything [`Table::read`] can fail with
    pub fn from_path<P: AsRef<Path>>(file: P, has_header: bool) -> PhenomapResult<Table> {
        let filename = file.as_ref().display().to_string();
        let file = File::open(file).map_err(|_| PhenomapError::SourceNotFound(filename))?;
        Self::read(BufReader::new(file), has_header)
    }

    /// Writes the table as tab separated text, header row first
    ///
    /// Cells are written verbatim, no quoting is applied.
    pub fn write<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        if let Some(header) = &self.header {
            writeln!(writer, "{}", join_row(header))?;
        }
        for row in &self.rows {
            writeln!(writer, "{}", join_row(row))?;
        }
        Ok(())
    }

    /// Writes the table to a file
    ///
    /// # Errors
    ///
    /// [`PhenomapError::CannotWriteFile`]: target can't be created or written
    pub fn write_to_path<P: AsRef<Path>>(&self, file: P) -> PhenomapResult<()> {
        let filename = file.as_ref().display().to_string();
        let fh =
            File::create(file).map_err(|_| PhenomapError::CannotWriteFile(filename.clone()))?;
        self.write(BufWriter::new(fh))
            .map_err(|_| PhenomapError::CannotWriteFile(filename))
    }
}

fn join_row(row: &Row) -> String {
    row.join(&DELIMITER.to_string())
}

/// Reads gene symbols from the first column of each non-empty row
///
/// Accepts comma as well as tab delimited input. The remaining columns of
/// each row are ignored.
///
/// # Errors
///
/// [`PhenomapError::InvalidInput`]: the input stream could not be read
pub fn read_gene_list<R: BufRead>(reader: R) -> PhenomapResult<Vec<String>> {
    let mut genes = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| {
            PhenomapError::InvalidInput(format!("unable to read line {}: {}", idx + 1, err))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(first) = line.split([DELIMITER, ',']).next() {
            genes.push(first.trim().to_string());
        }
    }
    Ok(genes)
}

/// Reads a gene list from a file, see [`read_gene_list`]
///
/// # Errors
///
/// - [`PhenomapError::SourceNotFound`]: file not present or can't be opened
/// - everything [`read_gene_list`] can fail with
pub fn gene_list_from_path<P: AsRef<Path>>(file: P) -> PhenomapResult<Vec<String>> {
    let filename = file.as_ref().display().to_string();
    let file = File::open(file).map_err(|_| PhenomapError::SourceNotFound(filename))?;
    read_gene_list(BufReader::new(file))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_with_header() {
        let data = "Chrom\tPos\tGene\nchr1\t100\tNAT2\nchr2\t200\tAARS1\n";
        let table = Table::read(Cursor::new(data), true).expect("valid input");

        assert_eq!(table.header(), Some(&vec![
            "Chrom".to_string(),
            "Pos".to_string(),
            "Gene".to_string()
        ]));
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.rows()[0][2], "NAT2");
    }

    #[test]
    fn read_without_header() {
        let data = "chr1\t100\tNAT2\n";
        let table = Table::read(Cursor::new(data), false).expect("valid input");
        assert!(table.header().is_none());
        assert_eq!(table.n_rows(), 1);
    }

    #[test]
    fn read_skips_blank_lines() {
        let data = "Gene\n\nNAT2\n  \nAARS1\n";
        let table = Table::read(Cursor::new(data), true).expect("valid input");
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn write_is_verbatim() {
        let mut table = Table::with_header(vec!["Gene".to_string(), "Terms".to_string()]);
        table.push_row(vec!["NAT2".to_string(), "Seizure, Short stature".to_string()]);

        let mut out = Vec::new();
        table.write(&mut out).expect("writing to a Vec cannot fail");

        // the comma-joined cell is not quoted
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Gene\tTerms\nNAT2\tSeizure, Short stature\n"
        );
    }

    #[test]
    fn roundtrip_preserves_rows() {
        let data = "A\tB\n1\t2\n3\t4\n";
        let table = Table::read(Cursor::new(data), true).expect("valid input");

        let mut out = Vec::new();
        table.write(&mut out).expect("writing to a Vec cannot fail");
        assert_eq!(String::from_utf8(out).unwrap(), data);
    }

    #[test]
    fn gene_list_first_column_only() {
        let data = "NAT2\tsome note\nAARS1,other note\nBRCA1\n";
        let genes = read_gene_list(Cursor::new(data)).expect("valid input");
        assert_eq!(genes, vec!["NAT2", "AARS1", "BRCA1"]);
    }

    #[test]
    fn gene_list_skips_empty_rows() {
        let data = "NAT2\n\n\nAARS1\n";
        let genes = read_gene_list(Cursor::new(data)).expect("valid input");
        assert_eq!(genes, vec!["NAT2", "AARS1"]);
    }

    #[test]
    fn gene_list_of_empty_input_is_empty() {
        let genes = read_gene_list(Cursor::new("")).expect("valid input");
        assert!(genes.is_empty());
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Table::from_path("does/not/exist.tsv", true),
            Err(PhenomapError::SourceNotFound(_))
        ));
        assert!(matches!(
            gene_list_from_path("does/not/exist.tsv"),
            Err(PhenomapError::SourceNotFound(_))
        ));
    }
}
