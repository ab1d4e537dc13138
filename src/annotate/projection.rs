use crate::table::{Row, Table};
use crate::{PhenomapError, PhenomapResult};

/// Returns a new table containing only the selected columns
///
/// Every row, the header included, is restricted to the given column
/// indices, in the given order. No row is added or removed. An index may
/// be listed more than once, the column is then emitted repeatedly.
///
/// # Errors
///
/// [`PhenomapError::ColumnOutOfRange`]: a selected column does not exist
/// in some row. The header counts as row 0, data rows start at 1.
///
/// # Examples
///
/// ```
/// use phenomap::annotate::project_columns;
/// use phenomap::Table;
///
/// let mut table = Table::with_header(vec!["A".into(), "B".into(), "C".into()]);
/// table.push_row(vec!["1".into(), "2".into(), "3".into()]);
///
/// let projected = project_columns(&table, &[2, 0]).unwrap();
/// assert_eq!(projected.header(), Some(&vec!["C".to_string(), "A".to_string()]));
/// assert_eq!(projected.rows()[0], vec!["3", "1"]);
/// ```
pub fn project_columns(table: &Table, columns: &[usize]) -> PhenomapResult<Table> {
    let mut out = Table::new();

    if let Some(header) = table.header() {
        out.set_header(project_row(header, columns, 0)?);
    }
    for (idx, row) in table.rows().iter().enumerate() {
        out.push_row(project_row(row, columns, idx + 1)?);
    }
    Ok(out)
}

fn project_row(row: &Row, columns: &[usize], row_nr: usize) -> PhenomapResult<Row> {
    columns
        .iter()
        .map(|&column| {
            row.get(column)
                .cloned()
                .ok_or(PhenomapError::ColumnOutOfRange {
                    row: row_nr,
                    column,
                })
        })
        .collect()
}

/// Parses a column selection like `0-4,7,9,14-18` into column indices
///
/// Ranges are inclusive on both ends. The resulting indices keep the
/// order of the selection and are not deduplicated.
///
/// # Errors
///
/// [`PhenomapError::InvalidInput`]: empty selection, an unparsable number
/// or a range whose end lies before its start
pub fn parse_column_selection(spec: &str) -> PhenomapResult<Vec<usize>> {
    let mut columns = Vec::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_index(start, spec)?;
                let end = parse_index(end, spec)?;
                if end < start {
                    return Err(PhenomapError::InvalidInput(format!(
                        "column range {part} in selection {spec} is reversed"
                    )));
                }
                columns.extend(start..=end);
            }
            None => columns.push(parse_index(part, spec)?),
        }
    }

    if columns.is_empty() {
        return Err(PhenomapError::InvalidInput(format!(
            "column selection {spec} selects nothing"
        )));
    }
    Ok(columns)
}

fn parse_index(s: &str, spec: &str) -> PhenomapResult<usize> {
    s.trim().parse().map_err(|_| {
        PhenomapError::InvalidInput(format!("invalid column {s} in selection {spec}"))
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn example_table() -> Table {
        let mut table = Table::with_header(row(&["A", "B", "C", "D"]));
        table.push_row(row(&["1", "2", "3", "4"]));
        table.push_row(row(&["5", "6", "7", "8"]));
        table
    }

    #[test]
    fn projection_keeps_selection_order() {
        let projected = project_columns(&example_table(), &[3, 1]).expect("columns exist");

        assert_eq!(projected.header(), Some(&row(&["D", "B"])));
        assert_eq!(projected.rows(), &[row(&["4", "2"]), row(&["8", "6"])]);
    }

    #[test]
    fn projection_adds_and_removes_no_rows() {
        let projected = project_columns(&example_table(), &[0]).expect("columns exist");
        assert_eq!(projected.n_rows(), example_table().n_rows());
    }

    #[test]
    fn repeated_columns_are_emitted_repeatedly() {
        let projected = project_columns(&example_table(), &[0, 0]).expect("columns exist");
        assert_eq!(projected.rows()[0], row(&["1", "1"]));
    }

    #[test]
    fn out_of_range_column_fails() {
        let res = project_columns(&example_table(), &[0, 4]);
        assert!(matches!(
            res,
            Err(PhenomapError::ColumnOutOfRange { row: 0, column: 4 })
        ));
    }

    #[test]
    fn out_of_range_reports_the_offending_row() {
        let mut table = example_table();
        table.push_row(row(&["9", "10"]));

        let res = project_columns(&table, &[3]);
        assert!(matches!(
            res,
            Err(PhenomapError::ColumnOutOfRange { row: 3, column: 3 })
        ));
    }

    #[test]
    fn parse_single_columns() {
        assert_eq!(parse_column_selection("0,7,9").expect("valid spec"), vec![0, 7, 9]);
    }

    #[test]
    fn parse_ranges_are_inclusive() {
        assert_eq!(
            parse_column_selection("0-4,7,9,14-18").expect("valid spec"),
            vec![0, 1, 2, 3, 4, 7, 9, 14, 15, 16, 17, 18]
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_column_selection("a-4").is_err());
        assert!(parse_column_selection("4-1").is_err());
        assert!(parse_column_selection("").is_err());
        assert!(parse_column_selection(",,").is_err());
    }
}
