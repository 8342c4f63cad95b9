//! Tabular documents (delimited files)
//!
//! Header cells are structural labels and pass through untouched; every data
//! cell is extracted as its own unit so tokens never straddle a cell
//! boundary.

use crate::domain::{Result, StructuralUnit, UnitPosition};
use crate::pipeline::TranslationMap;
use std::io::{Read, Write};

/// An in-memory table: one header row plus data rows
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Extract one unit per data cell
///
/// Positions use the file's row numbering: the header is row 0, so the first
/// data row is row 1.
pub fn extract(table: &Table) -> Vec<StructuralUnit> {
    let mut units = Vec::new();
    for (r, row) in table.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            units.push(StructuralUnit::new(
                cell.clone(),
                UnitPosition::Cell { row: r + 1, col: c },
            ));
        }
    }
    units
}

/// Rebuild the table with anonymized cell contents
///
/// Cells whose text has no translation (blank cells, cells the detector left
/// untouched) keep their original content.
pub fn reconstruct(mut table: Table, translations: &TranslationMap) -> Table {
    for row in &mut table.rows {
        for cell in row.iter_mut() {
            if let Some(replacement) = translations.get(cell.as_str()) {
                *cell = replacement.clone();
            }
        }
    }
    table
}

/// Parse delimited input into a table
///
/// Rows may have differing lengths; they are kept as read.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(Table { headers, rows })
}

/// Write a table back out as delimited text
pub fn write_csv<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    csv_writer.write_record(&table.headers)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
