//! Spreadsheet writer.
//!
//! One sheet with a bold header row, columns sized to their longest cell
//! and the header frozen in place.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::ExportError;
use crate::models::{MetadataField, MetadataRecord};

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "PDF_Metadata";

/// Extra width added to the longest cell of each column.
const COLUMN_PADDING: usize = 2;

/// Width of each column: the longest cell (header included) plus padding.
fn column_widths(records: &[MetadataRecord]) -> Vec<usize> {
    MetadataField::ALL
        .iter()
        .map(|field| {
            let longest = records
                .iter()
                .map(|record| record.get(*field).chars().count())
                .chain(std::iter::once(field.column_name().chars().count()))
                .max()
                .unwrap_or(0);
            longest + COLUMN_PADDING
        })
        .collect()
}

fn build_workbook(records: &[MetadataRecord]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, field) in MetadataField::ALL.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, field.column_name(), &header_format)?;
    }

    for (row, record) in records.iter().enumerate() {
        for (col, (_, value)) in record.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, value)?;
        }
    }

    for (col, width) in column_widths(records).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    worksheet.set_freeze_panes(1, 0)?;
    Ok(workbook)
}

pub fn write_xlsx(path: &Path, records: &[MetadataRecord]) -> Result<(), ExportError> {
    let mut workbook = build_workbook(records)?;
    workbook.save(path)?;
    Ok(())
}
