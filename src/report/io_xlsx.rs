// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::debug;
use provider_ranking::ProviderRecord;
use snafu::prelude::*;

use crate::report::io_common::parse_count_str;
use crate::report::*;

pub fn read_xlsx_records(path: String, cfs: &FileSource) -> ReportResult<Vec<ProviderRecord>> {
    let wrange = get_range(&path, cfs)?;

    let name_idx = cfs.name_column_index()?;
    let count_idx = cfs.count_column_index()?;
    let first_row = cfs.first_data_row_index()?;

    let mut res: Vec<ProviderRecord> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(first_row) {
        let lineno = idx + 1;
        debug!("read_xlsx_records: {:?} {:?}", lineno, row);

        let raw_name = match row.get(name_idx) {
            Some(DataType::String(s)) => s.trim().to_string(),
            Some(DataType::Empty) | None => {
                debug!("read_xlsx_records: skipping row {} with no name", lineno);
                continue;
            }
            Some(other) => {
                return ExcelWrongCellTypeSnafu {
                    lineno,
                    content: format!("{:?}", other),
                }
                .fail();
            }
        };
        if raw_name.is_empty() {
            continue;
        }
        let count_cell = row.get(count_idx).context(ExcelRowTooShortSnafu { lineno })?;
        let access_count = read_count_calamine(count_cell, lineno)?;

        res.push(ProviderRecord {
            raw_name,
            access_count,
        });
    }
    Ok(res)
}

fn get_range(path: &str, cfs: &FileSource) -> ReportResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path.to_string(),
    })?;
    match &cfs.excel_worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu {
                path: path.to_string(),
            }),
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu {
                path: path.to_string(),
            }),
    }
}

fn read_count_calamine(cell: &DataType, lineno: usize) -> ReportResult<u64> {
    match cell {
        DataType::Int(i) if *i >= 0 => Ok(*i as u64),
        DataType::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Ok(*f as u64),
        DataType::String(s) => parse_count_str(s, lineno),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}
