// Primitives for reading CSV files.

use std::fs::File;

use log::debug;
use provider_ranking::ProviderRecord;
use snafu::prelude::*;

use crate::report::io_common::parse_count_str;
use crate::report::*;

pub fn read_csv_records(path: String, cfs: &FileSource) -> ReportResult<Vec<ProviderRecord>> {
    let name_idx = cfs.name_column_index()?;
    let count_idx = cfs.count_column_index()?;

    let mut res: Vec<ProviderRecord> = Vec::new();
    let (records, row_offset) = get_records(&path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("read_csv_records: {:?} {:?}", lineno, line);

        let raw_name = line
            .get(name_idx)
            .context(CsvLineTooShortSnafu { lineno })?
            .trim()
            .to_string();
        if raw_name.is_empty() {
            debug!("read_csv_records: skipping line {} with no name", lineno);
            continue;
        }
        let content = line
            .get(count_idx)
            .context(CsvLineTooShortSnafu { lineno })?;
        let access_count = parse_count_str(content, lineno)?;

        res.push(ProviderRecord {
            raw_name,
            access_count,
        });
    }
    Ok(res)
}

fn get_records(
    path: &String,
    cfs: &FileSource,
) -> ReportResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_data_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(CsvOpenSnafu {})?;
    let mut records = rdr.into_records();
    for _ in 0..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}
