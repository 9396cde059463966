use crate::report::*;

use log::debug;
use provider_ranking::{RankingOptions, SortOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;
use std::path::Path;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "reportDate")]
    pub report_date: Option<String>,
    #[serde(rename = "reportRegion")]
    pub report_region: Option<String>,
}

impl OutputSettings {
    pub fn default_settings() -> OutputSettings {
        OutputSettings {
            report_name: "Provider access report".to_string(),
            output_directory: None,
            report_date: None,
            report_region: None,
        }
    }
}

/// The subset of the settings echoed back in the JSON summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub report: String,
    pub date: Option<String>,
    pub region: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// The format of the file: `csv` or `xlsx`.
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "nameColumnIndex")]
    _name_column_index: Option<JSValue>,
    #[serde(rename = "countColumnIndex")]
    _count_column_index: Option<JSValue>,
    #[serde(rename = "firstDataRowIndex")]
    _first_data_row_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    // All the indexes follow the 1-based convention of the spreadsheet
    // world. The accessors return 0-based indexes.

    /// The column carrying the provider name. Defaults to the first column.
    pub fn name_column_index(&self) -> ReportResult<usize> {
        self.read_index(&self._name_column_index, 1, "nameColumnIndex")
    }

    /// The column carrying the access count. Defaults to the second column.
    pub fn count_column_index(&self) -> ReportResult<usize> {
        self.read_index(&self._count_column_index, 2, "countColumnIndex")
    }

    /// The first row with data. Defaults to the second row (one header row).
    pub fn first_data_row_index(&self) -> ReportResult<usize> {
        self.read_index(&self._first_data_row_index, 2, "firstDataRowIndex")
    }

    fn read_index(
        &self,
        field: &Option<JSValue>,
        default: usize,
        name: &str,
    ) -> ReportResult<usize> {
        match field {
            None => Ok(default - 1),
            Some(_) => {
                let x = read_js_int(field)?;
                ensure_whatever!(x >= 1, "{} must be at least 1, got {}", name, x);
                Ok(x - 1)
            }
        }
    }

    /// Builds a source from a bare file path, inferring the format from the
    /// extension and keeping the default column layout.
    pub fn from_path(path: &str) -> ReportResult<FileSource> {
        let provider = match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("csv") => "csv",
            Some("xlsx") | Some("xlsm") => "xlsx",
            _ => whatever!(
                "Cannot infer the file format of {:?}, use a configuration file",
                path
            ),
        };
        Ok(FileSource {
            provider: provider.to_string(),
            file_path: path.to_string(),
            _name_column_index: None,
            _count_column_index: None,
            _first_data_row_index: None,
            excel_worksheet_name: None,
        })
    }
}

/// One known spelling variant of a provider name.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AliasEntry {
    pub variant: String,
    pub canonical: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "marketShareSource")]
    pub market_share_source: FileSource,
    #[serde(rename = "accessMethodSource")]
    pub access_method_source: Option<FileSource>,
    /// Extends the built-in table of known variants.
    pub aliases: Option<Vec<AliasEntry>>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

impl ReportConfig {
    pub fn ranking_options(&self) -> ReportResult<RankingOptions> {
        let sort_order = match self.sort_order.as_deref() {
            None | Some("totalDescending") => SortOrder::TotalDescending,
            Some("firstSeen") => SortOrder::FirstSeen,
            Some(x) => whatever!("Unknown sort order: {:?}", x),
        };
        Ok(RankingOptions { sort_order })
    }
}

pub fn read_summary(path: String) -> ReportResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
    debug!("read_summary: read {} bytes", contents.len());
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>) -> ReportResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}
