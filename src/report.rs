use log::{debug, info, warn};

use provider_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;

pub use crate::report::config_reader::*;
use crate::report::io_common::simplify_file_name;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No readable worksheet in the workbook"))]
    EmptyExcel {},
    #[snafu(display("Row {lineno} is too short"))]
    ExcelRowTooShort { lineno: usize },
    #[snafu(display("Row {lineno}: unexpected cell content: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening the CSV file"))]
    CsvOpen { source: csv::Error },
    #[snafu(display("Error reading a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Line {lineno}: malformed access count: {content}"))]
    BadCount { lineno: usize, content: String },
    #[snafu(display(""))]
    OpeningJson { source: std::io::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display(""))]
    ParsingJsonNumber {},
    #[snafu(display(""))]
    MissingParentDir {},
    #[snafu(display("Error writing the summary"))]
    WritingSummary { source: std::io::Error },
    #[snafu(display("Aggregation failed"))]
    Ranking { source: RankingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

const BAR_WIDTH: u64 = 40;

pub fn run_report(args: &Args) -> ReportResult<()> {
    let (config, root_path) = load_config(args)?;
    let options = config.ranking_options()?;

    let mut aliases = AliasMap::known_providers();
    if let Some(entries) = &config.aliases {
        let table: Vec<(String, String)> = entries
            .iter()
            .map(|e| (e.variant.clone(), e.canonical.clone()))
            .collect();
        aliases.extend(&table).context(RankingSnafu {})?;
    }
    debug!("run_report: alias table carries {} entries", aliases.len());

    let market_records = read_provider_records(root_path.clone(), &config.market_share_source)?;
    let ranking = run_ranking_stats(&market_records, &options, &aliases).context(RankingSnafu {})?;
    info!(
        "run_report: {} providers, {} total accesses",
        ranking.rows.len(),
        ranking.total_access_count
    );

    // The access-method sheet describes technologies, not companies, so the
    // provider alias table does not apply to it.
    let access_methods = match &config.access_method_source {
        Some(cfs) => {
            let records = read_provider_records(root_path.clone(), cfs)?;
            Some(run_ranking_stats(&records, &options, &AliasMap::empty()).context(RankingSnafu {})?)
        }
        None => None,
    };

    println!(
        "{}",
        render_ranking(&config.output_settings.report_name, &ranking)
    );
    if let Some(acc) = &access_methods {
        println!("{}", render_ranking("Access methods", acc));
    }

    let search_section = match &args.search {
        Some(query) if !query.is_empty() => {
            let results = search_rows(&ranking.rows, query);
            if results.is_empty() {
                println!("Provider not found: {}", query);
            } else {
                println!("Search results for {:?}:", query);
                for row in results.iter() {
                    println!(
                        "  {}  {}",
                        row.canonical_name,
                        format_count(row.total_access_count)
                    );
                }
            }
            Some((query.clone(), results))
        }
        _ => None,
    };

    let summary = build_summary_js(&config, &ranking, access_methods.as_ref(), &search_section);
    let pretty = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;

    match summary_destination(args, &config) {
        None => println!("summary:{}", pretty),
        Some(path) => {
            info!("Writing the summary to {}", path);
            fs::write(path, &pretty).context(WritingSummarySnafu {})?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        let reference = read_summary(reference_path.clone())?;
        let pretty_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        if pretty_ref != pretty {
            warn!("Found differences with the reference summary");
            print_diff(pretty_ref.as_str(), pretty.as_ref(), "\n");
            whatever!("Difference detected between calculated summary and reference summary");
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> ReportResult<(ReportConfig, String)> {
    match &args.config {
        Some(config_path) => {
            let config_p = Path::new(config_path.as_str());
            let config_str = fs::read_to_string(config_path).context(OpeningJsonSnafu {})?;
            let config: ReportConfig =
                serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
            info!("config: {:?}", config);
            // Data files are located relative to the configuration file.
            let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
            Ok((config, root_p.display().to_string()))
        }
        None => {
            let market_share_source = match &args.market_file {
                Some(p) => FileSource::from_path(p)?,
                None => whatever!("No configuration file and no market share file provided"),
            };
            let access_method_source = match &args.access_file {
                Some(p) => Some(FileSource::from_path(p)?),
                None => None,
            };
            let config = ReportConfig {
                output_settings: OutputSettings::default_settings(),
                market_share_source,
                access_method_source,
                aliases: None,
                sort_order: None,
            };
            Ok((config, "".to_string()))
        }
    }
}

fn read_provider_records(root_path: String, cfs: &FileSource) -> ReportResult<Vec<ProviderRecord>> {
    let p: PathBuf = [root_path, cfs.file_path.clone()].iter().collect();
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read access file {:?}", p2);
    let records = match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_records(p2.clone(), cfs),
        "xlsx" => io_xlsx::read_xlsx_records(p2.clone(), cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }?;
    info!(
        "Read {} records from {}",
        records.len(),
        simplify_file_name(&p2)
    );
    Ok(records)
}

fn summary_destination(args: &Args, config: &ReportConfig) -> Option<String> {
    match &args.out {
        Some(out) if out == "stdout" => None,
        Some(out) => Some(out.clone()),
        None => config.output_settings.output_directory.as_ref().map(|d| {
            let p: PathBuf = [d.clone(), "summary.json".to_string()].iter().collect();
            p.display().to_string()
        }),
    }
}

fn ranking_rows_to_json(rows: &[AggregateRow]) -> JSValue {
    let l: Vec<JSValue> = rows
        .iter()
        .map(|r| {
            json!({
                "provider": r.canonical_name,
                "accesses": r.total_access_count
            })
        })
        .collect();
    json!(l)
}

fn build_summary_js(
    config: &ReportConfig,
    ranking: &RankingResult,
    access_methods: Option<&RankingResult>,
    search: &Option<(String, Vec<AggregateRow>)>,
) -> JSValue {
    let c = OutputConfig {
        report: config.output_settings.report_name.clone(),
        date: config.output_settings.report_date.clone(),
        region: config.output_settings.report_region.clone(),
    };
    let mut js = json!({
        "config": c,
        "totalAccesses": ranking.total_access_count,
        "ranking": ranking_rows_to_json(&ranking.rows),
    });
    if let Some(acc) = access_methods {
        js["accessMethods"] = ranking_rows_to_json(&acc.rows);
    }
    if let Some((query, results)) = search {
        js["search"] = json!({
            "query": query,
            "results": ranking_rows_to_json(results)
        });
    }
    js
}

fn render_ranking(title: &str, rs: &RankingResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("== {} ==\n", title));
    let name_width = rs
        .rows
        .iter()
        .map(|r| r.canonical_name.len())
        .max()
        .unwrap_or(8)
        .max(8);
    let max_count = rs
        .rows
        .iter()
        .map(|r| r.total_access_count)
        .max()
        .unwrap_or(0);
    for row in rs.rows.iter() {
        let bar = if max_count == 0 {
            String::new()
        } else {
            let len = (row.total_access_count * BAR_WIDTH / max_count).max(1);
            "#".repeat(len as usize)
        };
        out.push_str(&format!(
            "{:<name_width$}  {:>12}  {}\n",
            row.canonical_name,
            format_count(row.total_access_count),
            bar
        ));
    }
    out.push_str(&format!(
        "Total accesses: {}\n",
        format_count(rs.total_access_count)
    ));
    out
}

// 1234567 -> "1,234,567"
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("provtally-test-{}-{}", std::process::id(), name));
        fs::write(&p, content).unwrap();
        p.display().to_string()
    }

    const CONFIG_JS: &str = r#"
    {
        "outputSettings": {
            "reportName": "Dashboard Provedoras de Internet",
            "reportDate": "2024-06-01"
        },
        "marketShareSource": {
            "provider": "xlsx",
            "filePath": "Participacao_Mercado.xlsx",
            "nameColumnIndex": "1",
            "countColumnIndex": 2,
            "firstDataRowIndex": 2,
            "excelWorksheetName": "Plan1"
        },
        "accessMethodSource": {
            "provider": "csv",
            "filePath": "Meio_Acesso.csv"
        },
        "aliases": [
            {
                "variant": "NMULTIFIBRA TELECOMUNICACAO LTDA",
                "canonical": "N-multimidia Telecomunicacoes Ltda"
            }
        ],
        "sortOrder": "totalDescending"
    }
    "#;

    #[test]
    fn config_parses_with_mixed_index_notations() {
        let config: ReportConfig = serde_json::from_str(CONFIG_JS).unwrap();
        assert_eq!(
            config.output_settings.report_name,
            "Dashboard Provedoras de Internet"
        );
        // Indexes are accepted as JSON numbers or strings, both 1-based.
        assert_eq!(config.market_share_source.name_column_index().unwrap(), 0);
        assert_eq!(config.market_share_source.count_column_index().unwrap(), 1);
        assert_eq!(
            config.market_share_source.first_data_row_index().unwrap(),
            1
        );
        assert_eq!(
            config.market_share_source.excel_worksheet_name,
            Some("Plan1".to_string())
        );
        let access = config.access_method_source.as_ref().unwrap();
        assert_eq!(access.provider, "csv");
        // Defaults: name in the first column, count in the second, one header row.
        assert_eq!(access.name_column_index().unwrap(), 0);
        assert_eq!(access.count_column_index().unwrap(), 1);
        assert_eq!(access.first_data_row_index().unwrap(), 1);
        assert!(matches!(
            config.ranking_options().unwrap().sort_order,
            SortOrder::TotalDescending
        ));
    }

    #[test]
    fn config_rejects_unknown_sort_order() {
        let config: ReportConfig = serde_json::from_str(CONFIG_JS).unwrap();
        let config = ReportConfig {
            sort_order: Some("sideways".to_string()),
            ..config
        };
        assert!(config.ranking_options().is_err());
    }

    #[test]
    fn file_source_from_extension() {
        assert_eq!(
            FileSource::from_path("data/Meio_Acesso.csv").unwrap().provider,
            "csv"
        );
        assert_eq!(
            FileSource::from_path("Participacao_Mercado.xlsx")
                .unwrap()
                .provider,
            "xlsx"
        );
        assert!(FileSource::from_path("notes.txt").is_err());
    }

    #[test]
    fn csv_records_are_read_and_aggregated() {
        let path = write_temp(
            "market.csv",
            "OPERADORA,ACESSOS\n\
             NMULTIFIBRA TELECOMUNICACAO LTDA,340\n\
             CLARO S.A.,98000\n\
             N-multimidia Telecomunicacoes Ltda,1250\n\
             ,12\n\
             claro s.a.,2000\n",
        );
        let cfs = FileSource::from_path(&path).unwrap();
        let records = io_csv::read_csv_records(path, &cfs).unwrap();
        // The header line and the line with an empty name are skipped.
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].raw_name, "NMULTIFIBRA TELECOMUNICACAO LTDA");
        assert_eq!(records[0].access_count, 340);

        let ranking = run_ranking_stats(
            &records,
            &RankingOptions::DEFAULT_OPTIONS,
            &AliasMap::known_providers(),
        )
        .unwrap();
        assert_eq!(ranking.total_access_count, 340 + 98000 + 1250 + 2000);
        assert_eq!(ranking.rows.len(), 2);
        assert_eq!(ranking.rows[0].canonical_name, "CLAROSA");
        assert_eq!(ranking.rows[0].total_access_count, 100000);
        assert_eq!(
            ranking.rows[1].canonical_name,
            "NMULTIMIDIATELECOMUNICACOESLTDA"
        );
        assert_eq!(ranking.rows[1].total_access_count, 1590);
    }

    #[test]
    fn csv_counts_may_carry_a_decimal_part() {
        let path = write_temp(
            "floats.csv",
            "OPERADORA,ACESSOS\nAlpha,120.0\nBeta,\"3\"\n",
        );
        let cfs = FileSource::from_path(&path).unwrap();
        let records = io_csv::read_csv_records(path, &cfs).unwrap();
        assert_eq!(records[0].access_count, 120);
        assert_eq!(records[1].access_count, 3);
    }

    #[test]
    fn csv_with_malformed_count_fails_the_run() {
        let path = write_temp(
            "badcount.csv",
            "OPERADORA,ACESSOS\nAlpha,12\nBeta,not-a-number\n",
        );
        let cfs = FileSource::from_path(&path).unwrap();
        let res = io_csv::read_csv_records(path, &cfs);
        assert!(matches!(res, Err(ReportError::BadCount { lineno: 3, .. })));
    }

    #[test]
    fn missing_csv_file_fails_the_run() {
        let cfs = FileSource::from_path("does-not-exist.csv").unwrap();
        let res = io_csv::read_csv_records("does-not-exist.csv".to_string(), &cfs);
        assert!(matches!(res, Err(ReportError::CsvOpen { .. })));
    }

    #[test]
    fn summary_carries_the_search_section_only_when_queried() {
        let config: ReportConfig = serde_json::from_str(CONFIG_JS).unwrap();
        let ranking = RankingResult {
            total_access_count: 30,
            rows: vec![
                AggregateRow {
                    canonical_name: "ALPHA".to_string(),
                    total_access_count: 20,
                },
                AggregateRow {
                    canonical_name: "BETA".to_string(),
                    total_access_count: 10,
                },
            ],
        };
        let js = build_summary_js(&config, &ranking, None, &None);
        assert_eq!(js["totalAccesses"], json!(30));
        assert_eq!(js["ranking"][0]["provider"], json!("ALPHA"));
        assert_eq!(js["ranking"][1]["accesses"], json!(10));
        assert!(js.get("search").is_none());
        assert!(js.get("accessMethods").is_none());

        // An unmatched query still shows up in the summary, with an empty
        // result list: this is the "not found" outcome, not an error.
        let results = search_rows(&ranking.rows, "ZZZ");
        assert!(results.is_empty());
        let js = build_summary_js(&config, &ranking, None, &Some(("ZZZ".to_string(), results)));
        assert_eq!(js["search"]["query"], json!("ZZZ"));
        assert_eq!(js["search"]["results"], json!([]));
    }

    #[test]
    fn rendering_lines_up_counts_and_bars() {
        let ranking = RankingResult {
            total_access_count: 1234767,
            rows: vec![
                AggregateRow {
                    canonical_name: "CLAROSA".to_string(),
                    total_access_count: 1234567,
                },
                AggregateRow {
                    canonical_name: "BETA".to_string(),
                    total_access_count: 200,
                },
            ],
        };
        let rendered = render_ranking("Test report", &ranking);
        assert!(rendered.contains("== Test report =="));
        assert!(rendered.contains("1,234,567"));
        // The largest provider gets a full-width bar, the smallest one still
        // gets a visible bar.
        assert!(rendered.contains(&format!("1,234,567  {}\n", "#".repeat(40))));
        assert!(rendered.contains("200  #\n"));
        assert!(rendered.contains("Total accesses: 1,234,767"));
    }

    #[test]
    fn format_count_groups_digits() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(98000), "98,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
