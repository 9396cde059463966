pub use crate::config::*;
use crate::normalizer::AliasMap;
use crate::run_ranking_stats;

/// A builder for assembling records one at a time.
///
/// This is the most convenient entry point when the records do not come
/// from a spreadsheet file.
///
/// ```
/// pub use provider_ranking::builder::Builder;
/// pub use provider_ranking::RankingOptions;
/// # use provider_ranking::RankingErrors;
///
/// let mut builder = Builder::new(&RankingOptions::DEFAULT_OPTIONS)?;
///
/// builder.add_record("Acme Telecom Ltda", 120)?;
/// builder.add_record("ACME TELECOM LTDA", 30)?;
/// builder.add_record("Other Provider", 50)?;
///
/// let result = builder.run()?;
/// assert_eq!(result.total_access_count, 200);
/// assert_eq!(result.rows[0].total_access_count, 150);
///
/// # Ok::<(), RankingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _options: RankingOptions,
    pub(crate) _aliases: AliasMap,
    pub(crate) _records: Vec<ProviderRecord>,
}

impl Builder {
    pub fn new(options: &RankingOptions) -> Result<Builder, RankingErrors> {
        Ok(Builder {
            _options: options.clone(),
            _aliases: AliasMap::empty(),
            _records: Vec::new(),
        })
    }

    /// Replaces the alias table used when the records are aggregated.
    pub fn aliases(self, table: &[(String, String)]) -> Result<Builder, RankingErrors> {
        Ok(Builder {
            _options: self._options,
            _aliases: AliasMap::new(table)?,
            _records: self._records,
        })
    }

    /// Adds one record.
    ///
    /// The raw name does not need to be normalized or unique: records with
    /// names that canonicalize to the same provider are summed together by
    /// [run](Builder::run).
    pub fn add_record(&mut self, raw_name: &str, access_count: u64) -> Result<(), RankingErrors> {
        self._records.push(ProviderRecord {
            raw_name: raw_name.to_string(),
            access_count,
        });
        Ok(())
    }

    pub fn run(&self) -> Result<RankingResult, RankingErrors> {
        run_ranking_stats(&self._records, &self._options, &self._aliases)
    }
}
