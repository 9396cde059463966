// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One row of an access spreadsheet, before any normalization.
///
/// Records are read fresh on every run and never persisted.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ProviderRecord {
    /// The provider name exactly as it appears in the source file.
    pub raw_name: String,
    pub access_count: u64,
}

// ******** Output data structures *********

/// One summed total per canonical provider name.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AggregateRow {
    pub canonical_name: String,
    pub total_access_count: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankingResult {
    /// Grand total over all the input records. Always equal to the sum of
    /// the totals of the individual rows.
    pub total_access_count: u64,
    pub rows: Vec<AggregateRow>,
}

/// Errors that prevent an alias table from being usable.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RankingErrors {
    /// The same variant is mapped to two different canonical names.
    ConflictingAlias {
        variant: String,
        canonical: String,
        previous: String,
    },
    /// The target of an alias is itself an alias. Such a table would make
    /// canonicalization depend on how many times it is applied.
    ChainedAlias { variant: String, canonical: String },
}

impl Error for RankingErrors {}

impl Display for RankingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingErrors::ConflictingAlias {
                variant,
                canonical,
                previous,
            } => write!(
                f,
                "alias {:?} maps to both {:?} and {:?}",
                variant, canonical, previous
            ),
            RankingErrors::ChainedAlias { variant, canonical } => write!(
                f,
                "alias target {:?} (for variant {:?}) is itself an alias",
                canonical, variant
            ),
        }
    }
}

// ********* Configuration **********

/// The order of the rows in the final ranking.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SortOrder {
    /// Rows appear in the order in which their provider was first seen in
    /// the input.
    FirstSeen,
    /// Rows are sorted by decreasing total. Ties keep the first-seen order.
    TotalDescending,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankingOptions {
    pub sort_order: SortOrder,
}

impl RankingOptions {
    pub const DEFAULT_OPTIONS: RankingOptions = RankingOptions {
        sort_order: SortOrder::TotalDescending,
    };
}
