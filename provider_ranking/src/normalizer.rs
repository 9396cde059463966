use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::config::RankingErrors;

/// Normalizes a raw provider name into its canonical spelling base.
///
/// The algorithm decomposes the string (NFKD), removes any diacritics,
/// upper-cases all characters and drops everything outside `[A-Z0-9]`.
/// The result only depends on the input: applying the function twice
/// returns the same string as applying it once.
pub fn normalize_name(raw: &str) -> String {
    raw.nfkd()
        .filter(|c| match *c {
            // https://en.wikipedia.org/wiki/Combining_character#Unicode_ranges
            '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}' => false,
            _ => true,
        })
        .flat_map(char::to_uppercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// A fixed table mapping known spelling variants of a provider name to one
/// canonical spelling.
///
/// Both sides of every entry are stored in normalized form and the lookup
/// happens after normalization, so the table matches the same way no matter
/// how a variant was capitalized or accented in the source file. A valid
/// table never maps an entry onto another entry, which makes
/// [canonicalize](AliasMap::canonicalize) idempotent.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct AliasMap {
    entries: HashMap<String, String>,
}

// Spelling variants collected from past spreadsheet exports. Grows as new
// variants are discovered in the field.
const KNOWN_PROVIDER_VARIANTS: &[(&str, &str)] = &[
    (
        "NMULTIFIBRA TELECOMUNICACAO LTDA",
        "N-multimidia Telecomunicacoes Ltda",
    ),
    (
        "N MULTIFIBRA TELECOMUNICACOES LTDA",
        "N-multimidia Telecomunicacoes Ltda",
    ),
    (
        "N-multimidia Telecomunicacoes Ltda",
        "N-multimidia Telecomunicacoes Ltda",
    ),
];

impl AliasMap {
    pub fn empty() -> AliasMap {
        AliasMap::default()
    }

    /// The built-in table of known provider spelling variants.
    pub fn known_providers() -> AliasMap {
        let mut entries: HashMap<String, String> = HashMap::new();
        for (variant, canonical) in KNOWN_PROVIDER_VARIANTS.iter() {
            let key = normalize_name(variant);
            let target = normalize_name(canonical);
            if key != target {
                entries.insert(key, target);
            }
        }
        AliasMap { entries }
    }

    /// Builds a table from (variant, canonical) pairs.
    pub fn new(table: &[(String, String)]) -> Result<AliasMap, RankingErrors> {
        let mut res = AliasMap::empty();
        res.extend(table)?;
        Ok(res)
    }

    /// Adds (variant, canonical) pairs to the table.
    ///
    /// Entries where the variant already normalizes to the canonical name
    /// are accepted and ignored. Conflicting or chained entries are
    /// rejected, whether the conflict is inside `table` or with an entry
    /// already present.
    pub fn extend(&mut self, table: &[(String, String)]) -> Result<(), RankingErrors> {
        for (variant, canonical) in table.iter() {
            let key = normalize_name(variant);
            let target = normalize_name(canonical);
            if key == target {
                continue;
            }
            if let Some(previous) = self.entries.get(&key) {
                if *previous != target {
                    return Err(RankingErrors::ConflictingAlias {
                        variant: key,
                        canonical: target,
                        previous: previous.clone(),
                    });
                }
                continue;
            }
            self.entries.insert(key, target);
        }
        // No target may be an entry itself, otherwise a second application
        // of the table would keep rewriting the name.
        for (key, target) in self.entries.iter() {
            if self.entries.contains_key(target) {
                return Err(RankingErrors::ChainedAlias {
                    variant: key.clone(),
                    canonical: target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Normalizes a raw name and resolves it through the alias table.
    ///
    /// Unmapped names pass through unchanged after normalization.
    pub fn canonicalize(&self, raw: &str) -> String {
        let normalized = normalize_name(raw);
        match self.entries.get(&normalized) {
            Some(canonical) => canonical.clone(),
            None => normalized,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
