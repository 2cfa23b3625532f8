//! Free-text substitution engine
//!
//! Rewrites prose by replacing every recognizable occurrence of a mapped
//! key with its counterpart: forward table for masking, backward table
//! for unmasking. Matching is case-insensitive, longest-key-first, and
//! boundary-safe, so `"ibms"` never matches a key `"ibm"` and a longer
//! key is never partially consumed by one of its substrings.

use std::collections::HashMap;

use fancy_regex::Regex;
use tracing::warn;

use crate::core::store::MappingStore;
use crate::domain::category::EntityCategory;

/// Corporate suffixes stripped when indexing unmask aliases
const CORPORATE_SUFFIX_PATTERN: &str = r"\b(?:co|llc|inc|group|international|corporation|ltd)\.?$";

/// One direction's flattened key to replacement table
struct FlatTable {
    /// Lowercased keys, candidates for the alternation pattern
    keys: Vec<String>,
    /// Lowercased key to replacement in its stored case
    replacements: HashMap<String, String>,
}

impl FlatTable {
    /// Merges every category's table into one flat map
    ///
    /// Categories are visited in their fixed order; on duplicate keys the
    /// later category wins, which keeps the outcome independent of map
    /// iteration order.
    fn new(store: &MappingStore, backward: bool) -> Self {
        let mut replacements: HashMap<String, String> = HashMap::new();
        for category in EntityCategory::ALL {
            let table = if backward {
                store.backward_table(category)
            } else {
                store.forward_table(category)
            };
            if let Some(table) = table {
                for (key, value) in table {
                    replacements.insert(key.to_lowercase(), value.clone());
                }
            }
        }
        let keys = replacements.keys().cloned().collect();
        Self { keys, replacements }
    }

    /// Adds corporate-suffix-stripped aliases for unmasking
    ///
    /// A summary may refer to a fake "Williams-Waller Co LLC" as plain
    /// "williams-waller co"; indexing the stripped form under the same
    /// original lets such references unmask. An alias never shadows a
    /// real key, and colliding aliases resolve to the lexicographically
    /// first fake.
    fn with_suffix_aliases(mut self) -> Self {
        let suffix_re = match regex::Regex::new(CORPORATE_SUFFIX_PATTERN) {
            Ok(re) => re,
            Err(err) => {
                warn!(error = %err, "Failed to compile suffix pattern, skipping unmask aliases");
                return self;
            }
        };

        let mut sorted: Vec<(&String, &String)> = self.replacements.iter().collect();
        sorted.sort();

        let mut aliases: Vec<(String, String)> = Vec::new();
        for (key, original) in sorted {
            let stripped = suffix_re.replace(key, "").trim_end().to_string();
            if !stripped.is_empty()
                && stripped != *key
                && !self.replacements.contains_key(&stripped)
                && !aliases.iter().any(|(alias, _)| alias == &stripped)
            {
                aliases.push((stripped, original.clone()));
            }
        }

        for (alias, original) in aliases {
            self.keys.push(alias.clone());
            self.replacements.insert(alias, original);
        }
        self
    }

    /// Applies the table to one text
    ///
    /// The pass is all-or-nothing: any engine failure degrades to
    /// returning the input unchanged rather than emitting a partially
    /// substituted text.
    fn apply(&self, input: &str) -> String {
        if self.replacements.is_empty() {
            return input.to_string();
        }

        // cheap substring pre-filter so the pattern only carries keys
        // that can actually match
        let input_lower = input.to_lowercase();
        let mut present: Vec<&String> = self
            .keys
            .iter()
            .filter(|key| input_lower.contains(key.as_str()))
            .collect();
        if present.is_empty() {
            return input.to_string();
        }

        // longest first, so "ibm corp" is tried before "ibm"
        present.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = present
            .iter()
            .map(|key| fancy_regex::escape(key))
            .collect::<Vec<_>>()
            .join("|");
        // word-boundary look-around keeps "ibms" safe; the decorator
        // groups let brackets, quotes, and markdown emphasis pass
        // through while only the inner token is substituted
        let pattern = format!(
            r#"(?i)(?<!\w)([{{(\["'*_]*?)({alternation})([}})\]"'*_]*?)(?!\w)"#
        );
        let regex = match Regex::new(&pattern) {
            Ok(regex) => regex,
            Err(err) => {
                warn!(error = %err, "Failed to build substitution pattern, leaving text unchanged");
                return input.to_string();
            }
        };

        let mut output = String::with_capacity(input.len());
        let mut last_end = 0;
        for captures in regex.captures_iter(input) {
            let captures = match captures {
                Ok(captures) => captures,
                Err(err) => {
                    warn!(error = %err, "Substitution scan failed, leaving text unchanged");
                    return input.to_string();
                }
            };
            let whole = match captures.get(0) {
                Some(whole) => whole,
                None => continue,
            };
            let prefix = captures.get(1).map_or("", |m| m.as_str());
            let core = captures.get(2).map_or("", |m| m.as_str());
            let suffix = captures.get(3).map_or("", |m| m.as_str());

            let replacement = self
                .replacements
                .get(&core.to_lowercase())
                .map(String::as_str)
                .unwrap_or(core);

            output.push_str(&input[last_end..whole.start()]);
            output.push_str(prefix);
            output.push_str(replacement);
            output.push_str(suffix);
            last_end = whole.end();
        }
        output.push_str(&input[last_end..]);
        output
    }
}

/// Masks and unmasks free text against a loaded mapping store
///
/// The substituter snapshots both directions at construction and holds no
/// reference to the store, so it can outlive the engine and be applied
/// from multiple readers at once.
///
/// # Examples
///
/// ```
/// use cloak::core::store::MappingStore;
/// use cloak::core::text::TextSubstituter;
/// use cloak::domain::EntityCategory;
///
/// # fn example() -> cloak::domain::Result<()> {
/// let mut store = MappingStore::new();
/// store.record(EntityCategory::Company, "ibm", "Hayes Group")?;
///
/// let text = TextSubstituter::new(&store);
/// assert_eq!(text.mask("ibm quarterly report"), "Hayes Group quarterly report");
/// assert_eq!(text.unmask("Hayes Group quarterly report"), "ibm quarterly report");
/// # Ok(())
/// # }
/// ```
pub struct TextSubstituter {
    forward: FlatTable,
    backward: FlatTable,
}

impl TextSubstituter {
    /// Builds both direction tables from the store
    pub fn new(store: &MappingStore) -> Self {
        Self {
            forward: FlatTable::new(store, false),
            backward: FlatTable::new(store, true).with_suffix_aliases(),
        }
    }

    /// Replaces originals with their fakes
    pub fn mask(&self, text: &str) -> String {
        self.forward.apply(text)
    }

    /// Replaces fakes (and their informal aliases) with their originals
    pub fn unmask(&self, text: &str) -> String {
        self.backward.apply(text)
    }
}
