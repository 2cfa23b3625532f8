//! SQL-literal substitution engine
//!
//! Rewrites only literal tokens inside a statement, preserving the
//! original quoting style. Tokenization is delegated to a
//! [`SqlTokenizer`], so the engine itself never interprets SQL grammar
//! beyond what the token stream tells it.

use tracing::warn;

use crate::adapters::sql::{GenericSqlTokenizer, SqlTokenizer};
use crate::core::store::MappingStore;
use crate::domain::category::EntityCategory;
use crate::domain::result::Result;

/// Masks and unmasks literal values inside SQL statements
///
/// A bare literal carries no column context, so the engine cannot know
/// which category it belongs to; it scans the categories in their fixed
/// order and the first table containing the value wins. Values that
/// appear in no table pass through untouched, as does anything the
/// tokenizer could not classify.
///
/// # Examples
///
/// ```
/// use cloak::core::sql::SqlSubstituter;
/// use cloak::core::store::MappingStore;
/// use cloak::domain::EntityCategory;
///
/// # fn example() -> cloak::domain::Result<()> {
/// let mut store = MappingStore::new();
/// store.record(EntityCategory::Company, "ibm", "Hayes Group")?;
///
/// let sql = SqlSubstituter::new(&store);
/// let masked = sql.mask("SELECT * FROM t WHERE name='ibm'")?;
/// assert_eq!(masked, "SELECT * FROM t WHERE name='Hayes Group'");
/// # Ok(())
/// # }
/// ```
pub struct SqlSubstituter<'a> {
    store: &'a MappingStore,
    tokenizer: Box<dyn SqlTokenizer>,
}

impl<'a> SqlSubstituter<'a> {
    /// Creates a substituter with the default lexer
    pub fn new(store: &'a MappingStore) -> Self {
        Self {
            store,
            tokenizer: Box::new(GenericSqlTokenizer::new()),
        }
    }

    /// Creates a substituter over a caller-supplied tokenizer
    pub fn with_tokenizer(store: &'a MappingStore, tokenizer: Box<dyn SqlTokenizer>) -> Self {
        Self { store, tokenizer }
    }

    /// Replaces original literals with their fakes
    pub fn mask(&self, statement: &str) -> Result<String> {
        self.substitute(statement, false)
    }

    /// Replaces fake literals with their originals
    pub fn unmask(&self, statement: &str) -> Result<String> {
        self.substitute(statement, true)
    }

    fn substitute(&self, statement: &str, backward: bool) -> Result<String> {
        let tokens = match self.tokenizer.tokenize(statement) {
            Ok(tokens) => tokens,
            Err(err) => {
                // never fail a downstream pipeline over one statement
                warn!(error = %err, "Statement could not be tokenized, passing through");
                return Ok(statement.to_string());
            }
        };

        let mut output = String::with_capacity(statement.len());
        for token in tokens {
            if !token.is_literal {
                output.push_str(&token.text);
                continue;
            }
            match self.resolve(token.unquoted(), backward) {
                Some(replacement) => output.push_str(&token.quote_style.wrap(replacement)),
                None => output.push_str(&token.text),
            }
        }
        Ok(output)
    }

    /// First category whose table holds the candidate wins
    fn resolve(&self, candidate: &str, backward: bool) -> Option<&str> {
        for category in EntityCategory::ALL {
            let hit = if backward {
                self.store.lookup_backward(category, candidate)
            } else {
                self.store.lookup_forward(category, candidate)
            };
            if hit.is_some() {
                return hit;
            }
        }
        None
    }
}
