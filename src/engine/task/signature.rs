use std::fmt;

use crate::shared::hash::statement_digest;

const READ_KEYWORDS: &[&str] = &["select"];
const MUTATION_KEYWORDS: &[&str] = &["insert", "update", "delete"];
const JOIN_MARKER: &str = "join";

/// Derived `statement|table` shape of a query, used to classify and hash it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    statement: String,
    table: String,
}

impl Signature {
    /// Returns `None` when the statement is blank, which makes the query
    /// unclassifiable.
    pub fn new(statement: impl Into<String>, table: impl Into<String>) -> Option<Self> {
        let statement = statement.into();
        if statement.trim().is_empty() {
            return None;
        }
        Some(Self {
            statement,
            table: table.into(),
        })
    }

    /// Splits a rendered signature at its last separator.
    pub fn parse(rendered: &str) -> Option<Self> {
        let (statement, table) = rendered.rsplit_once('|')?;
        Self::new(statement, table)
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn leading_keyword(&self) -> String {
        self.statement
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase()
    }

    pub fn is_read(&self) -> bool {
        READ_KEYWORDS.contains(&self.leading_keyword().as_str())
    }

    pub fn is_mutation(&self) -> bool {
        MUTATION_KEYWORDS.contains(&self.leading_keyword().as_str())
    }

    pub fn has_join(&self) -> bool {
        self.statement
            .split_whitespace()
            .any(|word| word.eq_ignore_ascii_case(JOIN_MARKER))
    }

    /// Plain reads without joins are the only statements whose results get cached.
    pub fn is_cacheable(&self) -> bool {
        self.is_read() && !self.has_join()
    }

    /// `md5(statement)|table`. Stored entries depend on this exact layout.
    pub fn cache_key(&self) -> String {
        format!("{}|{}", statement_digest(&self.statement), self.table)
    }

    /// Glob matching every cache key that belongs to this signature's table.
    pub fn invalidation_pattern(&self) -> String {
        format!("*|{}", glob::Pattern::escape(&self.table))
    }

    pub fn table_suffix(&self) -> String {
        format!("|{}", self.table)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.statement, self.table)
    }
}
