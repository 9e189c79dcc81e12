//! The two supported model-table dialects and how one is chosen.

use std::fmt;
use std::str::FromStr;

use crate::error::SourceError;

use super::loader::SourceTable;

/// Layout of a model table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// One row per attribute; node rows list their attributes in `DependsOn`
    /// next to the `Component` marker.
    DependencyGraph,
    /// One row per (node, property) pair.
    FlatNodeProperty,
}

/// Organizations whose models are known to use a given dialect.
const ORG_DIALECTS: &[(&str, Dialect)] = &[
    ("ada", Dialect::DependencyGraph),
    ("amp-als", Dialect::DependencyGraph),
    ("htan", Dialect::DependencyGraph),
    ("mc2", Dialect::DependencyGraph),
    ("nf", Dialect::DependencyGraph),
    ("cds", Dialect::FlatNodeProperty),
    ("crdc", Dialect::FlatNodeProperty),
    ("gc", Dialect::FlatNodeProperty),
    ("icdc", Dialect::FlatNodeProperty),
];

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::DependencyGraph => "dependency-graph",
            Dialect::FlatNodeProperty => "flat-node-property",
        }
    }

    /// Columns a table of this dialect must carry.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Dialect::DependencyGraph => &["Attribute", "DependsOn"],
            Dialect::FlatNodeProperty => &["Node", "Property"],
        }
    }

    /// Dialect registered for an organization tag.
    pub fn for_org(org: &str) -> Option<Dialect> {
        ORG_DIALECTS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(org.trim()))
            .map(|(_, dialect)| *dialect)
    }

    /// Guess the dialect from the header row. `None` when the header fits
    /// neither dialect or both.
    pub fn sniff(table: &SourceTable) -> Option<Dialect> {
        let fits = |d: Dialect| d.required_columns().iter().all(|c| table.has_column(c));
        match (fits(Dialect::DependencyGraph), fits(Dialect::FlatNodeProperty)) {
            (true, false) => Some(Dialect::DependencyGraph),
            (false, true) => Some(Dialect::FlatNodeProperty),
            _ => None,
        }
    }

    /// An explicit dialect wins, then the org lookup, then the header.
    pub fn resolve(
        explicit: Option<Dialect>,
        org: &str,
        table: &SourceTable,
    ) -> Result<Dialect, SourceError> {
        if let Some(dialect) = explicit {
            return Ok(dialect);
        }
        if let Some(dialect) = Self::for_org(org) {
            log::debug!("org '{org}' uses the {dialect} dialect");
            return Ok(dialect);
        }
        let sniffed = Self::sniff(table).ok_or_else(|| SourceError::UnknownDialect {
            org: org.to_string(),
        })?;
        log::info!("org '{org}' is not registered; header looks like {sniffed}");
        Ok(sniffed)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "dependency-graph" | "a" => Ok(Dialect::DependencyGraph),
            "flat-node-property" | "b" => Ok(Dialect::FlatNodeProperty),
            _ => Err(SourceError::UnknownDialectName(s.to_string())),
        }
    }
}
