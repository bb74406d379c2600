//! Header specifications: ordered column names with minimum display widths.

use crate::error::CheckhostError;

/// Ordered mapping from column name to minimum display width.
///
/// Insertion order defines left-to-right column order. Column names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderSpec {
    columns: Vec<(String, usize)>,
}

impl HeaderSpec {
    /// Build a spec from `(name, width)` pairs, rejecting duplicate names.
    pub fn new<I, N>(columns: I) -> Result<Self, CheckhostError>
    where
        I: IntoIterator<Item = (N, usize)>,
        N: Into<String>,
    {
        let mut spec = Self::default();
        for (name, width) in columns {
            spec.push(name, width)?;
        }
        Ok(spec)
    }

    /// Pair names with widths positionally, stopping at the shorter sequence.
    pub fn zip<N>(names: &[N], widths: &[usize]) -> Result<Self, CheckhostError>
    where
        N: AsRef<str>,
    {
        Self::new(
            names
                .iter()
                .zip(widths.iter())
                .map(|(name, width)| (name.as_ref().to_string(), *width)),
        )
    }

    /// Append a column.
    pub fn push<N: Into<String>>(&mut self, name: N, width: usize) -> Result<(), CheckhostError> {
        let name = name.into();
        if self.columns.iter().any(|(existing, _)| *existing == name) {
            return Err(CheckhostError::duplicate_column(name));
        }
        self.columns.push((name, width));
        Ok(())
    }

    /// Iterate over `(name, width)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(name, width)| (name.as_str(), *width))
    }

    /// Column names in order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Declared widths in column order.
    pub fn sizes(&self) -> Vec<usize> {
        self.columns.iter().map(|(_, width)| *width).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Full per-item report.
    pub fn generic() -> Self {
        Self::preset(&[
            ("Domain", 100),
            ("Status", 11),
            ("Expiration Date", 17),
            ("Source", 10),
            ("HTTP Code", 10),
            ("Analyze Date", 20),
        ])
    }

    /// Reduced per-item report.
    pub fn less() -> Self {
        Self::preset(&[("Domain", 100), ("Status", 11), ("HTTP Code", 10)])
    }

    /// HTTP status code report.
    pub fn http() -> Self {
        Self::preset(&[
            ("Domain", 100),
            ("Status", 11),
            ("HTTP Code", 10),
            ("Analyze Date", 20),
        ])
    }

    /// Per-status counts and shares.
    pub fn percentage() -> Self {
        Self::preset(&[("Status", 11), ("Percentage", 12), ("Numbers", 12)])
    }

    /// Hosts file layout; widths are ignored.
    pub fn hosts() -> Self {
        Self::preset(&[("IP", 0), ("Domain", 0)])
    }

    // Presets have distinct literal names.
    fn preset(columns: &[(&str, usize)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, width)| (name.to_string(), *width))
                .collect(),
        }
    }
}
