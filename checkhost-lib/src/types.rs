//! Core data types for rendering test results.
//!
//! This module defines the per-item results supplied by the test loop,
//! the status codes they carry, and the render modes of the report renderer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placeholder for a field the test loop could not determine.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Placeholder for a missing HTTP status code.
pub const NO_HTTP_CODE: &str = "***";

/// Outcome of testing a single item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    #[serde(rename = "UP")]
    Up,

    #[serde(rename = "DOWN")]
    Down,

    #[serde(rename = "INVALID")]
    Invalid,

    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Status {
    /// All recognized statuses, in report order.
    pub const ALL: [Status; 4] = [Status::Up, Status::Down, Status::Invalid, Status::Unknown];

    /// The official upper-case spelling used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Up => "UP",
            Status::Down => "DOWN",
            Status::Invalid => "INVALID",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "UP" => Ok(Status::Up),
            "DOWN" => Ok(Status::Down),
            "INVALID" => Ok(Status::Invalid),
            "UNKNOWN" => Ok(Status::Unknown),
            other => Err(format!("Unrecognized status '{}'", other)),
        }
    }
}

/// Result of testing one item, as produced by the test loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResult {
    /// The tested domain, IP or URL
    pub item: String,

    /// Availability outcome
    pub status: Status,

    /// Expiration date extracted from WHOIS, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// Which subsystem decided the status (e.g. "WHOIS", "DNSLOOKUP")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// HTTP status code, when one was fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,

    /// When the item was tested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyze_date: Option<String>,
}

impl TestResult {
    /// Create a result with only the item and its status.
    pub fn new<I: Into<String>>(item: I, status: Status) -> Self {
        Self {
            item: item.into(),
            status,
            expiration_date: None,
            source: None,
            http_code: None,
            analyze_date: None,
        }
    }

    fn http_code_text(&self) -> String {
        self.http_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| NO_HTTP_CODE.to_string())
    }

    /// Row matching the `generic` header preset.
    pub fn generic_row(&self) -> Vec<String> {
        vec![
            self.item.clone(),
            self.status.to_string(),
            self.expiration_date
                .clone()
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            self.source
                .clone()
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            self.http_code_text(),
            self.analyze_date.clone().unwrap_or_default(),
        ]
    }

    /// Row matching the `less` header preset.
    pub fn less_row(&self) -> Vec<String> {
        vec![
            self.item.clone(),
            self.status.to_string(),
            self.http_code_text(),
        ]
    }

    /// Row matching the `http` header preset.
    pub fn http_row(&self) -> Vec<String> {
        vec![
            self.item.clone(),
            self.status.to_string(),
            self.http_code_text(),
            self.analyze_date.clone().unwrap_or_default(),
        ]
    }

    /// Hosts-file row: the redirect IP followed by the item.
    pub fn hosts_row(&self, ip: &str) -> Vec<String> {
        vec![ip.to_string(), self.item.clone()]
    }
}

/// How the report renderer lays out and styles its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Column-aligned text, never styled
    PlainTabular,

    /// Column-aligned text, stdout echo styled by the row's status
    ColorizedTabular,

    /// `<ip> <hostname>` lines with no alignment
    HostsList,
}

impl RenderMode {
    /// Whether lines are padded into columns.
    pub fn is_tabular(&self) -> bool {
        !matches!(self, RenderMode::HostsList)
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::PlainTabular => write!(f, "Plain"),
            RenderMode::ColorizedTabular => write!(f, "Colorized"),
            RenderMode::HostsList => write!(f, "Hosts"),
        }
    }
}
