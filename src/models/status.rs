//! Shared status vocabulary for lease requests and quotations
//!
//! Both records move `pending -> approved | rejected` and never leave a
//! terminal state. Parsing is lenient because the backend has used upper
//! case and the word `accepted` for quotations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            RequestStatus::Pending => false,
            RequestStatus::Approved | RequestStatus::Rejected => true,
        }
    }

    /// Validate a move to `target`, returning the new status.
    pub fn transition(self, target: RequestStatus) -> Result<RequestStatus, AppError> {
        match (self, target) {
            (RequestStatus::Pending, RequestStatus::Approved)
            | (RequestStatus::Pending, RequestStatus::Rejected) => Ok(target),
            (RequestStatus::Pending, RequestStatus::Pending) => Err(AppError::InvalidInput(
                "Status is already pending".to_string(),
            )),
            (current, _) => Err(AppError::Conflict(format!(
                "Already {}; {} is a final status",
                current, current
            ))),
        }
    }
}

/// A record without a status is still waiting on a decision.
pub fn effective_status(status: Option<RequestStatus>) -> RequestStatus {
    status.unwrap_or(RequestStatus::Pending)
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "" => Ok(RequestStatus::Pending),
            "approved" | "accepted" => Ok(RequestStatus::Approved),
            "rejected" | "declined" => Ok(RequestStatus::Rejected),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Bucketed counts used by every dashboard aggregate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Option<RequestStatus>>,
    {
        statuses
            .into_iter()
            .fold(StatusCounts::default(), |mut counts, status| {
                counts.total += 1;
                match effective_status(status) {
                    RequestStatus::Pending => counts.pending += 1,
                    RequestStatus::Approved => counts.approved += 1,
                    RequestStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }
}
