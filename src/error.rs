// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::fmt;
use thiserror::Error;

/// What went wrong underneath a [`DataAccessError`]. Only used for logging,
/// callers treat every kind the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAccessKind {
    Timeout,
    Connection,
    Request,
    Status,
    Decode,
    MalformedRow,
}

impl fmt::Display for DataAccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DataAccessKind::Timeout => "request timed out",
            DataAccessKind::Connection => "connection failed",
            DataAccessKind::Request => "request failed",
            DataAccessKind::Status => "unsuccessful HTTP status",
            DataAccessKind::Decode => "invalid response format",
            DataAccessKind::MalformedRow => "expected data not found",
        };
        f.write_str(label)
    }
}

/// The single error the currency pipeline reports to its callers.
#[derive(Debug, Error)]
#[error("could not load currency data")]
pub struct DataAccessError {
    kind: DataAccessKind,
}

impl DataAccessError {
    /// Log the underlying cause and collapse it into a `DataAccessError`.
    pub fn new(kind: DataAccessKind, cause: impl fmt::Display) -> Self {
        log::error!("{}: {}", kind, cause);
        Self { kind }
    }

    pub fn kind(&self) -> DataAccessKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_displays_the_same_message() {
        let kinds = [
            DataAccessKind::Timeout,
            DataAccessKind::Connection,
            DataAccessKind::Request,
            DataAccessKind::Status,
            DataAccessKind::Decode,
            DataAccessKind::MalformedRow,
        ];

        for kind in kinds {
            let err = DataAccessError::new(kind, "boom");
            assert_eq!(err.kind(), kind);
            assert_eq!(err.to_string(), "could not load currency data");
        }
    }
}
