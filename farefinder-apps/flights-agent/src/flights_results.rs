//!  Farefinder Flights Agent
//!
//!  Copyright (C) 2026  Farefinder contributors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Flights Results
//!
//! Side-effect free extraction of the `best_flights` payload from a SerpApi
//! response body, and the search outcome type returned to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The one response field this tool consumes. Everything else in the
/// provider payload is ignored.
pub const BEST_FLIGHTS_FIELD: &str = "best_flights";

/// Everything that can go wrong between issuing the request and handing
/// flights back. Collapsed to `FlightSearchOutcome::Failure` at the
/// `search` boundary.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request to SerpApi failed: {0}")]
    Transport(#[from] wreq::Error),
    #[error("SerpApi returned HTTP {status}: {body_preview}")]
    Status { status: u16, body_preview: String },
    #[error("could not parse SerpApi response as JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("SerpApi error: {0}")]
    Provider(String),
    #[error("response has no 'best_flights' array")]
    MissingBestFlights,
}

/// Result of one flight search.
///
/// `Flights` carries the provider's `best_flights` sequence verbatim; an
/// empty sequence is a legitimate success. `Failure` carries the textual
/// description of whatever went wrong. Callers discriminate on the variant,
/// never on a raised error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightSearchOutcome {
    Flights(Vec<Value>),
    Failure(String),
}

impl FlightSearchOutcome {
    pub fn flights(&self) -> Option<&[Value]> {
        match self {
            Self::Flights(flights) => Some(flights),
            Self::Failure(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Pull the `best_flights` array out of a raw response body.
///
/// The array is returned untouched: no reordering, no filtering, no field
/// stripping. A payload carrying a provider-level `error` field is reported
/// as such even when `best_flights` is also absent.
pub fn extract_best_flights(body: &str) -> Result<Vec<Value>, SearchError> {
    let payload: Value = serde_json::from_str(body)?;

    if let Some(message) = payload.get("error").and_then(Value::as_str) {
        return Err(SearchError::Provider(message.to_string()));
    }

    match payload.get(BEST_FLIGHTS_FIELD) {
        Some(Value::Array(flights)) => Ok(flights.clone()),
        _ => Err(SearchError::MissingBestFlights),
    }
}
