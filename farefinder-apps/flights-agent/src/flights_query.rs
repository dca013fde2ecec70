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

//! # Flights Query
//!
//! Side-effect free assembly of SerpApi Google Flights search parameters.
//! This module builds the query-string parameter list for the `/search`
//! endpoint.

use serde::{Deserialize, Serialize};

/// SerpApi engine identifier for Google Flights.
pub const ENGINE: &str = "google_flights";
/// Interface language sent with every search.
pub const LOCALE: &str = "en";
/// Country used for the search.
pub const REGION: &str = "us";
/// Currency of the returned prices.
pub const CURRENCY: &str = "USD";
/// Maximum number of stops, fixed to one layover. Upstream hardcodes this
/// with no caller override; kept as-is rather than exposed.
pub const MAX_STOPS: &str = "1";

/// A flight search query.
///
/// Airports and dates are optional and forwarded to the provider
/// uninterpreted: a malformed IATA code or date is the provider's problem
/// to report, not ours to reject. Passenger counts default to one adult
/// travelling alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FlightQuery {
    /// Departure airport code (IATA), e.g. "SFO".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_airport: Option<String>,
    /// Arrival airport code (IATA), e.g. "NRT".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_airport: Option<String>,
    /// Outbound date, YYYY-MM-DD, e.g. "2025-07-01".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_date: Option<String>,
    /// Return date, YYYY-MM-DD. Omit for one-way searches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    /// Number of adults. Defaults to 1.
    #[serde(default = "default_adults")]
    pub adults: u32,
    /// Number of children. Defaults to 0.
    #[serde(default)]
    pub children: u32,
    /// Number of infants in seat. Defaults to 0.
    #[serde(default)]
    pub infants_in_seat: u32,
    /// Number of infants on lap. Defaults to 0.
    #[serde(default)]
    pub infants_on_lap: u32,
}

fn default_adults() -> u32 {
    1
}

impl Default for FlightQuery {
    fn default() -> Self {
        Self {
            departure_airport: None,
            arrival_airport: None,
            outbound_date: None,
            return_date: None,
            adults: 1,
            children: 0,
            infants_in_seat: 0,
            infants_on_lap: 0,
        }
    }
}

impl FlightQuery {
    /// Assemble the full parameter list for a SerpApi `/search` call.
    ///
    /// Contains exactly the fixed engine/locale/region/currency/stop
    /// constants plus the mapped caller fields. Unset airports and dates
    /// are omitted. Counts travel as decimal strings, matching the wire
    /// format the provider documents.
    pub fn to_search_params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", api_key.to_string()),
            ("engine", ENGINE.to_string()),
            ("hl", LOCALE.to_string()),
            ("gl", REGION.to_string()),
        ];

        if let Some(from) = &self.departure_airport {
            params.push(("departure_id", from.clone()));
        }
        if let Some(to) = &self.arrival_airport {
            params.push(("arrival_id", to.clone()));
        }
        if let Some(date) = &self.outbound_date {
            params.push(("outbound_date", date.clone()));
        }
        if let Some(date) = &self.return_date {
            params.push(("return_date", date.clone()));
        }

        params.push(("currency", CURRENCY.to_string()));
        params.push(("adults", self.adults.to_string()));
        params.push(("children", self.children.to_string()));
        params.push(("infants_in_seat", self.infants_in_seat.to_string()));
        params.push(("infants_on_lap", self.infants_on_lap.to_string()));
        params.push(("stop", MAX_STOPS.to_string()));

        params
    }

    /// Percent-encoded query string for the `/search` endpoint.
    pub fn to_query_string(&self, api_key: &str) -> String {
        self.to_search_params(api_key)
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
