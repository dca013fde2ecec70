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

// Library for farefinder-flights-agent
// Flight search via the SerpApi Google Flights engine

mod flights_query;
mod flights_results;
mod flights_search;

// Re-export the query type and the fixed wire constants
pub use flights_query::{CURRENCY, ENGINE, FlightQuery, LOCALE, MAX_STOPS, REGION};

// Re-export the outcome union and extraction
pub use flights_results::{
    BEST_FLIGHTS_FIELD, FlightSearchOutcome, SearchError, extract_best_flights,
};

// Re-export the client
pub use flights_search::{API_KEY_ENV, DEFAULT_BASE_URL, SerpApiFlightsClient};
