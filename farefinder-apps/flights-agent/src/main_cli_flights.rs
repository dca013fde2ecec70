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

//! CLI for flight search via SerpApi.

use anyhow::{Context, Result};
use clap::Parser;
use farefinder_flights_agent::{
    FlightQuery, FlightSearchOutcome, SerpApiFlightsClient, extract_best_flights,
};
use serde_json::Value;
use std::cmp::max;
use term_size;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "farefinder-flights")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Origin airport code (e.g., SFO, LAX)
    #[arg(short, long)]
    from: Option<String>,

    /// Destination airport code (e.g., JFK, LHR)
    #[arg(short, long)]
    to: Option<String>,

    /// Departure date (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<String>,

    /// Return date for round trips (YYYY-MM-DD)
    #[arg(short = 'R', long)]
    return_date: Option<String>,

    /// Number of adults
    #[arg(short, long, default_value = "1")]
    adults: u32,

    /// Number of children
    #[arg(short, long, default_value = "0")]
    children: u32,

    /// Number of infants in seat
    #[arg(long, default_value = "0")]
    infants_in_seat: u32,

    /// Number of infants on lap
    #[arg(long, default_value = "0")]
    infants_on_lap: u32,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Save raw JSON response to file for debugging
    #[arg(long)]
    save_json: bool,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

/// Helper: string field of a JSON object, with fallback
fn json_str<'a>(value: &'a Value, key: &str, default: &'a str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Helper: integer field of a JSON object, with fallback
fn json_i64(value: &Value, key: &str, default: i64) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(default)
}

/// First flight segment of a best-flights entry
fn first_seg(entry: &Value) -> Option<&Value> {
    entry.get("flights").and_then(Value::as_array)?.first()
}

/// Last flight segment of a best-flights entry
fn last_seg(entry: &Value) -> Option<&Value> {
    entry.get("flights").and_then(Value::as_array)?.last()
}

/// Format duration in hours/minutes.
fn fmt_duration(minutes: i64) -> String {
    let hrs = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{}h", hrs)
    } else if hrs == 0 {
        format!("{}m", mins)
    } else {
        format!("{}h {:02}m", hrs, mins)
    }
}

/// Format departure/arrival times from the first and last segments.
fn fmt_times(entry: &Value) -> String {
    let dep = first_seg(entry)
        .and_then(|s| s.get("departure_airport"))
        .map(|a| json_str(a, "time", "??:??"))
        .unwrap_or("??:??");
    let arr = last_seg(entry)
        .and_then(|s| s.get("arrival_airport"))
        .map(|a| json_str(a, "time", "??:??"))
        .unwrap_or("??:??");
    format!("{} → {}", dep, arr)
}

/// Format stops and layovers combined: "2 stops: 1h45@DEN, 2h20@ORD"
fn fmt_stops_and_layovers(entry: &Value) -> String {
    let layovers = entry
        .get("layovers")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    match layovers.len() {
        0 => "direct".to_string(),
        n => {
            let parts: Vec<String> = layovers
                .iter()
                .map(|l| {
                    let dur = fmt_duration(json_i64(l, "duration", 0));
                    format!("{}@{}", dur, json_str(l, "id", "??"))
                })
                .collect();
            let label = if n == 1 { "stop" } else { "stops" };
            format!("{} {}: {}", n, label, parts.join(", "))
        }
    }
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

/// Calculate column widths from the entries to render
fn calc_column_widths(entries: &[Value]) -> (usize, usize, usize, usize, usize) {
    let mut max_airline = 7;
    let mut max_times = 15;
    let mut max_duration = 10;
    let mut max_stops = 25;

    for entry in entries {
        if let Some(seg) = first_seg(entry) {
            max_airline = max(max_airline, json_str(seg, "airline", "??").len());
        }
        max_times = max(max_times, fmt_times(entry).len());
        max_duration = max(
            max_duration,
            fmt_duration(json_i64(entry, "total_duration", 0)).len(),
        );
        max_stops = max(max_stops, fmt_stops_and_layovers(entry).len());
    }

    let rank_width = 5;
    (rank_width, max_airline, max_times, max_duration, max_stops)
}

/// Render results to stdout
fn render_results(query: &FlightQuery, entries: &[Value]) {
    let from = query.departure_airport.as_deref().unwrap_or("???");
    let to = query.arrival_airport.as_deref().unwrap_or("???");
    let date = query.outbound_date.as_deref().unwrap_or("?");

    let title_bar = format!(
        "================================================================================================\n  🛫  {} → {} on {}\n================================================================================================",
        from, to, date
    );
    println!("{}\n", title_bar);

    let best_price = entries
        .first()
        .map(|e| json_i64(e, "price", 0))
        .unwrap_or(0);

    println!("💰 Best Price:  ${}", best_price);
    println!("📊 Total Flights: {}", entries.len());

    let (rw, aw, tw, dw, sw) = calc_column_widths(entries);

    println!("\n🏆 Top {} Results:", 5.min(entries.len()));
    println!("{}\n", dash_bar());

    let h1 = format!("  {:>w$}", "#", w = rw);
    let h2 = format!("{:<w$}", "AIRLINE", w = aw);
    let h3 = format!("{:<w$}", "DEP → ARR", w = tw);
    let h4 = format!("{:<w$}", "DURATION", w = dw);
    let h5 = format!("{:<w$}", "LAYOVERS", w = sw);
    println!("{}  {}  {}  {}  {}   PRICE", h1, h2, h3, h4, h5);
    println!("{}\n", dash_bar());

    for (i, entry) in entries.iter().take(5).enumerate() {
        let airline = first_seg(entry)
            .map(|s| json_str(s, "airline", "??").to_string())
            .unwrap_or_else(|| "??".to_string());

        let c1 = format!("  {:>w$}", i + 1, w = rw);
        let c2 = format!("{:<w$}", airline, w = aw);
        let c3 = format!("{:<w$}", fmt_times(entry), w = tw);
        let c4 = format!(
            "{:<w$}",
            fmt_duration(json_i64(entry, "total_duration", 0)),
            w = dw
        );
        let c5 = format!("{:<w$}", fmt_stops_and_layovers(entry), w = sw);

        println!(
            "{}  {}  {}  {}  {}   ${}",
            c1,
            c2,
            c3,
            c4,
            c5,
            json_i64(entry, "price", 0)
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    tracing::info!("Starting farefinder-flights CLI");
    tracing::info!("Args: {:?}", args);

    let query = FlightQuery {
        departure_airport: args.from.map(|s| s.to_uppercase()),
        arrival_airport: args.to.map(|s| s.to_uppercase()),
        outbound_date: args.date,
        return_date: args.return_date,
        adults: args.adults,
        children: args.children,
        infants_in_seat: args.infants_in_seat,
        infants_on_lap: args.infants_on_lap,
    };

    let client =
        SerpApiFlightsClient::from_env(args.timeout).context("Failed to create SerpApi client")?;

    let outcome = if args.save_json {
        let body = client.fetch_raw(&query).await.context("Fetch failed")?;
        let filename = format!(
            "debug_{}_{}.json",
            query.departure_airport.as_deref().unwrap_or("any"),
            query.arrival_airport.as_deref().unwrap_or("any")
        );
        std::fs::write(&filename, &body).context("Failed to write JSON file")?;
        tracing::info!("Saved response to {}", filename);

        match extract_best_flights(&body) {
            Ok(flights) => FlightSearchOutcome::Flights(flights),
            Err(e) => FlightSearchOutcome::Failure(e.to_string()),
        }
    } else {
        client.search(&query).await
    };

    match outcome {
        FlightSearchOutcome::Flights(flights) => {
            tracing::info!("Search completed: {} best flights", flights.len());
            render_results(&query, &flights);
        }
        FlightSearchOutcome::Failure(message) => {
            eprintln!("Search failed: {}", message);
            std::process::exit(1);
        }
    }

    Ok(())
}
