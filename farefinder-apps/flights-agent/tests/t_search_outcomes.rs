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

//! End-to-end outcome tests against a local one-shot HTTP endpoint.
//!
//! `search` must always hand back a `FlightSearchOutcome`, never an `Err`
//! and never a panic, whatever the transport or the payload does.
//!
//! Run with:
//!     cargo test --test t_search_outcomes

use anyhow::Result;
use farefinder_flights_agent::{FlightQuery, FlightSearchOutcome, SerpApiFlightsClient};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve exactly one HTTP response on an ephemeral local port.
async fn one_shot_endpoint(status_line: &'static str, body: String) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut request = [0u8; 8192];
            let _ = stream.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    Ok(addr)
}

fn client_for(addr: SocketAddr) -> Result<SerpApiFlightsClient> {
    Ok(SerpApiFlightsClient::new("test-key", 5)?
        .with_base_url(format!("http://{}", addr)))
}

fn sfo_nrt_query() -> FlightQuery {
    FlightQuery {
        departure_airport: Some("SFO".to_string()),
        arrival_airport: Some("NRT".to_string()),
        outbound_date: Some("2025-07-01".to_string()),
        return_date: Some("2025-07-10".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_success_passes_best_flights_through() -> Result<()> {
    let best_flights = json!([
        {"price": 1134, "total_duration": 665, "flights": [{"airline": "United"}]},
        {"price": 1089, "total_duration": 780, "flights": [{"airline": "ANA"}]}
    ]);
    let body = json!({"best_flights": best_flights}).to_string();
    let addr = one_shot_endpoint("200 OK", body).await?;

    let outcome = client_for(addr)?.search(&sfo_nrt_query()).await;

    assert_eq!(
        outcome,
        FlightSearchOutcome::Flights(best_flights.as_array().unwrap().clone())
    );
    Ok(())
}

#[tokio::test]
async fn test_empty_best_flights_is_success_not_failure() -> Result<()> {
    let addr = one_shot_endpoint("200 OK", json!({"best_flights": []}).to_string()).await?;

    let outcome = client_for(addr)?.search(&sfo_nrt_query()).await;

    assert_eq!(outcome, FlightSearchOutcome::Flights(Vec::new()));
    assert!(!outcome.is_failure());
    Ok(())
}

#[tokio::test]
async fn test_missing_best_flights_is_failure() -> Result<()> {
    let body = json!({"search_metadata": {"status": "Success"}}).to_string();
    let addr = one_shot_endpoint("200 OK", body).await?;

    let outcome = client_for(addr)?.search(&sfo_nrt_query()).await;

    match outcome {
        FlightSearchOutcome::Failure(message) => {
            assert!(message.contains("best_flights"), "got: {message}");
        }
        other => panic!("Expected Failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_provider_error_is_failure_with_message() -> Result<()> {
    let body = json!({"error": "Invalid API key."}).to_string();
    let addr = one_shot_endpoint("200 OK", body).await?;

    let outcome = client_for(addr)?.search(&sfo_nrt_query()).await;

    match outcome {
        FlightSearchOutcome::Failure(message) => {
            assert!(message.contains("Invalid API key."), "got: {message}");
        }
        other => panic!("Expected Failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_http_error_status_is_failure() -> Result<()> {
    let body = json!({"error": "Unauthorized"}).to_string();
    let addr = one_shot_endpoint("401 Unauthorized", body).await?;

    let outcome = client_for(addr)?.search(&sfo_nrt_query()).await;

    match outcome {
        FlightSearchOutcome::Failure(message) => {
            assert!(message.contains("401"), "got: {message}");
        }
        other => panic!("Expected Failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_non_json_body_is_failure() -> Result<()> {
    let addr =
        one_shot_endpoint("200 OK", "<!DOCTYPE html><html>oops</html>".to_string()).await?;

    let outcome = client_for(addr)?.search(&sfo_nrt_query()).await;

    assert!(outcome.is_failure());
    Ok(())
}

#[tokio::test]
async fn test_unroutable_endpoint_is_failure_not_panic() -> Result<()> {
    // Nothing listens on the discard port
    let client = SerpApiFlightsClient::new("test-key", 2)?.with_base_url("http://127.0.0.1:9");

    let outcome = client.search(&sfo_nrt_query()).await;

    match outcome {
        FlightSearchOutcome::Failure(message) => {
            assert!(!message.is_empty(), "Failure string must be non-empty");
        }
        other => panic!("Expected Failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_concurrent_searches_are_independent() -> Result<()> {
    let ok_body = json!({"best_flights": [{"price": 1}]}).to_string();
    let ok_addr = one_shot_endpoint("200 OK", ok_body).await?;

    let ok_client = client_for(ok_addr)?;
    let bad_client =
        SerpApiFlightsClient::new("test-key", 2)?.with_base_url("http://127.0.0.1:9");

    let query = sfo_nrt_query();
    let (ok_outcome, bad_outcome) =
        tokio::join!(ok_client.search(&query), bad_client.search(&query));

    assert!(!ok_outcome.is_failure());
    assert!(bad_outcome.is_failure());
    Ok(())
}

#[tokio::test]
async fn test_outcome_serialization_shape() -> Result<()> {
    // Callers of the serialized form discriminate on the variant name
    let flights = FlightSearchOutcome::Flights(vec![json!({"price": 1})]);
    let failure = FlightSearchOutcome::Failure("boom".to_string());

    let flights_json: Value = serde_json::to_value(&flights)?;
    let failure_json: Value = serde_json::to_value(&failure)?;

    assert!(flights_json.get("flights").is_some());
    assert_eq!(failure_json, json!({"failure": "boom"}));
    Ok(())
}
