#![allow(dead_code)]

use chrono::{Duration, Utc};
use dipscan::services::YahooFinanceClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Chart payload with one bar per day ending today.
pub fn chart_body(closes: &[f64], volume: f64) -> Value {
    let now = Utc::now();
    let timestamps: Vec<i64> = (0..closes.len())
        .map(|i| (now - Duration::days((closes.len() - 1 - i) as i64)).timestamp())
        .collect();
    let high: Vec<f64> = closes.iter().map(|c| c * 1.01).collect();
    let low: Vec<f64> = closes.iter().map(|c| c * 0.99).collect();
    json!({
        "chart": {
            "result": [{
                "meta": { "currency": "USD" },
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{
                        "open": closes,
                        "high": high,
                        "low": low,
                        "close": closes,
                        "volume": vec![volume; closes.len()],
                    }]
                }
            }],
            "error": null
        }
    })
}

pub fn summary_body(market_cap: f64, sector: &str) -> Value {
    json!({
        "quoteSummary": {
            "result": [{
                "price": { "marketCap": { "raw": market_cap, "fmt": "n/a" } },
                "assetProfile": { "sector": sector }
            }],
            "error": null
        }
    })
}

pub fn alternating_closes(len: usize, up: f64, down: f64) -> Vec<f64> {
    let mut closes = Vec::with_capacity(len);
    let mut price = 1000.0;
    closes.push(price);
    for i in 1..len {
        if (len - 1 - i) % 2 == 0 {
            price -= down;
        } else {
            price += up;
        }
        closes.push(price);
    }
    closes
}

pub async fn mock_chart(server: &MockServer, symbol: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{}", symbol)))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mock_chart_status(server: &MockServer, symbol: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{}", symbol)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn mock_summary(server: &MockServer, symbol: &str, market_cap: f64, sector: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v10/finance/quoteSummary/{}", symbol)))
        .and(query_param("modules", "price,assetProfile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(market_cap, sector)))
        .mount(server)
        .await;
}

pub fn client(server: &MockServer) -> YahooFinanceClient {
    YahooFinanceClient::with_client(server.uri(), reqwest::Client::new())
}
