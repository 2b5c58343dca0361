//! CheapShark gateway against a local HTTP responder

mod common;

use common::init_test_logging;
use dealdeck_core::gateway::{CheapSharkGateway, DealsGateway, GatewayConfig};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one canned response and hand back the request line that was received
async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        let request = String::from_utf8_lossy(&request).to_string();
        request.lines().next().unwrap_or_default().to_string()
    });

    (base, handle)
}

fn gateway(base: &str) -> CheapSharkGateway {
    let config = GatewayConfig::default()
        .with_api_base(base)
        .with_timeout_seconds(Some(5));
    CheapSharkGateway::new(config).unwrap()
}

#[tokio::test]
async fn test_list_deals_parses_string_prices() {
    init_test_logging();
    let body = r#"[
        {"gameID":"1","title":"Batman","thumb":"t.jpg","storeID":"1","salePrice":"4.99","normalPrice":"19.99","savings":"75.037519","steamRatingPercent":"92","dealID":"abc","steamRatingText":"Very Positive"},
        {"gameID":"2","title":"Portal","thumb":"","storeID":"1","salePrice":1.99,"normalPrice":9.99,"savings":80,"steamRatingPercent":"0"}
    ]"#;
    let (base, server) = serve_once("200 OK", body).await;

    let deals = gateway(&base).list_deals("1", 15).await.unwrap();

    assert_eq!(
        server.await.unwrap(),
        "GET /deals?storeID=1&pageSize=15 HTTP/1.1"
    );
    assert_eq!(deals.len(), 2);
    assert_eq!(deals[0].title, "Batman");
    assert_eq!(deals[0].sale_price, dec!(4.99));
    assert_eq!(deals[0].normal_price, dec!(19.99));
    assert_eq!(deals[0].steam_rating_percent, Some(dec!(92)));
    assert_eq!(deals[0].deal_id.as_deref(), Some("abc"));
    assert_eq!(deals[1].sale_price, dec!(1.99));
    assert_eq!(deals[1].savings, dec!(80));
}

#[tokio::test]
async fn test_list_deals_truncates_to_limit() {
    let body = format!(
        "[{}]",
        (0..20)
            .map(|i| format!(
                r#"{{"gameID":"{i}","title":"G{i}","storeID":"1","salePrice":"1.00","normalPrice":"2.00","savings":"50"}}"#
            ))
            .collect::<Vec<_>>()
            .join(",")
    );
    let (base, _server) = serve_once("200 OK", &body).await;

    let deals = gateway(&base).list_deals("1", 15).await.unwrap();
    assert_eq!(deals.len(), 15);
}

#[tokio::test]
async fn test_search_hits_become_records() {
    let body = r#"[
        {"gameID":"612","steamAppID":null,"cheapest":"3.99","cheapestDealID":"xyz","external":"LEGO Batman","internalName":"LEGOBATMAN","thumb":"b.jpg"}
    ]"#;
    let (base, server) = serve_once("200 OK", body).await;

    let hits = gateway(&base).search_by_title("batman", 15).await.unwrap();

    assert_eq!(
        server.await.unwrap(),
        "GET /games?title=batman&limit=15 HTTP/1.1"
    );
    assert_eq!(hits.len(), 1);
    let hit = &hits[0];
    assert_eq!(hit.game_id, "612");
    assert_eq!(hit.title, "LEGO Batman");
    assert_eq!(hit.sale_price, dec!(3.99));
    assert_eq!(hit.normal_price, dec!(3.99));
    assert_eq!(hit.store_id, "");
}

#[tokio::test]
async fn test_detail_parses_info_and_offers() {
    let body = r#"{
        "info":{"title":"LEGO Batman","steamAppID":"21000","thumb":"b.jpg"},
        "cheapestPriceEver":{"price":"3.99","date":1543028665},
        "deals":[{"storeID":"1","dealID":"d1","price":"4.99","retailPrice":"19.99","savings":"75.037519"}]
    }"#;
    let (base, server) = serve_once("200 OK", body).await;

    let detail = gateway(&base).get_detail("612").await.unwrap();

    assert_eq!(server.await.unwrap(), "GET /games?id=612 HTTP/1.1");
    assert_eq!(detail.info.title, "LEGO Batman");
    assert_eq!(
        detail.steam_store_url().as_deref(),
        Some("https://store.steampowered.com/app/21000")
    );
    let offer = detail.primary_offer().unwrap();
    assert_eq!(offer.price, dec!(4.99));
    assert_eq!(offer.retail_price, dec!(19.99));
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let (base, _server) = serve_once("500 Internal Server Error", "{}").await;

    let err = gateway(&base).list_deals("1", 15).await.unwrap_err();

    assert!(err.reason.contains("500"), "unexpected reason: {err}");
    assert!(err.url.contains("/deals"));
}

#[tokio::test]
async fn test_non_array_body_is_transport_error() {
    let (base, _server) = serve_once("200 OK", r#"{"error":"rate limited"}"#).await;

    let err = gateway(&base).list_deals("1", 15).await.unwrap_err();
    assert!(err.reason.contains("unexpected response body"));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Bind then drop so the port is closed
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = gateway(&base).search_by_title("portal", 15).await;
    assert!(result.is_err());
}
