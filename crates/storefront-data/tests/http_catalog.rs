use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use storefront_commerce::catalog::{CatalogRequest, CatalogService, FallbackCatalog};
use storefront_commerce::{CatalogError, ProductId};
use storefront_data::{sample_catalog, HttpCatalog};

/// Serve a single canned response on a loopback port.
///
/// Returns the API base URL and a receiver yielding the request line.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        let _ = tx.send(request_line.trim().to_string());

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();
    });

    (format!("http://{addr}/api"), rx)
}

/// Loopback requests must not be routed through an environment proxy.
fn client(base: &str) -> HttpCatalog {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpCatalog::with_client(client, base).unwrap()
}

/// A base URL nothing listens on.
fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

#[tokio::test]
async fn fetch_page_sends_filters_and_decodes_envelope() {
    let (base, requests) = serve_once(
        "200 OK",
        r#"{"products":[{"id":"8","name":"Smart Watch","price":299.99,"category":"Electronics"}],"totalPages":2,"totalCount":9}"#,
    );
    let catalog = client(&base);

    let request = CatalogRequest::new(2, 8)
        .with_category("electronics")
        .with_search("watch");
    let page = catalog.fetch_page(&request).await.unwrap();

    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_count, 9);
    assert_eq!(page.items[0].name, "Smart Watch");
    assert_eq!(
        requests.recv().unwrap(),
        "GET /api/products?page=2&limit=8&category=electronics&search=watch HTTP/1.1"
    );
}

#[tokio::test]
async fn fetch_page_accepts_bare_array() {
    let (base, _) = serve_once(
        "200 OK",
        r#"[{"id":"1","name":"A","price":10,"category":"Home"},{"id":"2","name":"B","price":20,"category":"Home"}]"#,
    );
    let page = client(&base)
        .fetch_page(&CatalogRequest::new(1, 8))
        .await
        .unwrap();

    assert_eq!(page.total_pages, 1);
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn server_errors_map_to_catalog_errors() {
    let (base, _) = serve_once("503 Service Unavailable", "down for maintenance");
    let err = client(&base)
        .fetch_page(&CatalogRequest::new(1, 8))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CatalogError::Server {
            status: 503,
            message: "down for maintenance".into()
        }
    );
    assert!(err.is_retryable());

    let (base, _) = serve_once("200 OK", "<html></html>");
    let err = client(&base)
        .fetch_page(&CatalogRequest::new(1, 8))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Decode(_)));
}

#[tokio::test]
async fn connection_refused_is_a_network_error() {
    let err = client(&dead_url())
        .fetch_page(&CatalogRequest::new(1, 8))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Network(_)));
}

#[tokio::test]
async fn soft_failures_yield_empty_results() {
    let (base, _) = serve_once("404 Not Found", r#"{"message":"no such product"}"#);
    let catalog = client(&base);
    assert!(catalog.fetch_by_id(&ProductId::new("42")).await.is_none());

    let catalog = client(&dead_url());
    assert!(catalog.fetch_featured().await.is_empty());
}

#[tokio::test]
async fn slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    // Accept and never answer.
    thread::spawn(move || {
        let _held = listener.accept();
        thread::sleep(Duration::from_secs(2));
    });

    let err = client(&base)
        .with_timeout(Duration::from_millis(100))
        .fetch_page(&CatalogRequest::new(1, 8))
        .await
        .unwrap_err();
    assert_eq!(err, CatalogError::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn fallback_serves_sample_catalog_when_api_is_down() {
    let catalog = FallbackCatalog::new(client(&dead_url()), sample_catalog());

    let page = catalog
        .fetch_page(&CatalogRequest::new(1, 8).with_category("electronics"))
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);

    assert_eq!(catalog.fetch_featured().await.len(), 4);
    let product = catalog.fetch_by_id(&ProductId::new("3")).await.unwrap();
    assert_eq!(product.name, "Leather Weekender Bag");
}
