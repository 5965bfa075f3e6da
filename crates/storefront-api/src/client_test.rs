use super::*;

fn test_client(base_url: &str) -> StorefrontClient {
    StorefrontClient::with_base_url(base_url, 30, "storefront-test/0.1", 0, 0)
        .expect("client construction should not fail")
}

#[test]
fn endpoint_appends_segments_to_base_path() {
    let client = test_client("http://localhost:5000/api");
    let url = client.endpoint(&["orders", "user"]);
    assert_eq!(url.as_str(), "http://localhost:5000/api/orders/user");
}

#[test]
fn endpoint_strips_trailing_slash() {
    let client = test_client("http://localhost:5000/api/");
    let url = client.endpoint(&["products"]);
    assert_eq!(url.as_str(), "http://localhost:5000/api/products");
}

#[test]
fn endpoint_on_bare_host() {
    let client = test_client("https://shop.example.com");
    let url = client.endpoint(&["orders"]);
    assert_eq!(url.as_str(), "https://shop.example.com/orders");
}

#[test]
fn endpoint_encodes_path_segments() {
    let client = test_client("http://localhost:5000/api");
    let url = client.endpoint(&["orders", "a/b c"]);
    assert_eq!(url.as_str(), "http://localhost:5000/api/orders/a%2Fb%20c");
}

#[test]
fn rejects_non_http_base_url() {
    let result = StorefrontClient::with_base_url("ftp://example.com", 30, "ua", 0, 0);
    assert!(matches!(result, Err(ApiError::InvalidBaseUrl { .. })));

    let result = StorefrontClient::with_base_url("not a url", 30, "ua", 0, 0);
    assert!(matches!(result, Err(ApiError::InvalidBaseUrl { .. })));
}
