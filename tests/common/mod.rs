// Common test utilities shared across test files

use axum::{body::Body, http::Request, response::Response, Router};
use http_body_util::BodyExt;
use uritmpl::domain::template::VariableValues;

/// Route file used by the HTTP and route table tests
#[allow(dead_code)]
pub const TEST_ROUTES: &str = r#"
- name: user_posts
  template: /users/{id}/posts{?page,tags}
  shapes:
    tags: list
- name: user
  template: /users/{id}
  description: Look up a user
  required: [id]
- name: search
  template: /search{?q,lang|en}
- name: files
  template: /files{/path*}
- name: docs
  template: https://docs.example.com{/page}{#section}
"#;

/// The variable set RFC 6570 uses for its examples
#[allow(dead_code)]
pub fn rfc_values() -> VariableValues {
    values(serde_json::json!({
        "count": ["one", "two", "three"],
        "dom": ["example", "com"],
        "dub": "me/too",
        "hello": "Hello World!",
        "half": "50%",
        "var": "value",
        "who": "fred",
        "base": "http://example.com/home/",
        "path": "/foo/bar",
        "list": ["red", "green", "blue"],
        "keys": {"semi": ";", "dot": ".", "comma": ","},
        "v": "6",
        "x": "1024",
        "y": "768",
        "empty": "",
        "empty_keys": {},
        "undef": null
    }))
}

/// Build variable values from a JSON object
#[allow(dead_code)]
pub fn values(json: serde_json::Value) -> VariableValues {
    serde_json::from_value(json).expect("Test values must be a JSON object of variable values")
}

/// Every way of joining `items` in some order behind `prefix`, for asserting
/// map expansions without relying on key order
#[allow(dead_code)]
pub fn orderings(prefix: &str, items: &[&str], separator: &str) -> Vec<String> {
    fn permute<'a>(items: &[&'a str]) -> Vec<Vec<&'a str>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let first = rest.remove(i);
            for mut tail in permute(&rest) {
                tail.insert(0, first);
                out.push(tail);
            }
        }
        out
    }

    permute(items)
        .into_iter()
        .map(|order| format!("{}{}", prefix, order.join(separator)))
        .collect()
}

/// Create a test Axum router over `TEST_ROUTES`
#[allow(dead_code)]
pub fn create_test_app() -> Router {
    let table = uritmpl::config::parse_route_table(TEST_ROUTES).expect("Test routes must load");
    uritmpl::create_router(table)
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body must be JSON")
}
