use super::AppState;
use crate::feed::{self, FeedError, ItemWindow, DEFAULT_LIMIT, DEFAULT_OFFSET};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// `/<name>.xml` → `<name>`. Paths without the suffix are used as-is.
pub fn feed_name_from_path(file: &str) -> &str {
    file.strip_suffix(".xml").unwrap_or(file)
}

/// Reads `limit` and `offset`; missing or unparseable values fall back to
/// the defaults. `0` is a valid value for both.
pub fn parse_window(params: &HashMap<String, String>) -> ItemWindow {
    let read = |key: &str, default: u64| {
        params
            .get(key)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(default)
    };
    ItemWindow {
        limit: read("limit", DEFAULT_LIMIT),
        offset: read("offset", DEFAULT_OFFSET),
    }
}

pub(super) async fn hello() -> Json<Value> {
    Json(json!({"message": "Hello from API"}))
}

pub(super) async fn feed_xml(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let name = feed_name_from_path(&file);
    let window = parse_window(&params);

    match feed::feed_by_name(&state.client, &state.settings, &state.table_id, name, window).await {
        Ok(xml) => ([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], xml).into_response(),
        Err(e) => {
            tracing::warn!(
                name = %name,
                limit = window.limit,
                offset = window.offset,
                error = %e,
                "Feed request failed"
            );
            error_response(e).into_response()
        }
    }
}

fn json_error(body: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
}

/// Every failure is a 500 with a JSON body; the two pipeline outcomes carry
/// the node's raw response.
fn error_response(err: FeedError) -> (StatusCode, Json<Value>) {
    match err {
        FeedError::NotFound { name, response } => json_error(json!({
            "success": false,
            "message": "feed not found",
            "name": name,
            "feed": response,
        })),
        FeedError::SimulationFailed { dev_inspect, .. } => json_error(json!({
            "success": false,
            "devInspect": dev_inspect,
        })),
        other => json_error(json!({
            "success": false,
            "message": other.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_feed_name_from_path() {
        assert_eq!(feed_name_from_path("blog.xml"), "blog");
        assert_eq!(feed_name_from_path("blog"), "blog");
        assert_eq!(feed_name_from_path("my.blog.xml"), "my.blog");
        assert_eq!(feed_name_from_path(".xml"), "");
    }

    #[test]
    fn test_parse_window_defaults() {
        assert_eq!(parse_window(&params(&[])), ItemWindow::default());
        assert_eq!(
            parse_window(&params(&[("limit", "abc"), ("offset", "-1")])),
            ItemWindow::default()
        );
    }

    #[test]
    fn test_parse_window_values() {
        assert_eq!(
            parse_window(&params(&[("limit", "0"), ("offset", "0")])),
            ItemWindow { limit: 0, offset: 0 }
        );
        assert_eq!(
            parse_window(&params(&[("limit", "25"), ("offset", "5"), ("x", "y")])),
            ItemWindow {
                limit: 25,
                offset: 5
            }
        );
    }

    #[test]
    fn test_error_bodies() {
        let (status, Json(body)) = error_response(FeedError::NotFound {
            name: "ghost".into(),
            response: json!({"error": {"code": "dynamicFieldNotFound"}}),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "feed not found",
                "name": "ghost",
                "feed": {"error": {"code": "dynamicFieldNotFound"}},
            })
        );

        let (_, Json(body)) = error_response(FeedError::SimulationFailed {
            error: Some("abort".into()),
            dev_inspect: json!({"error": "abort"}),
        });
        assert_eq!(body, json!({"success": false, "devInspect": {"error": "abort"}}));

        let (_, Json(body)) = error_response(FeedError::MissingReturnValue);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "print_rss returned no value");
    }
}
