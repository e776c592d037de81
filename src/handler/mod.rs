//! Request handling entry point
//!
//! Validates the request, resolves a route, dispatches to the user handlers,
//! and emits an access log line for the finished response.

pub mod router;
mod users;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::http;
use crate::http::form;
use crate::logger::{self, AccessLogEntry, LogFormat};
use router::Route;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = version_label(req.version()).to_string();
    let referer = header_value(&req, "referer");
    let user_agent = header_value(&req, "user-agent");

    let response = dispatch(req, &state, &path, query.as_deref()).await;

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path);
        entry.query = query;
        entry.http_version = http_version;
        entry.status = response.status().as_u16();
        entry.body_bytes = response_body_len(&response);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

        let format = LogFormat::from_name(&state.config.logging.access_log_format);
        logger::log_access(&entry, format);
    }

    Ok(response)
}

/// Resolve the route and run its handler
async fn dispatch(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
    path: &str,
    query: Option<&str>,
) -> Response<Full<Bytes>> {
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let Some(route) = router::match_route(req.method(), path) else {
        return http::build_404_response();
    };

    match route {
        Route::Root => users::serve_index(state).await,
        Route::Greeting => users::greeting(),
        Route::ListUsers => users::list_users(state).await,
        Route::SearchUsers => {
            let params = query.map(form::parse_query).unwrap_or_default();
            users::search_users(state, params.get("query").map(String::as_str)).await
        }
        Route::CreateUser => match req.collect().await {
            Ok(collected) => users::create_user(state, &collected.to_bytes()).await,
            Err(e) => {
                logger::log_warning(&format!("Failed to read request body: {e}"));
                http::build_plain_response(StatusCode::BAD_REQUEST, "Failed to parse form data")
            }
        },
        Route::DeleteAllUsers => users::delete_all_users(state).await,
        Route::GetUserById(id) => users::get_user(state, &id).await,
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

/// Response body size for access logging (`Full` bodies know their length)
fn response_body_len(response: &Response<Full<Bytes>>) -> usize {
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(0)
}
