//! User endpoint handlers
//!
//! Each handler is a stateless request-to-response mapping over the shared
//! store. The fixed message bodies are emitted as literals so their exact
//! bytes never change under a serializer upgrade.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AppState;
use crate::http;
use crate::http::form;
use crate::logger;
use crate::store::User;

/// GET / - serve the static index page
pub async fn serve_index(state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match state.views.load_index().await {
        Some(html) => http::build_html_response(html, &state.config.http.server_name),
        None => http::build_404_response(),
    }
}

/// GET /hi - fixed greeting payload.
///
/// The Content-Type header is deliberately left unset.
pub fn greeting() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .body(Full::new(Bytes::from_static(br#"{"message": "Hi"}"#)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build greeting response: {e}"));
            Response::new(Full::new(Bytes::from_static(br#"{"message": "Hi"}"#)))
        })
}

/// GET /users/{id} - linear scan comparing the decimal form of each stored id
pub async fn get_user(state: &Arc<AppState>, id: &str) -> Response<Full<Bytes>> {
    match state.users.find_by_id(id).await {
        Some(user) => http::build_json_response(StatusCode::OK, &user),
        None => http::build_json_literal(StatusCode::NOT_FOUND, r#"{"error": "User not found"}"#),
    }
}

/// POST /users/add - append a user built from the form fields.
///
/// Missing fields become empty strings. No id is assigned; it stays at the
/// zero value, so the new record is not reachable via /users/{id} lookups
/// with a real id.
pub async fn create_user(state: &Arc<AppState>, body: &[u8]) -> Response<Full<Bytes>> {
    let fields = match form::parse_form(body) {
        Ok(fields) => fields,
        Err(e) => {
            logger::log_warning(&format!("Rejected form body: {e}"));
            return http::build_plain_response(
                StatusCode::BAD_REQUEST,
                "Failed to parse form data",
            );
        }
    };

    let user = User {
        name: field(&fields, "name"),
        email: field(&fields, "email"),
        ..User::default()
    };
    state.users.append(user).await;

    http::build_json_literal(
        StatusCode::CREATED,
        r#"{"message": "User created successfully"}"#,
    )
}

fn field(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

/// GET /users - render the HTML user list.
///
/// A render failure surfaces as 500 with the error text as the body.
pub async fn list_users(state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let users = state.users.snapshot().await;
    match state.views.render_user_list(&users).await {
        Ok(html) => http::build_html_response(html, &state.config.http.server_name),
        Err(e) => {
            logger::log_error(&format!("Failed to render user list: {e}"));
            http::build_plain_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// DELETE /users/delete - destructive bulk delete
pub async fn delete_all_users(state: &Arc<AppState>) -> Response<Full<Bytes>> {
    if state.users.clear().await == 0 {
        http::build_json_literal(StatusCode::NOT_FOUND, r#"{"error": "No users to delete"}"#)
    } else {
        http::build_json_literal(StatusCode::OK, r#"{"message": "All users deleted"}"#)
    }
}

/// GET /users/search?query=...
///
/// An absent or empty query returns the full store as a JSON array. Filtering
/// for non-empty queries is not implemented and always produces an empty
/// array.
/// TODO: case-insensitive substring match against name and email.
pub async fn search_users(state: &Arc<AppState>, query: Option<&str>) -> Response<Full<Bytes>> {
    let results = match query {
        None | Some("") => state.users.snapshot().await,
        Some(_) => Vec::new(),
    };
    http::build_json_response(StatusCode::OK, &results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, ViewsConfig,
    };
    use http_body_util::BodyExt;
    use std::path::Path;

    fn test_state(views_dir: &str) -> Arc<AppState> {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8081,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                server_name: "users-server/test".to_string(),
                max_body_size: 10_485_760,
            },
            views: ViewsConfig {
                dir: views_dir.to_string(),
                index_file: "index.html".to_string(),
                user_list_template: "UserList.html".to_string(),
            },
        };
        Arc::new(AppState::new(&config))
    }

    fn temp_views_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("users-server-handlers-{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir.display().to_string()
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn greeting_is_fixed_and_has_no_content_type() {
        let resp = greeting();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("Content-Type").is_none());
        assert_eq!(body_string(resp).await, r#"{"message": "Hi"}"#);
    }

    #[tokio::test]
    async fn get_user_on_empty_store_is_404() {
        let state = test_state("views");
        let resp = get_user(&state, "1").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, r#"{"error": "User not found"}"#);
    }

    #[tokio::test]
    async fn get_user_finds_stored_record() {
        let state = test_state("views");
        state
            .users
            .append(User {
                id: 7,
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
            })
            .await;

        let resp = get_user(&state, "7").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_string(resp).await,
            r#"{"id":7,"name":"Jane","email":"jane@example.com"}"#
        );
    }

    #[tokio::test]
    async fn create_appends_one_zero_id_record() {
        let state = test_state("views");
        let resp = create_user(&state, b"name=John+Doe&email=john%40example.com").await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            body_string(resp).await,
            r#"{"message": "User created successfully"}"#
        );

        let users = state.users.snapshot().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 0);
        assert_eq!(users[0].name, "John Doe");
        assert_eq!(users[0].email, "john@example.com");
    }

    #[tokio::test]
    async fn create_defaults_missing_fields_to_empty() {
        let state = test_state("views");
        let resp = create_user(&state, b"name=Solo").await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let users = state.users.snapshot().await;
        assert_eq!(users[0].name, "Solo");
        assert_eq!(users[0].email, "");
    }

    #[tokio::test]
    async fn create_rejects_malformed_form() {
        let state = test_state("views");
        let resp = create_user(&state, b"name=%zz").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(resp).await, "Failed to parse form data");
        assert!(state.users.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn delete_on_empty_store_is_404() {
        let state = test_state("views");
        let resp = delete_all_users(&state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, r#"{"error": "No users to delete"}"#);
    }

    #[tokio::test]
    async fn delete_clears_a_populated_store() {
        let state = test_state("views");
        state.users.append(User::default()).await;
        state.users.append(User::default()).await;

        let resp = delete_all_users(&state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, r#"{"message": "All users deleted"}"#);
        assert!(state.users.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn search_without_query_returns_full_store_in_order() {
        let state = test_state("views");
        for name in ["a", "b"] {
            state
                .users
                .append(User {
                    id: 0,
                    name: name.to_string(),
                    email: format!("{name}@example.com"),
                })
                .await;
        }

        for query in [None, Some("")] {
            let resp = search_users(&state, query).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(
                body_string(resp).await,
                r#"[{"id":0,"name":"a","email":"a@example.com"},{"id":0,"name":"b","email":"b@example.com"}]"#
            );
        }
    }

    #[tokio::test]
    async fn search_with_query_is_a_stub_returning_empty() {
        let state = test_state("views");
        state
            .users
            .append(User {
                id: 0,
                name: "john".to_string(),
                email: "john@example.com".to_string(),
            })
            .await;

        let resp = search_users(&state, Some("john")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "[]");
    }

    #[tokio::test]
    async fn list_users_renders_the_template() {
        let dir = temp_views_dir("list");
        std::fs::write(
            Path::new(&dir).join("UserList.html"),
            "<html><table>{{rows}}</table></html>",
        )
        .unwrap();

        let state = test_state(&dir);
        state
            .users
            .append(User {
                id: 0,
                name: "John".to_string(),
                email: "john@example.com".to_string(),
            })
            .await;

        let resp = list_users(&state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(body.contains("<td>John</td>"));
    }

    #[tokio::test]
    async fn list_users_render_failure_is_500_with_error_text() {
        let dir = temp_views_dir("list-missing");
        let state = test_state(&dir);

        let resp = list_users(&state).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(resp).await.contains("failed to load template"));
    }

    #[tokio::test]
    async fn index_missing_file_is_generic_404() {
        let dir = temp_views_dir("no-index");
        let state = test_state(&dir);

        let resp = serve_index(&state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn index_serves_the_static_page() {
        let dir = temp_views_dir("index");
        std::fs::write(Path::new(&dir).join("index.html"), "<h1>Welcome</h1>").unwrap();

        let state = test_state(&dir);
        let resp = serve_index(&state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "<h1>Welcome</h1>");
    }
}
