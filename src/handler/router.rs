//! Route table module
//!
//! Exact match on method and path, with one parameterized template
//! (`GET /users/{id}`). Literal routes are tried first, so `/users/search`,
//! `/users/add` and `/users/delete` are never treated as id lookups.

use hyper::Method;

/// Dispatch target for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Greeting,
    ListUsers,
    SearchUsers,
    CreateUser,
    DeleteAllUsers,
    GetUserById(String),
}

/// Resolve a request to a route. `None` gets the generic 404.
pub fn match_route(method: &Method, path: &str) -> Option<Route> {
    match (method, path) {
        (&Method::GET, "/") => Some(Route::Root),
        (&Method::GET, "/hi") => Some(Route::Greeting),
        (&Method::GET, "/users") => Some(Route::ListUsers),
        (&Method::GET, "/users/search") => Some(Route::SearchUsers),
        (&Method::POST, "/users/add") => Some(Route::CreateUser),
        (&Method::DELETE, "/users/delete") => Some(Route::DeleteAllUsers),
        (&Method::GET, _) => match_user_id(path).map(Route::GetUserById),
        _ => None,
    }
}

/// Extract the id segment from a `/users/{id}` path
fn match_user_id(path: &str) -> Option<String> {
    let id = path.strip_prefix("/users/")?;
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(id.to_string())
}
