//! HTTP route handlers.

pub mod orders;
pub mod products;
pub mod system;
pub mod users;

use axum::http::{HeaderMap, Uri, header};
use common::EntityId;
use domain::{OrderService, ProductService, ShopRepository, UserService};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: ShopRepository> {
    pub users: UserService<S>,
    pub products: ProductService<S>,
    pub orders: OrderService<S>,
}

impl<S: ShopRepository> AppState<S> {
    /// Builds one service per entity type over the same store.
    pub fn new(store: S) -> Self {
        Self {
            users: UserService::new(store.clone()),
            products: ProductService::new(store.clone()),
            orders: OrderService::new(store),
        }
    }
}

fn parse_entity_id(id: &str) -> Result<EntityId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format '{id}': {e}")))
}

/// Absolute URL of a newly created resource: the request URL plus `/{id}`.
///
/// The scheme comes from `X-Forwarded-Proto` when a proxy sets it. Without
/// any host information only the path is returned.
fn resource_location(headers: &HeaderMap, uri: &Uri, id: EntityId) -> String {
    let path = format!("{}/{id}", uri.path().trim_end_matches('/'));

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()));

    match host {
        Some(host) => {
            let scheme = headers
                .get("x-forwarded-proto")
                .and_then(|value| value.to_str().ok())
                .or_else(|| uri.scheme_str())
                .unwrap_or("http");
            format!("{scheme}://{host}{path}")
        }
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn location_uses_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:8080"));
        let uri: Uri = "/users".parse().unwrap();

        assert_eq!(
            resource_location(&headers, &uri, EntityId::new(1)),
            "http://localhost:8080/users/1"
        );
    }

    #[test]
    fn location_honors_forwarded_proto_and_trailing_slash() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("shop.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        let uri: Uri = "/users/".parse().unwrap();

        assert_eq!(
            resource_location(&headers, &uri, EntityId::new(7)),
            "https://shop.example.com/users/7"
        );
    }

    #[test]
    fn location_falls_back_to_absolute_request_uri_then_path() {
        let uri: Uri = "http://10.0.0.5:3000/users".parse().unwrap();
        assert_eq!(
            resource_location(&HeaderMap::new(), &uri, EntityId::new(2)),
            "http://10.0.0.5:3000/users/2"
        );

        let uri: Uri = "/users".parse().unwrap();
        assert_eq!(
            resource_location(&HeaderMap::new(), &uri, EntityId::new(2)),
            "/users/2"
        );
    }

    #[test]
    fn parses_numeric_ids() {
        assert_eq!(parse_entity_id("12").unwrap(), EntityId::new(12));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        assert!(matches!(
            parse_entity_id("abc"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
