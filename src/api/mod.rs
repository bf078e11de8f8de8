use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{ConnectInfo, Query, State, rejection::QueryRejection},
    http::HeaderMap,
    routing::get,
};

use crate::GreeterError;
use crate::greeting::{DEFAULT_VISITOR_NAME, client_ip};
use crate::models::GreetingResponse;
use crate::web::AppState;

const VISITOR_NAME_PARAM: &str = "visitor_name";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/hello", get(hello))
}

/// First `visitor_name` in the query string; later repeats are ignored
fn visitor_name(params: &[(String, String)]) -> String {
    params
        .iter()
        .find(|(key, _)| key == VISITOR_NAME_PARAM)
        .map(|(_, value)| value.clone())
        .unwrap_or_else(|| DEFAULT_VISITOR_NAME.to_string())
}

async fn hello(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<GreetingResponse, GreeterError> {
    let Query(params) = params.map_err(|rejection| GreeterError::general(rejection.body_text()))?;
    let client_ip = client_ip(&headers, peer);
    let visitor_name = visitor_name(&params);
    tracing::debug!(%client_ip, %visitor_name, "Greeting request");

    let greeting = state
        .greeter
        .handle(&client_ip, &visitor_name)
        .await
        .inspect_err(|e| tracing::error!("Greeting failed: {}", e))?;

    Ok(GreetingResponse::Success(greeting))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_visitor_name_defaults_to_guest() {
        assert_eq!(visitor_name(&[]), "Guest");
        assert_eq!(visitor_name(&pairs(&[("other", "x")])), "Guest");
    }

    #[test]
    fn test_visitor_name_takes_first_value() {
        let params = pairs(&[("visitor_name", "Alice"), ("visitor_name", "Bob")]);
        assert_eq!(visitor_name(&params), "Alice");
    }

    #[test]
    fn test_visitor_name_keeps_empty_value() {
        assert_eq!(visitor_name(&pairs(&[("visitor_name", "")])), "");
    }
}
