use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::WebError;

/// Name of the operator behind the API key used for a request.
///
/// Inserted as a request extension by [`require_auth`]; bare keys carry no name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operator(pub Option<String>);

impl Operator {
    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashMap<String, Option<String>>>,
}

impl ApiKeys {
    /// Parses `operator:key` or bare `key` entries separated by commas.
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|entry| match entry.split_once(':') {
                Some((operator, key)) => {
                    let (operator, key) = (operator.trim(), key.trim());
                    if key.is_empty() {
                        None
                    } else {
                        let operator = (!operator.is_empty()).then(|| operator.to_string());
                        Some((key.to_string(), operator))
                    }
                }
                None => Some((entry.to_string(), None)),
            })
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn operator_for(&self, key: &str) -> Option<Operator> {
        self.keys.get(key).cloned().map(Operator)
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Rejects requests without a known bearer key and records the operator.
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let operator = bearer_token(&req).and_then(|token| api_keys.operator_for(token));

    match operator {
        Some(operator) => {
            req.extensions_mut().insert(operator);
            Ok(next.run(req).await)
        }
        None => {
            tracing::warn!(path = %req.uri().path(), "Invalid API key attempt");
            Err(WebError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Extension, Router,
        body::Body,
        http::{self, StatusCode},
        middleware,
        routing::post,
    };
    use tower::ServiceExt;

    async fn whoami(Extension(operator): Extension<Operator>) -> String {
        operator.name().unwrap_or("-").to_string()
    }

    fn app(keys: &str) -> Router {
        Router::new()
            .route("/", post(whoami))
            .route_layer(middleware::from_fn_with_state(
                ApiKeys::from_comma_separated(keys),
                require_auth,
            ))
    }

    fn request(token: Option<&str>) -> Request {
        let mut builder = http::Request::builder().method("POST").uri("/");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_parses_operator_and_bare_keys() {
        let keys = ApiKeys::from_comma_separated(" anna:secret1 , secret2,, :secret3, bo: ");

        assert_eq!(keys.len(), 3);
        assert_eq!(
            keys.operator_for("secret1"),
            Some(Operator(Some("anna".to_string())))
        );
        assert_eq!(keys.operator_for("secret2"), Some(Operator(None)));
        assert_eq!(keys.operator_for("secret3"), Some(Operator(None)));
        assert_eq!(keys.operator_for("bo"), None);
    }

    #[tokio::test]
    async fn test_rejects_missing_and_unknown_keys() {
        let response = app("anna:secret").oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app("anna:secret")
            .oneshot(request(Some("wrong")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_passes_operator_to_handler() {
        let response = app("anna:secret")
            .oneshot(request(Some("secret")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anna");
    }

    #[tokio::test]
    async fn test_no_configured_keys_locks_writes() {
        let response = app("").oneshot(request(Some(""))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
