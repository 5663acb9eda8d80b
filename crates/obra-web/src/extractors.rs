//! Axum extractors and response helpers for the handlers

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use obra_core::config::AppConfig;
use obra_db::Store;
use obra_media::MediaStore;
use serde::{Deserialize, Serialize};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Hosted media store; photos are kept in the database when `None`
    pub media: Option<Arc<dyn MediaStore>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            media: None,
            config: Arc::new(config),
        }
    }

    pub fn with_media(mut self, media: Arc<dyn MediaStore>) -> Self {
        self.media = Some(media);
        self
    }
}

/// One-shot user message carried in the query string of a redirect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Flash {
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            notice: Some(message.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            notice: None,
            error: Some(message.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notice.is_none() && self.error.is_none()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(flash) = Query::<Flash>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|_| Query(Flash::default()));
        Ok(flash)
    }
}

/// 303 redirect to `path`, with `params` and the flash in the query string
pub fn redirect_with(path: &str, params: &[(&str, String)], flash: Flash) -> Response {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    if let Some(notice) = &flash.notice {
        query.append_pair("notice", notice);
    }
    if let Some(error) = &flash.error {
        query.append_pair("error", error);
    }

    let query = query.finish();
    let location = if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    };
    Redirect::to(&location).into_response()
}

/// HAL+JSON response wrapper
pub struct HalResponse<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for HalResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, "application/hal+json; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap()
    }

    #[test]
    fn test_redirect_encodes_flash() {
        let response = redirect_with(
            "/expenses",
            &[("project_id", "3".into()), ("date", "2024-05-02".into())],
            Flash::error("Amount must be greater than 0"),
        );
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "/expenses?project_id=3&date=2024-05-02&error=Amount+must+be+greater+than+0"
        );
    }

    #[test]
    fn test_redirect_without_query() {
        let response = redirect_with("/projects", &[], Flash::default());
        assert_eq!(location(&response), "/projects");
    }
}
