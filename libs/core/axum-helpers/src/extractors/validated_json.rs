//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Body parse failures and `Validate` failures are both rendered through
/// [`AppError`], so clients always receive the standard error envelope.
///
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct RelatedRequest {
///     #[validate(length(min = 1))]
///     domains: Vec<String>,
/// }
///
/// async fn related(ValidatedJson(payload): ValidatedJson<RelatedRequest>) -> String {
///     format!("{} domains", payload.domains.len())
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Lookup {
        #[validate(range(min = 1, max = 100))]
        top_n: usize,
    }

    async fn lookup(ValidatedJson(input): ValidatedJson<Lookup>) -> String {
        input.top_n.to_string()
    }

    async fn status_for(body: &'static str) -> StatusCode {
        let app = Router::new().route("/", post(lookup));
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        assert_eq!(status_for(r#"{"top_n": 5}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rule_violation_is_bad_request() {
        assert_eq!(status_for(r#"{"top_n": 0}"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_rejected() {
        assert!(status_for(r#"{"top_n": "five"}"#).await.is_client_error());
    }
}
