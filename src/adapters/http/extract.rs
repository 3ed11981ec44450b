//! Request extractors.

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use super::ErrorResponse;

/// JSON body extractor whose rejections use the [`ErrorResponse`] shape.
///
/// Status codes follow `axum::Json`: 415 without a JSON content type, 400
/// for unparseable input and 422 when the body does not fit the type.
///
/// ```ignore
/// async fn handler(ApiJson(body): ApiJson<SendValuationRequest>) -> impl IntoResponse {
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "rejected request body");
                Err((
                    rejection.status(),
                    Json(ErrorResponse::new("INVALID_REQUEST_BODY", rejection.body_text())),
                ))
            }
        }
    }
}
