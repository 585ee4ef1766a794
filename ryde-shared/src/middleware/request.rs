use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// `axum::Json`, with rejections kept on the error envelope.
///
/// The stock extractor answers a body it cannot deserialize with a
/// plain-text response; handlers take this wrapper instead so the
/// client always sees `{"success": false, "message": ...}` with a 400,
/// the message naming the offending field.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}

/// Query-string counterpart of [`AppJson`].
pub struct AppQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}

/// Path-segment counterpart of [`AppJson`], for typed params like `:id`.
pub struct AppPath<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for AppPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Deserialize)]
    struct TitledBody {
        title: String,
    }

    #[derive(Deserialize)]
    struct PageQuery {
        page: u64,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn query_parts(uri: &'static str) -> Parts {
        let req = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        req.into_parts().0
    }

    async fn envelope_of(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let req = json_request(r#"{"title": "Lost item"}"#);
        let AppJson(body) = AppJson::<TitledBody>::from_request(req, &()).await.unwrap();
        assert_eq!(body.title, "Lost item");
    }

    #[tokio::test]
    async fn missing_body_field_keeps_the_envelope() {
        let req = json_request("{}");
        let err = AppJson::<TitledBody>::from_request(req, &()).await.err().unwrap();
        let (status, body) = envelope_of(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("title"));
    }

    #[tokio::test]
    async fn valid_query_passes_through() {
        let mut parts = query_parts("/incidents/me?page=3");
        let AppQuery(query) = AppQuery::<PageQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(query.page, 3);
    }

    #[tokio::test]
    async fn unparseable_query_keeps_the_envelope() {
        let mut parts = query_parts("/incidents/me?page=ten");
        let err = AppQuery::<PageQuery>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        let (status, body) = envelope_of(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
