/// Request extractors
///
/// [`Payload`] replaces `axum::Json` for request bodies. It deserializes the
/// same way, but a body that fails to parse is answered with the API's own
/// `400 validation_error` response naming the offending field, instead of
/// axum's plain-text rejection.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, error::ApiResult, extract::Payload};
/// use taskboard_shared::{auth::middleware::Actor, rules::board::BoardInput};
/// use axum::{extract::State, http::StatusCode};
///
/// async fn handler(
///     State(state): State<AppState>,
///     Actor(actor): Actor,
///     Payload(input): Payload<BoardInput>,
/// ) -> ApiResult<StatusCode> {
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use taskboard_shared::rules::task::TaskInput;

    fn json_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn extract(request: Request<Body>) -> Result<TaskInput, ApiError> {
        Payload::<TaskInput>::from_request(request, &())
            .await
            .map(|Payload(input)| input)
    }

    fn fields(err: ApiError) -> Vec<String> {
        match err {
            ApiError::ValidationError(details) => details.into_iter().map(|d| d.field).collect(),
            other => panic!("expected ValidationError, got {}", other),
        }
    }

    #[tokio::test]
    async fn test_valid_body() {
        let input = extract(json_request(r#"{"title": "Plan", "status": "done"}"#))
            .await
            .unwrap();
        assert_eq!(input.title.as_deref(), Some("Plan"));
        assert_eq!(input.status.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_wrong_type_names_the_field() {
        let err = extract(json_request(r#"{"title": "Plan", "status": 3}"#))
            .await
            .unwrap_err();
        assert_eq!(fields(err), vec!["status"]);
    }

    #[tokio::test]
    async fn test_malformed_uuid_names_the_field() {
        let err = extract(json_request(r#"{"assignee_id": "not-a-uuid"}"#))
            .await
            .unwrap_err();
        assert_eq!(fields(err), vec!["assignee_id"]);
    }

    #[tokio::test]
    async fn test_syntax_error_and_missing_content_type() {
        let err = extract(json_request(r#"{"title": "#)).await.unwrap_err();
        assert_eq!(fields(err), vec!["body"]);

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"title": "Plan"}"#))
            .unwrap();
        assert_eq!(fields(extract(request).await.unwrap_err()), vec!["body"]);
    }
}
