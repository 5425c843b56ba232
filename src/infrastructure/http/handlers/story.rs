//! Story Handlers

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    response::Html,
};
use std::sync::Arc;

use crate::application::CreateStory;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::form::RawForm;
use crate::infrastructure::http::render::story_fragment;
use crate::infrastructure::http::state::AppState;

/// 表单字段名
pub const USER_INPUT_FIELD: &str = "userInput";
pub const GENRE_INPUT_FIELD: &str = "genreInput";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// 按 Content-Type 解析表单
///
/// 未声明类型时没有表单字段；其他类型（如 multipart）直接拒绝
fn read_form(headers: &HeaderMap, body: &[u8]) -> Result<RawForm, ApiError> {
    let Some(content_type) = headers.get(CONTENT_TYPE) else {
        return Ok(RawForm::default());
    };

    let content_type = content_type.to_str().unwrap_or_default();
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();

    if essence.eq_ignore_ascii_case(FORM_URLENCODED) {
        Ok(RawForm::parse(body))
    } else {
        Err(ApiError::unsupported_form(content_type))
    }
}

/// POST /create
pub async fn create_story(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Html<String>, ApiError> {
    let body = body?;
    let form = read_form(&headers, &body)?;
    let cmd = CreateStory {
        user_input: form.get_or_empty(USER_INPUT_FIELD),
        genre_input: form.get_or_empty(GENRE_INPUT_FIELD),
    };

    let result = state.create_story_handler.handle(cmd).await?;

    let html = story_fragment(
        result.narrative.as_str(),
        &result.audio_url,
        state.retention_notice,
    );

    tracing::info!(audio_id = %result.artifact.id, "Audio response sent to client");

    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_urlencoded_with_charset_is_parsed() {
        let headers = headers_with("application/x-www-form-urlencoded; charset=UTF-8");
        let form = read_form(&headers, b"userInput=hi&genreInput=drama").unwrap();
        assert_eq!(form.get(USER_INPUT_FIELD), Some(&b"hi"[..]));
    }

    #[test]
    fn test_missing_content_type_has_no_fields() {
        let form = read_form(&HeaderMap::new(), b"userInput=hi").unwrap();
        assert_eq!(form.get(USER_INPUT_FIELD), None);
    }

    #[test]
    fn test_multipart_is_rejected() {
        let headers = headers_with("multipart/form-data; boundary=xyz");
        let err = read_form(&headers, b"--xyz--").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }
}
