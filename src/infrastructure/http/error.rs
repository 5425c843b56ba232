//! HTTP Error Handling
//!
//! 错误以 HTML 片段返回，只包含通用提示，内部细节只进日志

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::render::error_fragment;
use crate::application::ApplicationError;
use crate::domain::story::StoryError;

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        message: &'static str,
        detail: String,
    },
    PayloadTooLarge {
        detail: String,
    },
    Internal {
        message: &'static str,
        detail: String,
    },
}

/// 表单只接受 urlencoded
pub const UNSUPPORTED_FORM_MESSAGE: &str = "Form must be sent as application/x-www-form-urlencoded";

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 面向用户的提示
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest { message, .. } | ApiError::Internal { message, .. } => *message,
            ApiError::PayloadTooLarge { .. } => "Input is too long",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest { message, detail } => {
                tracing::warn!(status = status.as_u16(), message = %message, error = %detail, "Bad request");
            }
            ApiError::PayloadTooLarge { detail } => {
                tracing::warn!(status = status.as_u16(), error = %detail, "Request body too large");
            }
            ApiError::Internal { message, detail } => {
                tracing::error!(status = status.as_u16(), message = %message, error = %detail, "Internal server error");
            }
        }

        (status, Html(error_fragment(self.message()))).into_response()
    }
}

impl ApiError {
    pub fn unsupported_form(content_type: &str) -> Self {
        ApiError::BadRequest {
            message: UNSUPPORTED_FORM_MESSAGE,
            detail: format!("unsupported content type: {}", content_type),
        }
    }
}

/// 请求体读取失败（含超出上限）同样以 HTML 片段返回
impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        let detail = rejection.body_text();
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge { detail }
        } else {
            ApiError::BadRequest {
                message: "Failed to read request body",
                detail,
            }
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        let detail = e.to_string();
        match e {
            ApplicationError::InvalidInput(StoryError::MissingField(_)) => ApiError::BadRequest {
                message: "userInput and genreInput are required",
                detail,
            },
            ApplicationError::InvalidInput(StoryError::InvalidEncoding(_)) => {
                ApiError::BadRequest {
                    message: "Inputs must contain valid characters",
                    detail,
                }
            }
            ApplicationError::ConfigurationError(_) => ApiError::Internal {
                message: "Server configuration error",
                detail,
            },
            ApplicationError::UpstreamGeneratorError(_) => ApiError::Internal {
                message: "Failed to generate story",
                detail,
            },
            ApplicationError::UpstreamSynthesizerError(_) => ApiError::Internal {
                message: "Failed to synthesize audio",
                detail,
            },
            ApplicationError::StorageError(_) => ApiError::Internal {
                message: "Failed to save audio",
                detail,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{TextGenError, TtsError};

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApplicationError, StatusCode)> = vec![
            (
                StoryError::MissingField("userInput").into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoryError::InvalidEncoding("genreInput").into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApplicationError::configuration("missing"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                TextGenError::EmptyChoices.into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (TtsError::Timeout.into(), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApplicationError::StorageError("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_message_hides_internal_detail() {
        let err = ApiError::from(ApplicationError::from(TextGenError::ServiceError {
            status: 401,
            body: "invalid api key sk-123".to_string(),
        }));
        assert_eq!(err.message(), "Failed to generate story");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_payload_too_large_is_fragment() {
        let err = ApiError::PayloadTooLarge {
            detail: "length limit exceeded".to_string(),
        };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.message(), "Input is too long");
    }

    #[test]
    fn test_unsupported_form_is_bad_request() {
        let err = ApiError::unsupported_form("multipart/form-data");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), UNSUPPORTED_FORM_MESSAGE);
    }
}
