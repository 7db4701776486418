use crate::models::ErrorResponse;
use crate::services::usage_counter::DAILY_QUOTA;
use crate::utils::format_with_separators;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::io::Cursor;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Refused locally before any upstream call was made.
    #[error("daily quota nearly used up: {today_calls} units spent today")]
    QuotaExhausted { today_calls: u64 },
    /// Upstream rejected the call for quota reasons.
    #[error("upstream quota exceeded: {0}")]
    UpstreamQuotaExceeded(String),
    #[error("upstream request failed: {message}")]
    Upstream { status: Option<u16>, message: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn category(&self) -> &'static str {
        match self {
            AppError::QuotaExhausted { .. } | AppError::UpstreamQuotaExceeded(_) => {
                "quota_exhausted"
            }
            AppError::Upstream { .. } => "upstream_error",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            AppError::QuotaExhausted { .. } => Status::TooManyRequests,
            AppError::UpstreamQuotaExceeded(_) => Status::Forbidden,
            AppError::Upstream {
                status: Some(code), ..
            } if (400..600).contains(code) => {
                Status::from_code(*code).unwrap_or(Status::BadGateway)
            }
            AppError::Upstream { .. } => Status::BadGateway,
            AppError::NotFound(_) => Status::NotFound,
            AppError::BadRequest(_) => Status::BadRequest,
            AppError::Internal(_) => Status::InternalServerError,
        }
    }

    pub fn is_quota(&self) -> bool {
        matches!(
            self,
            AppError::QuotaExhausted { .. } | AppError::UpstreamQuotaExceeded(_)
        )
    }

    /// Message shown to the user by the client.
    pub fn user_message(&self) -> String {
        match self {
            AppError::QuotaExhausted { today_calls } => format!(
                "The daily YouTube API quota is almost used up ({} of {} units spent today). \
                 Try again after the daily reset or open a previous search from history.",
                format_with_separators(*today_calls),
                format_with_separators(DAILY_QUOTA)
            ),
            AppError::UpstreamQuotaExceeded(_) => format!(
                "The daily YouTube API quota ({} units) is used up. \
                 Try again after the daily reset or open a previous search from history.",
                format_with_separators(DAILY_QUOTA)
            ),
            AppError::Upstream { message, .. } => message.clone(),
            AppError::NotFound(message) | AppError::BadRequest(message) => message.clone(),
            AppError::Internal(e) => e.to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.category().to_string(),
            message: self.user_message(),
            quota_exceeded: self.is_quota(),
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        match &self {
            AppError::Internal(e) => log::error!("Request failed: {e:?}"),
            other => log::warn!("Request rejected ({}): {other}", other.category()),
        }
        let json =
            serde_json::to_string(&self.to_response()).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status())
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
