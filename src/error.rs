use actix_web::http::StatusCode;
use actix_web::ResponseError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // Parsing errors
    #[error("{0}")]
    ParsingError(String),
    // Webhook signature errors
    #[error("Invalid webhook signature: {0}")]
    InvalidSignature(String),
    // Slack client errors
    #[error("Failed to send notification: {0}")]
    SendNotificationError(#[from] reqwest::Error),
    #[error("Slack API rejected the message: {0}")]
    SlackApiError(String),
}

pub type RestResult<T> = std::result::Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Unauthorized Access: {0}")]
    Unauthorized(String),

    #[error("Internal Server Error: {0}")]
    InternalError(String),
}

impl From<Error> for RestError {
    fn from(e: Error) -> Self {
        match e {
            Error::ParsingError(msg) => Self::ParseError(msg),
            Error::InvalidSignature(_) => Self::Unauthorized("Failed to verify signature".into()),
            Error::SendNotificationError(_) | Error::SlackApiError(_) => {
                Self::InternalError("Failed to send notification".into())
            }
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
