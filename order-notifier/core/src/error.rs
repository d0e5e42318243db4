use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notifier_axum::text_response;
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A required query parameter is absent or blank.
    #[snafu(display("No order specified, missing query parameter `{name}`"))]
    MissingParameter { name: &'static str },

    #[snafu(display("Invalid query string: {message}"))]
    InvalidQuery { message: String },
}

impl IntoResponse for Error {
    // SAFETY: allow: high cognitive complexity caused by `tracing` macro
    #[allow(clippy::cognitive_complexity)]
    fn into_response(self) -> Response {
        match self {
            Self::MissingParameter { .. } => text_response! {
                reason: self,
                status: StatusCode::PRECONDITION_FAILED,
                message: "No order specified"
            },
            Self::InvalidQuery { .. } => text_response! {
                reason: self,
                status: StatusCode::BAD_REQUEST,
                message: self.to_string()
            },
        }
    }
}
