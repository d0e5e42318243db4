use std::borrow::Cow;

use axum::{
    body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Plain-text response: a status code and a human-readable message.
///
/// Every endpoint answers with one of these, success or failure alike, so
/// callers of the webhook only ever have to read a line of text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlainText {
    status_code: StatusCode,

    message: Cow<'static, str>,
}

impl PlainText {
    #[inline]
    #[must_use]
    pub fn new<M>(status_code: StatusCode, message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self { status_code, message: message.into() }
    }

    #[inline]
    #[must_use]
    pub fn ok<M>(message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self::new(StatusCode::OK, message)
    }

    #[inline]
    #[must_use]
    pub const fn status_code(&self) -> StatusCode { self.status_code }

    #[inline]
    #[must_use]
    pub fn message(&self) -> &str { &self.message }
}

impl<M> From<(StatusCode, M)> for PlainText
where
    M: Into<Cow<'static, str>>,
{
    #[inline]
    fn from((status_code, message): (StatusCode, M)) -> Self { Self::new(status_code, message) }
}

impl IntoResponse for PlainText {
    fn into_response(self) -> Response {
        let Self { status_code, message } = self;

        Response::builder()
            .status(status_code)
            .header(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())
            .body(body::Body::from(message.into_owned()))
            .expect("Build `Axum` response successfully; qed")
    }
}

#[macro_export]
macro_rules! text_response {
    (status: $status:expr,message: $message:expr) => {
        <$crate::response::PlainText as ::axum::response::IntoResponse>::into_response(
            $crate::response::PlainText::new($status, $message),
        )
    };

    (reason: $reason:expr,status: $status:expr,message: $message:expr) => {{
        if $status.is_server_error() {
            tracing::error!(status_code = $status.as_u16(), "Internal Server Error: {}", $reason);
        } else {
            tracing::warn!(status_code = $status.as_u16(), "Response Error: {}", $reason);
        }

        $crate::text_response! { status: $status, message: $message }
    }};
}
