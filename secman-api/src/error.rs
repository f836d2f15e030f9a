use serde::Deserialize;
use strum::{AsRefStr as StrumAsRefStr, EnumString as StrumEnumString};

/// canonical status of a failed request as reported by the service
#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    StrumAsRefStr, StrumEnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorKind {
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl ApiErrorKind {
    /// best effort mapping for responses that did not carry a status body
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::InvalidArgument,
            401 => ApiErrorKind::Unauthenticated,
            403 => ApiErrorKind::PermissionDenied,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Aborted,
            412 => ApiErrorKind::FailedPrecondition,
            416 => ApiErrorKind::OutOfRange,
            429 => ApiErrorKind::ResourceExhausted,
            499 => ApiErrorKind::Cancelled,
            501 => ApiErrorKind::Unimplemented,
            503 => ApiErrorKind::Unavailable,
            504 => ApiErrorKind::DeadlineExceeded,
            500..=599 => ApiErrorKind::Internal,
            _ => ApiErrorKind::Unknown,
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ApiErrorKind::InvalidArgument |
            ApiErrorKind::FailedPrecondition |
            ApiErrorKind::OutOfRange => 400,
            ApiErrorKind::Unauthenticated => 401,
            ApiErrorKind::PermissionDenied => 403,
            ApiErrorKind::NotFound => 404,
            ApiErrorKind::AlreadyExists |
            ApiErrorKind::Aborted => 409,
            ApiErrorKind::ResourceExhausted => 429,
            ApiErrorKind::Cancelled => 499,
            ApiErrorKind::Unknown |
            ApiErrorKind::Internal |
            ApiErrorKind::DataLoss => 500,
            ApiErrorKind::Unimplemented => 501,
            ApiErrorKind::Unavailable => 503,
            ApiErrorKind::DeadlineExceeded => 504,
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    Reasons(Vec<String>),
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Detail::Reasons(list) => {
                let mut iter = list.iter();

                if let Some(first) = iter.next() {
                    write!(f, "{}", first)?;

                    while let Some(reason) = iter.next() {
                        write!(f, ",{}", reason)?;
                    }
                }
            },
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Status,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Status {
    code: u16,
    message: String,
    status: String,
    details: Vec<StatusDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusDetail {
    reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ApiErrorKind,
    code: u16,
    detail: Option<Detail>,
    msg: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind) -> Self {
        ApiError {
            kind,
            code: kind.http_status(),
            detail: None,
            msg: None,
        }
    }

    /// decodes the error body of a failed response. falls back to the http
    /// status when the body is not a status document.
    pub fn from_response(code: u16, body: &[u8]) -> Self {
        let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) else {
            let text = String::from_utf8_lossy(body);
            let trimmed = text.trim();
            let mut err = ApiError::new(ApiErrorKind::from_http_status(code))
                .with_code(code);

            if !trimmed.is_empty() {
                err = err.with_message(trimmed);
            }

            return err;
        };

        let status = parsed.error;
        let kind = status.status.parse::<ApiErrorKind>()
            .unwrap_or_else(|_| ApiErrorKind::from_http_status(code));
        let reasons: Vec<String> = status.details.into_iter()
            .filter_map(|d| d.reason)
            .collect();

        let mut err = ApiError::new(kind)
            .with_code(if status.code != 0 { status.code } else { code });

        if !status.message.is_empty() {
            err = err.with_message(status.message);
        }

        if !reasons.is_empty() {
            err = err.with_detail(Detail::Reasons(reasons));
        }

        err
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_message<M>(mut self, msg: M) -> Self
    where
        M: Into<String>
    {
        self.msg = Some(msg.into());
        self
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.msg.as_deref()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.code)?;

        if let Some(msg) = &self.msg {
            write!(f, ": {}", msg)?;
        }

        if let Some(detail) = &self.detail {
            write!(f, " [{}]", detail)?;
        }

        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<ApiErrorKind> for ApiError {
    fn from(kind: ApiErrorKind) -> Self {
        ApiError::new(kind)
    }
}
