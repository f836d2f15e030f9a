use std::error::Error;
use std::fmt;

use crate::ApiError;

#[derive(Debug)]
pub enum ApiClientError {
    Reqwest(reqwest::Error),
}

impl fmt::Display for ApiClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiClientError::Reqwest(_) => write!(f, "ApiClientError::Reqwest"),
        }
    }
}

impl Error for ApiClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiClientError::Reqwest(v) => Some(v),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("failed to build request url: {0}")]
    Url(#[from] url::ParseError),
}

impl RequestError {
    /// consumes a non success response and decodes the error it carries
    pub(crate) fn from_response(res: reqwest::blocking::Response) -> Self {
        let status = res.status().as_u16();

        match res.bytes() {
            Ok(body) => RequestError::Api(ApiError::from_response(status, &body)),
            Err(err) => RequestError::Reqwest(err),
        }
    }

    pub fn as_api(self) -> Result<ApiError, Self> {
        match self {
            RequestError::Api(v) => Ok(v),
            other => Err(other)
        }
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            RequestError::Api(v) => Some(v),
            _ => None
        }
    }
}
