use std::time::Duration;

use reqwest::blocking::RequestBuilder;

pub use reqwest::Url;
use secman_lib::resource::SecretRef;
use secman_lib::validation::check_location;
use secman_lib::track::ApiVersion;

pub mod error;
pub mod secrets;

use error::ApiClientError;

pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com/";

/// builds the regional endpoint used for secrets stored in a location. the
/// location becomes part of the host so anything outside of `[a-z0-9-]` is
/// rejected.
pub fn regional_endpoint(location: &str) -> Result<Url, url::ParseError> {
    if !check_location(location) {
        return Err(url::ParseError::InvalidDomainCharacter);
    }

    Url::parse(&format!("https://secretmanager.{location}.rep.googleapis.com/"))
}

pub struct Info {
    /// explicit endpoint, takes priority over the regional endpoints
    pub endpoint: Option<Url>,
    pub access_token: Option<String>,
}

pub struct ApiClient {
    pub(crate) client: reqwest::blocking::Client,
    pub(crate) info: Info
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder {
            endpoint: None,
            access_token: None,
            agent: None,
            timeout: None,
        }
    }

    /// base url that requests for the given location are sent to
    pub fn endpoint_for(&self, location: Option<&str>) -> Result<Url, url::ParseError> {
        if let Some(endpoint) = &self.info.endpoint {
            return Ok(endpoint.clone());
        }

        match location {
            Some(loc) => regional_endpoint(loc),
            None => Url::parse(DEFAULT_ENDPOINT),
        }
    }

    /// full url of the secret resource on the endpoint for the location
    pub fn resource_url(
        &self,
        api_version: ApiVersion,
        secret: &SecretRef,
        location: Option<&str>
    ) -> Result<Url, url::ParseError> {
        self.secret_url(api_version, secret, location, None)
    }

    /// url of a custom method (`resource:method`) on the secret resource
    pub(crate) fn method_url(
        &self,
        api_version: ApiVersion,
        secret: &SecretRef,
        location: Option<&str>,
        method: &str,
    ) -> Result<Url, url::ParseError> {
        self.secret_url(api_version, secret, location, Some(method))
    }

    /// each component is pushed as its own path segment so reserved
    /// characters are percent encoded instead of changing the url structure
    fn secret_url(
        &self,
        api_version: ApiVersion,
        secret: &SecretRef,
        location: Option<&str>,
        method: Option<&str>,
    ) -> Result<Url, url::ParseError> {
        let mut url = self.endpoint_for(location)?;

        {
            let mut segments = url.path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;

            segments.pop_if_empty()
                .push(api_version.as_str())
                .push("projects")
                .push(secret.project());

            if let Some(loc) = secret.location() {
                segments.push("locations").push(loc);
            }

            segments.push("secrets");

            match method {
                Some(method) => segments.push(&format!("{}:{}", secret.name(), method)),
                None => segments.push(secret.name()),
            };
        }

        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.info.access_token {
            builder.bearer_auth(token)
        } else {
            builder
        }
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.get(url))
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.post(url))
    }
}

pub struct ApiClientBuilder {
    endpoint: Option<Url>,
    access_token: Option<String>,
    agent: Option<String>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    /// overrides the endpoint for every request. returns false if the value
    /// is not a usable http(s) url.
    pub fn endpoint<E>(&mut self, endpoint: E) -> bool
    where
        E: AsRef<str>
    {
        let Ok(mut url) = Url::parse(endpoint.as_ref()) else {
            return false;
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        if url.cannot_be_a_base() || url.host_str().is_none() {
            return false;
        }

        // joining relative paths replaces the last segment without this
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        self.endpoint = Some(url);
        true
    }

    pub fn access_token<T>(&mut self, token: T)
    where
        T: Into<String>
    {
        self.access_token = Some(token.into());
    }

    pub fn user_agent<U>(&mut self, user_agent: U)
    where
        U: Into<String>
    {
        self.agent = Some(user_agent.into());
    }

    pub fn timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let user_agent = self.agent.unwrap_or("secman-api-client/0.1.0".into());
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()
            .map_err(|e| ApiClientError::Reqwest(e))?;

        Ok(ApiClient {
            client,
            info: Info {
                endpoint: self.endpoint,
                access_token: self.access_token,
            }
        })
    }
}
