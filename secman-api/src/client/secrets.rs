use reqwest::Url;
use secman_lib::iam::{Policy, UpdateMask, MAX_SUPPORTED_POLICY_VERSION};
use secman_lib::resource::SecretRef;
use secman_lib::track::ApiVersion;

use crate::client::error::RequestError;
use crate::client::ApiClient;
use crate::iam::SetIamPolicyBody;

/// the IAM operations the cli performs against secrets.
///
/// implemented by [`ApiClient`] for real requests. commands only depend on
/// this trait so they can run against a recording implementation.
pub trait IamPolicyService {
    fn set_iam_policy(&self, request: SetIamPolicy) -> Result<Policy, RequestError>;

    fn get_iam_policy(&self, request: GetIamPolicy) -> Result<Policy, RequestError>;

    fn resource_uri(
        &self,
        api_version: ApiVersion,
        secret: &SecretRef,
        location: Option<&str>
    ) -> Result<Url, RequestError>;
}

impl IamPolicyService for ApiClient {
    fn set_iam_policy(&self, request: SetIamPolicy) -> Result<Policy, RequestError> {
        request.send(self)
    }

    fn get_iam_policy(&self, request: GetIamPolicy) -> Result<Policy, RequestError> {
        request.send(self)
    }

    fn resource_uri(
        &self,
        api_version: ApiVersion,
        secret: &SecretRef,
        location: Option<&str>
    ) -> Result<Url, RequestError> {
        let location = location.or(secret.location());

        Ok(self.resource_url(api_version, secret, location)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetIamPolicy {
    api_version: ApiVersion,
    secret: SecretRef,
    body: SetIamPolicyBody,
    location: Option<String>,
}

impl SetIamPolicy {
    pub fn new(
        api_version: ApiVersion,
        secret: SecretRef,
        policy: Policy,
        update_mask: &UpdateMask,
    ) -> Self {
        SetIamPolicy {
            api_version,
            secret,
            body: SetIamPolicyBody::new(policy, update_mask),
            location: None,
        }
    }

    /// location used to pick the regional endpoint
    pub fn location<L>(&mut self, location: L) -> &mut Self
    where
        L: Into<Option<String>>
    {
        self.location = location.into();
        self
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn secret(&self) -> &SecretRef {
        &self.secret
    }

    pub fn policy(&self) -> &Policy {
        &self.body.policy
    }

    pub fn update_mask(&self) -> Option<&str> {
        self.body.update_mask.as_deref()
    }

    pub fn get_location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn send(self, client: &ApiClient) -> Result<Policy, RequestError> {
        let location = self.location.as_deref().or(self.secret.location());
        let url = client.method_url(self.api_version, &self.secret, location, "setIamPolicy")?;

        tracing::debug!(
            %url,
            update_mask = self.body.update_mask.as_deref().unwrap_or(""),
            bindings = self.body.policy.bindings.len(),
            "sending setIamPolicy"
        );

        let res = client.post(url)
            .json(&self.body)
            .send()?;

        match res.status() {
            reqwest::StatusCode::OK => Ok(res.json()?),
            _ => Err(RequestError::from_response(res))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetIamPolicy {
    api_version: ApiVersion,
    secret: SecretRef,
    requested_policy_version: Option<i32>,
    location: Option<String>,
}

impl GetIamPolicy {
    pub fn new(api_version: ApiVersion, secret: SecretRef) -> Self {
        GetIamPolicy {
            api_version,
            secret,
            requested_policy_version: Some(MAX_SUPPORTED_POLICY_VERSION),
            location: None,
        }
    }

    pub fn location<L>(&mut self, location: L) -> &mut Self
    where
        L: Into<Option<String>>
    {
        self.location = location.into();
        self
    }

    pub fn requested_policy_version<V>(&mut self, version: V) -> &mut Self
    where
        V: Into<Option<i32>>
    {
        self.requested_policy_version = version.into();
        self
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn secret(&self) -> &SecretRef {
        &self.secret
    }

    pub fn get_requested_policy_version(&self) -> Option<i32> {
        self.requested_policy_version
    }

    pub fn get_location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn send(self, client: &ApiClient) -> Result<Policy, RequestError> {
        let location = self.location.as_deref().or(self.secret.location());
        let url = client.method_url(self.api_version, &self.secret, location, "getIamPolicy")?;

        tracing::debug!(%url, "sending getIamPolicy");

        let mut builder = client.get(url);

        if let Some(version) = &self.requested_policy_version {
            builder = builder.query(&[("options.requestedPolicyVersion", version)]);
        }

        let res = builder.send()?;

        match res.status() {
            reqwest::StatusCode::OK => Ok(res.json()?),
            _ => Err(RequestError::from_response(res))
        }
    }
}
