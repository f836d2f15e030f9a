use crate::validation::{check_secret_id, check_location, check_project_id};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("no project specified. use --project, SECMAN_PROJECT or the config file")]
    MissingProject,

    #[error("invalid project id \"{0}\"")]
    InvalidProject(String),

    #[error("invalid location \"{0}\"")]
    InvalidLocation(String),

    #[error("invalid secret id \"{0}\". only letters, digits, '_' and '-' are allowed (max 255)")]
    InvalidSecretId(String),

    #[error("invalid secret name \"{0}\". expected SECRET, projects/PROJECT/secrets/SECRET or projects/PROJECT/locations/LOCATION/secrets/SECRET")]
    InvalidName(String),

    #[error("location \"{flag}\" does not match the location in the secret name \"{name}\"")]
    LocationMismatch {
        name: String,
        flag: String,
    },
}

/// fully resolved reference to a single secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    project: String,
    location: Option<String>,
    secret: String,
}

impl SecretRef {
    /// builds a reference from the components after validating each of them
    pub fn new<P, S>(project: P, location: Option<String>, secret: S) -> Result<Self, ResourceError>
    where
        P: Into<String>,
        S: Into<String>,
    {
        let project = project.into();
        let secret = secret.into();

        if !check_project_id(&project) {
            return Err(ResourceError::InvalidProject(project));
        }

        if let Some(loc) = &location {
            if !check_location(loc) {
                return Err(ResourceError::InvalidLocation(loc.clone()));
            }
        }

        if !check_secret_id(&secret) {
            return Err(ResourceError::InvalidSecretId(secret));
        }

        Ok(SecretRef { project, location, secret })
    }

    /// resolves the user provided name into a reference.
    ///
    /// the name can either be a bare secret id or a fully qualified resource
    /// name. a project embedded in the name takes precedence over the
    /// provided project. a location embedded in the name must agree with the
    /// provided location if both are given.
    pub fn parse(
        name: &str,
        project: Option<&str>,
        location: Option<&str>,
    ) -> Result<Self, ResourceError> {
        if !name.contains('/') {
            let Some(project) = project else {
                return Err(ResourceError::MissingProject);
            };

            return SecretRef::new(project, location.map(str::to_owned), name);
        }

        let segments: Vec<&str> = name.split('/').collect();

        let (name_project, name_location, secret) = match segments.as_slice() {
            ["projects", p, "secrets", s] => (*p, None, *s),
            ["projects", p, "locations", l, "secrets", s] => (*p, Some(*l), *s),
            _ => return Err(ResourceError::InvalidName(name.to_owned())),
        };

        let location = match (name_location, location) {
            (Some(from_name), Some(from_flag)) => {
                if from_name != from_flag {
                    return Err(ResourceError::LocationMismatch {
                        name: from_name.to_owned(),
                        flag: from_flag.to_owned(),
                    });
                }

                Some(from_name)
            },
            (Some(from_name), None) => Some(from_name),
            (None, from_flag) => from_flag,
        };

        SecretRef::new(name_project, location.map(str::to_owned), secret)
    }

    /// the secret id without any of the parent components
    pub fn name(&self) -> &str {
        &self.secret
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn relative_name(&self) -> String {
        if let Some(location) = &self.location {
            format!(
                "projects/{}/locations/{}/secrets/{}",
                self.project,
                location,
                self.secret
            )
        } else {
            format!("projects/{}/secrets/{}", self.project, self.secret)
        }
    }
}
