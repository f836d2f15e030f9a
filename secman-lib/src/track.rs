/// maturity tier that a command is exposed under. the tier decides which
/// api schema version requests are sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseTrack {
    #[default]
    Ga,
    Beta,
}

impl ReleaseTrack {
    pub fn api_version(&self) -> ApiVersion {
        match self {
            ReleaseTrack::Ga => ApiVersion::V1,
            ReleaseTrack::Beta => ApiVersion::V1Beta2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseTrack::Ga => "GA",
            ReleaseTrack::Beta => "BETA",
        }
    }
}

impl std::fmt::Display for ReleaseTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V1Beta2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V1Beta2 => "v1beta2",
        }
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
