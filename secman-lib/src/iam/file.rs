//! decoding of user provided policy files.
//!
//! yaml is a superset of json so every file goes through the yaml parser.
//! the document is first read as a generic value to collect the top level
//! keys for the update mask and then converted into a [`Policy`]. the model
//! itself tolerates unknown fields, a policy file does not.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};

use super::{Policy, UpdateMask};

#[derive(Debug, thiserror::Error)]
pub enum PolicyFileError {
    #[error("policy file \"{}\" was not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read policy file \"{}\"", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("policy file is empty")]
    Empty,

    #[error("policy file must contain a mapping of policy fields")]
    NotAMapping,

    #[error("policy file is not valid YAML or JSON")]
    Syntax(#[source] serde_yaml::Error),

    #[error("policy file is not a properly formatted policy")]
    Schema(#[source] serde_json::Error),

    #[error("the etag of the policy file is not properly formatted")]
    InvalidEtag(#[source] base64::DecodeError),
}

/// reads and decodes the policy file at the given path
pub fn parse_policy_file<P>(path: P) -> Result<(Policy, UpdateMask), PolicyFileError>
where
    P: AsRef<Path>
{
    let path_ref = path.as_ref();
    let contents = match std::fs::read_to_string(path_ref) {
        Ok(c) => c,
        Err(err) => match err.kind() {
            ErrorKind::NotFound => {
                return Err(PolicyFileError::NotFound(path_ref.to_owned()));
            },
            _ => {
                return Err(PolicyFileError::Io(path_ref.to_owned(), err));
            }
        }
    };

    parse_policy_str(&contents)
}

/// decodes a policy document along with the mask of fields it specified
pub fn parse_policy_str(contents: &str) -> Result<(Policy, UpdateMask), PolicyFileError> {
    if contents.trim().is_empty() {
        return Err(PolicyFileError::Empty);
    }

    let document: serde_json::Value = serde_yaml::from_str(contents)
        .map_err(PolicyFileError::Syntax)?;

    let update_mask = match &document {
        serde_json::Value::Object(map) => UpdateMask::from_fields(map.keys().cloned()),
        serde_json::Value::Null => return Err(PolicyFileError::Empty),
        _ => return Err(PolicyFileError::NotAMapping),
    };

    let mut unknown = Vec::new();
    let policy: Policy = serde_ignored::deserialize(document, |path| {
        unknown.push(path.to_string());
    }).map_err(PolicyFileError::Schema)?;

    if let Some(field) = unknown.first() {
        return Err(PolicyFileError::Schema(
            serde::de::Error::custom(format!("unknown field `{field}`"))
        ));
    }

    if let Some(etag) = &policy.etag {
        check_etag(etag)?;
    }

    Ok((policy, update_mask))
}

fn check_etag(etag: &str) -> Result<(), PolicyFileError> {
    match STANDARD.decode(etag) {
        Ok(_) => Ok(()),
        Err(err) => {
            if URL_SAFE.decode(etag).is_ok() {
                Ok(())
            } else {
                Err(PolicyFileError::InvalidEtag(err))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;
    use crate::iam::{Binding, Expr};

    const JSON_POLICY: &str = r#"{
  "bindings": [
    {
      "role": "roles/secretmanager.secretAccessor",
      "members": ["user:alice@example.com", "serviceAccount:app@p.iam.gserviceaccount.com"]
    }
  ],
  "etag": "BwWWja0YfJA="
}"#;

    const YAML_POLICY: &str = "\
bindings:
- members:
  - user:eve@example.com
  role: roles/secretmanager.viewer
  condition:
    title: expirable access
    expression: request.time < timestamp('2020-10-01T00:00:00.000Z')
version: 3
";

    #[test]
    fn json_policy() {
        let (policy, mask) = parse_policy_str(JSON_POLICY).unwrap();

        assert_eq!(mask.as_str(), "bindings,etag");
        assert_eq!(policy.etag.as_deref(), Some("BwWWja0YfJA="));
        assert_eq!(policy.bindings, vec![Binding {
            role: "roles/secretmanager.secretAccessor".into(),
            members: vec![
                "user:alice@example.com".into(),
                "serviceAccount:app@p.iam.gserviceaccount.com".into(),
            ],
            condition: None,
        }]);
    }

    #[test]
    fn yaml_policy() {
        let (policy, mask) = parse_policy_str(YAML_POLICY).unwrap();

        assert_eq!(mask.as_str(), "bindings,version");
        assert_eq!(policy.version, Some(3));
        assert!(!policy.has_etag());
        assert_eq!(policy.bindings[0].condition, Some(Expr {
            expression: "request.time < timestamp('2020-10-01T00:00:00.000Z')".into(),
            title: Some("expirable access".into()),
            description: None,
            location: None,
        }));
    }

    #[test]
    fn empty_document() {
        assert!(matches!(parse_policy_str(""), Err(PolicyFileError::Empty)));
        assert!(matches!(parse_policy_str("  \n"), Err(PolicyFileError::Empty)));
        assert!(matches!(parse_policy_str("~"), Err(PolicyFileError::Empty)));
    }

    #[test]
    fn not_a_mapping() {
        assert!(matches!(parse_policy_str("- a\n- b\n"), Err(PolicyFileError::NotAMapping)));
        assert!(matches!(parse_policy_str("\"bindings\""), Err(PolicyFileError::NotAMapping)));
    }

    #[test]
    fn malformed_syntax() {
        let result = parse_policy_str("{\"bindings\": [");

        assert!(matches!(result, Err(PolicyFileError::Syntax(_))), "{:?}", result);
    }

    #[test]
    fn schema_mismatch() {
        let unknown = parse_policy_str("bindngs: []\n");
        let wrong_type = parse_policy_str("bindings: roles/viewer\n");

        assert!(matches!(unknown, Err(PolicyFileError::Schema(_))), "{:?}", unknown);
        assert!(matches!(wrong_type, Err(PolicyFileError::Schema(_))), "{:?}", wrong_type);
    }

    #[test]
    fn nested_unknown_field() {
        let result = parse_policy_str("bindings:
- role: roles/viewer
  membrs: [\"user:a@example.com\"]
");

        match result {
            Err(PolicyFileError::Schema(err)) => {
                assert!(err.to_string().contains("bindings.0.membrs"), "{}", err);
            },
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn invalid_etag() {
        let result = parse_policy_str("etag: \"not base64!\"\n");

        assert!(matches!(result, Err(PolicyFileError::InvalidEtag(_))), "{:?}", result);
    }

    #[test]
    fn file_on_disk() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        file.write_all(JSON_POLICY.as_bytes()).unwrap();

        let (policy, mask) = parse_policy_file(file.path()).unwrap();

        assert_eq!(mask.as_str(), "bindings,etag");
        assert_eq!(policy.bindings.len(), 1);
    }

    #[test]
    fn file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");

        match parse_policy_file(&path) {
            Err(PolicyFileError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
