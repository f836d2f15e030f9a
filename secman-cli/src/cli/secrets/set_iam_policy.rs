use clap::{Args, Command};
use secman_api::client::secrets::{IamPolicyService, SetIamPolicy};
use secman_lib::iam::Policy;
use secman_lib::resource::SecretRef;

use crate::cli::Invocation;
use crate::cli::iam::{self, PolicyFileArgs};
use crate::cli::secrets::LocationArgs;
use crate::error::{self, Context};
use crate::formatting;

pub const GA_EXAMPLES: &str = "\
EXAMPLES:
  The following command will read an IAM policy defined in a JSON file
  'policy.json' and set it for the secret 'my-secret':

    $ secman secrets set-iam-policy my-secret policy.json";

const BETA_ABOUT: &str = "set the IAM policy for a secret";

const BETA_LONG_ABOUT: &str = "\
set the IAM policy for a secret

Sets the IAM policy for the given secret.

Returns an empty policy if the resource does not have a policy set.";

const BETA_EXAMPLES: &str = "\
EXAMPLES:
  To print the IAM policy for secret named 'my-secret', run:

    $ secman beta secrets set-iam-policy my-secret policy.json [--location=LOCATION]";

#[derive(Debug, Args)]
pub struct SetIamPolicyArgs {
    /// name of the secret for which to set the IAM policy
    #[arg(value_name = "SECRET")]
    secret: String,

    #[command(flatten)]
    policy: PolicyFileArgs,

    #[command(flatten)]
    location: LocationArgs,
}

pub fn beta_help(cmd: Command) -> Command {
    cmd.about(BETA_ABOUT)
        .long_about(BETA_LONG_ABOUT)
        .after_help(BETA_EXAMPLES)
}

pub fn handle<S>(service: &S, inv: &Invocation, args: SetIamPolicyArgs) -> error::Result
where
    S: IamPolicyService
{
    let policy = run(service, inv, args, &mut std::io::stderr())?;

    let mut stdout = std::io::stdout().lock();

    formatting::write_policy(&mut stdout, &policy, inv.format)
}

/// replaces the policy of the secret with the one in the policy file and
/// returns the policy stored by the service
pub fn run<S, W>(
    service: &S,
    inv: &Invocation,
    args: SetIamPolicyArgs,
    status: &mut W,
) -> error::Result<Policy>
where
    S: IamPolicyService,
    W: std::io::Write,
{
    let api_version = inv.track.api_version();
    let secret = SecretRef::parse(
        &args.secret,
        inv.project.as_deref(),
        args.location.location.as_deref()
    ).context("failed to resolve secret")?;

    let (policy, update_mask) = args.policy.parse()
        .context("failed to load policy file")?;

    let name = secret.name().to_owned();
    let mut request = SetIamPolicy::new(api_version, secret, policy, &update_mask);
    request.location(args.location.location);

    let result = service.set_iam_policy(request)?;

    iam::log_set_iam_policy(status, &name, "secret")
        .context("failed to write status")?;

    Ok(result)
}

#[cfg(test)]
mod test {
    use std::io::Write;
    use std::path::PathBuf;

    use secman_api::ApiErrorKind;
    use secman_lib::iam::Binding;
    use secman_lib::track::{ApiVersion, ReleaseTrack};

    use crate::cli::mock::RecordingService;
    use crate::formatting::OutputFormat;
    use super::*;

    const POLICY: &str = r#"{
        "bindings": [{
            "role": "roles/secretmanager.secretAccessor",
            "members": ["user:alice@example.com"]
        }],
        "etag": "BwWWja0YfJA="
    }"#;

    fn policy_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn inv(track: ReleaseTrack) -> Invocation {
        Invocation {
            track,
            project: Some("my-project".into()),
            format: OutputFormat::Yaml,
        }
    }

    fn args(secret: &str, path: PathBuf, location: Option<&str>) -> SetIamPolicyArgs {
        SetIamPolicyArgs {
            secret: secret.into(),
            policy: PolicyFileArgs { policy_file: path },
            location: LocationArgs { location: location.map(str::to_owned) },
        }
    }

    fn response() -> Policy {
        Policy {
            version: Some(1),
            etag: Some("BwYNewEtag=".into()),
            bindings: vec![Binding {
                role: "roles/secretmanager.secretAccessor".into(),
                members: vec!["user:alice@example.com".into()],
                condition: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn sets_policy_once() {
        let file = policy_file(POLICY);
        let service = RecordingService::responding(response());
        let mut status = Vec::new();

        let result = run(
            &service,
            &inv(ReleaseTrack::Ga),
            args("my-secret", file.path().to_owned(), None),
            &mut status
        ).unwrap();

        assert_eq!(result, response());
        assert_eq!(
            String::from_utf8(status).unwrap(),
            "Updated IAM policy for secret [my-secret].\n"
        );

        let calls = service.set_calls.borrow();

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].api_version(), ApiVersion::V1);
        assert_eq!(calls[0].secret().relative_name(), "projects/my-project/secrets/my-secret");
        assert_eq!(calls[0].update_mask(), Some("bindings,etag"));
        assert_eq!(calls[0].policy().etag.as_deref(), Some("BwWWja0YfJA="));
        assert_eq!(calls[0].policy().bindings[0].members, vec!["user:alice@example.com"]);
        assert_eq!(calls[0].get_location(), None);
    }

    #[test]
    fn bad_policy_files_make_no_call() {
        let cases = [
            "",
            "{not valid",
            "- just\n- a list\n",
            r#"{"bindings": [], "unknownField": 1}"#,
            r#"{"etag": "not base64!"}"#,
        ];

        for contents in cases {
            let file = policy_file(contents);
            let service = RecordingService::responding(response());
            let mut status = Vec::new();

            let result = run(
                &service,
                &inv(ReleaseTrack::Ga),
                args("my-secret", file.path().to_owned(), None),
                &mut status
            );

            assert!(result.is_err(), "contents {:?}", contents);
            assert!(service.set_calls.borrow().is_empty());
            assert!(status.is_empty());
        }
    }

    #[test]
    fn missing_policy_file_makes_no_call() {
        let dir = tempfile::tempdir().unwrap();
        let service = RecordingService::responding(response());

        let err = run(
            &service,
            &inv(ReleaseTrack::Ga),
            args("my-secret", dir.path().join("missing.json"), None),
            &mut Vec::new()
        ).unwrap_err();

        assert!(err.to_string().contains("was not found"));
        assert!(service.set_calls.borrow().is_empty());
    }

    #[test]
    fn tracks_only_differ_in_api_version() {
        let file = policy_file(POLICY);
        let ga = RecordingService::responding(response());
        let beta = RecordingService::responding(response());

        run(&ga, &inv(ReleaseTrack::Ga), args("my-secret", file.path().to_owned(), None), &mut Vec::new())
            .unwrap();
        run(&beta, &inv(ReleaseTrack::Beta), args("my-secret", file.path().to_owned(), None), &mut Vec::new())
            .unwrap();

        let ga_call = ga.set_calls.borrow()[0].clone();
        let beta_call = beta.set_calls.borrow()[0].clone();

        assert_eq!(ga_call.api_version(), ApiVersion::V1);
        assert_eq!(beta_call.api_version(), ApiVersion::V1Beta2);
        assert_eq!(ga_call.secret(), beta_call.secret());
        assert_eq!(ga_call.policy(), beta_call.policy());
        assert_eq!(ga_call.update_mask(), beta_call.update_mask());
        assert_eq!(ga_call.get_location(), beta_call.get_location());
    }

    #[test]
    fn location_is_forwarded() {
        let file = policy_file(POLICY);
        let service = RecordingService::responding(response());

        run(
            &service,
            &inv(ReleaseTrack::Ga),
            args("my-secret", file.path().to_owned(), Some("us-east1")),
            &mut Vec::new()
        ).unwrap();

        let calls = service.set_calls.borrow();

        assert_eq!(calls[0].get_location(), Some("us-east1"));
        assert_eq!(
            calls[0].secret().relative_name(),
            "projects/my-project/locations/us-east1/secrets/my-secret"
        );
    }

    #[test]
    fn qualified_name_overrides_project() {
        let file = policy_file(POLICY);
        let service = RecordingService::responding(response());
        let mut status = Vec::new();

        run(
            &service,
            &inv(ReleaseTrack::Ga),
            args("projects/other/secrets/my-secret", file.path().to_owned(), None),
            &mut status
        ).unwrap();

        assert_eq!(service.set_calls.borrow()[0].secret().project(), "other");
        assert_eq!(
            String::from_utf8(status).unwrap(),
            "Updated IAM policy for secret [my-secret].\n"
        );
    }

    #[test]
    fn service_errors_are_returned() {
        let file = policy_file(POLICY);
        let service = RecordingService {
            fail_with: Some(ApiErrorKind::NotFound),
            ..Default::default()
        };
        let mut status = Vec::new();

        let err = run(
            &service,
            &inv(ReleaseTrack::Ga),
            args("my-secret", file.path().to_owned(), None),
            &mut status
        ).unwrap_err();

        assert!(err.to_string().contains("NOT_FOUND"));
        assert_eq!(service.set_calls.borrow().len(), 1);
        assert!(status.is_empty());
    }

    #[test]
    fn missing_project_makes_no_call() {
        let file = policy_file(POLICY);
        let service = RecordingService::responding(response());
        let invocation = Invocation {
            project: None,
            ..inv(ReleaseTrack::Ga)
        };

        assert!(run(
            &service,
            &invocation,
            args("my-secret", file.path().to_owned(), None),
            &mut Vec::new()
        ).is_err());
        assert!(service.set_calls.borrow().is_empty());
    }
}
