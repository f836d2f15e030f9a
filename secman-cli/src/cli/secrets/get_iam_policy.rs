use std::io::Write;

use clap::Args;
use secman_api::client::secrets::{GetIamPolicy, IamPolicyService};
use secman_lib::iam::Policy;
use secman_lib::resource::SecretRef;

use crate::cli::Invocation;
use crate::cli::list::ListArgs;
use crate::cli::secrets::LocationArgs;
use crate::error::{self, Context};
use crate::formatting;

pub const EXAMPLES: &str = "\
EXAMPLES:
  To print the IAM policy for secret named 'my-secret', run:

    $ secman secrets get-iam-policy my-secret

  To save it as a policy file that can be edited and passed to set-iam-policy:

    $ secman secrets get-iam-policy my-secret --format json > policy.json";

#[derive(Debug, Args)]
pub struct GetIamPolicyArgs {
    /// name of the secret from which to get the IAM policy
    #[arg(value_name = "SECRET")]
    secret: String,

    #[command(flatten)]
    location: LocationArgs,

    #[command(flatten)]
    list: ListArgs,
}

pub enum Output {
    Uri(String),
    Policy(Policy),
}

pub fn handle<S>(service: &S, inv: &Invocation, args: GetIamPolicyArgs) -> error::Result
where
    S: IamPolicyService
{
    let mut stdout = std::io::stdout().lock();

    match run(service, inv, args)? {
        Output::Uri(uri) => {
            writeln!(stdout, "{uri}")?;

            Ok(())
        }
        Output::Policy(policy) => formatting::write_policy(&mut stdout, &policy, inv.format),
    }
}

/// retrieves the current policy of the secret with the list flags applied to
/// its bindings
pub fn run<S>(service: &S, inv: &Invocation, args: GetIamPolicyArgs) -> error::Result<Output>
where
    S: IamPolicyService
{
    let api_version = inv.track.api_version();
    let secret = SecretRef::parse(
        &args.secret,
        inv.project.as_deref(),
        args.location.location.as_deref()
    ).context("failed to resolve secret")?;

    if args.list.uri {
        let uri = service.resource_uri(api_version, &secret, args.location.location.as_deref())?;

        return Ok(Output::Uri(uri.to_string()));
    }

    let mut request = GetIamPolicy::new(api_version, secret);
    request.location(args.location.location);

    let mut policy = service.get_iam_policy(request)?;
    let before = policy.bindings.len();

    policy.bindings = args.list.apply(policy.bindings);

    // a partial policy written back with the etag would drop the missing
    // bindings without a conflict
    if policy.bindings.len() != before && policy.etag.take().is_some() {
        tracing::warn!(
            "{} of {} bindings shown. the etag is removed so the output cannot be set as the full policy",
            policy.bindings.len(),
            before
        );
    }

    Ok(Output::Policy(policy))
}
