use clap::{Args, Command, Subcommand};
use secman_api::client::secrets::IamPolicyService;

use crate::cli::Invocation;
use crate::error;

pub mod set_iam_policy;
pub mod get_iam_policy;

#[derive(Debug, Args)]
pub struct SecretsArgs {
    #[command(subcommand)]
    command: SecretsCmds
}

#[derive(Debug, Subcommand)]
enum SecretsCmds {
    /// set the IAM policy binding for a secret
    ///
    /// sets the IAM policy for the given secret as defined in a JSON or YAML
    /// file.
    ///
    /// see https://cloud.google.com/iam/docs/managing-policies for details of
    /// the policy file format and contents.
    #[command(after_help = set_iam_policy::GA_EXAMPLES)]
    SetIamPolicy(set_iam_policy::SetIamPolicyArgs),

    /// get the IAM policy for a secret
    ///
    /// displays the IAM policy associated with a secret. if formatted as JSON
    /// or YAML the output can be edited and used as a policy file for
    /// set-iam-policy.
    #[command(after_help = get_iam_policy::EXAMPLES)]
    GetIamPolicy(get_iam_policy::GetIamPolicyArgs),
}

pub fn handle<S>(service: &S, inv: &Invocation, args: SecretsArgs) -> error::Result
where
    S: IamPolicyService
{
    match args.command {
        SecretsCmds::SetIamPolicy(given) => set_iam_policy::handle(service, inv, given),
        SecretsCmds::GetIamPolicy(given) => get_iam_policy::handle(service, inv, given),
    }
}

/// swaps in the help text shown under the beta release track
pub fn beta_help(cmd: Command) -> Command {
    cmd.about("manage secrets (beta)")
        .mut_subcommand("set-iam-policy", set_iam_policy::beta_help)
}

#[derive(Debug, Default, Args)]
pub struct LocationArgs {
    /// location of the secret. selects the regional endpoint for the request
    #[arg(long)]
    pub location: Option<String>,
}
