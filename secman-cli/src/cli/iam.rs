use std::path::PathBuf;

use clap::Args;
use secman_lib::iam::{Policy, UpdateMask};
use secman_lib::iam::file::{parse_policy_file, PolicyFileError};

/// shared positional for commands that accept an IAM policy file
#[derive(Debug, Args)]
pub struct PolicyFileArgs {
    /// path to a local JSON or YAML formatted file containing a valid policy
    ///
    /// the output of the get-iam-policy command is a valid file, as is any
    /// JSON or YAML file conforming to the structure of a policy. see
    /// https://cloud.google.com/iam/reference/rest/v1/Policy
    #[arg(value_name = "POLICY_FILE")]
    pub policy_file: PathBuf,
}

impl PolicyFileArgs {
    /// decodes the policy file. nothing is sent anywhere if this fails
    pub fn parse(&self) -> Result<(Policy, UpdateMask), PolicyFileError> {
        let (policy, mask) = parse_policy_file(&self.policy_file)?;

        tracing::debug!(
            path = %self.policy_file.display(),
            update_mask = %mask,
            "decoded policy file"
        );

        if !policy.has_etag() {
            tracing::warn!(
                "policy file {} has no etag. changes made since the policy was read may be overwritten",
                self.policy_file.display()
            );
        }

        Ok((policy, mask))
    }
}

/// writes the status line reported after a policy is replaced
pub fn log_set_iam_policy<W>(output: &mut W, name: &str, kind: &str) -> std::io::Result<()>
where
    W: std::io::Write
{
    writeln!(output, "Updated IAM policy for {kind} [{name}].")
}
