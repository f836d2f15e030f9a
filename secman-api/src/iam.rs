use serde::{Serialize, Deserialize};

use secman_lib::iam::{Policy, UpdateMask};

/// json body of a `:setIamPolicy` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetIamPolicyBody {
    pub policy: Policy,

    /// omitted when empty so the service applies its default mask
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<String>,
}

impl SetIamPolicyBody {
    pub fn new(policy: Policy, update_mask: &UpdateMask) -> Self {
        SetIamPolicyBody {
            policy,
            update_mask: if update_mask.is_empty() {
                None
            } else {
                Some(update_mask.to_string())
            }
        }
    }
}
