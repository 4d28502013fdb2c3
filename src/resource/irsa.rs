use crate::resource::{AcceptsCommonOptions, CommonOptions};
use serde::Serialize;

/// Dependency name applications use to request a pre-created IAM role for their service account.
pub const IRSA_RESOURCE: &str = "irsa";

/// Renders one entry of eksctl's `iam.serviceAccounts` list.
pub const EKSCTL_TEMPLATE: &str = r#"  - metadata:
      name: {{ name }}
      namespace: {{ namespace }}
    roleName: eksdemo.{{ cluster_name }}.{{ namespace }}.{{ service_account }}
    roleOnly: true
{%- if policy_type == "well_known" %}
    wellKnownPolicies:
{%- for policy in policies %}
      {{ policy }}: true
{%- endfor %}
{%- elif policy_type == "aws_managed" %}
    attachPolicyARNs:
{%- for policy in policies %}
    - arn:{{ partition }}:iam::aws:policy/{{ policy }}
{%- endfor %}
{%- else %}
    attachPolicy: {{ policies | first }}
{%- endif %}"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    /// An eksctl well-known policy name, e.g. `ebsCSIController`.
    WellKnown,
    /// The trailing path of an AWS managed policy ARN.
    AwsManaged,
    /// A single inline policy document in JSON.
    Document,
}

/// IAM role for a Kubernetes service account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IrsaOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub name: String,
    pub policy_type: PolicyType,
    pub policies: Vec<String>,
}

impl IrsaOptions {
    pub fn new(policy_type: PolicyType, policies: Vec<String>) -> Self {
        Self {
            common: CommonOptions::default(),
            name: String::new(),
            policy_type,
            policies,
        }
    }
}

impl AcceptsCommonOptions for IrsaOptions {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}
