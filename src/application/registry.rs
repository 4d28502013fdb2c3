//! Applications whose IAM roles for service accounts are created together with the cluster.

use crate::application::Application;
use crate::resource::cloudformation_stack::StackOptions;
use crate::resource::irsa::{IrsaOptions, PolicyType, IRSA_RESOURCE};
use crate::resource::{Resource, ResourceOptions};

const KARPENTER_CONTROLLER_POLICY: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Resource":"*","Action":["ec2:CreateFleet","ec2:CreateLaunchTemplate","ec2:CreateTags","ec2:DeleteLaunchTemplate","ec2:Describe*","ec2:RunInstances","ec2:TerminateInstances","iam:PassRole","pricing:GetProducts","ssm:GetParameter"]}]}"#;

/// How an application's dependencies are declared.
#[derive(Clone, Copy, Debug)]
pub enum DependencySpec {
    Irsa {
        policy_type: PolicyType,
        policies: &'static [&'static str],
    },
    CloudformationStack {
        name: &'static str,
    },
}

impl DependencySpec {
    pub fn to_resource(self) -> Resource {
        match self {
            Self::Irsa {
                policy_type,
                policies,
            } => Resource::new(
                IRSA_RESOURCE,
                ResourceOptions::Irsa(IrsaOptions::new(
                    policy_type,
                    policies.iter().map(|p| p.to_string()).collect(),
                )),
            ),
            Self::CloudformationStack { name } => Resource::new(
                "cloudformation-stack",
                ResourceOptions::CloudformationStack(StackOptions::new(name)),
            ),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ApplicationSpec {
    pub id: &'static str,
    pub namespace: &'static str,
    pub service_account: &'static str,
    pub dependencies: &'static [DependencySpec],
}

impl ApplicationSpec {
    pub fn build(&self) -> Application {
        Application::new(
            self.id,
            self.namespace,
            self.service_account,
            self.dependencies.iter().map(|d| d.to_resource()).collect(),
        )
    }
}

pub const IRSA_CANDIDATES: &[ApplicationSpec] = &[
    ApplicationSpec {
        id: "aws-lb-controller",
        namespace: "awslb",
        service_account: "aws-load-balancer-controller",
        dependencies: &[DependencySpec::Irsa {
            policy_type: PolicyType::WellKnown,
            policies: &["awsLoadBalancerController"],
        }],
    },
    ApplicationSpec {
        id: "ebs-csi",
        namespace: "kube-system",
        service_account: "ebs-csi-controller-sa",
        dependencies: &[DependencySpec::Irsa {
            policy_type: PolicyType::AwsManaged,
            policies: &["service-role/AmazonEBSCSIDriverPolicy"],
        }],
    },
    ApplicationSpec {
        id: "external-dns",
        namespace: "external-dns",
        service_account: "external-dns",
        dependencies: &[DependencySpec::Irsa {
            policy_type: PolicyType::WellKnown,
            policies: &["externalDNS"],
        }],
    },
    ApplicationSpec {
        id: "karpenter",
        namespace: "karpenter",
        service_account: "karpenter",
        dependencies: &[
            DependencySpec::Irsa {
                policy_type: PolicyType::Document,
                policies: &[KARPENTER_CONTROLLER_POLICY],
            },
            DependencySpec::CloudformationStack { name: "karpenter" },
        ],
    },
];

/// Fresh applications for every registered candidate, in registration order.
pub fn irsa_candidates() -> Vec<Application> {
    IRSA_CANDIDATES.iter().map(ApplicationSpec::build).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn candidates_are_in_registration_order() {
        let names: Vec<_> = irsa_candidates().into_iter().map(|app| app.name).collect();
        assert_eq!(
            names,
            ["aws-lb-controller", "ebs-csi", "external-dns", "karpenter"]
        );
    }

    #[test]
    fn every_candidate_declares_exactly_one_irsa() {
        for app in irsa_candidates() {
            let count = app
                .dependencies
                .iter()
                .filter(|res| res.name == IRSA_RESOURCE)
                .count();
            assert_eq!(count, 1, "{}", app.name);
            assert!(!app.common.service_account.is_empty(), "{}", app.name);
        }
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = IRSA_CANDIDATES.iter().map(|spec| spec.id).collect();
        assert_eq!(ids.len(), IRSA_CANDIDATES.len());
    }

    #[test]
    fn karpenter_policy_is_valid_json() {
        let policy: serde_json::Value = serde_json::from_str(KARPENTER_CONTROLLER_POLICY).unwrap();
        assert_eq!(policy["Version"], "2012-10-17");
    }
}
