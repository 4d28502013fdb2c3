pub mod cloudformation_stack;
pub mod cluster;
pub mod irsa;
pub mod nodegroup;

use crate::resource::cloudformation_stack::{StackClient, StackOptions};
use crate::resource::irsa::IrsaOptions;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Identity and placement fields shared by every resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CommonOptions {
    pub account: String,
    pub cluster_name: String,
    pub kubernetes_version: String,
    pub namespace: String,
    pub partition: String,
    pub region: String,
    pub service_account: String,
}

/// A resource descriptor that can receive the common identity fields of another resource.
pub trait AcceptsCommonOptions {
    fn common_mut(&mut self) -> &mut CommonOptions;

    fn set_name(&mut self, name: &str);

    /// Copies account, cluster name, namespace, partition, region and service account from
    /// `source`.
    fn assign_common(&mut self, source: &CommonOptions) {
        let common = self.common_mut();
        common.account = source.account.clone();
        common.cluster_name = source.cluster_name.clone();
        common.namespace = source.namespace.clone();
        common.partition = source.partition.clone();
        common.region = source.region.clone();
        common.service_account = source.service_account.clone();
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceOptions {
    Irsa(IrsaOptions),
    CloudformationStack(StackOptions),
}

impl AcceptsCommonOptions for ResourceOptions {
    fn common_mut(&mut self) -> &mut CommonOptions {
        match self {
            Self::Irsa(options) => options.common_mut(),
            Self::CloudformationStack(options) => options.common_mut(),
        }
    }

    fn set_name(&mut self, name: &str) {
        match self {
            Self::Irsa(options) => options.set_name(name),
            Self::CloudformationStack(options) => options.set_name(name),
        }
    }
}

/// A dependency declared by an application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Resource type identifier, e.g. `irsa`.
    pub name: String,
    pub options: ResourceOptions,
}

impl Resource {
    pub fn new(name: impl Into<String>, options: ResourceOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// Anything whose identity is established by a cluster name.
pub trait Nameable {
    fn set_name(&mut self, name: &str);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub account: String,
    pub partition: String,
    pub region: String,
}

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("No AWS region is configured. Set it with --region or the AWS_REGION environment variable.")]
    RegionNone,

    #[error("Unable to get the caller identity from STS: {source}")]
    CallerIdentity {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("The caller identity is missing the '{what}' field")]
    MissingField { what: &'static str },
}

/// Resolves the account, partition and region of the current execution context.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn identity(&self) -> Result<Identity, IdentityError>;

    fn region(&self) -> Result<String, IdentityError>;
}

/// Collaborators handed to the lifecycle hooks.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub identity: &'a dyn IdentityResolver,
    pub stacks: &'a dyn StackClient,
}

/// Hooks the execution engine runs around the actual create and delete calls.
#[async_trait]
pub trait Lifecycle: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn pre_create(&mut self, _ctx: &Context<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn pre_delete(&mut self, _ctx: &Context<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resource::irsa::PolicyType;

    #[test]
    fn assign_common_copies_identity_fields() {
        let source = CommonOptions {
            account: "111122223333".to_string(),
            cluster_name: "blue".to_string(),
            kubernetes_version: "1.26".to_string(),
            namespace: "kube-system".to_string(),
            partition: "aws".to_string(),
            region: "us-west-2".to_string(),
            service_account: "ebs-csi-controller-sa".to_string(),
        };
        let mut options = ResourceOptions::Irsa(IrsaOptions::new(
            PolicyType::WellKnown,
            vec!["ebsCSIController".to_string()],
        ));

        options.assign_common(&source);

        let ResourceOptions::Irsa(irsa) = options else {
            panic!("variant changed");
        };
        assert_eq!(irsa.common.account, "111122223333");
        assert_eq!(irsa.common.cluster_name, "blue");
        assert_eq!(irsa.common.namespace, "kube-system");
        assert_eq!(irsa.common.partition, "aws");
        assert_eq!(irsa.common.region, "us-west-2");
        assert_eq!(irsa.common.service_account, "ebs-csi-controller-sa");
        // Not an identity field.
        assert_eq!(irsa.common.kubernetes_version, "");
    }

    #[test]
    fn resource_serializes_with_kind_tag() {
        let resource = Resource::new(
            "irsa",
            ResourceOptions::Irsa(IrsaOptions::new(
                PolicyType::AwsManaged,
                vec!["AmazonS3ReadOnlyAccess".to_string()],
            )),
        );

        let value = serde_json::to_value(&resource).unwrap();

        assert_eq!(value["name"], "irsa");
        assert_eq!(value["options"]["kind"], "irsa");
        assert_eq!(value["options"]["policy_type"], "aws_managed");
    }
}
