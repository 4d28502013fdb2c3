mod eksctl;

use crate::application::registry::irsa_candidates;
use crate::application::Application;
use crate::resource::cloudformation_stack::StackError;
use crate::resource::irsa::{self, IRSA_RESOURCE};
use crate::resource::nodegroup::{NodegroupError, NodegroupOptions};
use crate::resource::{
    AcceptsCommonOptions, CommonOptions, Context, Identity, IdentityError, Lifecycle, Nameable,
    Resource, ResourceOptions,
};
use crate::template::{TemplateError, TextTemplate};
use async_trait::async_trait;
use ipnetwork::{IpNetwork, IpNetworkError};
use log::{debug, info, warn};
use std::net::IpAddr;
use thiserror::Error;

pub const DEFAULT_KUBERNETES_VERSION: &str = "1.26";
pub const KUBERNETES_VERSIONS: [&str; 5] = ["1.26", "1.25", "1.24", "1.23", "1.22"];
pub const DEFAULT_VPC_CIDR: &str = "192.168.0.0/16";
pub const DEFAULT_DESIRED_CAPACITY: i32 = 2;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("failed parsing --vpc-cidr, {source}")]
    InvalidVpcCidr { source: IpNetworkError },

    #[error("No cluster name is set")]
    ClusterNameNone,

    #[error("The resolved AWS identity has an empty {what}")]
    IncompleteIdentity { what: &'static str },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Nodegroup(#[from] NodegroupError),

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error("Failed to render eksctl configuration: {source}")]
    FailedToRenderConfig { source: TemplateError },
}

/// Validates the value of `--vpc-cidr`. The prefix must be a decimal length, netmask notation is
/// rejected.
pub fn parse_vpc_cidr(value: &str) -> Result<String, ClusterError> {
    let invalid = |source: IpNetworkError| ClusterError::InvalidVpcCidr { source };

    let (addr, prefix) = value.split_once('/').ok_or_else(|| {
        invalid(IpNetworkError::InvalidCidrFormat(format!(
            "invalid CIDR address: {}",
            value
        )))
    })?;

    let addr: IpAddr = addr
        .parse()
        .map_err(|_| invalid(IpNetworkError::InvalidAddr(addr.to_string())))?;

    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(IpNetworkError::InvalidPrefix));
    }
    let prefix: u8 = prefix
        .parse()
        .map_err(|_| invalid(IpNetworkError::InvalidPrefix))?;

    IpNetwork::new(addr, prefix).map_err(invalid)?;
    Ok(value.to_string())
}

/// Options for `create cluster` and `delete cluster`.
#[derive(Clone, Debug)]
pub struct ClusterOptions {
    pub common: CommonOptions,
    pub nodegroup: NodegroupOptions,

    pub fargate: bool,
    pub ipv6: bool,
    pub no_roles: bool,
    pub prefix_assignment: bool,
    pub private: bool,
    pub vpc_cidr: String,

    apps_for_irsa: Vec<Application>,
    pub irsa_template: TextTemplate,
    pub irsa_roles: Vec<Resource>,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        let nodegroup = NodegroupOptions {
            desired_capacity: DEFAULT_DESIRED_CAPACITY,
            ..Default::default()
        };

        Self {
            common: CommonOptions {
                kubernetes_version: DEFAULT_KUBERNETES_VERSION.to_string(),
                ..Default::default()
            },
            nodegroup,
            fargate: false,
            ipv6: false,
            no_roles: false,
            prefix_assignment: false,
            private: false,
            vpc_cidr: DEFAULT_VPC_CIDR.to_string(),
            apps_for_irsa: irsa_candidates(),
            irsa_template: TextTemplate::new(irsa::EKSCTL_TEMPLATE),
            irsa_roles: Vec::new(),
        }
    }
}

impl ClusterOptions {
    /// Replaces the applications that get IAM roles created with the cluster.
    pub fn with_irsa_candidates(mut self, apps: Vec<Application>) -> Self {
        self.apps_for_irsa = apps;
        self
    }

    /// Stores the VPC CIDR only if it parses.
    pub fn set_vpc_cidr(&mut self, value: &str) -> Result<(), ClusterError> {
        self.vpc_cidr = parse_vpc_cidr(value)?;
        Ok(())
    }

    fn require_name(&self) -> Result<(), ClusterError> {
        if self.common.cluster_name.is_empty() {
            return Err(ClusterError::ClusterNameNone);
        }
        Ok(())
    }

    fn check_identity(identity: &Identity) -> Result<(), ClusterError> {
        for (what, value) in [
            ("account", &identity.account),
            ("partition", &identity.partition),
            ("region", &identity.region),
        ] {
            if value.is_empty() {
                return Err(ClusterError::IncompleteIdentity { what });
            }
        }
        Ok(())
    }

    /// Builds one IAM role request per IRSA dependency of each candidate application. Returns the
    /// IRSA dependencies that were skipped for being registered under another name, as
    /// `<application>/<dependency>`.
    fn expand_irsa_roles(&mut self) -> Vec<String> {
        let mut roles = Vec::new();
        let mut misnamed = Vec::new();

        for app in self.apps_for_irsa.iter_mut() {
            if app.dependencies.iter().any(|res| res.name == IRSA_RESOURCE) {
                app.set_cluster_identity(&self.common);
            }

            let Application {
                name: app_name,
                common,
                dependencies,
            } = app;

            for res in dependencies.iter_mut() {
                if res.name != IRSA_RESOURCE {
                    if matches!(res.options, ResourceOptions::Irsa(_)) {
                        warn!(
                            "Application '{}' has an IRSA dependency named '{}', skipping it",
                            app_name, res.name
                        );
                        misnamed.push(format!("{}/{}", app_name, res.name));
                    } else {
                        debug!("Skipping '{}' dependency of '{}'", res.name, app_name);
                    }
                    continue;
                }

                res.options.assign_common(common);
                res.options.set_name(&common.service_account);

                roles.push(res.clone());
            }
        }

        self.irsa_roles = roles;
        misnamed
    }

    /// Renders the eksctl `ClusterConfig` for this cluster.
    pub fn eksctl_config(&self) -> Result<String, ClusterError> {
        eksctl::render(self).map_err(|source| ClusterError::FailedToRenderConfig { source })
    }
}

impl Nameable for ClusterOptions {
    fn set_name(&mut self, name: &str) {
        self.common.cluster_name = name.to_string();
    }
}

#[async_trait]
impl Lifecycle for ClusterOptions {
    type Error = ClusterError;

    async fn pre_create(&mut self, ctx: &Context<'_>) -> Result<(), ClusterError> {
        self.require_name()?;

        let identity = ctx.identity.identity().await?;
        Self::check_identity(&identity)?;
        self.common.account = identity.account;
        self.common.partition = identity.partition;
        self.common.region = identity.region;

        self.nodegroup.kubernetes_version = self.common.kubernetes_version.clone();

        let misnamed = self.expand_irsa_roles();
        if !misnamed.is_empty() {
            debug!("Skipped misnamed IRSA dependencies: {}", misnamed.join(", "));
        }
        info!(
            "Prepared {} IAM roles for service accounts for cluster '{}'",
            self.irsa_roles.len(),
            self.common.cluster_name
        );

        self.nodegroup.pre_create(ctx).await?;
        Ok(())
    }

    async fn pre_delete(&mut self, ctx: &Context<'_>) -> Result<(), ClusterError> {
        self.require_name()?;
        self.common.region = ctx.identity.region()?;

        let stacks = ctx
            .stacks
            .stacks_by_cluster(&self.common.cluster_name, None)
            .await?;

        for stack in stacks.iter().filter(|stack| stack.is_managed()) {
            println!("Deleting Cloudformation stack {:?}", stack.name);
            ctx.stacks.delete_stack(&stack.name).await?;
        }

        Ok(())
    }
}
