use crate::resource::{Context, Lifecycle};
use async_trait::async_trait;
use clap::ValueEnum;
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_NODEGROUP_NAME: &str = "main";
pub const DEFAULT_INSTANCE_TYPE: &str = "t3.large";
pub const DEFAULT_DESIRED_CAPACITY: i32 = 1;
pub const DEFAULT_MIN_SIZE: i32 = 0;
pub const DEFAULT_MAX_SIZE: i32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ValueEnum)]
pub enum OperatingSystem {
    #[default]
    #[value(name = "AmazonLinux2")]
    AmazonLinux2,
    #[value(name = "Bottlerocket")]
    Bottlerocket,
    #[value(name = "Ubuntu2004")]
    Ubuntu2004,
}

#[derive(Error, Debug)]
pub enum NodegroupError {
    #[error("Nodegroup '{nodegroup_name}' has no Kubernetes version")]
    KubernetesVersionNone { nodegroup_name: String },

    #[error("Nodegroup '{nodegroup_name}' has --min {min_size} greater than --nodes {desired_capacity}")]
    MinAboveDesired {
        nodegroup_name: String,
        min_size: i32,
        desired_capacity: i32,
    },

    #[error("Nodegroup '{nodegroup_name}' has a negative size")]
    NegativeSize { nodegroup_name: String },
}

/// Managed node group settings, reusable on their own or embedded in a cluster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodegroupOptions {
    pub nodegroup_name: String,
    pub kubernetes_version: String,
    pub instance_type: String,
    pub desired_capacity: i32,
    pub min_size: i32,
    pub max_size: i32,
    #[serde(rename = "ami_family")]
    pub operating_system: OperatingSystem,
    pub spot: bool,
}

impl Default for NodegroupOptions {
    fn default() -> Self {
        Self {
            nodegroup_name: DEFAULT_NODEGROUP_NAME.to_string(),
            kubernetes_version: String::new(),
            instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
            desired_capacity: DEFAULT_DESIRED_CAPACITY,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            operating_system: OperatingSystem::default(),
            spot: false,
        }
    }
}

impl NodegroupOptions {
    fn validate_capacity(&mut self) -> Result<(), NodegroupError> {
        if self.desired_capacity < 0 || self.min_size < 0 || self.max_size < 0 {
            return Err(NodegroupError::NegativeSize {
                nodegroup_name: self.nodegroup_name.clone(),
            });
        }

        if self.min_size > self.desired_capacity {
            return Err(NodegroupError::MinAboveDesired {
                nodegroup_name: self.nodegroup_name.clone(),
                min_size: self.min_size,
                desired_capacity: self.desired_capacity,
            });
        }

        if self.desired_capacity > self.max_size {
            info!(
                "Raising max size of nodegroup '{}' to {} to fit the desired capacity",
                self.nodegroup_name, self.desired_capacity
            );
            self.max_size = self.desired_capacity;
        }

        Ok(())
    }
}

#[async_trait]
impl Lifecycle for NodegroupOptions {
    type Error = NodegroupError;

    async fn pre_create(&mut self, _ctx: &Context<'_>) -> Result<(), NodegroupError> {
        debug!("Nodegroup pre-create for '{}'", self.nodegroup_name);

        if self.kubernetes_version.is_empty() {
            return Err(NodegroupError::KubernetesVersionNone {
                nodegroup_name: self.nodegroup_name.clone(),
            });
        }

        self.validate_capacity()
    }
}
