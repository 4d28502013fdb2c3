use crate::resource::{AcceptsCommonOptions, CommonOptions};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Every stack this tool creates starts with this prefix. Stacks without it are never deleted.
pub const RESERVED_PREFIX: &str = "eksdemo-";

/// Tags that associate a stack with a cluster.
pub const CLUSTER_TAG_KEYS: [&str; 2] = ["alpha.eksctl.io/cluster-name", "eksdemo.io/cluster"];

/// A CloudFormation stack that an application needs created before it is installed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StackOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    /// Suffix appended to `eksdemo-<cluster>-` to form the stack name.
    pub name: String,
}

impl StackOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            common: CommonOptions::default(),
            name: name.into(),
        }
    }
}

impl AcceptsCommonOptions for StackOptions {
    fn common_mut(&mut self) -> &mut CommonOptions {
        &mut self.common
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// A stack as reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    pub name: String,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Whether this tool created the stack and may therefore delete it.
    pub fn is_managed(&self) -> bool {
        self.name.starts_with(RESERVED_PREFIX)
    }
}

#[derive(Error, Debug)]
pub enum StackError {
    #[error("Unable to describe CloudFormation stacks for cluster '{cluster_name}': {source}")]
    Describe {
        cluster_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unable to delete CloudFormation stack '{stack_name}': {source}")]
    Delete {
        stack_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[async_trait]
pub trait StackClient: Send + Sync {
    /// Stacks tagged as belonging to `cluster_name`, optionally narrowed to a single stack name.
    async fn stacks_by_cluster(
        &self,
        cluster_name: &str,
        stack_name: Option<&str>,
    ) -> Result<Vec<Stack>, StackError>;

    async fn delete_stack(&self, stack_name: &str) -> Result<(), StackError>;
}
