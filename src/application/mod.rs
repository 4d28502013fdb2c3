pub mod registry;

use crate::resource::{CommonOptions, Resource};

/// An installable component and the resources it needs created first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub common: CommonOptions,
    pub dependencies: Vec<Resource>,
}

impl Application {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        service_account: impl Into<String>,
        dependencies: Vec<Resource>,
    ) -> Self {
        Self {
            name: name.into(),
            common: CommonOptions {
                namespace: namespace.into(),
                service_account: service_account.into(),
                ..Default::default()
            },
            dependencies,
        }
    }

    /// Scopes the application to a cluster: account, cluster name, region and partition.
    pub fn set_cluster_identity(&mut self, cluster: &CommonOptions) {
        self.common.account = cluster.account.clone();
        self.common.cluster_name = cluster.cluster_name.clone();
        self.common.region = cluster.region.clone();
        self.common.partition = cluster.partition.clone();
    }
}
