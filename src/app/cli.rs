use crate::resource::cluster::{
    parse_vpc_cidr, ClusterOptions, DEFAULT_KUBERNETES_VERSION, DEFAULT_VPC_CIDR,
    KUBERNETES_VERSIONS,
};
use crate::resource::nodegroup::{NodegroupOptions, OperatingSystem};
use crate::resource::Nameable;
use clap::Args;

/// Flags shared by every command that creates a managed node group.
///
/// Values left unset keep whatever default the embedding options chose.
#[derive(Args, Debug, Default, Clone)]
pub struct NodegroupArgs {
    /// Instance type
    #[clap(short, long = "instance")]
    pub instance_type: Option<String>,

    /// Desired number of nodes
    #[clap(short = 'N', long = "nodes")]
    pub desired_capacity: Option<i32>,

    /// Min nodes
    #[clap(long = "min")]
    pub min_size: Option<i32>,

    /// Max nodes
    #[clap(long = "max")]
    pub max_size: Option<i32>,

    /// Operating system
    #[clap(long = "os", value_enum)]
    pub operating_system: Option<OperatingSystem>,

    /// Use Spot instances
    #[clap(long)]
    pub spot: bool,
}

impl NodegroupArgs {
    pub fn apply(self, options: &mut NodegroupOptions) {
        if let Some(instance_type) = self.instance_type {
            options.instance_type = instance_type;
        }
        if let Some(desired_capacity) = self.desired_capacity {
            options.desired_capacity = desired_capacity;
        }
        if let Some(min_size) = self.min_size {
            options.min_size = min_size;
        }
        if let Some(max_size) = self.max_size {
            options.max_size = max_size;
        }
        if let Some(operating_system) = self.operating_system {
            options.operating_system = operating_system;
        }
        options.spot |= self.spot;
    }
}

/// `create cluster`: the node group flags followed by the cluster flags.
#[derive(Args, Debug, Clone)]
pub struct CreateClusterArgs {
    /// Name of the EKS cluster
    pub name: String,

    #[clap(flatten)]
    pub nodegroup: NodegroupArgs,

    /// Kubernetes version
    #[clap(short = 'v', long = "version", default_value = DEFAULT_KUBERNETES_VERSION, value_parser = KUBERNETES_VERSIONS)]
    pub kubernetes_version: String,

    /// create a Fargate profile
    #[clap(long)]
    pub fargate: bool,

    /// use IPv6 networking
    #[clap(long)]
    pub ipv6: bool,

    /// don't create IAM roles
    #[clap(long)]
    pub no_roles: bool,

    /// configured VPC CNI for prefix assignment
    #[clap(long)]
    pub prefix_assignment: bool,

    /// private cluster (includes ECR, S3, and other VPC endpoints)
    #[clap(long)]
    pub private: bool,

    /// CIDR to use for EKS Cluster VPC
    #[clap(long, default_value = DEFAULT_VPC_CIDR, value_parser = parse_vpc_cidr)]
    pub vpc_cidr: String,
}

impl From<CreateClusterArgs> for ClusterOptions {
    fn from(args: CreateClusterArgs) -> Self {
        let mut options = ClusterOptions::default();
        options.set_name(&args.name);
        args.nodegroup.apply(&mut options.nodegroup);

        options.common.kubernetes_version = args.kubernetes_version;
        options.fargate = args.fargate;
        options.ipv6 = args.ipv6;
        options.no_roles = args.no_roles;
        options.prefix_assignment = args.prefix_assignment;
        options.private = args.private;
        options.vpc_cidr = args.vpc_cidr;
        options
    }
}

/// `delete cluster`
#[derive(Args, Debug, Clone)]
pub struct DeleteClusterArgs {
    /// Name of the EKS cluster
    pub name: String,
}

impl From<DeleteClusterArgs> for ClusterOptions {
    fn from(args: DeleteClusterArgs) -> Self {
        let mut options = ClusterOptions::default();
        options.set_name(&args.name);
        options
    }
}
