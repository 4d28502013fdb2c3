use crate::app::cli::{CreateClusterArgs, DeleteClusterArgs};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// AWS profile to use for authentication
    #[clap(short, long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region to create or delete resources in
    #[clap(short, long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create resources
    Create {
        #[clap(subcommand)]
        resource: CreateResource,
    },
    /// Delete resources
    Delete {
        #[clap(subcommand)]
        resource: DeleteResource,
    },
}

#[derive(Subcommand, Debug)]
pub enum CreateResource {
    /// Print the eksctl configuration for a new EKS cluster
    Cluster(CreateClusterArgs),
}

#[derive(Subcommand, Debug)]
pub enum DeleteResource {
    /// Delete the CloudFormation stacks eksdemo created for an EKS cluster
    Cluster(DeleteClusterArgs),
}

pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
