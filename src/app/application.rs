use super::aws::{load_sdk_config, AwsIdentity, CloudformationStacks};
use crate::cli::args::{parse_args, Commands, CreateResource, DeleteResource};
use crate::resource::cluster::ClusterOptions;
use crate::resource::{Context, Lifecycle};
use anyhow::Result;
use log::info;
use tokio::io::AsyncWriteExt;

pub async fn run() -> Result<()> {
    let args = parse_args();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let shared_config = load_sdk_config(args.profile.as_deref(), args.region.as_deref()).await;
    let identity = AwsIdentity::new(&shared_config);
    let stacks = CloudformationStacks::new(&shared_config);
    let ctx = Context {
        identity: &identity,
        stacks: &stacks,
    };

    match args.command {
        Commands::Create {
            resource: CreateResource::Cluster(cluster_args),
        } => {
            let mut options = ClusterOptions::from(cluster_args);
            options.pre_create(&ctx).await?;

            let config = options.eksctl_config()?;
            tokio::io::stdout().write_all(config.as_bytes()).await?;
            tokio::io::stdout().flush().await?;
        }
        Commands::Delete {
            resource: DeleteResource::Cluster(cluster_args),
        } => {
            let mut options = ClusterOptions::from(cluster_args);
            options.pre_delete(&ctx).await?;
            info!(
                "CloudFormation stacks for cluster '{}' deleted, the cluster itself is left to eksctl",
                options.common.cluster_name
            );
        }
    }

    Ok(())
}
