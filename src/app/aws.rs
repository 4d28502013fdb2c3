use crate::resource::cloudformation_stack::{Stack, StackClient, StackError, CLUSTER_TAG_KEYS};
use crate::resource::{Identity, IdentityError, IdentityResolver};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_types::SdkConfig;
use log::{debug, info, trace};

/// Loads the shared AWS configuration, optionally pinned to a profile and region.
pub async fn load_sdk_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::v2024_03_28());

    if let Some(profile) = profile {
        debug!("Using AWS profile '{}'", profile);
        loader = loader.profile_name(profile);
    }

    if let Some(region) = region {
        debug!("Using AWS region '{}'", region);
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }

    loader.load().await
}

/// Extracts the partition from an ARN such as `arn:aws-cn:sts::123456789012:assumed-role/x`.
fn partition_from_arn(arn: &str) -> Option<&str> {
    let mut parts = arn.split(':');
    match (parts.next(), parts.next()) {
        (Some("arn"), Some(partition)) if !partition.is_empty() => Some(partition),
        _ => None,
    }
}

fn configured_region(shared_config: &SdkConfig) -> Option<String> {
    shared_config.region().map(|region| region.to_string())
}

/// Resolves the caller's identity through STS.
pub struct AwsIdentity {
    sts_client: aws_sdk_sts::Client,
    region: Option<String>,
}

impl AwsIdentity {
    pub fn new(shared_config: &SdkConfig) -> Self {
        Self {
            sts_client: aws_sdk_sts::Client::new(shared_config),
            region: configured_region(shared_config),
        }
    }
}

#[async_trait]
impl IdentityResolver for AwsIdentity {
    async fn identity(&self) -> Result<Identity, IdentityError> {
        let region = self.region()?;

        trace!("Calling sts:GetCallerIdentity");
        let caller = self
            .sts_client
            .get_caller_identity()
            .send()
            .await
            .map_err(|source| IdentityError::CallerIdentity {
                source: source.into(),
            })?;

        let account = caller
            .account()
            .ok_or(IdentityError::MissingField { what: "account" })?
            .to_string();
        let partition = caller
            .arn()
            .and_then(partition_from_arn)
            .ok_or(IdentityError::MissingField { what: "arn" })?
            .to_string();

        info!(
            "Using account '{}' in partition '{}' and region '{}'",
            account, partition, region
        );

        Ok(Identity {
            account,
            partition,
            region,
        })
    }

    fn region(&self) -> Result<String, IdentityError> {
        self.region.clone().ok_or(IdentityError::RegionNone)
    }
}

fn tagged_for_cluster<'a>(
    mut tags: impl Iterator<Item = (Option<&'a str>, Option<&'a str>)>,
    cluster_name: &str,
) -> bool {
    tags.any(|(key, value)| {
        key.map(|key| CLUSTER_TAG_KEYS.contains(&key))
            .unwrap_or(false)
            && value == Some(cluster_name)
    })
}

fn belongs_to_cluster(stack: &aws_sdk_cloudformation::types::Stack, cluster_name: &str) -> bool {
    let tags = stack.tags().iter().map(|tag| {
        let key: Option<&str> = tag.key().into();
        let value: Option<&str> = tag.value().into();
        (key, value)
    });
    tagged_for_cluster(tags, cluster_name)
}

fn to_stack(stack: &aws_sdk_cloudformation::types::Stack) -> Option<Stack> {
    let name: Option<&str> = stack.stack_name().into();
    name.map(Stack::new)
}

/// CloudFormation stacks, looked up by cluster tag.
pub struct CloudformationStacks {
    cfn_client: aws_sdk_cloudformation::Client,
}

impl CloudformationStacks {
    pub fn new(shared_config: &SdkConfig) -> Self {
        Self {
            cfn_client: aws_sdk_cloudformation::Client::new(shared_config),
        }
    }
}

#[async_trait]
impl StackClient for CloudformationStacks {
    async fn stacks_by_cluster(
        &self,
        cluster_name: &str,
        stack_name: Option<&str>,
    ) -> Result<Vec<Stack>, StackError> {
        let mut stacks = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .cfn_client
                .describe_stacks()
                .set_stack_name(stack_name.map(String::from))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|source| StackError::Describe {
                    cluster_name: cluster_name.to_string(),
                    source: source.into(),
                })?;

            stacks.extend(
                output
                    .stacks()
                    .iter()
                    .filter(|stack| belongs_to_cluster(stack, cluster_name))
                    .filter_map(to_stack),
            );

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(
            "Found {} CloudFormation stacks for cluster '{}'",
            stacks.len(),
            cluster_name
        );
        Ok(stacks)
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<(), StackError> {
        self.cfn_client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|source| StackError::Delete {
                stack_name: stack_name.to_string(),
                source: source.into(),
            })?;
        Ok(())
    }
}
