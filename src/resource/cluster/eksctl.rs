use super::ClusterOptions;
use crate::resource::nodegroup::NodegroupOptions;
use crate::resource::ResourceOptions;
use crate::template::{TemplateError, TextTemplate};
use serde::Serialize;

const CLUSTER_TEMPLATE: &str = r#"apiVersion: eksctl.io/v1alpha5
kind: ClusterConfig

metadata:
  name: {{ cluster_name }}
  region: {{ region }}
  version: "{{ kubernetes_version }}"
  tags:
    eksdemo.io/cluster: {{ cluster_name }}

addons:
- name: vpc-cni
{%- if prefix_assignment %}
  configurationValues: |-
    env:
      ENABLE_PREFIX_DELEGATION: "true"
{%- endif %}
- name: coredns
- name: kube-proxy
{%- if ipv6 %}

kubernetesNetworkConfig:
  ipFamily: IPv6
{%- endif %}

iam:
  withOIDC: true
{%- if service_accounts %}
  serviceAccounts:
{{ service_accounts }}
{%- endif %}

vpc:
  cidr: {{ vpc_cidr }}
  hostnameType: resource-name
{%- if private %}
  clusterEndpoints:
    privateAccess: true
    publicAccess: false

privateCluster:
  enabled: true
{%- endif %}

managedNodeGroups:
- name: {{ nodegroup.nodegroup_name }}
  amiFamily: {{ nodegroup.ami_family }}
  desiredCapacity: {{ nodegroup.desired_capacity }}
  minSize: {{ nodegroup.min_size }}
  maxSize: {{ nodegroup.max_size }}
{%- if nodegroup.spot %}
  instanceTypes: ["{{ nodegroup.instance_type }}"]
  spot: true
{%- else %}
  instanceType: {{ nodegroup.instance_type }}
{%- endif %}
  privateNetworking: true
{%- if fargate %}

fargateProfiles:
- name: fp-default
  selectors:
  - namespace: default
{%- endif %}
"#;

#[derive(Serialize)]
struct ClusterTemplateData<'a> {
    cluster_name: &'a str,
    region: &'a str,
    kubernetes_version: &'a str,
    fargate: bool,
    ipv6: bool,
    prefix_assignment: bool,
    private: bool,
    vpc_cidr: &'a str,
    service_accounts: String,
    nodegroup: &'a NodegroupOptions,
}

fn service_accounts(options: &ClusterOptions) -> Result<String, TemplateError> {
    if options.no_roles {
        return Ok(String::new());
    }

    let rendered = options
        .irsa_roles
        .iter()
        .filter_map(|res| match &res.options {
            ResourceOptions::Irsa(irsa) => Some(irsa),
            _ => None,
        })
        .map(|irsa| options.irsa_template.render(irsa))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rendered.join("\n"))
}

pub(super) fn render(options: &ClusterOptions) -> Result<String, TemplateError> {
    let data = ClusterTemplateData {
        cluster_name: &options.common.cluster_name,
        region: &options.common.region,
        kubernetes_version: &options.common.kubernetes_version,
        fargate: options.fargate,
        ipv6: options.ipv6,
        prefix_assignment: options.prefix_assignment,
        private: options.private,
        vpc_cidr: &options.vpc_cidr,
        service_accounts: service_accounts(options)?,
        nodegroup: &options.nodegroup,
    };

    TextTemplate::new(CLUSTER_TEMPLATE).render(&data)
}
