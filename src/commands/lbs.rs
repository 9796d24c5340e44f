//! Load balancer report

use serde::Serialize;

use crate::error::{Error, Result};
use crate::infrastructure::{OutputMap, TerraformOutputProvider};
use crate::storage::{Lb, State};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CfLbs {
    pub cf_router_lb: String,
    pub cf_router_lb_url: String,
    pub cf_ssh_proxy_lb: String,
    pub cf_ssh_proxy_lb_url: String,
    pub cf_tcp_lb: String,
    pub cf_tcp_lb_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_dns_zone_name_servers: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcourseLb {
    pub concourse_lb: String,
    pub concourse_lb_url: String,
}

/// Load balancers in front of an environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LbReport {
    Cf(CfLbs),
    Concourse(ConcourseLb),
}

impl LbReport {
    pub fn from_outputs(lb: &Lb, outputs: &OutputMap) -> Result<Self> {
        let string = |key: &str| {
            outputs
                .get(key)
                .and_then(|value| value.as_str())
                .unwrap_or_default()
                .to_string()
        };

        match lb.lb_type.as_str() {
            "cf" => {
                let dns_servers = (!lb.domain.is_empty()).then(|| {
                    outputs
                        .get("cf_system_domain_dns_servers")
                        .and_then(|value| value.as_array())
                        .map(|servers| {
                            servers
                                .iter()
                                .filter_map(|server| server.as_str().map(str::to_string))
                                .collect()
                        })
                        .unwrap_or_default()
                });

                Ok(LbReport::Cf(CfLbs {
                    cf_router_lb: string("cf_router_load_balancer"),
                    cf_router_lb_url: string("cf_router_load_balancer_url"),
                    cf_ssh_proxy_lb: string("cf_ssh_proxy_load_balancer"),
                    cf_ssh_proxy_lb_url: string("cf_ssh_proxy_load_balancer_url"),
                    cf_tcp_lb: string("cf_tcp_router_load_balancer"),
                    cf_tcp_lb_url: string("cf_tcp_router_load_balancer_url"),
                    env_dns_zone_name_servers: dns_servers,
                }))
            }
            "concourse" => Ok(LbReport::Concourse(ConcourseLb {
                concourse_lb: string("concourse_load_balancer"),
                concourse_lb_url: string("concourse_load_balancer_url"),
            })),
            _ => Err(Error::NoLbs),
        }
    }

    /// Human readable report, one load balancer per line
    pub fn lines(&self) -> Vec<String> {
        match self {
            LbReport::Cf(lbs) => {
                let mut lines = vec![
                    format!("CF Router LB: {} [{}]", lbs.cf_router_lb, lbs.cf_router_lb_url),
                    format!(
                        "CF SSH Proxy LB: {} [{}]",
                        lbs.cf_ssh_proxy_lb, lbs.cf_ssh_proxy_lb_url
                    ),
                    format!("CF TCP Router LB: {} [{}]", lbs.cf_tcp_lb, lbs.cf_tcp_lb_url),
                ];
                if let Some(servers) = &lbs.env_dns_zone_name_servers {
                    lines.push(format!(
                        "CF System Domain DNS servers: {}",
                        servers.join(" ")
                    ));
                }
                lines
            }
            LbReport::Concourse(lb) => {
                vec![format!(
                    "Concourse LB: {} [{}]",
                    lb.concourse_lb, lb.concourse_lb_url
                )]
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Report the load balancers recorded in the environment's terraform state.
pub async fn lbs(terraform: &dyn TerraformOutputProvider, state: &State) -> Result<LbReport> {
    let outputs = terraform
        .get_outputs(&state.tf_state)
        .await
        .map_err(Error::Outputs)?;
    LbReport::from_outputs(&state.lb, &outputs)
}
