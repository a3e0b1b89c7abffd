//! Pod spec assembly
//!
//! Builds the version 3 pod spec handed to the host platform. The spec is
//! always rebuilt from configuration; the only later mutation is patching
//! the container environment.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{HTTPGetAction, Probe};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::{Deserialize, Serialize};

use crate::config::CharmConfig;

pub const POD_SPEC_VERSION: u32 = 3;
pub const HTTP_PORT_NAME: &str = "http";
pub const READINESS_PATH: &str = "/status.php";
const READINESS_INITIAL_DELAY_SECONDS: i32 = 10;
const READINESS_TIMEOUT_SECONDS: i32 = 30;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    pub version: u32,
    pub containers: Vec<ContainerSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub name: String,
    pub image_details: ImageDetails,
    pub ports: Vec<PortSpec>,
    /// No volumes are mounted; the list is always emitted empty.
    pub volume_config: Vec<serde_json::Value>,
    pub env_config: BTreeMap<String, String>,
    pub kubernetes: KubernetesSpec,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDetails {
    pub image_path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    pub name: String,
    pub container_port: u16,
    pub protocol: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesSpec {
    pub readiness_probe: Probe,
}

impl PodSpec {
    /// Replace the environment of the workload container
    pub fn set_env(&mut self, env: BTreeMap<String, String>) {
        if let Some(container) = self.containers.first_mut() {
            container.env_config = env;
        }
    }
}

fn readiness_probe() -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(READINESS_PATH.to_string()),
            port: IntOrString::String(HTTP_PORT_NAME.to_string()),
            ..Default::default()
        }),
        initial_delay_seconds: Some(READINESS_INITIAL_DELAY_SECONDS),
        timeout_seconds: Some(READINESS_TIMEOUT_SECONDS),
        ..Default::default()
    }
}

/// Build the pod spec for `app_name` from configuration alone.
///
/// The environment is left empty; see [`super::env::build_env`].
pub fn build_pod_spec(app_name: &str, config: &CharmConfig) -> PodSpec {
    PodSpec {
        version: POD_SPEC_VERSION,
        containers: vec![ContainerSpec {
            name: app_name.to_string(),
            image_details: ImageDetails {
                image_path: config.image.clone(),
            },
            ports: vec![PortSpec {
                name: HTTP_PORT_NAME.to_string(),
                container_port: config.port,
                protocol: "TCP".to_string(),
            }],
            volume_config: Vec::new(),
            env_config: BTreeMap::new(),
            kubernetes: KubernetesSpec {
                readiness_probe: readiness_probe(),
            },
        }],
    }
}
