//! Controller module for Nextcloud unit reconciliation
//!
//! This module contains event dispatch, the reconciliation pass, pod spec
//! assembly, and the boundaries to the host platform and stored state.

mod env;
mod platform;
mod pod_spec;
mod reconciler;
mod state;
mod status;


pub use env::build_env;
pub use platform::{FilePlatform, Platform, SpecSink};
pub use pod_spec::{
    build_pod_spec, ContainerSpec, ImageDetails, KubernetesSpec, PodSpec, PortSpec,
    HTTP_PORT_NAME, POD_SPEC_VERSION, READINESS_PATH,
};
pub use reconciler::{run_hook, CharmEvent, Reconciler, BUILDING_POD_SPEC, WAITING_FOR_DATABASE};
pub use state::{CharmState, FileStateStore, StateStore};
pub use status::UnitStatus;
