//! Event handling and the reconciliation pass
//!
//! Every triggering event re-runs the full decision chain from scratch:
//! database present, configuration complete, leadership, then build and
//! publish. Given the same state and configuration the outcome is identical.

use tracing::{debug, info, instrument};

use super::env::build_env;
use super::platform::Platform;
use super::pod_spec::build_pod_spec;
use super::state::{CharmState, StateStore};
use super::status::UnitStatus;
use crate::config::{check_problems, CharmConfig};
use crate::error::Result;
use crate::relation::{RelationChange, RelationData};

pub const WAITING_FOR_DATABASE: &str = "Waiting for database relation";
pub const BUILDING_POD_SPEC: &str = "Building pod spec.";

/// Events delivered by the host runtime
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CharmEvent {
    Start,
    ConfigChanged,
    UpgradeCharm,
    DatabaseRelationChanged {
        /// Remote unit whose relation data changed
        unit: Option<String>,
        data: RelationData,
    },
    DatabaseRelationBroken,
}

impl CharmEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CharmEvent::Start => "start",
            CharmEvent::ConfigChanged => "config-changed",
            CharmEvent::UpgradeCharm => "upgrade-charm",
            CharmEvent::DatabaseRelationChanged { .. } => "database-relation-changed",
            CharmEvent::DatabaseRelationBroken => "database-relation-broken",
        }
    }
}

pub struct Reconciler<P: Platform> {
    platform: P,
    config: CharmConfig,
}

impl<P: Platform> Reconciler<P> {
    pub fn new(platform: P, config: CharmConfig) -> Self {
        Self { platform, config }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    /// Route one event to its handler
    #[instrument(skip_all, fields(event = event.name(), app = self.platform.app_name()))]
    pub fn handle(&mut self, state: &mut CharmState, event: &CharmEvent) -> Result<()> {
        match event {
            CharmEvent::Start | CharmEvent::ConfigChanged | CharmEvent::UpgradeCharm => {
                self.configure_pod(state)?;
            }
            CharmEvent::DatabaseRelationChanged { unit, data } => {
                let is_leader = self.platform.is_leader();
                let change = state
                    .database
                    .on_relation_changed(is_leader, unit.as_deref(), data);
                if change == RelationChange::Stored {
                    self.configure_pod(state)?;
                } else {
                    debug!("Database relation update not applied: {:?}", change);
                }
            }
            CharmEvent::DatabaseRelationBroken => {
                // The last published spec stays in place until the next
                // triggering event runs a reconciliation pass.
                state
                    .database
                    .on_relation_broken(self.platform.is_leader());
            }
        }
        Ok(())
    }

    /// Decide the unit status and, on the leader, publish a fresh pod spec.
    ///
    /// Returns the final status of the pass.
    pub fn configure_pod(&mut self, state: &CharmState) -> Result<UnitStatus> {
        if state.database.host().is_none() {
            return Ok(self.report(UnitStatus::Waiting(WAITING_FOR_DATABASE.to_string())));
        }

        let problems = check_problems(&self.config);
        if !problems.is_empty() {
            return Ok(self.report(UnitStatus::Blocked(problems)));
        }

        if !self.platform.is_leader() {
            return Ok(self.report(UnitStatus::Active));
        }

        self.platform
            .set_status(UnitStatus::Maintenance(BUILDING_POD_SPEC.to_string()));

        let mut pod_spec = build_pod_spec(self.platform.app_name(), &self.config);
        pod_spec.set_env(build_env(&state.database));

        self.platform.apply_pod_spec(&pod_spec)?;
        info!(image = %self.config.image, port = self.config.port, "Pod spec published");

        Ok(self.report(UnitStatus::Active))
    }

    fn report(&mut self, status: UnitStatus) -> UnitStatus {
        self.platform.set_status(status.clone());
        status
    }
}

/// Handle one hook invocation: load state, dispatch the event, save state.
///
/// State is only saved when the event was handled successfully, so a failed
/// publish leaves the previous state for the host to retry against.
pub fn run_hook<P: Platform, S: StateStore>(
    reconciler: &mut Reconciler<P>,
    store: &S,
    event: &CharmEvent,
) -> Result<()> {
    let mut state = store.load()?;
    reconciler.handle(&mut state, event)?;
    store.save(&state)
}
