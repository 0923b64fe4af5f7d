//! Asset load failure reporting.
//!
//! The model and skybox load asynchronously. A failed load is logged once at
//! error level and the demo carries on without that asset.

use bevy::asset::{LoadState, UntypedAssetId};
use bevy::prelude::*;

/// Plugin for asset failure reporting.
pub struct AssetWatchPlugin;

impl Plugin for AssetWatchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AssetWatch>()
            .add_systems(Update, report_failed_loads);
    }
}

/// How a watched load ended, if it has.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Pending,
    Loaded,
    Failed(String),
}

impl From<LoadState> for LoadOutcome {
    fn from(state: LoadState) -> Self {
        match state {
            LoadState::Loaded => LoadOutcome::Loaded,
            LoadState::Failed(err) => LoadOutcome::Failed(err.to_string()),
            LoadState::NotLoaded | LoadState::Loading => LoadOutcome::Pending,
        }
    }
}

/// Assets whose loads are still being watched.
#[derive(Resource, Default)]
pub struct AssetWatch {
    pending: Vec<(&'static str, UntypedAssetId)>,
}

impl AssetWatch {
    /// Watch a handle under a human-readable label.
    pub fn track<A: Asset>(&mut self, label: &'static str, handle: &Handle<A>) {
        self.pending.push((label, handle.id().untyped()));
    }

    /// Drop every settled load and return the ones that failed.
    pub fn settle(
        &mut self,
        outcome_of: impl Fn(UntypedAssetId) -> LoadOutcome,
    ) -> Vec<(&'static str, String)> {
        let mut failures = Vec::new();
        self.pending.retain(|&(label, id)| match outcome_of(id) {
            LoadOutcome::Pending => true,
            LoadOutcome::Loaded => false,
            LoadOutcome::Failed(err) => {
                failures.push((label, err));
                false
            }
        });
        failures
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

fn report_failed_loads(asset_server: Res<AssetServer>, mut watch: ResMut<AssetWatch>) {
    if watch.is_empty() {
        return;
    }

    let failures = watch.settle(|id| {
        asset_server
            .get_load_state(id)
            .map_or(LoadOutcome::Pending, LoadOutcome::from)
    });
    for (label, err) in failures {
        tracing::error!("Failed to load {label}: {err}");
    }
}
