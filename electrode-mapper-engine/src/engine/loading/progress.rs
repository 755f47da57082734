use bevy::asset::{LoadState, UntypedAssetId};
use bevy::prelude::*;

use crate::rpc::web_rpc::WebRpcInterface;

/// Assets the current screen waits on before it becomes interactive.
/// Reset on every screen enter.
#[derive(Resource, Default)]
pub struct LoadingProgress {
    tracked: Vec<UntypedAssetId>,
    last_reported: Option<f32>,
    failure_logged: bool,
}

impl LoadingProgress {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn track(&mut self, id: impl Into<UntypedAssetId>) {
        self.tracked.push(id.into());
    }

    pub fn tracked(&self) -> usize {
        self.tracked.len()
    }

    pub fn loaded(&self, asset_server: &AssetServer) -> usize {
        self.tracked
            .iter()
            .filter(|id| asset_server.is_loaded_with_dependencies(**id))
            .count()
    }
}

/// Share of tracked assets finished; nothing tracked counts as done.
pub fn loaded_fraction(loaded: usize, total: usize) -> f32 {
    if total == 0 {
        1.0
    } else {
        loaded as f32 / total as f32
    }
}

/// Push `loading_progress` to the page whenever the loaded share changes.
pub fn report_loading_progress(
    asset_server: Res<AssetServer>,
    mut progress: ResMut<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let loaded = progress.loaded(&asset_server);
    let total = progress.tracked();
    let fraction = loaded_fraction(loaded, total);

    if progress.last_reported != Some(fraction) {
        progress.last_reported = Some(fraction);
        debug!("Screen assets loaded: {loaded}/{total}");
        rpc_interface.send_notification(
            "loading_progress",
            serde_json::json!({
                "loaded": loaded,
                "total": total,
                "fraction": fraction,
            }),
        );
    }

    if progress.failure_logged {
        return;
    }
    let failed = progress
        .tracked
        .iter()
        .find_map(|id| match asset_server.get_load_state(*id) {
            Some(LoadState::Failed(err)) => Some(err),
            _ => None,
        });
    if let Some(err) = failed {
        warn!("Screen asset failed to load, staying on loading view: {err}");
        progress.failure_logged = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_of_tracked_assets() {
        assert_eq!(loaded_fraction(0, 0), 1.0);
        assert_eq!(loaded_fraction(0, 2), 0.0);
        assert_eq!(loaded_fraction(1, 2), 0.5);
        assert_eq!(loaded_fraction(3, 3), 1.0);
    }
}
