use bevy::prelude::*;

use crate::engine::loading::manifest_loader::ManifestLoader;

/// Top-level lifecycle: wait for `session.json`, then run the screens.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

/// The three mapping screens. Only exists while the app is running.
///
/// Every entity and resource belonging to a screen is created on enter and
/// discarded on exit, so a revisit always starts from a clean state.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, SubStates)]
#[source(AppState = AppState::Running)]
pub enum Screen {
    #[default]
    Fiducials,
    Electrodes,
    Correspondence,
}

impl Screen {
    /// Convert string identifier to screen for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fiducials" => Some(Self::Fiducials),
            "electrodes" => Some(Self::Electrodes),
            "correspondence" => Some(Self::Correspondence),
            _ => None,
        }
    }

    /// Convert screen to string identifier for frontend communication.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fiducials => "fiducials",
            Self::Electrodes => "electrodes",
            Self::Correspondence => "correspondence",
        }
    }
}

// Leave the loading state once the session manifest is in place.
pub fn transition_to_running(
    manifest_loader: Res<ManifestLoader>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if manifest_loader.is_ready() {
        info!("→ Session ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_names_round_trip() {
        for screen in [Screen::Fiducials, Screen::Electrodes, Screen::Correspondence] {
            assert_eq!(Screen::from_string(screen.as_str()), Some(screen));
        }
        assert_eq!(Screen::from_string("Electrodes"), Some(Screen::Electrodes));
        assert_eq!(Screen::from_string("summary"), None);
    }
}
