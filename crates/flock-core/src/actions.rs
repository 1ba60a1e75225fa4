//! Key-bound actions shared by live input and edit playback.

/// Who asked for an action. Playback cannot steer travel direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionSource {
    User,
    Playback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    ToggleLines,
    PlayTrack,
    RestartIntro,
    CycleColorMode,
    ToggleDecor,
    ToggleScatter,
    CycleCameraPreset,
    CycleRouteShape,
    ToggleDirection,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::ToggleLines,
        Action::PlayTrack,
        Action::RestartIntro,
        Action::CycleColorMode,
        Action::ToggleDecor,
        Action::ToggleScatter,
        Action::CycleCameraPreset,
        Action::CycleRouteShape,
        Action::ToggleDirection,
    ];

    /// Map a `KeyboardEvent.code` to its action.
    pub fn from_key_code(code: &str) -> Option<Action> {
        Some(match code {
            "Space" => Action::ToggleLines,
            "KeyG" => Action::PlayTrack,
            "KeyT" => Action::RestartIntro,
            "KeyH" => Action::CycleColorMode,
            "KeyJ" => Action::ToggleDecor,
            "KeyB" => Action::ToggleScatter,
            "KeyV" => Action::CycleCameraPreset,
            "KeyK" => Action::CycleRouteShape,
            "KeyD" => Action::ToggleDirection,
            _ => return None,
        })
    }

    pub fn key_code(self) -> &'static str {
        match self {
            Action::ToggleLines => "Space",
            Action::PlayTrack => "KeyG",
            Action::RestartIntro => "KeyT",
            Action::CycleColorMode => "KeyH",
            Action::ToggleDecor => "KeyJ",
            Action::ToggleScatter => "KeyB",
            Action::CycleCameraPreset => "KeyV",
            Action::CycleRouteShape => "KeyK",
            Action::ToggleDirection => "KeyD",
        }
    }

    pub fn accepts(self, source: ActionSource) -> bool {
        !(self == Action::ToggleDirection && source == ActionSource::Playback)
    }
}
