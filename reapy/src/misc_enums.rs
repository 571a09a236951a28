use crate::errors::{ReapyError, ReapyResult};
use bitflags::bitflags;
use int_enum::IntEnum;
use serde_derive::{Deserialize, Serialize};

bitflags! {
    /// Raw transport state, as returned by `GetPlayStateEx`.
    pub struct PlayStateFlags: i32 {
        const PLAYING = 1;
        const PAUSED = 2;
        const RECORDING = 4;
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum PlayState {
    Stopped,
    Play,
    Pause,
    Record,
}
impl PlayState {
    /// Paused transport reports as [PlayState::Pause] even while
    /// recording.
    pub fn from_raw(raw: i32) -> ReapyResult<Self> {
        let flags = PlayStateFlags::from_bits(raw)
            .ok_or(ReapyError::UnknownPlayState(raw))?;
        if flags.is_empty() {
            Ok(Self::Stopped)
        } else if flags.contains(PlayStateFlags::PAUSED) {
            Ok(Self::Pause)
        } else if flags.contains(PlayStateFlags::RECORDING) {
            Ok(Self::Record)
        } else {
            Ok(Self::Play)
        }
    }
}

/// Actions of the main section, invoked by the object layer.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
pub enum MainAction {
    GlueItems = 40362,
    GlueItemsWithinTimeSelection = 41588,
    SelectAllTracks = 40296,
    UnselectAllTracks = 40297,
}

bitflags! {
    /// What `Undo_EndBlock2` should record.
    pub struct UndoFlags: i32 {
        const TRACK_CONFIGURATIONS = 1;
        const TRACK_FX = 2;
        const TRACK_ITEMS = 4;
        const PROJECT_STATES = 8;
        const FREEZE_STATES = 16;
    }
}
