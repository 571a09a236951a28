//! The seam between the object layer and REAPER.
//!
//! Every host function the crate uses is a [Call] variant, with the
//! parameters REAPER expects. Output parameters are not part of the call:
//! they come back inside [Value::List], in the order REAPER writes them.
use crate::{
    errors::{ReapyError, ReapyResult},
    ItemId, Program, ProgramOutput, ProjectId, TrackId,
};
use serde_derive::{Deserialize, Serialize};
use std::fmt::Debug;

/// Anything that can execute ReaScript calls.
///
/// [crate::InProcessHost] talks to REAPER directly and must be used from
/// the main thread. [crate::DistantHost] forwards calls to the extension
/// over a socket.
pub trait Host: Debug {
    /// Execute a single call.
    fn call(&self, call: Call) -> ReapyResult<Value>;

    /// Execute a batch of calls.
    ///
    /// Default implementation walks the program step by step through
    /// [Host::call]. Hosts with expensive round trips send the whole
    /// program at once.
    fn run(&self, program: &Program) -> ReapyResult<ProgramOutput> {
        program.execute(self)
    }
}

/// One ReaScript function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::Display)]
pub enum Call {
    // projects
    EnumProjects {
        index: i32,
    },
    SelectProjectInstance {
        project: ProjectId,
    },
    AddProjectMarker2 {
        project: ProjectId,
        is_region: bool,
        position: f64,
        region_end: f64,
        name: String,
        want_index: i32,
        color: i32,
    },
    AnyTrackSolo {
        project: ProjectId,
    },
    GetProjectTimeSignature2 {
        project: ProjectId,
    },
    SetCurrentBPM {
        project: ProjectId,
        bpm: f64,
        want_undo: bool,
    },
    CountMediaItems {
        project: ProjectId,
    },
    GetMediaItem {
        project: ProjectId,
        index: i32,
    },
    CountProjectMarkers {
        project: ProjectId,
    },
    EnumProjectMarkers3 {
        project: ProjectId,
        index: i32,
    },
    DeleteProjectMarker {
        project: ProjectId,
        index: i32,
        is_region: bool,
    },
    CountSelectedMediaItems {
        project: ProjectId,
    },
    GetSelectedMediaItem {
        project: ProjectId,
        index: i32,
    },
    CountSelectedTracks2 {
        project: ProjectId,
        want_master: bool,
    },
    GetSelectedTrack2 {
        project: ProjectId,
        index: i32,
        want_master: bool,
    },
    CountTracks {
        project: ProjectId,
    },
    GetTrack {
        project: ProjectId,
        index: i32,
    },
    GetMasterTrack {
        project: ProjectId,
    },
    /// Acts on the current project tab.
    InsertTrackAtIndex {
        index: i32,
        want_defaults: bool,
    },
    GetCursorPositionEx {
        project: ProjectId,
    },
    SetEditCurPos2 {
        project: ProjectId,
        time: f64,
        move_view: bool,
        seek_play: bool,
    },
    IsProjectDirty {
        project: ProjectId,
    },
    MarkProjectDirty {
        project: ProjectId,
    },
    GetProjectLength {
        project: ProjectId,
    },
    GetProjectName {
        project: ProjectId,
    },
    GetProjectPathEx {
        project: ProjectId,
    },
    #[strum(serialize = "Main_OnCommandEx")]
    MainOnCommandEx {
        command: i32,
        flag: i32,
        project: ProjectId,
    },
    #[strum(serialize = "Master_GetPlayRate")]
    MasterGetPlayRate {
        project: ProjectId,
    },
    GetPlayStateEx {
        project: ProjectId,
    },
    #[strum(serialize = "Main_SaveProject")]
    MainSaveProject {
        project: ProjectId,
        force_save_as: bool,
    },
    SelectAllMediaItems {
        project: ProjectId,
        selected: bool,
    },
    #[strum(serialize = "GetSet_LoopTimeRange2")]
    GetSetLoopTimeRange2 {
        project: ProjectId,
        is_set: bool,
        is_loop: bool,
        start: f64,
        end: f64,
        allow_autoseek: bool,
    },
    GetSetRepeatEx {
        project: ProjectId,
        value: i32,
    },
    OnPlayButtonEx {
        project: ProjectId,
    },
    OnPauseButtonEx {
        project: ProjectId,
    },
    OnStopButtonEx {
        project: ProjectId,
    },
    #[strum(serialize = "Undo_BeginBlock2")]
    UndoBeginBlock2 {
        project: ProjectId,
    },
    #[strum(serialize = "Undo_EndBlock2")]
    UndoEndBlock2 {
        project: ProjectId,
        description: String,
        extra_flags: i32,
    },
    // tracks
    #[strum(serialize = "GetSetMediaTrackInfo_String")]
    GetSetMediaTrackInfoString {
        track: TrackId,
        param: String,
        value: String,
        set: bool,
    },
    #[strum(serialize = "GetMediaTrackInfo_Value")]
    GetMediaTrackInfoValue {
        track: TrackId,
        param: String,
    },
    #[strum(serialize = "SetMediaTrackInfo_Value")]
    SetMediaTrackInfoValue {
        track: TrackId,
        param: String,
        value: f64,
    },
    SetTrackSelected {
        track: TrackId,
        selected: bool,
    },
    CountTrackMediaItems {
        track: TrackId,
    },
    GetTrackMediaItem {
        track: TrackId,
        index: i32,
    },
    AddMediaItemToTrack {
        track: TrackId,
    },
    DeleteTrack {
        track: TrackId,
    },
    // items
    #[strum(serialize = "GetMediaItemInfo_Value")]
    GetMediaItemInfoValue {
        item: ItemId,
        param: String,
    },
    #[strum(serialize = "SetMediaItemInfo_Value")]
    SetMediaItemInfoValue {
        item: ItemId,
        param: String,
        value: f64,
    },
    SetMediaItemSelected {
        item: ItemId,
        selected: bool,
    },
    #[strum(serialize = "GetMediaItem_Track")]
    GetMediaItemTrack {
        item: ItemId,
    },
    GetItemProjectContext {
        item: ItemId,
    },
    UpdateItemInProject {
        item: ItemId,
    },
    DeleteTrackMediaItem {
        track: TrackId,
        item: ItemId,
    },
    // misc
    ValidatePtr2 {
        project: Option<ProjectId>,
        address: u64,
        type_name: String,
    },
    ColorToNative {
        r: i32,
        g: i32,
        b: i32,
    },
    ColorFromNative {
        color: i32,
    },
    ShowConsoleMsg {
        message: String,
    },
    ClearConsole,
    UpdateArrange,
    HasExtState {
        section: String,
        key: String,
    },
    GetExtState {
        section: String,
        key: String,
    },
    SetExtState {
        section: String,
        key: String,
        value: String,
        persist: bool,
    },
}
impl Call {
    /// The same call, but addressing the object at `new_index`.
    ///
    /// Used by [crate::Step::Collect] to fan a getter out over a range.
    pub fn at_index(&self, new_index: i32) -> ReapyResult<Call> {
        let mut call = self.clone();
        match &mut call {
            Call::EnumProjects { index }
            | Call::GetMediaItem { index, .. }
            | Call::EnumProjectMarkers3 { index, .. }
            | Call::GetSelectedMediaItem { index, .. }
            | Call::GetSelectedTrack2 { index, .. }
            | Call::GetTrack { index, .. }
            | Call::GetTrackMediaItem { index, .. } => *index = new_index,
            other => return Err(ReapyError::NotIndexable(other.to_string())),
        }
        Ok(call)
    }
}

/// Everything a host call can return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i32),
    Float(f64),
    Str(String),
    Project(Option<ProjectId>),
    Track(Option<TrackId>),
    Item(Option<ItemId>),
    /// Return value followed by output parameters, or a collected range.
    List(Vec<Value>),
}
impl Value {
    fn unexpected(&self, expected: &'static str) -> ReapyError {
        ReapyError::UnexpectedValue {
            expected,
            got: format!("{:?}", self),
        }
    }

    pub fn into_unit(self) -> ReapyResult<()> {
        match self {
            Value::Unit => Ok(()),
            other => Err(other.unexpected("unit")),
        }
    }
    pub fn into_bool(self) -> ReapyResult<bool> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(other.unexpected("bool")),
        }
    }
    pub fn into_int(self) -> ReapyResult<i32> {
        match self {
            Value::Int(i) => Ok(i),
            other => Err(other.unexpected("int")),
        }
    }
    pub fn into_float(self) -> ReapyResult<f64> {
        match self {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(other.unexpected("float")),
        }
    }
    pub fn into_string(self) -> ReapyResult<String> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(other.unexpected("string")),
        }
    }
    pub fn into_project(self) -> ReapyResult<Option<ProjectId>> {
        match self {
            Value::Project(p) => Ok(p),
            other => Err(other.unexpected("project handle")),
        }
    }
    pub fn into_track(self) -> ReapyResult<Option<TrackId>> {
        match self {
            Value::Track(t) => Ok(t),
            other => Err(other.unexpected("track handle")),
        }
    }
    pub fn into_item(self) -> ReapyResult<Option<ItemId>> {
        match self {
            Value::Item(i) => Ok(i),
            other => Err(other.unexpected("item handle")),
        }
    }
    pub fn into_list(self) -> ReapyResult<Vec<Value>> {
        match self {
            Value::List(l) => Ok(l),
            other => Err(other.unexpected("list")),
        }
    }

    /// Take the element `n` of an output tuple.
    pub fn nth(self, n: usize) -> ReapyResult<Value> {
        let got = format!("{:?}", self);
        self.into_list()?.into_iter().nth(n).ok_or(
            ReapyError::UnexpectedValue {
                expected: "longer output tuple",
                got,
            },
        )
    }

    /// Value, that terminates enumeration of host objects.
    ///
    /// Either a null handle, or an output tuple with zero in the return
    /// slot (as `EnumProjectMarkers3` reports the end).
    pub fn is_end(&self) -> bool {
        match self {
            Value::Project(None) | Value::Track(None) | Value::Item(None) => {
                true
            }
            Value::List(l) => matches!(l.first(), Some(Value::Int(0))),
            _ => false,
        }
    }
}
