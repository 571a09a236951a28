//! Host living inside REAPER.
//!
//! Every [Call] maps onto exactly one low-level function. Output
//! parameters are allocated here and returned as [Value::List] in the
//! order REAPER writes them.
//!
//! REAPER API is not thread-safe: the host must only be used from the
//! main thread (actions, timers, the extension entry point).
use crate::{
    errors::ReapyResult,
    utils::{as_c_string, as_string, buf_to_string, make_string_buf},
    Call, Host, ItemId, ProjectId, TrackId, Value,
};
use log::debug;
use rea_rs_low::{
    raw::{MediaItem, MediaTrack, ReaProject},
    PluginContext,
};
use std::{
    ffi::c_char,
    fmt::Debug,
    mem::MaybeUninit,
    os::raw::c_void,
    ptr::null_mut,
};

fn project(id: &ProjectId) -> *mut ReaProject {
    id.as_ptr()
}
fn track(id: &TrackId) -> *mut MediaTrack {
    id.as_ptr()
}
fn item(id: &ItemId) -> *mut MediaItem {
    id.as_ptr()
}

pub struct InProcessHost {
    low: rea_rs_low::Reaper,
    buf_size: usize,
}
impl Debug for InProcessHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessHost")
            .field("buf_size", &self.buf_size)
            .finish()
    }
}
impl InProcessHost {
    pub fn new(low: rea_rs_low::Reaper) -> Self {
        Self {
            low,
            buf_size: 4096,
        }
    }

    /// Load low-level API from the extension entry point context.
    pub fn load(context: PluginContext) -> Self {
        Self::new(rea_rs_low::Reaper::load(context))
    }

    pub fn low(&self) -> &rea_rs_low::Reaper {
        &self.low
    }

    /// Size of buffers for string results (project name, track name...).
    pub fn set_string_buf_size(&mut self, size: usize) {
        self.buf_size = size;
    }

    fn read_string(
        &self,
        f: impl FnOnce(*mut c_char, i32),
    ) -> ReapyResult<Value> {
        let mut buf = make_string_buf(self.buf_size);
        f(buf.as_mut_ptr() as *mut c_char, self.buf_size as i32);
        Ok(Value::Str(buf_to_string(&buf)))
    }
}
impl Host for InProcessHost {
    fn call(&self, call: Call) -> ReapyResult<Value> {
        debug!("in-process call: {}", call);
        let low = &self.low;
        unsafe {
            let value = match call {
                Call::EnumProjects { index } => Value::Project(
                    ProjectId::from_ptr(low.EnumProjects(index, null_mut(), 0)),
                ),
                Call::SelectProjectInstance { project: p } => {
                    low.SelectProjectInstance(project(&p));
                    Value::Unit
                }
                Call::AddProjectMarker2 {
                    project: p,
                    is_region,
                    position,
                    region_end,
                    name,
                    want_index,
                    color,
                } => {
                    let name = as_c_string(name)?;
                    Value::Int(low.AddProjectMarker2(
                        project(&p),
                        is_region,
                        position,
                        region_end,
                        name.as_ptr(),
                        want_index,
                        color,
                    ))
                }
                Call::AnyTrackSolo { project: p } => {
                    Value::Bool(low.AnyTrackSolo(project(&p)))
                }
                Call::GetProjectTimeSignature2 { project: p } => {
                    let (mut bpm, mut bpi) =
                        (MaybeUninit::zeroed(), MaybeUninit::zeroed());
                    low.GetProjectTimeSignature2(
                        project(&p),
                        bpm.as_mut_ptr(),
                        bpi.as_mut_ptr(),
                    );
                    Value::List(vec![
                        Value::Float(bpm.assume_init()),
                        Value::Float(bpi.assume_init()),
                    ])
                }
                Call::SetCurrentBPM {
                    project: p,
                    bpm,
                    want_undo,
                } => {
                    low.SetCurrentBPM(project(&p), bpm, want_undo);
                    Value::Unit
                }
                Call::CountMediaItems { project: p } => {
                    Value::Int(low.CountMediaItems(project(&p)))
                }
                Call::GetMediaItem { project: p, index } => Value::Item(
                    ItemId::from_ptr(low.GetMediaItem(project(&p), index)),
                ),
                Call::CountProjectMarkers { project: p } => {
                    let (mut markers, mut regions) =
                        (MaybeUninit::zeroed(), MaybeUninit::zeroed());
                    let total = low.CountProjectMarkers(
                        project(&p),
                        markers.as_mut_ptr(),
                        regions.as_mut_ptr(),
                    );
                    Value::List(vec![
                        Value::Int(total),
                        Value::Int(markers.assume_init()),
                        Value::Int(regions.assume_init()),
                    ])
                }
                Call::EnumProjectMarkers3 { project: p, index } => {
                    let mut is_region = MaybeUninit::zeroed();
                    let mut pos = MaybeUninit::zeroed();
                    let mut end = MaybeUninit::zeroed();
                    let mut name = MaybeUninit::<*const c_char>::zeroed();
                    let mut user_index = MaybeUninit::zeroed();
                    let mut color = MaybeUninit::zeroed();
                    let result = low.EnumProjectMarkers3(
                        project(&p),
                        index,
                        is_region.as_mut_ptr(),
                        pos.as_mut_ptr(),
                        end.as_mut_ptr(),
                        name.as_mut_ptr(),
                        user_index.as_mut_ptr(),
                        color.as_mut_ptr(),
                    );
                    match result {
                        x if x <= 0 => Value::List(vec![Value::Int(0)]),
                        x => Value::List(vec![
                            Value::Int(x),
                            Value::Bool(is_region.assume_init()),
                            Value::Float(pos.assume_init()),
                            Value::Float(end.assume_init()),
                            Value::Str(as_string(name.assume_init())),
                            Value::Int(user_index.assume_init()),
                            Value::Int(color.assume_init()),
                        ]),
                    }
                }
                Call::DeleteProjectMarker {
                    project: p,
                    index,
                    is_region,
                } => Value::Bool(low.DeleteProjectMarker(
                    project(&p),
                    index,
                    is_region,
                )),
                Call::CountSelectedMediaItems { project: p } => {
                    Value::Int(low.CountSelectedMediaItems(project(&p)))
                }
                Call::GetSelectedMediaItem { project: p, index } => {
                    Value::Item(ItemId::from_ptr(
                        low.GetSelectedMediaItem(project(&p), index),
                    ))
                }
                Call::CountSelectedTracks2 {
                    project: p,
                    want_master,
                } => Value::Int(
                    low.CountSelectedTracks2(project(&p), want_master),
                ),
                Call::GetSelectedTrack2 {
                    project: p,
                    index,
                    want_master,
                } => Value::Track(TrackId::from_ptr(low.GetSelectedTrack2(
                    project(&p),
                    index,
                    want_master,
                ))),
                Call::CountTracks { project: p } => {
                    Value::Int(low.CountTracks(project(&p)))
                }
                Call::GetTrack { project: p, index } => Value::Track(
                    TrackId::from_ptr(low.GetTrack(project(&p), index)),
                ),
                Call::GetMasterTrack { project: p } => Value::Track(
                    TrackId::from_ptr(low.GetMasterTrack(project(&p))),
                ),
                Call::InsertTrackAtIndex {
                    index,
                    want_defaults,
                } => {
                    low.InsertTrackAtIndex(index, want_defaults);
                    Value::Unit
                }
                Call::GetCursorPositionEx { project: p } => {
                    Value::Float(low.GetCursorPositionEx(project(&p)))
                }
                Call::SetEditCurPos2 {
                    project: p,
                    time,
                    move_view,
                    seek_play,
                } => {
                    low.SetEditCurPos2(project(&p), time, move_view, seek_play);
                    Value::Unit
                }
                Call::IsProjectDirty { project: p } => {
                    Value::Int(low.IsProjectDirty(project(&p)))
                }
                Call::MarkProjectDirty { project: p } => {
                    low.MarkProjectDirty(project(&p));
                    Value::Unit
                }
                Call::GetProjectLength { project: p } => {
                    Value::Float(low.GetProjectLength(project(&p)))
                }
                Call::GetProjectName { project: p } => {
                    self.read_string(|buf, size| {
                        low.GetProjectName(project(&p), buf, size)
                    })?
                }
                Call::GetProjectPathEx { project: p } => {
                    self.read_string(|buf, size| {
                        low.GetProjectPathEx(project(&p), buf, size)
                    })?
                }
                Call::MainOnCommandEx {
                    command,
                    flag,
                    project: p,
                } => {
                    low.Main_OnCommandEx(command, flag, project(&p));
                    Value::Unit
                }
                Call::MasterGetPlayRate { project: p } => {
                    Value::Float(low.Master_GetPlayRate(project(&p)))
                }
                Call::GetPlayStateEx { project: p } => {
                    Value::Int(low.GetPlayStateEx(project(&p)))
                }
                Call::MainSaveProject {
                    project: p,
                    force_save_as,
                } => {
                    low.Main_SaveProject(project(&p), force_save_as);
                    Value::Unit
                }
                Call::SelectAllMediaItems {
                    project: p,
                    selected,
                } => {
                    low.SelectAllMediaItems(project(&p), selected);
                    Value::Unit
                }
                Call::GetSetLoopTimeRange2 {
                    project: p,
                    is_set,
                    is_loop,
                    start,
                    end,
                    allow_autoseek,
                } => {
                    let (mut start, mut end) =
                        (MaybeUninit::new(start), MaybeUninit::new(end));
                    low.GetSet_LoopTimeRange2(
                        project(&p),
                        is_set,
                        is_loop,
                        start.as_mut_ptr(),
                        end.as_mut_ptr(),
                        allow_autoseek,
                    );
                    Value::List(vec![
                        Value::Float(start.assume_init()),
                        Value::Float(end.assume_init()),
                    ])
                }
                Call::GetSetRepeatEx { project: p, value } => {
                    Value::Int(low.GetSetRepeatEx(project(&p), value))
                }
                Call::OnPlayButtonEx { project: p } => {
                    low.OnPlayButtonEx(project(&p));
                    Value::Unit
                }
                Call::OnPauseButtonEx { project: p } => {
                    low.OnPauseButtonEx(project(&p));
                    Value::Unit
                }
                Call::OnStopButtonEx { project: p } => {
                    low.OnStopButtonEx(project(&p));
                    Value::Unit
                }
                Call::UndoBeginBlock2 { project: p } => {
                    low.Undo_BeginBlock2(project(&p));
                    Value::Unit
                }
                Call::UndoEndBlock2 {
                    project: p,
                    description,
                    extra_flags,
                } => {
                    let description = as_c_string(description)?;
                    low.Undo_EndBlock2(
                        project(&p),
                        description.as_ptr(),
                        extra_flags,
                    );
                    Value::Unit
                }
                Call::GetSetMediaTrackInfoString {
                    track: t,
                    param,
                    value,
                    set,
                } => {
                    let param = as_c_string(param)?;
                    let mut buf = as_c_string(value)?.into_bytes_with_nul();
                    if !set && buf.len() < self.buf_size {
                        buf.resize(self.buf_size, 0);
                    }
                    let ok = low.GetSetMediaTrackInfo_String(
                        track(&t),
                        param.as_ptr(),
                        buf.as_mut_ptr() as *mut c_char,
                        set,
                    );
                    Value::List(vec![
                        Value::Bool(ok),
                        Value::Str(buf_to_string(&buf)),
                    ])
                }
                Call::GetMediaTrackInfoValue { track: t, param } => {
                    let param = as_c_string(param)?;
                    Value::Float(
                        low.GetMediaTrackInfo_Value(track(&t), param.as_ptr()),
                    )
                }
                Call::SetMediaTrackInfoValue {
                    track: t,
                    param,
                    value,
                } => {
                    let param = as_c_string(param)?;
                    Value::Bool(low.SetMediaTrackInfo_Value(
                        track(&t),
                        param.as_ptr(),
                        value,
                    ))
                }
                Call::SetTrackSelected { track: t, selected } => {
                    low.SetTrackSelected(track(&t), selected);
                    Value::Unit
                }
                Call::CountTrackMediaItems { track: t } => {
                    Value::Int(low.CountTrackMediaItems(track(&t)))
                }
                Call::GetTrackMediaItem { track: t, index } => Value::Item(
                    ItemId::from_ptr(low.GetTrackMediaItem(track(&t), index)),
                ),
                Call::AddMediaItemToTrack { track: t } => Value::Item(
                    ItemId::from_ptr(low.AddMediaItemToTrack(track(&t))),
                ),
                Call::DeleteTrack { track: t } => {
                    low.DeleteTrack(track(&t));
                    Value::Unit
                }
                Call::GetMediaItemInfoValue { item: i, param } => {
                    let param = as_c_string(param)?;
                    Value::Float(
                        low.GetMediaItemInfo_Value(item(&i), param.as_ptr()),
                    )
                }
                Call::SetMediaItemInfoValue {
                    item: i,
                    param,
                    value,
                } => {
                    let param = as_c_string(param)?;
                    Value::Bool(low.SetMediaItemInfo_Value(
                        item(&i),
                        param.as_ptr(),
                        value,
                    ))
                }
                Call::SetMediaItemSelected { item: i, selected } => {
                    low.SetMediaItemSelected(item(&i), selected);
                    Value::Unit
                }
                Call::GetMediaItemTrack { item: i } => Value::Track(
                    TrackId::from_ptr(low.GetMediaItem_Track(item(&i))),
                ),
                Call::GetItemProjectContext { item: i } => Value::Project(
                    ProjectId::from_ptr(low.GetItemProjectContext(item(&i))),
                ),
                Call::UpdateItemInProject { item: i } => {
                    low.UpdateItemInProject(item(&i));
                    Value::Unit
                }
                Call::DeleteTrackMediaItem {
                    track: t,
                    item: i,
                } => Value::Bool(low.DeleteTrackMediaItem(track(&t), item(&i))),
                Call::ValidatePtr2 {
                    project: p,
                    address,
                    type_name,
                } => {
                    let type_name = as_c_string(type_name)?;
                    let proj = match p {
                        Some(p) => project(&p),
                        None => null_mut(),
                    };
                    Value::Bool(low.ValidatePtr2(
                        proj,
                        address as usize as *mut c_void,
                        type_name.as_ptr(),
                    ))
                }
                Call::ColorToNative { r, g, b } => {
                    Value::Int(low.ColorToNative(r, g, b))
                }
                Call::ColorFromNative { color } => {
                    let (mut r, mut g, mut b) = (
                        MaybeUninit::zeroed(),
                        MaybeUninit::zeroed(),
                        MaybeUninit::zeroed(),
                    );
                    low.ColorFromNative(
                        color,
                        r.as_mut_ptr(),
                        g.as_mut_ptr(),
                        b.as_mut_ptr(),
                    );
                    Value::List(vec![
                        Value::Int(r.assume_init()),
                        Value::Int(g.assume_init()),
                        Value::Int(b.assume_init()),
                    ])
                }
                Call::ShowConsoleMsg { message } => {
                    let message = as_c_string(message)?;
                    low.ShowConsoleMsg(message.as_ptr());
                    Value::Unit
                }
                Call::ClearConsole => {
                    low.ClearConsole();
                    Value::Unit
                }
                Call::UpdateArrange => {
                    low.UpdateArrange();
                    Value::Unit
                }
                Call::HasExtState { section, key } => {
                    let (section, key) =
                        (as_c_string(section)?, as_c_string(key)?);
                    Value::Bool(low.HasExtState(section.as_ptr(), key.as_ptr()))
                }
                Call::GetExtState { section, key } => {
                    let (section, key) =
                        (as_c_string(section)?, as_c_string(key)?);
                    Value::Str(as_string(
                        low.GetExtState(section.as_ptr(), key.as_ptr()),
                    ))
                }
                Call::SetExtState {
                    section,
                    key,
                    value,
                    persist,
                } => {
                    let (section, key, value) = (
                        as_c_string(section)?,
                        as_c_string(key)?,
                        as_c_string(value)?,
                    );
                    low.SetExtState(
                        section.as_ptr(),
                        key.as_ptr(),
                        value.as_ptr(),
                        persist,
                    );
                    Value::Unit
                }
            };
            Ok(value)
        }
    }
}
