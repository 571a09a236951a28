use crate::{
    errors::{ReapyError, ReapyResult},
    misc_enums::{MainAction, PlayState, UndoFlags},
    Call, ColorArg, Host, Item, Marker, MarkerInfo, Program, ProjectId,
    Region, Step, TimeSelection, Track, Value,
};
use int_enum::IntEnum;
use log::debug;
use std::{
    fmt::{Debug, Formatter},
    path::PathBuf,
};

/// REAPER project.
///
/// Thin view over a project handle: nothing is cached, every accessor
/// asks the host again. Dropping it does nothing to the project.
#[derive(Clone, Copy)]
pub struct Project<'h> {
    host: &'h dyn Host,
    id: ProjectId,
}
impl<'h> Debug for Project<'h> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project").field("id", &self.id).finish()
    }
}
impl<'h> PartialEq for Project<'h> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<'h> Project<'h> {
    pub fn from_id(host: &'h dyn Host, id: ProjectId) -> Self {
        Self { host, id }
    }

    /// Project by its tab index in GUI.
    ///
    /// `-1` is the current project.
    pub fn from_index(host: &'h dyn Host, index: i32) -> ReapyResult<Self> {
        let id = host
            .call(Call::EnumProjects { index })?
            .into_project()?
            .ok_or(ReapyError::NullHandle("project"))?;
        Ok(Self { host, id })
    }

    /// Project in the active tab.
    ///
    /// Holds the real handle, so it will not follow tab switches.
    pub fn current(host: &'h dyn Host) -> ReapyResult<Self> {
        Self::from_index(host, -1)
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn host(&self) -> &'h dyn Host {
        self.host
    }

    fn call(&self, call: Call) -> ReapyResult<Value> {
        self.host.call(call)
    }

    /// Create new marker and return its index.
    ///
    /// If a marker with the same position and name already exists, no new
    /// marker will be created, and the existing marker index will be
    /// returned.
    pub fn add_marker(
        &self,
        position: f64,
        name: impl Into<String>,
        color: impl Into<ColorArg>,
    ) -> ReapyResult<usize> {
        self.add_marker_or_region(false, position, 0.0, name, color)
    }

    /// Create new region and return its index.
    pub fn add_region(
        &self,
        start: f64,
        end: f64,
        name: impl Into<String>,
        color: impl Into<ColorArg>,
    ) -> ReapyResult<usize> {
        self.add_marker_or_region(true, start, end, name, color)
    }

    fn add_marker_or_region(
        &self,
        is_region: bool,
        position: f64,
        region_end: f64,
        name: impl Into<String>,
        color: impl Into<ColorArg>,
    ) -> ReapyResult<usize> {
        let color = color.into().to_native(self.host)?;
        let index = self
            .call(Call::AddProjectMarker2 {
                project: self.id,
                is_region,
                position,
                region_end,
                name: name.into(),
                want_index: -1,
                color,
            })?
            .into_int()?;
        match index {
            x if x < 0 => Err(ReapyError::Host(format!(
                "can not add {}",
                if is_region { "region" } else { "marker" }
            ))),
            x => Ok(x as usize),
        }
    }

    /// Whether any track is soloed in project.
    pub fn any_track_solo(&self) -> ReapyResult<bool> {
        self.call(Call::AnyTrackSolo { project: self.id })?
            .into_bool()
    }

    /// Project BPI (numerator of time signature).
    pub fn bpi(&self) -> ReapyResult<f64> {
        Ok(self.time_signature()?.1)
    }

    /// Project BPM (beats per minute).
    pub fn bpm(&self) -> ReapyResult<f64> {
        Ok(self.time_signature()?.0)
    }

    pub fn set_bpm(&self, bpm: f64) -> ReapyResult<()> {
        self.call(Call::SetCurrentBPM {
            project: self.id,
            bpm,
            want_undo: true,
        })?
        .into_unit()
    }

    /// `(bpm, bpi)` from the project settings.
    ///
    /// Does not reflect tempo envelopes.
    pub fn time_signature(&self) -> ReapyResult<(f64, f64)> {
        let list = self
            .call(Call::GetProjectTimeSignature2 { project: self.id })?;
        Ok((list.clone().nth(0)?.into_float()?, list.nth(1)?.into_float()?))
    }

    pub fn count_items(&self) -> ReapyResult<usize> {
        self.count(Call::CountMediaItems { project: self.id })
    }

    pub fn count_markers(&self) -> ReapyResult<usize> {
        self.count_markers_and_regions(1)
    }

    pub fn count_regions(&self) -> ReapyResult<usize> {
        self.count_markers_and_regions(2)
    }

    fn count_markers_and_regions(&self, slot: usize) -> ReapyResult<usize> {
        let n = self
            .call(Call::CountProjectMarkers { project: self.id })?
            .nth(slot)?
            .into_int()?;
        Ok(n.max(0) as usize)
    }

    pub fn count_selected_items(&self) -> ReapyResult<usize> {
        self.count(Call::CountSelectedMediaItems { project: self.id })
    }

    /// Number of selected tracks, master included.
    pub fn count_selected_tracks(&self) -> ReapyResult<usize> {
        self.count(Call::CountSelectedTracks2 {
            project: self.id,
            want_master: true,
        })
    }

    pub fn count_tracks(&self) -> ReapyResult<usize> {
        self.count(Call::CountTracks { project: self.id })
    }

    fn count(&self, call: Call) -> ReapyResult<usize> {
        Ok(self.call(call)?.into_int()?.max(0) as usize)
    }

    /// Edit cursor position in seconds.
    pub fn cursor_position(&self) -> ReapyResult<f64> {
        self.call(Call::GetCursorPositionEx { project: self.id })?
            .into_float()
    }

    /// Move edit cursor, moving view and seeking playback.
    pub fn set_cursor_position(&self, position: f64) -> ReapyResult<()> {
        self.call(Call::SetEditCurPos2 {
            project: self.id,
            time: position,
            move_view: true,
            seek_play: true,
        })?
        .into_unit()
    }

    pub fn get_selected_item(
        &self,
        index: usize,
    ) -> ReapyResult<Option<Item<'h>>> {
        let id = self
            .call(Call::GetSelectedMediaItem {
                project: self.id,
                index: index as i32,
            })?
            .into_item()?;
        Ok(id.map(|id| Item::new(self.host, id)))
    }

    pub fn get_item(&self, index: usize) -> ReapyResult<Option<Item<'h>>> {
        let id = self
            .call(Call::GetMediaItem {
                project: self.id,
                index: index as i32,
            })?
            .into_item()?;
        Ok(id.map(|id| Item::new(self.host, id)))
    }

    pub fn get_track(&self, index: usize) -> ReapyResult<Option<Track<'h>>> {
        let id = self
            .call(Call::GetTrack {
                project: self.id,
                index: index as i32,
            })?
            .into_track()?;
        Ok(id.map(|id| Track::new(*self, id)))
    }

    /// Selected track by index, master included.
    pub fn get_selected_track(
        &self,
        index: usize,
    ) -> ReapyResult<Option<Track<'h>>> {
        let id = self
            .call(Call::GetSelectedTrack2 {
                project: self.id,
                index: index as i32,
                want_master: true,
            })?
            .into_track()?;
        Ok(id.map(|id| Track::new(*self, id)))
    }

    pub fn master_track(&self) -> ReapyResult<Track<'h>> {
        let id = self
            .call(Call::GetMasterTrack { project: self.id })?
            .into_track()?
            .ok_or(ReapyError::NullHandle("master track"))?;
        Ok(Track::new(*self, id))
    }

    /// Glue items (action shortcut).
    pub fn glue_items(&self, within_time_selection: bool) -> ReapyResult<()> {
        let action = match within_time_selection {
            true => MainAction::GlueItemsWithinTimeSelection,
            false => MainAction::GlueItems,
        };
        self.perform_action(action.int_value())
    }

    /// Whether project is dirty (i.e. needing save).
    pub fn is_dirty(&self) -> ReapyResult<bool> {
        Ok(self
            .call(Call::IsProjectDirty { project: self.id })?
            .into_int()?
            != 0)
    }

    /// Mark project as dirty (i.e. needing save).
    pub fn mark_dirty(&self) -> ReapyResult<()> {
        self.call(Call::MarkProjectDirty { project: self.id })?
            .into_unit()
    }

    /// Project length in seconds.
    pub fn length(&self) -> ReapyResult<f64> {
        self.call(Call::GetProjectLength { project: self.id })?
            .into_float()
    }

    pub fn name(&self) -> ReapyResult<String> {
        self.call(Call::GetProjectName { project: self.id })?
            .into_string()
    }

    pub fn path(&self) -> ReapyResult<PathBuf> {
        Ok(PathBuf::from(
            self.call(Call::GetProjectPathEx { project: self.id })?
                .into_string()?,
        ))
    }

    /// Perform action with the given ID in the main Actions section.
    pub fn perform_action(&self, action_id: i32) -> ReapyResult<()> {
        debug!("perform action {} in {}", action_id, self.id);
        self.call(Call::MainOnCommandEx {
            command: action_id,
            flag: 0,
            project: self.id,
        })?
        .into_unit()
    }

    pub fn play_rate(&self) -> ReapyResult<f64> {
        self.call(Call::MasterGetPlayRate { project: self.id })?
            .into_float()
    }

    pub fn play_state(&self) -> ReapyResult<PlayState> {
        let raw = self
            .call(Call::GetPlayStateEx { project: self.id })?
            .into_int()?;
        PlayState::from_raw(raw)
    }

    /// Simulate hit of the play button.
    pub fn play(&self) -> ReapyResult<()> {
        self.call(Call::OnPlayButtonEx { project: self.id })?
            .into_unit()
    }

    pub fn pause(&self) -> ReapyResult<()> {
        self.call(Call::OnPauseButtonEx { project: self.id })?
            .into_unit()
    }

    pub fn stop(&self) -> ReapyResult<()> {
        self.call(Call::OnStopButtonEx { project: self.id })?
            .into_unit()
    }

    pub fn save(&self, force_save_as: bool) -> ReapyResult<()> {
        self.call(Call::MainSaveProject {
            project: self.id,
            force_save_as,
        })?
        .into_unit()
    }

    /// Select or unselect all items.
    pub fn select_all_items(&self, selected: bool) -> ReapyResult<()> {
        self.call(Call::SelectAllMediaItems {
            project: self.id,
            selected,
        })?
        .into_unit()
    }

    pub fn select_all_tracks(&self, selected: bool) -> ReapyResult<()> {
        let action = match selected {
            true => MainAction::SelectAllTracks,
            false => MainAction::UnselectAllTracks,
        };
        self.perform_action(action.int_value())
    }

    /// All selected items, fetched in one batch.
    ///
    /// See [Project::get_selected_item] for a single one.
    pub fn selected_items(&self) -> ReapyResult<Vec<Item<'h>>> {
        self.collect_items(Step::Collect {
            count: Call::CountSelectedMediaItems { project: self.id },
            each: Call::GetSelectedMediaItem {
                project: self.id,
                index: 0,
            },
        })
    }

    /// All items of the project, fetched in one batch.
    pub fn items(&self) -> ReapyResult<Vec<Item<'h>>> {
        self.collect_items(Step::Collect {
            count: Call::CountMediaItems { project: self.id },
            each: Call::GetMediaItem {
                project: self.id,
                index: 0,
            },
        })
    }

    fn collect_items(&self, step: Step) -> ReapyResult<Vec<Item<'h>>> {
        collect(self.host, step)?
            .into_iter()
            .filter_map(|value| value.into_item().transpose())
            .map(|id| id.map(|id| Item::new(self.host, id)))
            .collect()
    }

    /// All tracks of the project, fetched in one batch.
    pub fn tracks(&self) -> ReapyResult<Vec<Track<'h>>> {
        self.collect_tracks(Step::Collect {
            count: Call::CountTracks { project: self.id },
            each: Call::GetTrack {
                project: self.id,
                index: 0,
            },
        })
    }

    /// Selected tracks, master included, fetched in one batch.
    pub fn selected_tracks(&self) -> ReapyResult<Vec<Track<'h>>> {
        self.collect_tracks(Step::Collect {
            count: Call::CountSelectedTracks2 {
                project: self.id,
                want_master: true,
            },
            each: Call::GetSelectedTrack2 {
                project: self.id,
                index: 0,
                want_master: true,
            },
        })
    }

    fn collect_tracks(&self, step: Step) -> ReapyResult<Vec<Track<'h>>> {
        collect(self.host, step)?
            .into_iter()
            .filter_map(|value| value.into_track().transpose())
            .map(|id| id.map(|id| Track::new(*self, id)))
            .collect()
    }

    /// Insert track at index (appended if index is None or out of range).
    ///
    /// REAPER inserts tracks only into the current project, so the project
    /// tab is switched for the time of insertion if needed.
    pub fn add_track(
        &self,
        index: impl Into<Option<usize>>,
        name: impl Into<String>,
    ) -> ReapyResult<Track<'h>> {
        let n_tracks = self.count_tracks()?;
        let index = index.into().unwrap_or(n_tracks).min(n_tracks);
        self.with_current_project(|| {
            self.call(Call::InsertTrackAtIndex {
                index: index as i32,
                want_defaults: true,
            })?
            .into_unit()
        })?;
        let track = self
            .get_track(index)?
            .ok_or(ReapyError::NullHandle("inserted track"))?;
        let name: String = name.into();
        if !name.is_empty() {
            track.set_name(name)?;
        }
        Ok(track)
    }

    /// All markers (not regions) of the project.
    pub fn markers(&self) -> ReapyResult<Vec<Marker<'h>>> {
        Ok(self
            .markers_and_regions()?
            .into_iter()
            .filter(|info| !info.is_region)
            .map(|info| Marker::new(*self, info.index))
            .collect())
    }

    /// All regions of the project.
    pub fn regions(&self) -> ReapyResult<Vec<Region<'h>>> {
        Ok(self
            .markers_and_regions()?
            .into_iter()
            .filter(|info| info.is_region)
            .map(|info| Region::new(*self, info.index))
            .collect())
    }

    /// Info on every marker and region, in timeline order.
    pub fn markers_and_regions(&self) -> ReapyResult<Vec<MarkerInfo>> {
        collect(
            self.host,
            Step::CollectUntilEnd {
                each: Call::EnumProjectMarkers3 {
                    project: self.id,
                    index: 0,
                },
                limit: None,
            },
        )?
        .into_iter()
        .map(MarkerInfo::from_value)
        .collect()
    }

    pub fn time_selection(&self) -> TimeSelection<'h> {
        TimeSelection::new(*self)
    }

    /// If the project is in the active tab.
    pub fn is_current(&self) -> ReapyResult<bool> {
        Ok(Project::current(self.host)?.id == self.id)
    }

    /// Activate the project tab.
    pub fn make_current(&self) -> ReapyResult<()> {
        self.call(Call::SelectProjectInstance { project: self.id })?
            .into_unit()
    }

    /// Run `f` with the project in the active tab, then switch back.
    pub fn with_current_project<T>(
        &self,
        f: impl FnOnce() -> ReapyResult<T>,
    ) -> ReapyResult<T> {
        let current = Project::current(self.host)?;
        if current.id == self.id {
            return f();
        }
        self.make_current()?;
        let result = f();
        current.make_current()?;
        result
    }

    /// Verbose way to make undo.
    ///
    /// [Project::end_undo_block] has to be called after.
    pub fn begin_undo_block(&self) -> ReapyResult<()> {
        self.call(Call::UndoBeginBlock2 { project: self.id })?
            .into_unit()
    }

    /// Close the undo block; `name` is shown in undo history.
    pub fn end_undo_block(
        &self,
        name: impl Into<String>,
        flags: UndoFlags,
    ) -> ReapyResult<()> {
        self.call(Call::UndoEndBlock2 {
            project: self.id,
            description: name.into(),
            extra_flags: flags.bits(),
        })?
        .into_unit()
    }

    /// Call `f` inside undo block with the given name.
    ///
    /// Block is closed even if `f` fails.
    pub fn with_undo_block<T>(
        &self,
        name: impl Into<String>,
        f: impl FnOnce() -> ReapyResult<T>,
    ) -> ReapyResult<T> {
        self.begin_undo_block()?;
        let result = f();
        self.end_undo_block(name, UndoFlags::all())?;
        result
    }
}

/// Run a single collecting step and return the collected values.
pub(crate) fn collect(host: &dyn Host, step: Step) -> ReapyResult<Vec<Value>> {
    let mut program = Program::new();
    let output = program.push(step);
    host.run(&program)?.take(output)?.into_list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mock::MockHost, ItemId, TrackId, CUSTOM_COLOR_FLAG};
    use float_eq::assert_float_eq;

    fn pid() -> ProjectId {
        ProjectId::new(0xabc).unwrap()
    }

    fn project(host: &MockHost) -> Project<'_> {
        Project::from_id(host, pid())
    }

    #[test]
    fn current_project_resolves_index_minus_one() {
        let host = MockHost::new();
        host.push_value(Value::Project(Some(pid())));
        let pr = Project::current(&host).unwrap();
        assert_eq!(pr.id(), pid());
        assert_eq!(host.calls(), vec![Call::EnumProjects { index: -1 }]);
    }

    #[test]
    fn missing_project_tab_is_an_error() {
        let host = MockHost::new();
        host.push_value(Value::Project(None));
        assert!(matches!(
            Project::from_index(&host, 3),
            Err(ReapyError::NullHandle("project"))
        ));
    }

    #[test]
    fn add_marker_forwards_arguments() {
        let host = MockHost::new();
        host.push_value(Value::Int(4));
        let index = project(&host).add_marker(2.5, "verse", 0).unwrap();
        assert_eq!(index, 4);
        assert_eq!(
            host.calls(),
            vec![Call::AddProjectMarker2 {
                project: pid(),
                is_region: false,
                position: 2.5,
                region_end: 0.0,
                name: "verse".to_string(),
                want_index: -1,
                color: 0,
            }]
        );
    }

    #[test]
    fn add_region_translates_rgb_color() {
        let host = MockHost::new();
        host.push_values([Value::Int(0x00ff00), Value::Int(1)]);
        project(&host)
            .add_region(1.0, 3.0, "chorus", (0, 255, 0))
            .unwrap();
        assert_eq!(
            host.calls(),
            vec![
                Call::ColorToNative { r: 0, g: 255, b: 0 },
                Call::AddProjectMarker2 {
                    project: pid(),
                    is_region: true,
                    position: 1.0,
                    region_end: 3.0,
                    name: "chorus".to_string(),
                    want_index: -1,
                    color: 0x00ff00 | CUSTOM_COLOR_FLAG,
                }
            ]
        );
    }

    #[test]
    fn failed_marker_insertion_is_an_error() {
        let host = MockHost::new();
        host.push_value(Value::Int(-1));
        assert!(matches!(
            project(&host).add_marker(0.0, "", 0),
            Err(ReapyError::Host(_))
        ));
    }

    #[test]
    fn time_signature_is_unwrapped() {
        let host = MockHost::new();
        host.set_fallback(Value::List(vec![
            Value::Float(120.0),
            Value::Float(4.0),
        ]));
        let pr = project(&host);
        assert_float_eq!(pr.bpm().unwrap(), 120.0, abs <= 1e-9);
        assert_float_eq!(pr.bpi().unwrap(), 4.0, abs <= 1e-9);
        assert_eq!(
            host.last_call(),
            Some(Call::GetProjectTimeSignature2 { project: pid() })
        );
    }

    #[test]
    fn set_bpm_wants_undo() {
        let host = MockHost::new();
        project(&host).set_bpm(98.0).unwrap();
        assert_eq!(
            host.calls(),
            vec![Call::SetCurrentBPM {
                project: pid(),
                bpm: 98.0,
                want_undo: true
            }]
        );
    }

    #[test]
    fn marker_and_region_counts_come_from_output_tuple() {
        let host = MockHost::new();
        host.set_fallback(Value::List(vec![
            Value::Int(5),
            Value::Int(3),
            Value::Int(2),
        ]));
        let pr = project(&host);
        assert_eq!(pr.count_markers().unwrap(), 3);
        assert_eq!(pr.count_regions().unwrap(), 2);
    }

    #[test]
    fn selected_tracks_count_includes_master() {
        let host = MockHost::new();
        host.push_value(Value::Int(2));
        assert_eq!(project(&host).count_selected_tracks().unwrap(), 2);
        assert_eq!(
            host.last_call(),
            Some(Call::CountSelectedTracks2 {
                project: pid(),
                want_master: true
            })
        );
    }

    #[test]
    fn simple_counters() {
        let host = MockHost::new();
        host.push_values([Value::Int(7), Value::Int(2), Value::Int(9)]);
        let pr = project(&host);
        assert_eq!(pr.count_items().unwrap(), 7);
        assert_eq!(pr.count_selected_items().unwrap(), 2);
        assert_eq!(pr.count_tracks().unwrap(), 9);
        assert_eq!(
            host.calls(),
            vec![
                Call::CountMediaItems { project: pid() },
                Call::CountSelectedMediaItems { project: pid() },
                Call::CountTracks { project: pid() },
            ]
        );
    }

    #[test]
    fn cursor_position_round_trip() {
        let host = MockHost::new();
        host.push_values([Value::Float(12.5), Value::Unit]);
        let pr = project(&host);
        assert_float_eq!(pr.cursor_position().unwrap(), 12.5, abs <= 1e-9);
        pr.set_cursor_position(3.0).unwrap();
        assert_eq!(
            host.last_call(),
            Some(Call::SetEditCurPos2 {
                project: pid(),
                time: 3.0,
                move_view: true,
                seek_play: true,
            })
        );
    }

    #[test]
    fn get_selected_item_wraps_handle() {
        let host = MockHost::new();
        let item = ItemId::new(0x55);
        host.push_values([Value::Item(item), Value::Item(None)]);
        let pr = project(&host);
        let selected = pr.get_selected_item(0).unwrap().unwrap();
        assert_eq!(selected.id(), item.unwrap());
        assert!(pr.get_selected_item(1).unwrap().is_none());
    }

    #[test]
    fn glue_items_picks_action() {
        let host = MockHost::new();
        let pr = project(&host);
        pr.glue_items(false).unwrap();
        pr.glue_items(true).unwrap();
        assert_eq!(
            host.calls(),
            vec![
                Call::MainOnCommandEx {
                    command: 40362,
                    flag: 0,
                    project: pid()
                },
                Call::MainOnCommandEx {
                    command: 41588,
                    flag: 0,
                    project: pid()
                },
            ]
        );
    }

    #[test]
    fn dirty_flag() {
        let host = MockHost::new();
        host.push_values([Value::Int(1), Value::Int(0)]);
        let pr = project(&host);
        assert!(pr.is_dirty().unwrap());
        assert!(!pr.is_dirty().unwrap());
        pr.mark_dirty().unwrap();
        assert_eq!(
            host.last_call(),
            Some(Call::MarkProjectDirty { project: pid() })
        );
    }

    #[test]
    fn name_path_and_length() {
        let host = MockHost::new();
        host.push_values([
            Value::Str("song.rpp".to_string()),
            Value::Str("/home/user/songs".to_string()),
            Value::Float(93.0),
            Value::Float(1.0),
        ]);
        let pr = project(&host);
        assert_eq!(pr.name().unwrap(), "song.rpp");
        assert_eq!(pr.path().unwrap(), PathBuf::from("/home/user/songs"));
        assert_float_eq!(pr.length().unwrap(), 93.0, abs <= 1e-9);
        assert_float_eq!(pr.play_rate().unwrap(), 1.0, abs <= 1e-9);
    }

    #[test]
    fn play_state_is_decoded() {
        let host = MockHost::new();
        host.push_values([Value::Int(1), Value::Int(0)]);
        let pr = project(&host);
        assert_eq!(pr.play_state().unwrap(), PlayState::Play);
        assert_eq!(pr.play_state().unwrap(), PlayState::Stopped);
    }

    #[test]
    fn save_and_select() {
        let host = MockHost::new();
        let pr = project(&host);
        pr.save(true).unwrap();
        pr.select_all_items(false).unwrap();
        assert_eq!(
            host.calls(),
            vec![
                Call::MainSaveProject {
                    project: pid(),
                    force_save_as: true
                },
                Call::SelectAllMediaItems {
                    project: pid(),
                    selected: false
                },
            ]
        );
    }

    #[test]
    fn tracks_are_fetched_in_one_program() {
        let host = MockHost::new();
        let (a, b) = (TrackId::new(0x10), TrackId::new(0x20));
        host.push_values([Value::Int(2), Value::Track(a), Value::Track(b)]);
        let tracks = project(&host).tracks().unwrap();
        let ids: Vec<_> = tracks.iter().map(|t| Some(t.id())).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(tracks[0].project(), project(&host));
    }

    #[test]
    fn selected_items_are_fetched_in_one_program() {
        let host = MockHost::new();
        host.push_values([Value::Int(1), Value::Item(ItemId::new(0x30))]);
        let items = project(&host).selected_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            host.calls(),
            vec![
                Call::CountSelectedMediaItems { project: pid() },
                Call::GetSelectedMediaItem {
                    project: pid(),
                    index: 0
                },
            ]
        );
    }

    #[test]
    fn markers_and_regions_are_split() {
        let host = MockHost::new();
        let entry = |is_region: bool, index: i32| {
            Value::List(vec![
                Value::Int(index + 1),
                Value::Bool(is_region),
                Value::Float(index as f64),
                Value::Float(0.0),
                Value::Str(String::new()),
                Value::Int(index),
                Value::Int(0),
            ])
        };
        host.push_values([
            entry(false, 1),
            entry(true, 2),
            entry(false, 3),
            Value::List(vec![Value::Int(0)]),
        ]);
        let markers = project(&host).markers().unwrap();
        assert_eq!(
            markers.iter().map(|m| m.index()).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn with_current_project_switches_back() {
        let host = MockHost::new();
        let other = ProjectId::new(0xfff);
        host.push_values([Value::Project(other)]);
        let pr = project(&host);
        let n = pr.with_current_project(|| Ok(5)).unwrap();
        assert_eq!(n, 5);
        assert_eq!(
            host.calls(),
            vec![
                Call::EnumProjects { index: -1 },
                Call::SelectProjectInstance { project: pid() },
                Call::SelectProjectInstance {
                    project: other.unwrap()
                },
            ]
        );
    }

    #[test]
    fn undo_block_is_closed_on_error() {
        let host = MockHost::new();
        let pr = project(&host);
        let result: ReapyResult<()> = pr.with_undo_block("edit", || {
            Err(ReapyError::Host("inner".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(
            host.last_call(),
            Some(Call::UndoEndBlock2 {
                project: pid(),
                description: "edit".to_string(),
                extra_flags: UndoFlags::all().bits(),
            })
        );
    }

    #[test]
    fn add_track_in_background_tab_switches_back() {
        let host = MockHost::new();
        let other = ProjectId::new(0xfff);
        let new_track = TrackId::new(0x40);
        host.push_values([
            Value::Int(2),
            Value::Project(other),
            Value::Unit,
            Value::Unit,
            Value::Unit,
            Value::Track(new_track),
            Value::List(vec![
                Value::Bool(true),
                Value::Str("Keys".to_string()),
            ]),
        ]);
        let track = project(&host).add_track(None, "Keys").unwrap();
        assert_eq!(Some(track.id()), new_track);
        assert_eq!(
            host.calls(),
            vec![
                Call::CountTracks { project: pid() },
                Call::EnumProjects { index: -1 },
                Call::SelectProjectInstance { project: pid() },
                Call::InsertTrackAtIndex {
                    index: 2,
                    want_defaults: true
                },
                Call::SelectProjectInstance {
                    project: other.unwrap()
                },
                Call::GetTrack {
                    project: pid(),
                    index: 2
                },
                Call::GetSetMediaTrackInfoString {
                    track: new_track.unwrap(),
                    param: "P_NAME".to_string(),
                    value: "Keys".to_string(),
                    set: true,
                },
            ]
        );
    }

    #[test]
    fn add_track_in_current_tab_clamps_index() {
        let host = MockHost::new();
        host.push_values([
            Value::Int(1),
            Value::Project(Some(pid())),
            Value::Unit,
            Value::Track(TrackId::new(0x41)),
        ]);
        project(&host).add_track(7, "").unwrap();
        assert_eq!(
            host.calls(),
            vec![
                Call::CountTracks { project: pid() },
                Call::EnumProjects { index: -1 },
                Call::InsertTrackAtIndex {
                    index: 1,
                    want_defaults: true
                },
                Call::GetTrack {
                    project: pid(),
                    index: 1
                },
            ]
        );
    }

    #[test]
    fn missing_inserted_track_is_an_error() {
        let host = MockHost::new();
        host.push_values([
            Value::Int(0),
            Value::Project(Some(pid())),
            Value::Unit,
            Value::Track(None),
        ]);
        assert!(matches!(
            project(&host).add_track(None, ""),
            Err(ReapyError::NullHandle("inserted track"))
        ));
    }

    #[test]
    fn regions_are_split_from_markers() {
        let host = MockHost::new();
        let entry = |is_region: bool, index: i32| {
            Value::List(vec![
                Value::Int(index + 1),
                Value::Bool(is_region),
                Value::Float(index as f64),
                Value::Float(index as f64 + 1.0),
                Value::Str(String::new()),
                Value::Int(index),
                Value::Int(0),
            ])
        };
        host.push_values([
            entry(true, 1),
            entry(false, 2),
            entry(true, 3),
            Value::List(vec![Value::Int(0)]),
        ]);
        let regions = project(&host).regions().unwrap();
        assert_eq!(
            regions.iter().map(|r| r.index()).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(host.calls().len(), 4);
        assert_eq!(
            host.last_call(),
            Some(Call::EnumProjectMarkers3 {
                project: pid(),
                index: 3
            })
        );
    }

    #[test]
    fn selected_tracks_include_master() {
        let host = MockHost::new();
        let (master, a) = (TrackId::new(0x1), TrackId::new(0x2));
        host.push_values([Value::Int(2), Value::Track(master), Value::Track(a)]);
        let tracks = project(&host).selected_tracks().unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(
            host.calls(),
            vec![
                Call::CountSelectedTracks2 {
                    project: pid(),
                    want_master: true
                },
                Call::GetSelectedTrack2 {
                    project: pid(),
                    index: 0,
                    want_master: true
                },
                Call::GetSelectedTrack2 {
                    project: pid(),
                    index: 1,
                    want_master: true
                },
            ]
        );
    }

    #[test]
    fn get_selected_track_wants_master() {
        let host = MockHost::new();
        host.push_values([Value::Track(TrackId::new(0x9)), Value::Track(None)]);
        let pr = project(&host);
        assert!(pr.get_selected_track(0).unwrap().is_some());
        assert!(pr.get_selected_track(1).unwrap().is_none());
        assert_eq!(
            host.last_call(),
            Some(Call::GetSelectedTrack2 {
                project: pid(),
                index: 1,
                want_master: true
            })
        );
    }

    #[test]
    fn master_track_is_never_null() {
        let host = MockHost::new();
        host.push_values([Value::Track(TrackId::new(0x3)), Value::Track(None)]);
        let pr = project(&host);
        assert_eq!(pr.master_track().unwrap().id(), TrackId::new(0x3).unwrap());
        assert!(matches!(
            pr.master_track(),
            Err(ReapyError::NullHandle("master track"))
        ));
        assert_eq!(
            host.last_call(),
            Some(Call::GetMasterTrack { project: pid() })
        );
    }

    #[test]
    fn select_all_tracks_picks_action() {
        let host = MockHost::new();
        let pr = project(&host);
        pr.select_all_tracks(true).unwrap();
        pr.select_all_tracks(false).unwrap();
        assert_eq!(
            host.calls(),
            vec![
                Call::MainOnCommandEx {
                    command: 40296,
                    flag: 0,
                    project: pid()
                },
                Call::MainOnCommandEx {
                    command: 40297,
                    flag: 0,
                    project: pid()
                },
            ]
        );
    }

    #[test]
    fn transport_buttons() {
        let host = MockHost::new();
        let pr = project(&host);
        pr.play().unwrap();
        pr.pause().unwrap();
        pr.stop().unwrap();
        assert_eq!(
            host.calls(),
            vec![
                Call::OnPlayButtonEx { project: pid() },
                Call::OnPauseButtonEx { project: pid() },
                Call::OnStopButtonEx { project: pid() },
            ]
        );
    }

    #[test]
    fn is_current_compares_handles() {
        let host = MockHost::new();
        host.push_values([
            Value::Project(Some(pid())),
            Value::Project(ProjectId::new(0xfff)),
        ]);
        let pr = project(&host);
        assert!(pr.is_current().unwrap());
        assert!(!pr.is_current().unwrap());
        assert_eq!(
            host.calls(),
            vec![
                Call::EnumProjects { index: -1 },
                Call::EnumProjects { index: -1 },
            ]
        );
    }

    #[test]
    fn items_are_fetched_in_one_program() {
        let host = MockHost::new();
        host.push_values([
            Value::Int(2),
            Value::Item(ItemId::new(0x31)),
            Value::Item(ItemId::new(0x32)),
        ]);
        let items = project(&host).items().unwrap();
        assert_eq!(items[1].id(), ItemId::new(0x32).unwrap());
        assert_eq!(
            host.calls(),
            vec![
                Call::CountMediaItems { project: pid() },
                Call::GetMediaItem {
                    project: pid(),
                    index: 0
                },
                Call::GetMediaItem {
                    project: pid(),
                    index: 1
                },
            ]
        );
    }
}
