use crate::{
    errors::{ReapyError, ReapyResult},
    project::collect,
    Call, Color, ColorArg, Item, Project, Step, TrackId, Value,
    CUSTOM_COLOR_FLAG,
};
use std::fmt::{Debug, Formatter};

#[derive(Clone, Copy)]
pub struct Track<'h> {
    project: Project<'h>,
    id: TrackId,
}
impl<'h> Debug for Track<'h> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("project", &self.project.id())
            .field("id", &self.id)
            .finish()
    }
}
impl<'h> PartialEq for Track<'h> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<'h> Track<'h> {
    pub fn new(project: Project<'h>, id: TrackId) -> Self {
        Self { project, id }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn project(&self) -> Project<'h> {
        self.project
    }

    fn call(&self, call: Call) -> ReapyResult<Value> {
        self.project.host().call(call)
    }

    /// Whether the handle still points to a track of the project.
    pub fn is_valid(&self) -> ReapyResult<bool> {
        self.call(Call::ValidatePtr2 {
            project: Some(self.project.id()),
            address: self.id.address(),
            type_name: "MediaTrack*".to_string(),
        })?
        .into_bool()
    }

    fn get_info_string(&self, param: &str) -> ReapyResult<String> {
        let mut result = self
            .call(Call::GetSetMediaTrackInfoString {
                track: self.id,
                param: param.to_string(),
                value: String::new(),
                set: false,
            })?
            .into_list()?
            .into_iter();
        match (result.next(), result.next()) {
            (Some(Value::Bool(true)), Some(value)) => value.into_string(),
            _ => Err(ReapyError::Host(format!("can not get {}", param))),
        }
    }

    fn set_info_string(&self, param: &str, value: String) -> ReapyResult<()> {
        let ok = self
            .call(Call::GetSetMediaTrackInfoString {
                track: self.id,
                param: param.to_string(),
                value,
                set: true,
            })?
            .nth(0)?
            .into_bool()?;
        match ok {
            true => Ok(()),
            false => Err(ReapyError::Host(format!("can not set {}", param))),
        }
    }

    fn get_info_value(&self, param: &str) -> ReapyResult<f64> {
        self.call(Call::GetMediaTrackInfoValue {
            track: self.id,
            param: param.to_string(),
        })?
        .into_float()
    }

    fn set_info_value(&self, param: &str, value: f64) -> ReapyResult<()> {
        match self
            .call(Call::SetMediaTrackInfoValue {
                track: self.id,
                param: param.to_string(),
                value,
            })?
            .into_bool()?
        {
            true => Ok(()),
            false => Err(ReapyError::Host(format!("can not set {}", param))),
        }
    }

    pub fn name(&self) -> ReapyResult<String> {
        self.get_info_string("P_NAME")
    }

    pub fn set_name(&self, name: impl Into<String>) -> ReapyResult<()> {
        self.set_info_string("P_NAME", name.into())
    }

    /// Zero-based index in the project. None for master track.
    pub fn index(&self) -> ReapyResult<Option<usize>> {
        match self.get_info_value("IP_TRACKNUMBER")? as i32 {
            x if x <= 0 => Ok(None),
            x => Ok(Some(x as usize - 1)),
        }
    }

    pub fn count_items(&self) -> ReapyResult<usize> {
        Ok(self
            .call(Call::CountTrackMediaItems { track: self.id })?
            .into_int()?
            .max(0) as usize)
    }

    pub fn get_item(&self, index: usize) -> ReapyResult<Option<Item<'h>>> {
        let id = self
            .call(Call::GetTrackMediaItem {
                track: self.id,
                index: index as i32,
            })?
            .into_item()?;
        Ok(id.map(|id| Item::new(self.project.host(), id)))
    }

    /// All items on the track, fetched in one batch.
    pub fn items(&self) -> ReapyResult<Vec<Item<'h>>> {
        let host = self.project.host();
        collect(
            host,
            Step::Collect {
                count: Call::CountTrackMediaItems { track: self.id },
                each: Call::GetTrackMediaItem {
                    track: self.id,
                    index: 0,
                },
            },
        )?
        .into_iter()
        .filter_map(|value| value.into_item().transpose())
        .map(|id| id.map(|id| Item::new(host, id)))
        .collect()
    }

    /// Create an empty item spanning `start..end` seconds.
    pub fn add_item(&self, start: f64, end: f64) -> ReapyResult<Item<'h>> {
        let id = self
            .call(Call::AddMediaItemToTrack { track: self.id })?
            .into_item()?
            .ok_or(ReapyError::NullHandle("new item"))?;
        let item = Item::new(self.project.host(), id);
        item.set_position(start)?;
        item.set_length(end - start)?;
        Ok(item)
    }

    pub fn is_selected(&self) -> ReapyResult<bool> {
        Ok(self.get_info_value("I_SELECTED")? != 0.0)
    }

    pub fn select(&self) -> ReapyResult<()> {
        self.set_selected(true)
    }

    pub fn unselect(&self) -> ReapyResult<()> {
        self.set_selected(false)
    }

    fn set_selected(&self, selected: bool) -> ReapyResult<()> {
        self.call(Call::SetTrackSelected {
            track: self.id,
            selected,
        })?
        .into_unit()
    }

    pub fn is_muted(&self) -> ReapyResult<bool> {
        Ok(self.get_info_value("B_MUTE")? != 0.0)
    }

    pub fn mute(&self) -> ReapyResult<()> {
        self.set_info_value("B_MUTE", 1.0)
    }

    pub fn unmute(&self) -> ReapyResult<()> {
        self.set_info_value("B_MUTE", 0.0)
    }

    pub fn is_solo(&self) -> ReapyResult<bool> {
        Ok(self.get_info_value("I_SOLO")? != 0.0)
    }

    pub fn solo(&self) -> ReapyResult<()> {
        self.set_info_value("I_SOLO", 1.0)
    }

    pub fn unsolo(&self) -> ReapyResult<()> {
        self.set_info_value("I_SOLO", 0.0)
    }

    /// Custom color of the track, None if it uses theme color.
    pub fn color(&self) -> ReapyResult<Option<Color>> {
        let native = self.get_info_value("I_CUSTOMCOLOR")? as i32;
        if native & CUSTOM_COLOR_FLAG == 0 {
            return Ok(None);
        }
        Ok(Some(Color::from_native(self.project.host(), native)?))
    }

    pub fn set_color(&self, color: impl Into<ColorArg>) -> ReapyResult<()> {
        let native = color.into().to_native(self.project.host())?;
        self.set_info_value("I_CUSTOMCOLOR", native as f64)
    }

    /// Remove track from the project. The view is invalid afterwards.
    pub fn delete(self) -> ReapyResult<()> {
        self.call(Call::DeleteTrack { track: self.id })?.into_unit()
    }
}
