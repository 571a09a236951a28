use crate::{
    errors::{ReapyError, ReapyResult},
    Call, Host, ItemId, Project, Track, Value,
};
use std::fmt::{Debug, Formatter};

/// Media item.
#[derive(Clone, Copy)]
pub struct Item<'h> {
    host: &'h dyn Host,
    id: ItemId,
}
impl<'h> Debug for Item<'h> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Item").field("id", &self.id).finish()
    }
}
impl<'h> PartialEq for Item<'h> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<'h> Item<'h> {
    pub fn new(host: &'h dyn Host, id: ItemId) -> Self {
        Self { host, id }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    fn call(&self, call: Call) -> ReapyResult<Value> {
        self.host.call(call)
    }

    fn get_info_value(&self, param: &str) -> ReapyResult<f64> {
        self.call(Call::GetMediaItemInfoValue {
            item: self.id,
            param: param.to_string(),
        })?
        .into_float()
    }

    fn set_info_value(&self, param: &str, value: f64) -> ReapyResult<()> {
        match self
            .call(Call::SetMediaItemInfoValue {
                item: self.id,
                param: param.to_string(),
                value,
            })?
            .into_bool()?
        {
            true => Ok(()),
            false => Err(ReapyError::Host(format!("can not set {}", param))),
        }
    }

    /// Position in seconds.
    pub fn position(&self) -> ReapyResult<f64> {
        self.get_info_value("D_POSITION")
    }

    pub fn set_position(&self, position: f64) -> ReapyResult<()> {
        self.set_info_value("D_POSITION", position)
    }

    /// Length in seconds.
    pub fn length(&self) -> ReapyResult<f64> {
        self.get_info_value("D_LENGTH")
    }

    pub fn set_length(&self, length: f64) -> ReapyResult<()> {
        self.set_info_value("D_LENGTH", length)
    }

    pub fn is_selected(&self) -> ReapyResult<bool> {
        Ok(self.get_info_value("B_UISEL")? != 0.0)
    }

    pub fn set_selected(&self, selected: bool) -> ReapyResult<()> {
        self.call(Call::SetMediaItemSelected {
            item: self.id,
            selected,
        })?
        .into_unit()
    }

    pub fn project(&self) -> ReapyResult<Project<'h>> {
        let id = self
            .call(Call::GetItemProjectContext { item: self.id })?
            .into_project()?
            .ok_or(ReapyError::NullHandle("item project"))?;
        Ok(Project::from_id(self.host, id))
    }

    /// Parent track.
    pub fn track(&self) -> ReapyResult<Track<'h>> {
        let project = self.project()?;
        let id = self
            .call(Call::GetMediaItemTrack { item: self.id })?
            .into_track()?
            .ok_or(ReapyError::NullHandle("item track"))?;
        Ok(Track::new(project, id))
    }

    /// Whether the handle still points to an item of its project.
    pub fn is_valid(&self) -> ReapyResult<bool> {
        self.call(Call::ValidatePtr2 {
            project: None,
            address: self.id.address(),
            type_name: "MediaItem*".to_string(),
        })?
        .into_bool()
    }

    /// Redraw item after changes.
    pub fn update(&self) -> ReapyResult<()> {
        self.call(Call::UpdateItemInProject { item: self.id })?
            .into_unit()
    }

    /// Remove item from its track. The view is invalid afterwards.
    pub fn delete(self) -> ReapyResult<()> {
        let track = self.track()?;
        match self
            .call(Call::DeleteTrackMediaItem {
                track: track.id(),
                item: self.id,
            })?
            .into_bool()?
        {
            true => Ok(()),
            false => Err(ReapyError::Host("can not delete item".to_string())),
        }
    }
}
