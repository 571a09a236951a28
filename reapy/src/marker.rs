use crate::{
    errors::{ReapyError, ReapyResult},
    Call, Color, Project, Value,
};
use serde_derive::{Deserialize, Serialize};

/// Snapshot of a marker or region, as enumerated by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerInfo {
    /// Number shown in GUI, also used to address the marker.
    pub index: usize,
    /// Position in timeline order.
    pub enum_index: usize,
    pub is_region: bool,
    pub position: f64,
    /// Region end. Meaningless for markers.
    pub end: f64,
    pub name: String,
    /// OS-dependent color, `0` for default.
    pub native_color: i32,
}
impl MarkerInfo {
    /// Parse the output tuple of `EnumProjectMarkers3`.
    pub fn from_value(value: Value) -> ReapyResult<Self> {
        let got = format!("{:?}", value);
        let mut list = value.into_list()?.into_iter();
        let mut next = || {
            list.next().ok_or_else(|| ReapyError::UnexpectedValue {
                expected: "marker output tuple",
                got: got.clone(),
            })
        };
        let next_index = next()?.into_int()?;
        Ok(Self {
            enum_index: (next_index - 1).max(0) as usize,
            is_region: next()?.into_bool()?,
            position: next()?.into_float()?,
            end: next()?.into_float()?,
            name: next()?.into_string()?,
            index: next()?.into_int()?.max(0) as usize,
            native_color: next()?.into_int()?,
        })
    }
}

fn find(
    project: &Project,
    index: usize,
    is_region: bool,
) -> ReapyResult<MarkerInfo> {
    project
        .markers_and_regions()?
        .into_iter()
        .find(|info| info.index == index && info.is_region == is_region)
        .ok_or(ReapyError::NullHandle(match is_region {
            true => "region",
            false => "marker",
        }))
}

fn delete(project: &Project, index: usize, is_region: bool) -> ReapyResult<()> {
    let deleted = project
        .host()
        .call(Call::DeleteProjectMarker {
            project: project.id(),
            index: index as i32,
            is_region,
        })?
        .into_bool()?;
    match deleted {
        true => Ok(()),
        false => Err(ReapyError::Host(format!(
            "can not delete {} {}",
            if is_region { "region" } else { "marker" },
            index
        ))),
    }
}

fn color(project: &Project, info: &MarkerInfo) -> ReapyResult<Option<Color>> {
    match info.native_color {
        0 => Ok(None),
        native => Ok(Some(Color::from_native(project.host(), native)?)),
    }
}

/// Project marker, addressed by its displayed index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker<'h> {
    project: Project<'h>,
    index: usize,
}
impl<'h> Marker<'h> {
    pub fn new(project: Project<'h>, index: usize) -> Self {
        Self { project, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn project(&self) -> Project<'h> {
        self.project
    }

    pub fn info(&self) -> ReapyResult<MarkerInfo> {
        find(&self.project, self.index, false)
    }

    pub fn position(&self) -> ReapyResult<f64> {
        Ok(self.info()?.position)
    }

    pub fn name(&self) -> ReapyResult<String> {
        Ok(self.info()?.name)
    }

    pub fn color(&self) -> ReapyResult<Option<Color>> {
        color(&self.project, &self.info()?)
    }

    pub fn delete(self) -> ReapyResult<()> {
        delete(&self.project, self.index, false)
    }
}

/// Project region, addressed by its displayed index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region<'h> {
    project: Project<'h>,
    index: usize,
}
impl<'h> Region<'h> {
    pub fn new(project: Project<'h>, index: usize) -> Self {
        Self { project, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn project(&self) -> Project<'h> {
        self.project
    }

    pub fn info(&self) -> ReapyResult<MarkerInfo> {
        find(&self.project, self.index, true)
    }

    pub fn start(&self) -> ReapyResult<f64> {
        Ok(self.info()?.position)
    }

    pub fn end(&self) -> ReapyResult<f64> {
        Ok(self.info()?.end)
    }

    pub fn name(&self) -> ReapyResult<String> {
        Ok(self.info()?.name)
    }

    pub fn color(&self) -> ReapyResult<Option<Color>> {
        color(&self.project, &self.info()?)
    }

    pub fn delete(self) -> ReapyResult<()> {
        delete(&self.project, self.index, true)
    }
}
