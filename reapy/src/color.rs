use crate::{
    errors::{ReapyError, ReapyResult},
    Call, Host,
};
use serde_derive::{Deserialize, Serialize};

/// REAPER ignores custom colors without this bit.
pub const CUSTOM_COLOR_FLAG: i32 = 0x1000000;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
impl Color {
    /// New color from r, g, b (0..255).
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Get as tuple.
    pub fn get(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Make from the OS-dependent color.
    pub fn from_native(host: &dyn Host, native: i32) -> ReapyResult<Self> {
        let rgb = host.call(Call::ColorFromNative {
            color: native & !CUSTOM_COLOR_FLAG,
        })?;
        let channel = |n: usize| -> ReapyResult<u8> {
            let value = rgb.clone().nth(n)?.into_int()?;
            u8::try_from(value).map_err(|_| ReapyError::UnexpectedValue {
                expected: "color channel in 0..=255",
                got: value.to_string(),
            })
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(1)?,
            b: channel(2)?,
        })
    }

    /// Convert to OS-dependent color.
    pub fn to_native(&self, host: &dyn Host) -> ReapyResult<i32> {
        host.call(Call::ColorToNative {
            r: self.r as i32,
            g: self.g as i32,
            b: self.b as i32,
        })?
        .into_int()
    }
}
impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

/// Color, as accepted by marker and track setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorArg {
    /// Passed to REAPER as is. `0` means "default color".
    Native(i32),
    /// Translated with `ColorToNative` and flagged as custom.
    Rgb(Color),
}
impl ColorArg {
    pub fn to_native(&self, host: &dyn Host) -> ReapyResult<i32> {
        match self {
            ColorArg::Native(native) => Ok(*native),
            ColorArg::Rgb(color) => {
                Ok(color.to_native(host)? | CUSTOM_COLOR_FLAG)
            }
        }
    }
}
impl Default for ColorArg {
    fn default() -> Self {
        ColorArg::Native(0)
    }
}
impl From<i32> for ColorArg {
    fn from(native: i32) -> Self {
        ColorArg::Native(native)
    }
}
impl From<Color> for ColorArg {
    fn from(color: Color) -> Self {
        ColorArg::Rgb(color)
    }
}
impl From<(u8, u8, u8)> for ColorArg {
    fn from(rgb: (u8, u8, u8)) -> Self {
        ColorArg::Rgb(rgb.into())
    }
}
