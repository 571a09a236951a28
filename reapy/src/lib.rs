//! Object layer over the ReaScript API.
//!
//! Instead of positional calls like `CountTracks(proj)` and
//! `GetTrack(proj, i)`, work with [Project], [Track], [Item], [Marker],
//! [Region] and [TimeSelection] views. Every method forwards to one host
//! function (or a short fixed sequence of them), translating arguments and
//! unwrapping output parameters on the way.
//!
//! The views talk to a [Host]:
//! - [InProcessHost] calls REAPER directly, from inside an extension.
//! - [DistantHost] sends calls to the `reapy-server` extension over a
//!   websocket.
//!
//! Listing operations ([Project::tracks], [Project::selected_items], ...)
//! are expressed as a [Program], so a distant host pays one round trip
//! for the whole list.
//!
//! Inside REAPER:
//!
//! ```ignore
//! use reapy::{PluginContext, Reapy};
//! use rea_rs_macros::reaper_extension_plugin;
//! use std::error::Error;
//!
//! #[reaper_extension_plugin]
//! fn plugin_main(context: PluginContext) -> Result<(), Box<dyn Error>> {
//!     let reapy = Reapy::in_process(context);
//!     let project = reapy.current_project()?;
//!     for track in project.tracks()? {
//!         reapy.show_console_msg(format!("{}\n", track.name()?))?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! From another process, with `reapy-server` loaded in REAPER:
//!
//! ```no_run
//! use reapy::{config::Config, Reapy};
//!
//! let reapy = Reapy::connect(&Config::default().with_env()?)?;
//! let project = reapy.current_project()?;
//! project.add_marker(project.cursor_position()?, "here", (255, 0, 0))?;
//! # Ok::<(), reapy::errors::ReapyError>(())
//! ```

pub use rea_rs_low::PluginContext;

pub mod errors;
pub mod utils;

pub mod handle;
pub use handle::*;

pub mod host;
pub use host::*;

pub mod program;
pub use program::*;

pub mod in_process;
pub use in_process::InProcessHost;

pub mod socket;
pub mod server;
pub mod distant;
pub use distant::DistantHost;

pub mod config;
pub mod extension;

pub mod reapy;
pub use crate::reapy::Reapy;

pub mod misc_enums;
pub use misc_enums::*;

pub mod color;
pub use color::*;

pub mod project;
pub use project::Project;

pub mod track;
pub use track::*;

pub mod item;
pub use item::*;

pub mod marker;
pub use marker::*;

pub mod time_selection;
pub use time_selection::*;

#[cfg(test)]
mod mock;
