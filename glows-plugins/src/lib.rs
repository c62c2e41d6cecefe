//! GEOGLOWS dashboard plugins.
//!
//! - [`plots::PlotsPlugin`]: forecast, retrospective and SSI charts for one
//!   river, optionally bias corrected
//! - [`map::MapPlugin`]: streamflow map configuration for one country
//!
//! Plot kinds are a closed enum ([`kind::PlotKind`]) backed by a static table
//! that names the datasets each kind loads and the assembler that draws it.

pub mod assemble;
pub mod colors;
pub mod inputs;
pub mod kind;
pub mod map;
pub mod params;
pub mod plots;
pub mod schema;

pub use inputs::{Inputs, PlotContext, PlotData};
pub use kind::{ExtraParam, PlotKind};
pub use map::{MapConfiguration, MapPlugin};
pub use params::{PlotParams, PlotRequest};
pub use plots::PlotsPlugin;
pub use schema::PluginSchema;
