//! View-state layer - window placement and click hit-testing
//!
//! # Module Structure
//!
//! - `geometry`: Layout - header/body placement fitted to a screen
//! - `click_regions`: ClickRegionRegistry - clickable header areas

pub mod click_regions;
pub mod geometry;

pub use click_regions::{ClickRegion, ClickRegionRegistry};
pub use geometry::{select_screen, Area, GeometryRequest, Layout, WindowId};
