//! Clickable regions layered over the rendered header.
//!
//! Regions are registered in the order their markup opens and tested in
//! reverse, so a region registered later (an inner or overlapping one) wins
//! over one registered earlier. Only clicks on the header are considered.

use super::geometry::{Area, WindowId};
use crate::parser::Markup;

/// A rectangle bound to a pointer button and a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRegion {
    /// Window the coordinates are relative to.
    pub window: WindowId,
    /// Bounds in window-local coordinates.
    pub area: Area,
    /// Button that activates the region.
    pub button: u8,
    /// Command handed to the runner.
    pub command: String,
    /// Inactive regions never match.
    pub active: bool,
}

/// Registry of click regions for the current header content.
#[derive(Debug, Clone, Default)]
pub struct ClickRegionRegistry {
    regions: Vec<ClickRegion>,
}

impl ClickRegionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region. Later regions take priority.
    pub fn register(&mut self, region: ClickRegion) {
        self.regions.push(region);
    }

    /// Drop every region.
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Replace the regions with those of a freshly drawn header line.
    ///
    /// `xorig` is the column where the text starts inside the header (the
    /// alignment offset); `height` is the header height in rows.
    pub fn rebuild(&mut self, markup: &Markup, xorig: u16, height: i32) {
        self.regions.clear();
        for area in &markup.areas {
            let start = i32::from(xorig) + i32::from(area.start);
            let end = i32::from(xorig) + i32::from(area.end);
            self.regions.push(ClickRegion {
                window: WindowId::Title,
                area: Area::new(start, 0, end - start, height),
                button: area.button,
                command: area.command.clone(),
                active: area.active,
            });
        }
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no region is registered.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Registered regions in registration order.
    pub fn regions(&self) -> &[ClickRegion] {
        &self.regions
    }

    /// Find the command for a click at window-local `(x, y)`.
    ///
    /// Tests regions from the most recently registered backwards and returns
    /// the first active one on `window` that contains the point and is bound
    /// to `button`. Clicks outside the header never match.
    pub fn hit_test(&self, window: WindowId, x: i32, y: i32, button: u8) -> Option<&str> {
        if window != WindowId::Title {
            return None;
        }
        self.regions
            .iter()
            .rev()
            .find(|r| r.active && r.window == window && r.button == button && r.area.contains(x, y))
            .map(|r| r.command.as_str())
    }
}
