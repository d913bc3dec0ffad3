//! Window placement on the screen.
//!
//! Works in terminal cells. The header ("title") is one line tall; the body
//! ("slave") holds `max_lines` lines either stacked below/above the header or,
//! for a horizontal menu, side by side on the header's row.

use crate::config::{ExpandMode, MenuMode, Options};
use ratatui::layout::Rect;

/// Which window a point or region belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowId {
    /// The header.
    Title,
    /// The body.
    Slave,
}

/// A signed rectangle. Coordinates may be negative while resolving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Area {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width in columns.
    pub width: i32,
    /// Height in rows.
    pub height: i32,
}

impl Area {
    /// Construct an area.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right-most column.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the point lies inside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Convert to a drawable rect, dropping whatever lies left of or above
    /// the origin.
    pub fn to_rect(self) -> Rect {
        let clamp = |v: i32| u16::try_from(v.max(0)).unwrap_or(u16::MAX);
        let x = clamp(self.x);
        let y = clamp(self.y);
        let right = clamp(self.right());
        let bottom = clamp(self.bottom());
        Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }
}

impl From<Rect> for Area {
    fn from(rect: Rect) -> Self {
        Self::new(
            i32::from(rect.x),
            i32::from(rect.y),
            i32::from(rect.width),
            i32::from(rect.height),
        )
    }
}

/// Pick a screen by 1-based index. An index that is zero, negative or past
/// the end selects the first (default) screen.
pub fn select_screen(screens: &[Area], index: i32) -> Area {
    usize::try_from(index)
        .ok()
        .filter(|i| *i >= 1)
        .and_then(|i| screens.get(i - 1))
        .or_else(|| screens.first())
        .copied()
        .unwrap_or_default()
}

/// Requested placement, before it is fitted to a screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryRequest {
    /// Header x; negative counts from the right edge.
    pub x: i32,
    /// Header y; negative counts from the bottom edge.
    pub y: i32,
    /// Header width; 0 takes the body width, then the screen width.
    pub title_width: i32,
    /// Body width; 0 fills the screen.
    pub slave_width: i32,
    /// Rows per line; 0 or less means one.
    pub line_height: i32,
    /// Body height in lines.
    pub max_lines: usize,
    /// Header resizing.
    pub expand: ExpandMode,
    /// Body orientation.
    pub menu: MenuMode,
}

impl GeometryRequest {
    /// Extract the placement fields from options.
    pub fn from_options(opts: &Options) -> Self {
        Self {
            x: opts.x,
            y: opts.y,
            title_width: opts.title_width,
            slave_width: opts.slave_width,
            line_height: opts.line_height,
            max_lines: opts.max_lines,
            expand: opts.expand,
            menu: opts.menu,
        }
    }
}

/// Resolved window placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Screen the windows were fitted to.
    pub screen: Area,
    /// Header area.
    pub title: Area,
    /// Whole body area; empty without a body.
    pub slave: Area,
    /// One area per body line.
    pub lines: Vec<Area>,
    /// Rows per line.
    pub line_height: i32,
    /// Header before content expansion.
    base_title: Area,
    expand: ExpandMode,
}

impl Layout {
    /// Fit `req` to `screen`.
    ///
    /// Out-of-range requests are normalised first: positions are clamped to
    /// one cell past either screen edge, widths to the screen width and the
    /// line height to the screen height. Only the body lines that fit on the
    /// screen get an area.
    pub fn resolve(screen: Area, req: &GeometryRequest) -> Self {
        let screen_width = screen.width.max(0);
        let screen_height = screen.height.max(0);
        let line_height = req.line_height.clamp(1, screen_height.max(1));
        // One cell past an edge still counts as off-screen
        let req_x = req.x.clamp(-screen_width - 1, screen_width + 1);
        let req_y = req.y.clamp(-screen_height - 1, screen_height + 1);
        let mut title = Area::new(req_x, req_y, req.title_width.min(screen_width), line_height);
        let mut slave = Area::new(0, 0, req.slave_width.min(screen_width), 0);

        if title.width == 0 {
            title.width = slave.width;
        }

        // Negative positions count from the far edge
        title.x = if title.x < 0 {
            screen.width + title.x + screen.x
        } else {
            title.x + screen.x
        };
        title.y = if title.y < 0 {
            screen.height + title.y + screen.y
        } else {
            title.y + screen.y
        };

        if title.x < screen.x || screen.right() < title.x {
            title.x = screen.x;
        }
        if title.width <= 0 {
            title.width = screen.width;
        }
        if title.right() > screen.right() && req.expand != ExpandMode::Left {
            title.width = screen.width - (title.x - screen.x);
        }
        if req.expand == ExpandMode::Left {
            let right_corner = title.x + title.width;
            title.x = if title.width > 0 {
                right_corner - title.width
            } else {
                screen.x
            };
        }

        if slave.width <= 0 {
            slave.x = screen.x;
            slave.width = screen.width;
        }
        if title.width == slave.width {
            slave.x = title.x;
        }
        if slave.width != screen.width {
            slave.x = title.x + (title.width - slave.width) / 2;
            if slave.x < screen.x {
                slave.x = screen.x;
            }
            if slave.right() > screen.right() {
                slave.x = screen.x + (screen.width - slave.width);
            }
        }

        if title.bottom() > screen.bottom() {
            title.y = screen.bottom() - line_height;
        }
        if title.y < screen.y {
            title.y = screen.y;
        }

        let lines_i32 = i32::try_from(req.max_lines).unwrap_or(i32::MAX);
        let mut lines = Vec::new();
        if req.max_lines == 0 {
            slave = Area::new(title.x, title.y, 0, 0);
        } else if req.menu.is_horizontal() {
            slave.y = title.y;
            slave.height = line_height;
            title.width = slave.width;
            title.x = slave.x;

            let shown = lines_i32.min(slave.width.max(1));
            let entry = slave.width / shown;
            let remainder = slave.width - entry * shown;
            for i in 0..shown {
                let width = if i == shown - 1 { entry + remainder } else { entry };
                lines.push(Area::new(slave.x + i * entry, slave.y, width, line_height));
            }
        } else {
            let shown = lines_i32.min((screen_height / line_height).max(1));
            slave.height = line_height * shown;
            slave.y = title.bottom();
            if slave.bottom() > screen.bottom() {
                slave.y = title.y - slave.height;
            }
            if slave.y < screen.y {
                slave.y = screen.y;
            }
            for i in 0..shown {
                lines.push(Area::new(
                    slave.x,
                    slave.y + i * line_height,
                    slave.width,
                    line_height,
                ));
            }
        }

        Self {
            screen,
            title,
            slave,
            lines,
            line_height,
            base_title: title,
            expand: req.expand,
        }
    }

    /// Resize the header to `text_width` columns according to the expand
    /// mode. Returns whether the header area changed.
    pub fn fit_title(&mut self, text_width: u16) -> bool {
        let base = self.base_title;
        let screen = self.screen;
        let text = i32::from(text_width).max(1);
        let title = match self.expand {
            ExpandMode::None => base,
            ExpandMode::Right => {
                let width = text.min(screen.right() - base.x);
                Area { width, ..base }
            }
            ExpandMode::Left => {
                let right = base.right();
                let width = text.min(right - screen.x);
                Area {
                    x: right - width,
                    width,
                    ..base
                }
            }
            ExpandMode::Center => {
                let width = text.min(screen.width);
                let centre = base.x + base.width / 2;
                let x = (centre - width / 2).clamp(screen.x, screen.right() - width);
                Area { x, width, ..base }
            }
        };
        let changed = title != self.title;
        self.title = title;
        changed
    }

    /// Index of the body line containing the point.
    pub fn line_at(&self, x: i32, y: i32) -> Option<usize> {
        self.lines.iter().position(|line| line.contains(x, y))
    }

    /// Area of a window.
    pub fn area(&self, window: WindowId) -> Area {
        match window {
            WindowId::Title => self.title,
            WindowId::Slave => self.slave,
        }
    }
}
