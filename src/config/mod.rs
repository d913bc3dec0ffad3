//! Configuration module.
//!
//! Settings are resolved in three layers: built-in defaults, the resource
//! file ([`loader`]), and the command line ([`flags`]).

pub mod action_table;
pub mod flags;
pub mod loader;

pub use action_table::{ActionTable, BodyLayout, Diagnostic, Flow, StepExecutor};
pub use flags::{parse_flags, Flag, FlagError, FlagOutcome};
pub use loader::{ConfigError, ConfigFile, ResolvedConfig};

use ratatui::style::Color;

/// Default foreground colour.
pub const DEFAULT_FOREGROUND: Color = Color::Rgb(0xaa, 0xaa, 0xaa);
/// Default background colour.
pub const DEFAULT_BACKGROUND: Color = Color::Rgb(0x05, 0x05, 0x05);
/// Default font name. Fonts are recorded but the terminal decides the glyphs.
pub const DEFAULT_FONT: &str = "-*-fixed-*-*-*-*-*-*-*-*-*-*-*-*";

/// Horizontal alignment of text inside a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Flush left.
    Left,
    /// Centred.
    #[default]
    Center,
    /// Flush right.
    Right,
}

impl Alignment {
    /// Alignment from the first character of a flag argument; anything but
    /// `l`, `c` or `r` centres.
    pub fn from_flag(arg: &str) -> Self {
        match arg.chars().next() {
            Some('l') => Self::Left,
            Some('r') => Self::Right,
            _ => Self::Center,
        }
    }

    /// Column offset of text `text_width` wide inside `width` columns.
    pub fn offset(self, width: u16, text_width: u16) -> u16 {
        let slack = width.saturating_sub(text_width);
        match self {
            Self::Left => 0,
            Self::Center => slack / 2,
            Self::Right => slack,
        }
    }
}

/// How the header resizes itself to its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandMode {
    /// Fixed width.
    #[default]
    None,
    /// Grow leftwards, right edge pinned.
    Left,
    /// Grow rightwards, left edge pinned.
    Right,
    /// Grow in both directions around the centre.
    Center,
}

impl ExpandMode {
    /// Mode from the first character of a flag argument.
    pub fn from_flag(arg: &str) -> Self {
        match arg.chars().next() {
            Some('l') => Self::Left,
            Some('c') => Self::Center,
            Some('r') => Self::Right,
            _ => Self::None,
        }
    }
}

/// Whether the body acts as a menu, and in which orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuMode {
    /// Plain scrollable body.
    #[default]
    Off,
    /// Menu lines stacked vertically.
    Vertical,
    /// Menu entries side by side.
    Horizontal,
}

impl MenuMode {
    /// Whether lines can be selected.
    pub fn is_menu(self) -> bool {
        self != Self::Off
    }

    /// Whether the body is a single horizontal row.
    pub fn is_horizontal(self) -> bool {
        self == Self::Horizontal
    }
}

/// Body window name unless overridden.
pub const DEFAULT_SLAVE_NAME: &str = "dzen slave";

/// Runtime options after defaults, resource file and flags are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Body height in lines; 0 means no body.
    pub max_lines: usize,
    /// Header updates interleaved with body blocks.
    pub update_mode: bool,
    /// Keep running after input ends.
    pub persistent: bool,
    /// Seconds to stay alive after input ends in persistent mode; 0 waits forever.
    pub idle_timeout: u64,
    /// Requested header x; negative counts from the right edge.
    pub x: i32,
    /// Requested header y; negative counts from the bottom edge.
    pub y: i32,
    /// Requested header width; 0 fills the screen.
    pub title_width: i32,
    /// Requested body width; 0 fills the screen.
    pub slave_width: i32,
    /// Rows per line; 0 or less means one row.
    pub line_height: i32,
    /// Header resizing.
    pub expand: ExpandMode,
    /// Header text alignment.
    pub title_align: Alignment,
    /// Body text alignment.
    pub slave_align: Alignment,
    /// Menu behaviour of the body.
    pub menu: MenuMode,
    /// Font name.
    pub font: String,
    /// Fonts to preload.
    pub font_preload: Option<String>,
    /// Action string; `None` selects the built-in table.
    pub actions: Option<String>,
    /// Header window name.
    pub title_name: String,
    /// Body window name.
    pub slave_name: String,
    /// Text colour.
    pub foreground: Color,
    /// Fill colour.
    pub background: Color,
    /// 1-based screen index; out of range selects the default screen.
    pub screen: i32,
    /// Dock hint.
    pub dock: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_lines: 0,
            update_mode: false,
            persistent: false,
            idle_timeout: 0,
            x: 0,
            y: 0,
            title_width: 0,
            slave_width: 0,
            line_height: 0,
            expand: ExpandMode::None,
            title_align: Alignment::Center,
            slave_align: Alignment::Left,
            menu: MenuMode::Off,
            font: DEFAULT_FONT.to_string(),
            font_preload: None,
            actions: None,
            title_name: "dzen title".to_string(),
            slave_name: DEFAULT_SLAVE_NAME.to_string(),
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            screen: 0,
            dock: false,
        }
    }
}

impl Options {
    /// Body layout used to pick the default action table.
    pub fn body_layout(&self) -> BodyLayout {
        if self.max_lines == 0 {
            BodyLayout::None
        } else if self.menu.is_horizontal() {
            BodyLayout::Horizontal
        } else {
            BodyLayout::Vertical
        }
    }

    /// Compile the action table for these options.
    pub fn action_table(&self) -> ActionTable {
        ActionTable::from_option(self.actions.as_deref(), self.body_layout())
    }

    /// Options that were set but have no effect on a terminal: the terminal
    /// picks its own font, has no dock, and the body is not a separate
    /// window with a name of its own.
    pub fn without_effect(&self) -> Vec<(&'static str, String)> {
        let mut ignored = Vec::new();
        if let Some(fonts) = &self.font_preload {
            ignored.push(("font_preload", fonts.clone()));
        }
        if self.slave_name != DEFAULT_SLAVE_NAME {
            ignored.push(("slave_name", self.slave_name.clone()));
        }
        if self.dock {
            ignored.push(("dock", "true".to_string()));
        }
        ignored
    }
}
