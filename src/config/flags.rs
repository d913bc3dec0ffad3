//! Single-dash status-bar flags (`-l 5 -p -e 'button3=exit'`).
//!
//! Each recognised flag is a [`Flag`] variant that knows its arity and how to
//! apply its argument to [`Options`]. Unrecognised arguments are skipped.

use super::{Alignment, ExpandMode, MenuMode, Options};
use crate::model::action_step::leading_int;
use ratatui::style::Color;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from command-line flags. All of them are fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlagError {
    /// A flag that takes an argument was the last word on the command line.
    #[error("Missing argument: {flag}")]
    MissingArgument {
        /// Flag as typed.
        flag: String,
    },

    /// A numeric argument did not start with a representable integer.
    #[error("Invalid number for {flag}: '{value}'")]
    InvalidInteger {
        /// Flag as typed.
        flag: String,
        /// Offending argument.
        value: String,
    },

    /// `-m` was given something other than `v` or `h`.
    #[error("Invalid menu orientation: '{0}'")]
    InvalidOrientation(String),

    /// A colour name or `#rrggbb` value was not understood.
    #[error("Cannot allocate color '{value}' for {flag}")]
    InvalidColor {
        /// Flag as typed.
        flag: String,
        /// Offending argument.
        value: String,
    },
}

/// How many arguments a flag consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    None,
    Required,
    /// Consumes the next word unless it is missing or starts with `-`.
    Optional,
}

/// A recognised flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// `-l n`: body height.
    Lines,
    /// `-geometry WxH+X+Y`.
    Geometry,
    /// `-u`: update mode.
    Update,
    /// `-expand l|c|r`.
    Expand,
    /// `-p [seconds]`: persistent mode.
    Persist,
    /// `-ta l|c|r`.
    TitleAlign,
    /// `-sa l|c|r`.
    SlaveAlign,
    /// `-m [v|h]`: menu mode.
    Menu,
    /// `-fn font`.
    Font,
    /// `-fn-preload fonts`.
    FontPreload,
    /// `-e actions`.
    Events,
    /// `-title-name name`.
    TitleName,
    /// `-slave-name name`.
    SlaveName,
    /// `-bg color`.
    Background,
    /// `-fg color`.
    Foreground,
    /// `-x n`.
    X,
    /// `-y n`.
    Y,
    /// `-w n`: body width.
    Width,
    /// `-h n`: line height.
    Height,
    /// `-tw n`: header width.
    TitleWidth,
    /// `-xs n`: screen index.
    Screen,
    /// `-dock`.
    Dock,
    /// `-v`: print version and exit.
    Version,
}

impl Flag {
    /// Look up a flag by its exact spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        let flag = match name {
            "-l" => Self::Lines,
            "-geometry" => Self::Geometry,
            "-u" => Self::Update,
            "-expand" => Self::Expand,
            "-p" => Self::Persist,
            "-ta" => Self::TitleAlign,
            "-sa" => Self::SlaveAlign,
            "-m" => Self::Menu,
            "-fn" => Self::Font,
            "-fn-preload" => Self::FontPreload,
            "-e" => Self::Events,
            "-title-name" => Self::TitleName,
            "-slave-name" => Self::SlaveName,
            "-bg" => Self::Background,
            "-fg" => Self::Foreground,
            "-x" => Self::X,
            "-y" => Self::Y,
            "-w" => Self::Width,
            "-h" => Self::Height,
            "-tw" => Self::TitleWidth,
            "-xs" => Self::Screen,
            "-dock" => Self::Dock,
            "-v" => Self::Version,
            _ => return None,
        };
        Some(flag)
    }

    fn arity(self) -> Arity {
        match self {
            Self::Update | Self::Dock | Self::Version => Arity::None,
            Self::Persist | Self::Menu => Arity::Optional,
            _ => Arity::Required,
        }
    }

    /// Apply this flag with its argument.
    fn apply(self, name: &str, arg: Option<&str>, opts: &mut Options) -> Result<(), FlagError> {
        let value = arg.unwrap_or_default();
        match self {
            Self::Lines => {
                let n = integer(name, value)?;
                opts.max_lines = usize::try_from(n).map_err(|_| invalid_integer(name, value))?;
            }
            Self::Geometry => match Geometry::parse(value) {
                Some(geometry) => geometry.apply(opts),
                None => warn!("ignoring malformed geometry '{value}'"),
            },
            Self::Update => opts.update_mode = true,
            Self::Expand => opts.expand = ExpandMode::from_flag(value),
            Self::Persist => {
                opts.persistent = true;
                if let Some(timeout) = arg {
                    opts.idle_timeout = timeout.parse().unwrap_or(0);
                }
            }
            Self::TitleAlign => opts.title_align = Alignment::from_flag(value),
            Self::SlaveAlign => opts.slave_align = Alignment::from_flag(value),
            Self::Menu => {
                opts.menu = match arg.and_then(|a| a.chars().next()) {
                    None | Some('v') => MenuMode::Vertical,
                    Some('h') => MenuMode::Horizontal,
                    Some(_) => return Err(FlagError::InvalidOrientation(value.to_string())),
                };
            }
            Self::Font => opts.font = value.to_string(),
            Self::FontPreload => opts.font_preload = Some(value.to_string()),
            Self::Events => opts.actions = Some(value.to_string()),
            Self::TitleName => opts.title_name = value.to_string(),
            Self::SlaveName => opts.slave_name = value.to_string(),
            Self::Background => opts.background = color(name, value)?,
            Self::Foreground => opts.foreground = color(name, value)?,
            Self::X => opts.x = integer(name, value)?,
            Self::Y => opts.y = integer(name, value)?,
            Self::Width => opts.slave_width = integer(name, value)?,
            Self::Height => opts.line_height = integer(name, value)?,
            Self::TitleWidth => opts.title_width = integer(name, value)?,
            Self::Screen => opts.screen = integer(name, value)?,
            Self::Dock => opts.dock = true,
            Self::Version => {}
        }
        Ok(())
    }
}

/// Result of flag parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagOutcome {
    /// Start with these options.
    Run(Options),
    /// `-v` was given: print the version and exit successfully.
    Version,
}

/// Apply `args` (without the program name) on top of `opts`.
///
/// # Errors
///
/// Returns [`FlagError`] for a missing required argument, a malformed number,
/// an unknown menu orientation or an unknown colour.
pub fn parse_flags<I, S>(args: I, mut opts: Options) -> Result<FlagOutcome, FlagError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<S> = args.into_iter().collect();
    let mut i = 0;
    while i < args.len() {
        let name = args[i].as_ref();
        i += 1;
        let Some(flag) = Flag::from_name(name) else {
            debug!("ignoring unknown argument '{name}'");
            continue;
        };

        let arg = match flag.arity() {
            Arity::None => None,
            Arity::Required => {
                let arg = args.get(i).map(|a| a.as_ref()).ok_or_else(|| {
                    FlagError::MissingArgument {
                        flag: name.to_string(),
                    }
                })?;
                i += 1;
                Some(arg)
            }
            Arity::Optional => match args.get(i).map(|a| a.as_ref()) {
                Some(next) if !next.starts_with('-') => {
                    i += 1;
                    Some(next)
                }
                _ => None,
            },
        };

        if flag == Flag::Version {
            return Ok(FlagOutcome::Version);
        }
        flag.apply(name, arg, &mut opts)?;
    }
    Ok(FlagOutcome::Run(opts))
}

fn integer(flag: &str, value: &str) -> Result<i32, FlagError> {
    leading_int(value).ok_or_else(|| invalid_integer(flag, value))
}

fn invalid_integer(flag: &str, value: &str) -> FlagError {
    FlagError::InvalidInteger {
        flag: flag.to_string(),
        value: value.to_string(),
    }
}

/// Parse a colour name or `#rrggbb`.
pub fn color(flag: &str, value: &str) -> Result<Color, FlagError> {
    Color::from_str(value).map_err(|_| FlagError::InvalidColor {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

/// Parsed `[=][W[xH]][{+-}X[{+-}Y]]` geometry string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    /// Width if given.
    pub width: Option<u32>,
    /// Height if given.
    pub height: Option<u32>,
    /// X offset if given, negative when written with `-`.
    pub x: Option<i32>,
    /// Y offset if given, negative when written with `-`.
    pub y: Option<i32>,
    /// Y was written with `-` (distinguishes `-0` from `+0`).
    pub y_negative: bool,
}

impl Geometry {
    /// Parse a geometry string; `None` when it is malformed or empty.
    pub fn parse(s: &str) -> Option<Self> {
        let mut rest = s.strip_prefix('=').unwrap_or(s);
        let mut geometry = Self::default();

        if !rest.starts_with(['+', '-']) {
            let (width, tail) = split_digits(rest);
            if let Some(width) = width {
                geometry.width = Some(width);
            }
            rest = tail;
            if let Some(tail) = rest.strip_prefix(['x', 'X']) {
                let (height, tail) = split_digits(tail);
                geometry.height = Some(height?);
                rest = tail;
            }
        }

        if let Some((x, _, tail)) = signed_offset(rest) {
            geometry.x = Some(x?);
            rest = tail;
            if let Some((y, negative, tail)) = signed_offset(rest) {
                geometry.y = Some(y?);
                geometry.y_negative = negative;
                rest = tail;
            }
        }

        if !rest.is_empty() || geometry == Self::default() {
            return None;
        }
        Some(geometry)
    }

    fn apply(self, opts: &mut Options) {
        if let Some(x) = self.x {
            opts.x = x;
        }
        if let Some(y) = self.y {
            opts.y = if y == 0 && self.y_negative { -1 } else { y };
        }
        if let Some(width) = self.width {
            opts.title_width = i32::try_from(width).unwrap_or(i32::MAX);
        }
        if let Some(height) = self.height {
            opts.line_height = i32::try_from(height).unwrap_or(i32::MAX);
        }
    }
}

fn split_digits(s: &str) -> (Option<u32>, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    (s[..end].parse().ok(), &s[end..])
}

/// `{+-}digits` at the start of `s`: (value, was negative, rest).
fn signed_offset(s: &str) -> Option<(Option<i32>, bool, &str)> {
    let negative = s.starts_with('-');
    let tail = s.strip_prefix(['+', '-'])?;
    let (value, rest) = split_digits(tail);
    let value = value
        .and_then(|v| i32::try_from(v).ok())
        .map(|v| if negative { -v } else { v });
    Some((value, negative, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Options {
        match parse_flags(args.iter().copied(), Options::default()) {
            Ok(FlagOutcome::Run(opts)) => opts,
            other => panic!("expected options, got {other:?}"),
        }
    }

    #[test]
    fn empty_command_line_keeps_defaults() {
        assert_eq!(run(&[]), Options::default());
    }

    #[test]
    fn parses_common_flags() {
        let opts = run(&[
            "-l", "5", "-u", "-ta", "l", "-sa", "r", "-e", "button1=exit", "-x", "-10", "-w", "40",
        ]);
        assert_eq!(opts.max_lines, 5);
        assert!(opts.update_mode);
        assert_eq!(opts.title_align, Alignment::Left);
        assert_eq!(opts.slave_align, Alignment::Right);
        assert_eq!(opts.actions.as_deref(), Some("button1=exit"));
        assert_eq!(opts.x, -10);
        assert_eq!(opts.slave_width, 40);
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let opts = run(&["-frobnicate", "-l", "2", "stray"]);
        assert_eq!(opts.max_lines, 2);
    }

    #[test]
    fn missing_required_argument_is_fatal() {
        let err = parse_flags(["-u", "-l"], Options::default()).unwrap_err();
        assert_eq!(
            err,
            FlagError::MissingArgument {
                flag: "-l".to_string()
            }
        );
        assert_eq!(err.to_string(), "Missing argument: -l");
    }

    #[test]
    fn malformed_integer_is_fatal() {
        let err = parse_flags(["-x", "abc"], Options::default()).unwrap_err();
        assert!(matches!(err, FlagError::InvalidInteger { .. }));
        let err = parse_flags(["-l", "-3"], Options::default()).unwrap_err();
        assert!(matches!(err, FlagError::InvalidInteger { .. }));
    }

    #[test]
    fn integer_prefix_is_accepted() {
        assert_eq!(run(&["-y", "12px"]).y, 12);
    }

    #[test]
    fn persist_with_and_without_timeout() {
        let opts = run(&["-p"]);
        assert!(opts.persistent);
        assert_eq!(opts.idle_timeout, 0);

        let opts = run(&["-p", "5", "-l", "1"]);
        assert_eq!(opts.idle_timeout, 5);
        assert_eq!(opts.max_lines, 1);

        let opts = run(&["-p", "-l", "3"]);
        assert!(opts.persistent);
        assert_eq!(opts.max_lines, 3, "-l is not consumed as a timeout");

        assert_eq!(run(&["-p", "soon"]).idle_timeout, 0);
    }

    #[test]
    fn menu_orientation() {
        assert_eq!(run(&["-m"]).menu, MenuMode::Vertical);
        assert_eq!(run(&["-m", "v"]).menu, MenuMode::Vertical);
        assert_eq!(run(&["-m", "h"]).menu, MenuMode::Horizontal);
        assert_eq!(
            parse_flags(["-m", "diagonal"], Options::default()),
            Err(FlagError::InvalidOrientation("diagonal".to_string()))
        );
    }

    #[test]
    fn version_short_circuits() {
        assert_eq!(
            parse_flags(["-v", "-l"], Options::default()),
            Ok(FlagOutcome::Version)
        );
    }

    #[test]
    fn colors_accept_names_and_hex() {
        let opts = run(&["-fg", "white", "-bg", "#102030"]);
        assert_eq!(opts.foreground, Color::White);
        assert_eq!(opts.background, Color::Rgb(0x10, 0x20, 0x30));
        assert!(matches!(
            parse_flags(["-fg", "notacolour"], Options::default()),
            Err(FlagError::InvalidColor { .. })
        ));
    }

    #[test]
    fn geometry_sets_position_and_size() {
        let opts = run(&["-geometry", "200x2+10-20"]);
        assert_eq!(opts.title_width, 200);
        assert_eq!(opts.line_height, 2);
        assert_eq!(opts.x, 10);
        assert_eq!(opts.y, -20);
    }

    #[test]
    fn geometry_negative_zero_y_means_bottom() {
        let opts = run(&["-geometry", "+0-0"]);
        assert_eq!(opts.x, 0);
        assert_eq!(opts.y, -1);
    }

    #[test]
    fn geometry_parse_forms() {
        assert_eq!(
            Geometry::parse("80"),
            Some(Geometry {
                width: Some(80),
                ..Geometry::default()
            })
        );
        assert_eq!(
            Geometry::parse("=-5+3"),
            Some(Geometry {
                x: Some(-5),
                y: Some(3),
                ..Geometry::default()
            })
        );
        assert_eq!(Geometry::parse(""), None);
        assert_eq!(Geometry::parse("10xq"), None);
        assert_eq!(Geometry::parse("10+3junk"), None);
    }

    #[test]
    fn malformed_geometry_is_ignored() {
        assert_eq!(run(&["-geometry", "huge"]), Options::default());
    }

    #[test]
    fn expand_and_screen() {
        let opts = run(&["-expand", "left", "-xs", "2", "-dock"]);
        assert_eq!(opts.expand, ExpandMode::Left);
        assert_eq!(opts.screen, 2);
        assert!(opts.dock);
    }
}
