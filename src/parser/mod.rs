//! In-band markup parser for header and body lines.
//!
//! This module provides pure parsing functions that split a line into
//! styled text spans and clickable areas. Recognised commands:
//! - `^fg(color)` / `^fg()` set / reset the text colour
//! - `^bg(color)` / `^bg()` set / reset the fill colour
//! - `^ca(button,command)` ... `^ca()` make the enclosed text clickable
//! - `^^` is a literal caret
//!
//! Unknown `^name(...)` commands are dropped; a `^` that does not start a
//! well-formed command is kept as text.

use crate::model::trigger::MAX_BUTTON;
use ratatui::style::Color;
use std::str::FromStr;
use unicode_width::UnicodeWidthStr;

// Command names
const CMD_FG: &str = "fg";
const CMD_BG: &str = "bg";
const CMD_CLICKABLE: &str = "ca";

/// A run of text drawn with one set of colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Text to draw.
    pub text: String,
    /// Text colour; `None` uses the default.
    pub fg: Option<Color>,
    /// Fill colour; `None` uses the default.
    pub bg: Option<Color>,
}

/// A clickable stretch of columns, relative to the start of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickArea {
    /// Pointer button (1..=7).
    pub button: u8,
    /// Shell command to run.
    pub command: String,
    /// First column.
    pub start: u16,
    /// One past the last column.
    pub end: u16,
    /// Closed by `^ca()` with a valid button.
    pub active: bool,
}

/// A parsed line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    /// Styled text in order.
    pub spans: Vec<Span>,
    /// Clickable areas in opening order, so nested areas follow their parents.
    pub areas: Vec<ClickArea>,
}

impl Markup {
    /// Parse a line.
    pub fn parse(line: &str) -> Self {
        Parser::default().run(line)
    }

    /// Display width in columns.
    pub fn width(&self) -> u16 {
        let width: usize = self.spans.iter().map(|s| s.text.width()).sum();
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    /// Text with every command removed.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Strip markup from a line, keeping only the text.
pub fn strip(line: &str) -> String {
    Markup::parse(line).plain_text()
}

/// A `^ca(` awaiting its `^ca()`: index of its slot in `areas`.
#[derive(Debug)]
struct OpenArea {
    slot: usize,
}

#[derive(Debug, Default)]
struct Parser {
    spans: Vec<Span>,
    areas: Vec<ClickArea>,
    open: Vec<OpenArea>,
    text: String,
    fg: Option<Color>,
    bg: Option<Color>,
    column: usize,
}

impl Parser {
    fn run(mut self, line: &str) -> Markup {
        let mut rest = line;
        while let Some(pos) = rest.find('^') {
            self.push_text(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('^') {
                self.push_text("^");
                rest = tail;
                continue;
            }

            match split_command(after) {
                Some((name, arg, tail)) => {
                    self.command(name, arg);
                    rest = tail;
                }
                None => {
                    self.push_text("^");
                    rest = after;
                }
            }
        }
        self.push_text(rest);
        self.finish()
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
        self.column += text.width();
    }

    fn flush(&mut self) {
        if self.text.is_empty() {
            return;
        }
        self.spans.push(Span {
            text: std::mem::take(&mut self.text),
            fg: self.fg,
            bg: self.bg,
        });
    }

    fn column(&self) -> u16 {
        u16::try_from(self.column).unwrap_or(u16::MAX)
    }

    fn command(&mut self, name: &str, arg: &str) {
        match name {
            CMD_FG => {
                self.flush();
                self.fg = parse_color(arg, self.fg);
            }
            CMD_BG => {
                self.flush();
                self.bg = parse_color(arg, self.bg);
            }
            CMD_CLICKABLE if arg.is_empty() => self.close_area(),
            CMD_CLICKABLE => {
                let (button, command) = arg.split_once(',').unwrap_or((arg, ""));
                let button = button
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|b| (1..=MAX_BUTTON).contains(b));
                let start = self.column();
                // Slot reserved at the opening so inner areas follow outer ones
                self.open.push(OpenArea {
                    slot: self.areas.len(),
                });
                self.areas.push(ClickArea {
                    button: button.unwrap_or(0),
                    command: command.to_string(),
                    start,
                    end: start,
                    active: false,
                });
            }
            _ => {}
        }
    }

    fn close_area(&mut self) {
        let Some(open) = self.open.pop() else {
            return;
        };
        let end = self.column();
        let area = &mut self.areas[open.slot];
        area.end = end;
        area.active = area.button != 0 && !area.command.is_empty();
    }

    fn finish(mut self) -> Markup {
        self.flush();
        // Unclosed areas keep their slot, reach the line end, and never match
        let end = self.column();
        for open in self.open.drain(..) {
            self.areas[open.slot].end = end;
        }
        Markup {
            spans: self.spans,
            areas: self.areas,
        }
    }
}

/// Split `name(arg)rest` into its parts. The argument ends at the first `)`.
fn split_command(s: &str) -> Option<(&str, &str, &str)> {
    let open = s.find('(')?;
    let name = &s[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let body = &s[open + 1..];
    let close = body.find(')')?;
    Some((name, &body[..close], &body[close + 1..]))
}

/// Empty resets to the default; unknown colours keep the current one.
fn parse_color(arg: &str, current: Option<Color>) -> Option<Color> {
    if arg.is_empty() {
        return None;
    }
    Color::from_str(arg).ok().or(current)
}
