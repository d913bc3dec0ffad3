//! Action steps that a trigger can run.

/// One step of an action sequence.
///
/// These represent what should happen, not when. The mapping from a
/// [`Trigger`](super::Trigger) to a sequence of steps is held by the
/// [`ActionTable`](crate::config::ActionTable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStep {
    /// Stop with the given exit code. Remaining steps of the sequence are skipped.
    Exit(i32),
    /// Spawn a shell command.
    Exec(String),
    /// Write text to standard output.
    Print(String),

    // Body scrolling
    /// Move the visible window up by n lines. Default: 1
    ScrollUp(usize),
    /// Move the visible window down by n lines. Default: 1
    ScrollDown(usize),
    /// Jump to the tail window (`scrollhome`, `scrollend`).
    ScrollHome,

    // Body visibility
    /// Hide the body unless it is sticky.
    Collapse,
    /// Show the body.
    Uncollapse,
    /// Flip between collapsed and uncollapsed.
    ToggleCollapse,
    /// Pin the body so `collapse` has no effect.
    Stick,
    /// Release the pin.
    Unstick,
    /// Flip the pin.
    ToggleSticky,

    // Header visibility
    /// Hide the header.
    Hide,
    /// Show the header.
    Unhide,
    /// Flip header visibility.
    ToggleHide,

    // Keyboard
    /// Start dispatching key triggers.
    GrabKeys,
    /// Stop dispatching key triggers.
    UngrabKeys,

    // Menu
    /// Spawn the selected menu line as a command.
    MenuExec,
    /// Print the selected menu line to standard output.
    MenuPrint,
}

impl ActionStep {
    /// Parse a step name plus its optional `:argument`.
    ///
    /// Returns `None` for unknown names and for steps whose argument is mandatory but
    /// missing (`exec`, `print`). Malformed numeric arguments fall back to the default.
    pub fn parse(name: &str, arg: Option<&str>) -> Option<Self> {
        let step = match name {
            "exit" => Self::Exit(arg.and_then(leading_int).unwrap_or(0)),
            "exec" => Self::Exec(non_empty(arg)?),
            "print" => Self::Print(non_empty(arg)?),
            "scrollup" => Self::ScrollUp(scroll_amount(arg)),
            "scrolldown" => Self::ScrollDown(scroll_amount(arg)),
            "scrollhome" | "scrollend" => Self::ScrollHome,
            "collapse" => Self::Collapse,
            "uncollapse" => Self::Uncollapse,
            "togglecollapse" => Self::ToggleCollapse,
            "stick" => Self::Stick,
            "unstick" => Self::Unstick,
            "togglestick" => Self::ToggleSticky,
            "hide" => Self::Hide,
            "unhide" => Self::Unhide,
            "togglehide" => Self::ToggleHide,
            "grabkeys" => Self::GrabKeys,
            "ungrabkeys" => Self::UngrabKeys,
            "menuexec" => Self::MenuExec,
            "menuprint" => Self::MenuPrint,
            _ => return None,
        };
        Some(step)
    }
}

fn non_empty(arg: Option<&str>) -> Option<String> {
    arg.filter(|a| !a.is_empty()).map(str::to_string)
}

fn scroll_amount(arg: Option<&str>) -> usize {
    arg.and_then(leading_int)
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// Integer prefix of `s` (`"13abc"` → 13), `None` when there are no digits.
pub(crate) fn leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i32>().ok().map(|n| sign * n)
}
