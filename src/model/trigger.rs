//! Named trigger events that action sequences can be bound to.

use std::fmt;

/// Prefix used for keyboard triggers in action strings (`key_Escape`).
pub const KEY_PREFIX: &str = "key_";

/// Highest pointer button number a trigger can name.
pub const MAX_BUTTON: u8 = 7;

/// An input or notification event that can have action steps bound to it.
///
/// The vocabulary is closed: every trigger an action string can name is a
/// variant here, plus one key trigger per key symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Pointer button 1..=7 released (4/5 are wheel up/down, 6/7 wheel left/right).
    Button(u8),
    /// Key pressed while keys are grabbed, by X keysym name (`Escape`, `Up`, `a`).
    Key(String),
    /// Pointer entered the header.
    EnterTitle,
    /// Pointer left the header.
    LeaveTitle,
    /// Pointer entered the body.
    EnterSlave,
    /// Pointer left the body.
    LeaveSlave,
    /// Fired once before the event loop starts.
    OnStart,
    /// Fired once during shutdown.
    OnExit,
    /// Fired when new lines were appended to the body.
    OnNewInput,
    /// SIGUSR1 received.
    SigUsr1,
    /// SIGUSR2 received.
    SigUsr2,
}

impl Trigger {
    /// Button trigger for `n`, if `n` is a button the vocabulary knows.
    pub fn button(n: u8) -> Option<Self> {
        (1..=MAX_BUTTON).contains(&n).then_some(Self::Button(n))
    }

    /// Parse a trigger name as it appears in an action string.
    ///
    /// Returns `None` for names outside the vocabulary.
    pub fn parse(name: &str) -> Option<Self> {
        let trigger = match name {
            "entertitle" => Self::EnterTitle,
            "leavetitle" => Self::LeaveTitle,
            "enterslave" => Self::EnterSlave,
            "leaveslave" => Self::LeaveSlave,
            "onstart" => Self::OnStart,
            "onexit" => Self::OnExit,
            "onnewinput" => Self::OnNewInput,
            "sigusr1" => Self::SigUsr1,
            "sigusr2" => Self::SigUsr2,
            _ => {
                if let Some(sym) = name.strip_prefix(KEY_PREFIX) {
                    if sym.is_empty() {
                        return None;
                    }
                    return Some(Self::Key(sym.to_string()));
                }
                let n = name.strip_prefix("button")?.parse::<u8>().ok()?;
                return Self::button(n);
            }
        };
        Some(trigger)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Button(n) => write!(f, "button{n}"),
            Self::Key(sym) => write!(f, "{KEY_PREFIX}{sym}"),
            Self::EnterTitle => f.write_str("entertitle"),
            Self::LeaveTitle => f.write_str("leavetitle"),
            Self::EnterSlave => f.write_str("enterslave"),
            Self::LeaveSlave => f.write_str("leaveslave"),
            Self::OnStart => f.write_str("onstart"),
            Self::OnExit => f.write_str("onexit"),
            Self::OnNewInput => f.write_str("onnewinput"),
            Self::SigUsr1 => f.write_str("sigusr1"),
            Self::SigUsr2 => f.write_str("sigusr2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_named_trigger() {
        for name in [
            "entertitle",
            "leavetitle",
            "enterslave",
            "leaveslave",
            "onstart",
            "onexit",
            "onnewinput",
            "sigusr1",
            "sigusr2",
        ] {
            let trigger = Trigger::parse(name).expect(name);
            assert_eq!(trigger.to_string(), name);
        }
    }

    #[test]
    fn parses_buttons_one_through_seven() {
        for n in 1..=7u8 {
            assert_eq!(Trigger::parse(&format!("button{n}")), Some(Trigger::Button(n)));
        }
        assert_eq!(Trigger::parse("button0"), None);
        assert_eq!(Trigger::parse("button8"), None);
        assert_eq!(Trigger::parse("button"), None);
    }

    #[test]
    fn parses_key_triggers_case_sensitively() {
        assert_eq!(
            Trigger::parse("key_Escape"),
            Some(Trigger::Key("Escape".to_string()))
        );
        assert_eq!(Trigger::parse("key_a"), Some(Trigger::Key("a".to_string())));
        assert_ne!(Trigger::parse("key_a"), Trigger::parse("key_A"));
        assert_eq!(Trigger::parse("key_"), None);
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(Trigger::parse("onclick"), None);
        assert_eq!(Trigger::parse(""), None);
        assert_eq!(Trigger::parse("Button1"), None);
    }
}
