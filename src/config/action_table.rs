//! Trigger → action sequence table.
//!
//! Compiled from an action string of the form
//! `trigger=step[:arg][,step[:arg]]*[;trigger=...]*`, for example
//! `button3=exit:13;key_Escape=ungrabkeys,exit`.
//!
//! Parsing is forgiving: unknown triggers and steps are dropped rather than
//! rejecting the whole table, and every dropped token is recorded as a
//! [`Diagnostic`] (and logged) so the loss is visible.

use crate::model::{ActionStep, Trigger};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Default table when there is no body.
pub const DEFAULT_NO_BODY: &str = "button3=exit:13";

/// Default table for a horizontal menu.
pub const DEFAULT_HORIZONTAL_MENU: &str = "enterslave=grabkeys;leaveslave=ungrabkeys;\
button4=scrollup;button5=scrolldown;\
key_Left=scrollup;key_Right=scrolldown;\
button1=menuexec;button3=exit:13;\
key_Escape=ungrabkeys,exit";

/// Default table for a vertical body.
pub const DEFAULT_VERTICAL: &str = "entertitle=uncollapse,grabkeys;\
enterslave=grabkeys;leaveslave=collapse,ungrabkeys;\
button1=menuexec;button2=togglestick;button3=exit:13;\
button4=scrollup;button5=scrolldown;\
key_Up=scrollup;key_Down=scrolldown;\
key_Escape=ungrabkeys,exit";

/// How the body is laid out, which selects the default table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLayout {
    /// Header only.
    None,
    /// Body lines stacked under (or over) the header.
    Vertical,
    /// Body lines side by side in a single row.
    Horizontal,
}

/// A token that was dropped while compiling an action string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Entry without `=`.
    MalformedEntry(String),
    /// Trigger name outside the vocabulary.
    UnknownTrigger(String),
    /// Step name outside the vocabulary, or missing its mandatory argument.
    UnknownStep {
        /// Trigger the step was bound to.
        trigger: String,
        /// The offending step token.
        step: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedEntry(entry) => write!(f, "malformed action entry '{entry}'"),
            Self::UnknownTrigger(name) => write!(f, "unknown trigger '{name}'"),
            Self::UnknownStep { trigger, step } => {
                write!(f, "unknown action '{step}' for trigger '{trigger}'")
            }
        }
    }
}

/// Whether an action sequence should keep going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next step.
    Continue,
    /// Skip the remaining steps.
    Stop,
}

/// Something that can carry out action steps.
pub trait StepExecutor {
    /// Execute one step.
    fn execute(&mut self, step: &ActionStep) -> Flow;
}

/// Maps triggers to ordered action sequences.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    entries: HashMap<Trigger, Vec<ActionStep>>,
    diagnostics: Vec<Diagnostic>,
}

impl ActionTable {
    /// Compile an action string. When a trigger appears more than once the
    /// last occurrence wins.
    pub fn parse(spec: &str) -> Self {
        let mut table = Self::default();

        for entry in spec.split(';').filter(|e| !e.is_empty()) {
            let Some((name, steps)) = entry.split_once('=') else {
                table.drop_token(Diagnostic::MalformedEntry(entry.to_string()));
                continue;
            };
            let Some(trigger) = Trigger::parse(name) else {
                table.drop_token(Diagnostic::UnknownTrigger(name.to_string()));
                continue;
            };

            let mut sequence = Vec::new();
            for token in steps.split(',').filter(|s| !s.is_empty()) {
                let (step_name, arg) = match token.split_once(':') {
                    Some((step_name, arg)) => (step_name, Some(arg)),
                    None => (token, None),
                };
                match ActionStep::parse(step_name, arg) {
                    Some(step) => sequence.push(step),
                    None => table.drop_token(Diagnostic::UnknownStep {
                        trigger: name.to_string(),
                        step: token.to_string(),
                    }),
                }
            }

            if sequence.is_empty() {
                table.entries.remove(&trigger);
            } else {
                table.entries.insert(trigger, sequence);
            }
        }

        table
    }

    /// Built-in table for a body layout.
    pub fn defaults(layout: BodyLayout) -> Self {
        Self::parse(match layout {
            BodyLayout::None => DEFAULT_NO_BODY,
            BodyLayout::Vertical => DEFAULT_VERTICAL,
            BodyLayout::Horizontal => DEFAULT_HORIZONTAL_MENU,
        })
    }

    /// Compile `spec` if given, otherwise select the defaults for `layout`.
    pub fn from_option(spec: Option<&str>, layout: BodyLayout) -> Self {
        match spec {
            Some(spec) => Self::parse(spec),
            None => Self::defaults(layout),
        }
    }

    /// Look up the sequence bound to a trigger.
    pub fn get(&self, trigger: &Trigger) -> Option<&[ActionStep]> {
        self.entries.get(trigger).map(Vec::as_slice)
    }

    /// Whether anything is bound to `trigger`.
    pub fn contains(&self, trigger: &Trigger) -> bool {
        self.entries.contains_key(trigger)
    }

    /// Number of bound triggers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no trigger is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokens dropped during compilation.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Run the sequence bound to `trigger` through `executor`.
    ///
    /// Returns the number of steps executed; an unbound trigger executes none.
    pub fn dispatch<E: StepExecutor + ?Sized>(&self, trigger: &Trigger, executor: &mut E) -> usize {
        let Some(steps) = self.entries.get(trigger) else {
            return 0;
        };
        let mut executed = 0;
        for step in steps {
            executed += 1;
            if executor.execute(step) == Flow::Stop {
                break;
            }
        }
        executed
    }

    fn drop_token(&mut self, diagnostic: Diagnostic) {
        warn!("action table: {diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}
