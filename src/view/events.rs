//! Terminal events translated into [`DisplayEvent`]s.
//!
//! Buttons follow the X numbering: left 1, middle 2, right 3, wheel up and
//! down 4 and 5, wheel left and right 6 and 7. Wheel steps carry no release,
//! so they are reported as releases straight away. Keys are named by their
//! X keysym so action strings read the same as they would under X.

use crate::model::DisplayEvent;
use crossbeam_channel::Sender;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

/// How long the pump waits for an event before checking for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Translate one terminal event. Events with no meaning for the bar yield `None`.
pub fn translate(event: Event) -> Option<DisplayEvent> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(width, height) => Some(DisplayEvent::Resize { width, height }),
        Event::FocusGained => Some(DisplayEvent::Expose),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<DisplayEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(DisplayEvent::Interrupt);
    }
    keysym_name(key.code).map(DisplayEvent::Key)
}

/// X keysym name for a key code.
pub fn keysym_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Esc => "Escape",
        KeyCode::Enter => "Return",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::PageUp => "Prior",
        KeyCode::PageDown => "Next",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::Tab => "Tab",
        KeyCode::BackTab => "ISO_Left_Tab",
        KeyCode::Backspace => "BackSpace",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::F(n) => return Some(format!("F{n}")),
        _ => return None,
    };
    Some(name.to_string())
}

fn translate_mouse(mouse: MouseEvent) -> Option<DisplayEvent> {
    let x = i32::from(mouse.column);
    let y = i32::from(mouse.row);
    let button = match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            return Some(DisplayEvent::Motion { x, y });
        }
        MouseEventKind::Down(_) => return None,
        MouseEventKind::Up(button) => button_number(button),
        MouseEventKind::ScrollUp => 4,
        MouseEventKind::ScrollDown => 5,
        MouseEventKind::ScrollLeft => 6,
        MouseEventKind::ScrollRight => 7,
    };
    Some(DisplayEvent::ButtonRelease { button, x, y })
}

fn button_number(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
    }
}

/// Thread reading terminal events and forwarding the translated ones.
///
/// The thread exits when the receiver is gone, when reading fails, or when
/// the pump is dropped. A failed read is logged and closes the channel,
/// which the event loop treats as losing the display.
pub struct EventPump {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EventPump {
    /// Start forwarding into `tx`.
    pub fn spawn(tx: Sender<DisplayEvent>) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("dzbar-events".to_string())
            .spawn(move || pump(&tx, &flag))?;
        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }
}

fn pump(tx: &Sender<DisplayEvent>, stop: &AtomicBool) {
    while !stop.load(Ordering::Relaxed) {
        let ready = match event::poll(POLL_INTERVAL) {
            Ok(ready) => ready,
            Err(e) => {
                error!("terminal event poll failed: {e}");
                return;
            }
        };
        if !ready {
            continue;
        }
        let event = match event::read() {
            Ok(event) => event,
            Err(e) => {
                error!("terminal event read failed: {e}");
                return;
            }
        };
        let Some(event) = translate(event) else {
            continue;
        };
        if tx.send(event).is_err() {
            debug!("display receiver gone, event pump exiting");
            return;
        }
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
