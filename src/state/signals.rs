//! Out-of-band notifications: termination and the two user signals.
//!
//! Signal delivery only records a flag and wakes the event loop; the loop
//! collects pending flags with [`Notifications::take`] at the top of each
//! iteration and runs the bound actions on its own thread.

use crate::config::ActionTable;
use crate::model::Trigger;
use crossbeam_channel::Sender;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM, SIGUSR1, SIGUSR2};
use signal_hook::iterator::{Handle, Signals};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Kind of notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Shut down gracefully (SIGTERM, SIGINT, SIGHUP, or Ctrl+C on the terminal).
    Terminate,
    /// SIGUSR1.
    User1,
    /// SIGUSR2.
    User2,
}

impl Notification {
    /// Order in which pending notifications are handled.
    const ALL: [Self; 3] = [Self::User1, Self::User2, Self::Terminate];

    fn index(self) -> usize {
        match self {
            Self::Terminate => 0,
            Self::User1 => 1,
            Self::User2 => 2,
        }
    }

    /// Signals that deliver this notification.
    pub fn signals(self) -> &'static [i32] {
        match self {
            Self::Terminate => &[SIGTERM, SIGINT, SIGHUP],
            Self::User1 => &[SIGUSR1],
            Self::User2 => &[SIGUSR2],
        }
    }

    /// Notification delivered by a signal number.
    pub fn from_signal(signal: i32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.signals().contains(&signal))
    }

    /// Trigger dispatched for this notification; termination has none.
    pub fn trigger(self) -> Option<Trigger> {
        match self {
            Self::Terminate => None,
            Self::User1 => Some(Trigger::SigUsr1),
            Self::User2 => Some(Trigger::SigUsr2),
        }
    }

    /// Notifications worth hooking for a table: termination always, the
    /// user signals only when something is bound to them.
    pub fn wanted(table: &ActionTable) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|kind| kind.trigger().is_none_or(|t| table.contains(&t)))
            .collect()
    }
}

/// Pending-notification flags shared with the signal watcher.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    flags: Arc<[AtomicBool; 3]>,
}

impl Notifications {
    /// Create with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a notification pending.
    pub fn raise(&self, kind: Notification) {
        self.flags[kind.index()].store(true, Ordering::SeqCst);
    }

    /// Whether a notification is pending.
    pub fn is_pending(&self, kind: Notification) -> bool {
        self.flags[kind.index()].load(Ordering::SeqCst)
    }

    /// Collect and clear every pending notification.
    pub fn take(&self) -> Vec<Notification> {
        Notification::ALL
            .into_iter()
            .filter(|kind| self.flags[kind.index()].swap(false, Ordering::SeqCst))
            .collect()
    }
}

/// Thread turning delivered signals into notification flags plus a wake-up.
///
/// Dropping the watcher unhooks the signals and joins the thread.
pub struct SignalWatcher {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
    hooked: Vec<Notification>,
}

impl SignalWatcher {
    /// Hook the signals for `kinds`.
    ///
    /// A signal that cannot be hooked is logged and skipped; its
    /// notification stays inert.
    ///
    /// # Errors
    ///
    /// Fails only if the signal iterator or its thread cannot be created.
    pub fn spawn(
        kinds: &[Notification],
        notifications: Notifications,
        wake: Sender<()>,
    ) -> std::io::Result<Self> {
        let signals = Signals::new(std::iter::empty::<i32>())?;
        let mut hooked = Vec::new();
        for &kind in kinds {
            let mut ok = true;
            for &signal in kind.signals() {
                if let Err(e) = signals.add_signal(signal) {
                    warn!("error hooking signal {signal} for {kind:?}: {e}");
                    ok = false;
                }
            }
            if ok {
                hooked.push(kind);
            }
        }

        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("dzbar-signals".to_string())
            .spawn(move || {
                let mut signals = signals;
                for signal in signals.forever() {
                    let Some(kind) = Notification::from_signal(signal) else {
                        continue;
                    };
                    debug!("signal {signal} received");
                    notifications.raise(kind);
                    // A full channel already holds a pending wake-up
                    let _ = wake.try_send(());
                }
            })?;

        Ok(Self {
            handle,
            thread: Some(thread),
            hooked,
        })
    }

    /// Notifications whose signals were all hooked.
    pub fn hooked(&self) -> &[Notification] {
        &self.hooked
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;

    #[test]
    fn take_clears_pending_flags_in_order() {
        let notifications = Notifications::new();
        notifications.raise(Notification::Terminate);
        notifications.raise(Notification::User2);
        assert!(notifications.is_pending(Notification::User2));

        assert_eq!(
            notifications.take(),
            vec![Notification::User2, Notification::Terminate]
        );
        assert!(notifications.take().is_empty());
    }

    #[test]
    fn clones_share_flags() {
        let notifications = Notifications::new();
        let handler_side = notifications.clone();
        handler_side.raise(Notification::User1);
        assert_eq!(notifications.take(), vec![Notification::User1]);
    }

    #[test]
    fn signal_numbers_map_to_kinds() {
        assert_eq!(Notification::from_signal(SIGTERM), Some(Notification::Terminate));
        assert_eq!(Notification::from_signal(SIGUSR1), Some(Notification::User1));
        assert_eq!(Notification::from_signal(SIGUSR2), Some(Notification::User2));
        assert_eq!(Notification::from_signal(0), None);
    }

    #[test]
    fn user_signals_wanted_only_when_bound() {
        let table = ActionTable::parse("sigusr1=scrollup");
        assert_eq!(
            Notification::wanted(&table),
            vec![Notification::User1, Notification::Terminate]
        );
        assert_eq!(
            Notification::wanted(&ActionTable::default()),
            vec![Notification::Terminate]
        );
    }

    #[test]
    #[serial(signals)]
    fn delivered_signal_raises_flag_and_wakes() {
        let notifications = Notifications::new();
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
        let watcher = SignalWatcher::spawn(&[Notification::User2], notifications.clone(), wake_tx)
            .expect("watcher starts");
        assert_eq!(watcher.hooked(), &[Notification::User2]);

        signal_hook::low_level::raise(SIGUSR2).expect("raise");

        wake_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("woken by signal");
        assert_eq!(notifications.take(), vec![Notification::User2]);
        drop(watcher);
    }
}
