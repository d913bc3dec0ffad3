//! Application state and its transitions.
//!
//! [`AppState`] is the single context value threaded through the event loop.
//! It owns everything that changes while the bar runs: the body store, the
//! header text and its click regions, the resolved layout, the window flags
//! and the exit code. The loop thread is the only writer.
//!
//! Action steps are carried out by the inner [`Bar`], which implements
//! [`StepExecutor`]. Keeping the [`ActionTable`] outside of it lets a
//! dispatch borrow the table and the executor at the same time.

use super::line_store::LineStore;
use super::router::{LineRouter, Route};
use super::signals::Notification;
use crate::config::{ActionTable, Alignment, Flow, MenuMode, Options, StepExecutor};
use crate::model::{ActionStep, DisplayEvent, Trigger};
use crate::parser::{self, Markup};
use crate::runner::CommandRunner;
use crate::source::LineChomper;
use crate::view_state::{select_screen, Area, ClickRegionRegistry, GeometryRequest, Layout, WindowId};
use ratatui::style::Color;
use std::time::Duration;
use tracing::{debug, info};

// ===== Window flags =====

/// Visibility and input flags of the two windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowFlags {
    /// Header drawn and receiving pointer events.
    pub title_mapped: bool,
    /// Body drawn and receiving pointer events.
    pub slave_mapped: bool,
    /// `collapse` is ignored while set.
    pub sticky: bool,
    /// Key presses are dispatched while set.
    pub keys_grabbed: bool,
}

/// Where the pointer was at the last motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Hover {
    title: bool,
    slave: bool,
    /// Visible body line under the pointer, menu mode only.
    line: Option<usize>,
}

/// What the loop should do once input has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EofOutcome {
    /// Stop running.
    Stop,
    /// Keep running without input; stop after the duration if one is given.
    Idle(Option<Duration>),
}

// ===== Scene =====

/// Borrowed snapshot of everything the renderer draws.
#[derive(Debug)]
pub struct Scene<'a> {
    /// Window placement.
    pub layout: &'a Layout,
    /// Header markup, `None` while the header is unmapped.
    pub header: Option<&'a Markup>,
    /// Header text alignment.
    pub title_align: Alignment,
    /// Body contents, `None` while the body is unmapped or absent.
    pub body: Option<BodyScene<'a>>,
    /// Default text colour.
    pub foreground: Color,
    /// Default fill colour.
    pub background: Color,
}

/// Visible part of the body.
#[derive(Debug)]
pub struct BodyScene<'a> {
    /// Lines in the view window, top first.
    pub lines: &'a [String],
    /// Visible line highlighted under the pointer.
    pub highlighted: Option<usize>,
    /// Line text alignment.
    pub align: Alignment,
}

// ===== Bar =====

/// Everything an action step can touch.
#[derive(Debug)]
struct Bar<R> {
    store: LineStore,
    regions: ClickRegionRegistry,
    layout: Layout,
    request: GeometryRequest,
    screen_index: i32,
    header_markup: Markup,
    windows: WindowFlags,
    hover: Hover,
    /// Absolute store index of the selected menu line.
    selected: Option<usize>,
    menu: MenuMode,
    title_align: Alignment,
    slave_align: Alignment,
    foreground: Color,
    background: Color,
    running: bool,
    exit_code: i32,
    dirty: bool,
    runner: R,
}

impl<R: CommandRunner> Bar<R> {
    fn has_body(&self) -> bool {
        self.store.max_lines() > 0
    }

    fn horizontal(&self) -> bool {
        self.menu.is_horizontal()
    }

    fn set_header(&mut self, text: &str) {
        self.header_markup = Markup::parse(text);
        self.refresh_header();
        self.dirty = true;
    }

    /// Refit the header to its text and rebuild the click regions.
    fn refresh_header(&mut self) {
        let text_width = self.header_markup.width();
        self.layout.fit_title(text_width);
        let title = self.layout.title;
        let xorig = self.title_align.offset(clamp_u16(title.width), text_width);
        self.regions.rebuild(&self.header_markup, xorig, title.height);
    }

    fn resize(&mut self, width: u16, height: u16) {
        let screen = select_screen(
            &[Area::new(0, 0, i32::from(width), i32::from(height))],
            self.screen_index,
        );
        self.layout = Layout::resolve(screen, &self.request);
        self.refresh_header();
        self.hover.line = None;
        self.dirty = true;
    }

    fn append_body(&mut self, text: String) {
        let outcome = self.store.append(text, self.windows.slave_mapped);
        if outcome.cleared {
            self.selected = None;
        }
        if outcome.redraw {
            self.dirty = true;
        }
    }

    fn clear_body(&mut self) {
        self.store.reset();
        self.selected = None;
        self.hover.line = None;
        self.dirty = true;
    }

    /// Mapped window under the point; the header wins where they overlap.
    fn window_at(&self, x: i32, y: i32) -> Option<WindowId> {
        if self.windows.title_mapped && self.layout.title.contains(x, y) {
            return Some(WindowId::Title);
        }
        if self.has_body() && self.windows.slave_mapped && self.layout.slave.contains(x, y) {
            return Some(WindowId::Slave);
        }
        None
    }

    /// Visible body line under the point, if it holds a line.
    fn visible_line_at(&self, x: i32, y: i32) -> Option<usize> {
        self.layout
            .line_at(x, y)
            .filter(|&i| i < self.store.visible_range().len())
    }

    fn collapse(&mut self) {
        if !self.has_body() || self.windows.sticky || self.horizontal() {
            return;
        }
        if self.windows.slave_mapped {
            self.windows.slave_mapped = false;
            self.hover.slave = false;
            self.hover.line = None;
            self.dirty = true;
        }
    }

    fn uncollapse(&mut self) {
        if self.has_body() && !self.windows.slave_mapped {
            self.windows.slave_mapped = true;
            self.dirty = true;
        }
    }

    fn set_title_hidden(&mut self, hidden: bool) {
        if self.horizontal() || self.windows.title_mapped != hidden {
            return;
        }
        self.windows.title_mapped = !hidden;
        if hidden {
            self.hover.title = false;
        }
        self.dirty = true;
    }

    /// Selected menu line with its markup stripped.
    fn selected_text(&self) -> Option<String> {
        if !self.menu.is_menu() {
            return None;
        }
        self.selected
            .and_then(|i| self.store.get(i))
            .map(parser::strip)
    }

    fn scrolled(&mut self, moved: bool) {
        if moved {
            self.dirty = true;
        }
    }
}

impl<R: CommandRunner> StepExecutor for Bar<R> {
    fn execute(&mut self, step: &ActionStep) -> Flow {
        match step {
            ActionStep::Exit(code) => {
                info!(code, "exit requested");
                self.exit_code = *code;
                self.running = false;
                return Flow::Stop;
            }
            ActionStep::Exec(command) => self.runner.spawn(command),
            ActionStep::Print(text) => self.runner.print(text),

            // Scrolling
            ActionStep::ScrollUp(n) => {
                let moved = self.store.scroll_up(*n);
                self.scrolled(moved);
            }
            ActionStep::ScrollDown(n) => {
                let moved = self.store.scroll_down(*n);
                self.scrolled(moved);
            }
            ActionStep::ScrollHome => {
                let moved = self.store.scroll_home();
                self.scrolled(moved);
            }

            // Body visibility
            ActionStep::Collapse => self.collapse(),
            ActionStep::Uncollapse => self.uncollapse(),
            ActionStep::ToggleCollapse => {
                if self.windows.slave_mapped {
                    self.collapse();
                } else {
                    self.uncollapse();
                }
            }
            ActionStep::Stick => self.windows.sticky = true,
            ActionStep::Unstick => self.windows.sticky = false,
            ActionStep::ToggleSticky => self.windows.sticky = !self.windows.sticky,

            // Header visibility
            ActionStep::Hide => self.set_title_hidden(true),
            ActionStep::Unhide => self.set_title_hidden(false),
            ActionStep::ToggleHide => {
                let hidden = self.windows.title_mapped;
                self.set_title_hidden(hidden);
            }

            ActionStep::GrabKeys => self.windows.keys_grabbed = true,
            ActionStep::UngrabKeys => self.windows.keys_grabbed = false,

            // Menu
            ActionStep::MenuExec => {
                if let Some(command) = self.selected_text() {
                    self.runner.spawn(&command);
                }
            }
            ActionStep::MenuPrint => {
                if let Some(text) = self.selected_text() {
                    self.runner.print(&text);
                }
            }
        }
        Flow::Continue
    }
}

fn clamp_u16(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}

// ===== AppState =====

/// Complete bar state, owned by the event loop.
#[derive(Debug)]
pub struct AppState<R: CommandRunner> {
    actions: ActionTable,
    router: LineRouter,
    chomper: LineChomper,
    persistent: bool,
    idle_timeout: u64,
    exit_ran: bool,
    bar: Bar<R>,
}

impl<R: CommandRunner> AppState<R> {
    /// Build the initial state for `opts`, fitted to `screen`.
    ///
    /// The header starts mapped and the body collapsed, except in a
    /// horizontal menu where the body replaces the header and stays put.
    pub fn new(opts: &Options, screen: Area, runner: R) -> Self {
        let request = GeometryRequest::from_options(opts);
        let layout = Layout::resolve(screen, &request);
        let horizontal = opts.menu.is_horizontal();
        let has_body = opts.max_lines > 0;
        let actions = opts.action_table();
        debug!(entries = actions.len(), "action table compiled");

        let mut bar = Bar {
            store: LineStore::new(opts.max_lines),
            regions: ClickRegionRegistry::new(),
            layout,
            request,
            screen_index: opts.screen,
            header_markup: Markup::default(),
            windows: WindowFlags {
                title_mapped: !horizontal,
                slave_mapped: horizontal && has_body,
                sticky: horizontal,
                keys_grabbed: false,
            },
            hover: Hover::default(),
            selected: None,
            menu: opts.menu,
            title_align: opts.title_align,
            slave_align: opts.slave_align,
            foreground: opts.foreground,
            background: opts.background,
            running: true,
            exit_code: 0,
            dirty: true,
            runner,
        };
        bar.refresh_header();

        Self {
            actions,
            router: LineRouter::new(opts.max_lines, opts.update_mode, horizontal),
            chomper: LineChomper::new(),
            persistent: opts.persistent,
            idle_timeout: opts.idle_timeout,
            exit_ran: false,
            bar,
        }
    }

    /// Run the `onstart` sequence.
    pub fn start(&mut self) {
        self.dispatch(&Trigger::OnStart);
    }

    fn dispatch(&mut self, trigger: &Trigger) -> usize {
        self.actions.dispatch(trigger, &mut self.bar)
    }

    // ===== Input =====

    /// Handle one chunk of input: split it into lines and route each one.
    ///
    /// `onnewinput` runs once per chunk that appended body lines.
    pub fn handle_chunk(&mut self, chunk: &[u8]) {
        let lines = self.chomper.feed(chunk);
        let mut appended = false;
        for line in lines {
            appended |= self.route_line(line.to_text());
        }
        self.after_input(appended);
    }

    /// Input ended. A pending unterminated fragment becomes the last line.
    pub fn handle_eof(&mut self) -> EofOutcome {
        if let Some(last) = self.chomper.finish() {
            let appended = self.route_line(last.to_text());
            self.after_input(appended);
        }
        if self.persistent {
            let timeout = (self.idle_timeout > 0).then(|| Duration::from_secs(self.idle_timeout));
            info!(?timeout, "input closed, staying up");
            EofOutcome::Idle(timeout)
        } else {
            info!("input closed");
            self.bar.running = false;
            EofOutcome::Stop
        }
    }

    /// Returns whether the line was appended to the body.
    fn route_line(&mut self, line: String) -> bool {
        match self.router.route(line) {
            Route::Header(text) => {
                self.bar.set_header(&text);
                false
            }
            Route::Body(text) => {
                self.bar.append_body(text);
                true
            }
            Route::ClearBody => {
                self.bar.clear_body();
                false
            }
        }
    }

    fn after_input(&mut self, appended: bool) {
        if appended && self.bar.has_body() {
            self.dispatch(&Trigger::OnNewInput);
        }
    }

    // ===== Display events =====

    /// Apply one display event.
    pub fn handle_display(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::Expose => self.bar.dirty = true,
            DisplayEvent::Resize { width, height } => self.bar.resize(width, height),
            DisplayEvent::Motion { x, y } => self.pointer_moved(x, y),
            DisplayEvent::ButtonRelease { button, x, y } => self.button_released(button, x, y),
            DisplayEvent::Key(keysym) => {
                if self.bar.windows.keys_grabbed {
                    self.dispatch(&Trigger::Key(keysym));
                } else {
                    debug!("key {keysym} ignored, keys not grabbed");
                }
            }
            DisplayEvent::Interrupt => {
                info!("interrupted from terminal");
                self.stop();
            }
        }
    }

    fn pointer_moved(&mut self, x: i32, y: i32) {
        let window = self.bar.window_at(x, y);
        let in_title = window == Some(WindowId::Title);
        let in_slave = window == Some(WindowId::Slave);

        let line = if in_slave && self.bar.menu.is_menu() {
            self.bar.visible_line_at(x, y)
        } else {
            None
        };
        if line != self.bar.hover.line {
            self.bar.hover.line = line;
            self.bar.dirty = true;
        }

        let before = self.bar.hover;
        self.bar.hover.title = in_title;
        self.bar.hover.slave = in_slave;

        // Leaves before enters, as a pointer crossing windows reports them
        if before.title && !in_title {
            self.dispatch(&Trigger::LeaveTitle);
        }
        if before.slave && !in_slave {
            self.dispatch(&Trigger::LeaveSlave);
        }
        if !before.title && in_title {
            self.dispatch(&Trigger::EnterTitle);
        }
        if !before.slave && in_slave {
            self.dispatch(&Trigger::EnterSlave);
        }
    }

    fn button_released(&mut self, button: u8, x: i32, y: i32) {
        let Some(window) = self.bar.window_at(x, y) else {
            debug!(x, y, "click outside the bar");
            return;
        };

        if window == WindowId::Slave && self.bar.menu.is_menu() {
            if let Some(i) = self.bar.visible_line_at(x, y) {
                self.bar.selected = Some(self.bar.store.first_visible() + i);
            }
        }

        if window == WindowId::Title {
            let title = self.bar.layout.title;
            let command = self
                .bar
                .regions
                .hit_test(WindowId::Title, x - title.x, y - title.y, button)
                .map(str::to_string);
            if let Some(command) = command {
                debug!(button, "click area hit");
                self.bar.runner.spawn(&command);
                return;
            }
        }

        if let Some(trigger) = Trigger::button(button) {
            self.dispatch(&trigger);
        }
    }

    // ===== Notifications and shutdown =====

    /// Handle a delivered notification.
    pub fn handle_notification(&mut self, notification: Notification) {
        match notification.trigger() {
            Some(trigger) => {
                self.dispatch(&trigger);
            }
            None => {
                info!("termination requested");
                self.stop();
            }
        }
    }

    /// Stop the loop, keeping the exit code.
    pub fn stop(&mut self) {
        self.bar.running = false;
    }

    /// Run `onexit` (at most once) and return the exit code.
    pub fn shutdown(&mut self) -> i32 {
        self.bar.running = false;
        if !self.exit_ran {
            self.exit_ran = true;
            self.dispatch(&Trigger::OnExit);
        }
        self.bar.exit_code
    }

    // ===== Accessors =====

    /// Whether the loop should keep going.
    pub fn is_running(&self) -> bool {
        self.bar.running
    }

    /// Last exit code recorded by an `exit` step.
    pub fn exit_code(&self) -> i32 {
        self.bar.exit_code
    }

    /// Returns whether a redraw is due, clearing the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.bar.dirty)
    }

    /// The compiled action table.
    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Body store.
    pub fn store(&self) -> &LineStore {
        &self.bar.store
    }

    /// Header click regions.
    pub fn regions(&self) -> &ClickRegionRegistry {
        &self.bar.regions
    }

    /// Current window placement.
    pub fn layout(&self) -> &Layout {
        &self.bar.layout
    }

    /// Window flags.
    pub fn windows(&self) -> WindowFlags {
        self.bar.windows
    }

    /// Plain text of the header.
    pub fn header_text(&self) -> String {
        self.bar.header_markup.plain_text()
    }

    /// Absolute store index of the selected menu line.
    pub fn selected(&self) -> Option<usize> {
        self.bar.selected
    }

    /// Visible body line under the pointer.
    pub fn highlighted(&self) -> Option<usize> {
        self.bar.hover.line
    }

    /// Command runner.
    pub fn runner(&self) -> &R {
        &self.bar.runner
    }

    /// Mutable command runner.
    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.bar.runner
    }

    /// Snapshot for the renderer.
    pub fn scene(&self) -> Scene<'_> {
        let bar = &self.bar;
        let body = (bar.has_body() && bar.windows.slave_mapped).then(|| BodyScene {
            lines: bar.store.visible_lines(),
            highlighted: bar.hover.line,
            align: bar.slave_align,
        });
        Scene {
            layout: &bar.layout,
            header: bar.windows.title_mapped.then_some(&bar.header_markup),
            title_align: bar.title_align,
            body,
            foreground: bar.foreground,
            background: bar.background,
        }
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
