use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use indoc::indoc;
use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use tracing::{Level, debug, error, info, trace, warn};

use companion_overlay::clipboard::SystemClipboard;
use companion_overlay::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use companion_overlay::drivers::{InputDriver, OutputDriver};
use companion_overlay::event_loop::{ControlFlow, EventLoop};
use companion_overlay::host::{self, Host, HostError};
use companion_overlay::keybindings::{Action, KeyBindings};
use companion_overlay::render::render_surface;
use companion_overlay::{
    CellSurface, ConfirmOptions, Locale, MenuItem, OverlayConfig, OverlayKind, OverlayManager,
    Point, PopupOptions, PromptOptions, Role, Surface, theme,
};

type Manager = OverlayManager<CellSurface>;

const BADGE: &str = " companion ";

const POPUP_BODY: &str = indoc! {"
    Drag the title bar to move this window.
    Right click anywhere for the plugin menu.
    Click the badge or press Ctrl+P to toggle this window.
    Esc closes it, Ctrl+Q deactivates the plugin.
"};

/// Terminal stand-in for a desktop companion host.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Language of default titles and button labels.
    #[arg(long, value_enum, default_value_t = Locale::English)]
    locale: Locale,
    /// Keep the popup open when Escape is pressed.
    #[arg(long)]
    no_escape: bool,
    /// Append logs to this file instead of printing them on exit.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Interval between deferred-work ticks, in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Gap kept between a clamped overlay and the viewport edge.
    #[arg(long, default_value_t = companion_overlay::constants::VIEWPORT_MARGIN)]
    margin: i32,
}

/// Host bindings backed by the terminal: the last reported pointer position
/// and the system clipboard.
#[derive(Debug, Default)]
struct TerminalHost {
    pointer: Option<Point>,
    clipboard: SystemClipboard,
}

impl Host for TerminalHost {
    fn log(&mut self, level: Level, message: &str) {
        match level {
            Level::ERROR => error!("{message}"),
            Level::WARN => warn!("{message}"),
            Level::INFO => info!("{message}"),
            Level::DEBUG => debug!("{message}"),
            Level::TRACE => trace!("{message}"),
        }
    }

    fn mouse_position(&mut self) -> Result<Point, HostError> {
        self.pointer.ok_or(HostError::Unavailable("mouse_position"))
    }

    fn read_clipboard(&mut self) -> Result<String, HostError> {
        Ok(self.clipboard.read()?)
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), HostError> {
        Ok(self.clipboard.write(text)?)
    }
}

fn badge_rect(area: Rect) -> Rect {
    let width = (BADGE.len() as u16).min(area.width);
    Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y + area.height.saturating_sub(1),
        width,
        height: area.height.min(1),
    }
}

fn draw(frame: &mut Frame, manager: &Manager) {
    let badge = badge_rect(frame.area());
    frame.render_widget(
        Paragraph::new(BADGE).style(theme::title_bar_style()),
        badge,
    );
    render_surface(frame, manager.surface());
}

fn popup_title(manager: &Manager) -> Option<String> {
    let handle = manager.handle_for(OverlayKind::WindowPopup)?;
    let node = manager.node_of(handle)?;
    manager
        .surface()
        .root(node)
        .and_then(|root| root.find(Role::Title))
        .map(|title| title.text.clone())
}

fn toggle_popup(manager: &mut Manager, host: &mut TerminalHost, close_on_escape: bool) {
    if manager.close_kind(OverlayKind::WindowPopup) {
        return;
    }
    let anchor = host::anchor_from_host(host);
    manager.open_window_popup(
        POPUP_BODY,
        anchor,
        PopupOptions::default()
            .close_on_escape(close_on_escape)
            .on_close(|_| info!("main view closed")),
    );
    host.log(Level::INFO, "main view opened");
}

fn set_popup_title(manager: &mut Manager, name: &str) {
    let node = manager
        .handle_for(OverlayKind::WindowPopup)
        .and_then(|handle| manager.node_of(handle));
    if let Some(node) = node {
        manager.surface_mut().set_text(node, Role::Title, name);
        info!(%name, "window renamed");
    }
}

fn rename_popup(manager: &mut Manager) {
    let current =
        popup_title(manager).unwrap_or_else(|| manager.config().labels.popup_title.clone());
    manager.open_prompt_dialog(
        "Rename window",
        current,
        Some(Box::new(|manager: &mut Manager, name: String| {
            set_popup_title(manager, &name);
        })),
        PromptOptions::default().on_cancel(|_| debug!("rename cancelled")),
    );
}

fn open_plugin_menu(manager: &mut Manager, anchor: Point, host: Rc<RefCell<TerminalHost>>) {
    let items = vec![
        MenuItem::new("Reset window…").on_select(|manager: &mut Manager| {
            manager.open_confirm_dialog(
                "Close the window and discard its position?",
                Some(Box::new(|manager: &mut Manager| {
                    manager.close_kind(OverlayKind::WindowPopup);
                })),
                ConfirmOptions::default()
                    .confirm_text("Reset")
                    .confirm_color(Color::Red),
            );
        }),
        MenuItem::new("Rename window…").on_select(rename_popup),
        MenuItem::new("Copy title").on_select({
            let host = Rc::clone(&host);
            move |manager: &mut Manager| {
                let title = popup_title(manager)
                    .unwrap_or_else(|| manager.config().labels.popup_title.clone());
                host::copy_text(&mut *host.borrow_mut(), &title);
            }
        }),
        MenuItem::new("Paste title").on_select(move |manager: &mut Manager| {
            let pasted = host.borrow_mut().read_clipboard();
            match pasted {
                Ok(text) if !text.trim().is_empty() => set_popup_title(manager, text.trim()),
                Ok(_) => debug!("clipboard empty, title kept"),
                Err(err) => warn!(%err, "paste failed"),
            }
        }),
        MenuItem::new("Deactivate")
            .style(Style::default().fg(Color::Red))
            .on_select(|manager: &mut Manager| {
                manager.close_all();
            }),
    ];
    manager.open_context_menu(anchor, items);
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let logs = companion_overlay::tracing_sub::init(args.log_file.as_deref())?;

    let keys = KeyBindings::default();
    let close_on_escape = !args.no_escape;
    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    input.set_mouse_capture(true)?;

    let (cols, rows) = crossterm::terminal::size()?;
    let mut manager = OverlayManager::with_config(
        CellSurface::new(Size::new(cols, rows)),
        OverlayConfig::new(args.locale).with_margin(args.margin),
    );
    let host = Rc::new(RefCell::new(TerminalHost::default()));
    info!(
        locale = ?args.locale,
        deactivate = ?keys.combos_for(Action::Deactivate),
        "companion host started"
    );

    let mut event_loop = EventLoop::new(input, Duration::from_millis(args.tick_ms));
    let result = event_loop.run(|_, event| {
        let Some(event) = event else {
            manager.tick();
            output.draw(|frame| draw(frame, &manager))?;
            return Ok(ControlFlow::Continue);
        };
        match &event {
            Event::Key(key) if keys.matches(Action::Deactivate, key) => {
                let closed = manager.close_all();
                info!(closed, "deactivated");
                return Ok(ControlFlow::Quit);
            }
            Event::Resize(cols, rows) => {
                manager.surface_mut().resize(Size::new(*cols, *rows));
            }
            Event::Mouse(mouse) => {
                host.borrow_mut().pointer = Some(Point::from((mouse.column, mouse.row)));
            }
            _ => {}
        }
        // clicks that land on an overlay belong to it
        let on_overlay = match &event {
            Event::Mouse(mouse) => manager
                .surface()
                .hit_test(Point::from((mouse.column, mouse.row)))
                .is_some(),
            _ => false,
        };
        let consumed = manager.handle_event(&event);
        match &event {
            Event::Mouse(mouse) if !on_overlay => {
                let point = Point::from((mouse.column, mouse.row));
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        let viewport = manager.surface().viewport();
                        let badge = badge_rect(Rect::new(0, 0, viewport.width, viewport.height));
                        if badge.contains((mouse.column, mouse.row).into()) {
                            let mut host = host.borrow_mut();
                            toggle_popup(&mut manager, &mut host, close_on_escape);
                        }
                    }
                    MouseEventKind::Down(MouseButton::Right) => {
                        open_plugin_menu(&mut manager, point, Rc::clone(&host));
                    }
                    _ => {}
                }
            }
            Event::Key(key)
                if !consumed
                    && key.code == KeyCode::Char('p')
                    && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                toggle_popup(&mut manager, &mut host.borrow_mut(), close_on_escape);
            }
            _ => {}
        }
        Ok(ControlFlow::Continue)
    });

    output.exit()?;
    logs.flush_to(&mut io::stderr())?;
    result
}
