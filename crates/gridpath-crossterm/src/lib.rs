//! Crossterm terminal driver for gridpath.
//!
//! [`CrosstermDriver`] implements [`gridpath_core::Driver`], translating
//! terminal events into [`Msg`]s and diffed frames into queued terminal
//! commands. When the event poll times out it emits [`Msg::Tick`], which is
//! what drives the visualizer's animation.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind},
    execute, queue,
    style::{Attribute, Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use gridpath_core::{
    app::{Context, Driver},
    grid::Frame,
    messages::{Key, ModMask, MouseAction, Msg},
    style::{AttrMask, Color},
    Point,
};

/// Current terminal size in character cells, as `(width, height)`.
pub fn terminal_size() -> io::Result<(i32, i32)> {
    let (w, h) = terminal::size()?;
    Ok((w as i32, h as i32))
}

/// Maps a [`gridpath_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

/// Maps crossterm key modifiers to [`ModMask`].
fn to_mod_mask(mods: KeyModifiers) -> ModMask {
    let mut m = ModMask::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        m = m | ModMask::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        m = m | ModMask::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        m = m | ModMask::ALT;
    }
    m
}

/// Maps a crossterm [`KeyCode`] to a [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// A terminal back-end using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
    frame_interval: Duration,
}

impl CrosstermDriver {
    /// Create a new driver with mouse capture enabled and a ~60 Hz tick.
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            frame_interval: Duration::from_millis(16),
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Configure the tick interval.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // Wait for input for up to one frame interval; a timeout is the
        // animation-frame tick.
        if !event::poll(self.frame_interval)? {
            tx.send(Msg::tick()).ok();
            return Ok(());
        }

        // Drain whatever is already queued, then let the app repaint.
        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(msg) = translate(event::read()?) {
                tx.send(msg).ok();
            }
        }
        // Input still advances the animation: a held drag would otherwise
        // starve the tick stream.
        tx.send(Msg::tick()).ok();

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout();

        for fc in &frame.cells {
            let p = fc.pos;
            let cell = &fc.cell;

            queue!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg)),
            )?;

            let attrs = cell.style.attrs;
            if attrs.contains(AttrMask::BOLD) {
                queue!(stdout, SetAttribute(Attribute::Bold))?;
            }
            if attrs.contains(AttrMask::REVERSE) {
                queue!(stdout, SetAttribute(Attribute::Reverse))?;
            }
            if attrs.contains(AttrMask::DIM) {
                queue!(stdout, SetAttribute(Attribute::Dim))?;
            }

            write!(stdout, "{}", cell.ch)?;

            if !attrs.is_empty() {
                queue!(stdout, SetAttribute(Attribute::Reset))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Translate a crossterm event into a [`Msg`].
fn translate(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        }) => to_key(code).map(|key| Msg::KeyDown {
            key,
            modifiers: to_mod_mask(modifiers),
            time: Instant::now(),
        }),
        Event::Mouse(me) => {
            let pos = Point::new(me.column as i32, me.row as i32);
            let modifiers = to_mod_mask(me.modifiers);
            let action = match me.kind {
                MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
                MouseEventKind::Down(_) => MouseAction::Secondary,
                MouseEventKind::Up(_) => MouseAction::Release,
                MouseEventKind::Drag(_) | MouseEventKind::Moved => MouseAction::Move,
                _ => return None,
            };
            Some(Msg::Mouse {
                action,
                pos,
                modifiers,
                time: Instant::now(),
            })
        }
        Event::Resize(w, h) => Some(Msg::Screen {
            width: w as i32,
            height: h as i32,
            time: Instant::now(),
        }),
        _ => None,
    }
}
