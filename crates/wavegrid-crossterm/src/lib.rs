//! Crossterm renderer for wavegrid.
//!
//! [`CrosstermRenderer`] draws a [`GridStore`] one character per cell and
//! then keeps it current from [`TickEvent`]s, repainting only the cells each
//! tick claimed. It writes to any [`Write`] sink; [`CrosstermRenderer::stdout`]
//! additionally takes over the terminal (raw mode, alternate screen) until
//! [`close`](CrosstermRenderer::close).

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color as CtColor, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use wavegrid_core::Point;
use wavegrid_paths::{Cell, GridStore, Owner, Route, TickEvent, TickOutcome};

/// A character and its foreground colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub fg: CtColor,
}

impl Glyph {
    const fn new(ch: char, fg: CtColor) -> Self {
        Self { ch, fg }
    }
}

pub const EMPTY: Glyph = Glyph::new('·', CtColor::DarkGrey);
pub const OBSTRUCTION: Glyph = Glyph::new('#', CtColor::Red);
pub const START_ANCHOR: Glyph = Glyph::new('S', CtColor::Green);
pub const FINISH_ANCHOR: Glyph = Glyph::new('F', CtColor::Blue);
pub const START_CLAIM: Glyph = Glyph::new('o', CtColor::DarkGreen);
pub const FINISH_CLAIM: Glyph = Glyph::new('o', CtColor::DarkBlue);
pub const ROUTE: Glyph = Glyph::new('*', CtColor::Yellow);

/// The glyph for a cell's content.
pub fn glyph_for(cell: Cell) -> Glyph {
    match cell {
        Cell::Empty => EMPTY,
        Cell::Obstruction => OBSTRUCTION,
        Cell::Mark(m) => match (m.owner, m.is_anchor()) {
            (Owner::Start, true) => START_ANCHOR,
            (Owner::Finish, true) => FINISH_ANCHOR,
            (Owner::Start, false) => START_CLAIM,
            (Owner::Finish, false) => FINISH_CLAIM,
        },
    }
}

/// Keys the host reacts to while a search is displayed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostKey {
    TogglePause,
    Quit,
}

/// Maps a crossterm key to a [`HostKey`].
pub fn to_host_key(code: KeyCode, modifiers: KeyModifiers) -> Option<HostKey> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(HostKey::Quit),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(HostKey::TogglePause),
        KeyCode::Char('q') | KeyCode::Esc => Some(HostKey::Quit),
        _ => None,
    }
}

/// Terminal renderer for one search at a time.
pub struct CrosstermRenderer<W: Write = Stdout> {
    out: W,
    side: i32,
    owns_terminal: bool,
}

impl CrosstermRenderer<Stdout> {
    /// A renderer on standard output that owns the terminal.
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            side: 0,
            owns_terminal: true,
        }
    }
}

impl<W: Write> CrosstermRenderer<W> {
    /// A renderer writing escape sequences to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            side: 0,
            owns_terminal: false,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Enter raw mode and the alternate screen, if this renderer owns the
    /// terminal.
    pub fn init(&mut self) -> io::Result<()> {
        if !self.owns_terminal {
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )
    }

    /// Repaint every cell of `store`.
    pub fn draw_store(&mut self, store: &GridStore) -> io::Result<()> {
        self.side = store.side();
        queue!(self.out, terminal::Clear(ClearType::All))?;
        for y in 0..store.side() {
            queue!(self.out, cursor::MoveTo(0, y as u16))?;
            for x in 0..store.side() {
                let g = glyph_for(store.content_at(Point::new(x, y)));
                queue!(self.out, SetForegroundColor(g.fg), Print(g.ch))?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    /// Paint the cells claimed by one tick, and the route once found.
    pub fn apply(&mut self, event: &TickEvent) -> io::Result<()> {
        for claim in &event.claimed {
            let g = match claim.owner {
                Owner::Start => START_CLAIM,
                Owner::Finish => FINISH_CLAIM,
            };
            self.put(claim.pos, g)?;
        }
        if let TickOutcome::Found(route) = &event.outcome {
            self.draw_route(route)?;
        }
        Ok(())
    }

    /// Paint a route, leaving the anchors' own glyphs in place.
    pub fn draw_route(&mut self, route: &Route) -> io::Result<()> {
        let last = route.nodes.len().saturating_sub(1);
        for (i, &p) in route.nodes.iter().enumerate() {
            let g = match i {
                0 => START_ANCHOR,
                i if i == last => FINISH_ANCHOR,
                _ => ROUTE,
            };
            self.put(p, g)?;
        }
        Ok(())
    }

    /// Write a line of text just below the grid.
    pub fn status(&mut self, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(0, (self.side + 1) as u16),
            terminal::Clear(ClearType::CurrentLine),
            ResetColor,
            Print(text)
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    /// Wait up to `timeout` for a key the host cares about.
    pub fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<HostKey>> {
        if !self.owns_terminal || !event::poll(timeout)? {
            return Ok(None);
        }
        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                if let Some(key) = to_host_key(code, modifiers) {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    /// Block until any key is pressed.
    pub fn wait_key(&mut self) -> io::Result<()> {
        if !self.owns_terminal {
            return Ok(());
        }
        loop {
            if let Event::Key(KeyEvent {
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                return Ok(());
            }
        }
    }

    /// Restore the terminal.
    pub fn close(&mut self) {
        if !self.owns_terminal {
            return;
        }
        let _ = execute!(self.out, ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        self.owns_terminal = false;
    }

    fn put(&mut self, p: Point, g: Glyph) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(p.x as u16, p.y as u16),
            SetForegroundColor(g.fg),
            Print(g.ch)
        )
    }
}

impl<W: Write> Drop for CrosstermRenderer<W> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavegrid_paths::{PathMark, SearchConfig, SearchSession};

    fn output(r: &CrosstermRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(r.writer()).into_owned()
    }

    #[test]
    fn glyphs_by_content() {
        assert_eq!(glyph_for(Cell::Empty), EMPTY);
        assert_eq!(glyph_for(Cell::Obstruction), OBSTRUCTION);
        assert_eq!(glyph_for(Cell::Mark(PathMark::anchor(Owner::Finish))), FINISH_ANCHOR);
        let claimed = Cell::Mark(PathMark {
            owner: Owner::Start,
            from: Some(wavegrid_core::Direction::W),
        });
        assert_eq!(glyph_for(claimed), START_CLAIM);
    }

    #[test]
    fn host_keys() {
        assert_eq!(to_host_key(KeyCode::Char('p'), KeyModifiers::NONE), Some(HostKey::TogglePause));
        assert_eq!(to_host_key(KeyCode::Esc, KeyModifiers::NONE), Some(HostKey::Quit));
        assert_eq!(to_host_key(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(HostKey::Quit));
        assert_eq!(to_host_key(KeyCode::Char('x'), KeyModifiers::NONE), None);
    }

    #[test]
    fn draws_store_then_deltas() {
        let cfg = SearchConfig::new(4, Point::new(0, 0), Point::new(3, 3))
            .with_obstructions([Point::new(2, 0)]);
        let mut session = SearchSession::new(&cfg).unwrap();
        let mut r = CrosstermRenderer::new(Vec::new());
        r.init().unwrap();
        r.draw_store(session.store()).unwrap();
        let full = output(&r);
        assert!(full.contains('S'));
        assert!(full.contains('F'));
        assert!(full.contains('#'));
        assert!(!full.contains('o'));

        let before = r.writer().len();
        let event = session.tick();
        r.apply(&event).unwrap();
        let delta = &output(&r)[before..];
        assert_eq!(delta.matches('o').count(), event.claimed.len());
    }

    #[test]
    fn found_route_is_drawn() {
        let mut session =
            SearchSession::new(&SearchConfig::new(5, Point::new(0, 0), Point::new(4, 4))).unwrap();
        let mut r = CrosstermRenderer::new(Vec::new());
        r.draw_store(session.store()).unwrap();
        for event in session.ticks_iter() {
            r.apply(&event).unwrap();
        }
        r.status("done").unwrap();
        r.flush().unwrap();
        let out = output(&r);
        // Three interior route cells on the diagonal.
        assert_eq!(out.matches('*').count(), 3);
        assert!(out.contains("done"));
    }
}
