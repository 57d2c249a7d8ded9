//! Terminal grid-command dashboard.
//!
//! Feature-gated behind `tui`. Launch with the `tui` command on the CLI.

mod controls;
mod layout;
/// Dashboard application state.
pub mod runtime;
mod style;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::grid::cascade::CascadeSimulator;
use crate::grid::topology::GridTopology;
use runtime::App;

/// Redraw and simulator tick interval.
const TICK: Duration = Duration::from_millis(200);

/// Runs the dashboard until the user quits.
///
/// Sets up the terminal (raw mode, alternate screen), runs the event loop,
/// and restores the terminal on exit.
///
/// # Errors
///
/// Returns an `io::Error` if terminal setup, drawing or input fails.
pub fn run(topology: GridTopology, simulator: CascadeSimulator) -> io::Result<()> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            return Err(e);
        }
    };

    let mut app = App::new(topology, simulator);
    let result = event_loop(&mut terminal, &mut app);

    // Always restore terminal state
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
    debug!("dashboard closed");

    result
}

/// Core event loop: poll input, tick the simulator, draw.
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| layout::render(frame, app))?;

        if app.quit {
            return Ok(());
        }

        let deadline = app.last_tick + TICK;
        let poll_timeout = deadline.saturating_duration_since(Instant::now());

        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                controls::handle_key(app, key);
            }
        }

        if app.last_tick.elapsed() >= TICK {
            app.tick(Instant::now());
        }
    }
}
