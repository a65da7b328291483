use anyhow::Context;
use crossterm::{
    cursor, execute,
    terminal::{self, ClearType},
};
use std::io::{stdout, Stdout, Write};

/// Raw-mode + alternate-screen session for the preview presenter. Raw mode
/// is enabled before the guard exists so Drop can always undo it, even if
/// the remaining screen setup fails.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn new() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        let guard = Self { _private: () };

        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )
        .context("prepare alternate screen")?;

        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        // Undo presenter modes (autowrap, colors) before leaving the screen.
        let _ = out.write_all(b"\x1b[?7h\x1b[0m");
        let _ = out.flush();
        let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
    }
}
