/// Presentation layer: phase-specific screens drawn with queued
/// crossterm commands, flushed once per frame.
///
/// These screens are a handful of lines plus a grid of at most 12×12
/// cells, so each frame is a full redraw with no back-buffer diffing.
/// All state arrives read-only through `App`; nothing here feeds back
/// into the core.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::score::Rating;
use crate::sim::attempt::{Attempt, ClockState};
use crate::{App, Phase};

/// Terminal columns per grid cell (up to "143" plus padding).
const CELL_WIDTH: usize = 5;

pub struct Renderer {
    out: BufWriter<Stdout>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { out: BufWriter::new(io::stdout()) }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, terminal::EnterAlternateScreen, Hide)?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn render(&mut self, app: &App) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), ResetColor)?;

        match app.phase {
            Phase::Login => self.draw_login(app)?,
            Phase::Dashboard => self.draw_dashboard(app)?,
            Phase::Playing => self.draw_playing(app)?,
            Phase::Won => self.draw_won(app)?,
            Phase::Lost => self.draw_lost(app)?,
        }

        if !app.message.is_empty() {
            let (_, rows) = terminal::size().unwrap_or((80, 24));
            queue!(
                self.out,
                MoveTo(2, rows.saturating_sub(2)),
                SetForegroundColor(Color::Yellow),
                Print(&app.message),
                ResetColor,
            )?;
        }

        self.out.flush()
    }

    // ── Login ──

    fn draw_login(&mut self, app: &App) -> io::Result<()> {
        self.title_line(1, "TILESHIFT")?;
        queue!(
            self.out,
            MoveTo(4, 4),
            Print("Who's playing?"),
            MoveTo(4, 6),
            SetForegroundColor(Color::Cyan),
            Print(format!("> {}_", app.input_buffer)),
            ResetColor,
            MoveTo(4, 9),
            SetForegroundColor(Color::DarkGrey),
            Print("[Enter] Log in (24h session)   [Enter, empty] Play as guest"),
            MoveTo(4, 10),
            Print("[Esc] Quit"),
            ResetColor,
        )?;
        Ok(())
    }

    // ── Dashboard ──

    fn draw_dashboard(&mut self, app: &App) -> io::Result<()> {
        self.title_line(1, "TILESHIFT - DASHBOARD")?;

        let identity = if app.profile.identity.is_empty() {
            "(guest)"
        } else {
            app.profile.identity.as_str()
        };
        queue!(
            self.out,
            MoveTo(4, 3),
            Print(format!("Player:      {identity}")),
            MoveTo(4, 4),
            Print(format!("Level:       {}", app.profile.level)),
            MoveTo(4, 5),
            Print(format!("Total Score: {}", app.profile.total_score)),
            MoveTo(4, 6),
            Print(format!("Loss Streak: {}/3", app.profile.loss_count)),
        )?;

        queue!(
            self.out,
            MoveTo(4, 8),
            SetForegroundColor(Color::Magenta),
            Print("── Top Players ──"),
            ResetColor,
        )?;
        if app.board.entries().is_empty() {
            queue!(self.out, MoveTo(4, 9), SetForegroundColor(Color::DarkGrey),
                   Print("(no scores yet)"), ResetColor)?;
        }
        for (rank, entry) in app.board.entries().iter().enumerate() {
            queue!(
                self.out,
                MoveTo(4, 9 + rank as u16),
                Print(format!("{}. {:<24} {:>8}", rank + 1, entry.identity, entry.total_score)),
            )?;
        }

        queue!(
            self.out,
            MoveTo(4, 16),
            SetForegroundColor(Color::DarkGrey),
            Print("[Enter] Start game   [O] Log out   [Esc] Quit"),
            ResetColor,
        )?;
        Ok(())
    }

    // ── Playing ──

    fn draw_playing(&mut self, app: &App) -> io::Result<()> {
        let attempt = match &app.attempt {
            Some(a) => a,
            None => return Ok(()),
        };

        self.title_line(0, &format!("LEVEL {}", attempt.level))?;
        queue!(
            self.out,
            MoveTo(2, 1),
            Print(format!(
                "Time {}   Moves {}   Incorrect {}",
                format_time(attempt.remaining),
                attempt.move_count,
                attempt.incorrect_moves,
            )),
        )?;

        self.draw_grid(attempt, app.cursor, app.selected, 2, 3)?;

        let hint = match app.selected {
            Some(_) => "[Arrows] Aim   [Enter] Swap here   [Esc] Cancel pick",
            None => "[Arrows] Move   [Enter] Pick piece   [R] Restart   [Esc] Dashboard",
        };
        let grid_rows = attempt.grid.side() as u16;
        queue!(
            self.out,
            MoveTo(2, 4 + grid_rows),
            SetForegroundColor(Color::DarkGrey),
            Print(hint),
            ResetColor,
        )?;
        Ok(())
    }

    fn draw_grid(
        &mut self,
        attempt: &Attempt,
        cursor: usize,
        selected: Option<usize>,
        left: u16,
        top: u16,
    ) -> io::Result<()> {
        let side = attempt.grid.side();
        for index in 0..attempt.grid.len() {
            let col = (index % side) as u16;
            let row = (index / side) as u16;
            let piece = attempt.grid.piece_at(index);

            // Solved-in-place beats sticky; cursor/selection beat both.
            let (fg, bg) = if selected == Some(index) {
                (Color::Black, Color::Cyan)
            } else if index == cursor {
                (Color::Black, Color::White)
            } else if piece == index {
                (Color::Black, Color::Green)
            } else if attempt.ever_placed[index] {
                (Color::Black, Color::DarkGreen)
            } else {
                (Color::White, Color::DarkGrey)
            };

            queue!(
                self.out,
                MoveTo(left + col * CELL_WIDTH as u16, top + row),
                SetForegroundColor(fg),
                SetBackgroundColor(bg),
                Print(format!("{:^width$}", piece, width = CELL_WIDTH - 1)),
                ResetColor,
                Print(" "),
            )?;
        }
        Ok(())
    }

    // ── Won / Lost ──

    fn draw_won(&mut self, app: &App) -> io::Result<()> {
        let attempt = match &app.attempt {
            Some(a) => a,
            None => return Ok(()),
        };
        debug_assert_eq!(attempt.clock, ClockState::Won);

        self.title_line(1, "CONGRATULATIONS - LEVEL CLEAR")?;
        let rating = attempt.rating();
        queue!(
            self.out,
            MoveTo(4, 3),
            Print(format!("Moves Taken:    {}", attempt.move_count)),
            MoveTo(4, 4),
            Print(format!("Time Remaining: {}", format_time(attempt.remaining))),
            MoveTo(4, 5),
            Print(format!("Score Gained:   {:+}", app.last_delta)),
            MoveTo(4, 6),
            Print(format!("Total Score:    {}", app.profile.total_score)),
            MoveTo(4, 8),
            Print("Rating: "),
            SetForegroundColor(rating_color(rating)),
            Print(rating.label()),
            ResetColor,
            MoveTo(4, 10),
            SetForegroundColor(Color::DarkGrey),
            Print(format!(
                "[Enter] Next level (auto in {}s)   [Esc] Dashboard",
                app.auto_next,
            )),
            ResetColor,
        )?;
        Ok(())
    }

    fn draw_lost(&mut self, app: &App) -> io::Result<()> {
        self.title_line(1, "TIME'S UP - LEVEL LOST")?;
        let streak_note = if app.profile.loss_count == 0 {
            "Three losses in a row: progress reset to level 1.".to_string()
        } else {
            format!("Loss streak: {}/3", app.profile.loss_count)
        };
        queue!(
            self.out,
            MoveTo(4, 3),
            SetForegroundColor(Color::Red),
            Print(streak_note),
            ResetColor,
            MoveTo(4, 5),
            SetForegroundColor(Color::DarkGrey),
            Print("[Enter] Restart level   [Esc] Dashboard"),
            ResetColor,
        )?;
        Ok(())
    }

    fn title_line(&mut self, row: u16, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(2, row),
            SetForegroundColor(Color::Cyan),
            Print(text),
            ResetColor,
        )?;
        Ok(())
    }
}

fn rating_color(rating: Rating) -> Color {
    match rating {
        Rating::Excellent      => Color::Green,
        Rating::GoodJob        => Color::Blue,
        Rating::YouCanDoBetter => Color::Yellow,
        Rating::PleaseTryAgain => Color::Red,
    }
}

/// MM:SS with zero padding.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formats_as_mm_ss() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(61), "01:01");
        assert_eq!(format_time(600), "10:00");
    }
}
