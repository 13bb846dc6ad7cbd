use std::{
    io::{self, stdout, Write},
    panic, thread,
};

use crossterm::{
    cursor, queue,
    style::{ContentStyle, Print, PrintStyledContent, StyledContent},
    terminal, QueueableCommand as _,
};
use smaze_core::{array::Array2D, dims::Dims, grid::Grid};

use crate::settings::ColorScheme;

/// What is shown in a single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paint {
    Wall,
    Path,
    Visited,
    Solution,
    Player,
    Goal,
}

impl Paint {
    /// Two characters wide, so the cells look square.
    pub fn glyph(self) -> &'static str {
        match self {
            Paint::Wall => "██",
            Paint::Path => "  ",
            Paint::Visited => "··",
            Paint::Solution => "██",
            Paint::Player => "()",
            Paint::Goal => "[]",
        }
    }

    pub fn style(self, scheme: &ColorScheme) -> ContentStyle {
        match self {
            Paint::Wall => scheme.walls(),
            Paint::Path => scheme.paths(),
            Paint::Visited => scheme.visiteds(),
            Paint::Solution => scheme.solutions(),
            Paint::Player => scheme.players(),
            Paint::Goal => scheme.goals(),
        }
    }

    pub fn styled(self, scheme: &ColorScheme) -> StyledContent<&'static str> {
        StyledContent::new(self.style(scheme), self.glyph())
    }
}

/// Maze with the exploration painted over it, the player and goal are drawn on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cells: Array2D<Paint>,
    player: Dims,
    goal: Dims,
}

impl Frame {
    pub fn new(grid: &Grid, player: Dims, goal: Dims) -> Self {
        let mut cells = Array2D::new(Paint::Path, grid.width(), grid.height());
        for pos in grid.iter_pos() {
            if !grid.is_path_at(pos) {
                cells[pos] = Paint::Wall;
            }
        }

        Self {
            cells,
            player,
            goal,
        }
    }

    pub fn size(&self) -> Dims {
        self.cells.size()
    }

    pub fn get(&self, pos: Dims) -> Option<Paint> {
        if pos == self.player {
            return Some(Paint::Player);
        }
        if pos == self.goal {
            return Some(Paint::Goal);
        }
        self.cells.get(pos).copied()
    }

    pub fn mark_visited(&mut self, pos: Dims) {
        if let Some(cell) = self.cells.get_mut(pos) {
            if *cell == Paint::Path {
                *cell = Paint::Visited;
            }
        }
    }

    pub fn mark_solution(&mut self, path: &[Dims]) {
        for pos in path {
            if let Some(cell) = self.cells.get_mut(*pos) {
                if *cell != Paint::Wall {
                    *cell = Paint::Solution;
                }
            }
        }
    }

    /// Forgets the exploration, walls stay.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            if *cell != Paint::Wall {
                *cell = Paint::Path;
            }
        }
    }

    pub fn write(&self, out: &mut impl Write, scheme: &ColorScheme) -> io::Result<()> {
        for row in 0..self.size().1 {
            for col in 0..self.size().0 {
                if let Some(paint) = self.get(Dims(col, row)) {
                    out.queue(PrintStyledContent(paint.styled(scheme)))?;
                }
            }
            out.queue(Print("\r\n"))?;
        }
        out.flush()
    }
}

/// Animates a frame on the alternate screen, the terminal is restored when dropped.
pub struct Renderer {
    scheme: ColorScheme,
}

impl Renderer {
    pub fn new(scheme: ColorScheme) -> io::Result<Self> {
        let renderer = Renderer { scheme };
        renderer.turn_on()?;
        Ok(renderer)
    }

    fn turn_on(&self) -> io::Result<()> {
        register_panic_hook();
        crossterm::execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )
    }

    fn turn_off(&self) -> io::Result<()> {
        if !thread::panicking() {
            let _ = panic::take_hook();
        }
        crossterm::execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen)
    }

    pub fn show(&mut self, frame: &Frame, status: &str) -> io::Result<()> {
        let mut out = stdout();
        queue!(out, cursor::MoveTo(0, 0))?;
        frame.write(&mut out, &self.scheme)?;
        self.show_status(frame, status)
    }

    /// Redraws a single cell.
    pub fn update(&mut self, frame: &Frame, pos: Dims) -> io::Result<()> {
        let Some(paint) = frame.get(pos) else {
            return Ok(());
        };

        let mut out = stdout();
        queue!(
            out,
            cursor::MoveTo(pos.0 as u16 * 2, pos.1 as u16),
            PrintStyledContent(paint.styled(&self.scheme)),
        )?;
        out.flush()
    }

    pub fn show_status(&mut self, frame: &Frame, status: &str) -> io::Result<()> {
        let mut out = stdout();
        queue!(
            out,
            cursor::MoveTo(0, frame.size().1 as u16),
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(status),
        )?;
        out.flush()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.turn_off();
    }
}

fn register_panic_hook() {
    let prev = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = crossterm::execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        prev(info)
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        Grid::from_rows(&[vec![1, 1, 1, 1], vec![0, 0, 0, 0], vec![1, 1, 1, 1]]).unwrap()
    }

    #[test]
    fn marks_visited_and_solution() {
        let mut frame = Frame::new(&corridor(), Dims(0, 1), Dims(3, 1));
        assert_eq!(frame.get(Dims(0, 0)), Some(Paint::Wall));
        assert_eq!(frame.get(Dims(1, 1)), Some(Paint::Path));

        frame.mark_visited(Dims(1, 1));
        frame.mark_visited(Dims(1, 0));
        assert_eq!(frame.get(Dims(1, 1)), Some(Paint::Visited));
        assert_eq!(frame.get(Dims(1, 0)), Some(Paint::Wall));

        frame.mark_solution(&[Dims(0, 1), Dims(1, 1), Dims(2, 1), Dims(3, 1)]);
        assert_eq!(frame.get(Dims(2, 1)), Some(Paint::Solution));
        // player and goal stay on top
        assert_eq!(frame.get(Dims(0, 1)), Some(Paint::Player));
        assert_eq!(frame.get(Dims(3, 1)), Some(Paint::Goal));

        frame.clear();
        assert_eq!(frame.get(Dims(2, 1)), Some(Paint::Path));
        assert_eq!(frame.get(Dims(2, 0)), Some(Paint::Wall));
        assert_eq!(frame.get(Dims(9, 9)), None);
    }

    #[test]
    fn visited_doesnt_overwrite_solution() {
        let mut frame = Frame::new(&corridor(), Dims(0, 1), Dims(3, 1));
        frame.mark_solution(&[Dims(1, 1)]);
        frame.mark_visited(Dims(1, 1));
        assert_eq!(frame.get(Dims(1, 1)), Some(Paint::Solution));
    }

    #[test]
    fn writes_every_row() {
        let frame = Frame::new(&corridor(), Dims(0, 1), Dims(3, 1));
        let mut out = Vec::new();
        frame.write(&mut out, &ColorScheme::default()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 3);
        assert_eq!(text.matches("██").count(), 8);
        assert!(text.contains("()"));
        assert!(text.contains("[]"));
    }
}
