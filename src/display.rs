//! Display sink abstraction for the two-row character display.
//!
//! The physical driver is outside this crate. Everything that draws goes
//! through [`DisplaySink`]; pure code builds a [`Frame`] and [`present`]
//! pushes it to whichever sink the session owns.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};

// ============================================================================
// SINK
// ============================================================================

/// Display row. The hardware has exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Top,
    Bottom,
}

impl Row {
    pub fn index(self) -> usize {
        match self {
            Row::Top => 0,
            Row::Bottom => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Row> {
        match index {
            0 => Some(Row::Top),
            1 => Some(Row::Bottom),
            _ => None,
        }
    }
}

/// Character display consumed by the menu.
///
/// Text wider than the display is the caller's problem; implementations
/// clip, they never wrap.
pub trait DisplaySink: Send {
    fn clear(&mut self) -> Result<()>;

    fn write_line(&mut self, row: Row, col: u16, text: &str) -> Result<()>;

    /// Make buffered writes visible. Hardware drivers write through.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// FRAMES
// ============================================================================

/// One positioned write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLine {
    pub row: Row,
    pub col: u16,
    pub text: String,
}

/// A complete screen: clear, then these writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    lines: Vec<FrameLine>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a write at `row`/`col`.
    pub fn line(mut self, row: Row, col: u16, text: impl Into<String>) -> Self {
        self.lines.push(FrameLine {
            row,
            col,
            text: text.into(),
        });
        self
    }

    /// Prompt-style frame: `top` on row 0, `bottom` on row 1, both at col 0.
    pub fn two_lines(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self::new().line(Row::Top, 0, top).line(Row::Bottom, 0, bottom)
    }

    pub fn lines(&self) -> &[FrameLine] {
        &self.lines
    }

    /// Text written to `row`, if any (last write wins).
    pub fn text_at(&self, row: Row) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|l| l.row == row)
            .map(|l| l.text.as_str())
    }
}

/// Clear the sink and draw `frame`.
pub fn present(display: &mut dyn DisplaySink, frame: &Frame) -> Result<()> {
    display.clear()?;
    for line in frame.lines() {
        display.write_line(line.row, line.col, &line.text)?;
    }
    display.flush()
}

// ============================================================================
// SHARED HANDLE
// ============================================================================

/// The one display, shared by the foreground loop and the auto-scroll thread.
///
/// Every frame is presented under the lock, so a frame is never interleaved
/// with another. Callers that also hold the navigation lock take it first.
#[derive(Clone)]
pub struct DisplayHandle {
    sink: Arc<Mutex<Box<dyn DisplaySink>>>,
}

impl DisplayHandle {
    pub fn new(sink: impl DisplaySink + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    /// Clear and draw `frame` as one step.
    pub fn present(&self, frame: &Frame) -> Result<()> {
        let mut sink = self.sink.lock().map_err(|_| Error::LockPoisoned("display"))?;
        present(&mut **sink, frame)
    }
}

impl std::fmt::Debug for DisplayHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayHandle").finish_non_exhaustive()
    }
}

// ============================================================================
// CHARACTER GRID
// ============================================================================

/// Two rows of fixed-width character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdBuffer {
    columns: u16,
    cells: [Vec<char>; 2],
}

impl LcdBuffer {
    pub fn new(columns: u16) -> Self {
        let blank = vec![' '; columns as usize];
        Self {
            columns,
            cells: [blank.clone(), blank],
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.iter_mut().for_each(|c| *c = ' ');
        }
    }

    /// Write `text` starting at `col`, dropping anything past the edge.
    pub fn write(&mut self, row: Row, col: u16, text: &str) {
        let cells = &mut self.cells[row.index()];
        for (offset, ch) in text.chars().enumerate() {
            let Some(cell) = cells.get_mut(col as usize + offset) else {
                break;
            };
            *cell = ch;
        }
    }

    /// Row contents with trailing blanks trimmed.
    pub fn row_text(&self, row: Row) -> String {
        let text: String = self.cells[row.index()].iter().collect();
        text.trim_end().to_string()
    }

    /// Row contents padded to the full width.
    pub fn padded_row(&self, row: Row) -> String {
        self.cells[row.index()].iter().collect()
    }

    pub fn rows(&self) -> [String; 2] {
        [self.row_text(Row::Top), self.row_text(Row::Bottom)]
    }
}

// ============================================================================
// IN-MEMORY SINK
// ============================================================================

#[derive(Debug)]
struct MemoryState {
    lcd: LcdBuffer,
    clears: usize,
    writes: usize,
    history: Vec<[String; 2]>,
    echo: bool,
}

/// Display that keeps its contents in memory.
///
/// Cloning yields another handle to the same screen, so a test can keep one
/// while the session owns the other. With echo enabled every flushed frame
/// is also printed to stdout (used by `replay`).
#[derive(Debug, Clone)]
pub struct MemoryDisplay {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDisplay {
    pub fn new(columns: u16) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                lcd: LcdBuffer::new(columns),
                clears: 0,
                writes: 0,
                history: Vec::new(),
                echo: false,
            })),
        }
    }

    pub fn with_echo(columns: u16) -> Self {
        let display = Self::new(columns);
        display.state().echo = true;
        display
    }

    // Inspection must keep working after a panicking writer.
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current screen contents, trailing blanks trimmed.
    pub fn rows(&self) -> [String; 2] {
        self.state().lcd.rows()
    }

    pub fn clear_count(&self) -> usize {
        self.state().clears
    }

    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    /// Every flushed frame so far, oldest first.
    pub fn history(&self) -> Vec<[String; 2]> {
        self.state().history.clone()
    }
}

impl DisplaySink for MemoryDisplay {
    fn clear(&mut self) -> Result<()> {
        let mut state = self.state();
        state.lcd.clear();
        state.clears += 1;
        Ok(())
    }

    fn write_line(&mut self, row: Row, col: u16, text: &str) -> Result<()> {
        let mut state = self.state();
        state.lcd.write(row, col, text);
        state.writes += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let mut state = self.state();
        let rows = state.lcd.rows();
        if state.echo {
            println!("{}", boxed(&state.lcd));
        }
        state.history.push(rows);
        Ok(())
    }
}

/// Draw the grid inside an ASCII frame.
pub fn boxed(lcd: &LcdBuffer) -> String {
    let edge = format!("+{}+", "-".repeat(lcd.columns() as usize));
    format!(
        "{edge}\n|{}|\n|{}|\n{edge}",
        lcd.padded_row(Row::Top),
        lcd.padded_row(Row::Bottom)
    )
}

// ============================================================================
// TESTS
// ============================================================================
