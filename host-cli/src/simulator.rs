//! Terminal stand-ins for the device peripherals used by `simulate`.
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use firmware::ui::{
    AutoType, AutoTypeError, Button, Clock, DisplaySurface, Frame, ViewContent, WallTime,
};
use log::{info, warn};
use shared::error::SharedError;

/// In-memory sink whose clones share one buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Prints every frame as a block of text.
pub struct TerminalDisplay<W> {
    out: W,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> DisplaySurface for TerminalDisplay<W> {
    fn show(&mut self, frame: &Frame) {
        if let Err(err) = self.out.write_all(format_frame(frame).as_bytes()) {
            warn!("display write failed: {err}");
        }
    }
}

/// Text rendering of a frame, one screen element per line.
pub fn format_frame(frame: &Frame) -> String {
    let mut lines = Vec::new();
    match &frame.content {
        ViewContent::Lock(view) => {
            if let Some(time) = &view.time {
                lines.push(time.clone());
            }
            lines.push(view.prompt.clone());
            lines.push(format!(
                "{}{}",
                "*".repeat(view.entered),
                "_".repeat(view.required.saturating_sub(view.entered))
            ));
        }
        ViewContent::Menu(view) => {
            for (index, item) in view.items.iter().enumerate() {
                let marker = if index == view.selected { '>' } else { ' ' };
                lines.push(format!("{marker} {item}"));
            }
        }
        ViewContent::Records(view) => match &view.current {
            Some(record) => {
                lines.push(format!("[{}/{}] {}", view.position + 1, view.total, record.site));
                lines.push(format!("user: {}", record.username));
                if let Some(secret) = &record.secret {
                    lines.push(format!("pass: {secret}"));
                }
            }
            None => lines.push(String::from("No records")),
        },
        ViewContent::ConfirmDelete(view) => {
            lines.push(format!("Delete {}?", view.site));
            lines.push(format!(
                "gesture {}/{} ({} attempts left)",
                view.entered, view.required, view.attempts_left
            ));
        }
        ViewContent::AddRecord(view) => {
            lines.push(format!("{}: {}", view.field, view.value));
            lines.push(format!(
                "[{}] {} ({} max)",
                view.charset, view.cursor, view.max_len
            ));
        }
        ViewContent::Generate(view) => match (&view.complexity, &view.password) {
            (Some(complexity), Some(password)) => {
                lines.push(format!("{complexity}: {password}"));
            }
            _ => lines.push(String::from("Pick a complexity")),
        },
        ViewContent::Clock(view) => lines.push(view.time.clone()),
    }

    if let Some(status) = &frame.status {
        lines.push(format!("! {status}"));
    }
    let hints = frame
        .hint_bar
        .hints
        .iter()
        .map(|hint| format!("{}:{}", hint.key, hint.action))
        .collect::<Vec<_>>();
    if !hints.is_empty() {
        lines.push(hints.join("  "));
    }

    let mut text = String::from("+------------------------------\n");
    for line in lines {
        text.push_str("| ");
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// Reports how much would have been typed without echoing it.
#[derive(Default)]
pub struct CountingAutoType {
    typed: usize,
}

impl CountingAutoType {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AutoType for CountingAutoType {
    fn type_text(&mut self, text: &str) -> Result<(), AutoTypeError> {
        self.typed += 1;
        info!(
            "auto-type #{}: {} characters",
            self.typed,
            text.chars().count()
        );
        Ok(())
    }
}

/// Host wall clock, reported in UTC.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Option<WallTime> {
        let seconds = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        wall_time_from_unix(seconds)
    }
}

/// Convert seconds since the Unix epoch to a UTC calendar time.
pub fn wall_time_from_unix(seconds: u64) -> Option<WallTime> {
    let days = i64::try_from(seconds / 86_400).ok()?;
    let of_day = seconds % 86_400;

    // Civil-from-days over 400-year eras starting on 0000-03-01.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let day_of_era = z.rem_euclid(146_097);
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = year_of_era + era * 400 + i64::from(month <= 2);

    Some(WallTime {
        year: u16::try_from(year).ok()?,
        month: month as u8,
        day: day as u8,
        hour: (of_day / 3_600) as u8,
        minute: (of_day % 3_600 / 60) as u8,
        second: (of_day % 60) as u8,
    })
}

/// Parse a button script: names separated by commas or whitespace, `#` starts a comment.
pub fn parse_script(script: &str) -> Result<Vec<Button>, SharedError> {
    let mut buttons = Vec::new();
    for (number, line) in script.lines().enumerate() {
        let code = line.split('#').next().unwrap_or_default();
        for symbol in code
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|symbol| !symbol.is_empty())
        {
            let button = symbol.parse().map_err(|err| {
                SharedError::Input(format!("script line {}: {err}", number + 1))
            })?;
            buttons.push(button);
        }
    }
    Ok(buttons)
}
