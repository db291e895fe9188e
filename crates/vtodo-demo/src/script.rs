#![forbid(unsafe_code)]

//! Line-oriented session scripts.
//!
//! ```text
//! # comments and blank lines are skipped
//! insert Buy milk
//! toggle 2
//! remove 1
//! action {"type":"TOGGLE","id":3}
//! scroll 570
//! index 40
//! viewport 228
//! page-down | page-up | top | bottom
//! frame
//! ```
//!
//! `frame` writes the current frame; every other command only changes the
//! session. `action` takes a raw JSON action, so unknown kinds can be
//! replayed too (they are no-ops).

use std::io::Write;

use vtodo::{Action, ItemId, TodoApp};

use crate::error::{DemoError, Result};
use crate::render::write_frame;

/// One parsed script command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Insert(String),
    Toggle(ItemId),
    Remove(ItemId),
    Dispatch(Action),
    Scroll(f64),
    ScrollToIndex(usize),
    Viewport(f64),
    PageDown,
    PageUp,
    Top,
    Bottom,
    Frame,
}

/// Parse one line; `Ok(None)` for blanks and comments.
pub fn parse_line(line: &str) -> std::result::Result<Option<Command>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let command = match word {
        // Text is taken verbatim after the first space; empty is allowed.
        "insert" => Command::Insert(rest.to_owned()),
        "toggle" => Command::Toggle(parse_id(rest)?),
        "remove" => Command::Remove(parse_id(rest)?),
        "action" => Command::Dispatch(
            serde_json::from_str(rest).map_err(|e| format!("bad action JSON: {e}"))?,
        ),
        "scroll" => Command::Scroll(parse_number(rest, "scroll offset")?),
        "index" => Command::ScrollToIndex(
            rest.trim()
                .parse()
                .map_err(|_| format!("expected a row index, got `{}`", rest.trim()))?,
        ),
        "viewport" => Command::Viewport(parse_number(rest, "viewport extent")?),
        "page-down" => Command::PageDown,
        "page-up" => Command::PageUp,
        "top" => Command::Top,
        "bottom" => Command::Bottom,
        "frame" => Command::Frame,
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(Some(command))
}

fn parse_id(text: &str) -> std::result::Result<ItemId, String> {
    text.trim()
        .parse::<u64>()
        .map(ItemId)
        .map_err(|_| format!("expected an item id, got `{}`", text.trim()))
}

fn parse_number(text: &str, what: &str) -> std::result::Result<f64, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("expected a {what}, got `{}`", text.trim()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{what} must be finite"))
    }
}

/// Parse a whole script, numbering lines from 1.
pub fn parse_script(text: &str) -> Result<Vec<(usize, Command)>> {
    let mut commands = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        match parse_line(line) {
            Ok(Some(command)) => commands.push((line_no, command)),
            Ok(None) => {}
            Err(message) => return Err(DemoError::script(line_no, message)),
        }
    }
    Ok(commands)
}

/// Apply `commands` to `app`, writing a frame for every `frame` command.
pub fn run_script(
    app: &mut TodoApp,
    commands: &[(usize, Command)],
    out: &mut impl Write,
    json: bool,
) -> Result<()> {
    for (line, command) in commands {
        tracing::debug!(line, ?command, "script command");
        let len = app.snapshot().len();
        match command {
            Command::Insert(text) => app.on_insert(text.clone()),
            Command::Toggle(id) => app.on_toggle(*id),
            Command::Remove(id) => app.on_remove(*id),
            Command::Dispatch(action) => {
                app.store().dispatch(action.clone());
            }
            Command::Scroll(offset) => app.list_state_mut().scroll_to_offset(*offset, len),
            Command::ScrollToIndex(index) => app.list_state_mut().scroll_to_index(*index, len),
            Command::Viewport(extent) => app
                .list_state_mut()
                .set_viewport(*extent)
                .map_err(|e| DemoError::script(*line, e.to_string()))?,
            Command::PageDown => app.list_state_mut().page_down(len),
            Command::PageUp => app.list_state_mut().page_up(len),
            Command::Top => app.list_state_mut().scroll_to_top(),
            Command::Bottom => app.list_state_mut().scroll_to_bottom(len),
            Command::Frame => {
                let frame = app.frame();
                write_frame(out, &frame, app.store().revision(), json)?;
            }
        }
    }
    Ok(())
}
