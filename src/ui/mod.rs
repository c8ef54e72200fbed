pub mod components;
mod renderfns;
mod views;

use crate::app::{App, Mode};
use ratatui::prelude::*;
use ratatui::widgets::ListState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Notes
      Constraint::Length(1), // Pagination
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let view = app.view().clone();
  let searching = *app.mode() == Mode::Search;
  renderfns::draw_header(
    frame,
    chunks[0],
    app.api_url(),
    app.search_input(),
    searching,
    view.is_searching,
  );

  ensure_valid_selection(app.list_state_mut(), view.notes.len());
  views::notes::draw_notes(frame, chunks[1], &view, app.list_state_mut());
  renderfns::draw_pagination(frame, chunks[2], &view);
  renderfns::draw_status(frame, chunks[3], app.status());

  if let Some(form) = app.form() {
    form.render(frame, chunks[1]);
  }
}

/// Keep the selection inside the list after it shrank or refilled
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
  } else {
    match state.selected() {
      Some(i) if i >= len => state.select(Some(len - 1)),
      None => state.select(Some(0)),
      _ => {}
    }
  }
}
