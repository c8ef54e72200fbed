use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::collection::NotesView;
use crate::ui::renderfns::{single_line, tag_color, truncate};

/// Draw the notes list, or the loading/error/empty state in its place
pub fn draw_notes(frame: &mut Frame, area: Rect, view: &NotesView, list_state: &mut ListState) {
  let title = if view.is_loading {
    " Notes (loading...) ".to_string()
  } else if view.is_error {
    " Notes (error) ".to_string()
  } else if view.is_fetching {
    format!(" Notes ({}, refreshing...) ", view.notes.len())
  } else {
    format!(" Notes ({}) ", view.notes.len())
  };

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if view.is_error {
    let message = view
      .error_message
      .as_deref()
      .unwrap_or("Failed to load notes.");
    let paragraph = Paragraph::new(format!("{}\n\nPress 'r' to retry.", message))
      .block(block)
      .style(Style::default().fg(Color::Red));
    frame.render_widget(paragraph, area);
    return;
  }

  if view.notes.is_empty() {
    let content = if view.is_loading {
      "Loading notes..."
    } else if view.search.is_empty() {
      "No notes found. Press 'n' to create one."
    } else {
      "No notes match this search."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let content_width = (area.width as usize).saturating_sub(40).max(10);
  let items: Vec<ListItem> = view
    .notes
    .iter()
    .map(|note| {
      let line = Line::from(vec![
        Span::styled(
          format!("{:<10}", note.tag.as_str()),
          Style::default().fg(tag_color(note.tag)),
        ),
        Span::raw(" "),
        Span::styled(
          format!("{:<24}", truncate(&note.title, 24)),
          Style::default().fg(Color::White).bold(),
        ),
        Span::raw(" "),
        Span::styled(
          truncate(&single_line(&note.content), content_width),
          Style::default().fg(Color::Gray),
        ),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  frame.render_stateful_widget(list, area, list_state);
}
