use ratatui::prelude::*;
use ratatui::layout::Position;
use ratatui::widgets::Paragraph;

use crate::ui::components::TextInput;

/// Draw the header bar with app name, API host and search term.
///
/// `settling` marks typed input that has not been applied yet.
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  api_url: &str,
  search: &TextInput,
  searching: bool,
  settling: bool,
) {
  let host = extract_host(api_url);

  let mut spans = vec![
    Span::styled(" notehub ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", host), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(" search: ", Style::default().fg(Color::DarkGray)),
  ];
  let prefix_width = Line::from(spans.clone()).width() as u16;

  let search_style = if searching {
    Style::default().fg(Color::Yellow).bold()
  } else {
    Style::default().fg(Color::White)
  };
  spans.push(Span::styled(search.value().to_string(), search_style));
  if settling {
    spans.push(Span::styled(" searching…", Style::default().fg(Color::DarkGray)));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);

  if searching {
    let x = area
      .x
      .saturating_add(prefix_width)
      .saturating_add(search.cursor_position() as u16)
      .min(area.right().saturating_sub(1));
    frame.set_cursor_position(Position::new(x, area.y));
  }
}

/// Host (and port) part of the API URL
fn extract_host(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_host() {
    assert_eq!(
      extract_host("https://notehub-public.goit.study/api"),
      "notehub-public.goit.study"
    );
    assert_eq!(extract_host("http://localhost:3000"), "localhost:3000");
  }
}
