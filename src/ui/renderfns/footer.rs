use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::collection::NotesView;

/// Pages shown on each side of the current one
const PAGE_WINDOW: u32 = 3;

/// Draw the pagination line
pub fn draw_pagination(frame: &mut Frame, area: Rect, view: &NotesView) {
  if view.total_pages <= 1 {
    frame.render_widget(Paragraph::new(""), area);
    return;
  }

  let dim = Style::default().fg(Color::DarkGray);
  let mut spans = vec![Span::styled(
    " ‹ prev ",
    if view.current_page > 1 {
      Style::default().fg(Color::Cyan)
    } else {
      dim
    },
  )];

  for page in page_numbers(view.current_page, view.total_pages) {
    match page {
      Some(n) if n == view.current_page => spans.push(Span::styled(
        format!("[{}]", n),
        Style::default().fg(Color::Yellow).bold(),
      )),
      Some(n) => spans.push(Span::raw(format!(" {} ", n))),
      None => spans.push(Span::styled(" … ", dim)),
    }
  }

  spans.push(Span::styled(
    " next › ",
    if view.current_page < view.total_pages {
      Style::default().fg(Color::Cyan)
    } else {
      dim
    },
  ));

  frame.render_widget(
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
    area,
  );
}

/// Draw the status line: the last message if there is one, else key hints
pub fn draw_status(frame: &mut Frame, area: Rect, message: Option<(&str, bool)>) {
  let line = match message {
    Some((text, true)) => Line::styled(format!(" {}", text), Style::default().fg(Color::Red)),
    Some((text, false)) => Line::styled(format!(" {}", text), Style::default().fg(Color::Green)),
    None => {
      let mut spans = Vec::new();
      for (key, label) in [
        ("/", "search"),
        ("h/l", "page"),
        ("n", "new"),
        ("d", "delete"),
        ("r", "refresh"),
        ("q", "quit"),
      ] {
        spans.push(Span::styled(
          format!(" <{}>", key),
          Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::styled(
          format!(" {} ", label),
          Style::default().fg(Color::DarkGray),
        ));
      }
      Line::from(spans)
    }
  };

  frame.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

/// Page numbers around the current page, `None` marking a gap.
fn page_numbers(current: u32, total: u32) -> Vec<Option<u32>> {
  let start = current.saturating_sub(PAGE_WINDOW).max(1);
  let end = (current + PAGE_WINDOW).min(total);

  let mut pages = Vec::new();
  if start > 1 {
    pages.push(Some(1));
    if start > 2 {
      pages.push(None);
    }
  }
  pages.extend((start..=end).map(Some));
  if end < total {
    if end < total - 1 {
      pages.push(None);
    }
    pages.push(Some(total));
  }
  pages
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_page_numbers_small_range() {
    assert_eq!(page_numbers(1, 3), vec![Some(1), Some(2), Some(3)]);
  }

  #[test]
  fn test_page_numbers_with_gaps() {
    assert_eq!(
      page_numbers(10, 20),
      vec![
        Some(1),
        None,
        Some(7),
        Some(8),
        Some(9),
        Some(10),
        Some(11),
        Some(12),
        Some(13),
        None,
        Some(20)
      ]
    );
  }

  #[test]
  fn test_page_numbers_near_edges() {
    assert_eq!(
      page_numbers(2, 6),
      vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]
    );
    assert_eq!(
      page_numbers(5, 9),
      vec![
        Some(1),
        Some(2),
        Some(3),
        Some(4),
        Some(5),
        Some(6),
        Some(7),
        Some(8),
        Some(9)
      ]
    );
  }
}
