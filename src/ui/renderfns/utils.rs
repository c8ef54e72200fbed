use ratatui::prelude::Color;

use crate::notehub::types::Tag;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Flatten note content onto one line for list rows
pub fn single_line(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Get the display color for a note tag
pub fn tag_color(tag: Tag) -> Color {
  match tag {
    Tag::Todo => Color::Yellow,
    Tag::Work => Color::Blue,
    Tag::Personal => Color::Green,
    Tag::Meeting => Color::Magenta,
    Tag::Shopping => Color::Cyan,
  }
}
