use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::input::TextInput;
use crate::error::{Field, ValidationErrors};
use crate::notehub::types::Tag;
use crate::notehub::validation::NoteDraft;

/// Events emitted by the form that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
  /// Key consumed, nothing for the parent to do
  Handled,
  /// Enter pressed; the parent validates and submits `draft()`
  Submit,
  /// Esc pressed
  Cancel,
}

/// Create-note form shown as an overlay
#[derive(Debug, Clone)]
pub struct NoteForm {
  title: TextInput,
  content: TextInput,
  tag: Tag,
  focus: Field,
  errors: Option<ValidationErrors>,
  submitting: bool,
}

impl Default for NoteForm {
  fn default() -> Self {
    Self {
      title: TextInput::new(),
      content: TextInput::new(),
      tag: Tag::Todo,
      focus: Field::Title,
      errors: None,
      submitting: false,
    }
  }
}

impl NoteForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn draft(&self) -> NoteDraft {
    NoteDraft {
      title: self.title.value().to_string(),
      content: self.content.value().to_string(),
      tag: Some(self.tag),
    }
  }

  /// Show inline errors after a rejected submit
  pub fn set_errors(&mut self, errors: ValidationErrors) {
    self.errors = Some(errors);
    self.submitting = false;
  }

  pub fn set_submitting(&mut self, submitting: bool) {
    self.submitting = submitting;
    if submitting {
      self.errors = None;
    }
  }

  fn focus_next(&mut self) {
    self.focus = match self.focus {
      Field::Title => Field::Content,
      Field::Content => Field::Tag,
      Field::Tag => Field::Title,
    };
  }

  fn focus_prev(&mut self) {
    self.focus = match self.focus {
      Field::Title => Field::Tag,
      Field::Content => Field::Title,
      Field::Tag => Field::Content,
    };
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
    match key.code {
      KeyCode::Esc => return FormEvent::Cancel,
      KeyCode::Enter if !self.submitting => return FormEvent::Submit,
      KeyCode::Enter => return FormEvent::Handled,
      KeyCode::Tab | KeyCode::Down => {
        self.focus_next();
        return FormEvent::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus_prev();
        return FormEvent::Handled;
      }
      _ => {}
    }

    match self.focus {
      Field::Title => {
        self.title.handle_key(key);
      }
      Field::Content => {
        self.content.handle_key(key);
      }
      Field::Tag => match key.code {
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.tag = self.tag.next(),
        KeyCode::Left | KeyCode::Char('h') => self.tag = self.tag.prev(),
        _ => {}
      },
    }
    FormEvent::Handled
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let overlay = overlay_area(area);
    frame.render_widget(Clear, overlay);

    let title = if self.submitting {
      " New note (creating...) "
    } else {
      " New note "
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let tag_value = format!("‹ {} ›", self.tag.as_str());
    let mut lines = Vec::new();
    for (field, label, value) in [
      (Field::Title, "Title", self.title.value()),
      (Field::Content, "Content", self.content.value()),
      (Field::Tag, "Tag", tag_value.as_str()),
    ] {
      lines.push(self.field_line(field, label, value));
      let error = self
        .errors
        .as_ref()
        .and_then(|e| e.for_field(field))
        .unwrap_or("");
      lines.push(Line::styled(
        format!("           {}", error),
        Style::default().fg(Color::Red),
      ));
    }
    lines.push(Line::from(vec![
      Span::styled("<Tab>", Style::default().fg(Color::Cyan)),
      Span::styled(" next field  ", Style::default().fg(Color::DarkGray)),
      Span::styled("<Enter>", Style::default().fg(Color::Cyan)),
      Span::styled(" create  ", Style::default().fg(Color::DarkGray)),
      Span::styled("<Esc>", Style::default().fg(Color::Cyan)),
      Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
  }

  fn field_line<'a>(&self, field: Field, label: &'a str, value: &'a str) -> Line<'a> {
    let focused = self.focus == field;
    let label_style = if focused {
      Style::default().fg(Color::Yellow).bold()
    } else {
      Style::default().fg(Color::White)
    };
    let mut spans = vec![
      Span::styled(format!("{:<9}: ", label), label_style),
      Span::raw(value),
    ];
    if focused && field != Field::Tag {
      spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
  }
}

/// Centered box for the form, 70% of the width within 30..=70 columns
fn overlay_area(area: Rect) -> Rect {
  let width = (area.width / 10 * 7).clamp(30, 70).min(area.width);
  let height = 12.min(area.height);
  Rect::new(
    area.x + (area.width - width) / 2,
    area.y + (area.height - height) / 2,
    width,
    height,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_text(form: &mut NoteForm, text: &str) {
    for c in text.chars() {
      form.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_fields_fill_the_draft() {
    let mut form = NoteForm::new();
    type_text(&mut form, "Groceries");
    form.handle_key(key(KeyCode::Tab));
    type_text(&mut form, "milk");
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Right));
    form.handle_key(key(KeyCode::Right));

    let draft = form.draft();
    assert_eq!(draft.title, "Groceries");
    assert_eq!(draft.content, "milk");
    assert_eq!(draft.tag, Some(Tag::Personal));
  }

  #[test]
  fn test_enter_submits_unless_already_submitting() {
    let mut form = NoteForm::new();
    assert_eq!(form.handle_key(key(KeyCode::Enter)), FormEvent::Submit);

    form.set_submitting(true);
    assert_eq!(form.handle_key(key(KeyCode::Enter)), FormEvent::Handled);
    assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEvent::Cancel);
  }

  #[test]
  fn test_validation_errors_clear_on_submit() {
    let mut form = NoteForm::new();
    let errors = form.draft().validate().unwrap_err();
    form.set_errors(errors);
    assert!(form.errors.is_some());

    form.set_submitting(true);
    assert!(form.errors.is_none());
  }

  #[test]
  fn test_overlay_fits_any_terminal_width() {
    let wide = overlay_area(Rect::new(0, 0, 1200, 50));
    assert_eq!(wide.width, 70);
    assert_eq!(wide.x, 565);
    assert_eq!(wide.height, 12);

    let medium = overlay_area(Rect::new(0, 0, 80, 24));
    assert_eq!(medium.width, 56);

    let narrow = overlay_area(Rect::new(2, 1, 20, 6));
    assert_eq!(narrow, Rect::new(2, 1, 20, 6));
  }
}
