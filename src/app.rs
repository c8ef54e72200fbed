use crate::collection::{CollectionEvent, NoteCollection, NotesView};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::notehub::cache::NoteCache;
use crate::notehub::client::NoteClient;
use crate::ui;
use crate::ui::components::{FormEvent, InputResult, NoteForm, TextInput};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::info;

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Search,
  Create,
}

/// Main application state
pub struct App {
  api_url: String,
  notes: NoteCollection<NoteClient>,
  /// Controller state as of the last event
  view: NotesView,
  list_state: ListState,
  mode: Mode,
  search: TextInput,
  form: Option<NoteForm>,
  /// Last outcome message and whether it is an error
  status: Option<(String, bool)>,
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config) -> Result<Self> {
    let client = NoteClient::new(config)?;
    let cache = NoteCache::new().with_stale_time(config.stale_time());
    let notes = NoteCollection::new(client, cache, config.per_page, config.debounce());

    Ok(Self {
      api_url: config.api_url.clone(),
      notes,
      view: NotesView::default(),
      list_state: ListState::default(),
      mode: Mode::Normal,
      search: TextInput::new(),
      form: None,
      status: None,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    self.notes.shutdown();
    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(100));

    // Initial data load
    self.refresh();

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Resize) | Some(Event::Tick) => {}
        None => break,
      }
      self.refresh();
    }

    Ok(())
  }

  /// Advance the controller and react to finished writes
  fn refresh(&mut self) {
    for event in self.notes.tick() {
      match event {
        CollectionEvent::NoteCreated(note) => {
          self.form = None;
          self.mode = Mode::Normal;
          self.status = Some((format!("Created \"{}\"", note.title), false));
        }
        CollectionEvent::NoteDeleted { message, .. } => {
          self.status = Some((message, false));
        }
        CollectionEvent::MutationFailed(message) => {
          if let Some(form) = self.form.as_mut() {
            form.set_submitting(false);
          }
          self.status = Some((message, true));
        }
      }
    }
    self.view = self.notes.view();
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Search => self.handle_search_mode_key(key),
      Mode::Create => self.handle_create_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    self.status = None;
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.list_state.select_previous(),
      KeyCode::Down | KeyCode::Char('j') => self.list_state.select_next(),
      KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
        self.notes.next_page();
        self.list_state.select(Some(0));
      }
      KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
        self.notes.prev_page();
        self.list_state.select(Some(0));
      }

      // Mode switches
      KeyCode::Char('/') => self.mode = Mode::Search,
      KeyCode::Char('n') => {
        self.form = Some(NoteForm::new());
        self.mode = Mode::Create;
      }

      // Actions
      KeyCode::Char('d') => self.delete_selected(),
      KeyCode::Char('r') => self.notes.refetch(),
      _ => {}
    }
  }

  fn handle_search_mode_key(&mut self, key: KeyEvent) {
    match self.search.handle_key(key) {
      InputResult::Changed => self.notes.change_search(self.search.value()),
      InputResult::Submitted(_) => {
        self.notes.submit_search();
        self.mode = Mode::Normal;
      }
      InputResult::Cancelled => {
        // Esc drops the filter right away
        if !self.search.is_empty() {
          self.search.clear();
          self.notes.change_search("");
          self.notes.submit_search();
        }
        self.mode = Mode::Normal;
      }
      InputResult::NotHandled => {}
    }
  }

  fn handle_create_mode_key(&mut self, key: KeyEvent) {
    let Some(form) = self.form.as_mut() else {
      self.mode = Mode::Normal;
      return;
    };

    match form.handle_key(key) {
      FormEvent::Handled => {}
      FormEvent::Submit => match self.notes.create_note(&form.draft()) {
        Ok(()) => form.set_submitting(true),
        Err(errors) => form.set_errors(errors),
      },
      FormEvent::Cancel => {
        self.form = None;
        self.mode = Mode::Normal;
      }
    }
  }

  fn delete_selected(&mut self) {
    if self.view.is_deleting {
      return;
    }
    let selected = self
      .list_state
      .selected()
      .and_then(|i| self.view.notes.get(i));
    if let Some(note) = selected {
      info!(id = note.id, "Deleting note");
      self.notes.delete_note(note.id);
    }
  }

  // Accessors for UI rendering
  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn api_url(&self) -> &str {
    &self.api_url
  }

  pub fn search_input(&self) -> &TextInput {
    &self.search
  }

  pub fn view(&self) -> &NotesView {
    &self.view
  }

  pub fn list_state_mut(&mut self) -> &mut ListState {
    &mut self.list_state
  }

  pub fn status(&self) -> Option<(&str, bool)> {
    self
      .status
      .as_ref()
      .map(|(message, is_error)| (message.as_str(), *is_error))
  }

  pub fn form(&self) -> Option<&NoteForm> {
    self.form.as_ref()
  }
}
