use crate::cache::{CacheGateway, KvStorage, NoopStorage, SqliteStorage};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::feed::{FeedController, FeedOptions, FeedState};
use crate::flickr::FlickrClient;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;

/// Start fetching the next page when the selection gets this close to the
/// end of the list (the terminal analogue of a scroll threshold).
const NEAR_END_THRESHOLD: usize = 5;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Search,
}

/// Main application state
pub struct App {
  /// The sync controller driving everything below the chrome
  feed: FeedController,

  /// Current input mode
  mode: Mode,

  /// Search box contents
  search_input: String,

  /// Selected row in the photo list
  selected: usize,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, initial_query: Option<String>) -> Result<Self> {
    let client = FlickrClient::new(&config)?;

    let storage: Box<dyn KvStorage> = if config.cache.enabled {
      Box::new(SqliteStorage::open()?)
    } else {
      Box::new(NoopStorage)
    };

    let options = FeedOptions {
      cache_ttl: Duration::from_secs(config.cache.ttl_secs),
      debounce_delay: Duration::from_millis(config.search.debounce_ms),
    };

    let feed = FeedController::new(CacheGateway::new(storage), options, move |query: &str, page: u32| {
      let client = client.clone();
      let query = query.to_string();
      async move { client.fetch_page(&query, page).await }
    });

    Ok(Self {
      feed,
      mode: Mode::Normal,
      search_input: initial_query.unwrap_or_default(),
      selected: 0,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));

    // Initial load: CLI query if given, otherwise the home feed
    let initial = self.search_input.trim().to_string();
    self.feed.start(&initial);

    // Main loop
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        match event {
          Event::Key(key) => self.handle_key(key),
          Event::Tick => {
            self.feed.poll();
          }
        }
      }
      self.clamp_selection();
    }

    // Stop applying responses before tearing the terminal down
    self.feed.cancel();

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Search => self.handle_search_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => {
        self.should_quit = true;
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Navigation; moving toward the end may trigger pagination
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Home | KeyCode::Char('g') => {
        self.selected = 0;
      }
      KeyCode::End | KeyCode::Char('G') => {
        self.selected = self.feed.state().photos.len().saturating_sub(1);
        self.maybe_load_more();
      }

      // Feed commands
      KeyCode::Char('r') => self.feed.refresh(),
      KeyCode::Char('R') => self.feed.retry(),

      // Search
      KeyCode::Char('/') => {
        self.mode = Mode::Search;
      }
      KeyCode::Esc => {
        // Drop an active search and return to the home feed
        if !self.search_input.is_empty() {
          self.search_input.clear();
          self.feed.set_query_text("");
        }
      }

      _ => {}
    }
  }

  fn handle_search_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
      }
      KeyCode::Enter => {
        self.feed.submit_query(&self.search_input);
        self.mode = Mode::Normal;
      }
      KeyCode::Backspace => {
        self.search_input.pop();
        self.feed.set_query_text(&self.search_input);
      }
      KeyCode::Char(c) => {
        self.search_input.push(c);
        self.feed.set_query_text(&self.search_input);
      }
      _ => {}
    }
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.feed.state().photos.len();
    if len == 0 {
      return;
    }

    let next = self.selected as i32 + delta;
    self.selected = next.clamp(0, len as i32 - 1) as usize;
    self.maybe_load_more();
  }

  /// Kick off the next page once the selection nears the end of the list.
  /// The controller ignores this while a request is in flight or when no
  /// further pages exist.
  fn maybe_load_more(&mut self) {
    let state = self.feed.state();
    let remaining = state.photos.len().saturating_sub(self.selected + 1);
    if remaining <= NEAR_END_THRESHOLD {
      self.feed.load_more();
    }
  }

  fn clamp_selection(&mut self) {
    let len = self.feed.state().photos.len();
    if len == 0 {
      self.selected = 0;
    } else if self.selected >= len {
      self.selected = len - 1;
    }
  }

  // Accessors for UI rendering
  pub fn feed_state(&self) -> &FeedState {
    self.feed.state()
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn search_input(&self) -> &str {
    &self.search_input
  }

  pub fn selected(&self) -> usize {
    self.selected
  }
}
