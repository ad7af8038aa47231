use crate::app::{App, Mode};
use crate::feed::Phase;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // Search bar
      Constraint::Min(1),    // Photo list
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_search_bar(frame, chunks[0], app);
  draw_photo_list(frame, chunks[1], app);
  draw_status_bar(frame, chunks[2], app);
}

fn draw_search_bar(frame: &mut Frame, area: Rect, app: &App) {
  let active = *app.mode() == Mode::Search;

  let border_style = if active {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default().fg(Color::DarkGray)
  };

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(border_style)
    .title(" Search ");

  let mut spans = vec![Span::raw(app.search_input())];
  if active {
    spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
  }

  let paragraph = Paragraph::new(Line::from(spans)).block(block);
  frame.render_widget(paragraph, area);
}

fn draw_photo_list(frame: &mut Frame, area: Rect, app: &App) {
  let state = app.feed_state();

  // Blocking states render a centered message instead of the list
  if state.phase == Phase::Error {
    let message = state
      .error_message
      .as_deref()
      .unwrap_or("Something went wrong.");
    draw_centered(frame, area, &format!("{message}  (R to retry)"), Color::Red);
    return;
  }

  if state.photos.is_empty() {
    if state.phase.is_first_page_load() {
      draw_centered(frame, area, "Loading photos...", Color::DarkGray);
    } else if state.phase == Phase::Ready {
      let message = if state.query.is_empty() {
        "No photos found".to_string()
      } else {
        format!("No results for \"{}\"", state.query)
      };
      draw_centered(frame, area, &message, Color::DarkGray);
    }
    return;
  }

  let items: Vec<ListItem> = state
    .photos
    .iter()
    .map(|photo| {
      ListItem::new(Line::from(vec![
        Span::raw(photo.title.clone()),
        Span::raw("  "),
        Span::styled(photo.url.clone(), Style::default().fg(Color::DarkGray)),
      ]))
    })
    .collect();

  let title = if state.query.is_empty() {
    format!(" Photos ({}) ", state.photos.len())
  } else {
    format!(" \"{}\" ({}) ", state.query, state.photos.len())
  };

  let list = List::new(items)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut list_state = ListState::default().with_selected(Some(app.selected()));
  frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_centered(frame: &mut Frame, area: Rect, message: &str, color: Color) {
  let paragraph = Paragraph::new(message.to_string())
    .style(Style::default().fg(color))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
  frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let state = app.feed_state();

  // Inline errors (failed load-more) take precedence over hints
  let (content, style) = if state.phase == Phase::Ready && state.error_message.is_some() {
    let message = state.error_message.as_deref().unwrap_or_default();
    (
      format!(" {message}  R:retry"),
      Style::default().fg(Color::Red),
    )
  } else {
    match state.phase {
      Phase::LoadingMore => (
        " Loading more...".to_string(),
        Style::default().fg(Color::Yellow),
      ),
      Phase::Refreshing => (
        " Refreshing...".to_string(),
        Style::default().fg(Color::Yellow),
      ),
      _ => {
        let hint = match app.mode() {
          Mode::Search => " Enter:search  Esc:back".to_string(),
          Mode::Normal => {
            let more = if state.has_more { "+" } else { "" };
            format!(
              " /:search  j/k:nav  r:refresh  Esc:clear  q:quit  [page {}{}]",
              state.page, more
            )
          }
        };
        (hint, Style::default().fg(Color::DarkGray))
      }
    }
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
