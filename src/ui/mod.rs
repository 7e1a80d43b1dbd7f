mod movie_detail;
mod movie_list;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

use crate::app::App;
use crate::error::LoadError;
use crate::selection::Selection;
use crate::types::Category;

pub fn render(frame: &mut Frame, app: &App) {
    let show_search = app.search_mode || app.filter.is_active();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(if show_search { 3 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    if show_search {
        render_search(frame, app, chunks[2]);
    }
    movie_list::render(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    if let Selection::Open(movie) = app.selection.state() {
        movie_detail::render(frame, app, movie);
    }
}

/// Cut `s` to at most `max` chars, marking the cut with "..."
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("marquee - {} ({})", app.category, app.source().name());

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[{}] {}", i + 1, c))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.category.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let border = if app.search_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![Span::raw(app.filter.query().to_string())];
    if app.search_mode {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Search movies "),
    );

    frame.render_widget(search, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(err @ LoadError::PageLoadFailed { .. }) = app.fetcher.last_error() {
        Line::from(vec![Span::styled(
            format!("{} | r: retry", err),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )])
    } else if app.fetcher.is_loading_initial() || app.fetcher.is_loading_more() {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = if app.selection.is_open() {
            "o: open in browser | y: copy URL | Esc/q: close"
        } else if app.search_mode {
            "type to filter | Up/Down: nav | Ctrl+u: clear | Enter/Esc: done"
        } else {
            "j/k/g/G: nav | Enter: details | /: search | Tab/1-4: category | r: retry | R: reload | q: quit"
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio::sync::mpsc;

    use crate::action::Action;
    use crate::error::Result;
    use crate::source::CatalogSource;
    use crate::types::{movie, Movie, Page};

    #[derive(Debug)]
    struct NoSource;

    #[async_trait]
    impl CatalogSource for NoSource {
        fn name(&self) -> &str {
            "stub"
        }

        fn web_url(&self, movie: &Movie) -> String {
            format!("https://example.test/movie/{}", movie.id)
        }

        fn image_base_url(&self) -> &str {
            "https://img.example.test"
        }

        async fn fetch_page(&self, _category: Category, page: u32) -> Result<Page<Movie>> {
            Ok(Page {
                items: vec![],
                page,
                total_pages: 0,
            })
        }
    }

    fn app_with(movies: Vec<Movie>, total_pages: u32) -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Arc::new(NoSource), Category::NowPlaying, 5, tx);
        let request = app.fetcher.request_initial_load().unwrap();
        app.fetcher.complete(
            request,
            Ok(Page {
                items: movies,
                page: 1,
                total_pages,
            }),
        );
        app
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("Amélie", 10), "Amélie");
        assert_eq!(truncate("Crouching Tiger", 8), "Crouc...");
        assert_eq!(truncate("日本語のタイトル", 5), "日本...");
    }

    #[test]
    fn list_shows_filtered_movies_only() {
        let mut app = app_with(vec![movie(1, "Alpha"), movie(2, "Beta")], 2);
        let screen = draw(&app);
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("Beta"));
        assert!(screen.contains("Now Playing"));

        app.update(Action::SearchInput('a'));
        app.update(Action::SearchInput('l'));
        let screen = draw(&app);
        assert!(screen.contains("Alpha"));
        assert!(!screen.contains("Beta"));
        assert!(screen.contains("Search movies"));
    }

    #[test]
    fn list_title_shows_pages_loaded() {
        let mut app = app_with(vec![movie(1, "Alpha"), movie(2, "Beta")], 3);
        let screen = draw(&app);
        assert!(screen.contains("Movies (2) - page 1/3"));

        app.update(Action::SearchInput('b'));
        let screen = draw(&app);
        assert!(screen.contains("Movies (1 of 2) - page 1/3"));
    }

    #[test]
    fn overlay_shows_selected_movie() {
        let mut app = app_with(vec![movie(1, "Alpha")], 1);
        app.update(Action::Select);
        let screen = draw(&app);
        assert!(screen.contains("Release Date"));
        assert!(screen.contains("Rating"));
    }

    #[test]
    fn initial_error_offers_retry() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Arc::new(NoSource), Category::NowPlaying, 5, tx);
        let request = app.fetcher.request_initial_load().unwrap();
        app.fetcher
            .complete(request, Err("HTTP error! Status: 401".to_string()));

        let screen = draw(&app);
        assert!(screen.contains("Status: 401"));
        assert!(screen.contains("Press r to retry"));
    }
}
