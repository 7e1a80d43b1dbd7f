use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::error::LoadError;
use crate::fetcher::FetchCursor;

use super::truncate;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let fetcher = &app.fetcher;
    let block = Block::default().borders(Borders::ALL).title("Movies");

    if fetcher.is_loading_initial() {
        let loading = Paragraph::new(format!("Loading {} movies...", app.category))
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(loading, area);
        return;
    }

    if fetcher.items().is_empty() {
        let paragraph = match fetcher.last_error() {
            Some(err @ LoadError::InitialLoadFailed(_)) => Paragraph::new(vec![
                Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from("Press r to retry"),
            ]),
            _ => Paragraph::new("No movies found - Press r to reload")
                .style(Style::default().fg(Color::Gray)),
        };
        frame.render_widget(
            paragraph
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
        return;
    }

    let visible = app.visible();
    let count = if app.filter.is_active() {
        format!("{} of {}", visible.len(), fetcher.catalog().len())
    } else {
        fetcher.catalog().len().to_string()
    };
    let title = format!(" Movies ({}) - {} ", count, page_label(&fetcher.cursor()));
    let block = Block::default().borders(Borders::ALL).title(title);

    if visible.is_empty() {
        let empty = Paragraph::new(format!(
            "No loaded movies match \"{}\"",
            app.filter.query()
        ))
        .block(block)
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 22; // space(1) + year(4) + spaces(2) + rating(4) + spaces(2) + votes(~9)
    let flex = w.saturating_sub(fixed).max(10);

    let mut items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let style = if i == app.list_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let year = movie
                .release_date
                .map(|d| d.format("%Y").to_string())
                .unwrap_or_else(|| "----".to_string());

            let rating_color = match movie.vote_average {
                r if r >= 7.0 => Color::Green,
                r if r >= 5.0 => Color::Yellow,
                _ => Color::DarkGray,
            };

            let line = Line::from(vec![
                Span::styled(format!("{:<flex$}", truncate(&movie.title, flex)), style),
                Span::raw(" "),
                Span::styled(year, Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(
                    format!("{:>4.1}", movie.vote_average),
                    Style::default().fg(rating_color),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{:>6} votes", movie.vote_count),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    if fetcher.is_loading_more() {
        items.push(ListItem::new(Line::from(Span::styled(
            "  Loading more...",
            Style::default().fg(Color::Yellow),
        ))));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.list_index));

    frame.render_stateful_widget(list, area, &mut state);
}

/// "page 2/7" once the total is known, "page 2" before that.
fn page_label(cursor: &FetchCursor) -> String {
    let loaded = cursor.next_page.saturating_sub(1);
    match cursor.total_pages {
        Some(total) => format!("page {}/{}", loaded, total),
        None => format!("page {}", loaded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_label_tracks_cursor() {
        let mut cursor = FetchCursor::default();
        assert_eq!(page_label(&cursor), "page 0");

        cursor.next_page = 3;
        cursor.total_pages = Some(7);
        assert_eq!(page_label(&cursor), "page 2/7");
    }
}
