use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::types::Movie;

/// Detail overlay for the selected movie, drawn over the list.
pub fn render(frame: &mut Frame, app: &App, movie: &Movie) {
    let outer = frame.area();
    let width = popup_width(outer.width);
    let area = centered_rect(width, 18, outer);
    frame.render_widget(Clear, area);

    let poster = movie
        .poster_url(app.source().image_base_url())
        .unwrap_or_else(|| "no poster".to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Release Date: ", Style::default().fg(Color::Gray)),
            Span::raw(movie.release_label()),
        ]),
        Line::from(vec![
            Span::styled("Rating: ", Style::default().fg(Color::Gray)),
            Span::styled(
                movie.rating_label(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Poster: ", Style::default().fg(Color::Gray)),
            Span::styled(poster, Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];

    if movie.overview.is_empty() {
        lines.push(Line::from(Span::styled(
            "No overview available.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(movie.overview.clone()));
    }

    let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(
                format!(" #{} ", movie.id),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(" [o]pen  [y]ank  [Esc] close ").centered()),
    );

    frame.render_widget(popup, area);
}

/// Rect of the given size centered in `outer`, clipped to fit
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Four fifths of the screen, never narrower than 40 columns.
fn popup_width(outer_width: u16) -> u16 {
    (outer_width / 5 * 4).max(40)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_width_on_huge_terminal() {
        assert_eq!(popup_width(100), 80);
        assert_eq!(popup_width(30), 40);
        assert_eq!(popup_width(u16::MAX), 52428);
    }

    #[test]
    fn centered_rect_is_centered() {
        let r = centered_rect(40, 10, Rect::new(0, 0, 100, 30));
        assert_eq!(r, Rect::new(30, 10, 40, 10));
    }

    #[test]
    fn centered_rect_clips_to_outer() {
        let r = centered_rect(200, 50, Rect::new(0, 0, 80, 24));
        assert_eq!(r, Rect::new(0, 0, 80, 24));
    }
}
