//! Shared palette and small building blocks used by every screen.

use crate::tui::Frame;
use crate::utils::centered_rect;
use ratatui::{prelude::*, widgets::*};
use std::time::{Duration, Instant};

pub const BACKGROUND: Color = Color::Rgb(16, 16, 28);
pub const PANEL: Color = Color::Rgb(22, 22, 35);
pub const FIELD: Color = Color::Rgb(26, 26, 36);
pub const BORDER: Color = Color::Rgb(75, 75, 120);
pub const BORDER_IDLE: Color = Color::Rgb(140, 140, 200);
pub const FOCUS: Color = Color::Rgb(250, 250, 110);
pub const TEXT: Color = Color::Rgb(220, 220, 240);
pub const TITLE: Color = Color::Rgb(230, 230, 250);
pub const MUTED: Color = Color::Rgb(180, 180, 200);
pub const ACCENT: Color = Color::Rgb(129, 199, 245);
pub const SUCCESS: Color = Color::Rgb(140, 219, 140);
pub const DANGER: Color = Color::Rgb(255, 100, 100);

const BANNER_TIMEOUT: Duration = Duration::from_secs(5);

/// Paints the screen background.
pub fn clear_background(frame: &mut Frame) {
    frame.render_widget(
        Block::default().style(Style::default().bg(BACKGROUND)),
        frame.area(),
    );
}

/// Title strip with a bottom border.
pub fn render_header(frame: &mut Frame, area: Rect, title: &str) {
    let header = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(BORDER))
        .style(Style::default().bg(BACKGROUND));
    frame.render_widget(header, area);

    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(TITLE)
                .add_modifier(Modifier::BOLD)
                .bg(BACKGROUND),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

/// Rounded block whose border lights up when focused.
pub fn panel_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            title,
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        ))
        .border_style(if focused {
            Style::default().fg(FOCUS)
        } else {
            Style::default().fg(BORDER_IDLE)
        })
        .style(Style::default().bg(PANEL))
}

/// Single-line text input.
pub fn input_field(title: &str, value: &str, focused: bool) -> Paragraph<'static> {
    Paragraph::new(value.to_string())
        .style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(TEXT)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Span::styled(format!(" {title} "), Style::default().fg(TITLE)))
                .border_style(if focused {
                    Style::default().fg(FOCUS)
                } else {
                    Style::default().fg(BORDER_IDLE)
                })
                .style(Style::default().bg(FIELD)),
        )
}

/// Text button rendered as `► label ◄` when focused.
pub fn button(label: &str, focused: bool, color: Color) -> Paragraph<'static> {
    let text = if focused {
        format!("► {label} ◄")
    } else {
        format!("  {label}  ")
    };
    let style = if focused {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED)
    };
    Paragraph::new(text).style(style).alignment(Alignment::Center)
}

pub fn help_line(text: &str) -> Paragraph<'static> {
    Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::Rgb(140, 140, 170)))
        .alignment(Alignment::Center)
}

/// Yes/No confirmation popup centred on the screen.
pub fn render_confirm_dialog(frame: &mut Frame, title: &str, question: &str, yes_selected: bool) {
    let area = centered_rect(50, 20, frame.area());
    let block = Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(FOCUS))
        .style(Style::default().bg(PANEL));

    let text = vec![
        Line::from(question.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " Yes ",
                Style::default().fg(if yes_selected { SUCCESS } else { Color::DarkGray }),
            ),
            Span::raw("  "),
            Span::styled(
                " No ",
                Style::default().fg(if yes_selected { Color::DarkGray } else { DANGER }),
            ),
        ]),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(TEXT))
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
}

/// Status message that disappears after a few seconds.
#[derive(Debug, Clone, Default)]
pub struct Banner {
    message: Option<(String, BannerKind)>,
    shown_at: Option<Instant>,
}

impl Banner {
    pub fn error(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), BannerKind::Error));
        self.shown_at = Some(Instant::now());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), BannerKind::Success));
        self.shown_at = Some(Instant::now());
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.shown_at = None;
    }

    pub fn message(&self) -> Option<(&str, BannerKind)> {
        self.message.as_ref().map(|(m, k)| (m.as_str(), *k))
    }

    /// Hides the message once it has been visible long enough.
    pub fn check_timeout(&mut self) {
        if let Some(shown_at) = self.shown_at {
            if shown_at.elapsed() >= BANNER_TIMEOUT {
                self.clear();
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let paragraph = match &self.message {
            Some((message, BannerKind::Success)) => Paragraph::new(format!("✓ {message}"))
                .style(Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)),
            Some((message, BannerKind::Error)) => Paragraph::new(format!("⚠ {message}"))
                .style(Style::default().fg(DANGER).add_modifier(Modifier::BOLD)),
            None => Paragraph::new(""),
        };
        frame.render_widget(paragraph.alignment(Alignment::Center), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_keeps_latest_message() {
        let mut banner = Banner::default();
        assert!(banner.message().is_none());
        banner.error("Failed to load");
        banner.success("Added");
        assert_eq!(banner.message(), Some(("Added", BannerKind::Success)));
        banner.check_timeout();
        assert!(banner.message().is_some());
        banner.clear();
        assert!(banner.message().is_none());
    }
}
