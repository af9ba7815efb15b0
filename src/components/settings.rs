//! Read-only view of the running configuration.

use crate::app::SelectedApp;
use crate::components::widgets;
use crate::components::Component;
use crate::config::Config;
use crate::models::Identity;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};

pub struct Settings {
    rows: Vec<(&'static str, String)>,
}

impl Settings {
    pub fn new(config: &Config, identity: Option<&Identity>) -> Self {
        let rows = vec![
            ("Backend", config.domain_url.clone()),
            (
                "Signed in as",
                identity.map(ToString::to_string).unwrap_or_else(|| "-".to_string()),
            ),
            ("Log file", config.log_file.display().to_string()),
            (
                "Request timeout",
                format!("{}s", config.request_timeout.as_secs()),
            ),
            ("Version", env!("CARGO_PKG_VERSION").to_string()),
        ];
        Self { rows }
    }

    pub fn rows(&self) -> &[(&'static str, String)] {
        &self.rows
    }
}

impl Component for Settings {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<SelectedApp>> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => Ok(Some(SelectedApp::None)),
            _ => Ok(None),
        }
    }

    fn render(&self, frame: &mut Frame) {
        widgets::clear_background(frame);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(1),
            ])
            .split(frame.area());

        widgets::render_header(frame, layout[0], "⚙ Settings");

        let rows = self.rows.iter().map(|(label, value)| {
            Row::new(vec![
                Cell::from(*label).style(Style::default().fg(widgets::MUTED)),
                Cell::from(value.clone()).style(Style::default().fg(widgets::TEXT)),
            ])
        });
        let area = layout[1].inner(Margin {
            vertical: 1,
            horizontal: 4,
        });
        frame.render_widget(
            Table::new(rows, [Constraint::Length(18), Constraint::Min(10)])
                .block(widgets::panel_block(" Configuration ".to_string(), true)),
            area,
        );

        frame.render_widget(widgets::help_line("Esc/Enter: Back"), layout[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_settings_show_identity_and_backend() {
        let config = Config {
            domain_url: "http://localhost:8080".to_string(),
            user_sub: None,
            log_file: PathBuf::from("crm.log"),
            request_timeout: Duration::from_secs(7),
        };
        let identity = Identity::new("user-1");
        let settings = Settings::new(&config, identity.as_ref());

        let value = |label: &str| {
            settings
                .rows()
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(value("Backend").as_deref(), Some("http://localhost:8080"));
        assert_eq!(value("Signed in as").as_deref(), Some("user-1"));
        assert_eq!(value("Request timeout").as_deref(), Some("7s"));
    }
}
