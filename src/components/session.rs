//! Session screen: the user enters the identity subject sent with every request.

use crate::app::SelectedApp;
use crate::components::widgets::{self, Banner};
use crate::components::Component;
use crate::models::Identity;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use tracing::info;

const IDENTITY_INPUT: usize = 0;
const EXIT_BUTTON: usize = 1;

#[derive(Debug, Default)]
pub struct Session {
    identity_input: String,
    selected_index: usize,
    show_exit_dialog: bool,
    exit_yes_selected: bool,
    banner: Banner,
}

impl Session {
    /// Creates the screen, optionally pre-filled with a configured subject.
    pub fn new(prefill: Option<&str>) -> Self {
        Self {
            identity_input: prefill.unwrap_or_default().to_string(),
            selected_index: IDENTITY_INPUT,
            ..Default::default()
        }
    }

    pub fn identity_input(&self) -> &str {
        &self.identity_input
    }

    /// The identity the typed text would produce, if any.
    pub fn identity(&self) -> Option<Identity> {
        Identity::new(self.identity_input.as_str())
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn is_exit_dialog_open(&self) -> bool {
        self.show_exit_dialog
    }

    fn handle_exit_dialog_input(&mut self, key: KeyEvent) -> Option<SelectedApp> {
        match key.code {
            KeyCode::Left | KeyCode::Right => self.exit_yes_selected = !self.exit_yes_selected,
            KeyCode::Enter => {
                self.show_exit_dialog = false;
                if self.exit_yes_selected {
                    return Some(SelectedApp::Quit);
                }
            }
            KeyCode::Esc => self.show_exit_dialog = false,
            _ => {}
        }
        None
    }

    fn open_exit_dialog(&mut self) {
        self.show_exit_dialog = true;
        self.exit_yes_selected = false;
    }
}

impl Component for Session {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<SelectedApp>> {
        if self.show_exit_dialog {
            return Ok(self.handle_exit_dialog_input(key));
        }

        match key.code {
            KeyCode::Char(c) if self.selected_index == IDENTITY_INPUT => {
                self.identity_input.push(c);
                self.banner.clear();
            }
            KeyCode::Backspace if self.selected_index == IDENTITY_INPUT => {
                self.identity_input.pop();
                self.banner.clear();
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.selected_index = 1 - self.selected_index;
            }
            KeyCode::Enter if self.selected_index == EXIT_BUTTON => self.open_exit_dialog(),
            KeyCode::Enter => match self.identity() {
                Some(identity) => {
                    info!(sub = %identity, "session started");
                    return Ok(Some(SelectedApp::Home));
                }
                None => self.banner.error("Identity cannot be empty."),
            },
            KeyCode::Esc => self.open_exit_dialog(),
            _ => {}
        }
        Ok(None)
    }

    fn tick(&mut self) {
        self.banner.check_timeout();
    }

    fn render(&self, frame: &mut Frame) {
        widgets::clear_background(frame);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Length(3), // Title
                Constraint::Length(2), // Subtitle
                Constraint::Length(3), // Identity
                Constraint::Length(2), // Status
                Constraint::Length(1), // Exit
                Constraint::Min(0),
                Constraint::Length(1), // Help
            ])
            .horizontal_margin(4)
            .split(frame.area());

        let title = Paragraph::new(Text::from(vec![
            Line::from(Span::styled(
                "Clinic CRM",
                Style::default()
                    .fg(widgets::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Appointments, medicine and procedures",
                Style::default()
                    .fg(widgets::MUTED)
                    .add_modifier(Modifier::ITALIC),
            )),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(title, layout[1]);

        frame.render_widget(
            Paragraph::new("Start a session")
                .style(Style::default().fg(widgets::TEXT).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            layout[2],
        );

        let field_area = centered_column(layout[3]);
        frame.render_widget(
            widgets::input_field(
                "Identity (sub)",
                &self.identity_input,
                self.selected_index == IDENTITY_INPUT,
            ),
            field_area,
        );

        self.banner.render(frame, layout[4]);

        frame.render_widget(
            widgets::button("Exit", self.selected_index == EXIT_BUTTON, widgets::DANGER),
            layout[5],
        );

        frame.render_widget(
            widgets::help_line("Tab: Switch | Enter: Continue | Esc: Exit"),
            layout[7],
        );

        if self.show_exit_dialog {
            widgets::render_confirm_dialog(
                frame,
                "Confirm Exit",
                "Are you sure you want to quit?",
                self.exit_yes_selected,
            );
        }
    }
}

fn centered_column(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(area)[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_blank_identity_is_rejected() {
        let mut session = Session::new(Some("   "));
        let result = session.handle_input(key(KeyCode::Enter)).unwrap();
        assert_eq!(result, None);
        assert_eq!(session.banner().message().map(|(m, _)| m), Some("Identity cannot be empty."));
    }

    #[test]
    fn test_typed_identity_continues_home() {
        let mut session = Session::new(None);
        for c in "user-1".chars() {
            session.handle_input(key(KeyCode::Char(c))).unwrap();
        }
        let result = session.handle_input(key(KeyCode::Enter)).unwrap();
        assert_eq!(result, Some(SelectedApp::Home));
        assert_eq!(session.identity().unwrap().as_str(), "user-1");
    }

    #[test]
    fn test_exit_dialog_defaults_to_no() {
        let mut session = Session::new(Some("user-1"));
        session.handle_input(key(KeyCode::Esc)).unwrap();
        assert!(session.is_exit_dialog_open());
        assert_eq!(session.handle_input(key(KeyCode::Enter)).unwrap(), None);
        assert!(!session.is_exit_dialog_open());

        session.handle_input(key(KeyCode::Esc)).unwrap();
        session.handle_input(key(KeyCode::Left)).unwrap();
        assert_eq!(
            session.handle_input(key(KeyCode::Enter)).unwrap(),
            Some(SelectedApp::Quit)
        );
    }
}
