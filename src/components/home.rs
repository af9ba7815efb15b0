use crate::app::SelectedApp;
use crate::components::widgets;
use crate::components::Component;
use crate::models::Identity;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};

const MENU: usize = 0;
const SIGN_OUT_BUTTON: usize = 1;

const ENTRIES: [(&str, &str, SelectedApp); 3] = [
    ("🩺", "Appointment", SelectedApp::Appointment),
    ("📚", "Codex", SelectedApp::Codex),
    ("⚙", "Settings", SelectedApp::Settings),
];

pub struct Home {
    identity: Option<Identity>,
    selection_mode: usize,
    selected_entry: usize,
    show_sign_out_dialog: bool,
    sign_out_yes_selected: bool,
}

impl Home {
    pub fn new() -> Self {
        Self {
            identity: None,
            selection_mode: MENU,
            selected_entry: 0,
            show_sign_out_dialog: false,
            sign_out_yes_selected: false,
        }
    }

    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    pub fn selected_entry(&self) -> SelectedApp {
        ENTRIES[self.selected_entry].2
    }

    fn handle_sign_out_dialog_input(&mut self, key: KeyEvent) -> Option<SelectedApp> {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                self.sign_out_yes_selected = !self.sign_out_yes_selected;
            }
            KeyCode::Enter => {
                self.show_sign_out_dialog = false;
                if self.sign_out_yes_selected {
                    return Some(SelectedApp::None);
                }
            }
            KeyCode::Esc => self.show_sign_out_dialog = false,
            _ => {}
        }
        None
    }

    fn open_sign_out_dialog(&mut self) {
        self.show_sign_out_dialog = true;
        self.sign_out_yes_selected = false;
    }
}

impl Default for Home {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Home {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<SelectedApp>> {
        if self.show_sign_out_dialog {
            return Ok(self.handle_sign_out_dialog_input(key));
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.selection_mode = 1 - self.selection_mode;
            }
            KeyCode::Up if self.selection_mode == MENU => {
                self.selected_entry = (self.selected_entry + ENTRIES.len() - 1) % ENTRIES.len();
            }
            KeyCode::Down if self.selection_mode == MENU => {
                self.selected_entry = (self.selected_entry + 1) % ENTRIES.len();
            }
            KeyCode::Enter if self.selection_mode == MENU => {
                return Ok(Some(self.selected_entry()));
            }
            KeyCode::Enter | KeyCode::Esc => self.open_sign_out_dialog(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame) {
        widgets::clear_background(frame);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(7),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let sub = self
            .identity
            .as_ref()
            .map(Identity::as_str)
            .unwrap_or("guest");
        let welcome_text = Line::from(vec![
            Span::styled(
                "Welcome to Clinic CRM, ",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                sub.to_string(),
                Style::default().fg(widgets::ACCENT).add_modifier(Modifier::BOLD),
            ),
        ]);

        let welcome_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(widgets::BORDER))
            .style(Style::default().bg(Color::Rgb(24, 24, 40)));
        let welcome_inner = welcome_block.inner(layout[0]);
        frame.render_widget(welcome_block, layout[0]);
        frame.render_widget(
            Paragraph::new(welcome_text)
                .alignment(Alignment::Center)
                .block(Block::default().padding(Padding::new(0, 0, 1, 0))),
            welcome_inner,
        );

        frame.render_widget(
            Paragraph::new("Please select a task:")
                .style(Style::default().fg(Color::Rgb(180, 190, 254)))
                .alignment(Alignment::Center),
            layout[1],
        );

        let menu_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .margin(1)
            .split(layout[2])[1];

        let menu_focused = self.selection_mode == MENU;
        let items: Vec<ListItem> = ENTRIES
            .iter()
            .enumerate()
            .map(|(idx, (icon, label, _))| {
                let selected = idx == self.selected_entry;
                let style = match (selected, menu_focused) {
                    (true, true) => Style::default().fg(widgets::FOCUS).add_modifier(Modifier::BOLD),
                    (true, false) => Style::default()
                        .fg(widgets::SUCCESS)
                        .add_modifier(Modifier::BOLD),
                    _ => Style::default().fg(Color::Rgb(200, 200, 220)),
                };
                let prefix = if selected { " ► " } else { "   " };
                ListItem::new(format!("{prefix}{icon} {label}")).style(style)
            })
            .collect();

        frame.render_widget(
            List::new(items).block(widgets::panel_block(" Clinic ".to_string(), menu_focused)),
            menu_area,
        );

        frame.render_widget(
            widgets::button(
                "Sign Out",
                self.selection_mode == SIGN_OUT_BUTTON,
                widgets::DANGER,
            )
            .block(Block::default().padding(Padding::new(0, 0, 1, 0))),
            layout[3],
        );

        frame.render_widget(
            widgets::help_line("↑↓: Navigate | Tab: Switch | Enter: Open | Esc: Sign Out"),
            layout[4],
        );

        if self.show_sign_out_dialog {
            widgets::render_confirm_dialog(
                frame,
                "Confirm Sign Out",
                "Are you sure you want to sign out?",
                self.sign_out_yes_selected,
            );
        }
    }
}
