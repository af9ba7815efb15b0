//! Appointment screen: client header, one ledger panel per line kind and the
//! grand total the two panels feed.

pub mod header;
pub mod line_items;

use crate::app::SelectedApp;
use crate::bridge::{TotalSink, TotalsBoard};
use crate::components::widgets;
use crate::components::Component;
use crate::dispatch::{Dispatcher, Response};
use crate::models::{Client, LineKind};
use crate::tui::Frame;
use crate::utils::format_money;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use header::{ClientHeader, HeaderAction};
use line_items::{LineItemsPanel, PanelAction};
use ratatui::{prelude::*, widgets::*};
use time::{macros::format_description, OffsetDateTime};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Client,
    Medicine,
    Procedures,
}

impl Section {
    fn next(self) -> Self {
        match self {
            Section::Client => Section::Medicine,
            Section::Medicine => Section::Procedures,
            Section::Procedures => Section::Client,
        }
    }

    fn previous(self) -> Self {
        match self {
            Section::Client => Section::Procedures,
            Section::Medicine => Section::Client,
            Section::Procedures => Section::Medicine,
        }
    }
}

pub struct Appointment {
    header: ClientHeader,
    medicine: LineItemsPanel,
    procedures: LineItemsPanel,
    totals: TotalsBoard,
    section: Section,
    client_id: String,
    client_name: String,
    client_patients: Vec<String>,
}

impl Appointment {
    /// Builds the screen and starts loading both catalogs.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            header: ClientHeader::new(dispatcher.clone()),
            medicine: LineItemsPanel::new(LineKind::Medicine, dispatcher.clone()),
            procedures: LineItemsPanel::new(LineKind::Procedure, dispatcher),
            totals: TotalsBoard::new(),
            section: Section::Client,
            client_id: String::new(),
            client_name: String::new(),
            client_patients: Vec::new(),
        }
    }

    pub fn totals(&self) -> &TotalsBoard {
        &self.totals
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn header(&self) -> &ClientHeader {
        &self.header
    }

    pub fn panel(&self, kind: LineKind) -> &LineItemsPanel {
        match kind {
            LineKind::Medicine => &self.medicine,
            LineKind::Procedure => &self.procedures,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn client_patients(&self) -> &[String] {
        &self.client_patients
    }

    fn select_client(&mut self, client: Client) {
        self.client_id = client.id;
        self.client_name = client.name;
        self.client_patients = client.patients;
    }

    fn apply_panel_action(&mut self, kind: LineKind, action: Option<PanelAction>) {
        if let Some(PanelAction::TotalChanged(total)) = action {
            debug!(kind = kind.label(), %total, "total published");
            self.totals.publish(kind, total);
        }
    }

    fn render_grand_total(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                format!("Medicine: {}   ", format_money(self.totals.get(LineKind::Medicine))),
                Style::default().fg(widgets::MUTED),
            ),
            Span::styled(
                format!(
                    "Procedures: {}   ",
                    format_money(self.totals.get(LineKind::Procedure))
                ),
                Style::default().fg(widgets::MUTED),
            ),
            Span::styled(
                format!("Grand Total: {}", format_money(self.totals.grand_total())),
                Style::default()
                    .fg(widgets::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(widgets::BORDER))
            .style(Style::default().bg(widgets::PANEL));
        frame.render_widget(
            Paragraph::new(line).alignment(Alignment::Right).block(block),
            area,
        );
    }
}

fn today() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!("[day].[month].[year]"))
        .unwrap_or_default()
}

impl Component for Appointment {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<SelectedApp>> {
        if self.header.backdrop().is_open() {
            if let Some(HeaderAction::ClientSelected(client)) = self.header.handle_key(key) {
                self.select_client(client);
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc => return Ok(Some(SelectedApp::None)),
            KeyCode::PageDown => self.section = self.section.next(),
            KeyCode::PageUp => self.section = self.section.previous(),
            _ => match self.section {
                Section::Client => {
                    if let Some(HeaderAction::ClientSelected(client)) = self.header.handle_key(key)
                    {
                        self.select_client(client);
                    }
                }
                Section::Medicine => {
                    let action = self.medicine.handle_key(key);
                    self.apply_panel_action(LineKind::Medicine, action);
                }
                Section::Procedures => {
                    let action = self.procedures.handle_key(key);
                    self.apply_panel_action(LineKind::Procedure, action);
                }
            },
        }
        Ok(None)
    }

    fn handle_response(&mut self, response: Response) {
        let ticket = response.ticket;
        if self.header.owns(ticket) {
            self.header.handle_response(response);
        } else if self.medicine.owns(ticket) {
            self.medicine.handle_response(response);
        } else if self.procedures.owns(ticket) {
            self.procedures.handle_response(response);
        } else {
            info!(ticket, "dropping response nobody is waiting for");
        }
    }

    fn tick(&mut self) {
        self.header.tick();
        self.medicine.tick();
        self.procedures.tick();
    }

    fn render(&self, frame: &mut Frame) {
        widgets::clear_background(frame);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(8), // Client
                Constraint::Min(12),   // Panels
                Constraint::Length(3), // Grand total
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        widgets::render_header(frame, layout[0], &format!("🩺 Appointment  {}", today()));

        self.header
            .render(frame, layout[1], self.section == Section::Client);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(layout[2]);
        self.medicine
            .render(frame, panels[0], self.section == Section::Medicine);
        self.procedures
            .render(frame, panels[1], self.section == Section::Procedures);

        self.render_grand_total(frame, layout[3]);

        frame.render_widget(
            widgets::help_line(
                "PgUp/PgDn: Switch Section | Tab: Next Field | Enter: Activate | Esc: Back",
            ),
            layout[4],
        );

        self.header.render_backdrop(frame);
    }
}
