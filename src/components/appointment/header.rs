//! Appointment header: find a client by name and pick one from the backdrop.

use crate::backdrop::Backdrop;
use crate::components::widgets::{self, Banner};
use crate::dispatch::{Dispatcher, Payload, RequestSlot, Response, Ticket};
use crate::models::Client;
use crate::tui::Frame;
use crate::utils::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use tracing::{debug, info, warn};

pub const NAME_INPUT: usize = 0;
pub const SELECT_BUTTON: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderAction {
    ClientSelected(Client),
}

pub struct ClientHeader {
    dispatcher: Dispatcher,
    name_input: String,
    last_query: String,
    selected: Option<Client>,
    backdrop: Backdrop<Client>,
    search_request: RequestSlot,
    focus_index: usize,
    banner: Banner,
}

impl ClientHeader {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            name_input: String::new(),
            last_query: String::new(),
            selected: None,
            backdrop: Backdrop::new(),
            search_request: RequestSlot::new(),
            focus_index: NAME_INPUT,
            banner: Banner::default(),
        }
    }

    pub fn selected(&self) -> Option<&Client> {
        self.selected.as_ref()
    }

    pub fn backdrop(&self) -> &Backdrop<Client> {
        &self.backdrop
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn pending_request(&self) -> Option<Ticket> {
        self.search_request.pending()
    }

    pub fn owns(&self, ticket: Ticket) -> bool {
        self.search_request.owns(ticket)
    }

    /// Sends the typed name to the client search endpoint.
    pub fn search(&mut self) {
        let query = self.name_input.trim().to_string();
        match self.dispatcher.search_clients(&query) {
            Ok(ticket) => {
                self.search_request.issue(ticket);
                self.last_query = query;
                self.banner.clear();
            }
            Err(e) => {
                warn!(error = %e, "client search not sent");
                self.banner.error(format!("Client search failed: {e}"));
            }
        }
    }

    pub fn handle_response(&mut self, response: Response) {
        if !self.search_request.accept(response.ticket) {
            debug!(ticket = response.ticket, "ignoring stale client search");
            return;
        }
        match response.result {
            Ok(Payload::Clients(found)) => {
                info!(count = found.clients.len(), message = %found.message, "client search returned");
                self.backdrop.open(found.clients);
            }
            Ok(other) => warn!(?other, "unexpected payload for client search"),
            Err(e) => self.banner.error(format!("Client search failed: {e}")),
        }
    }

    pub fn tick(&mut self) {
        self.banner.check_timeout();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<HeaderAction> {
        if self.backdrop.is_open() {
            return self.handle_backdrop_key(key);
        }

        match key.code {
            KeyCode::Char(c) if self.focus_index == NAME_INPUT => {
                self.name_input.push(c);
                self.banner.clear();
            }
            KeyCode::Backspace if self.focus_index == NAME_INPUT => {
                self.name_input.pop();
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.focus_index = 1 - self.focus_index;
            }
            KeyCode::Enter => self.search(),
            _ => {}
        }
        None
    }

    fn handle_backdrop_key(&mut self, key: KeyEvent) -> Option<HeaderAction> {
        match key.code {
            KeyCode::Down => self.backdrop.select_next(),
            KeyCode::Up => self.backdrop.select_previous(),
            KeyCode::Enter => {
                let client = self.backdrop.pick()?;
                info!(client_id = %client.id, "client selected");
                self.name_input = client.name.clone();
                self.selected = Some(client.clone());
                return Some(HeaderAction::ClientSelected(client));
            }
            KeyCode::Esc => self.backdrop.dismiss(),
            _ => {}
        }
        None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, active: bool) {
        let block = widgets::panel_block(" 👤 Client ".to_string(), active);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Details
                Constraint::Length(3), // Inputs
                Constraint::Length(1), // Status
            ])
            .split(inner);

        let labels = [
            "Full name",
            "Phone No",
            "Email",
            "Business ID",
            "Street Address",
            "ZIP Code",
            "City",
            "County",
            "Country",
        ];
        let values: Vec<String> = match &self.selected {
            Some(c) => vec![
                c.name.clone(),
                c.phone.clone(),
                c.email.clone(),
                c.business_id.clone(),
                c.street_address.clone(),
                c.zip_code.clone(),
                c.city.clone(),
                c.county.clone(),
                c.country.clone(),
            ],
            None => vec![String::new(); labels.len()],
        };
        let details = Table::new(
            vec![Row::new(values)],
            [Constraint::Ratio(1, labels.len() as u32); 9],
        )
        .header(Row::new(labels.to_vec()).style(Style::default().fg(widgets::MUTED)))
        .style(Style::default().fg(widgets::TEXT));
        frame.render_widget(details, layout[0]);

        let inputs = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
                Constraint::Percentage(20),
            ])
            .split(layout[1]);

        let client_id = self.selected.as_ref().map(|c| c.id.as_str()).unwrap_or("");
        frame.render_widget(widgets::input_field("Client Id", client_id, false), inputs[0]);

        let patients = match &self.selected {
            Some(c) if !c.patients.is_empty() => c.patients.join(", "),
            Some(_) => "none".to_string(),
            None => String::new(),
        };
        frame.render_widget(widgets::input_field("Patients", &patients, false), inputs[1]);

        frame.render_widget(
            widgets::input_field(
                "Enter Client Name",
                &self.name_input,
                active && self.focus_index == NAME_INPUT,
            ),
            inputs[2],
        );

        let select_label = if self.search_request.pending().is_some() {
            "Searching…"
        } else {
            "Select Client"
        };
        let select = widgets::button(
            select_label,
            active && self.focus_index == SELECT_BUTTON,
            widgets::SUCCESS,
        )
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
        frame.render_widget(select, inputs[3]);

        self.banner.render(frame, layout[2]);
    }

    /// Draws the selection overlay on top of the whole screen when open.
    pub fn render_backdrop(&self, frame: &mut Frame) {
        if !self.backdrop.is_open() {
            return;
        }
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);

        let results = self.backdrop.results();
        let block = widgets::panel_block(format!(" Select Client ({}) ", results.len()), true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        if results.is_empty() {
            frame.render_widget(
                Paragraph::new(format!("No clients match '{}'", self.last_query))
                    .style(Style::default().fg(widgets::MUTED))
                    .alignment(Alignment::Center),
                layout[0],
            );
        } else {
            let rows = results.iter().map(|client| {
                Row::new(vec![
                    Cell::from(client.name.clone()),
                    Cell::from(client.email.clone()),
                    Cell::from(client.phone.clone()),
                ])
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(40),
                    Constraint::Percentage(35),
                    Constraint::Percentage(25),
                ],
            )
            .header(
                Row::new(vec!["Name", "Email", "Phone"])
                    .style(Style::default().fg(widgets::ACCENT).add_modifier(Modifier::BOLD)),
            )
            .style(Style::default().fg(widgets::TEXT))
            .row_highlight_style(
                Style::default()
                    .bg(Color::Rgb(45, 45, 60))
                    .fg(widgets::FOCUS)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");
            let mut state = TableState::default();
            state.select(self.backdrop.cursor());
            frame.render_stateful_widget(table, layout[0], &mut state);
        }

        frame.render_widget(
            widgets::help_line("↑↓: Navigate | Enter: Select | Esc: Close"),
            layout[1],
        );
    }
}
