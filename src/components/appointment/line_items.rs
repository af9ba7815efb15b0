//! Line-item panel: catalog search on top, the appointment ledger below.
//!
//! The same panel serves medicine and procedures; the [`LineKind`] picks the
//! catalog endpoint and the labels.

use crate::catalog::CatalogView;
use crate::components::widgets::{self, Banner};
use crate::dispatch::{Dispatcher, Payload, RequestSlot, Response, Ticket};
use crate::ledger::Ledger;
use crate::models::{CatalogEntity, LineKind};
use crate::tui::Frame;
use crate::utils::format_money;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

pub const SEARCH: usize = 0;
pub const CATALOG: usize = 1;
pub const NAME: usize = 2;
pub const QUANTITY: usize = 3;
pub const PRICE: usize = 4;
pub const ADD_BUTTON: usize = 5;
pub const REMOVE_LAST_BUTTON: usize = 6;
pub const CLEAR_BUTTON: usize = 7;
const FOCUSABLE: usize = 8;

/// What the owning container needs to hear about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    TotalChanged(Decimal),
}

pub struct LineItemsPanel {
    kind: LineKind,
    dispatcher: Dispatcher,
    catalog: CatalogView<CatalogEntity>,
    catalog_state: TableState,
    catalog_request: RequestSlot,
    ledger: Ledger,
    name_input: String,
    quantity_input: String,
    price_input: String,
    focus_index: usize,
    banner: Banner,
}

impl LineItemsPanel {
    /// Creates the panel and starts loading its catalog.
    pub fn new(kind: LineKind, dispatcher: Dispatcher) -> Self {
        let mut panel = Self {
            kind,
            dispatcher,
            catalog: CatalogView::new(),
            catalog_state: TableState::default(),
            catalog_request: RequestSlot::new(),
            ledger: Ledger::new(),
            name_input: String::new(),
            quantity_input: String::new(),
            price_input: String::new(),
            focus_index: SEARCH,
            banner: Banner::default(),
        };
        panel.load_catalog();
        panel
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn catalog(&self) -> &CatalogView<CatalogEntity> {
        &self.catalog
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn focus_index(&self) -> usize {
        self.focus_index
    }

    pub fn set_focus(&mut self, index: usize) {
        self.focus_index = index % FOCUSABLE;
    }

    /// Current contents of the name, amount and price inputs.
    pub fn inputs(&self) -> (&str, &str, &str) {
        (&self.name_input, &self.quantity_input, &self.price_input)
    }

    pub fn pending_request(&self) -> Option<Ticket> {
        self.catalog_request.pending()
    }

    pub fn owns(&self, ticket: Ticket) -> bool {
        self.catalog_request.owns(ticket)
    }

    /// (Re)fetches the whole catalog for the signed-in user.
    pub fn load_catalog(&mut self) {
        match self.dispatcher.fetch_catalog(self.kind) {
            Ok(ticket) => self.catalog_request.issue(ticket),
            Err(e) => {
                warn!(kind = ?self.kind, error = %e, "catalog not requested");
                self.banner.error(format!(
                    "Failed to load {}: {e}",
                    self.kind.heading().to_lowercase()
                ));
            }
        }
    }

    pub fn handle_response(&mut self, response: Response) {
        if !self.catalog_request.accept(response.ticket) {
            debug!(ticket = response.ticket, "ignoring stale catalog response");
            return;
        }
        match response.result {
            Ok(Payload::Catalog { kind, entities }) if kind == self.kind => {
                info!(?kind, count = entities.len(), "catalog loaded");
                self.catalog.replace(entities);
                self.reset_catalog_selection();
            }
            Ok(other) => warn!(?other, "unexpected payload for catalog panel"),
            Err(e) => {
                // Keep whatever was loaded before.
                self.banner.error(format!(
                    "Failed to load {}: {e}",
                    self.kind.heading().to_lowercase()
                ));
            }
        }
    }

    pub fn tick(&mut self) {
        self.banner.check_timeout();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PanelAction> {
        match key.code {
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_previous(),
            KeyCode::Down if self.focus_index == CATALOG => self.select_next(),
            KeyCode::Up if self.focus_index == CATALOG => self.select_previous(),
            KeyCode::Down => self.focus_next(),
            KeyCode::Up => self.focus_previous(),
            KeyCode::Char('r') | KeyCode::Char('R') if self.focus_index == CATALOG => {
                self.load_catalog();
            }
            KeyCode::Char(c) => self.type_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Enter => return self.activate(),
            _ => {}
        }
        None
    }

    fn activate(&mut self) -> Option<PanelAction> {
        match self.focus_index {
            SEARCH => self.focus_index = CATALOG,
            CATALOG => self.prefill_from_catalog(),
            NAME | QUANTITY => self.focus_next(),
            PRICE | ADD_BUTTON => return self.add_entry(),
            REMOVE_LAST_BUTTON => {
                if let Some(entry) = self.ledger.remove_last() {
                    self.banner.success(format!("Removed {}", entry.name));
                }
                return Some(PanelAction::TotalChanged(self.ledger.total()));
            }
            CLEAR_BUTTON => {
                let total = self.ledger.clear_all();
                self.banner.clear();
                return Some(PanelAction::TotalChanged(total));
            }
            _ => {}
        }
        None
    }

    fn add_entry(&mut self) -> Option<PanelAction> {
        match self
            .ledger
            .add_entry(&self.name_input, &self.price_input, &self.quantity_input)
        {
            Ok(total) => {
                self.banner
                    .success(format!("Added {}", self.name_input.trim()));
                self.name_input.clear();
                self.quantity_input.clear();
                self.price_input.clear();
                self.focus_index = NAME;
                Some(PanelAction::TotalChanged(total))
            }
            Err(e) => {
                self.banner.error(e.to_string());
                None
            }
        }
    }

    /// Copies the highlighted catalog row into the entry form.
    fn prefill_from_catalog(&mut self) {
        let Some(entity) = self
            .catalog_state
            .selected()
            .and_then(|i| self.catalog.get(i))
        else {
            return;
        };
        self.name_input = entity.name.clone();
        self.price_input = entity.price.to_string();
        if self.quantity_input.is_empty() {
            self.quantity_input = "1".to_string();
        }
        self.focus_index = QUANTITY;
    }

    fn type_char(&mut self, c: char) {
        match self.focus_index {
            SEARCH => {
                self.catalog.push_char(c);
                self.reset_catalog_selection();
            }
            NAME => self.name_input.push(c),
            QUANTITY => self.quantity_input.push(c),
            PRICE => self.price_input.push(c),
            _ => return,
        }
        self.banner.clear();
    }

    fn backspace(&mut self) {
        match self.focus_index {
            SEARCH => {
                self.catalog.pop_char();
                self.reset_catalog_selection();
            }
            NAME => {
                self.name_input.pop();
            }
            QUANTITY => {
                self.quantity_input.pop();
            }
            PRICE => {
                self.price_input.pop();
            }
            _ => {}
        }
    }

    fn focus_next(&mut self) {
        self.focus_index = (self.focus_index + 1) % FOCUSABLE;
    }

    fn focus_previous(&mut self) {
        self.focus_index = (self.focus_index + FOCUSABLE - 1) % FOCUSABLE;
    }

    fn reset_catalog_selection(&mut self) {
        if self.catalog.match_count() == 0 {
            self.catalog_state.select(None);
        } else {
            self.catalog_state.select(Some(0));
        }
    }

    fn select_next(&mut self) {
        let count = self.catalog.match_count();
        if count == 0 {
            return;
        }
        let i = match self.catalog_state.selected() {
            Some(i) if i + 1 < count => i + 1,
            _ => 0,
        };
        self.catalog_state.select(Some(i));
    }

    fn select_previous(&mut self) {
        let count = self.catalog.match_count();
        if count == 0 {
            return;
        }
        let i = match self.catalog_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.catalog_state.select(Some(i));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, active: bool) {
        let focused = |index: usize| active && self.focus_index == index;

        let block = widgets::panel_block(format!(" {} ", self.kind.heading()), active);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search
                Constraint::Min(4),    // Catalog
                Constraint::Min(4),    // Ledger
                Constraint::Length(1), // Total
                Constraint::Length(3), // Inputs
                Constraint::Length(1), // Buttons
                Constraint::Length(1), // Status
            ])
            .split(inner);

        frame.render_widget(
            widgets::input_field("Search", self.catalog.query(), focused(SEARCH)),
            layout[0],
        );

        self.render_catalog(frame, layout[1], focused(CATALOG));
        self.render_ledger(frame, layout[2]);

        frame.render_widget(
            Paragraph::new(format!("Total Price: {}", format_money(self.ledger.total())))
                .style(
                    Style::default()
                        .fg(widgets::TITLE)
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Right),
            layout[3],
        );

        let inputs = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(layout[4]);
        frame.render_widget(
            widgets::input_field(self.kind.label(), &self.name_input, focused(NAME)),
            inputs[0],
        );
        frame.render_widget(
            widgets::input_field("Amount", &self.quantity_input, focused(QUANTITY)),
            inputs[1],
        );
        frame.render_widget(
            widgets::input_field("Price", &self.price_input, focused(PRICE)),
            inputs[2],
        );

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(layout[5]);
        frame.render_widget(
            widgets::button("Add", focused(ADD_BUTTON), widgets::SUCCESS),
            buttons[0],
        );
        frame.render_widget(
            widgets::button("Remove Last", focused(REMOVE_LAST_BUTTON), widgets::ACCENT),
            buttons[1],
        );
        frame.render_widget(
            widgets::button("Clear", focused(CLEAR_BUTTON), widgets::DANGER),
            buttons[2],
        );

        self.banner.render(frame, layout[6]);
    }

    fn render_catalog(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let title = if self.catalog_request.pending().is_some() {
            " Loading… ".to_string()
        } else if self.catalog.query().is_empty() {
            format!(" Catalog ({}) ", self.catalog.items().len())
        } else {
            format!(
                " Catalog ({} of {} matches) ",
                self.catalog.match_count(),
                self.catalog.items().len()
            )
        };

        let mut rows: Vec<Row> = self
            .catalog
            .matches()
            .map(|entity| {
                Row::new(vec![
                    Cell::from(entity.name.clone()),
                    Cell::from(format_money(entity.price)),
                ])
            })
            .collect();
        if rows.is_empty() {
            let message = if self.catalog.query().is_empty() {
                "Nothing in catalog"
            } else {
                "No matches"
            };
            rows.push(Row::new(vec![
                Cell::from(message).style(Style::default().fg(widgets::MUTED)),
                Cell::from(""),
            ]));
        }

        let table = Table::new(rows, [Constraint::Min(12), Constraint::Length(12)])
            .header(
                Row::new(vec![self.kind.label(), "Price"])
                    .style(Style::default().fg(widgets::ACCENT).add_modifier(Modifier::BOLD)),
            )
            .style(Style::default().fg(widgets::TEXT))
            .block(widgets::panel_block(title, focused))
            .row_highlight_style(
                Style::default()
                    .bg(Color::Rgb(45, 45, 60))
                    .fg(widgets::FOCUS)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(if focused { "► " } else { "  " });

        frame.render_stateful_widget(table, area, &mut self.catalog_state.clone());
    }

    fn render_ledger(&self, frame: &mut Frame, area: Rect) {
        let rows = self.ledger.entries().iter().map(|entry| {
            Row::new(vec![
                Cell::from(entry.name.clone()),
                Cell::from(entry.quantity.to_string()),
                Cell::from(format_money(entry.price)),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(50),
                Constraint::Percentage(20),
                Constraint::Percentage(30),
            ],
        )
        .header(
            Row::new(vec![self.kind.label(), "Amount", "Price"])
                .style(Style::default().fg(widgets::ACCENT).add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().fg(widgets::TEXT))
        .block(widgets::panel_block(
            format!(" Used ({}) ", self.ledger.len()),
            false,
        ));
        frame.render_widget(table, area);
    }
}
