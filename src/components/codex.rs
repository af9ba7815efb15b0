//! Read-only browser over the medicine and procedure catalogs.

use crate::app::SelectedApp;
use crate::catalog::CatalogView;
use crate::components::widgets::{self, Banner};
use crate::components::Component;
use crate::dispatch::{Dispatcher, Payload, RequestSlot, Response, Ticket};
use crate::models::{CatalogEntity, LineKind};
use crate::tui::Frame;
use crate::utils::{centered_rect, format_money};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use tracing::{debug, info, warn};

struct CatalogTab {
    kind: LineKind,
    view: CatalogView<CatalogEntity>,
    request: RequestSlot,
    selected: Option<usize>,
}

impl CatalogTab {
    fn new(kind: LineKind) -> Self {
        Self {
            kind,
            view: CatalogView::new(),
            request: RequestSlot::new(),
            selected: None,
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.view.match_count();
        self.selected = match (count, self.selected) {
            (0, _) => None,
            (_, None) => Some(0),
            (n, Some(i)) => Some(i.min(n - 1)),
        };
    }

    fn select_next(&mut self) {
        let count = self.view.match_count();
        if count == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| (i + 1) % count));
    }

    fn select_previous(&mut self) {
        let count = self.view.match_count();
        if count == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| (i + count - 1) % count));
    }
}

pub struct Codex {
    dispatcher: Dispatcher,
    tabs: [CatalogTab; 2],
    active: usize,
    searching: bool,
    show_details: bool,
    banner: Banner,
}

impl Codex {
    /// Opens the browser and starts loading both catalogs.
    pub fn new(dispatcher: Dispatcher) -> Self {
        let mut codex = Self {
            dispatcher,
            tabs: LineKind::ALL.map(CatalogTab::new),
            active: 0,
            searching: false,
            show_details: false,
            banner: Banner::default(),
        };
        codex.refresh(0);
        codex.refresh(1);
        codex
    }

    pub fn active_kind(&self) -> LineKind {
        self.tabs[self.active].kind
    }

    pub fn view(&self, kind: LineKind) -> &CatalogView<CatalogEntity> {
        &self.tabs[tab_index(kind)].view
    }

    pub fn selected_entity(&self) -> Option<&CatalogEntity> {
        let tab = &self.tabs[self.active];
        tab.selected.and_then(|i| tab.view.get(i))
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_showing_details(&self) -> bool {
        self.show_details
    }

    pub fn owns(&self, ticket: Ticket) -> bool {
        self.tabs.iter().any(|tab| tab.request.owns(ticket))
    }

    fn refresh(&mut self, index: usize) {
        let kind = self.tabs[index].kind;
        match self.dispatcher.fetch_catalog(kind) {
            Ok(ticket) => self.tabs[index].request.issue(ticket),
            Err(e) => {
                warn!(?kind, error = %e, "catalog not requested");
                self.banner.error(format!("Failed to load {}: {e}", kind.heading()));
            }
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        let tab = &mut self.tabs[self.active];
        match key.code {
            KeyCode::Char(c) => tab.view.push_char(c),
            KeyCode::Backspace => tab.view.pop_char(),
            KeyCode::Enter | KeyCode::Esc => self.searching = false,
            _ => {}
        }
        tab.clamp_selection();
    }
}

fn tab_index(kind: LineKind) -> usize {
    match kind {
        LineKind::Medicine => 0,
        LineKind::Procedure => 1,
    }
}

impl Component for Codex {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<SelectedApp>> {
        if self.searching {
            self.handle_search_input(key);
            return Ok(None);
        }

        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.active = 1 - self.active;
                self.show_details = false;
            }
            KeyCode::Down => self.tabs[self.active].select_next(),
            KeyCode::Up => self.tabs[self.active].select_previous(),
            KeyCode::Char('/') => {
                self.searching = true;
                self.show_details = false;
            }
            KeyCode::Char('r') => self.refresh(self.active),
            KeyCode::Enter => {
                self.show_details = !self.show_details && self.selected_entity().is_some();
            }
            KeyCode::Esc if self.show_details => self.show_details = false,
            KeyCode::Esc => return Ok(Some(SelectedApp::None)),
            _ => {}
        }
        Ok(None)
    }

    fn handle_response(&mut self, response: Response) {
        let Some(index) = self
            .tabs
            .iter()
            .position(|tab| tab.request.owns(response.ticket))
        else {
            debug!(ticket = response.ticket, "ignoring stale catalog response");
            return;
        };
        let tab = &mut self.tabs[index];
        tab.request.accept(response.ticket);
        match response.result {
            Ok(Payload::Catalog { kind, entities }) if kind == tab.kind => {
                info!(?kind, count = entities.len(), "codex catalog loaded");
                tab.view.replace(entities);
            }
            Ok(other) => warn!(?other, "unexpected payload for codex"),
            Err(e) => {
                // Keep whatever was loaded before.
                self.banner
                    .error(format!("Failed to load {}: {e}", tab.kind.heading()));
            }
        }
        self.tabs[index].clamp_selection();
    }

    fn tick(&mut self) {
        self.banner.check_timeout();
    }

    fn render(&self, frame: &mut Frame) {
        widgets::clear_background(frame);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(1), // Tabs
                Constraint::Length(3), // Search
                Constraint::Min(6),    // Table
                Constraint::Length(1), // Status
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        widgets::render_header(frame, layout[0], "📚 Codex");

        let titles: Vec<Line> = self
            .tabs
            .iter()
            .map(|tab| Line::from(format!(" {} ", tab.kind.heading())))
            .collect();
        frame.render_widget(
            Tabs::new(titles)
                .select(self.active)
                .style(Style::default().fg(widgets::MUTED))
                .highlight_style(
                    Style::default()
                        .fg(widgets::FOCUS)
                        .add_modifier(Modifier::BOLD),
                ),
            layout[1],
        );

        let tab = &self.tabs[self.active];
        frame.render_widget(
            widgets::input_field("Search (/)", tab.view.query(), self.searching),
            layout[2],
        );

        let rows = tab.view.matches().map(|entity| {
            Row::new(vec![
                Cell::from(entity.name.clone()),
                Cell::from(format_money(entity.price)),
            ])
        });
        let table = Table::new(rows, [Constraint::Percentage(75), Constraint::Percentage(25)])
            .header(
                Row::new(vec!["Name", "Price"]).style(
                    Style::default()
                        .fg(widgets::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
            )
            .block(widgets::panel_block(
                format!(" {} ({}) ", tab.kind.heading(), tab.view.match_count()),
                !self.searching,
            ))
            .style(Style::default().fg(widgets::TEXT))
            .row_highlight_style(
                Style::default()
                    .bg(Color::Rgb(45, 45, 60))
                    .fg(widgets::FOCUS)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");
        let mut state = TableState::default();
        state.select(tab.selected);
        frame.render_stateful_widget(table, layout[3], &mut state);

        self.banner.render(frame, layout[4]);
        frame.render_widget(
            widgets::help_line(
                "←→: Switch | ↑↓: Navigate | /: Search | Enter: Details | r: Refresh | Esc: Back",
            ),
            layout[5],
        );

        if self.show_details {
            if let Some(entity) = self.selected_entity() {
                let area = centered_rect(60, 40, frame.area());
                let description = if entity.description.is_empty() {
                    "No description."
                } else {
                    entity.description.as_str()
                };
                let text = vec![
                    Line::from(Span::styled(
                        entity.name.clone(),
                        Style::default()
                            .fg(widgets::TITLE)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!("Price: {}", format_money(entity.price))),
                    Line::from(""),
                    Line::from(description.to_string()),
                ];
                frame.render_widget(Clear, area);
                frame.render_widget(
                    Paragraph::new(text)
                        .style(Style::default().fg(widgets::TEXT))
                        .wrap(Wrap { trim: true })
                        .block(widgets::panel_block(" Details ".to_string(), true)),
                    area,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CrmApi;
    use crate::error::ApiError;
    use crate::models::Identity;
    use crossterm::event::KeyModifiers;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn entity(name: &str, price: rust_decimal::Decimal) -> CatalogEntity {
        CatalogEntity {
            name: name.to_string(),
            price,
            description: format!("{name} description"),
            owner_ref: "user-1".to_string(),
        }
    }

    fn loaded_codex(runtime: &tokio::runtime::Runtime) -> Codex {
        let api = CrmApi::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let (dispatcher, _responses) =
            Dispatcher::new(runtime.handle().clone(), api, Identity::new("user-1"));
        let mut codex = Codex::new(dispatcher);
        // A fresh dispatcher numbers tickets from 1, in tab order.
        codex.handle_response(Response {
            ticket: 1,
            result: Ok(Payload::Catalog {
                kind: LineKind::Medicine,
                entities: vec![entity("Aspirin", dec!(2.5)), entity("Ibuprofen", dec!(4))],
            }),
        });
        codex.handle_response(Response {
            ticket: 2,
            result: Ok(Payload::Catalog {
                kind: LineKind::Procedure,
                entities: vec![entity("X-ray", dec!(40))],
            }),
        });
        codex
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_tabs_hold_their_own_catalog() {
        let rt = runtime();
        let mut codex = loaded_codex(&rt);
        assert_eq!(codex.view(LineKind::Medicine).items().len(), 2);
        assert_eq!(codex.view(LineKind::Procedure).items().len(), 1);
        assert!(!codex.owns(1));
        assert!(!codex.owns(2));

        assert_eq!(codex.active_kind(), LineKind::Medicine);
        codex.handle_input(key(KeyCode::Right)).unwrap();
        assert_eq!(codex.active_kind(), LineKind::Procedure);
        assert_eq!(codex.selected_entity().map(|e| e.name.as_str()), Some("X-ray"));
    }

    #[test]
    fn test_search_narrows_and_details_toggle() {
        let rt = runtime();
        let mut codex = loaded_codex(&rt);

        codex.handle_input(key(KeyCode::Char('/'))).unwrap();
        assert!(codex.is_searching());
        for c in "ibu".chars() {
            codex.handle_input(key(KeyCode::Char(c))).unwrap();
        }
        codex.handle_input(key(KeyCode::Enter)).unwrap();
        assert!(!codex.is_searching());
        assert_eq!(codex.view(LineKind::Medicine).match_count(), 1);
        assert_eq!(
            codex.selected_entity().map(|e| e.name.as_str()),
            Some("Ibuprofen")
        );

        codex.handle_input(key(KeyCode::Enter)).unwrap();
        assert!(codex.is_showing_details());
        assert_eq!(codex.handle_input(key(KeyCode::Esc)).unwrap(), None);
        assert!(!codex.is_showing_details());
        assert_eq!(
            codex.handle_input(key(KeyCode::Esc)).unwrap(),
            Some(SelectedApp::None)
        );
    }

    #[test]
    fn test_failed_refresh_keeps_loaded_catalog() {
        let rt = runtime();
        let mut codex = loaded_codex(&rt);
        assert_eq!(codex.view(LineKind::Medicine).items().len(), 2);

        codex.handle_input(key(KeyCode::Char('r'))).unwrap();
        assert!(codex.owns(3));
        codex.handle_response(Response {
            ticket: 3,
            result: Err(ApiError::Status(503)),
        });

        assert!(!codex.owns(3));
        assert_eq!(codex.view(LineKind::Medicine).items().len(), 2);
        assert_eq!(
            codex.selected_entity().map(|e| e.name.as_str()),
            Some("Aspirin")
        );
    }
}
