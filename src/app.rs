//! The main application state and logic for the clinic CRM.
//!
//! This module owns the screen state machine: the session screen, the home
//! menu and whichever section is open. It also drains backend responses and
//! routes them to the open section.

use crate::components::dashboard::Dashboard;
use crate::components::{home::Home, session::Session, Component};
use crate::config::Config;
use crate::dispatch::{Dispatcher, Response};
use crate::tui::{self, Frame, Tui};
use anyhow::Result;
use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::mpsc::Receiver;
use tracing::{debug, info};

/// Screens and actions a component can ask the app to switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectedApp {
    /// The appointment screen.
    Appointment,
    /// The catalog browser.
    Codex,
    /// The configuration view.
    Settings,
    /// The home menu (sent by the session screen once an identity is set).
    Home,
    /// Go back one level; from the home menu this signs out.
    None,
    /// Quit the application.
    Quit,
}

/// Enum representing the possible states of the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the user to enter an identity.
    Session,
    /// The home menu.
    Home,
    /// A section opened from the home menu.
    Running(SelectedApp),
}

/// Main application struct.
pub struct App {
    state: AppState,
    should_quit: bool,
    config: Config,
    dispatcher: Dispatcher,
    responses: Receiver<Response>,
    session: Session,
    home: Home,
    /// The open section (only exists while running).
    dashboard: Option<Dashboard>,
}

impl App {
    /// Creates the app on the session screen.
    pub fn new(config: Config, dispatcher: Dispatcher, responses: Receiver<Response>) -> Self {
        let session = Session::new(config.user_sub.as_deref());
        Self {
            state: AppState::Session,
            should_quit: false,
            config,
            dispatcher,
            responses,
            session,
            home: Home::new(),
            dashboard: None,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Runs the application's main loop.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or reading terminal events fails.
    pub fn run(&mut self, tui: &mut Tui) -> Result<()> {
        while !self.should_quit {
            tui.draw(|frame| self.render(frame))?;
            let event = tui.next_event()?;
            self.handle_event(event)?;
            self.drain_responses();
        }
        info!("leaving main loop");
        Ok(())
    }

    pub fn handle_event(&mut self, event: tui::Event) -> Result<()> {
        match event {
            tui::Event::Input(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key)
            }
            tui::Event::Input(_) => Ok(()),
            tui::Event::Tick => {
                self.tick();
                Ok(())
            }
        }
    }

    /// Routes one key press to the current screen and applies the transition
    /// it asks for.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Global keybinding: Ctrl+Q to quit
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        match self.state {
            AppState::Session => match self.session.handle_input(key)? {
                Some(SelectedApp::Quit) => self.should_quit = true,
                Some(SelectedApp::Home) => {
                    let identity = self.session.identity();
                    self.dispatcher.set_identity(identity.clone());
                    self.home.set_identity(identity);
                    self.state = AppState::Home;
                }
                _ => {}
            },
            AppState::Home => match self.home.handle_input(key)? {
                Some(SelectedApp::Quit) => self.should_quit = true,
                Some(SelectedApp::None) => self.sign_out(),
                Some(selected) => self.open(selected),
                None => {}
            },
            AppState::Running(_) => {
                let Some(dashboard) = self.dashboard.as_mut() else {
                    self.state = AppState::Home;
                    return Ok(());
                };
                match dashboard.handle_input(key)? {
                    Some(SelectedApp::Quit) => self.should_quit = true,
                    Some(SelectedApp::None) => {
                        // Back to Home, dropping the section and its pending requests.
                        self.dashboard = None;
                        self.state = AppState::Home;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Hands every response that has arrived to the open section.
    pub fn drain_responses(&mut self) {
        while let Ok(response) = self.responses.try_recv() {
            match self.dashboard.as_mut() {
                Some(dashboard) => dashboard.handle_response(response),
                None => debug!(ticket = response.ticket, "no open section for response"),
            }
        }
    }

    fn tick(&mut self) {
        match self.state {
            AppState::Session => self.session.tick(),
            AppState::Home => self.home.tick(),
            AppState::Running(_) => {
                if let Some(dashboard) = self.dashboard.as_mut() {
                    dashboard.tick();
                }
            }
        }
    }

    fn open(&mut self, selected: SelectedApp) {
        match Dashboard::open(selected, &self.dispatcher, &self.config) {
            Some(dashboard) => {
                info!(?selected, "opening section");
                self.dashboard = Some(dashboard);
                self.state = AppState::Running(selected);
            }
            None => debug!(?selected, "nothing to open"),
        }
    }

    fn sign_out(&mut self) {
        info!("session ended");
        self.dispatcher.set_identity(None);
        self.home.set_identity(None);
        self.dashboard = None;
        self.state = AppState::Session;
    }

    pub fn render(&self, frame: &mut Frame) {
        match self.state {
            AppState::Session => self.session.render(frame),
            AppState::Home => self.home.render(frame),
            AppState::Running(_) => match &self.dashboard {
                Some(dashboard) => dashboard.render(frame),
                None => self.home.render(frame),
            },
        }
    }
}
