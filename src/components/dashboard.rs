//! The section currently open after the home menu.

use crate::app::SelectedApp;
use crate::components::appointment::Appointment;
use crate::components::codex::Codex;
use crate::components::settings::Settings;
use crate::components::Component;
use crate::config::Config;
use crate::dispatch::{Dispatcher, Response};
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::KeyEvent;

pub enum Dashboard {
    Appointment(Appointment),
    Codex(Codex),
    Settings(Settings),
}

impl Dashboard {
    /// Builds the screen for a menu choice; other choices open nothing.
    pub fn open(selected: SelectedApp, dispatcher: &Dispatcher, config: &Config) -> Option<Self> {
        match selected {
            SelectedApp::Appointment => {
                Some(Self::Appointment(Appointment::new(dispatcher.clone())))
            }
            SelectedApp::Codex => Some(Self::Codex(Codex::new(dispatcher.clone()))),
            SelectedApp::Settings => Some(Self::Settings(Settings::new(
                config,
                dispatcher.identity(),
            ))),
            _ => None,
        }
    }

    fn component(&self) -> &dyn Component {
        match self {
            Self::Appointment(screen) => screen,
            Self::Codex(screen) => screen,
            Self::Settings(screen) => screen,
        }
    }

    fn component_mut(&mut self) -> &mut dyn Component {
        match self {
            Self::Appointment(screen) => screen,
            Self::Codex(screen) => screen,
            Self::Settings(screen) => screen,
        }
    }
}

impl Component for Dashboard {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<SelectedApp>> {
        self.component_mut().handle_input(key)
    }

    fn render(&self, frame: &mut Frame) {
        self.component().render(frame);
    }

    fn handle_response(&mut self, response: Response) {
        self.component_mut().handle_response(response);
    }

    fn tick(&mut self) {
        self.component_mut().tick();
    }
}
