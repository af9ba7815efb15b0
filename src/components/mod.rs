use crate::app::SelectedApp;
use crate::dispatch::Response;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::KeyEvent;

pub mod appointment;
pub mod codex;
pub mod dashboard;
pub mod home;
pub mod session;
pub mod settings;
pub mod widgets;

pub trait Component {
    fn handle_input(&mut self, event: KeyEvent) -> Result<Option<SelectedApp>>;
    fn render(&self, frame: &mut Frame);

    /// Backend response routed here by the app loop.
    fn handle_response(&mut self, _response: Response) {}

    /// Called on every idle frame.
    fn tick(&mut self) {}
}
