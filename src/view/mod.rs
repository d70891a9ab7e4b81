pub mod terminal;

use crate::models::chat::{ ChatMessage, Transcript };
use log::debug;
use thiserror::Error;

pub const EMPTY_INPUT_NOTICE: &str = "Por favor, escribe un mensaje antes de enviar.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", EMPTY_INPUT_NOTICE)]
    EmptyMessage,
}

/// Rendering handle injected into the view. The view never looks up
/// its output on its own.
pub trait Surface: Send {
    fn render_message(&mut self, message: &ChatMessage);

    fn show_pending(&mut self);

    fn clear_pending(&mut self);

    /// Blocking notice shown to the user.
    fn alert(&mut self, notice: &str);

    /// Reset the input field after a message is accepted.
    fn clear_input(&mut self) {}

    /// Ask for the next line of input.
    fn prompt(&mut self) {}
}

/// Owns the transcript and mirrors every change onto its surface.
pub struct ConversationView<S: Surface> {
    surface: S,
    transcript: Transcript,
    pending: bool,
}

impl<S: Surface> ConversationView<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            transcript: Transcript::new(),
            pending: false,
        }
    }

    /// Accept user input. Blank input raises the notice and changes nothing.
    pub fn submit(&mut self, raw_text: &str) -> Result<ChatMessage, ValidationError> {
        let text = raw_text.trim();
        if text.is_empty() {
            self.surface.alert(EMPTY_INPUT_NOTICE);
            return Err(ValidationError::EmptyMessage);
        }
        let message = self.append(ChatMessage::user(text));
        self.surface.clear_input();
        Ok(message)
    }

    pub fn append_assistant_message(&mut self, text: &str) -> ChatMessage {
        self.append(ChatMessage::assistant(text))
    }

    fn append(&mut self, message: ChatMessage) -> ChatMessage {
        debug!("Appending {:?} message #{}", message.sender(), self.transcript.len() + 1);
        let stored = self.transcript.push(message);
        self.surface.render_message(stored);
        stored.clone()
    }

    pub fn show_pending_indicator(&mut self) {
        if !self.pending {
            self.pending = true;
            self.surface.show_pending();
        }
    }

    /// Safe to call when nothing is pending.
    pub fn clear_pending_indicator(&mut self) {
        if self.pending {
            self.pending = false;
            self.surface.clear_pending();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::chat::Sender;
    use std::sync::{ Arc, Mutex };

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Event {
        Message(Sender, String),
        PendingShown,
        PendingCleared,
        Alert(String),
        InputCleared,
    }

    /// Records everything drawn; clones share the same log.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSurface {
        pub events: Arc<Mutex<Vec<Event>>>,
    }

    impl RecordingSurface {
        pub fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn record(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl Surface for RecordingSurface {
        fn render_message(&mut self, message: &ChatMessage) {
            self.record(Event::Message(message.sender(), message.text().to_string()));
        }

        fn show_pending(&mut self) {
            self.record(Event::PendingShown);
        }

        fn clear_pending(&mut self) {
            self.record(Event::PendingCleared);
        }

        fn alert(&mut self, notice: &str) {
            self.record(Event::Alert(notice.to_string()));
        }

        fn clear_input(&mut self) {
            self.record(Event::InputCleared);
        }
    }

    #[test]
    fn blank_submit_alerts_without_appending() {
        let surface = RecordingSurface::default();
        let mut view = ConversationView::new(surface.clone());

        for input in ["", "   ", "\t\n"] {
            assert_eq!(view.submit(input), Err(ValidationError::EmptyMessage));
        }

        assert!(view.transcript().is_empty());
        assert_eq!(surface.events(), vec![Event::Alert(EMPTY_INPUT_NOTICE.to_string()); 3]);
    }

    #[test]
    fn submit_trims_and_appends_user_message() {
        let surface = RecordingSurface::default();
        let mut view = ConversationView::new(surface.clone());

        let msg = view.submit("  hola  ").unwrap();
        assert_eq!(msg.text(), "hola");
        assert_eq!(msg.sender(), Sender::User);
        assert_eq!(view.transcript().len(), 1);
        assert_eq!(surface.events(), vec![
            Event::Message(Sender::User, "hola".to_string()),
            Event::InputCleared,
        ]);
    }

    #[test]
    fn pending_indicator_never_enters_transcript() {
        let surface = RecordingSurface::default();
        let mut view = ConversationView::new(surface.clone());

        view.show_pending_indicator();
        view.show_pending_indicator();
        assert!(view.is_pending());
        view.clear_pending_indicator();
        view.clear_pending_indicator();

        assert!(!view.is_pending());
        assert!(view.transcript().is_empty());
        assert_eq!(surface.events(), vec![Event::PendingShown, Event::PendingCleared]);
    }
}
