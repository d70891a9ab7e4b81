use std::io::{ self, Write };

use log::warn;

use super::Surface;
use crate::models::chat::{ ChatMessage, Sender };

const PENDING_TEXT: &str = "Escribiendo...";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Line-oriented surface: one message per block, pending indicator on its
/// own line that is erased in place.
pub struct TerminalSurface<W: Write + Send> {
    out: W,
    prompt: &'static str,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, prompt: "> " }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, args: std::fmt::Arguments<'_>) {
        let result = self.out.write_fmt(args).and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

pub fn format_message(message: &ChatMessage) -> String {
    format!("{}: {}\n   {}\n", message.sender().label(), message.text(), message.timestamp())
}

impl<W: Write + Send> Surface for TerminalSurface<W> {
    fn render_message(&mut self, message: &ChatMessage) {
        let line = format_message(message);
        self.write(format_args!("{}", line));
    }

    fn show_pending(&mut self) {
        self.write(format_args!("{}: {}", Sender::Assistant.label(), PENDING_TEXT));
    }

    fn clear_pending(&mut self) {
        self.write(format_args!("{}", CLEAR_LINE));
    }

    fn alert(&mut self, notice: &str) {
        self.write(format_args!("\x07⚠ {}\n", notice));
    }

    fn prompt(&mut self) {
        let prompt = self.prompt;
        self.write(format_args!("{}", prompt));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ConversationView;

    #[test]
    fn renders_label_text_and_time() {
        let msg = ChatMessage::user("hola");
        let rendered = format_message(&msg);
        assert!(rendered.starts_with("👤 Tú: hola\n"));
        assert!(rendered.contains(msg.timestamp()));
    }

    #[test]
    fn pending_line_is_erased() {
        let mut view = ConversationView::new(TerminalSurface::new(Vec::new()));
        view.show_pending_indicator();
        view.clear_pending_indicator();
        view.append_assistant_message("listo");

        let out = String::from_utf8(view.surface().out.clone()).unwrap();
        assert!(out.starts_with("🤖 IA: Escribiendo...\r\x1b[2K🤖 IA: listo\n"));
    }

    #[test]
    fn alert_is_written() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.alert("cuidado");
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert!(out.contains("cuidado"));
    }
}
