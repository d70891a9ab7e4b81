use log::{ debug, error, info };
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::chat::{ ChatMessage, Transcript };
use crate::resolver::{ Reply, Resolver };
use crate::view::{ ConversationView, Surface, ValidationError };

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The user message and the reply it produced.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub user: ChatMessage,
    pub assistant: ChatMessage,
    /// Set when the reply is a canned fallback.
    pub fallback_reason: Option<String>,
}

/// Drives one conversation: submit, wait for the resolver, append the reply.
///
/// Turns are serialized. The view stays locked for the whole turn, so a second
/// submit waits until the first reply is on screen.
pub struct ChatSession<S: Surface> {
    view: Mutex<ConversationView<S>>,
    resolver: Arc<dyn Resolver>,
}

impl<S: Surface> ChatSession<S> {
    pub fn new(view: ConversationView<S>, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            view: Mutex::new(view),
            resolver,
        }
    }

    pub async fn submit(&self, raw_text: &str) -> Result<Exchange, ChatError> {
        let mut view = self.view.lock().await;
        let user = view.submit(raw_text)?;

        debug!("Awaiting {} resolver", self.resolver.name());
        view.show_pending_indicator();
        let reply = self.resolver.resolve(user.text()).await;
        view.clear_pending_indicator();

        // Logged only once the indicator line is gone.
        if let Reply::Fallback { reason, .. } = &reply {
            error!("Failed to get a reply from {}", reason);
            info!("Using fallback reply");
        }

        let assistant = view.append_assistant_message(reply.text());
        info!("Turn complete ({} messages)", view.transcript().len());
        Ok(Exchange {
            user,
            assistant,
            fallback_reason: reply.fallback_reason().map(str::to_string),
        })
    }

    pub async fn transcript(&self) -> Transcript {
        self.view.lock().await.transcript().clone()
    }

    pub async fn with_view<R>(&self, f: impl FnOnce(&mut ConversationView<S>) -> R) -> R {
        let mut view = self.view.lock().await;
        f(&mut view)
    }
}
