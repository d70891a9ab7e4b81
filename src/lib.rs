pub mod cli;
pub mod config;
pub mod models;
pub mod resolver;
pub mod server;
pub mod session;
pub mod view;

use cli::{ Args, Mode };
use log::{ debug, info, warn };
use resolver::{ new_resolver, ThreadRandom };
use server::Server;
use session::{ ChatError, ChatSession };
use std::error::Error;
use std::io;
use std::sync::Arc;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, BufReader };
use view::terminal::TerminalSurface;
use view::{ ConversationView, Surface };

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Chat Configuration ---");
    info!("Mode: {}", args.mode);
    info!("Endpoint: {}", args.endpoint.as_deref().unwrap_or("(none)"));
    info!("Credential configured: {}", args.api_key.as_deref().is_some_and(|k| !k.is_empty()));
    info!("Session Header: {}", args.session_header);
    if args.mode == Mode::Local {
        info!("Reply Delay: {}ms", args.reply_delay_ms);
    }
    if args.mode == Mode::Proxy {
        info!("Relay Address: {}", args.proxy_addr);
    }
    info!("--------------------------");

    match args.mode {
        Mode::Proxy => Server::from_args(&args)?.run().await,
        Mode::Local | Mode::Remote => run_terminal(&args).await,
    }
}

async fn run_terminal(args: &Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let resolver = new_resolver(args, Arc::new(ThreadRandom))?;
    let session = ChatSession::new(ConversationView::new(TerminalSurface::stdout()), resolver);
    info!("🚀 Chat iniciado correctamente");

    chat_loop(BufReader::new(tokio::io::stdin()), &session).await?;

    info!("Input closed, {} messages exchanged", session.transcript().await.len());
    Ok(())
}

/// Feed input lines into the session until EOF.
///
/// A line that is not valid UTF-8 is skipped with a warning; only a failed
/// read ends the loop early.
pub async fn chat_loop<R, S>(mut input: R, session: &ChatSession<S>) -> io::Result<()>
    where R: AsyncBufRead + Unpin, S: Surface
{
    let mut buf = Vec::new();
    session.with_view(|v| v.surface_mut().prompt()).await;
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        match std::str::from_utf8(&buf) {
            Ok(line) => {
                debug!("👤 El usuario está escribiendo...");
                if let Err(ChatError::Validation(e)) = session.submit(line).await {
                    debug!("Rejected input: {}", e);
                }
            }
            Err(e) => warn!("Skipping input line that is not valid UTF-8: {}", e),
        }
        session.with_view(|v| v.surface_mut().prompt()).await;
    }
}
