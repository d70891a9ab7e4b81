pub mod keyword;
pub mod remote;

use async_trait::async_trait;
use rand::Rng;
use std::error::Error as StdError;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Arc;
use std::time::Duration;

use crate::cli::{ Args, Mode };
use crate::config::RemoteConfig;
use self::keyword::KeywordResolver;
use self::remote::RemoteResolver;

/// Outcome of one resolve call. A fallback still carries a reply to show;
/// `reason` is for the log only and never reaches the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Resolved(String),
    Fallback {
        text: String,
        reason: String,
    },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Resolved(text) | Reply::Fallback { text, .. } => text,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Reply::Resolved(_) => None,
            Reply::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Produces exactly one assistant reply per user message.
///
/// Implementations never fail and never log while the reply is pending:
/// anything that goes wrong is recovered into a `Reply::Fallback`.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, message: &str) -> Reply;

    fn name(&self) -> &'static str;
}

/// Picks an index in `0..len`. `len` is never zero.
pub trait RandomSource: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Replays a fixed sequence of indices, wrapping around at the end.
/// Each index is reduced modulo the pool length.
#[derive(Debug)]
pub struct SequenceRandom {
    sequence: Vec<usize>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(sequence: Vec<usize>) -> Self {
        Self {
            sequence,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn pick(&self, len: usize) -> usize {
        if self.sequence.is_empty() {
            return 0;
        }
        let at = self.cursor.fetch_add(1, Ordering::Relaxed) % self.sequence.len();
        self.sequence[at] % len
    }
}

pub(crate) fn choose<'a>(pool: &[&'a str], random: &dyn RandomSource) -> &'a str {
    pool[random.pick(pool.len())]
}

pub fn new_resolver(
    args: &Args,
    random: Arc<dyn RandomSource>
) -> Result<Arc<dyn Resolver>, Box<dyn StdError + Send + Sync>> {
    let resolver: Arc<dyn Resolver> = match args.mode {
        Mode::Local => {
            let delay = Duration::from_millis(args.reply_delay_ms);
            Arc::new(KeywordResolver::new(random).with_delay(delay))
        }
        Mode::Remote => {
            let config = RemoteConfig::from_args(args)?;
            Arc::new(RemoteResolver::new(config, random)?)
        }
        Mode::Proxy => {
            return Err("proxy mode does not resolve messages locally".into());
        }
    };
    Ok(resolver)
}
