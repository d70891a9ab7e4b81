use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::{ choose, RandomSource, Reply, Resolver };

pub const FILLER_REPLIES: [&str; 10] = [
    "¡Interesante! Cuéntame más sobre eso.",
    "Entiendo tu punto de vista. ¿Qué opinas sobre...?",
    "Esa es una buena pregunta. Déjame pensar...",
    "¡Excelente! Me gusta cómo piensas.",
    "Hmm, eso es algo en lo que no había pensado antes.",
    "¿Podrías explicarme un poco más?",
    "¡Qué fascinante! Sigue contándome.",
    "Creo que tienes razón en ese punto.",
    "Esa es una perspectiva muy interesante.",
    "¡Me encanta aprender cosas nuevas contigo!",
];

pub const GREETING_REPLY: &str = "¡Hola! ¿Cómo estás hoy? 😊";
pub const FAREWELL_REPLY: &str = "¡Hasta luego! Fue un placer charlar contigo. 👋";
pub const THANKS_REPLY: &str = "¡De nada! Siempre es un placer ayudar. 😊";
pub const NAME_REPLY: &str =
    "Soy un asistente virtual creado para esta práctica de programación. ¡Puedes llamarme ChatBot! 🤖";
pub const WEB_TECH_REPLY: &str =
    "¡Excelente! Estás aprendiendo tecnologías web muy importantes. ¿Te está gustando la programación? 💻";

/// A keyword rule: fires when the lowercased message contains any of `keywords`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

impl KeywordRule {
    fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k))
    }
}

/// Priority chain; the first matching rule wins.
pub const DEFAULT_RULES: [KeywordRule; 5] = [
    KeywordRule { keywords: &["hola", "hi"], reply: GREETING_REPLY },
    KeywordRule { keywords: &["adiós", "bye"], reply: FAREWELL_REPLY },
    KeywordRule { keywords: &["gracias"], reply: THANKS_REPLY },
    KeywordRule { keywords: &["nombre"], reply: NAME_REPLY },
    KeywordRule { keywords: &["html", "css", "javascript"], reply: WEB_TECH_REPLY },
];

pub struct KeywordResolver {
    rules: Vec<KeywordRule>,
    fillers: Vec<&'static str>,
    random: Arc<dyn RandomSource>,
    delay: Duration,
}

impl KeywordResolver {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
            fillers: FILLER_REPLIES.to_vec(),
            random,
            delay: Duration::ZERO,
        }
    }

    /// Pause before replying, so the assistant appears to think.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The reply without any delay.
    pub fn reply_for(&self, message: &str) -> &'static str {
        let normalized = message.to_lowercase();
        match self.rules.iter().find(|rule| rule.matches(&normalized)) {
            Some(rule) => rule.reply,
            None => choose(&self.fillers, self.random.as_ref()),
        }
    }
}

#[async_trait]
impl Resolver for KeywordResolver {
    async fn resolve(&self, message: &str) -> Reply {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Reply::Resolved(self.reply_for(message).to_string())
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ SequenceRandom, ThreadRandom };

    fn resolver() -> KeywordResolver {
        KeywordResolver::new(Arc::new(ThreadRandom))
    }

    #[test]
    fn greeting_wins_over_later_rules() {
        let r = resolver();
        assert_eq!(r.reply_for("HOLA, gracias por tu nombre y el CSS"), GREETING_REPLY);
        assert_eq!(r.reply_for("Hola, ¿cómo estás?"), GREETING_REPLY);
    }

    #[test]
    fn hi_matches_as_substring() {
        // "this" contains "hi", same as a plain substring search would find
        assert_eq!(resolver().reply_for("what is this"), GREETING_REPLY);
    }

    #[test]
    fn each_rule_in_priority_order() {
        let r = resolver();
        assert_eq!(r.reply_for("Adiós amigo"), FAREWELL_REPLY);
        assert_eq!(r.reply_for("ok BYE"), FAREWELL_REPLY);
        assert_eq!(r.reply_for("muchas gracias"), THANKS_REPLY);
        assert_eq!(r.reply_for("¿cuál es tu nombre?"), NAME_REPLY);
        assert_eq!(r.reply_for("aprendo JavaScript"), WEB_TECH_REPLY);
        assert_eq!(r.reply_for("gracias, adiós"), FAREWELL_REPLY);
    }

    #[test]
    fn unmatched_input_draws_from_filler_pool() {
        let r = resolver();
        for _ in 0..50 {
            let reply = r.reply_for("el clima está templado");
            assert!(FILLER_REPLIES.contains(&reply));
        }
    }

    #[test]
    fn injected_sequence_selects_filler() {
        let r = KeywordResolver::new(Arc::new(SequenceRandom::new(vec![0, 9, 3])));
        assert_eq!(r.reply_for("xyz"), FILLER_REPLIES[0]);
        assert_eq!(r.reply_for("xyz"), FILLER_REPLIES[9]);
        assert_eq!(r.reply_for("xyz"), FILLER_REPLIES[3]);
    }

    #[tokio::test]
    async fn resolve_is_stable_for_keyword_input() {
        let r = resolver();
        for _ in 0..5 {
            assert_eq!(r.resolve("gracias").await, Reply::Resolved(THANKS_REPLY.to_string()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn resolve_waits_for_configured_delay() {
        let r = resolver().with_delay(Duration::from_millis(1000));
        let started = tokio::time::Instant::now();
        let reply = r.resolve("hola").await;
        assert_eq!(reply.text(), GREETING_REPLY);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}
