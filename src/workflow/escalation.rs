use serde::{Deserialize, Serialize};

use crate::domain::conversation::ConversationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Summarize the conversation and submit a ticket now.
    Create,
    /// Keep troubleshooting but propose opening a ticket.
    Offer,
    None,
}

/// Phrase sets and the turn threshold driving the escalation decision.
///
/// A bare "sí" is deliberately absent from the confirmation phrases: it
/// fires on any unrelated affirmative answer, so only wordings that mention
/// the ticket count as an explicit request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationRules {
    pub min_turns: u32,
    pub confirm_phrases: Vec<String>,
    pub offer_phrases: Vec<String>,
    pub friction_phrases: Vec<String>,
}

impl Default for EscalationRules {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            min_turns: 3,
            confirm_phrases: owned(&[
                "crea el ticket",
                "crea ticket",
                "crear ticket",
                "crear el ticket",
                "haz el ticket",
                "genera el ticket",
                "abre un ticket",
            ]),
            offer_phrases: owned(&[
                "puedo crear un ticket",
                "te gustaría que cree",
                "puedo generar un ticket",
                "deseas que cree",
                "quieres que cree",
                "puedo abrir un ticket",
            ]),
            friction_phrases: owned(&[
                "no funciona",
                "no sirve",
                "no se soluciona",
                "sigue sin funcionar",
                "sigue igual",
                "persiste",
                "no se resuelve",
                "revisión técnica",
                "equipo especializado",
            ]),
        }
    }
}

fn contains_any(haystack: &str, phrases: &[String]) -> bool {
    phrases
        .iter()
        .any(|phrase| haystack.contains(phrase.to_lowercase().as_str()))
}

pub struct EscalationPolicy {
    rules: EscalationRules,
}

impl EscalationPolicy {
    pub fn new(rules: EscalationRules) -> Self {
        Self { rules }
    }

    /// Decides whether this turn escalates. Called once per user turn, after
    /// the state's counter was incremented and before anything is submitted.
    ///
    /// A session that already created its ticket never escalates again; the
    /// caller flips `ticket_created` only after a successful submission so a
    /// failed attempt can be retried.
    pub fn decide(
        &self,
        state: &ConversationState,
        user_text: &str,
        draft_reply: &str,
    ) -> Decision {
        if state.ticket_created {
            return Decision::None;
        }

        let user_lowered = user_text.to_lowercase();
        if contains_any(&user_lowered, &self.rules.confirm_phrases) {
            return Decision::Create;
        }

        if state.turn_count < self.rules.min_turns {
            return Decision::None;
        }

        let transcript_lowered = state.transcript_text().to_lowercase();
        let friction = contains_any(&user_lowered, &self.rules.friction_phrases)
            || contains_any(&transcript_lowered, &self.rules.friction_phrases);
        if !friction {
            return Decision::None;
        }

        let reply_lowered = draft_reply.to_lowercase();
        if contains_any(&reply_lowered, &self.rules.offer_phrases) {
            Decision::Create
        } else {
            Decision::Offer
        }
    }

    pub fn reply_offers_ticket(&self, reply: &str) -> bool {
        contains_any(&reply.to_lowercase(), &self.rules.offer_phrases)
    }

    /// Offer wording injected when the generative reply did not propose a
    /// ticket on its own.
    pub fn offer_suffix(&self) -> &'static str {
        "Si lo prefieres, puedo crear un ticket para que el equipo técnico revise tu caso. ¿Quieres que lo cree?"
    }
}
