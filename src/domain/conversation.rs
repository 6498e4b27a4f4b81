#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Conversing,
    TicketPending,
    Resolved,
}

/// Per-session conversation state, exclusively owned by the session handler.
///
/// `ticket_created` is monotone: once true it is never reset, and no further
/// ticket is submitted for the session.
#[derive(Debug)]
pub struct ConversationState {
    pub turns: Vec<Turn>,
    pub ticket_created: bool,
    pub turn_count: u32,
    pub phase: SessionPhase,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            ticket_created: false,
            turn_count: 0,
            phase: SessionPhase::Idle,
        }
    }

    /// Appends a user turn and advances the counter; turns are append-only.
    pub fn record_user_turn(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
        self.turn_count += 1;
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Conversing;
        }
    }

    pub fn record_assistant_turn(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant(text));
    }

    /// Flattens the chronological transcript into one block of text.
    pub fn transcript_text(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            let role = match turn.speaker {
                Speaker::User => "Usuario",
                Speaker::Assistant => "Asistente",
            };
            out.push_str(role);
            out.push_str(": ");
            out.push_str(&turn.text);
            out.push('\n');
        }
        out
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
