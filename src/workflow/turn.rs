use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::conversation::{ConversationState, SessionPhase};
use crate::domain::ticket::{TicketDraft, TicketResult};
use crate::workflow::escalation::{Decision, EscalationPolicy};
use crate::workflow::summarize;
use crate::workflow::triage;

pub const GREETING: &str = "¡Hola! Soy tu asistente de soporte técnico. Estoy aquí para ayudarte a resolver problemas con tus equipos y sistemas. Por favor, descríbeme el problema que estás experimentando con todo detalle.";

const ALREADY_CREATED_REPLY: &str = "Ya existe un ticket para esta conversación; el equipo técnico se pondrá en contacto contigo. Si surge un problema distinto, inicia una nueva conversación.";

const DEGRADED_REPLY: &str = "Lo siento, en este momento no puedo procesar tu mensaje. ¿Podrías intentarlo de nuevo en unos instantes?";

/// Resolves one user turn end to end: record it, obtain a draft reply, run
/// the escalation policy, and if the turn escalates, push the summarize →
/// classify → submit pipeline. Every failure becomes user-visible text; no
/// error escapes this boundary.
pub async fn handle_user_turn(
    ctx: &AppContext,
    state: &mut ConversationState,
    user_text: &str,
) -> String {
    if state.phase == SessionPhase::Resolved {
        state.record_user_turn(user_text);
        state.record_assistant_turn(ALREADY_CREATED_REPLY);
        return ALREADY_CREATED_REPLY.to_string();
    }

    state.record_user_turn(user_text);

    let draft_reply = match ctx
        .language_model
        .generate(&conversation_prompt(state, user_text))
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            warn!(error = %err, "generative reply failed, degrading");
            DEGRADED_REPLY.to_string()
        }
    };

    let policy = EscalationPolicy::new(ctx.config.escalation.clone());
    let decision = policy.decide(state, user_text, &draft_reply);
    info!(turn = state.turn_count, ?decision, "escalation decision");

    let reply = match decision {
        Decision::Create => escalate(ctx, state).await,
        Decision::Offer => {
            if policy.reply_offers_ticket(&draft_reply) {
                draft_reply
            } else {
                format!("{draft_reply}\n\n{}", policy.offer_suffix())
            }
        }
        Decision::None => draft_reply,
    };

    state.record_assistant_turn(reply.clone());
    reply
}

/// Summarize → classify → submit. The created flag flips only on a
/// successful submission; any failure drops the session back to
/// `Conversing` so the user can ask again.
async fn escalate(ctx: &AppContext, state: &mut ConversationState) -> String {
    state.phase = SessionPhase::TicketPending;

    let summary = match summarize::summarize(ctx.language_model.as_ref(), state).await {
        Ok(summary) => summary,
        Err(err) => {
            warn!(error = %err, "ticket summarization failed");
            state.phase = SessionPhase::Conversing;
            return failure_reply(&err.to_string());
        }
    };

    let category = triage::classify(
        &ctx.config.triage,
        &format!("{} {}", summary.description, state.transcript_text()),
    );

    let draft = TicketDraft::new(&summary.title, summary.description, category);
    let title = draft.title().to_string();

    match ctx.issue_tracker.create_issue(&draft).await {
        TicketResult::Created {
            key,
            category_label,
        } => {
            state.ticket_created = true;
            state.phase = SessionPhase::Resolved;
            info!(%key, category = %category_label, "ticket created");
            success_reply(&key, &title, &category_label)
        }
        TicketResult::Failed { detail } => {
            warn!(%detail, "ticket submission failed");
            state.phase = SessionPhase::Conversing;
            failure_reply(&detail)
        }
    }
}

fn conversation_prompt(state: &ConversationState, user_text: &str) -> String {
    format!(
        "Eres un asistente de soporte técnico conversacional. Tu objetivo es:\n\
         1. Hacer preguntas para entender completamente el problema\n\
         2. Intentar soluciones paso a paso\n\
         3. Ser proactivo y ofrecer crear un ticket cuando el problema sea complejo\n\
         4. Ser amable, paciente y profesional\n\
         \n\
         Historial de la conversación:\n\
         {}\n\
         Último mensaje del usuario: {user_text}\n\
         \n\
         Responde en español continuando la conversación naturalmente. \
         Si el problema es complejo y requiere intervención técnica, OFRECE crear un ticket. \
         No digas \"voy a crear el ticket\" sin antes ofrecerlo al usuario.",
        state.transcript_text()
    )
}

fn success_reply(key: &str, title: &str, category_label: &str) -> String {
    format!(
        "✅ Ticket creado exitosamente: {key}\n\n\
         📋 Asunto: {title}\n\
         🔧 Tipo de incidencia: {category_label}\n\n\
         ⏰ Nuestro equipo técnico se contactará contigo pronto."
    )
}

fn failure_reply(detail: &str) -> String {
    format!(
        "❌ No pude crear el ticket: {detail}\n\n\
         Puedes pedirme que lo intente de nuevo escribiendo \"crea el ticket\", \
         o contactar directamente al equipo de soporte."
    )
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::config::AppConfig;
    use crate::domain::category::CategoryCode;
    use crate::error::{AppError, AppResult};
    use crate::services::{IssueTrackerService, LanguageModelService};
    use crate::workflow::escalation::EscalationRules;
    use crate::workflow::triage::TriageRules;

    struct ScriptedModel {
        replies: Mutex<VecDeque<AppResult<String>>>,
        fallback: String,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn constant(reply: &str) -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                fallback: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }

        fn scripted(replies: Vec<AppResult<String>>, fallback: &str) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                fallback: fallback.to_string(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LanguageModelService for ScriptedModel {
        async fn generate(&self, _prompt: &str) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.replies.lock().unwrap().pop_front() {
                Some(reply) => reply,
                None => Ok(self.fallback.clone()),
            }
        }
    }

    struct RecordingTracker {
        outcomes: Mutex<VecDeque<TicketResult>>,
        submissions: AtomicUsize,
    }

    impl RecordingTracker {
        fn succeeding() -> Self {
            Self {
                outcomes: Mutex::new(VecDeque::new()),
                submissions: AtomicUsize::new(0),
            }
        }

        fn scripted(outcomes: Vec<TicketResult>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                submissions: AtomicUsize::new(0),
            }
        }

        fn submission_count(&self) -> usize {
            self.submissions.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IssueTrackerService for RecordingTracker {
        async fn create_issue(&self, draft: &TicketDraft) -> TicketResult {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            match self.outcomes.lock().unwrap().pop_front() {
                Some(outcome) => outcome,
                None => TicketResult::Created {
                    key: "SOP-42".to_string(),
                    category_label: draft.category.label().to_string(),
                },
            }
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            jira_base_url: "https://example.atlassian.net".to_string(),
            jira_email: "bot@example.com".to_string(),
            jira_token: "token".to_string(),
            jira_project_key: "SOP".to_string(),
            gemini_api_key: "key".to_string(),
            gemini_model: "gemini-2.0-flash-exp".to_string(),
            triage: TriageRules::default(),
            escalation: EscalationRules::default(),
        }
    }

    fn context(model: Arc<ScriptedModel>, tracker: Arc<RecordingTracker>) -> AppContext {
        AppContext::new(test_config(), tracker, model)
    }

    #[tokio::test]
    async fn explicit_request_creates_on_first_turn() {
        let model = Arc::new(ScriptedModel::constant(
            "TÍTULO: Problema reportado\nDESCRIPCIÓN: El usuario pidió un ticket.",
        ));
        let tracker = Arc::new(RecordingTracker::succeeding());
        let ctx = context(model, tracker.clone());
        let mut state = ConversationState::new();

        let reply = handle_user_turn(&ctx, &mut state, "crea el ticket").await;

        assert_eq!(tracker.submission_count(), 1);
        assert!(state.ticket_created);
        assert_eq!(state.phase, SessionPhase::Resolved);
        assert!(reply.contains("SOP-42"));
    }

    #[tokio::test]
    async fn at_most_one_ticket_per_session() {
        let model = Arc::new(ScriptedModel::constant(
            "TÍTULO: t\nDESCRIPCIÓN: d",
        ));
        let tracker = Arc::new(RecordingTracker::succeeding());
        let ctx = context(model.clone(), tracker.clone());
        let mut state = ConversationState::new();

        handle_user_turn(&ctx, &mut state, "crea el ticket").await;
        let model_calls_after_create = model.call_count();

        let reply = handle_user_turn(&ctx, &mut state, "crea el ticket").await;
        handle_user_turn(&ctx, &mut state, "crea el ticket otra vez").await;

        assert_eq!(tracker.submission_count(), 1);
        assert_eq!(reply, ALREADY_CREATED_REPLY);
        // Resolved sessions answer from the fixed message, no model calls.
        assert_eq!(model.call_count(), model_calls_after_create);
    }

    #[tokio::test]
    async fn failed_submission_does_not_lock_out_retry() {
        let model = Arc::new(ScriptedModel::constant(
            "TÍTULO: PC muerta\nDESCRIPCIÓN: La computadora no enciende.",
        ));
        let tracker = Arc::new(RecordingTracker::scripted(vec![TicketResult::Failed {
            detail: "Error 400 Bad Request: {\"errors\":[\"project key invalid\"]}".to_string(),
        }]));
        let ctx = context(model, tracker.clone());
        let mut state = ConversationState::new();

        let reply = handle_user_turn(&ctx, &mut state, "crea el ticket").await;
        assert!(!state.ticket_created);
        assert_eq!(state.phase, SessionPhase::Conversing);
        assert!(reply.contains("project key invalid"));

        let retry = handle_user_turn(&ctx, &mut state, "crea el ticket").await;
        assert_eq!(tracker.submission_count(), 2);
        assert!(state.ticket_created);
        assert!(retry.contains("SOP-42"));
    }

    #[tokio::test]
    async fn repeated_friction_escalates_by_fourth_turn() {
        // Replies keep containing "no funciona" and never offer a ticket, so
        // the policy should start offering once the threshold is reached.
        let model = Arc::new(ScriptedModel::constant(
            "Entiendo, eso no funciona. Probemos otra cosa.",
        ));
        let tracker = Arc::new(RecordingTracker::succeeding());
        let ctx = context(model, tracker.clone());
        let mut state = ConversationState::new();

        let mut offered = false;
        for _ in 0..4 {
            let reply = handle_user_turn(&ctx, &mut state, "mi pc no prende").await;
            if reply.contains("puedo crear un ticket") {
                offered = true;
            }
        }

        assert!(offered);
        assert_eq!(tracker.submission_count(), 0);
    }

    #[tokio::test]
    async fn friction_with_model_offer_submits_hardware_ticket() {
        let model = Arc::new(ScriptedModel::scripted(
            vec![
                Ok("Probemos el cable.".to_string()),
                Ok("¿Enciende alguna luz?".to_string()),
                Ok("Esto no funciona, puedo crear un ticket para escalarlo.".to_string()),
                Ok("TÍTULO: PC no prende\nDESCRIPCIÓN: Equipo sin energía, se probó power cycle.".to_string()),
            ],
            "sin respuesta",
        ));
        let tracker = Arc::new(RecordingTracker::succeeding());
        let ctx = context(model, tracker.clone());
        let mut state = ConversationState::new();

        handle_user_turn(&ctx, &mut state, "mi pc no prende").await;
        handle_user_turn(&ctx, &mut state, "mi pc no prende").await;
        let reply = handle_user_turn(&ctx, &mut state, "mi pc no prende, no funciona").await;

        assert_eq!(tracker.submission_count(), 1);
        assert!(state.ticket_created);
        assert!(reply.contains("Incidencia Tecnológica"));
        assert_eq!(
            triage::classify(&ctx.config.triage, &state.transcript_text()),
            CategoryCode::HardwareIncident
        );
    }

    #[tokio::test]
    async fn model_failure_degrades_reply_without_crashing() {
        let model = Arc::new(ScriptedModel::scripted(
            vec![Err(AppError::LanguageModel("timeout".to_string()))],
            "ok",
        ));
        let tracker = Arc::new(RecordingTracker::succeeding());
        let ctx = context(model, tracker.clone());
        let mut state = ConversationState::new();

        let reply = handle_user_turn(&ctx, &mut state, "hola, tengo un problema").await;

        assert_eq!(reply, DEGRADED_REPLY);
        assert_eq!(tracker.submission_count(), 0);
        assert_eq!(state.phase, SessionPhase::Conversing);
    }

    #[tokio::test]
    async fn summarizer_failure_leaves_session_retryable() {
        let model = Arc::new(ScriptedModel::scripted(
            vec![
                Ok("Claro, lo escalo.".to_string()),
                Err(AppError::LanguageModel("Gemini responded with 503".to_string())),
            ],
            "ok",
        ));
        let tracker = Arc::new(RecordingTracker::succeeding());
        let ctx = context(model, tracker.clone());
        let mut state = ConversationState::new();

        let reply = handle_user_turn(&ctx, &mut state, "crea el ticket").await;

        assert_eq!(tracker.submission_count(), 0);
        assert!(!state.ticket_created);
        assert_eq!(state.phase, SessionPhase::Conversing);
        assert!(reply.contains("No pude crear el ticket"));
    }

    #[tokio::test]
    async fn offer_suffix_appended_when_model_does_not_offer() {
        let model = Arc::new(ScriptedModel::constant("Sigue sin funcionar, lo veo."));
        let tracker = Arc::new(RecordingTracker::succeeding());
        let ctx = context(model, tracker.clone());
        let mut state = ConversationState::new();

        let mut last_reply = String::new();
        for _ in 0..3 {
            last_reply = handle_user_turn(&ctx, &mut state, "sigue sin funcionar").await;
        }

        assert!(last_reply.contains("¿Quieres que lo cree?"));
        assert_eq!(tracker.submission_count(), 0);
    }
}
