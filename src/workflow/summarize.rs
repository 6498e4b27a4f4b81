use crate::domain::conversation::ConversationState;
use crate::error::AppResult;
use crate::services::LanguageModelService;

pub const FALLBACK_TITLE: &str = "Problema técnico reportado por usuario";

const TITLE_MARKERS: [&str; 2] = ["TÍTULO:", "TITULO:"];
const DESCRIPTION_MARKERS: [&str; 2] = ["DESCRIPCIÓN:", "DESCRIPCION:"];

#[derive(Debug, Clone)]
pub struct TicketSummary {
    pub title: String,
    pub description: String,
}

/// Turns the full transcript into a (title, description) pair for the ticket.
///
/// The model is asked for two labeled lines, but nothing enforces that format
/// on the provider side, so the parse degrades instead of failing: a missing
/// title marker falls back to a fixed title, a missing description marker
/// falls back to the raw response, and an empty response falls back to the
/// transcript itself.
pub async fn summarize(
    model: &dyn LanguageModelService,
    state: &ConversationState,
) -> AppResult<TicketSummary> {
    let transcript = state.transcript_text();
    let prompt = summary_prompt(&transcript);
    let response = model.generate(&prompt).await?;
    Ok(parse_summary(&response, &transcript))
}

fn summary_prompt(transcript: &str) -> String {
    format!(
        "Eres un técnico de soporte. Analiza toda esta conversación y genera un resumen profesional para un ticket.\n\
         \n\
         CONVERSACIÓN COMPLETA:\n\
         {transcript}\n\
         \n\
         Instrucciones:\n\
         1. Crea un TÍTULO claro y conciso (máximo 8 palabras)\n\
         2. Escribe una DESCRIPCIÓN técnica que incluya los síntomas específicos, \
         los pasos de solución ya intentados y la información del equipo\n\
         3. Usa lenguaje técnico profesional\n\
         \n\
         Formato de respuesta:\n\
         TÍTULO: [título aquí]\n\
         DESCRIPCIÓN: [descripción técnica detallada aquí]"
    )
}

fn strip_marker<'a>(line: &'a str, markers: &[&str]) -> Option<&'a str> {
    let trimmed = line.trim_start();
    markers
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
        .map(str::trim)
}

fn parse_summary(response: &str, transcript: &str) -> TicketSummary {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;

    for line in response.lines() {
        if title.is_none() {
            if let Some(rest) = strip_marker(line, &TITLE_MARKERS) {
                title = Some(rest.to_string());
                continue;
            }
        }
        if description.is_none() {
            if let Some(rest) = strip_marker(line, &DESCRIPTION_MARKERS) {
                description = Some(rest.to_string());
            }
        }
    }

    let description = description
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| {
            if response.trim().is_empty() {
                transcript.to_string()
            } else {
                response.trim().to_string()
            }
        });

    TicketSummary {
        title: title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        description,
    }
}
