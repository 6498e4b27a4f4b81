use crate::domain::category::CategoryCode;

/// Jira rejects summaries with line breaks; titles are also capped at 100
/// characters.
const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct TicketDraft {
    title: String,
    pub description: String,
    pub category: CategoryCode,
}

impl TicketDraft {
    pub fn new(title: &str, description: String, category: CategoryCode) -> Self {
        Self {
            title: sanitize_title(title),
            description,
            category,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Strips CR/LF, collapses them to spaces, trims, and truncates to the
/// tracker's limit.
fn sanitize_title(title: &str) -> String {
    let flattened = title.replace(['\n', '\r'], " ");
    flattened.trim().chars().take(TITLE_MAX_CHARS).collect()
}

/// Outcome of one submission attempt, folded into the reply and discarded.
#[derive(Debug, Clone)]
pub enum TicketResult {
    Created {
        key: String,
        category_label: String,
    },
    Failed {
        detail: String,
    },
}
