use async_trait::async_trait;

use crate::domain::ticket::{TicketDraft, TicketResult};

/// Submission boundary. Implementations map every transport problem into
/// `TicketResult::Failed` instead of erroring past this trait, and perform
/// no retries of their own.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn create_issue(&self, draft: &TicketDraft) -> TicketResult;
}
