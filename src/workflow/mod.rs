pub mod escalation;
pub mod summarize;
pub mod triage;
pub mod turn;
