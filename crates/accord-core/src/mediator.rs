//! Orchestrates the LLM round trips for mediation and chat.

use crate::llm::{LlmGateway, LlmReply};
use crate::prompt;
use crate::suggest::parse_suggestions;
use crate::types::Dispute;

const ANALYSIS_MAX_TOKENS: u32 = 600;
const SUGGESTIONS_MAX_TOKENS: u32 = 500;
const CHAT_MAX_TOKENS: u32 = 200;

/// Result of one mediation pass. `degraded` is set when either LLM call
/// fell back to the apology reply; the persisted output is still valid.
#[derive(Debug, Clone)]
pub struct MediationOutcome {
    pub analysis: String,
    pub suggestions: Vec<String>,
    pub degraded: bool,
}

pub struct Mediator {
    llm: LlmGateway,
}

impl Mediator {
    pub fn new(llm: LlmGateway) -> Self {
        Self { llm }
    }

    /// Generate analysis and settlement suggestions for a dispute.
    /// Each LLM call is attempted exactly once; failures degrade rather
    /// than abort.
    pub async fn mediate(&self, dispute: &Dispute) -> MediationOutcome {
        let summary = prompt::evidence_summary(&dispute.evidence_texts);

        let analysis = self
            .llm
            .complete(&prompt::analysis_prompt(dispute, &summary), ANALYSIS_MAX_TOKENS)
            .await;

        let suggestions_reply = self
            .llm
            .complete(
                &prompt::suggestions_prompt(dispute, &summary),
                SUGGESTIONS_MAX_TOKENS,
            )
            .await;
        let suggestions = parse_suggestions(&suggestions_reply.text, dispute.amount);

        MediationOutcome {
            analysis: analysis.text,
            degraded: analysis.degraded || suggestions_reply.degraded,
            suggestions,
        }
    }

    /// Answer one chat message about a dispute.
    pub async fn respond(&self, message: &str, dispute: &Dispute) -> LlmReply {
        self.llm
            .complete(&prompt::chat_prompt(message, dispute), CHAT_MAX_TOKENS)
            .await
    }
}
