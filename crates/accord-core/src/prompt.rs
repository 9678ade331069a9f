//! Prompt templates for dispute analysis, settlement suggestions, and
//! mediator chat. Pure string builders; all branching is limited to
//! placeholder substitution for missing fields.

use crate::types::Dispute;

/// Join the extracted evidence blocks for embedding in a prompt.
pub fn evidence_summary(evidence_texts: &[String]) -> String {
    if evidence_texts.is_empty() {
        "No evidence text provided.".to_string()
    } else {
        evidence_texts.join("\n\n")
    }
}

fn amount_or(dispute: &Dispute, placeholder: &str) -> String {
    match dispute.amount {
        Some(a) => a.to_string(),
        None => placeholder.to_string(),
    }
}

/// Structured-analysis prompt: five labeled sections, 2-3 sentences each.
pub fn analysis_prompt(dispute: &Dispute, evidence_summary: &str) -> String {
    format!(
        "As an experienced legal mediator, analyze this dispute professionally and concisely:\n\
         \n\
         DISPUTE DETAILS:\n\
         - Title: {title}\n\
         - Category: {category}\n\
         - Amount: ${amount}\n\
         - Parties: {plaintiff} vs {defendant}\n\
         - Description: {description}\n\
         - Evidence Text: {evidence_summary}\n\
         \n\
         Provide a structured analysis with these sections:\n\
         \n\
         LEGAL OVERVIEW:\n\
         [Brief legal context and applicable laws/principles based on the description AND evidence]\n\
         \n\
         KEY ISSUES:\n\
         [Main points of contention based on the description AND evidence]\n\
         \n\
         PLAINTIFF POSITION:\n\
         [Strengths and weaknesses of plaintiff's case based on the description AND evidence]\n\
         \n\
         DEFENDANT POSITION:\n\
         [Strengths and weaknesses of defendant's case based on the description AND evidence]\n\
         \n\
         RECOMMENDATION:\n\
         [Overall assessment and recommended approach based on all information]\n\
         \n\
         Keep each section to 2-3 sentences maximum. Be objective and professional.",
        title = dispute.title,
        category = dispute.category,
        amount = amount_or(dispute, "N/A"),
        plaintiff = dispute.parties.plaintiff,
        defendant = dispute.parties.defendant,
        description = dispute.description,
    )
}

/// Settlement-suggestions prompt: asks for 3-4 suggestions formatted as
/// `**Title**: explanation`.
pub fn suggestions_prompt(dispute: &Dispute, evidence_summary: &str) -> String {
    format!(
        "Based on this {category} dispute involving ${amount}:\n\
         \n\
         Dispute: {description}\n\
         Parties: {plaintiff} vs {defendant}\n\
         Evidence Provided: {evidence_summary}\n\
         \n\
         Your task is to generate 3-4 highly detailed and practical settlement suggestions. \
         These must be specific, actionable, and fair.\n\
         \n\
         For each suggestion, provide a clear title and a detailed paragraph explaining:\n\
         1. The core terms of the settlement (e.g., payment amounts, actions to be taken).\n\
         2. The step-by-step process for implementation.\n\
         3. The benefits for both the plaintiff and the defendant.\n\
         \n\
         Format each suggestion exactly like this:\n\
         **Suggestion Title**: Detailed explanation paragraph...\n\
         \n\
         Avoid generic advice. Tailor your suggestions directly to the dispute details and evidence provided.",
        category = dispute.category,
        amount = amount_or(dispute, "unknown amount"),
        description = dispute.description,
        plaintiff = dispute.parties.plaintiff,
        defendant = dispute.parties.defendant,
    )
}

/// Mediator chat prompt: neutral guidance about the dispute, under 150 words.
pub fn chat_prompt(message: &str, dispute: &Dispute) -> String {
    format!(
        "You are an AI legal mediator. Respond professionally to this question about the dispute:\n\
         \n\
         DISPUTE CONTEXT:\n\
         - Case: {title}\n\
         - Type: {category}\n\
         - Parties: {plaintiff} vs {defendant}\n\
         \n\
         USER QUESTION: {message}\n\
         \n\
         Provide a helpful, neutral response focusing on:\n\
         - Practical legal guidance\n\
         - Fair resolution strategies\n\
         - Clear explanations\n\
         - Next steps\n\
         \n\
         Keep response under 150 words and professional.",
        title = dispute.title,
        category = dispute.category,
        plaintiff = dispute.parties.plaintiff,
        defendant = dispute.parties.defendant,
    )
}
