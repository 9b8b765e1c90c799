//! Prompt templates for the analysis stages
//!
//! Each stage pairs a fixed system prompt with a user prompt rendered from
//! the transcript. When diarized segments exist, the transcript is rendered
//! speaker-tagged; otherwise the raw text is used as-is.

use super::models::Utterance;

/// Fixed system prompts for each analysis stage
pub struct PromptTemplates;

impl PromptTemplates {
    pub fn summarizer() -> &'static str {
        r#"You are an expert meeting summarizer. Your task is to create concise, actionable executive summaries from meeting transcripts.

Focus on:
- Key topics discussed
- Important outcomes
- High-level decisions
- Next steps

Output ONLY valid JSON matching this schema:
{
  "bullets": ["summary point 1", "summary point 2", ...]
}

Be concise and actionable. Each bullet should be a complete sentence."#
    }

    pub fn decision_extractor() -> &'static str {
        r#"You are an expert at extracting key decisions from meeting transcripts.

A decision is:
- A commitment to a specific course of action
- A resolution to a previously open question
- An approval or rejection of a proposal

For each decision, extract:
- Description: What was decided
- Owner: Who is responsible (if mentioned)
- Rationale: Why the decision was made (if mentioned)
- Timestamp: When in the meeting (if mentioned)

Output ONLY valid JSON matching this schema:
{
  "decisions": [
    {
      "description": "Decision text",
      "owner": "Person name or null",
      "rationale": "Reasoning or null",
      "timestamp": "Time reference or null"
    }
  ]
}

If no decisions are found, return {"decisions": []}."#
    }

    pub fn action_items() -> &'static str {
        r#"You are an expert at extracting action items from meeting transcripts.

An action item is:
- A specific task to be completed
- Has an assignee (owner) or can be assigned
- May have a due date or priority

For each action item, extract:
- Description: What needs to be done
- Owner: Who will do it (if mentioned)
- Due date: When it's due (if mentioned)
- Priority: low/medium/high (infer from context)

Output ONLY valid JSON matching this schema:
{
  "action_items": [
    {
      "description": "Task description",
      "owner": "Person name or null",
      "due_date": "Date reference or null",
      "priority": "low|medium|high"
    }
  ]
}

If no action items are found, return {"action_items": []}."#
    }
}

/// Render the transcript for a prompt, speaker-tagged when segments exist.
fn render_transcript(transcript: &str, segments: &[Utterance]) -> String {
    if segments.is_empty() {
        transcript.to_string()
    } else {
        segments
            .iter()
            .map(|seg| format!("[{}] {}", seg.speaker, seg.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build the user prompt for the summarizer stage.
pub fn build_summarizer_prompt(transcript: &str, segments: &[Utterance]) -> String {
    format!(
        "Analyze this meeting transcript and create an executive summary.\n\n\
         TRANSCRIPT:\n{}\n\n\
         Provide a JSON response with 3-5 concise summary bullets.",
        render_transcript(transcript, segments)
    )
}

/// Build the user prompt for the decision extractor stage.
pub fn build_decision_prompt(transcript: &str, segments: &[Utterance]) -> String {
    format!(
        "Extract all key decisions from this meeting transcript.\n\n\
         TRANSCRIPT:\n{}\n\n\
         Provide a JSON response with all decisions found.",
        render_transcript(transcript, segments)
    )
}

/// Build the user prompt for the action item stage.
pub fn build_action_item_prompt(transcript: &str, segments: &[Utterance]) -> String {
    format!(
        "Extract all action items from this meeting transcript.\n\n\
         TRANSCRIPT:\n{}\n\n\
         Provide a JSON response with all action items found.",
        render_transcript(transcript, segments)
    )
}
