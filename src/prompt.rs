//! Prompt templates for the formal rewrite.

use crate::lang::Language;

/// Instruction sent after a truncated first pass.
pub const CONTINUE_PROMPT: &str =
    "Continue exactly where you stopped. Output only the remaining text, no explanation.";

/// Render the rewrite instructions followed by the caller's text, embedded verbatim.
pub fn build_prompt(text: &str, language: Language) -> String {
    let target_language = language.label();

    format!(
        "Rewrite the text into very formal corporate email language.

Critical rules:
- Do NOT translate. Keep the same language as the input ({target_language}).
- Preserve meaning and facts. Do not add new details.
- Keep formatting reasonable (paragraphs ok). No headings, no bullet lists unless already present in the input.
- Output ONLY the rewritten email body text (no commentary, no prefaces).
- Do NOT output any email headers or metadata: no Subject/Oggetto, no “Subject:”, no “Oggetto:”, no “Re:”, no “R:”, no “FW/Fwd:”, no From/To/Cc/Bcc/Date.
- If the input contains a subject line, remove it from the output and rewrite only the body content.
- The first character of your output must be the first character of the email body (e.g., greeting or first sentence). Do not start with labels like “Subject:” / “Oggetto:”.


TEXT:
{text}"
    )
}
