// All LLM prompt constants for the analysis pipeline.
// Assembly (placeholder substitution) lives in `critique`.

/// System prompt for every analysis run: reviewer persona, no fluff.
pub const REVIEWER_SYSTEM: &str =
    "You are an expert resume reviewer. \
    Give concise, practical feedback with concrete suggestions. Avoid fluff.";

/// Analysis prompt template. Fill `{target_role}`, `{jd_section}`, and
/// `{resume_text}` before sending.
///
/// All three values are untrusted and may themselves contain placeholder
/// tokens, so the fill must be a single pass that never rescans spliced text.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following resume and provide helpful, actionable feedback for **{target_role}**.

Respond in English, formatted in Markdown with these sections:

### Summary (2–3 sentences)

### Strengths
- 3–6 concise bullets

### Key Improvements
- 3–6 concise bullets (e.g., missing metrics/skills/clarity)

### Rewritten Bullets (examples)
For 3–6 items, show:
- **Before:** ...
- **After:** ...

### Role/ATS Alignment
- Top keywords already present
- Important missing/weak keywords (and natural ways to add them)
{jd_section}
### Resume Content
{resume_text}"#;

/// Job-description block spliced into `{jd_section}` only when the caller
/// supplied one. Replace `{job_description}` before sending.
pub const JD_SECTION_TEMPLATE: &str = "\nJob Description:\n{job_description}\n";
