//! Critique pipeline: extracted resume text plus optional targeting becomes
//! one reviewer prompt and one completion. No retries, no post-processing of
//! the model output.

use tracing::info;

use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, JD_SECTION_TEMPLATE, REVIEWER_SYSTEM};
use crate::errors::AppError;
use crate::extract::{extract_text, ExtractedText, UploadedDocument};
use crate::llm_client::CompletionBackend;

/// Role the analysis is framed for when the caller leaves the field blank.
pub const DEFAULT_TARGET_ROLE: &str = "general applications";

/// Normalized inputs for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Never blank: the default role has already been substituted.
    pub target_role: String,
    /// `None` when the caller supplied nothing or only whitespace.
    pub job_description: Option<String>,
    pub resume_text: String,
}

impl AnalysisRequest {
    /// Trims both optional fields, dropping blanks, and substitutes the
    /// default role. `resume_text` arrives already normalized by extraction.
    pub fn new(
        target_role: Option<&str>,
        job_description: Option<&str>,
        resume_text: String,
    ) -> Self {
        let target_role = target_role
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .unwrap_or(DEFAULT_TARGET_ROLE)
            .to_string();

        let job_description = job_description
            .map(str::trim)
            .filter(|jd| !jd.is_empty())
            .map(str::to_string);

        Self {
            target_role,
            job_description,
            resume_text,
        }
    }
}

/// Renders the reviewer prompt. Deterministic: same request, same prompt.
///
/// Assembly is a single left-to-right pass over the template: each value is
/// spliced in verbatim and never rescanned, so anything resembling a
/// placeholder inside the role, job description, or resume survives as-is.
pub fn build_analysis_prompt(request: &AnalysisRequest) -> String {
    let jd_section = match &request.job_description {
        Some(jd) => JD_SECTION_TEMPLATE.replace("{job_description}", jd),
        None => String::new(),
    };

    // Listed in template order; each split consumes the template up to and
    // including its placeholder.
    let substitutions = [
        ("{target_role}", request.target_role.as_str()),
        ("{jd_section}", jd_section.as_str()),
        ("{resume_text}", request.resume_text.as_str()),
    ];

    let mut prompt = String::with_capacity(
        ANALYSIS_PROMPT_TEMPLATE.len()
            + request.target_role.len()
            + jd_section.len()
            + request.resume_text.len(),
    );
    let mut rest = ANALYSIS_PROMPT_TEMPLATE;
    for (placeholder, value) in substitutions {
        if let Some((head, tail)) = rest.split_once(placeholder) {
            prompt.push_str(head);
            prompt.push_str(value);
            rest = tail;
        }
    }
    prompt.push_str(rest);
    prompt
}

/// Finished critique plus the targeting it was framed for.
#[derive(Debug, Clone)]
pub struct Critique {
    /// Markdown feedback exactly as the model produced it.
    pub feedback: String,
    pub target_role: String,
}

/// Runs the full pipeline for one uploaded resume: extract, assemble, complete.
pub async fn run_critique(
    backend: &dyn CompletionBackend,
    document: &UploadedDocument,
    target_role: Option<&str>,
    job_description: Option<&str>,
) -> Result<Critique, AppError> {
    let resume_text = match extract_text(document) {
        ExtractedText::Text(text) => text,
        ExtractedText::Empty => return Err(AppError::EmptyExtraction),
    };

    info!(
        "Extracted {} bytes of resume text from a {} byte upload",
        resume_text.len(),
        document.content.len()
    );

    let request = AnalysisRequest::new(target_role, job_description, resume_text);
    let prompt = build_analysis_prompt(&request);

    info!(
        "Requesting critique for target role {:?} (job description supplied: {})",
        request.target_role,
        request.job_description.is_some()
    );

    let feedback = backend
        .complete(&prompt, REVIEWER_SYSTEM)
        .await
        .map_err(|e| AppError::Completion(e.to_string()))?;

    Ok(Critique {
        feedback,
        target_role: request.target_role,
    })
}
