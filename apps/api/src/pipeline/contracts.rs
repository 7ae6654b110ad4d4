//! Stage Contracts: the instruction payload each stage sends, paired with the
//! record type its reply must decode into.
//!
//! | Stage                  | Interpolates                              | Reply decodes to      |
//! |------------------------|-------------------------------------------|-----------------------|
//! | RequirementsExtraction | job description                           | `RequirementsProfile` |
//! | GapAnalysis            | resume + requirements                     | `GapAnalysis`         |
//! | ResumeRewrite          | resume + requirements + gap analysis      | `ResumeDocument`      |

use serde::Serialize;

use super::prompts::{
    GAP_ANALYSIS_PROMPT_TEMPLATE, GAP_ANALYSIS_SYSTEM, REQUIREMENTS_PROMPT_TEMPLATE,
    REQUIREMENTS_SYSTEM, REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM,
};
use super::{PipelineError, Stage};
use crate::llm_client::prompts::{
    BULLET_INSTRUCTION, JSON_ONLY_SYSTEM, TRACEABILITY_INSTRUCTION, VERBATIM_INSTRUCTION,
};
use crate::models::{GapAnalysis, RequirementsProfile, ResumeDocument, SectionContent};

/// A fully assembled generation request for one stage.
#[derive(Debug, Clone)]
pub struct StageRequest {
    pub stage: Stage,
    pub system: String,
    pub prompt: String,
}

pub fn requirements_request(job_description: &str) -> StageRequest {
    StageRequest {
        stage: Stage::RequirementsExtraction,
        system: format!("{REQUIREMENTS_SYSTEM}\n\n{JSON_ONLY_SYSTEM}"),
        prompt: fill(
            REQUIREMENTS_PROMPT_TEMPLATE,
            &[("jd_text", job_description.trim())],
        ),
    }
}

pub fn gap_analysis_request(
    resume_text: &str,
    requirements: &RequirementsProfile,
) -> Result<StageRequest, PipelineError> {
    let stage = Stage::GapAnalysis;
    let requirements_json = to_json(stage, requirements)?;
    Ok(StageRequest {
        stage,
        system: format!("{GAP_ANALYSIS_SYSTEM}\n\n{JSON_ONLY_SYSTEM}"),
        prompt: fill(
            GAP_ANALYSIS_PROMPT_TEMPLATE,
            &[
                ("requirements_json", &requirements_json),
                ("resume_text", resume_text.trim()),
            ],
        ),
    })
}

pub fn rewrite_request(
    resume_text: &str,
    requirements: &RequirementsProfile,
    gap_analysis: &GapAnalysis,
) -> Result<StageRequest, PipelineError> {
    let stage = Stage::ResumeRewrite;
    let requirements_json = to_json(stage, requirements)?;
    let gap_analysis_json = to_json(stage, gap_analysis)?;
    Ok(StageRequest {
        stage,
        system: format!(
            "{REWRITE_SYSTEM}\n\nHARD RULES:\n{VERBATIM_INSTRUCTION}\n{TRACEABILITY_INSTRUCTION}\n{BULLET_INSTRUCTION}\n\n{JSON_ONLY_SYSTEM}"
        ),
        prompt: fill(
            REWRITE_PROMPT_TEMPLATE,
            &[
                ("requirements_json", &requirements_json),
                ("gap_analysis_json", &gap_analysis_json),
                ("resume_text", resume_text.trim()),
            ],
        ),
    })
}

/// Job titles and employers in `rewritten` that do not appear verbatim in the
/// source resume text. An empty result means the verbatim rule held.
pub fn unverified_titles(source_resume: &str, rewritten: &ResumeDocument) -> Vec<String> {
    let mut offenders = Vec::new();
    for section in &rewritten.sections {
        if let SectionContent::Experience(entries) = &section.content {
            for entry in entries {
                for value in [&entry.title, &entry.company] {
                    let value = value.trim();
                    if !value.is_empty() && !source_resume.contains(value) {
                        offenders.push(value.to_string());
                    }
                }
            }
        }
    }
    offenders
}

fn to_json<T: Serialize>(stage: Stage, value: &T) -> Result<String, PipelineError> {
    serde_json::to_string_pretty(value).map_err(|source| PipelineError::Encode { stage, source })
}

/// Substitutes `{key}` placeholders in a single left-to-right pass, so text
/// interpolated from one placeholder is never rescanned for another.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars.iter().find_map(|(key, value)| {
            tail.strip_prefix(key)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures;

    #[test]
    fn test_fill_is_single_pass() {
        let out = fill("A={a} B={b} C={c}", &[("a", "{b}"), ("b", "2")]);
        assert_eq!(out, "A={b} B=2 C={c}");
    }

    #[test]
    fn test_requirements_request_embeds_job_description() {
        let request = requirements_request(fixtures::JOB_DESCRIPTION);
        assert_eq!(request.stage, Stage::RequirementsExtraction);
        assert!(request.prompt.contains("Senior Data Analyst"));
        assert!(!request.prompt.contains("{jd_text}"));
        assert!(request.system.contains("valid JSON only"));
        // Schema braces survive substitution.
        assert!(request.prompt.contains("\"hard_requirements\""));
    }

    #[test]
    fn test_gap_request_interpolates_requirements() {
        let requirements = fixtures::requirements();
        let request = gap_analysis_request(fixtures::RESUME_TEXT, &requirements).unwrap();
        assert!(request.prompt.contains("\"tools_and_platforms\""));
        assert!(request.prompt.contains("Tableau"));
        assert!(request.prompt.contains("Senior Analyst"));
        assert!(!request.prompt.contains("{requirements_json}"));
        assert!(!request.prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_rewrite_request_carries_verbatim_rule() {
        let request = rewrite_request(
            fixtures::RESUME_TEXT,
            &fixtures::requirements(),
            &fixtures::gap_analysis(),
        )
        .unwrap();
        assert!(request.system.contains("job title and every employer name EXACTLY"));
        assert!(request.system.contains("NEVER alter"));
    }

    #[test]
    fn test_rewrite_request_carries_traceability_rule() {
        let request = rewrite_request(
            fixtures::RESUME_TEXT,
            &fixtures::requirements(),
            &fixtures::gap_analysis(),
        )
        .unwrap();
        assert!(request.system.contains("traced to the original resume"));
        assert!(request.system.contains("transferable-skill bridge"));
        assert!(request.prompt.contains("\"gap_bridges\""));
        assert!(request.prompt.contains("ORIGINAL RESUME:"));
    }

    #[test]
    fn test_conforming_rewrite_keeps_titles_verbatim() {
        let rewritten: ResumeDocument =
            serde_json::from_str(fixtures::REWRITE_REPLY).unwrap();
        assert!(unverified_titles(fixtures::RESUME_TEXT, &rewritten).is_empty());
    }

    #[test]
    fn test_embellished_title_is_flagged() {
        let embellished = fixtures::REWRITE_REPLY.replace("Senior Analyst", "Lead Data Scientist");
        let rewritten: ResumeDocument = serde_json::from_str(&embellished).unwrap();
        assert_eq!(
            unverified_titles(fixtures::RESUME_TEXT, &rewritten),
            vec!["Lead Data Scientist".to_string()]
        );
    }
}
