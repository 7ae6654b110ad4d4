// Shared prompt constants.
// Each stage defines its own templates in pipeline/prompts.rs.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Hard rule: employers and job titles are copied, never edited.
pub const VERBATIM_INSTRUCTION: &str = "\
    CRITICAL: Copy every job title and every employer name EXACTLY as written in the \
    original resume, character for character. NEVER alter, upgrade, abbreviate or \
    embellish a title or employer. This is a hard rule.";

/// Hard rule: nothing appears unless the source resume supports it.
pub const TRACEABILITY_INSTRUCTION: &str = "\
    CRITICAL: Do NOT add any tool, system, certification or industry claim that cannot \
    be traced to the original resume. A skill the candidate lacks may appear ONLY when it \
    is explicitly framed as a transferable-skill bridge from experience the resume \
    actually contains. If the resume does not support a claim, omit it entirely.";

/// Content contract for every experience bullet.
pub const BULLET_INSTRUCTION: &str = "\
    Every bullet is ONE sentence combining an action verb, the task, and a concrete \
    outcome. Keep bullets in a logical order; do not merge separate achievements.";
