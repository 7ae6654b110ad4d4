// All LLM prompt constants for the tailoring pipeline.
// Cross-cutting fragments live in llm_client::prompts; contracts.rs assembles them.

/// System prompt for requirements extraction.
pub const REQUIREMENTS_SYSTEM: &str = "You are an expert recruiter and ATS specialist. \
    You analyse job descriptions and extract structured intelligence used to tailor \
    resumes for both automated screening and human reviewers.";

/// Requirements extraction template. Replace `{jd_text}` before sending.
pub const REQUIREMENTS_PROMPT_TEMPLATE: &str = r#"Analyse the following job description and return a JSON object with this EXACT schema (no extra fields):
{
  "hard_requirements": ["must-have skills, qualifications, years of experience"],
  "soft_requirements": ["soft skills and behavioural traits"],
  "tools_and_platforms": ["specific tools, software and platforms mentioned"],
  "implicit_expectations": {
    "industry": "industry context inferred",
    "seniority": "seniority level inferred",
    "work_type": "remote/hybrid/onsite",
    "team_size": "team size if inferrable",
    "budget_ownership": "yes/no/likely",
    "stakeholder_management": "yes/no/likely"
  },
  "role_context": {
    "industry": "primary industry",
    "seniority": "junior/mid/senior/lead/director",
    "work_type": "remote/hybrid/onsite"
  },
  "red_flags": ["areas where typical candidates may fall short"]
}

Every list must be present. Use an empty list when nothing applies; never null.

JOB DESCRIPTION:
{jd_text}"#;

/// System prompt for gap analysis.
pub const GAP_ANALYSIS_SYSTEM: &str = "You are a senior career strategist and ATS optimisation \
    expert. You perform rigorous gap analysis between a resume and a structured job \
    analysis, identifying both keyword gaps and deeper semantic misalignments.";

/// Gap analysis template. Replace `{requirements_json}` and `{resume_text}` before sending.
pub const GAP_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are given a resume and a structured job analysis. Perform a gap analysis and return a JSON object with this EXACT schema (no extra fields):
{
  "match_score": {
    "hard_skill": <0-100>,
    "tools": <0-100>,
    "soft_skill": <0-100>,
    "overall": <0-100>
  },
  "matched_keywords": ["keywords/skills present in both resume and job"],
  "keyword_gaps": ["required keywords/skills absent from the resume"],
  "semantic_gaps": [
    {"jd_term": "the job's preferred term", "resume_equivalent": "how the resume expresses the same concept"}
  ],
  "over_indexed": ["skills/experiences over-represented relative to the job"],
  "missing_context": ["context the job requires that the resume does not give"],
  "gap_bridges": [
    {"missing_skill": "skill the job needs", "transferable_experience": "experience IN THE RESUME that plausibly transfers"}
  ]
}

SCORING GUIDELINES:
- hard_skill: % of hard requirements evidenced in the resume (exact or semantic match)
- tools: % of tools/platforms evidenced in the resume
- soft_skill: % of soft requirements evidenced in the resume
- overall: hard_skill × 0.5 + tools × 0.3 + soft_skill × 0.2

JOB ANALYSIS:
{requirements_json}

RESUME:
{resume_text}"#;

/// System prompt for the rewrite. Hard rules are appended by contracts.rs.
pub const REWRITE_SYSTEM: &str = "You are an elite resume writer. You produce achievement-based \
    resumes that pass automated screening and read well to human reviewers.\n\n\
    WRITING RULES:\n\
    1. Never write duty-based bullets (\"Responsible for...\", \"Helped with...\").\n\
    2. Use the job's exact preferred terminology where the resume supports it.\n\
    3. Rewrite the profile to lead with the job's top three priorities.\n\
    4. Within each role, put the most job-relevant achievements first.";

/// Rewrite template. Replace `{requirements_json}`, `{gap_analysis_json}` and
/// `{resume_text}` before sending.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Rewrite the resume below to align with the job analysis and gap analysis. Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "candidate full name",
  "contact": "email | phone | location | linkedin",
  "profile": "rewritten professional profile paragraph (3-4 sentences)",
  "sections": [
    {
      "type": "experience",
      "title": "Professional Experience",
      "content": [
        {
          "company": "Company Name, copied verbatim",
          "title": "Job Title, copied verbatim",
          "dates": "Month Year - Month Year",
          "bullets": ["Action + task + measurable outcome, one sentence"]
        }
      ]
    },
    {"type": "skills", "title": "Core Skills", "content": "newline-separated skills"},
    {"type": "education", "title": "Education", "content": "Degree, Institution, Year"}
  ],
  "raw_text": "full rewritten resume as plain text"
}

"type" is one of: experience, education, skills, certifications, other.
Experience content is a list of roles; every other section's content is a single string.
Use the gap bridges only where the bridging experience genuinely appears in the original resume.

JOB ANALYSIS:
{requirements_json}

GAP ANALYSIS:
{gap_analysis_json}

ORIGINAL RESUME:
{resume_text}"#;
