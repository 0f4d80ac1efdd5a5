//! Instruction template for job-description analysis.
//!
//! The schema is fixed: title, company, location, responsibilities,
//! requirements, categorized skills and a flat skill list.

/// Skill categories the model may use.
pub const SKILL_CATEGORIES: &[&str] = &[
    "Languages",
    "Frameworks",
    "Web",
    "Mobile",
    "Cloud",
    "Databases",
    "DevOps",
    "Data/AI",
    "Testing",
    "Security",
    "Hardware/Embedded",
    "Design/UX",
    "Tools",
    "CRM/ERP",
    "Domain/Compliance",
];

/// Upper bound on skills kept per category.
pub const MAX_SKILLS_PER_CATEGORY: usize = 9;

const SCHEMA_EXAMPLE: &str = r#"{
  "job_title": "Software Engineer",
  "company": "Company Name",
  "location": "City, State or Remote",
  "responsibilities": [
    "Design and develop scalable backend services",
    "Collaborate with cross-functional teams",
    "Mentor junior engineers"
  ],
  "requirements": [
    "5+ years of experience in software development",
    "Strong proficiency in Python and Java",
    "Experience with cloud platforms (AWS/GCP)"
  ],
  "categories": [
    {"name": "Languages", "skills": ["Python", "Java"]},
    {"name": "Cloud", "skills": ["AWS", "GCP"]}
  ],
  "flat": ["Python", "Java", "AWS", "GCP"]
}"#;

/// Build the single instruction prompt embedding `jd_text`.
pub fn build(jd_text: &str) -> String {
    format!(
        "You are a recruiting assistant. Analyze this job description and extract structured information.

Return VALID JSON with this exact schema:

{SCHEMA_EXAMPLE}

Rules:
- Extract job_title, company, and location from the text. If not found, use an empty string.
- Extract 3-5 key responsibilities as bullet points. Each should be concise (one line), specific, and actionable.
- Extract 3-5 key requirements as bullet points. Each should be concise (one line), specific, and measurable when possible.
- Extract only explicitly mentioned technical skills (languages, frameworks, tools, platforms, cloud, databases, etc.).
- Do NOT include vague phrases like \"strong communication\" in skills.
- Prefer specific names: \"Python\", \"React\", \"AWS Lambda\", \"Docker\".
- Classify skills under categories: {categories}.
- Each category should have at most {max_skills} items.
- Focus on the most important and role-defining information.
- Output VALID JSON only.

Job Description:
{jd_text}
",
        categories = SKILL_CATEGORIES.join(", "),
        max_skills = MAX_SKILLS_PER_CATEGORY,
    )
}
