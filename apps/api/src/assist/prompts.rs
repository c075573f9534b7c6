// Resume-drafting prompt. Profile fields are filled in one pass by `build_system_prompt`.

use crate::assist::models::ChatParams;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::ChatRole;

pub const DRAFT_OUTPUT_SCHEMA: &str = r#"{
  "profession": "Profession of user.",
  "education": [{
    "description": "Description of education.",
    "schoolName": "Name of school.",
    "startDate": "Start date of education.",
    "endDate": "End date of education.",
    "degree": "Degree of education.",
    "gpa": "GPA of education."
  }],
  "skills": ["Array of skills that are relevant to the job description. Includes 5 to 10 hard or soft skills."],
  "experience": [{
    "description": "Description of work experience that is 3-6 sentences.",
    "companyName": "Name of company.",
    "startDate": "Start date of work experience.",
    "endDate": "End date of work experience.",
    "title": "Title of work experience."
  }],
  "interests": "Friendly description of interests, for example: 'When I'm not {profession}, I...'",
  "summary": "Brief summary of resume, keep it less than 500 characters"
}"#;

/// One system prompt carrying the profile fields, the job description, the
/// output schema, and any system turns the client sent along.
pub fn build_system_prompt(params: &ChatParams) -> String {
    let mut prompt = format!(
        "You are a helpful resume building assistant. \
Generate a resume that is 1 page long based on the following user's information: \
Profession: {profession} Work Experience: {experience}, Interests: {interests}, \
Education: {education}. The following is the job description: {job_description}. \
Use the job description provided to fill in the resume with keywords for a recruiter \
or recruiting algorithm.",
        profession = params.profession,
        experience = params.experience,
        interests = params.interests.as_deref().unwrap_or("not provided"),
        education = params.education,
        job_description = params.job_description(),
    );

    prompt.push(' ');
    prompt.push_str(JSON_ONLY_INSTRUCTION);
    prompt.push('\n');
    prompt.push_str(&DRAFT_OUTPUT_SCHEMA.replace("{profession}", &params.profession));

    for extra in params.messages.iter().filter(|m| m.role == ChatRole::System) {
        prompt.push_str("\n\n");
        prompt.push_str(&extra.content);
    }
    prompt
}
