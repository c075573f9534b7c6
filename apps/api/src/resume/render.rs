//! Markdown rendering for resumes. Both the stored snapshot and the unsaved
//! document form are flattened into the same section layout.

use crate::forms::resume::ResumeDocumentForm;
use crate::models::resume::ResumeView;

struct Entry<'a> {
    heading: &'a str,
    subheading: &'a str,
    start: &'a str,
    end: &'a str,
    details: Vec<(&'static str, &'a str)>,
    body: Option<&'a str>,
}

fn push_entries(md: &mut String, title: &str, entries: &[Entry<'_>]) {
    if entries.is_empty() {
        return;
    }
    md.push_str(&format!("## {title}\n\n"));
    for entry in entries {
        md.push_str(&format!("### {} - {}\n", entry.heading, entry.subheading));
        md.push_str(&format!("*{} to {}*\n", entry.start, entry.end));
        for (label, value) in &entry.details {
            md.push_str(&format!("- **{label}:** {value}\n"));
        }
        if let Some(body) = entry.body.filter(|b| !b.trim().is_empty()) {
            md.push('\n');
            md.push_str(body.trim());
            md.push('\n');
        }
        md.push('\n');
    }
}

fn push_interests(md: &mut String, interests: Option<&str>) {
    if let Some(interests) = interests.filter(|i| !i.trim().is_empty()) {
        md.push_str(&format!("## Interests\n\n{}\n", interests.trim()));
    }
}

pub fn render_document(form: &ResumeDocumentForm) -> String {
    let header = &form.header;
    let contact = &form.contact;

    let mut md = format!("# {}\n\n**{}**\n\n", header.full_name, header.profession);
    let mut line = vec![header.email.as_str(), contact.location.as_str()];
    line.extend(
        [&contact.phone, &contact.linked_in, &contact.portfolio]
            .into_iter()
            .filter_map(|v| v.as_deref()),
    );
    md.push_str(&line.join(" | "));
    md.push_str("\n\n");

    let experience: Vec<_> = form
        .experience
        .experience
        .iter()
        .map(|w| Entry {
            heading: &w.title,
            subheading: &w.name,
            start: &w.start_date,
            end: &w.end_date,
            details: vec![],
            body: Some(w.description.as_str()),
        })
        .collect();
    push_entries(&mut md, "Experience", &experience);

    let education: Vec<_> = form
        .education
        .education
        .iter()
        .map(|s| Entry {
            heading: &s.degree,
            subheading: &s.name,
            start: &s.start_date,
            end: &s.end_date,
            details: school_details(s.gpa.as_deref(), s.location.as_deref()),
            body: s.description.as_deref(),
        })
        .collect();
    push_entries(&mut md, "Education", &education);

    let mut groups: Vec<_> = form.skills.skills.iter().collect();
    groups.sort_by_key(|g| g.position);
    md.push_str("## Skills\n\n");
    for group in groups {
        md.push_str(&format!("- **{}:** {}\n", group.category, group.items().join(", ")));
    }
    md.push('\n');

    push_interests(&mut md, header.interests.as_deref());
    md
}

pub fn render_snapshot(view: &ResumeView) -> String {
    let mut md = format!(
        "# {}\n\n*Resume {} created {}*\n\n",
        view.resume.profession,
        view.resume.id,
        view.resume.created_at.format("%Y-%m-%d")
    );

    let experience: Vec<_> = view
        .experience
        .iter()
        .map(|w| Entry {
            heading: &w.title,
            subheading: &w.name,
            start: &w.start_date,
            end: &w.end_date,
            details: vec![],
            body: Some(w.description.as_str()),
        })
        .collect();
    push_entries(&mut md, "Experience", &experience);

    let education: Vec<_> = view
        .education
        .iter()
        .map(|s| Entry {
            heading: &s.degree,
            subheading: &s.name,
            start: &s.start_date,
            end: &s.end_date,
            details: school_details(s.gpa.as_deref(), s.location.as_deref()),
            body: s.description.as_deref(),
        })
        .collect();
    push_entries(&mut md, "Education", &education);

    push_interests(&mut md, view.resume.interests.as_deref());
    md
}

fn school_details<'a>(gpa: Option<&'a str>, location: Option<&'a str>) -> Vec<(&'static str, &'a str)> {
    [("GPA", gpa), ("Location", location)]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
}
