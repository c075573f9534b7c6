use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::forms::resume::CreateResumeInput;
use crate::forms::Form;
use crate::models::profile::{SchoolRow, WorkRow};
use crate::models::resume::{ResumeRow, ResumeSummary, ResumeView};
use crate::store::ProfileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResume {
    pub resume_id: Uuid,
}

pub async fn list(store: &dyn ProfileStore, profile_id: Uuid) -> Result<Vec<ResumeSummary>, AppError> {
    store.list_resumes(profile_id).await
}

pub async fn read_by_id(store: &dyn ProfileStore, resume_id: Uuid) -> Result<ResumeView, AppError> {
    store
        .load_resume(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

/// Every row in the snapshot gets a fresh id and belongs to the resume only,
/// so later profile edits never reach it.
pub fn build_snapshot(input: &CreateResumeInput) -> ResumeView {
    let resume_id = Uuid::new_v4();
    let education = input
        .education
        .iter()
        .enumerate()
        .map(|(index, school)| SchoolRow {
            id: Uuid::new_v4(),
            profile_id: None,
            resume_id: Some(resume_id),
            name: school.name.clone(),
            degree: school.degree.clone(),
            start_date: school.start_date.clone(),
            end_date: school.end_date.clone(),
            description: school.description.clone(),
            gpa: school.gpa.clone(),
            location: school.location.clone(),
            position: index as i32,
        })
        .collect();
    let experience = input
        .experience
        .iter()
        .enumerate()
        .map(|(index, work)| WorkRow {
            id: Uuid::new_v4(),
            profile_id: None,
            resume_id: Some(resume_id),
            name: work.name.clone(),
            title: work.title.clone(),
            start_date: work.start_date.clone(),
            end_date: work.end_date.clone(),
            description: work.description.clone(),
            position: index as i32,
        })
        .collect();

    ResumeView {
        resume: ResumeRow {
            id: resume_id,
            profile_id: input.profile_id,
            profession: input.profession.clone(),
            interests: Some(input.interests.clone()).filter(|s| !s.is_empty()),
            created_at: Utc::now(),
        },
        education,
        experience,
    }
}

/// Not idempotent: each call freezes a new, independent copy.
pub async fn create(
    store: &dyn ProfileStore,
    input: &CreateResumeInput,
) -> Result<CreatedResume, AppError> {
    input.check()?;
    let snapshot = build_snapshot(input);
    store.insert_resume(&snapshot).await?;
    info!(
        "Created resume {} for profile {} ({} education, {} work)",
        snapshot.resume.id,
        input.profile_id,
        snapshot.education.len(),
        snapshot.experience.len()
    );
    Ok(CreatedResume {
        resume_id: snapshot.resume.id,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::forms::education::AddEducationInput;
    use crate::forms::experience::AddWorkInput;
    use crate::profile::procedures::{add_education, add_work, read_profile};
    use crate::store::memory::MemoryStore;

    fn input(profile_id: Uuid) -> CreateResumeInput {
        serde_json::from_value(json!({
            "profileId": profile_id,
            "profession": "Engineer",
            "interests": "Climbing",
            "education": [
                { "name": "State University", "degree": "BSc", "startDate": "2010", "endDate": "2014" },
                { "name": "Night School", "degree": "Cert", "startDate": "2015", "endDate": "2016" }
            ],
            "experience": [{
                "name": "Acme Corp",
                "title": "Engineer",
                "startDate": "2016",
                "endDate": "2020",
                "description": "Built things. Fixed things. Shipped things."
            }]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_is_not_idempotent() {
        let store = MemoryStore::new();
        let (_, profile_id) = store.seed_user("ada@example.com");
        let input = input(profile_id);

        let first = create(&store, &input).await.unwrap();
        let second = create(&store, &input).await.unwrap();
        assert_ne!(first.resume_id, second.resume_id);

        let a = read_by_id(&store, first.resume_id).await.unwrap();
        let b = read_by_id(&store, second.resume_id).await.unwrap();
        assert_eq!(a.education.len(), 2);
        assert_eq!(b.education.len(), 2);
        assert!(a.education.iter().all(|s| b.education.iter().all(|t| t.id != s.id)));
        assert_eq!(a.education[0].name, "State University");
        assert_eq!(a.experience[0].resume_id, Some(first.resume_id));

        let listed = list(&store, profile_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at >= listed[1].created_at);
    }

    #[tokio::test]
    async fn test_snapshot_ignores_later_profile_edits() {
        let store = MemoryStore::new();
        let (user_id, profile_id) = store.seed_user("ada@example.com");
        let created = create(&store, &input(profile_id)).await.unwrap();

        let edit: AddWorkInput = serde_json::from_value(json!({
            "experience": [{
                "name": "Globex",
                "title": "Lead",
                "startDate": "2021",
                "endDate": "2024",
                "description": "Led a team. Hired people. Set the roadmap."
            }],
            "profileId": profile_id
        }))
        .unwrap();
        add_work(&store, &edit).await.unwrap();

        let profile = read_profile(&store, user_id).await.unwrap();
        assert_eq!(profile.experience.len(), 1);
        assert_eq!(profile.experience[0].name, "Globex");

        let snapshot = read_by_id(&store, created.resume_id).await.unwrap();
        assert_eq!(snapshot.experience.len(), 1);
        assert_eq!(snapshot.experience[0].name, "Acme Corp");
    }

    #[tokio::test]
    async fn test_snapshot_ids_cannot_be_edited_through_profile() {
        let store = MemoryStore::new();
        let (user_id, profile_id) = store.seed_user("ada@example.com");
        let created = create(&store, &input(profile_id)).await.unwrap();
        let snapshot = read_by_id(&store, created.resume_id).await.unwrap();

        add_education(
            &store,
            &serde_json::from_value::<AddEducationInput>(json!({
                "education": [{ "name": "Old Campus", "degree": "Diploma", "startDate": "2000", "endDate": "2004" }],
                "profileId": profile_id
            }))
            .unwrap(),
        )
        .await
        .unwrap();

        let edit: AddEducationInput = serde_json::from_value(json!({
            "education": [
                { "name": "Edited University", "degree": "MSc", "startDate": "2020", "endDate": "2022" },
                {
                    "id": snapshot.education[0].id,
                    "name": "Hijacked College",
                    "degree": "PhD",
                    "startDate": "2022",
                    "endDate": "2026"
                }
            ],
            "profileId": profile_id
        }))
        .unwrap();
        let err = add_education(&store, &edit).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.contains("education[1].id")));

        let after = read_by_id(&store, created.resume_id).await.unwrap();
        assert_eq!(after.education, snapshot.education);

        // The rejected edit left the profile untouched.
        let profile = read_profile(&store, user_id).await.unwrap();
        let names: Vec<_> = profile.education.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Old Campus"]);
    }

    #[tokio::test]
    async fn test_unknown_resume_not_found() {
        let store = MemoryStore::new();
        let err = read_by_id(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_input_writes_nothing() {
        let store = MemoryStore::new();
        let (_, profile_id) = store.seed_user("ada@example.com");
        let mut bad = input(profile_id);
        bad.education.clear();
        let err = create(&store, &bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(list(&store, profile_id).await.unwrap().is_empty());
        assert_eq!(store.school_count(), 0);
    }

    #[test]
    fn test_snapshot_rows_belong_to_resume_only() {
        let snapshot = build_snapshot(&input(Uuid::new_v4()));
        assert!(snapshot
            .education
            .iter()
            .all(|s| s.profile_id.is_none() && s.resume_id == Some(snapshot.resume.id)));
        assert_eq!(
            snapshot.education.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(snapshot.resume.interests.as_deref(), Some("Climbing"));
    }
}
