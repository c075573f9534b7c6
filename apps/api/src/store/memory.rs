//! In-memory `ProfileStore` used by procedure and router tests.

use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::forms::contact::{ContactFields, NameFields, ProfileFieldsForm};
use crate::forms::skills::SkillInput;
use crate::models::profile::{ContactRow, ProfileRow, ProfileView, SchoolRow, SkillRow, WorkRow};
use crate::models::resume::{ResumeRow, ResumeSummary, ResumeView};
use crate::models::user::User;
use crate::profile::reconcile::{plan_skills, SkillPlan};
use crate::store::{frozen_row, ProfileStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<ProfileRow>,
    contacts: Vec<ContactRow>,
    schools: Vec<SchoolRow>,
    works: Vec<WorkRow>,
    /// Kept in insertion order.
    skills: Vec<SkillRow>,
    resumes: Vec<ResumeRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user with an empty profile, as signup would.
    pub fn seed_user(&self, email: &str) -> (Uuid, Uuid) {
        let user_id = Uuid::new_v4();
        let profile_id = Uuid::new_v4();
        let mut tables = self.tables.lock().unwrap();
        tables.users.push(User {
            id: user_id,
            email: email.to_string(),
            created_at: Utc::now(),
        });
        tables.profiles.push(ProfileRow {
            id: profile_id,
            user_id,
            first_name: None,
            last_name: None,
            profession: None,
            introduction: None,
            interests: None,
            created_at: Utc::now(),
        });
        (user_id, profile_id)
    }

    /// Inserts skill rows directly, bypassing reconciliation.
    pub fn seed_skills(&self, profile_id: Uuid, categories: &[&str]) -> Vec<Uuid> {
        let mut tables = self.tables.lock().unwrap();
        categories
            .iter()
            .enumerate()
            .map(|(position, category)| {
                let id = Uuid::new_v4();
                tables.skills.push(SkillRow {
                    id,
                    profile_id,
                    category: category.to_string(),
                    all: vec![],
                    position: position as i32,
                });
                id
            })
            .collect()
    }

    pub fn skill_rows(&self, profile_id: Uuid) -> Vec<SkillRow> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .skills
            .iter()
            .filter(|s| s.profile_id == profile_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.position);
        rows
    }

    pub fn school_count(&self) -> usize {
        self.tables.lock().unwrap().schools.len()
    }
}

/// Position of the submitted row whose id already belongs to a snapshot, if any.
fn frozen_collision<T>(
    existing: &[T],
    submitted: &[T],
    id: impl Fn(&T) -> Uuid,
    is_snapshot: impl Fn(&T) -> bool,
    position: impl Fn(&T) -> i32,
) -> Option<i32> {
    submitted
        .iter()
        .find(|row| existing.iter().any(|e| id(e) == id(row) && is_snapshot(e)))
        .map(position)
}

fn upsert_by_id<T: Clone>(rows: &mut Vec<T>, row: &T, id: impl Fn(&T) -> Uuid) {
    match rows.iter().position(|r| id(r) == id(row)) {
        Some(index) => rows[index] = row.clone(),
        None => rows.push(row.clone()),
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn load_profile(&self, user_id: Uuid) -> Result<Option<ProfileView>, AppError> {
        let tables = self.tables.lock().unwrap();
        let Some(profile) = tables.profiles.iter().find(|p| p.user_id == user_id).cloned() else {
            return Ok(None);
        };
        let mut education: Vec<_> = tables
            .schools
            .iter()
            .filter(|s| s.profile_id == Some(profile.id))
            .cloned()
            .collect();
        education.sort_by_key(|s| s.position);
        let mut experience: Vec<_> = tables
            .works
            .iter()
            .filter(|w| w.profile_id == Some(profile.id))
            .cloned()
            .collect();
        experience.sort_by_key(|w| w.position);
        let mut skills: Vec<_> = tables
            .skills
            .iter()
            .filter(|s| s.profile_id == profile.id)
            .cloned()
            .collect();
        skills.sort_by_key(|s| s.position);

        Ok(Some(ProfileView {
            email: tables
                .users
                .iter()
                .find(|u| u.id == profile.user_id)
                .map(|u| u.email.clone()),
            contact: tables.contacts.iter().find(|c| c.profile_id == profile.id).cloned(),
            profile,
            education,
            experience,
            skills,
        }))
    }

    async fn upsert_name_and_contact(
        &self,
        profile_id: Uuid,
        name: &NameFields,
        contact: &ContactFields,
    ) -> Result<ProfileRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| p.id == profile_id)
            .ok_or_else(|| AppError::Internal(anyhow!("Profile not updated")))?;
        profile.first_name = Some(name.first_name.clone());
        profile.last_name = Some(name.last_name.clone());
        profile.profession = Some(name.profession.clone());
        let updated = profile.clone();

        let row = ContactRow {
            id: Uuid::new_v4(),
            profile_id,
            phone: contact.phone.clone(),
            linked_in: contact.linked_in.clone(),
            portfolio: contact.portfolio.clone(),
            location: contact.location.clone(),
        };
        match tables.contacts.iter_mut().find(|c| c.profile_id == profile_id) {
            Some(existing) => *existing = ContactRow { id: existing.id, ..row },
            None => tables.contacts.push(row),
        }
        Ok(updated)
    }

    async fn update_profile_fields(
        &self,
        user_id: Uuid,
        fields: &ProfileFieldsForm,
    ) -> Result<u64, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let mut updated = 0;
        for profile in tables.profiles.iter_mut().filter(|p| p.user_id == user_id) {
            profile.profession = Some(fields.profession.clone());
            profile.introduction = fields.introduction.clone();
            profile.interests = fields.interests.clone();
            updated += 1;
        }
        Ok(updated)
    }

    async fn replace_schools(
        &self,
        profile_id: Option<Uuid>,
        rows: &[SchoolRow],
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(position) = frozen_collision(
            &tables.schools,
            rows,
            |s| s.id,
            |s| s.resume_id.is_some(),
            |s| s.position,
        ) {
            return Err(frozen_row("education", position).into());
        }
        if let Some(profile_id) = profile_id {
            tables.schools.retain(|s| s.profile_id != Some(profile_id));
        }
        for row in rows {
            upsert_by_id(&mut tables.schools, row, |s| s.id);
        }
        Ok(())
    }

    async fn replace_works(
        &self,
        profile_id: Option<Uuid>,
        rows: &[WorkRow],
    ) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(position) = frozen_collision(
            &tables.works,
            rows,
            |w| w.id,
            |w| w.resume_id.is_some(),
            |w| w.position,
        ) {
            return Err(frozen_row("experience", position).into());
        }
        if let Some(profile_id) = profile_id {
            tables.works.retain(|w| w.profile_id != Some(profile_id));
        }
        for row in rows {
            upsert_by_id(&mut tables.works, row, |w| w.id);
        }
        Ok(())
    }

    async fn reconcile_skills(
        &self,
        profile_id: Uuid,
        skills: &[SkillInput],
    ) -> Result<SkillPlan, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let existing: Vec<Uuid> = tables
            .skills
            .iter()
            .filter(|s| s.profile_id == profile_id)
            .map(|s| s.id)
            .collect();
        let plan = plan_skills(&existing, skills.len());

        tables.skills.retain(|s| !plan.delete.contains(&s.id));
        for &index in &plan.insert {
            let skill = &skills[index];
            tables.skills.push(SkillRow {
                id: Uuid::new_v4(),
                profile_id,
                category: skill.category.clone(),
                all: skill.all.clone(),
                position: skill.position,
            });
        }
        for &(id, index) in &plan.update {
            let skill = &skills[index];
            if let Some(row) = tables.skills.iter_mut().find(|s| s.id == id) {
                row.category = skill.category.clone();
                row.all = skill.all.clone();
                row.position = skill.position;
            }
        }
        Ok(plan)
    }

    async fn list_resumes(&self, profile_id: Uuid) -> Result<Vec<ResumeSummary>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut resumes: Vec<_> = tables
            .resumes
            .iter()
            .filter(|r| r.profile_id == profile_id)
            .map(|r| ResumeSummary {
                id: r.id,
                created_at: r.created_at,
            })
            .collect();
        resumes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(resumes)
    }

    async fn load_resume(&self, resume_id: Uuid) -> Result<Option<ResumeView>, AppError> {
        let tables = self.tables.lock().unwrap();
        let Some(resume) = tables.resumes.iter().find(|r| r.id == resume_id).cloned() else {
            return Ok(None);
        };
        let mut education: Vec<_> = tables
            .schools
            .iter()
            .filter(|s| s.resume_id == Some(resume_id))
            .cloned()
            .collect();
        education.sort_by_key(|s| s.position);
        let mut experience: Vec<_> = tables
            .works
            .iter()
            .filter(|w| w.resume_id == Some(resume_id))
            .cloned()
            .collect();
        experience.sort_by_key(|w| w.position);
        Ok(Some(ResumeView {
            resume,
            education,
            experience,
        }))
    }

    async fn insert_resume(&self, snapshot: &ResumeView) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        tables.resumes.push(snapshot.resume.clone());
        tables.works.extend(snapshot.experience.iter().cloned());
        tables.schools.extend(snapshot.education.iter().cloned());
        Ok(())
    }
}
