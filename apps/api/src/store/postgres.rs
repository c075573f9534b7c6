use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::forms::contact::{ContactFields, NameFields, ProfileFieldsForm};
use crate::forms::skills::SkillInput;
use crate::models::profile::{ContactRow, ProfileRow, ProfileView, SchoolRow, SkillRow, WorkRow};
use crate::models::resume::{ResumeRow, ResumeSummary, ResumeView};
use crate::models::user::User;
use crate::profile::reconcile::{plan_skills, SkillPlan};
use crate::store::{frozen_row, ProfileStore};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn load_profile(&self, user_id: Uuid) -> Result<Option<ProfileView>, AppError> {
        let Some(profile) =
            sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(profile.user_id)
            .fetch_optional(&self.pool)
            .await?;

        let contact = sqlx::query_as::<_, ContactRow>("SELECT * FROM contacts WHERE profile_id = $1")
            .bind(profile.id)
            .fetch_optional(&self.pool)
            .await?;

        let education = sqlx::query_as::<_, SchoolRow>(
            "SELECT * FROM schools WHERE profile_id = $1 ORDER BY position, id",
        )
        .bind(profile.id)
        .fetch_all(&self.pool)
        .await?;

        let experience = sqlx::query_as::<_, WorkRow>(
            "SELECT * FROM works WHERE profile_id = $1 ORDER BY position, id",
        )
        .bind(profile.id)
        .fetch_all(&self.pool)
        .await?;

        let skills = sqlx::query_as::<_, SkillRow>(
            r#"SELECT id, profile_id, category, "all", position FROM skills
               WHERE profile_id = $1 ORDER BY position ASC"#,
        )
        .bind(profile.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ProfileView {
            profile,
            email: user.map(|u| u.email),
            contact,
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
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles SET first_name = $1, last_name = $2, profession = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&name.first_name)
        .bind(&name.last_name)
        .bind(&name.profession)
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow!("Profile not updated")))?;

        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM contacts WHERE profile_id = $1")
                .bind(profile_id)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_some() {
            let result = sqlx::query(
                r#"
                UPDATE contacts SET phone = $1, linked_in = $2, portfolio = $3, location = $4
                WHERE profile_id = $5
                "#,
            )
            .bind(&contact.phone)
            .bind(&contact.linked_in)
            .bind(&contact.portfolio)
            .bind(&contact.location)
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(AppError::Internal(anyhow!("Contact not updated")));
            }
        } else {
            let result = sqlx::query(
                r#"
                INSERT INTO contacts (id, profile_id, phone, linked_in, portfolio, location)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(profile_id)
            .bind(&contact.phone)
            .bind(&contact.linked_in)
            .bind(&contact.portfolio)
            .bind(&contact.location)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(AppError::Internal(anyhow!("Contact not created")));
            }
        }

        tx.commit().await?;
        info!("Updated name and contact for profile {profile_id}");
        Ok(updated)
    }

    async fn update_profile_fields(
        &self,
        user_id: Uuid,
        fields: &ProfileFieldsForm,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET profession = $1, introduction = $2, interests = $3
            WHERE user_id = $4
            "#,
        )
        .bind(&fields.profession)
        .bind(&fields.introduction)
        .bind(&fields.interests)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn replace_schools(
        &self,
        profile_id: Option<Uuid>,
        rows: &[SchoolRow],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if let Some(profile_id) = profile_id {
            let deleted = sqlx::query("DELETE FROM schools WHERE profile_id = $1")
                .bind(profile_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            debug!("Deleted {deleted} schools for profile {profile_id}");
        }

        for row in rows {
            if !upsert_school(&mut tx, row).await? {
                return Err(frozen_row("education", row.position).into());
            }
        }

        tx.commit().await?;
        info!("Wrote {} school rows", rows.len());
        Ok(())
    }

    async fn replace_works(
        &self,
        profile_id: Option<Uuid>,
        rows: &[WorkRow],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if let Some(profile_id) = profile_id {
            let deleted = sqlx::query("DELETE FROM works WHERE profile_id = $1")
                .bind(profile_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            debug!("Deleted {deleted} works for profile {profile_id}");
        }

        for row in rows {
            if !upsert_work(&mut tx, row).await? {
                return Err(frozen_row("experience", row.position).into());
            }
        }

        tx.commit().await?;
        info!("Wrote {} work rows", rows.len());
        Ok(())
    }

    async fn reconcile_skills(
        &self,
        profile_id: Uuid,
        skills: &[SkillInput],
    ) -> Result<SkillPlan, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM skills WHERE profile_id = $1 ORDER BY seq FOR UPDATE",
        )
        .bind(profile_id)
        .fetch_all(&mut *tx)
        .await?;

        let plan = plan_skills(&existing, skills.len());

        for id in &plan.delete {
            sqlx::query("DELETE FROM skills WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        for &index in &plan.insert {
            let skill = &skills[index];
            sqlx::query(
                r#"INSERT INTO skills (id, profile_id, category, "all", position)
                   VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(Uuid::new_v4())
            .bind(profile_id)
            .bind(&skill.category)
            .bind(skill.all.as_slice())
            .bind(skill.position)
            .execute(&mut *tx)
            .await?;
        }

        for &(id, index) in &plan.update {
            let skill = &skills[index];
            sqlx::query(r#"UPDATE skills SET category = $1, "all" = $2, position = $3 WHERE id = $4"#)
                .bind(&skill.category)
                .bind(skill.all.as_slice())
                .bind(skill.position)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(
            "Reconciled skills for profile {profile_id}: {} deleted, {} inserted, {} updated",
            plan.delete.len(),
            plan.insert.len(),
            plan.update.len()
        );
        Ok(plan)
    }

    async fn list_resumes(&self, profile_id: Uuid) -> Result<Vec<ResumeSummary>, AppError> {
        Ok(sqlx::query_as::<_, ResumeSummary>(
            "SELECT id, created_at FROM resumes WHERE profile_id = $1 ORDER BY created_at DESC",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn load_resume(&self, resume_id: Uuid) -> Result<Option<ResumeView>, AppError> {
        let Some(resume) = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(resume_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let education = sqlx::query_as::<_, SchoolRow>(
            "SELECT * FROM schools WHERE resume_id = $1 ORDER BY position, id",
        )
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?;

        let experience = sqlx::query_as::<_, WorkRow>(
            "SELECT * FROM works WHERE resume_id = $1 ORDER BY position, id",
        )
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ResumeView {
            resume,
            education,
            experience,
        }))
    }

    async fn insert_resume(&self, snapshot: &ResumeView) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let resume = &snapshot.resume;

        sqlx::query(
            r#"
            INSERT INTO resumes (id, profile_id, profession, interests, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(resume.id)
        .bind(resume.profile_id)
        .bind(&resume.profession)
        .bind(&resume.interests)
        .bind(resume.created_at)
        .execute(&mut *tx)
        .await?;

        for row in &snapshot.experience {
            if !upsert_work(&mut tx, row).await? {
                return Err(AppError::Internal(anyhow!("Snapshot work {} not written", row.id)));
            }
        }
        for row in &snapshot.education {
            if !upsert_school(&mut tx, row).await? {
                return Err(AppError::Internal(anyhow!("Snapshot school {} not written", row.id)));
            }
        }

        tx.commit().await?;
        info!(
            "Created resume {} for profile {} ({} schools, {} works)",
            resume.id,
            resume.profile_id,
            snapshot.education.len(),
            snapshot.experience.len()
        );
        Ok(())
    }
}

/// Inserts a school row; on id collision a profile-owned row is overwritten
/// field by field. Returns false when the id belongs to a resume snapshot.
async fn upsert_school(conn: &mut PgConnection, row: &SchoolRow) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO schools
            (id, profile_id, resume_id, name, degree, start_date, end_date,
             description, gpa, location, position)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id) DO UPDATE SET
            profile_id = EXCLUDED.profile_id,
            name = EXCLUDED.name,
            degree = EXCLUDED.degree,
            start_date = EXCLUDED.start_date,
            end_date = EXCLUDED.end_date,
            description = EXCLUDED.description,
            gpa = EXCLUDED.gpa,
            location = EXCLUDED.location,
            position = EXCLUDED.position
        WHERE schools.resume_id IS NULL
        "#,
    )
    .bind(row.id)
    .bind(row.profile_id)
    .bind(row.resume_id)
    .bind(&row.name)
    .bind(&row.degree)
    .bind(&row.start_date)
    .bind(&row.end_date)
    .bind(&row.description)
    .bind(&row.gpa)
    .bind(&row.location)
    .bind(row.position)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

async fn upsert_work(conn: &mut PgConnection, row: &WorkRow) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO works
            (id, profile_id, resume_id, name, title, start_date, end_date, description, position)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            profile_id = EXCLUDED.profile_id,
            name = EXCLUDED.name,
            title = EXCLUDED.title,
            start_date = EXCLUDED.start_date,
            end_date = EXCLUDED.end_date,
            description = EXCLUDED.description,
            position = EXCLUDED.position
        WHERE works.resume_id IS NULL
        "#,
    )
    .bind(row.id)
    .bind(row.profile_id)
    .bind(row.resume_id)
    .bind(&row.name)
    .bind(&row.title)
    .bind(&row.start_date)
    .bind(&row.end_date)
    .bind(&row.description)
    .bind(row.position)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
