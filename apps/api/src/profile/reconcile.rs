//! Reconciliation: brings a profile's child rows in line with a submitted list.
//!
//! Education and work are replaced wholesale: the rows built here are written
//! after every existing row under the profile has been deleted. Skills are
//! paired with existing rows by index, so a skill row's identity is its
//! position in the list, not its category.

use uuid::Uuid;

use crate::forms::education::SchoolInput;
use crate::forms::experience::WorkInput;
use crate::forms::FieldErrors;
use crate::models::profile::{SchoolRow, WorkRow};

/// Row operations needed to turn the existing skill rows into the submitted list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillPlan {
    /// Existing rows beyond the submitted count.
    pub delete: Vec<Uuid>,
    /// Submitted indices that get a fresh row.
    pub insert: Vec<usize>,
    /// Existing row id overwritten with the submitted entry at that index.
    pub update: Vec<(Uuid, usize)>,
}

/// Pairs `existing` (in insertion order) with `submitted` entries by index.
///
/// - more existing than submitted: delete the tail, overwrite the rest
/// - fewer existing than submitted: insert the extra entries, overwrite all existing
/// - equal: overwrite all
pub fn plan_skills(existing: &[Uuid], submitted: usize) -> SkillPlan {
    let kept = existing.len().min(submitted);
    SkillPlan {
        delete: existing[kept..].to_vec(),
        insert: (kept..submitted).collect(),
        update: existing[..kept]
            .iter()
            .copied()
            .enumerate()
            .map(|(index, id)| (id, index))
            .collect(),
    }
}

/// Builds the school rows to write, keeping caller ids and ordering by submission.
///
/// Every row needs an owner: the top-level profile id wins, otherwise the
/// entry's own `profileId`.
pub fn school_rows(
    profile_id: Option<Uuid>,
    entries: &[SchoolInput],
) -> Result<Vec<SchoolRow>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut rows = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let Some(owner) = profile_id.or(entry.profile_id) else {
            errors.add(format!("education[{index}].profileId"), "Profile ID is required");
            continue;
        };
        rows.push(SchoolRow {
            id: entry.id.unwrap_or_else(Uuid::new_v4),
            profile_id: Some(owner),
            resume_id: None,
            name: entry.name.clone(),
            degree: entry.degree.clone(),
            start_date: entry.start_date.clone(),
            end_date: entry.end_date.clone(),
            description: entry.description.clone(),
            gpa: entry.gpa.clone(),
            location: entry.location.clone(),
            position: index as i32,
        });
    }

    errors.into_result().map(|()| rows)
}

/// Work counterpart of [`school_rows`].
pub fn work_rows(
    profile_id: Option<Uuid>,
    entries: &[WorkInput],
) -> Result<Vec<WorkRow>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut rows = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let Some(owner) = profile_id.or(entry.profile_id) else {
            errors.add(format!("experience[{index}].profileId"), "Profile ID is required");
            continue;
        };
        rows.push(WorkRow {
            id: entry.id.unwrap_or_else(Uuid::new_v4),
            profile_id: Some(owner),
            resume_id: None,
            name: entry.name.clone(),
            title: entry.title.clone(),
            start_date: entry.start_date.clone(),
            end_date: entry.end_date.clone(),
            description: entry.description.clone(),
            position: index as i32,
        });
    }

    errors.into_result().map(|()| rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn school(id: Option<Uuid>, profile_id: Option<Uuid>) -> SchoolInput {
        SchoolInput {
            id,
            profile_id,
            name: "State University".into(),
            degree: "Bachelor of Arts".into(),
            start_date: "2010".into(),
            end_date: "2014".into(),
            description: None,
            gpa: Some("3.8".into()),
            location: None,
        }
    }

    #[test]
    fn test_plan_shrinks_by_deleting_tail() {
        let existing = ids(3);
        let plan = plan_skills(&existing, 2);
        assert_eq!(plan.delete, vec![existing[2]]);
        assert!(plan.insert.is_empty());
        assert_eq!(plan.update, vec![(existing[0], 0), (existing[1], 1)]);
    }

    #[test]
    fn test_plan_grows_by_inserting_extra() {
        let existing = ids(1);
        let plan = plan_skills(&existing, 3);
        assert!(plan.delete.is_empty());
        assert_eq!(plan.insert, vec![1, 2]);
        assert_eq!(plan.update, vec![(existing[0], 0)]);
    }

    #[test]
    fn test_plan_equal_overwrites_all() {
        let existing = ids(2);
        let plan = plan_skills(&existing, 2);
        assert!(plan.delete.is_empty());
        assert!(plan.insert.is_empty());
        assert_eq!(plan.update.len(), 2);
    }

    #[test]
    fn test_plan_from_empty() {
        let plan = plan_skills(&[], 2);
        assert_eq!(plan.insert, vec![0, 1]);
        assert!(plan.update.is_empty());
    }

    #[test]
    fn test_school_rows_keep_ids_and_order() {
        let profile = Uuid::new_v4();
        let kept = Uuid::new_v4();
        let rows = school_rows(Some(profile), &[school(Some(kept), None), school(None, None)]).unwrap();
        assert_eq!(rows[0].id, kept);
        assert_ne!(rows[1].id, kept);
        assert_eq!(rows.iter().map(|r| r.position).collect::<Vec<_>>(), vec![0, 1]);
        assert!(rows.iter().all(|r| r.profile_id == Some(profile) && r.resume_id.is_none()));
    }

    #[test]
    fn test_school_rows_fall_back_to_entry_owner() {
        let owner = Uuid::new_v4();
        let rows = school_rows(None, &[school(None, Some(owner))]).unwrap();
        assert_eq!(rows[0].profile_id, Some(owner));
    }

    #[test]
    fn test_rows_without_owner_are_rejected() {
        let errors = school_rows(None, &[school(None, Some(Uuid::new_v4())), school(None, None)])
            .unwrap_err();
        assert_eq!(
            errors.paths().collect::<Vec<_>>(),
            vec!["education[1].profileId"]
        );

        let work = WorkInput {
            id: None,
            profile_id: None,
            name: "Acme".into(),
            title: "Engineer".into(),
            start_date: "2020".into(),
            end_date: "2021".into(),
            description: "One. Two. Three.".into(),
        };
        assert!(work_rows(None, &[work]).unwrap_err().contains("experience[0].profileId"));
    }
}
