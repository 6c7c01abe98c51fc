//! Validation of job input coming from API callers.

use super::models::{JobFields, JobPatch, TEASER_MAX_CHARS};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Job id '{0}' is reserved or cannot be addressed by URL")]
    UnroutableId(String),

    #[error("Malformed request: {0}")]
    Malformed(String),
}

/// Ids taken by fixed routes under the jobs prefix.
pub const RESERVED_JOB_IDS: [&str; 3] = ["excel", "keywords", "scrape"];

impl ValidationError {
    /// Names of the offending fields, empty when the error is not tied to fields.
    pub fn fields(&self) -> Vec<String> {
        match self {
            ValidationError::MissingFields(fields) => {
                fields.iter().map(|f| f.to_string()).collect()
            }
            ValidationError::TooLong { field, .. } => vec![field.to_string()],
            ValidationError::UnroutableId(_) => vec!["id".to_string()],
            ValidationError::Malformed(_) => vec![],
        }
    }
}

/// Job fields as sent by API callers. Every field is optional at this stage,
/// presence is checked by [`JobInput::into_fields`] and [`JobInput::into_patch`].
///
/// Unknown fields, including `listingDate`, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    pub id: Option<String>,
    pub title: Option<String>,
    pub teaser: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub role: Option<String>,
    pub salary: Option<String>,
    pub keyword: Option<String>,
    pub bullet_points: Option<Vec<String>>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_teaser(teaser: &str) -> Result<(), ValidationError> {
    let actual = teaser.chars().count();
    if actual > TEASER_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field: "teaser",
            max: TEASER_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

impl JobInput {
    /// The trimmed caller-supplied id, None when missing or blank.
    pub fn job_id(&self) -> Result<Option<String>, ValidationError> {
        let id = match self.id.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(id) => id,
        };
        if RESERVED_JOB_IDS.contains(&id) || id.contains('/') {
            return Err(ValidationError::UnroutableId(id.to_string()));
        }
        Ok(Some(id.to_string()))
    }

    /// Requires every field, as for creation and full updates.
    pub fn into_fields(self) -> Result<JobFields, ValidationError> {
        let title = non_blank(self.title);
        let teaser = non_blank(self.teaser);
        let company_name = non_blank(self.company_name);
        let location = non_blank(self.location);
        let work_type = non_blank(self.work_type);
        let role = non_blank(self.role);
        let salary = non_blank(self.salary);
        let keyword = non_blank(self.keyword);

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if teaser.is_none() {
            missing.push("teaser");
        }
        if company_name.is_none() {
            missing.push("companyName");
        }
        if location.is_none() {
            missing.push("location");
        }
        if work_type.is_none() {
            missing.push("workType");
        }
        if role.is_none() {
            missing.push("role");
        }
        if salary.is_none() {
            missing.push("salary");
        }
        if keyword.is_none() {
            missing.push("keyword");
        }
        if self.bullet_points.is_none() {
            missing.push("bulletPoints");
        }

        match (
            title,
            teaser,
            company_name,
            location,
            work_type,
            role,
            salary,
            keyword,
            self.bullet_points,
        ) {
            (
                Some(title),
                Some(teaser),
                Some(company_name),
                Some(location),
                Some(work_type),
                Some(role),
                Some(salary),
                Some(keyword),
                Some(bullet_points),
            ) => {
                check_teaser(&teaser)?;
                Ok(JobFields {
                    title,
                    teaser,
                    company_name,
                    location,
                    work_type,
                    role,
                    salary,
                    keyword,
                    bullet_points,
                })
            }
            _ => Err(ValidationError::MissingFields(missing)),
        }
    }

    /// Validates only the supplied fields, as for partial updates.
    pub fn into_patch(self) -> Result<JobPatch, ValidationError> {
        let mut blank = Vec::new();
        let mut keep = |name: &'static str, value: Option<String>| match value {
            Some(v) if v.trim().is_empty() => {
                blank.push(name);
                None
            }
            other => other,
        };

        let patch = JobPatch {
            title: keep("title", self.title),
            teaser: keep("teaser", self.teaser),
            company_name: keep("companyName", self.company_name),
            location: keep("location", self.location),
            work_type: keep("workType", self.work_type),
            role: keep("role", self.role),
            salary: keep("salary", self.salary),
            keyword: keep("keyword", self.keyword),
            bullet_points: self.bullet_points,
        };

        if !blank.is_empty() {
            return Err(ValidationError::MissingFields(blank));
        }
        if let Some(teaser) = &patch.teaser {
            check_teaser(teaser)?;
        }
        Ok(patch)
    }
}
