//! Placement API DTOs
//!
//! Entity records and mutation payloads for the placement endpoints. Records
//! are what the backend returns; the `*Draft` types are the editable staging
//! payloads sent on create/update. Decimal fields arrive either as JSON
//! numbers or as decimal strings depending on backend settings, so they
//! deserialize through a tolerant helper.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub use crate::common::{
    Branch, CompanyType, EventType, PlacementStatus, StageResult, StageType,
};

fn de_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// Students
// ============================================================================

/// Student record for GET /students/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub enrollment_number: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub branch: Branch,
    #[serde(default)]
    pub year: String,
    #[serde(deserialize_with = "de_decimal")]
    pub cgpa: f64,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub is_placed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Student create/update payload.
///
/// `username`/`password` are only present on create, when the backend
/// provisions a login account alongside the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StudentDraft {
    #[validate(length(min = 1, max = 20))]
    pub enrollment_number: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 15))]
    pub phone: String,
    pub branch: Option<Branch>,
    pub year: String,
    #[validate(range(min = 0.0, max = 10.0))]
    pub cgpa: f64,
    pub skills: String,
    pub is_placed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            enrollment_number: student.enrollment_number.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            phone: student.phone.clone(),
            branch: Some(student.branch),
            year: student.year.clone(),
            cgpa: student.cgpa,
            skills: student.skills.clone(),
            is_placed: student.is_placed,
            username: None,
            password: None,
        }
    }
}

/// Result summary of POST /students/upload_csv/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvUploadReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created: u32,
    #[serde(default)]
    pub updated: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

// ============================================================================
// Companies
// ============================================================================

/// Company record for GET /companies/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub company_type: CompanyType,
    #[serde(default)]
    pub website: String,
    #[serde(deserialize_with = "de_decimal")]
    pub package_offered: f64,
    #[serde(default, deserialize_with = "de_decimal")]
    pub min_cgpa_required: f64,
    #[serde(default)]
    pub eligible_branches: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub job_location: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Company create/update payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CompanyDraft {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: String,
    pub company_type: Option<CompanyType>,
    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[validate(range(min = 0.0))]
    pub package_offered: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub min_cgpa_required: f64,
    pub eligible_branches: String,
    #[validate(length(min = 1, max = 200))]
    pub job_role: String,
    pub job_location: String,
    pub contact_person: String,
    #[validate(email)]
    pub contact_email: String,
    pub contact_phone: String,
    pub is_active: bool,
}

impl From<&Company> for CompanyDraft {
    fn from(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            description: company.description.clone(),
            company_type: Some(company.company_type),
            website: (!company.website.is_empty()).then(|| company.website.clone()),
            package_offered: company.package_offered,
            min_cgpa_required: company.min_cgpa_required,
            eligible_branches: company.eligible_branches.clone(),
            job_role: company.job_role.clone(),
            job_location: company.job_location.clone(),
            contact_person: company.contact_person.clone(),
            contact_email: company.contact_email.clone(),
            contact_phone: company.contact_phone.clone(),
            is_active: company.is_active,
        }
    }
}

// ============================================================================
// Placement stages
// ============================================================================

/// Catalogue entry of the selection process, ordered by `sequence_order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementStage {
    pub id: i64,
    pub name: String,
    pub stage_type: StageType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sequence_order: i32,
}

// ============================================================================
// Placement progress
// ============================================================================

/// One student/company application with its current status.
///
/// The backend serializer joins in a few read-only display fields
/// (`student_name`, `company_name`, ...) used by list views and search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub id: i64,
    pub student: i64,
    pub company: i64,
    #[serde(default)]
    pub current_stage: Option<i64>,
    pub status: PlacementStatus,
    #[serde(default)]
    pub application_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_enrollment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Placement record create/update payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlacementDraft {
    #[validate(range(min = 1))]
    pub student: i64,
    #[validate(range(min = 1))]
    pub company: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<i64>,
    pub status: Option<PlacementStatus>,
    pub notes: String,
}

impl From<&PlacementRecord> for PlacementDraft {
    fn from(record: &PlacementRecord) -> Self {
        Self {
            student: record.student,
            company: record.company,
            current_stage: record.current_stage,
            status: Some(record.status),
            notes: record.notes.clone(),
        }
    }
}

/// Per-stage outcome for one application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageProgress {
    pub id: i64,
    pub placement_progress: i64,
    pub stage: i64,
    pub result: StageResult,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub feedback: String,
}

/// Stage progress create/update payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageProgressDraft {
    pub placement_progress: i64,
    pub stage: i64,
    pub result: Option<StageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    pub feedback: String,
}

// ============================================================================
// Important dates
// ============================================================================

/// Calendar event for GET /important-dates/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportantDate {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_type: EventType,
    #[serde(default)]
    pub company: Option<i64>,
    pub event_date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Important date create/update payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ImportantDateDraft {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: String,
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<i64>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: String,
    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub is_active: bool,
}

impl From<&ImportantDate> for ImportantDateDraft {
    fn from(event: &ImportantDate) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            event_type: Some(event.event_type),
            company: event.company,
            event_date: Some(event.event_date),
            location: event.location.clone(),
            link: (!event.link.is_empty()).then(|| event.link.clone()),
            is_active: event.is_active,
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Count of applications per status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: PlacementStatus,
    pub count: u32,
}

/// Count of placed students per branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCount {
    pub branch: Branch,
    pub count: u32,
}

/// Aggregate payload of GET /placement-progress/statistics/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementStatistics {
    #[serde(default)]
    pub total_students: u32,
    #[serde(default)]
    pub placed_students: u32,
    #[serde(default)]
    pub placement_percentage: f64,
    #[serde(default)]
    pub total_companies: u32,
    #[serde(default)]
    pub total_applications: u32,
    #[serde(default)]
    pub offers_received: u32,
    #[serde(default)]
    pub offers_accepted: u32,
    #[serde(default)]
    pub average_package: f64,
    #[serde(default)]
    pub status_breakdown: Vec<StatusCount>,
    #[serde(default)]
    pub branch_wise_placement: Vec<BranchCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_fields_accept_strings_and_numbers() {
        let as_string = serde_json::json!({
            "id": 1, "name": "Nimbus Labs", "company_type": "PRODUCT",
            "package_offered": "12.50", "min_cgpa_required": "7.00",
            "job_role": "SDE", "is_active": true
        });
        let company: Company = serde_json::from_value(as_string).unwrap();
        assert_eq!(company.package_offered, 12.5);
        assert_eq!(company.min_cgpa_required, 7.0);

        let as_number = serde_json::json!({
            "id": 2, "name": "Vertex", "company_type": "MNC",
            "package_offered": 6.75, "min_cgpa_required": 6.0,
            "job_role": "Analyst", "is_active": true
        });
        let company: Company = serde_json::from_value(as_number).unwrap();
        assert_eq!(company.package_offered, 6.75);
    }

    #[test]
    fn draft_skips_absent_credentials() {
        let draft = StudentDraft {
            enrollment_number: "CS2021001".into(),
            name: "Test Student".into(),
            cgpa: 8.0,
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("username").is_none());
        assert!(value.get("password").is_none());
    }
}
