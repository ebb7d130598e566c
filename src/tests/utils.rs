//! Test utilities and helpers for unit tests
//!
//! Entity JSON fixtures in the backend's wire shapes, shared by the flow
//! tests.

pub mod test_helpers {
    use serde_json::{json, Value};

    /// Student record as the backend serializes it (decimals as strings).
    pub fn student_json(id: i64, enrollment: &str, name: &str) -> Value {
        json!({
            "id": id,
            "enrollment_number": enrollment,
            "name": name,
            "email": format!("{}@example.edu", enrollment.to_lowercase()),
            "phone": "9876500000",
            "branch": "CSE",
            "year": "4",
            "cgpa": "8.25",
            "skills": "rust, sql",
            "is_placed": false,
            "created_at": "2024-01-15T09:30:00Z",
            "updated_at": "2024-01-15T09:30:00Z"
        })
    }

    pub fn company_json(id: i64, name: &str, package: f64) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": "",
            "company_type": "PRODUCT",
            "website": "",
            "package_offered": package,
            "min_cgpa_required": "6.50",
            "eligible_branches": "CSE,IT",
            "job_role": "Software Engineer",
            "job_location": "Pune",
            "contact_person": "HR",
            "contact_email": "hr@example.com",
            "contact_phone": "",
            "is_active": true
        })
    }

    pub fn placement_json(id: i64, student: &str, company: &str, status: &str) -> Value {
        json!({
            "id": id,
            "student": id,
            "company": id,
            "current_stage": null,
            "status": status,
            "application_date": "2024-02-01",
            "notes": "",
            "student_name": student,
            "student_enrollment": format!("CS20210{:02}", id),
            "company_name": company
        })
    }

    /// Small CSV export in the bulk-upload column layout.
    pub fn students_csv() -> &'static str {
        "enrollment_number,name,email,phone,branch,year,cgpa,skills,is_placed\n\
         CS2021042,Asha Verma,asha@example.edu,9876500001,CSE,4,8.9,rust,FALSE\n\
         IT2020115,Rohan Gupta,rohan@example.edu,9876500002,IT,4,7.4,sql,TRUE\n"
    }
}
