//! Student directory operations

use placetrack_protocol::{Branch, CsvUploadReport, PlacementRecord, Student, StudentDraft};

use crate::client::{fetch_list, ApiClient};
use crate::error::Result;
use crate::resource::{contains_ci, Filter, ListController, OneShot, Resource};

impl Resource for Student {
    type Draft = StudentDraft;
    const COLLECTION: &'static str = "/students/";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Client-side filter state for the student list. `None` dimensions mean
/// no constraint (the "ALL" choice).
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub search: String,
    pub branch: Option<Branch>,
    pub year: Option<String>,
    pub placed: Option<bool>,
}

impl Filter<Student> for StudentFilter {
    fn matches(&self, student: &Student) -> bool {
        let matches_search = self.search.is_empty()
            || contains_ci(&student.name, &self.search)
            || contains_ci(&student.enrollment_number, &self.search)
            || contains_ci(&student.email, &self.search);

        let matches_branch = self.branch.map_or(true, |b| student.branch == b);
        let matches_year = self.year.as_deref().map_or(true, |y| student.year == y);
        let matches_placed = self.placed.map_or(true, |p| student.is_placed == p);

        matches_search && matches_branch && matches_year && matches_placed
    }
}

/// Login credentials provisioned alongside a new student record.
#[derive(Debug, Clone)]
pub struct GeneratedCredentials {
    pub username: String,
    pub password: String,
}

/// Default password for a provisioned account: lower-cased first name token
/// plus the last four characters of the enrollment number.
pub fn derive_initial_password(name: &str, enrollment: &str) -> String {
    let first = name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    let chars: Vec<char> = enrollment.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}{}", first, tail)
}

/// Create a student together with their login account.
///
/// The username is the lower-cased enrollment number; the password is the
/// supplied one or the derived default. The credentials come back wrapped
/// one-shot: after the caller shows them once, they are gone — nothing
/// retains them.
pub async fn create_with_account<C: ApiClient>(
    controller: &mut ListController<Student, C>,
    mut draft: StudentDraft,
    password: Option<String>,
) -> Result<(Student, OneShot<GeneratedCredentials>)> {
    let username = draft.enrollment_number.to_lowercase();
    let password = match password {
        Some(p) if !p.is_empty() => p,
        _ => derive_initial_password(&draft.name, &draft.enrollment_number),
    };

    draft.username = Some(username.clone());
    draft.password = Some(password.clone());

    controller.cancel_edit();
    let outcome = controller.submit(&draft).await?;
    let student = outcome.record().clone();

    Ok((
        student,
        OneShot::new(GeneratedCredentials { username, password }),
    ))
}

/// Bulk-import students from a CSV export. Parsing happens server-side;
/// the client only ships the bytes.
pub async fn upload_csv<C: ApiClient>(
    client: &C,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<CsvUploadReport> {
    client
        .upload("/students/upload_csv/", "file", file_name, bytes)
        .await
}

pub async fn placed<C: ApiClient>(client: &C) -> Result<Vec<Student>> {
    fetch_list(client, "/students/placed_students/").await
}

pub async fn unplaced<C: ApiClient>(client: &C) -> Result<Vec<Student>> {
    fetch_list(client, "/students/unplaced_students/").await
}

pub async fn placement_history<C: ApiClient>(
    client: &C,
    student_id: i64,
) -> Result<Vec<PlacementRecord>> {
    fetch_list(
        client,
        &format!("/students/{}/placement_history/", student_id),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::apply_filters;

    fn student(id: i64, name: &str, enrollment: &str, branch: Branch, placed: bool) -> Student {
        Student {
            id,
            enrollment_number: enrollment.to_string(),
            name: name.to_string(),
            email: format!("{}@example.edu", enrollment.to_lowercase()),
            phone: String::new(),
            branch,
            year: "4".to_string(),
            cgpa: 8.0,
            skills: String::new(),
            is_placed: placed,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn derive_password_literal_pairs() {
        assert_eq!(derive_initial_password("Asha Verma", "CS2021042"), "asha1042");
        assert_eq!(derive_initial_password("Rohan Gupta", "IT2020115"), "rohan0115");
        assert_eq!(derive_initial_password("Priya S Nair", "EC2019007"), "priya9007");
        // Single-token names and short enrollments still derive something;
        // the enrollment tail keeps its original case.
        assert_eq!(derive_initial_password("Madonna", "X42"), "madonnaX42");
    }

    #[test]
    fn search_matches_name_enrollment_and_email() {
        let students = vec![
            student(1, "Asha Verma", "CS2021042", Branch::Cse, true),
            student(2, "Rohan Gupta", "IT2020115", Branch::It, false),
        ];

        let by_name = StudentFilter {
            search: "asha".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&students, &by_name).len(), 1);

        let by_enrollment = StudentFilter {
            search: "it2020".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&students, &by_enrollment)[0].id, 2);

        let by_email = StudentFilter {
            search: "cs2021042@example.edu".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&students, &by_email)[0].id, 1);
    }

    #[test]
    fn all_dimensions_unset_is_identity() {
        let students = vec![
            student(3, "C", "CE2021001", Branch::Ce, false),
            student(1, "A", "CS2021002", Branch::Cse, true),
            student(2, "B", "ME2021003", Branch::Me, false),
        ];
        let filter = StudentFilter::default();

        let once: Vec<i64> = apply_filters(&students, &filter).iter().map(|s| s.id).collect();
        assert_eq!(once, vec![3, 1, 2], "original order preserved");

        // Idempotent: filtering the filtered set changes nothing.
        let filtered: Vec<Student> = apply_filters(&students, &filter)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<i64> = apply_filters(&filtered, &filter).iter().map(|s| s.id).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn categorical_filters_exact_match() {
        let students = vec![
            student(1, "A", "CS1", Branch::Cse, true),
            student(2, "B", "IT1", Branch::It, false),
        ];

        let cse_only = StudentFilter {
            branch: Some(Branch::Cse),
            ..Default::default()
        };
        assert_eq!(apply_filters(&students, &cse_only)[0].id, 1);

        let unplaced_only = StudentFilter {
            placed: Some(false),
            ..Default::default()
        };
        assert_eq!(apply_filters(&students, &unplaced_only)[0].id, 2);
    }
}
