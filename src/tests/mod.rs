//! Test support (mocks, fixtures) and cross-module flow tests.

pub mod mocks;
pub mod utils;

mod flows {
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;

    use placetrack_protocol::{Company, PlacementRecord, Student, StudentDraft};

    use super::mocks::MockApiClient;
    use super::utils::test_helpers::{company_json, placement_json, student_json, students_csv};
    use crate::resource::ListController;
    use crate::resources::{progress, students};

    fn student_fixture(id: i64, enrollment: &str, name: &str) -> Student {
        serde_json::from_value(student_json(id, enrollment, name)).unwrap()
    }

    #[tokio::test]
    async fn submit_then_refetch_contains_new_entity() {
        let client = Arc::new(MockApiClient::new());
        client.add_response(
            Method::POST,
            "/students/",
            student_json(7, "CS2021042", "Asha Verma"),
        );
        client.add_response(
            Method::GET,
            "/students/",
            json!([student_json(7, "CS2021042", "Asha Verma")]),
        );

        let mut controller: ListController<Student, _> = ListController::new(client.clone());
        let draft = StudentDraft {
            enrollment_number: "CS2021042".into(),
            name: "Asha Verma".into(),
            email: "asha@example.edu".into(),
            cgpa: 8.9,
            ..Default::default()
        };

        let outcome = controller.submit(&draft).await.unwrap();
        assert_eq!(outcome.record().enrollment_number, "CS2021042");

        // The refetch replaced the cache wholesale and contains the entity.
        assert_eq!(controller.items().len(), 1);
        assert_eq!(controller.items()[0].name, "Asha Verma");

        // Mutation first, then its own refetch.
        let calls = client.calls();
        assert_eq!(calls[0].0, Method::POST);
        assert_eq!(calls[1].0, Method::GET);
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn failed_update_preserves_edit_state_and_list() {
        let client = Arc::new(MockApiClient::new());
        client.add_response(
            Method::GET,
            "/students/",
            json!([student_json(7, "CS2021042", "Asha Verma")]),
        );
        client.fail_on(Method::PUT, "/students/7/");

        let mut controller: ListController<Student, _> = ListController::new(client.clone());
        controller.load().await.unwrap();

        let current = controller.begin_edit(7).unwrap().clone();
        let draft = StudentDraft::from(&current);
        let err = controller.submit(&draft).await.unwrap_err();
        assert!(!err.is_auth_error());

        // Still editing the same record, cache untouched, no refetch issued.
        assert_eq!(controller.editing(), Some(7));
        assert_eq!(controller.items().len(), 1);
        assert_eq!(client.calls_to("/students/").len(), 1);
    }

    #[tokio::test]
    async fn remove_failure_leaves_list_as_is() {
        let client = Arc::new(MockApiClient::new());
        client.add_response(
            Method::GET,
            "/students/",
            json!([student_json(3, "EC2019007", "Priya S Nair")]),
        );
        client.fail_on(Method::DELETE, "/students/3/");

        let mut controller: ListController<Student, _> = ListController::new(client.clone());
        controller.load().await.unwrap();

        assert!(controller.remove(3).await.is_err());
        assert_eq!(controller.items().len(), 1);
    }

    #[tokio::test]
    async fn stale_load_response_is_discarded() {
        let client = Arc::new(MockApiClient::new());
        let mut controller: ListController<Student, _> = ListController::new(client);

        let first = controller.begin_load();
        let second = controller.begin_load();

        // The slower first response resolves after the second was issued
        // and must not overwrite it.
        let stale = vec![student_fixture(1, "CS2021001", "Old Data")];
        assert!(!controller.finish_load(first, stale));
        assert!(controller.items().is_empty());

        let fresh = vec![student_fixture(2, "CS2021002", "New Data")];
        assert!(controller.finish_load(second, fresh));
        assert_eq!(controller.items()[0].id, 2);
    }

    #[tokio::test]
    async fn wrapped_list_shape_normalizes() {
        let client = Arc::new(MockApiClient::new());
        client.add_response(
            Method::GET,
            progress::MY_PROGRESS,
            json!({
                "count": 2,
                "results": [
                    placement_json(1, "Asha Verma", "Nimbus", "APPLIED"),
                    placement_json(2, "Asha Verma", "Vertex", "SELECTED"),
                ]
            }),
        );

        let mut controller: ListController<PlacementRecord, _> = ListController::new(client);
        controller.load_from(progress::MY_PROGRESS).await.unwrap();
        assert_eq!(controller.items().len(), 2);
        assert_eq!(controller.items()[1].company_name.as_deref(), Some("Vertex"));
    }

    #[tokio::test]
    async fn bare_list_shape_normalizes() {
        let client = Arc::new(MockApiClient::new());
        client.add_response(
            Method::GET,
            "/companies/",
            json!([company_json(1, "Nimbus", 12.0), company_json(2, "Sprout", 3.5)]),
        );

        let mut controller: ListController<Company, _> = ListController::new(client);
        controller.load().await.unwrap();
        assert_eq!(controller.items().len(), 2);
        assert_eq!(controller.items()[0].package_offered, 12.0);
        // String decimals from the backend parse too.
        assert_eq!(controller.items()[0].min_cgpa_required, 6.5);
    }

    #[tokio::test]
    async fn provisioning_attaches_username_and_derived_password() {
        let client = Arc::new(MockApiClient::new());
        client.add_response(
            Method::POST,
            "/students/",
            student_json(7, "CS2021042", "Asha Verma"),
        );
        client.add_response(
            Method::GET,
            "/students/",
            json!([student_json(7, "CS2021042", "Asha Verma")]),
        );

        let mut controller: ListController<Student, _> = ListController::new(client.clone());
        let draft = StudentDraft {
            enrollment_number: "CS2021042".into(),
            name: "Asha Verma".into(),
            email: "asha@example.edu".into(),
            cgpa: 8.9,
            ..Default::default()
        };

        let (student, mut credentials) =
            students::create_with_account(&mut controller, draft, None)
                .await
                .unwrap();
        assert_eq!(student.id, 7);

        // The create payload carried the provisioned login.
        let (_, _, payload) = client.calls_to("/students/")[0].clone();
        let payload = payload.unwrap();
        assert_eq!(payload["username"], "cs2021042");
        assert_eq!(payload["password"], "asha1042");

        // Revealed exactly once; gone afterwards.
        let revealed = credentials.consume().unwrap();
        assert_eq!(revealed.username, "cs2021042");
        assert_eq!(revealed.password, "asha1042");
        assert!(credentials.consume().is_none());
    }

    #[tokio::test]
    async fn explicit_password_wins_over_derivation() {
        let client = Arc::new(MockApiClient::new());
        client.add_response(
            Method::POST,
            "/students/",
            student_json(8, "IT2020115", "Rohan Gupta"),
        );
        client.add_response(Method::GET, "/students/", json!([]));

        let mut controller: ListController<Student, _> = ListController::new(client.clone());
        let draft = StudentDraft {
            enrollment_number: "IT2020115".into(),
            name: "Rohan Gupta".into(),
            email: "rohan@example.edu".into(),
            cgpa: 7.4,
            ..Default::default()
        };

        let (_, mut credentials) =
            students::create_with_account(&mut controller, draft, Some("chosen-one".into()))
                .await
                .unwrap();
        assert_eq!(credentials.consume().unwrap().password, "chosen-one");
    }

    #[tokio::test]
    async fn csv_upload_reports_counts() {
        let client = MockApiClient::new();
        client.add_response(
            Method::POST,
            "/students/upload_csv/",
            json!({
                "message": "CSV processed successfully",
                "created": 2,
                "updated": 0,
                "errors": []
            }),
        );

        let report =
            students::upload_csv(&client, "students.csv", students_csv().as_bytes().to_vec())
                .await
                .unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.updated, 0);
        assert!(report.errors.is_empty());
    }
}
