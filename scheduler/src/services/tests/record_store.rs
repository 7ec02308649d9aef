//! Tests for RealRecordStore against a mock row API

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared::{EmployeeDraft, EmployeePatch, ShiftStatus};

use super::common::config_for;
use crate::error::SchedulerError;
use crate::services::record_store::RealRecordStore;
use crate::traits::RecordStore;

async fn store(server: &MockServer) -> RealRecordStore {
    RealRecordStore::new(&config_for(&server.uri())).unwrap()
}

#[tokio::test]
async fn test_list_employees_sends_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Employee"))
        .and(header("apikey", "test-key"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"EmployeeId": 1, "Name": "Amy", "work_percentages": 80, "Availability": "[\"Monday\"]",
             "Skills": "[\"Nurse\"]", "Preferences": null},
            {"EmployeeId": "2", "Name": "Beth", "Skills": ["Doctor"]}
        ])))
        .mount(&server)
        .await;

    let employees = store(&server).await.list_employees().await.unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0].employee_id, "1");
    assert_eq!(employees[1].name, "Beth");
}

#[tokio::test]
async fn test_get_employee_by_surrogate_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Employee"))
        .and(query_param("EmployeeId", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"EmployeeId": 7, "Name": "Carl"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Employee"))
        .and(query_param("EmployeeId", "eq.8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store(&server).await;
    assert_eq!(store.get_employee("7").await.unwrap().name, "Carl");
    assert_matches!(store.get_employee("8").await, Err(SchedulerError::NotFound { id, .. }) if id == "8");
}

#[tokio::test]
async fn test_create_employee_posts_store_columns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Employee"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({"Name": "Dana", "work_percentages": 60, "Skills": "[\"Nurse\"]"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"EmployeeId": 9, "Name": "Dana"}])))
        .expect(1)
        .mount(&server)
        .await;

    let draft = EmployeeDraft {
        name: "Dana".to_string(),
        work_percentage: Some(60),
        availability: shared::Availability::from_text("weekdays"),
        skills: vec!["Nurse".to_string()],
        ..Default::default()
    };
    let created = store(&server).await.create_employee(&draft.validate().unwrap()).await.unwrap();
    assert_eq!(created.employee_id, "9");
}

#[tokio::test]
async fn test_update_and_delete_employee() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/Employee"))
        .and(query_param("EmployeeId", "eq.3"))
        .and(body_partial_json(json!({"work_percentages": 40})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"EmployeeId": 3, "Name": "Eve", "work_percentages": 40}])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/Employee"))
        .and(query_param("EmployeeId", "eq.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"EmployeeId": 3}])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/Employee"))
        .and(query_param("EmployeeId", "eq.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store(&server).await;
    let patch = EmployeePatch::default().work_percentage(40).unwrap();
    assert_eq!(store.update_employee("3", &patch).await.unwrap().work_percentage, Some(40.0));
    store.delete_employee("3").await.unwrap();
    assert_matches!(store.delete_employee("4").await, Err(SchedulerError::NotFound { .. }));
}

#[tokio::test]
async fn test_shift_status_update() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/Shift"))
        .and(query_param("ShiftID", "eq.12"))
        .and(body_partial_json(json!({"ShiftStatus": "In Progress"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "ShiftID": 12, "StartTime": "2024-03-04T08:00:00", "EndTime": "2024-03-04T16:00:00",
            "RequiredSkill": "Nurse", "ShiftStatus": "In Progress", "location": "Ward B"
        }])))
        .mount(&server)
        .await;

    let shift = store(&server).await.update_shift_status("12", ShiftStatus::InProgress).await.unwrap();
    assert_eq!(shift.status, ShiftStatus::InProgress);
    assert_eq!(shift.location, "Ward B");
}

#[tokio::test]
async fn test_store_error_uses_message_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Shift"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "JWT expired", "code": "PGRST301"})),
        )
        .mount(&server)
        .await;

    let result = store(&server).await.list_shifts().await;
    assert_matches!(result, Err(SchedulerError::Store { message }) if message == "JWT expired");
}
