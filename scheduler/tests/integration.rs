//! End-to-end tests for the solve-and-poll flow against a mock solver

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scheduler::{EmployeeFilter, ReconciliationWarning, SchedulerError};

mod common;
use common::{TestFixtures, TestHelpers};

async fn status_checks(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.method.to_string() == "GET")
        .count()
}

#[tokio::test]
async fn test_generate_schedule_end_to_end() {
    let server = MockServer::start().await;
    TestHelpers::mount_submit(&server, TestFixtures::JOB_ID).await;
    TestHelpers::mount_status_times(&server, TestFixtures::JOB_ID, TestFixtures::active(), 2).await;
    TestHelpers::mount_status(&server, TestFixtures::JOB_ID, TestFixtures::finished_with_one_assignment()).await;

    let scheduler = TestHelpers::scheduler_for(&server, 30);
    let report = scheduler
        .generate_schedule(&TestFixtures::employees(), &TestFixtures::shifts())
        .await
        .unwrap();

    assert_eq!(report.job_id.as_str(), "abc123");
    assert_eq!(report.attempts, 3);
    assert_eq!(report.feasible, Some(true));
    assert_eq!(report.merged.inserted, 1);
    assert_eq!(
        report.skipped,
        vec![ReconciliationWarning::MissingEmployee { shift_id: "s2".to_string() }]
    );

    let calendar = scheduler.calendar();
    let calendar = calendar.read().await;
    assert_eq!(calendar.len(), 1);

    let item = calendar.get("s1").unwrap();
    assert_eq!(item.title, "Morning Shift");
    assert_eq!(item.color, "blue");
    assert_eq!(item.employees, vec!["Amy Cole"]);
    assert_eq!(item.date, TestFixtures::day());
    assert_eq!(item.start_time, "06:00");
    assert_eq!(item.end_time, "11:00");

    let amy = calendar.items_for_day(TestFixtures::day(), &EmployeeFilter::Employee("Amy Cole".to_string()));
    assert_eq!(amy.len(), 1);
}

#[tokio::test]
async fn test_submitted_payload_carries_normalized_records() {
    let server = MockServer::start().await;
    TestHelpers::mount_submit(&server, TestFixtures::JOB_ID).await;
    TestHelpers::mount_status(&server, TestFixtures::JOB_ID, TestFixtures::finished_with_one_assignment()).await;

    let scheduler = TestHelpers::scheduler_for(&server, 5);
    scheduler
        .generate_schedule(&TestFixtures::employees(), &TestFixtures::shifts())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let submit = requests.iter().find(|request| request.method.to_string() == "POST").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&submit.body).unwrap();

    assert_eq!(body["employees"][0]["name"], "Amy Cole");
    assert_eq!(body["employees"][0]["skills"], json!(["Doctor"]));
    assert_eq!(body["employees"][0]["shiftPreferences"], json!(["Morning Shift"]));
    assert_eq!(body["employees"][1]["workPercentage"], 50);
    assert_eq!(body["shifts"][1]["id"], "s2");
    assert_eq!(body["shifts"][0]["start"], "2024-03-04T06:00:00");
    assert_eq!(body["shifts"][0]["requiredSkill"], "Doctor");
}

#[tokio::test]
async fn test_always_active_job_times_out_after_max_attempts() {
    let server = MockServer::start().await;
    TestHelpers::mount_submit(&server, TestFixtures::JOB_ID).await;
    TestHelpers::mount_status(&server, TestFixtures::JOB_ID, TestFixtures::active()).await;

    let scheduler = TestHelpers::scheduler_for(&server, 4);
    let result = scheduler
        .generate_schedule(&TestFixtures::employees(), &TestFixtures::shifts())
        .await;

    assert_matches!(result, Err(SchedulerError::Timeout { attempts: 4, .. }));
    assert_eq!(status_checks(&server).await, 4);
    assert!(scheduler.calendar().read().await.is_empty());
}

#[tokio::test]
async fn test_empty_job_id_never_starts_polling() {
    let server = MockServer::start().await;
    TestHelpers::mount_submit(&server, "  \n").await;

    let scheduler = TestHelpers::scheduler_for(&server, 4);
    let result = scheduler
        .generate_schedule(&TestFixtures::employees(), &TestFixtures::shifts())
        .await;

    assert_matches!(result, Err(SchedulerError::Submission { .. }));
    assert_eq!(status_checks(&server).await, 0);
}

#[tokio::test]
async fn test_status_failure_stops_polling_immediately() {
    let server = MockServer::start().await;
    TestHelpers::mount_submit(&server, TestFixtures::JOB_ID).await;
    TestHelpers::mount_status_times(&server, TestFixtures::JOB_ID, TestFixtures::active(), 1).await;
    Mock::given(method("GET"))
        .and(path("/schedules/abc123"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "solver restarting"})))
        .mount(&server)
        .await;

    let scheduler = TestHelpers::scheduler_for(&server, 30);
    let result = scheduler
        .generate_schedule(&TestFixtures::employees(), &TestFixtures::shifts())
        .await;

    assert_matches!(result, Err(SchedulerError::Poll { message, .. }) if message == "solver restarting");
    assert_eq!(status_checks(&server).await, 2);
}

#[tokio::test]
async fn test_legacy_result_is_merged_idempotently() {
    let legacy = json!({
        "solverStatus": "NOT_SOLVING",
        "score": "0hard/-1soft",
        "assignments": [
            {"shiftId": "s1", "employeeName": "Amy Cole"},
            {"shiftId": "s2", "employeeName": "Beth Diaz"},
            {"shiftId": "s404", "employeeName": "Beth Diaz"}
        ],
        "employees": [{"name": "Amy Cole"}, {"name": "Beth Diaz"}]
    });

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TestFixtures::JOB_ID))
        .mount(&server)
        .await;
    TestHelpers::mount_status(&server, TestFixtures::JOB_ID, legacy).await;

    let scheduler = TestHelpers::scheduler_for(&server, 5);
    let first = scheduler
        .generate_schedule(&TestFixtures::employees(), &TestFixtures::shifts())
        .await
        .unwrap();
    let snapshot = scheduler.calendar().read().await.clone();

    let second = scheduler
        .generate_schedule(&TestFixtures::employees(), &TestFixtures::shifts())
        .await
        .unwrap();

    assert_eq!(first.merged.inserted, 2);
    assert_eq!(second.merged.inserted, 0);
    assert_eq!(second.merged.replaced, 2);
    assert_eq!(*scheduler.calendar().read().await, snapshot);
    assert!(snapshot.get("s404").is_none());
    assert_eq!(snapshot.get("s2").unwrap().title, "Afternoon Shift");
}

#[tokio::test]
async fn test_feasible_snapshot_is_merged_before_the_job_finishes() {
    let snapshot = json!({
        "solverStatus": "SOLVING_ACTIVE",
        "score": {"feasible": true, "hardScore": 0, "softScore": -9},
        "shifts": [
            {"id": "s1", "start": "2024-03-04T06:00:00", "end": "2024-03-04T11:00:00",
             "employee": {"name": "Beth Diaz"}},
            {"id": "s2", "start": "2024-03-04T13:00:00", "end": "2024-03-04T17:00:00", "employee": null}
        ]
    });
    let mut finished = TestFixtures::finished_with_one_assignment();
    finished["shifts"][1]["employee"] = json!({"name": "Beth Diaz"});

    let server = MockServer::start().await;
    TestHelpers::mount_submit(&server, TestFixtures::JOB_ID).await;
    TestHelpers::mount_status_times(&server, TestFixtures::JOB_ID, snapshot, 1).await;
    TestHelpers::mount_status(&server, TestFixtures::JOB_ID, finished).await;

    let scheduler = TestHelpers::scheduler_for(&server, 10);
    let report = scheduler
        .generate_schedule(&TestFixtures::employees(), &TestFixtures::shifts())
        .await
        .unwrap();

    assert_eq!(report.attempts, 2);
    assert_eq!(report.merged.inserted, 2);
    assert_eq!(report.merged.replaced, 1);
    assert!(report.skipped.is_empty());

    let calendar = scheduler.calendar();
    let calendar = calendar.read().await;
    assert_eq!(calendar.len(), 2);
    assert_eq!(calendar.get("s1").unwrap().employees, vec!["Amy Cole"]);
    assert_eq!(calendar.get("s2").unwrap().employees, vec!["Beth Diaz"]);
}

#[tokio::test]
async fn test_malformed_record_is_skipped_without_failing_the_job() {
    let mut finished = TestFixtures::finished_with_one_assignment();
    finished["shifts"][1]["start"] = json!("garbage");
    finished["shifts"][1]["employee"] = json!({"name": "Beth Diaz"});

    let server = MockServer::start().await;
    TestHelpers::mount_submit(&server, TestFixtures::JOB_ID).await;
    TestHelpers::mount_status(&server, TestFixtures::JOB_ID, finished).await;

    let scheduler = TestHelpers::scheduler_for(&server, 5);
    let report = scheduler
        .generate_schedule(&TestFixtures::employees(), &TestFixtures::shifts())
        .await
        .unwrap();

    assert_eq!(report.merged.inserted, 1);
    assert_matches!(report.skipped.as_slice(), [ReconciliationWarning::Malformed { .. }]);

    let calendar = scheduler.calendar();
    let calendar = calendar.read().await;
    assert_eq!(calendar.len(), 1);
    assert!(calendar.get("s1").is_some());
    assert!(calendar.get("s2").is_none());
}
