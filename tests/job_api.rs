//! HTTP contract tests for `/api/jobs`, run against the in-memory store.

use actix_web::{
    App,
    http::{Method, StatusCode},
    test, web,
};
use serde_json::{Value, json};
use std::sync::Arc;

use maintenance_tracker::api::{self, job::JobService};
use maintenance_tracker::db::MemoryJobStore;

const PAYLOAD_LIMIT: usize = 64 * 1024;

macro_rules! init_app {
    () => {
        init_app!(Vec::<String>::new())
    };
    ($origins:expr) => {
        test::init_service(
            App::new()
                .wrap(api::cors(&$origins))
                .wrap(api::security_headers())
                .configure(api::configure(
                    web::Data::new(JobService::new(Arc::new(MemoryJobStore::new()))),
                    PAYLOAD_LIMIT,
                )),
        )
        .await
    };
}

fn leak_report() -> Value {
    json!({
        "description": "Fix the leak",
        "location": "Building 1, Room 203",
        "priority": "High"
    })
}

#[actix_web::test]
async fn create_returns_stored_job_with_defaults() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(leak_report())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers().get("X-Content-Type-Options").unwrap(), "nosniff");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["description"], "Fix the leak");
    assert_eq!(body["location"], "Building 1, Room 203");
    assert_eq!(body["priority"], "High");
    assert_eq!(body["status"], "Submitted");
    assert_eq!(body["archived"], false);
    assert!(body["id"].is_string());
    assert!(body["dateSubmitted"].is_string());
}

#[actix_web::test]
async fn create_reports_missing_fields_and_persists_nothing() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(json!({ "location": "Test location" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["fields"]["description"]["errors"][0], "Description is required");
    assert_eq!(
        body["fields"]["priority"]["errors"][0],
        "Priority must be Low, Medium, or High"
    );
    assert!(body["fields"].get("location").is_none());

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let jobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(jobs.is_empty());
}

#[actix_web::test]
async fn create_reports_null_and_non_text_fields_by_name() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(json!({ "description": null, "location": "Loc", "priority": null }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["fields"]["description"]["errors"][0], "Description is required");
    assert_eq!(
        body["fields"]["priority"]["errors"][0],
        "Priority must be Low, Medium, or High"
    );

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(json!({ "description": "Fix the leak", "location": "Loc", "priority": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["fields"]["priority"]["errors"][0],
        "Priority must be Low, Medium, or High"
    );
    assert!(body["fields"].get("description").is_none());

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let jobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(jobs.is_empty());
}

#[actix_web::test]
async fn enum_values_must_match_exactly() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(json!({ "description": "Fix the leak", "location": "Loc", "priority": " High " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(leak_report())
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/jobs/{}", job["id"].as_str().unwrap()))
        .set_json(json!({ "status": " Completed " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"]["status"]["errors"][0], "Invalid status value");

    let req = test::TestRequest::put()
        .uri("/api/jobs/status")
        .set_json(json!({ "ids": [job["id"]], "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let jobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["status"], "Submitted");
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"description\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn list_filters_archived_and_orders_by_status() {
    let app = init_app!();

    let mut ids = Vec::new();
    for description in ["Job 1", "Job 2", "Job 3"] {
        let req = test::TestRequest::post()
            .uri("/api/jobs")
            .set_json(json!({ "description": description, "location": "Loc", "priority": "Low" }))
            .to_request();
        let job: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(job["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::put()
        .uri(&format!("/api/jobs/{}", ids[0]))
        .set_json(json!({ "status": "Completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/jobs/{}", ids[1]))
        .set_json(json!({ "status": "In Progress" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/jobs/archive/{}", ids[2]))
        .to_request();
    let archived: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(archived["archived"], true);

    let req = test::TestRequest::get().uri("/api/jobs?archived=false").to_request();
    let active: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let statuses: Vec<&str> = active.iter().map(|j| j["status"].as_str().unwrap()).collect();
    assert_eq!(statuses, vec!["In Progress", "Completed"]);
    assert!(active.iter().all(|j| j["archived"] == false));

    let req = test::TestRequest::get().uri("/api/jobs?archived=true").to_request();
    let archived: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0]["id"], ids[2].as_str());
}

#[actix_web::test]
async fn jobs_sharing_a_status_list_oldest_first() {
    let app = init_app!();

    let mut ids = Vec::new();
    for description in ["Job A", "Job B", "Job C"] {
        let req = test::TestRequest::post()
            .uri("/api/jobs")
            .set_json(json!({ "description": description, "location": "Loc", "priority": "Low" }))
            .to_request();
        let job: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(job["id"].as_str().unwrap().to_string());
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    // Complete B before A; listing must still follow submission time
    for id in [&ids[1], &ids[0]] {
        let req = test::TestRequest::put()
            .uri("/api/jobs/status")
            .set_json(json!({ "ids": [id], "status": "Completed" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let jobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let listed: Vec<&str> = jobs.iter().map(|j| j["id"].as_str().unwrap()).collect();
    assert_eq!(listed, vec![ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]);

    let completed: Vec<chrono::DateTime<chrono::Utc>> = jobs[1..]
        .iter()
        .map(|j| j["dateSubmitted"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(completed[0] < completed[1]);
}

#[actix_web::test]
async fn update_rejects_unknown_status() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(leak_report())
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/jobs/{}", job["id"].as_str().unwrap()))
        .set_json(json!({ "status": "Done" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"]["status"]["errors"][0], "Invalid status value");
}

#[actix_web::test]
async fn update_ignores_priority_and_archived_fields() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(leak_report())
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/jobs/{}", job["id"].as_str().unwrap()))
        .set_json(json!({ "status": "In Progress", "priority": "Low", "archived": true }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["status"], "In Progress");
    assert_eq!(updated["priority"], "High");
    assert_eq!(updated["archived"], false);
}

#[actix_web::test]
async fn batch_update_counts_only_real_changes() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(leak_report())
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;
    let batch = json!({ "ids": [job["id"]], "status": "Completed" });

    let req = test::TestRequest::put()
        .uri("/api/jobs/status")
        .set_json(&batch)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["modifiedCount"], 1);
    assert_eq!(body["message"], "1 jobs updated successfully");

    let req = test::TestRequest::put()
        .uri("/api/jobs/status")
        .set_json(&batch)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("modifiedCount").is_none());
    assert_eq!(
        body["message"],
        "No jobs were updated because they were already in the desired state"
    );
}

#[actix_web::test]
async fn batch_update_validates_before_writing() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(leak_report())
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;

    let cases = [
        json!({ "status": "Completed" }),
        json!({ "ids": [job["id"]] }),
        json!({ "ids": [job["id"]], "status": "Closed" }),
        json!({ "ids": [job["id"], "not-an-id"], "status": "Completed" }),
    ];
    for batch in cases {
        let req = test::TestRequest::put()
            .uri("/api/jobs/status")
            .set_json(&batch)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", batch);
    }

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let jobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(jobs[0]["status"], "Submitted");
}

#[actix_web::test]
async fn archive_is_idempotent() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(leak_report())
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/jobs/archive/{}", job["id"].as_str().unwrap());

    for _ in 0..2 {
        let req = test::TestRequest::put().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["archived"], true);
    }
}

#[actix_web::test]
async fn missing_jobs_are_not_found_everywhere() {
    let app = init_app!();
    let missing = uuid::Uuid::new_v4();

    let requests = [
        test::TestRequest::put()
            .uri(&format!("/api/jobs/{}", missing))
            .set_json(json!({ "status": "Completed" })),
        test::TestRequest::put().uri(&format!("/api/jobs/archive/{}", missing)),
        test::TestRequest::delete().uri(&format!("/api/jobs/{}", missing)),
    ];
    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let req = test::TestRequest::delete().uri("/api/jobs/not-an-id").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_removes_job_from_listing() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(leak_report())
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Job deleted successfully");

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    for archived in ["true", "false"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/jobs?archived={}", archived))
            .to_request();
        let jobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(jobs.iter().all(|j| j["id"] != job["id"]));
    }
}

#[actix_web::test]
async fn health_endpoints_report_store_state() {
    let app = init_app!();

    for path in ["/health", "/ready", "/live"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "path: {}", path);
    }
}

#[actix_web::test]
async fn preflight_allows_any_origin_by_default() {
    let app = init_app!();

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/jobs")
        .insert_header(("Origin", "http://localhost:3000"))
        .insert_header(("Access-Control-Request-Method", "POST"))
        .insert_header(("Access-Control-Request-Headers", "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
    let methods = resp
        .headers()
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("PUT") && methods.contains("DELETE"));

    let req = test::TestRequest::get()
        .uri("/api/jobs")
        .insert_header(("Origin", "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
}

#[actix_web::test]
async fn preflight_honours_configured_origins() {
    let app = init_app!(vec!["http://jobs.example.com".to_string()]);

    let preflight = |origin: &str| {
        test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/jobs/status")
            .insert_header(("Origin", origin))
            .insert_header(("Access-Control-Request-Method", "PUT"))
            .to_request()
    };

    let resp = test::call_service(&app, preflight("http://jobs.example.com")).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "http://jobs.example.com"
    );

    let denied = test::try_call_service(&app, preflight("http://elsewhere.example.com")).await;
    let allowed = denied
        .map(|resp| resp.headers().contains_key("access-control-allow-origin"))
        .unwrap_or(false);
    assert!(!allowed);
}
