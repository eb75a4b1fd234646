//! End-to-end coverage for the complaint lifecycle and authorisation rules.

mod support;

use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use support::{app, file_complaint, register_account, TestBackend};

#[actix_web::test]
async fn claim_issue_lands_in_claims_department_with_high_priority() {
    let backend = TestBackend::new();
    let app = test::init_service(app(backend.state)).await;
    let user = register_account(&app, "Ada", "ada@example.com", "hopper").await;
    let token = user["token"].as_str().expect("token");

    let complaint = file_complaint(&app, token, "Claim Issue", "Late payout").await;

    assert_eq!(complaint["department"], "Claims Department");
    assert_eq!(complaint["priority"], "High");
    assert_eq!(complaint["status"], "Pending");
    assert_eq!(complaint["ownerId"], user["id"]);
    assert!(complaint.get("adminResponse").is_none());
}

#[actix_web::test]
async fn listing_scopes_by_role_and_admins_see_owner_contact() {
    let backend = TestBackend::new();
    let admin_token = backend.seed_admin("admin@example.com").await;
    let app = test::init_service(app(backend.state)).await;

    let ada = register_account(&app, "Ada", "ada@example.com", "hopper").await;
    let bob = register_account(&app, "Bob", "bob@example.com", "builder").await;
    let ada_token = ada["token"].as_str().expect("token");
    let bob_token = bob["token"].as_str().expect("token");

    file_complaint(&app, ada_token, "Other", "Ada's ticket").await;
    file_complaint(&app, bob_token, "Premium Payment", "Bob's ticket").await;

    let mine = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/complaints")
            .insert_header((AUTHORIZATION, format!("Bearer {ada_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(mine.status(), StatusCode::OK);
    let mine: Value = test::read_body_json(mine).await;
    let mine = mine.as_array().expect("array");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["title"], "Ada's ticket");
    assert!(mine[0].get("owner").is_none());

    let all = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/complaints")
            .insert_header((AUTHORIZATION, format!("Bearer {admin_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(all.status(), StatusCode::OK);
    let all: Value = test::read_body_json(all).await;
    let all = all.as_array().expect("array");
    assert_eq!(all.len(), 2);
    let owners: Vec<&str> = all
        .iter()
        .map(|entry| entry["owner"]["email"].as_str().expect("owner email"))
        .collect();
    assert!(owners.contains(&"ada@example.com"));
    assert!(owners.contains(&"bob@example.com"));
}

#[actix_web::test]
async fn admin_resolution_is_visible_to_the_owner() {
    let backend = TestBackend::new();
    let admin_token = backend.seed_admin("admin@example.com").await;
    let app = test::init_service(app(backend.state)).await;

    let ada = register_account(&app, "Ada", "ada@example.com", "hopper").await;
    let ada_token = ada["token"].as_str().expect("token");
    let complaint = file_complaint(&app, ada_token, "Claim Issue", "Late payout").await;
    let id = complaint["id"].as_str().expect("id");

    let update = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/complaints/{id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {admin_token}")))
            .set_json(&json!({ "status": "Resolved", "adminResponse": "Payout released" }))
            .to_request(),
    )
    .await;
    assert_eq!(update.status(), StatusCode::OK);

    let seen = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/complaints/{id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {ada_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(seen.status(), StatusCode::OK);
    let seen: Value = test::read_body_json(seen).await;
    assert_eq!(seen["status"], "Resolved");
    assert_eq!(seen["adminResponse"], "Payout released");
    assert_eq!(seen["owner"]["name"], "Ada");
}

#[actix_web::test]
async fn cross_user_access_is_denied_everywhere() {
    let backend = TestBackend::new();
    let app = test::init_service(app(backend.state)).await;

    let ada = register_account(&app, "Ada", "ada@example.com", "hopper").await;
    let bob = register_account(&app, "Bob", "bob@example.com", "builder").await;
    let ada_token = ada["token"].as_str().expect("token");
    let bob_token = bob["token"].as_str().expect("token");
    let complaint = file_complaint(&app, ada_token, "Other", "Ada's ticket").await;
    let id = complaint["id"].as_str().expect("id");

    let read = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/complaints/{id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {bob_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(read.status(), StatusCode::UNAUTHORIZED);

    let update = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/complaints/{id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {bob_token}")))
            .set_json(&json!({ "status": "Rejected" }))
            .to_request(),
    )
    .await;
    assert_eq!(update.status(), StatusCode::UNAUTHORIZED);

    let delete = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/complaints/{id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {bob_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(delete.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn owner_delete_is_limited_to_pending_tickets() {
    let backend = TestBackend::new();
    let admin_token = backend.seed_admin("admin@example.com").await;
    let app = test::init_service(app(backend.state)).await;

    let ada = register_account(&app, "Ada", "ada@example.com", "hopper").await;
    let ada_token = ada["token"].as_str().expect("token");

    // A pending ticket can be withdrawn by its owner.
    let pending = file_complaint(&app, ada_token, "Other", "Withdraw me").await;
    let pending_id = pending["id"].as_str().expect("id");
    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/complaints/{pending_id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {ada_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let res: Value = test::read_body_json(res).await;
    assert_eq!(res["id"], *pending_id);

    // Deleting it again is a 404.
    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/complaints/{pending_id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {ada_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // A resolved ticket is no longer the owner's to delete.
    let resolved = file_complaint(&app, ada_token, "Claim Issue", "Keep me").await;
    let resolved_id = resolved["id"].as_str().expect("id");
    let update = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/complaints/{resolved_id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {admin_token}")))
            .set_json(&json!({ "status": "Resolved" }))
            .to_request(),
    )
    .await;
    assert_eq!(update.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/complaints/{resolved_id}"))
            .insert_header((AUTHORIZATION, format!("Bearer {ada_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "cannot delete active ticket");
}

#[actix_web::test]
async fn every_complaint_endpoint_requires_a_token() {
    let backend = TestBackend::new();
    let app = test::init_service(app(backend.state)).await;

    let requests = [
        test::TestRequest::get().uri("/api/v1/complaints"),
        test::TestRequest::post()
            .uri("/api/v1/complaints")
            .set_json(&json!({
                "policyNumber": "POL-1",
                "category": "Other",
                "title": "t",
                "description": "d",
            })),
        test::TestRequest::get().uri("/api/v1/complaints/00000000-0000-0000-0000-000000000000"),
        test::TestRequest::put()
            .uri("/api/v1/complaints/00000000-0000-0000-0000-000000000000")
            .set_json(&json!({ "status": "Resolved" })),
        test::TestRequest::delete().uri("/api/v1/complaints/00000000-0000-0000-0000-000000000000"),
    ];
    for request in requests {
        let res = test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "no token");
    }
}
