//! Complaint API handlers.
//!
//! All endpoints sit behind the bearer access guard. Authorisation rules
//! (owner vs. admin) are enforced by the complaint service; this module only
//! maps payloads to typed commands and domain results to DTOs.

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Complaint, ComplaintDraft, ComplaintId, ComplaintPatch, ComplaintValidationError,
    ComplaintWithOwner, Error, PatchValidationError,
};

use super::bearer::AuthenticatedUser;
use super::error::ApiResult;
use super::state::HttpState;

/// Request body for `POST /api/v1/complaints`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    /// Policy the grievance is filed against.
    pub policy_number: String,
    /// One of the recognised categories, e.g. `Claim Issue`.
    pub category: String,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
}

/// Request body for `PUT /api/v1/complaints/{id}` (admin only).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintRequest {
    /// New status, e.g. `In Progress` or `Resolved`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Admin resolution note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_response: Option<String>,
}

/// Owner contact attached to admin-expanded complaint views.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerContactResponse {
    /// Owner display name.
    pub name: String,
    /// Owner email.
    pub email: String,
}

/// Complaint payload returned by every complaint endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    /// Complaint identifier.
    pub id: String,
    /// Identifier of the owning user.
    pub owner_id: String,
    /// Owner contact details; present only in owner-expanded views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerContactResponse>,
    /// Policy the grievance is filed against.
    pub policy_number: String,
    /// Complaint category.
    pub category: String,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Department derived from the category.
    pub department: String,
    /// Priority derived from the category.
    pub priority: String,
    /// Admin resolution note, once one is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_response: Option<String>,
    /// Filing timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ComplaintResponse {
    fn from_complaint(complaint: &Complaint) -> Self {
        Self {
            id: complaint.id.to_string(),
            owner_id: complaint.owner_id.to_string(),
            owner: None,
            policy_number: complaint.policy_number.clone(),
            category: complaint.category.as_str().to_owned(),
            title: complaint.title.clone(),
            description: complaint.description.clone(),
            status: complaint.status.as_str().to_owned(),
            department: complaint.department.as_str().to_owned(),
            priority: complaint.priority.as_str().to_owned(),
            admin_response: complaint.admin_response.clone(),
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
        }
    }

    fn from_view(view: &ComplaintWithOwner, expand_owner: bool) -> Self {
        let mut response = Self::from_complaint(&view.complaint);
        if expand_owner {
            response.owner = Some(OwnerContactResponse {
                name: view.owner.name.clone(),
                email: view.owner.email.clone(),
            });
        }
        response
    }
}

/// Response body for `DELETE /api/v1/complaints/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedComplaintResponse {
    /// Identifier of the removed complaint.
    pub id: String,
}

fn map_draft_error(err: ComplaintValidationError) -> Error {
    let field = match &err {
        ComplaintValidationError::EmptyPolicyNumber
        | ComplaintValidationError::PolicyNumberTooLong { .. } => "policyNumber",
        ComplaintValidationError::UnknownCategory { .. } => "category",
        ComplaintValidationError::EmptyTitle | ComplaintValidationError::TitleTooLong { .. } => {
            "title"
        }
        ComplaintValidationError::EmptyDescription => "description",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_patch_error(err: PatchValidationError) -> Error {
    let field = match &err {
        PatchValidationError::UnknownStatus { .. } => "status",
        PatchValidationError::EmptyAdminResponse => "adminResponse",
        PatchValidationError::EmptyPatch => "body",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// File a new complaint owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, description = "Complaint filed", body = ComplaintResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "createComplaint"
)]
#[post("/complaints")]
pub async fn create_complaint(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<CreateComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ComplaintDraft::try_from_parts(
        &payload.policy_number,
        &payload.category,
        &payload.title,
        &payload.description,
    )
    .map_err(map_draft_error)?;
    let complaint = state.complaints.create(caller.user(), &draft).await?;
    Ok(HttpResponse::Created().json(ComplaintResponse::from_complaint(&complaint)))
}

/// List complaints visible to the caller.
///
/// Admins see every complaint with the owner contact expanded; regular
/// users see only their own complaints.
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    responses(
        (status = 200, description = "Complaints", body = [ComplaintResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints"
)]
#[get("/complaints")]
pub async fn list_complaints(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ComplaintResponse>>> {
    let caller = caller.into_user();
    let listing = state.complaints_query.list(&caller).await?;
    let expand_owner = caller.is_admin();
    Ok(web::Json(
        listing
            .iter()
            .map(|view| ComplaintResponse::from_view(view, expand_owner))
            .collect(),
    ))
}

/// Fetch a single complaint with owner contact expanded.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Complaint", body = ComplaintResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "getComplaint"
)]
#[get("/complaints/{id}")]
pub async fn get_complaint(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ComplaintResponse>> {
    let id = ComplaintId::from_uuid(path.into_inner());
    let view = state.complaints_query.get(caller.user(), &id).await?;
    Ok(web::Json(ComplaintResponse::from_view(&view, true)))
}

/// Apply an admin patch: status transition and/or resolution note.
#[utoipa::path(
    put,
    path = "/api/v1/complaints/{id}",
    request_body = UpdateComplaintRequest,
    params(("id" = Uuid, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "updateComplaint"
)]
#[put("/complaints/{id}")]
pub async fn update_complaint(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateComplaintRequest>,
) -> ApiResult<web::Json<ComplaintResponse>> {
    let id = ComplaintId::from_uuid(path.into_inner());
    let patch =
        ComplaintPatch::try_from_parts(payload.status.as_deref(), payload.admin_response.as_deref())
            .map_err(map_patch_error)?;
    let view = state.complaints.update(caller.user(), &id, &patch).await?;
    Ok(web::Json(ComplaintResponse::from_view(&view, true)))
}

/// Permanently delete a complaint.
///
/// Admins may always delete; owners only while the complaint is Pending.
#[utoipa::path(
    delete,
    path = "/api/v1/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Complaint removed", body = DeletedComplaintResponse),
        (status = 400, description = "Cannot delete active ticket", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "deleteComplaint"
)]
#[delete("/complaints/{id}")]
pub async fn delete_complaint(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<DeletedComplaintResponse>> {
    let id = ComplaintId::from_uuid(path.into_inner());
    let deleted = state.complaints.delete(caller.user(), &id).await?;
    Ok(web::Json(DeletedComplaintResponse {
        id: deleted.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::{seeded_state, test_app, SeededState};

    async fn file_complaint(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        token: &str,
        category: &str,
    ) -> Value {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/v1/complaints")
                .insert_header((AUTHORIZATION, format!("Bearer {token}")))
                .set_json(&CreateComplaintRequest {
                    policy_number: "POL-7".into(),
                    category: category.into(),
                    title: "Late payout".into(),
                    description: "Claim 99 unpaid".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        test::read_body_json(res).await
    }

    #[rstest]
    #[case("Premium Payment", "Finance Department", "High")]
    #[case("Claim Issue", "Claims Department", "High")]
    #[case("Policy Document", "Administrative Department", "Medium")]
    #[case("Update Personal Details", "General Support", "Low")]
    #[case("Other", "General Support", "Low")]
    #[actix_web::test]
    async fn creation_triages_each_category(
        #[case] category: &str,
        #[case] department: &str,
        #[case] priority: &str,
    ) {
        let seeded = seeded_state().await;
        let app = test::init_service(test_app(seeded.state)).await;

        let body = file_complaint(&app, &seeded.user_token, category).await;
        assert_eq!(body["category"], category);
        assert_eq!(body["department"], department);
        assert_eq!(body["priority"], priority);
        assert_eq!(body["status"], "Pending");
    }

    #[rstest]
    #[case(json!({"policyNumber": "", "category": "Other", "title": "t", "description": "d"}), "policyNumber")]
    #[case(json!({"policyNumber": "P", "category": "Nonsense", "title": "t", "description": "d"}), "category")]
    #[case(json!({"policyNumber": "P", "category": "Other", "title": " ", "description": "d"}), "title")]
    #[case(json!({"policyNumber": "P", "category": "Other", "title": "t", "description": ""}), "description")]
    #[actix_web::test]
    async fn creation_rejects_invalid_payloads(#[case] payload: Value, #[case] field: &str) {
        let seeded = seeded_state().await;
        let app = test::init_service(test_app(seeded.state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/complaints")
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.user_token)))
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn listing_scopes_by_role_and_expands_owner_for_admins() {
        let seeded = seeded_state().await;
        let SeededState {
            state,
            user_token,
            admin_token,
            ..
        } = seeded;
        let app = test::init_service(test_app(state)).await;

        file_complaint(&app, &user_token, "Other").await;
        file_complaint(&app, &admin_token, "Claim Issue").await;

        let mine = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/complaints")
                .insert_header((AUTHORIZATION, format!("Bearer {user_token}")))
                .to_request(),
        )
        .await;
        let mine: Value = test::read_body_json(mine).await;
        let mine = mine.as_array().expect("array");
        assert_eq!(mine.len(), 1);
        assert!(mine[0].get("owner").is_none());

        let all = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/complaints")
                .insert_header((AUTHORIZATION, format!("Bearer {admin_token}")))
                .to_request(),
        )
        .await;
        let all: Value = test::read_body_json(all).await;
        let all = all.as_array().expect("array");
        assert_eq!(all.len(), 2);
        for entry in all {
            let owner = entry.get("owner").expect("owner expanded for admin");
            assert!(owner["email"].as_str().is_some_and(|e| !e.is_empty()));
        }
    }

    #[actix_web::test]
    async fn strangers_cannot_read_update_or_delete() {
        let seeded = seeded_state().await;
        let app = test::init_service(test_app(seeded.state.clone())).await;
        let body = file_complaint(&app, &seeded.user_token, "Other").await;
        let id = body["id"].as_str().expect("id").to_owned();

        let stranger = &seeded.second_user_token;
        let read = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {stranger}")))
                .to_request(),
        )
        .await;
        assert_eq!(read.status(), StatusCode::UNAUTHORIZED);

        let update = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {stranger}")))
                .set_json(&UpdateComplaintRequest {
                    status: Some("Resolved".into()),
                    admin_response: None,
                })
                .to_request(),
        )
        .await;
        assert_eq!(update.status(), StatusCode::UNAUTHORIZED);

        let delete = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {stranger}")))
                .to_request(),
        )
        .await;
        assert_eq!(delete.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn admin_update_is_visible_to_the_owner() {
        let seeded = seeded_state().await;
        let app = test::init_service(test_app(seeded.state)).await;
        let body = file_complaint(&app, &seeded.user_token, "Claim Issue").await;
        let id = body["id"].as_str().expect("id").to_owned();

        let update = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.admin_token)))
                .set_json(&UpdateComplaintRequest {
                    status: Some("Resolved".into()),
                    admin_response: Some("Refund issued".into()),
                })
                .to_request(),
        )
        .await;
        assert_eq!(update.status(), StatusCode::OK);

        let read = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.user_token)))
                .to_request(),
        )
        .await;
        assert_eq!(read.status(), StatusCode::OK);
        let read: Value = test::read_body_json(read).await;
        assert_eq!(read["status"], "Resolved");
        assert_eq!(read["adminResponse"], "Refund issued");
    }

    #[actix_web::test]
    async fn owner_update_is_rejected_even_on_their_own_ticket() {
        let seeded = seeded_state().await;
        let app = test::init_service(test_app(seeded.state)).await;
        let body = file_complaint(&app, &seeded.user_token, "Other").await;
        let id = body["id"].as_str().expect("id").to_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.user_token)))
                .set_json(&UpdateComplaintRequest {
                    status: Some("Resolved".into()),
                    admin_response: None,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn empty_patches_are_rejected() {
        let seeded = seeded_state().await;
        let app = test::init_service(test_app(seeded.state)).await;
        let body = file_complaint(&app, &seeded.user_token, "Other").await;
        let id = body["id"].as_str().expect("id").to_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.admin_token)))
                .set_json(&UpdateComplaintRequest {
                    status: None,
                    admin_response: None,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn owner_delete_works_only_while_pending() {
        let seeded = seeded_state().await;
        let app = test::init_service(test_app(seeded.state)).await;
        let body = file_complaint(&app, &seeded.user_token, "Other").await;
        let id = body["id"].as_str().expect("id").to_owned();

        let update = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.admin_token)))
                .set_json(&UpdateComplaintRequest {
                    status: Some("Resolved".into()),
                    admin_response: None,
                })
                .to_request(),
        )
        .await;
        assert_eq!(update.status(), StatusCode::OK);

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.user_token)))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "cannot delete active ticket");

        // The admin can still remove it.
        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/complaints/{id}"))
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.admin_token)))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["id"], id);
    }

    #[actix_web::test]
    async fn unknown_ids_are_not_found() {
        let seeded = seeded_state().await;
        let app = test::init_service(test_app(seeded.state)).await;
        let missing = uuid::Uuid::new_v4();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/complaints/{missing}"))
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.admin_token)))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
