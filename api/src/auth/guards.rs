use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::UserRole;

use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};

type GuardRejection = (StatusCode, Json<ApiResponse<Empty>>);

/// Helper to extract, validate user from request extensions and insert the back into the request
async fn extract_and_insert_authuser(req: Request<Body>) -> Result<(Request<Body>, AuthUser), GuardRejection> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

async fn allow_role(
    req: Request<Body>,
    next: Next,
    role: UserRole,
    failure_msg: &str,
) -> Result<Response, GuardRejection> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if user.0.role != role {
        return Err((StatusCode::FORBIDDEN, Json(ApiResponse::error(failure_msg))));
    }

    Ok(next.run(req).await)
}

/// Teacher-only guard.
pub async fn require_teacher(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_role(req, next, UserRole::Teacher, "Teacher access required").await
}

/// Student-only guard.
pub async fn require_student(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_role(req, next, UserRole::Student, "Student access required").await
}
