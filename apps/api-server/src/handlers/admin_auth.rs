//! Admin authentication handlers - login, logout, session and account creation.

use actix_web::{HttpResponse, web};

use patrol_core::domain::Admin;
use patrol_shared::ApiResponse;
use patrol_shared::dto::{AdminPayload, AdminResponse, CreateAdminRequest, LoginRequest};

use crate::middleware::auth::{AdminSession, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn admin_response(admin: &Admin) -> AdminResponse {
    AdminResponse {
        id: admin.id,
        email: admin.email.clone(),
        full_name: admin.full_name.clone(),
        is_super_admin: admin.is_super_admin,
    }
}

/// POST /admin/api/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let admin = state.admins.login(&req.email, &req.password).await?;

    let token = state
        .tokens
        .generate_token(admin.id, &admin.email, admin.roles())
        .map_err(|e| AppError::internal("Failed to create session", e))?;

    tracing::info!(admin_id = %admin.id, "Admin logged in");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(
            token,
            state.tokens.expiration_seconds(),
            state.config.session.cookie_secure,
        ))
        .json(ApiResponse::ok(AdminPayload {
            admin: admin_response(&admin),
        })))
}

/// POST /admin/api/logout
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie(state.config.session.cookie_secure))
        .json(ApiResponse::acknowledged())
}

/// GET /admin/api/session - the admin behind the current cookie.
pub async fn current_session(
    session: AdminSession,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    // A deleted or disabled account invalidates outstanding tokens.
    let admin = match state.admins.get(session.admin_id).await {
        Ok(admin) if admin.is_active => admin,
        Ok(_) | Err(patrol_core::DomainError::NotFound { .. }) => {
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(AdminPayload {
        admin: admin_response(&admin),
    })))
}

/// POST /admin/api/create-admin.json - super admins only.
pub async fn create_admin(
    session: AdminSession,
    state: web::Data<AppState>,
    body: web::Json<CreateAdminRequest>,
) -> AppResult<HttpResponse> {
    if !session.is_super_admin() {
        tracing::info!(
            admin_id = %session.admin_id,
            email = %session.email,
            "Non super admin tried to create an admin"
        );
        return Err(AppError::Forbidden);
    }

    let req = body.into_inner();
    let admin = state
        .admins
        .create(
            &req.email,
            &req.password,
            req.full_name.as_deref(),
            req.is_super_admin,
        )
        .await?;

    tracing::info!(
        created_by = %session.admin_id,
        created_by_email = %session.email,
        admin_id = %admin.id,
        "Admin created"
    );

    Ok(HttpResponse::Created().json(ApiResponse::ok(AdminPayload {
        admin: admin_response(&admin),
    })))
}
