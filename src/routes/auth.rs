use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

use crate::{
    auth::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest},
    error::AppError,
    models::PublicUser,
    routes::DataResponse,
    services::AuthService,
};

/// Register a new user
///
/// Responds 201 with the public user and an access token. A taken email is
/// 409; an empty or oversized email or password is 400.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let (user, token) = auth.register(&body.email, &body.password).await?;

    Ok(HttpResponse::Created().json(DataResponse::new(AuthResponse {
        user: user.into(),
        token,
    })))
}

/// Login user
///
/// Every failure is the same 401 `invalid credentials`.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let (user, token) = auth.login(&body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(DataResponse::new(AuthResponse {
        user: user.into(),
        token,
    })))
}

/// The account the bearer token was issued for. Mounted behind
/// `AuthMiddleware`.
pub async fn me(
    auth: web::Data<AuthService>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = auth.current_user(&caller.user_id).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(PublicUser::from(user))))
}
