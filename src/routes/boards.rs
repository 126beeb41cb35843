use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

use crate::{error::AppError, models::BoardInput, routes::DataResponse, services::BoardService};

/// Lists all boards, newest first.
#[get("")]
pub async fn list_boards(boards: web::Data<BoardService>) -> Result<impl Responder, AppError> {
    let items = boards.list_boards().await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(items)))
}

/// Creates a board.
///
/// ## Responses:
/// - `201 Created`: `{"data": board}`.
/// - `400 Bad Request`: malformed body, or a title that is blank after
///   trimming or longer than 200 characters.
#[post("")]
pub async fn create_board(
    boards: web::Data<BoardService>,
    body: web::Json<BoardInput>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let board = boards.create_board(&body.title).await?;
    Ok(HttpResponse::Created().json(DataResponse::new(board)))
}

#[get("/{id}")]
pub async fn get_board(
    boards: web::Data<BoardService>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let board = boards.get_board(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(board)))
}

/// Renames a board and refreshes its `updatedAt`.
///
/// ## Responses:
/// - `200 OK`: `{"data": board}`.
/// - `400 Bad Request`: malformed body or invalid title.
/// - `404 Not Found`: no board with that id.
#[put("/{id}")]
pub async fn update_board(
    boards: web::Data<BoardService>,
    path: web::Path<String>,
    body: web::Json<BoardInput>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let board = boards.update_board(&path.into_inner(), &body.title).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(board)))
}

#[delete("/{id}")]
pub async fn delete_board(
    boards: web::Data<BoardService>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    boards.delete_board(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
