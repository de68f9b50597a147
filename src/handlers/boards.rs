//! 게시글 HTTP 핸들러
//!
//! 작성/수정/삭제는 프로필 토큰의 `id` 를 `created_by` 로 사용하고,
//! 단건/목록 조회는 인증 없이 열려 있습니다.
//!
//! `GET /boards` 쿼리의 `id` 는 작성자 필터(`created_by`)로 전달됩니다.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::{json, Value};

use crate::core::errors::Fail;
use crate::core::registry::AppServices;
use crate::domain::dto::BoardListQuery;
use crate::domain::models::Executor;
use crate::handlers::{query_input, with_fields};
use crate::middlewares::AuthMiddleware;

async fn save_board(services: &AppServices, executor: &Executor, body: Value) -> Result<HttpResponse, Fail> {
    let input = with_fields(body, [("created_by", json!(executor.id()))]);
    let output = services.boards.create_or_update(input).await?;
    Ok(HttpResponse::Ok().json(output))
}

#[post("", wrap = "AuthMiddleware::profile()")]
pub async fn create_board(
    services: web::Data<AppServices>,
    executor: Executor,
    body: web::Json<Value>,
) -> Result<HttpResponse, Fail> {
    save_board(&services, &executor, body.into_inner()).await
}

#[put("", wrap = "AuthMiddleware::profile()")]
pub async fn update_board(
    services: web::Data<AppServices>,
    executor: Executor,
    body: web::Json<Value>,
) -> Result<HttpResponse, Fail> {
    save_board(&services, &executor, body.into_inner()).await
}

#[get("/{id}")]
pub async fn get_board(services: web::Data<AppServices>, id: web::Path<String>) -> Result<HttpResponse, Fail> {
    let board = services.boards.find_one(json!({ "id": id.into_inner() })).await?;
    Ok(HttpResponse::Ok().json(board))
}

#[get("")]
pub async fn list_boards(
    services: web::Data<AppServices>,
    query: web::Query<BoardListQuery>,
) -> Result<HttpResponse, Fail> {
    let input = query_input(&[
        ("orderKey", &query.order_key),
        ("orderType", &query.order_type),
        ("cursor", &query.cursor),
        ("windowSize", &query.window_size),
        ("category", &query.category),
        ("created_by", &query.id),
    ]);
    let boards = services.boards.query(input).await?;
    Ok(HttpResponse::Ok().json(boards))
}

#[delete("", wrap = "AuthMiddleware::profile()")]
pub async fn delete_board(
    services: web::Data<AppServices>,
    executor: Executor,
    body: web::Json<Value>,
) -> Result<HttpResponse, Fail> {
    let input = with_fields(body.into_inner(), [("created_by", json!(executor.id()))]);
    let message = services.boards.delete(input).await?;
    Ok(HttpResponse::Ok().json(message))
}
