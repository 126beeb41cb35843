use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::header, rt, test, web, App, HttpServer};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;

use kanban_api::auth::{AuthResponse, TokenKeys};
use kanban_api::middleware::{CatchPanic, RequestIdMiddleware};
use kanban_api::models::{Board, User};
use kanban_api::repository::{
    sqlite, BoardStore, MemBoardStore, MemUserStore, SqliteBoardStore, SqliteUserStore, UserStore,
};
use kanban_api::routes::{self, health, DataResponse};
use kanban_api::services::{AuthService, BoardService};

fn keys() -> Arc<TokenKeys> {
    Arc::new(TokenKeys::new(b"boards-secret", Duration::hours(24)))
}

async fn register(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    let body: DataResponse<AuthResponse> = test::read_body_json(resp).await;
    body.data.token
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

async fn crud_scenario(users: Arc<dyn UserStore>, boards: Arc<dyn BoardStore>) {
    let keys = keys();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AuthService::new(users, Arc::clone(&keys))))
            .app_data(web::Data::new(BoardService::new(boards)))
            .wrap(CatchPanic)
            .wrap(RequestIdMiddleware)
            .service(web::scope("/api/v1").configure(routes::config(Arc::clone(&keys)))),
    )
    .await;

    let token = register(&app, "alice@example.com", "secret1").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/boards")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Sprint 1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: DataResponse<Board> = test::read_body_json(resp).await;
    let created = created.data;
    assert_eq!(created.title, "Sprint 1");
    assert_eq!(created.created_at, created.updated_at);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/boards/{}", created.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let fetched: DataResponse<Board> = test::read_body_json(resp).await;
    assert_eq!(fetched.data, created);

    rt::time::sleep(std::time::Duration::from_millis(5)).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/boards/{}", created.id))
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Sprint One" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: DataResponse<Board> = test::read_body_json(resp).await;
    assert_eq!(updated.data.id, created.id);
    assert_eq!(updated.data.title, "Sprint One");
    assert_eq!(updated.data.created_at, created.created_at);
    assert!(updated.data.updated_at > created.updated_at);

    let req = test::TestRequest::get()
        .uri("/api/v1/boards")
        .insert_header(bearer(&token))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(listed["data"][0]["title"], "Sprint One");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/boards/{}", created.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);
    assert!(test::read_body(resp).await.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/boards/{}", created.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not found");
}

#[actix_rt::test]
async fn test_board_crud_flow_in_memory() {
    crud_scenario(Arc::new(MemUserStore::new()), Arc::new(MemBoardStore::new())).await;
}

#[actix_rt::test]
async fn test_board_crud_flow_sqlite() {
    let pool = sqlite::connect_in_memory().await.expect("in-memory sqlite");
    crud_scenario(
        Arc::new(SqliteUserStore::new(pool.clone())),
        Arc::new(SqliteBoardStore::new(pool)),
    )
    .await;
}

#[actix_rt::test]
async fn test_board_routes_require_valid_token() {
    let keys = keys();
    let boards = Arc::new(MemBoardStore::new());
    let existing = boards.create("existing").await.unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AuthService::new(
                Arc::new(MemUserStore::new()),
                Arc::clone(&keys),
            )))
            .app_data(web::Data::new(BoardService::new(boards.clone())))
            .service(web::scope("/api/v1").configure(routes::config(Arc::clone(&keys)))),
    )
    .await;

    let user = User {
        id: "u-1".to_string(),
        email: "u@example.com".to_string(),
        password_hash: String::new(),
        created_at: Utc::now(),
    };
    let expired = keys.issue_at(&user, Utc::now() - Duration::hours(25)).unwrap();
    let forged = TokenKeys::new(b"someone-else", Duration::hours(1))
        .issue(&user)
        .unwrap();
    let item = format!("/api/v1/boards/{}", existing.id);

    for authorization in [None, Some(expired), Some(forged)] {
        let requests = vec![
            test::TestRequest::get().uri("/api/v1/boards"),
            test::TestRequest::post()
                .uri("/api/v1/boards")
                .set_json(json!({ "title": "nope" })),
            test::TestRequest::get().uri(&item),
            test::TestRequest::put()
                .uri(&item)
                .set_json(json!({ "title": "nope" })),
            test::TestRequest::delete().uri(&item),
        ];
        for mut req in requests {
            if let Some(token) = &authorization {
                req = req.insert_header(bearer(token));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), 401);
        }
    }

    // Nothing behind the middleware ran.
    let remaining = boards.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "existing");
}

#[actix_rt::test]
async fn test_list_is_newest_first_and_missing_ids_are_not_found() {
    let keys = keys();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AuthService::new(
                Arc::new(MemUserStore::new()),
                Arc::clone(&keys),
            )))
            .app_data(web::Data::new(BoardService::new(Arc::new(MemBoardStore::new()))))
            .service(web::scope("/api/v1").configure(routes::config(Arc::clone(&keys)))),
    )
    .await;
    let token = register(&app, "erin@example.com", "secret1").await;

    for title in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/boards")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": title }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);
        rt::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/boards")
        .insert_header(bearer(&token))
        .to_request();
    let listed: DataResponse<Vec<Board>> = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = listed.data.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    let req = test::TestRequest::put()
        .uri("/api/v1/boards/does-not-exist")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "x" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::delete()
        .uri("/api/v1/boards/does-not-exist")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_rt::test]
async fn test_live_server_health_and_unauthorized() {
    let keys = keys();
    let auth = web::Data::new(AuthService::new(Arc::new(MemUserStore::new()), Arc::clone(&keys)));
    let boards = web::Data::new(BoardService::new(Arc::new(MemBoardStore::new())));

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(auth.clone())
            .app_data(boards.clone())
            .wrap(CatchPanic)
            .wrap(RequestIdMiddleware)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api/v1").configure(routes::config(Arc::clone(&keys))))
    })
    .workers(1)
    .listen(listener)
    .expect("listen on pre-bound socket")
    .run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);

    let resp = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let resp = client
        .post(format!("{}/api/v1/boards", base))
        .json(&json!({ "title": "Unauthorized board" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "missing bearer token");

    handle.stop(true).await;
}
