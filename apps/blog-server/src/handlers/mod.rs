//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod profile;

use actix_web::web;
use serde::Deserialize;

use blogicum_core::pagination::PageRequest;

use crate::middleware::error::AppError;

/// `?page=` of the listing pages; anything but an integer means page 1.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<String>,
}

impl PageParams {
    pub fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

/// Configure all application routes.
///
/// Literal segments (`create`, `edit`) are registered before the
/// parameterised routes they would otherwise collide with.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );

    cfg.route("/", web::get().to(posts::index))
        .route("/health", web::get().to(health::health_check))
        .route("/category/{slug}/", web::get().to(posts::category_posts))
        // Posts
        .service(
            web::resource("/posts/create/")
                .route(web::get().to(posts::create_form))
                .route(web::post().to(posts::create_submit)),
        )
        .route("/posts/{id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/posts/{id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::edit_submit)),
        )
        .service(
            web::resource("/posts/{id}/delete/")
                .route(web::get().to(posts::delete_confirm))
                .route(web::post().to(posts::delete_submit)),
        )
        // Comments
        .route("/posts/{id}/comment/", web::post().to(comments::add_comment))
        .service(
            web::resource("/posts/{id}/comment/{comment_id}/edit/")
                .route(web::get().to(comments::edit_form))
                .route(web::post().to(comments::edit_submit)),
        )
        .service(
            web::resource("/posts/{id}/comment/{comment_id}/delete/")
                .route(web::get().to(comments::delete_confirm))
                .route(web::post().to(comments::delete_submit)),
        )
        // Profiles
        .service(
            web::resource("/profile/edit/")
                .route(web::get().to(profile::edit_form))
                .route(web::post().to(profile::edit_submit)),
        )
        .route("/profile/{username}/", web::get().to(profile::profile))
        // Accounts
        .service(
            web::scope("/auth")
                .route("/registration/", web::post().to(auth::register))
                .route("/login/", web::post().to(auth::login)),
        );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, http::header, test, web};
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};

    use blogicum_core::BlogService;
    use blogicum_core::domain::{Category, NewPost, Post, User};
    use blogicum_core::forms::{CommentInput, PostInput};
    use blogicum_infra::{InMemoryBlogStore, JwtConfig};

    use super::configure_routes;
    use crate::state::AppState;

    struct Blog {
        store: Arc<InMemoryBlogStore>,
        state: AppState,
        author: User,
        reader: User,
        travel: Category,
    }

    impl Blog {
        async fn new() -> Self {
            let store = Arc::new(InMemoryBlogStore::new());
            let state = AppState::with_blog(
                BlogService::new(store.repositories()),
                JwtConfig {
                    secret: "handler-tests".to_string(),
                    ..JwtConfig::default()
                },
            );
            let author = store.add_user("author").await;
            let reader = store.add_user("reader").await;
            let travel = store.add_category("Travel", "travel", true).await;

            Self {
                store,
                state,
                author,
                reader,
                travel,
            }
        }

        async fn post(&self, title: &str, is_published: bool) -> Post {
            self.store
                .add_post(NewPost {
                    title: title.to_string(),
                    text: "Body".to_string(),
                    pub_date: Utc::now() - Duration::hours(1),
                    author_id: self.author.id,
                    category_id: Some(self.travel.id),
                    location_id: None,
                    is_published,
                })
                .await
        }

        fn bearer(&self, user: &User) -> (header::HeaderName, String) {
            let token = self
                .state
                .tokens
                .generate_token(user.id, &user.username)
                .unwrap();
            (header::AUTHORIZATION, format!("Bearer {token}"))
        }
    }

    macro_rules! app {
        ($blog:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($blog.state.clone()))
                    .app_data(web::Data::new($blog.state.tokens.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn location(resp: &actix_web::dev::ServiceResponse) -> &str {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[actix_web::test]
    async fn test_index_lists_public_posts() {
        let blog = Blog::new().await;
        blog.post("visible", true).await;
        blog.post("draft", false).await;
        let app = app!(blog);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/?page=abc").to_request(),
        )
        .await;

        assert_eq!(body["page"]["number"], 1);
        assert_eq!(body["page"]["count"], 1);
        assert_eq!(body["posts"][0]["title"], "visible");
        assert_eq!(body["posts"][0]["comment_count"], 0);
    }

    #[actix_web::test]
    async fn test_hidden_post_is_404_except_for_author() {
        let blog = Blog::new().await;
        let draft = blog.post("draft", false).await;
        let app = app!(blog);
        let uri = format!("/posts/{}/", draft.id);

        let anonymous =
            test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(anonymous.status(), StatusCode::NOT_FOUND);
        let problem: Value = test::read_body_json(anonymous).await;
        assert_eq!(problem["status"], 404);

        let owner = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header(blog.bearer(&blog.author))
                .to_request(),
        )
        .await;
        assert_eq!(owner.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_unpublished_category_is_404() {
        let blog = Blog::new().await;
        blog.store.add_category("Hidden", "hidden", false).await;
        let app = app!(blog);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/category/hidden/").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_create_requires_token() {
        let blog = Blog::new().await;
        let app = app!(blog);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/posts/create/").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_post_redirects_to_profile() {
        let blog = Blog::new().await;
        let app = app!(blog);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts/create/")
                .insert_header(blog.bearer(&blog.author))
                .set_form(PostInput {
                    title: "Fresh".to_string(),
                    text: "Body".to_string(),
                    pub_date: "2024-01-01T09:30".to_string(),
                    category: blog.travel.id.to_string(),
                    is_published: Some("on".to_string()),
                    ..PostInput::default()
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/profile/author/");
        assert_eq!(blog.store.post_count().await, 1);
    }

    #[actix_web::test]
    async fn test_invalid_post_form_rerenders_with_errors() {
        let blog = Blog::new().await;
        let app = app!(blog);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts/create/")
                .insert_header(blog.bearer(&blog.author))
                .set_form(PostInput {
                    title: "No date".to_string(),
                    ..PostInput::default()
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let page: Value = test::read_body_json(resp).await;
        assert_eq!(page["form"]["title"], "No date");
        assert!(page["errors"]["pub_date"].is_array());
        assert!(page["errors"]["category"].is_array());
        assert_eq!(page["categories"][0]["slug"], "travel");
        assert_eq!(blog.store.post_count().await, 0);
    }

    #[actix_web::test]
    async fn test_foreign_edit_redirects_to_detail() {
        let blog = Blog::new().await;
        let post = blog.post("mine", true).await;
        let app = app!(blog);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/posts/{}/edit/", post.id))
                .insert_header(blog.bearer(&blog.reader))
                .set_form(PostInput {
                    title: "theirs".to_string(),
                    ..PostInput::default()
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), format!("/posts/{}/", post.id));

        let detail: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/posts/{}/", post.id))
                .to_request(),
        )
        .await;
        assert_eq!(detail["post"]["title"], "mine");
    }

    #[actix_web::test]
    async fn test_delete_needs_post_to_take_effect() {
        let blog = Blog::new().await;
        let post = blog.post("doomed", true).await;
        let app = app!(blog);
        let uri = format!("/posts/{}/delete/", post.id);

        let confirm = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header(blog.bearer(&blog.author))
                .to_request(),
        )
        .await;
        assert_eq!(confirm.status(), StatusCode::OK);
        assert_eq!(blog.store.post_count().await, 1);

        let delete = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&uri)
                .insert_header(blog.bearer(&blog.author))
                .to_request(),
        )
        .await;
        assert_eq!(delete.status(), StatusCode::FOUND);
        assert_eq!(location(&delete), "/");
        assert_eq!(blog.store.post_count().await, 0);
    }

    #[actix_web::test]
    async fn test_comment_shows_up_in_counts() {
        let blog = Blog::new().await;
        let post = blog.post("discussed", true).await;
        let app = app!(blog);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/posts/{}/comment/", post.id))
                .insert_header(blog.bearer(&blog.reader))
                .set_form(CommentInput {
                    text: "Great read".to_string(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), format!("/posts/{}/", post.id));

        let index: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request())
                .await;
        assert_eq!(index["posts"][0]["comment_count"], 1);

        let detail: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/posts/{}/", post.id))
                .to_request(),
        )
        .await;
        assert_eq!(detail["comments"][0]["text"], "Great read");
        assert_eq!(detail["comments"][0]["author"]["username"], "reader");
    }

    #[actix_web::test]
    async fn test_profile_marks_owner() {
        let blog = Blog::new().await;
        blog.post("draft", false).await;
        let app = app!(blog);

        let own: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/profile/author/")
                .insert_header(blog.bearer(&blog.author))
                .to_request(),
        )
        .await;
        let public: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/profile/author/").to_request(),
        )
        .await;

        assert_eq!(own["is_owner"], true);
        assert_eq!(own["page"]["count"], 1);
        assert_eq!(public["is_owner"], false);
        assert_eq!(public["page"]["count"], 0);
    }

    #[actix_web::test]
    async fn test_register_then_login() {
        let blog = Blog::new().await;
        let app = app!(blog);
        let credentials = json!({
            "username": "newcomer",
            "email": "newcomer@example.com",
            "password": "long-enough-password",
        });

        let registered = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/registration/")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(registered.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(registered).await;
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["user"]["username"], "newcomer");

        let duplicate = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/registration/")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let login = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/login/")
                .set_json(json!({"username": "newcomer", "password": "long-enough-password"}))
                .to_request(),
        )
        .await;
        assert_eq!(login.status(), StatusCode::OK);

        let wrong = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/login/")
                .set_json(json!({"username": "newcomer", "password": "nope-nope-nope"}))
                .to_request(),
        )
        .await;
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_short_password_is_rejected() {
        let blog = Blog::new().await;
        let app = app!(blog);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/registration/")
                .set_json(json!({"username": "shorty", "email": "", "password": "short"}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let problem: Value = test::read_body_json(resp).await;
        assert!(problem["errors"]["password"].is_array());
    }

    #[actix_web::test]
    async fn test_malformed_login_body_is_bad_request() {
        let blog = Blog::new().await;
        let app = app!(blog);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/login/")
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload("{\"username\": ")
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["status"], 400);
    }
}
