//! Integration tests for the WordPress endpoints.
//!
//! Each test mounts the JSON a WordPress site would serve and checks that
//! the endpoint requests the right URL and that the typed models read the
//! filled placeholders.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wp_resource::rest::resources::{AuthStatus, Menu, Page, Post, Term, User, WordPress, WordPressError};
use wp_resource::{BaseUrl, ClientConfig, HttpClient, Nonce};

fn wordpress_for(server: &MockServer, nonce: Option<&str>) -> WordPress {
    let mut builder = ClientConfig::builder().base_url(BaseUrl::new(server.uri()).unwrap());
    if let Some(nonce) = nonce {
        builder = builder.nonce(Nonce::new(nonce).unwrap());
    }
    let config = builder.build().unwrap();
    let client = Arc::new(HttpClient::new(&config).unwrap());
    WordPress::new(client, config.api_root()).unwrap()
}

#[tokio::test]
async fn test_posts_query_by_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wordpress/wp-json/posts/"))
        .and(query_param("type", "news"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "12")
                .insert_header("X-WP-TotalPages", "3")
                .set_body_json(json!([
                    {
                        "ID": 1,
                        "title": "Launch",
                        "type": "news",
                        "status": "publish",
                        "date": "2024-03-01T09:30:00",
                        "author": {"ID": 2, "name": "Editor"},
                        "terms": {"category": [{"ID": 5, "name": "Company", "slug": "company"}]}
                    },
                    {"ID": 2, "title": "Update", "type": "news", "modified": ""}
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let wordpress = wordpress_for(&server, None);
    let news = wordpress
        .posts()
        .query(json!({"postType": "news", "page": 2}))
        .unwrap();
    news.promise().unwrap().await.unwrap();

    let posts: Vec<Post> = news.as_collection().unwrap().deserialize().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title.as_deref(), Some("Launch"));
    assert_eq!(posts[0].post_type.as_deref(), Some("news"));
    assert_eq!(posts[0].author.as_ref().and_then(|a| a.name.as_deref()), Some("Editor"));
    assert_eq!(posts[0].terms_of("category")[0].slug.as_deref(), Some("company"));
    assert!(posts[0].date.is_some());
    assert!(posts[1].modified.is_none());
}

#[tokio::test]
async fn test_page_by_slug() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wordpress/wp-json/pages/about-us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ID": 9,
            "title": "About us",
            "slug": "about-us",
            "template": "full-width.php",
            "content": "<p>Hello</p>"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let wordpress = wordpress_for(&server, None);
    let about = wordpress.pages().get(json!({"pageSlug": "about-us"})).unwrap();
    about.promise().unwrap().await.unwrap();

    let page: Page = about.as_entity().unwrap().deserialize().unwrap();
    assert_eq!(page.id, Some(9));
    assert_eq!(page.template.as_deref(), Some("full-width.php"));
}

#[tokio::test]
async fn test_categories_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wordpress/wp-json/taxonomies/category/terms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ID": 1, "name": "News", "slug": "news", "parent": null, "count": 4},
            {"ID": 2, "name": "Press", "slug": "press", "parent": {"ID": 1}, "count": 1}
        ])))
        .mount(&server)
        .await;

    let wordpress = wordpress_for(&server, None);
    let categories = wordpress.categories().query(json!({})).unwrap();
    categories.promise().unwrap().await.unwrap();

    let terms: Vec<Term> = categories.as_collection().unwrap().deserialize().unwrap();
    assert_eq!(terms.len(), 2);
    assert_eq!(terms[0].parent_id(), None);
    assert_eq!(terms[1].parent_id(), Some(1));
}

#[tokio::test]
async fn test_menu_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wordpress/wp-json/menus/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ID": 2,
            "name": "Main",
            "items": [
                {"ID": 10, "parent": 0, "title": "Home", "url": "/"},
                {"ID": 11, "parent": 10, "title": "Blog", "url": "/blog"}
            ]
        })))
        .mount(&server)
        .await;

    let wordpress = wordpress_for(&server, None);
    let main = wordpress.menus().get(json!({"menuId": 2})).unwrap();
    main.promise().unwrap().await.unwrap();

    let menu: Menu = main.as_entity().unwrap().deserialize().unwrap();
    let tree = menu.tree();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children[0].title.as_deref(), Some("Blog"));
}

#[tokio::test]
async fn test_current_user_sends_nonce() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wordpress/wp-json/users/me"))
        .and(header("X-WP-Nonce", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ID": 1,
            "username": "admin",
            "registered": "2020-01-01T00:00:00+00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let wordpress = wordpress_for(&server, Some("abc123"));
    let me = wordpress.current_user().get(json!({})).unwrap();
    me.promise().unwrap().await.unwrap();

    let user: User = me.as_entity().unwrap().deserialize().unwrap();
    assert_eq!(user.username.as_deref(), Some("admin"));
    assert!(user.registered.is_some());
}

// ============================================================================
// Session state
// ============================================================================

async fn auth_status_for(status: u16) -> Result<AuthStatus, WordPressError> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wordpress/wp-json/users/me"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(&server)
        .await;

    wordpress_for(&server, None).auth_status().await
}

#[tokio::test]
async fn test_auth_status_redirect_is_authenticated() {
    assert_eq!(auth_status_for(302).await.unwrap(), AuthStatus::Authenticated);
}

#[tokio::test]
async fn test_auth_status_success_is_authenticated() {
    assert_eq!(auth_status_for(200).await.unwrap(), AuthStatus::Authenticated);
}

#[tokio::test]
async fn test_auth_status_forbidden_is_anonymous() {
    assert_eq!(auth_status_for(403).await.unwrap(), AuthStatus::Anonymous);
    assert_eq!(auth_status_for(401).await.unwrap(), AuthStatus::Anonymous);
}

#[tokio::test]
async fn test_auth_status_server_error_is_reported() {
    let error = auth_status_for(500).await.unwrap_err();
    match error {
        WordPressError::Resource(e) => assert_eq!(e.status(), Some(500)),
        WordPressError::Config(e) => panic!("unexpected error: {e}"),
    }
}
