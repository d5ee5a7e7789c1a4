mod common;

use std::sync::Arc;

use warp::http::{header, StatusCode};

use kakehashi::provider::{GitHubEndpoints, GitHubProvider};

use common::{query_param, server, MockProvider};

fn location(res: &warp::http::Response<warp::hyper::body::Bytes>) -> String {
    res.headers()[header::LOCATION].to_str().unwrap().to_string()
}

fn body(res: &warp::http::Response<warp::hyper::body::Bytes>) -> String {
    String::from_utf8(res.body().to_vec()).unwrap()
}

#[tokio::test]
async fn login_redirects_to_github() {
    let github = GitHubProvider::new(reqwest::Client::new(), GitHubEndpoints::github().unwrap());
    let routes = server(Arc::new(github), "https://api.github.com").routes();

    let res = warp::test::request()
        .path("/login?clientId=abc123")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = location(&res);
    assert!(location.starts_with("https://github.com/login/oauth/authorize?"));
    assert_eq!(query_param(&location, "client_id").as_deref(), Some("abc123"));
    assert_eq!(query_param(&location, "scope").as_deref(), Some("public_repo"));
    assert!(query_param(&location, "state").is_some());
}

#[tokio::test]
async fn login_errors_are_bad_requests() {
    let routes = server(Arc::new(MockProvider), "https://api.github.com").routes();

    let res = warp::test::request().path("/login").reply(&routes).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), "The query parameter clientId is required");

    let res = warp::test::request()
        .path("/login?clientId=53535235")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), "no configuration found for client 53535235");

    let res = warp::test::request()
        .method("POST")
        .path("/login?clientId=abc123")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), "The POST method is not allowed");
}

#[tokio::test]
async fn callback_forwards_token_once() {
    let routes = server(Arc::new(MockProvider), "https://api.github.com").routes();

    let login = warp::test::request()
        .path("/login?clientId=abc123")
        .reply(&routes)
        .await;
    let state = query_param(&location(&login), "state").unwrap();
    let state: String = url::form_urlencoded::byte_serialize(state.as_bytes()).collect();
    let callback = format!("/auth/callback?code=goodcode&state={}", state);

    let res = warp::test::request().path(&callback).reply(&routes).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "https://app.example.com/done?token=tok_xyz");

    let res = warp::test::request().path(&callback).reply(&routes).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), "State could not be verified");
}

#[tokio::test]
async fn callback_errors_are_bad_requests() {
    let routes = server(Arc::new(MockProvider), "https://api.github.com").routes();

    let res = warp::test::request()
        .path("/auth/callback?code=goodcode&state=invalid_key")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), "State could not be verified");

    let res = warp::test::request()
        .path("/auth/callback?error=access_denied")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), "Authorization was denied by the provider");

    let login = warp::test::request()
        .path("/login?clientId=abc123")
        .reply(&routes)
        .await;
    let state = query_param(&location(&login), "state").unwrap();
    let state: String = url::form_urlencoded::byte_serialize(state.as_bytes()).collect();
    let res = warp::test::request()
        .path(&format!("/auth/callback?code=invalid_code&state={}", state))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), "Code was not accepted by the OAuth provider");
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let routes = server(Arc::new(MockProvider), "https://api.github.com").routes();

    let res = warp::test::request().path("/nope").reply(&routes).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
