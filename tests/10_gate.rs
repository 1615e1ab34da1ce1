mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use catalog_admin::session::{Session, SessionLookup};
use common::{location, test_app, StubProvider};

async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Result<axum::response::Response> {
    let mut builder = Request::builder().uri(path).header("host", "catalog.test");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    Ok(app.clone().oneshot(builder.body(Body::empty())?).await?)
}

async fn json_body(response: axum::response::Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn public_paths_never_contact_the_provider() -> Result<()> {
    let provider = Arc::new(StubProvider::standard());
    let app = test_app(provider.clone())?;

    for path in ["/login", "/unauthorized", "/"] {
        let res = get(&app, path, Some("session=admin")).await?;
        assert_eq!(res.status(), StatusCode::OK, "path {}", path);
    }

    // Outside the protected areas, including look-alike prefixes
    let res = get(&app, "/administrator", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    assert_eq!(provider.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn missing_session_redirects_to_login() -> Result<()> {
    let provider = Arc::new(
        StubProvider::standard()
            .answer("session=broken", SessionLookup::Rejected(500))
            .answer("session=garbage", SessionLookup::Malformed("expected value".into()))
            .answer("session=down", SessionLookup::Transport("connection refused".into()))
            .answer("session=late", SessionLookup::Timeout),
    );
    let app = test_app(provider)?;

    for cookie in [None, Some("session=nobody"), Some("session=broken"), Some("session=garbage"), Some("session=down"), Some("session=late")] {
        let res = get(&app, "/admin/dashboard", cookie).await?;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "cookie {:?}", cookie);
        assert_eq!(location(&res), Some("/login"), "cookie {:?}", cookie);
    }
    Ok(())
}

#[tokio::test]
async fn admin_area_admits_admins_only() -> Result<()> {
    let provider = Arc::new(
        StubProvider::standard().answer("session=editor", SessionLookup::Found(Session::with_role("e1", "EDITOR"))),
    );
    let app = test_app(provider)?;

    let res = get(&app, "/admin", Some("session=admin")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = get(&app, "/admin", Some("session=user")).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), Some("/unauthorized"));

    let res = get(&app, "/admin", Some("session=editor")).await?;
    assert_eq!(location(&res), Some("/unauthorized"));
    Ok(())
}

#[tokio::test]
async fn protected_area_admits_users_only() -> Result<()> {
    let provider = Arc::new(StubProvider::standard());
    let app = test_app(provider)?;

    let res = get(&app, "/protected/profile", Some("session=user")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await?;
    assert_eq!(body["id"], "user-1");
    assert_eq!(body["role"], "USER");

    let res = get(&app, "/protected/profile", Some("session=admin")).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), Some("/unauthorized"));
    Ok(())
}

#[tokio::test]
async fn collections_page_follows_the_admin_rule() -> Result<()> {
    let provider = Arc::new(StubProvider::standard());
    let app = test_app(provider)?;

    let res = get(&app, "/admin/collections", Some("session=admin")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await?;
    assert_eq!(body["title"], "Collections");
    assert_eq!(body["resource"], "/api/admin/collections");
    assert_eq!(body["sidebar"]["showLogo"], true);
    let active: Vec<&str> = body["sidebar"]["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|item| item["isActive"] == true)
                .filter_map(|item| item["title"].as_str())
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(active, vec!["Collections"]);

    let res = get(&app, "/admin/collections", Some("session=user")).await?;
    assert_eq!(location(&res), Some("/unauthorized"));
    Ok(())
}

#[tokio::test]
async fn profile_without_cookie_redirects_to_login() -> Result<()> {
    let provider = Arc::new(StubProvider::standard());
    let app = test_app(provider.clone())?;

    let res = get(&app, "/protected/profile", None).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), Some("/login"));
    assert_eq!(provider.calls(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn repeated_requests_within_ttl_hit_the_cache() -> Result<()> {
    let provider = Arc::new(StubProvider::standard());
    let app = test_app(provider.clone())?;

    let first = get(&app, "/admin/dashboard", Some("session=admin")).await?;
    tokio::time::advance(Duration::from_millis(4_000)).await;
    let second = get(&app, "/admin/dashboard", Some("session=admin")).await?;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(provider.calls(), 1);

    // Denials are cached the same way
    let first = get(&app, "/admin/dashboard", Some("session=user")).await?;
    let second = get(&app, "/admin/dashboard", Some("session=user")).await?;
    assert_eq!(location(&first), Some("/unauthorized"));
    assert_eq!(location(&second), Some("/unauthorized"));
    assert_eq!(provider.calls(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn requests_after_ttl_fetch_again() -> Result<()> {
    let provider = Arc::new(StubProvider::standard());
    let app = test_app(provider.clone())?;

    get(&app, "/admin/dashboard", Some("session=admin")).await?;
    tokio::time::advance(Duration::from_millis(5_001)).await;
    let res = get(&app, "/admin/dashboard", Some("session=admin")).await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(provider.calls(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cache_is_keyed_by_cookie_and_path() -> Result<()> {
    let provider = Arc::new(StubProvider::standard());
    let app = test_app(provider.clone())?;

    get(&app, "/admin/dashboard", Some("session=admin")).await?;
    get(&app, "/admin/collections", Some("session=admin")).await?;
    get(&app, "/admin/dashboard", Some("session=user")).await?;

    assert_eq!(provider.calls(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out_and_is_cancelled() -> Result<()> {
    let provider = Arc::new(StubProvider::standard().delayed(Duration::from_millis(4_000)));
    let app = test_app(provider.clone())?;

    let res = get(&app, "/admin/dashboard", Some("session=admin")).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), Some("/login"));

    // Past the point where the lookup would have finished
    tokio::time::sleep(Duration::from_millis(2_000)).await;
    assert_eq!(provider.calls(), 1);
    assert_eq!(provider.completed(), 0);
    Ok(())
}

#[tokio::test]
async fn catalog_api_rejects_non_admin_callers() -> Result<()> {
    let provider = Arc::new(StubProvider::standard());
    let app = test_app(provider)?;

    for cookie in [None, Some("session=user")] {
        let res = get(&app, "/api/admin/collections", cookie).await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "cookie {:?}", cookie);
        let body = json_body(res).await?;
        assert_eq!(body, serde_json::json!({ "error": "Unauthorized" }));
    }

    let res = get(&app, "/api/admin/categories", None).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_routes_answer_with_error_envelope() -> Result<()> {
    let provider = Arc::new(StubProvider::standard());
    let app = test_app(provider)?;

    let res = get(&app, "/nowhere", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = json_body(res).await?;
    assert_eq!(body["error"], "Not found");
    Ok(())
}
