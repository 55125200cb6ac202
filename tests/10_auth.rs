mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

#[tokio::test]
async fn root_endpoint_is_public() -> Result<()> {
    let res = common::app().oneshot(common::get("/")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = common::read_json(res).await;
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "portal API");
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_token() -> Result<()> {
    for uri in ["/users", "/institutes"] {
        let res = common::app().oneshot(common::get(uri)).await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");

        let body = common::read_json(res).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["message"], "Unauthorized access");
    }
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_garbage_token() -> Result<()> {
    let request = Request::builder()
        .method("GET")
        .uri("/users")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())?;

    let res = common::app().oneshot(request).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn refresh_requires_bearer_token() -> Result<()> {
    let request = Request::builder()
        .method("POST")
        .uri("/refreshToken")
        .body(Body::empty())?;

    let res = common::app().oneshot(request).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_without_credentials_is_unauthorized() -> Result<()> {
    let request = common::json_request(
        "POST",
        "/login",
        serde_json::json!({"email": "adnan@example.com"}),
        false,
    );

    let res = common::app().oneshot(request).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = common::read_json(res).await;
    assert_eq!(body["status"], 401);
    Ok(())
}
