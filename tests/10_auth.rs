mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_login_whoami_logout_round_trip() -> Result<()> {
    let server = common::spawn_demo_app().await?;
    let client = reqwest::Client::new();

    // Register a fresh buyer.
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({
            "first_name": "Nora",
            "last_name": "Quinn",
            "email": "nora@coursemart.test",
            "password": "long-enough-pw",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "unexpected status: {}", res.status());
    let payload = res.json::<serde_json::Value>().await?;
    assert!(payload["success"].as_bool().unwrap_or(false), "success=false: {}", payload);
    let token = payload["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(payload["data"]["user"]["roles"], json!(["BUYER"]));

    // The token works against the protected surface.
    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let whoami = res.json::<serde_json::Value>().await?;
    assert_eq!(whoami["data"]["email"], json!("nora@coursemart.test"));

    // Logout revokes it.
    let res = client
        .delete(format!("{}/api/auth/session", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() -> Result<()> {
    let server = common::spawn_demo_app().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({
            "first_name": "Copy",
            "last_name": "Cat",
            "email": "lena@coursemart.test",
            "password": "long-enough-pw",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let server = common::spawn_demo_app().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": "lena@coursemart.test", "password": "nope" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn buyer_cannot_login_to_admin_platform() -> Result<()> {
    let server = common::spawn_demo_app().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({
            "email": "lena@coursemart.test",
            "password": "password123",
            "platform": "SUPER_ADMIN",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The admin account can.
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({
            "email": "admin@coursemart.test",
            "password": "password123",
            "platform": "SUPER_ADMIN",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let server = common::spawn_demo_app().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/auth/whoami", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
