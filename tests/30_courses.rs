mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn get_json(url: &str) -> Result<Value> {
    let res = reqwest::get(url).await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "unexpected status: {}", res.status());
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn course_list_projects_only_requested_fields() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let payload =
        get_json(&format!("{}/api/courses?fields=id,title", server.base_url)).await?;
    assert!(payload["success"].as_bool().unwrap_or(false), "success=false: {}", payload);

    let data = payload["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(data.len(), 3);
    for course in &data {
        let keys: Vec<&String> = course.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["id", "title"], "unexpected projection: {}", course);
    }

    Ok(())
}

#[tokio::test]
async fn nested_selection_reaches_into_category_obj() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let payload = get_json(&format!(
        "{}/api/courses?fields=title,category_obj__name&search=Rust",
        server.base_url
    ))
    .await?;
    let data = payload["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(data.len(), 1);

    let course = data[0].as_object().unwrap();
    assert_eq!(course["title"], json!("Rust Web Services from Scratch"));
    let category = course["category_obj"].as_object().unwrap();
    assert_eq!(category.keys().collect::<Vec<_>>(), vec!["name"]);
    assert_eq!(category["name"], json!("Development"));

    Ok(())
}

#[tokio::test]
async fn unrestricted_course_includes_the_full_graph() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let payload =
        get_json(&format!("{}/api/courses?search=Rust", server.base_url)).await?;
    let course = payload["data"][0].clone();

    assert_eq!(course["chapters_count"], json!(2));
    assert_eq!(course["lesson_count"], json!(8));
    // 340 minutes of lessons.
    assert_eq!(course["course_duration"], json!("5:40:0"));
    assert_eq!(course["ratings_obj"]["total_rating"], json!(4.75));
    assert_eq!(course["ratings_obj"]["total_reviews_count"], json!(4));
    assert_eq!(course["seller_obj"]["user_first_name"], json!("Amy"));
    // Published course with complete content is not publishable again.
    assert_eq!(course["is_available_for_published"], json!(false));

    // Chapters and lessons arrive in order_no order.
    let chapters = course["chapters"].as_array().unwrap();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0]["order_no"], json!(1));
    assert_eq!(chapters[1]["order_no"], json!(2));
    let lessons = chapters[0]["lessons"].as_array().unwrap();
    let order: Vec<i64> = lessons.iter().map(|l| l["order_no"].as_i64().unwrap()).collect();
    assert_eq!(order, vec![1, 2, 3, 4]);
    // Anonymous viewers get the no-access marker, never the key.
    for lesson in lessons {
        assert_eq!(lesson["video_obj"], json!({}));
    }

    Ok(())
}

#[tokio::test]
async fn ordering_and_rating_filter() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let payload = get_json(&format!(
        "{}/api/courses?fields=title,sale_price&ordering=-sale_price",
        server.base_url
    ))
    .await?;
    let titles: Vec<String> = payload["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Rust Web Services from Scratch",
            "Interface Design Essentials",
            "Modern Frontend Fundamentals",
        ]
    );

    // Only the 4.75 and 4.0 average courses clear a 4.0 floor.
    let payload =
        get_json(&format!("{}/api/courses?fields=title&rating=4", server.base_url)).await?;
    assert_eq!(payload["data"].as_array().unwrap().len(), 2);

    Ok(())
}

#[tokio::test]
async fn pagination_envelope() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let payload = get_json(&format!(
        "{}/api/courses?fields=id&pagination=true&page=2",
        server.base_url
    ))
    .await?;
    let data = &payload["data"];
    // Page size (15) swallows all three demo courses; page clamps back to 1.
    assert_eq!(data["count"], json!(3));
    assert_eq!(data["links"]["total_pages"], json!(1));
    assert_eq!(data["links"]["current"], json!(1));
    assert_eq!(data["links"]["next"], Value::Null);
    assert_eq!(data["results"].as_array().unwrap().len(), 3);

    Ok(())
}

#[tokio::test]
async fn course_detail_and_missing_course() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let listing =
        get_json(&format!("{}/api/courses?fields=id&search=Rust", server.base_url)).await?;
    let id = listing["data"][0]["id"].as_str().unwrap().to_string();

    let detail = get_json(&format!(
        "{}/api/courses/{}?fields=title,slug_name,sub_category_obj__name",
        server.base_url, id
    ))
    .await?;
    let course = detail["data"].as_object().unwrap();
    assert_eq!(course["title"], json!("Rust Web Services from Scratch"));
    assert_eq!(course["sub_category_obj"]["name"], json!("Systems Programming"));

    let res = reqwest::get(format!(
        "{}/api/courses/00000000-0000-0000-0000-000000000000",
        server.base_url
    ))
    .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn enrolled_buyer_sees_signed_lesson_video() -> Result<()> {
    let server = common::spawn_demo_app().await?;
    let client = reqwest::Client::new();

    let listing =
        get_json(&format!("{}/api/courses?fields=id&search=Rust", server.base_url)).await?;
    let course_id = listing["data"][0]["id"].as_str().unwrap().to_string();

    let chapters = get_json(&format!(
        "{}/api/chapters?course={}&fields=id,order_no",
        server.base_url, course_id
    ))
    .await?;
    let chapter_id = chapters["data"][0]["id"].as_str().unwrap().to_string();

    // Anonymous: empty video object.
    let lessons =
        get_json(&format!("{}/api/lessons?chapter={}", server.base_url, chapter_id)).await?;
    assert_eq!(lessons["data"][0]["video_obj"], json!({}));
    assert_eq!(lessons["data"][0]["duration"], json!("0:25:0"));

    // Enrolled buyer: raw key plus signed URL.
    let token = common::login(&server, "lena@coursemart.test", "password123").await?;
    let res = client
        .get(format!("{}/api/lessons?chapter={}", server.base_url, chapter_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let lessons = res.json::<Value>().await?;
    let video = &lessons["data"][0]["video_obj"];
    assert!(video["url"].as_str().unwrap().starts_with("videos/"));
    assert!(video["key"].as_str().unwrap().starts_with("https://media.test/"));

    // A buyer who never enrolled stays locked out.
    let token = common::login(&server, "tom@coursemart.test", "password123").await?;
    let res = client
        .get(format!("{}/api/lessons?chapter={}", server.base_url, chapter_id))
        .bearer_auth(&token)
        .send()
        .await?;
    let lessons = res.json::<Value>().await?;
    assert_eq!(lessons["data"][0]["video_obj"], json!({}));

    Ok(())
}

#[tokio::test]
async fn chapter_list_requires_an_existing_course() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let res = reqwest::get(format!(
        "{}/api/chapters?course=00000000-0000-0000-0000-000000000000",
        server.base_url
    ))
    .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
