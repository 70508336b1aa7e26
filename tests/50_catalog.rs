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
async fn category_list_with_counts_and_sub_categories() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let payload = get_json(&format!("{}/api/catalog/categories", server.base_url)).await?;
    let data = payload["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(data.len(), 2);

    // Name ascending: Design, then Development.
    assert_eq!(data[0]["name"], json!("Design"));
    assert_eq!(data[0]["available_course_count"], json!(1));
    assert_eq!(data[1]["name"], json!("Development"));
    assert_eq!(data[1]["available_course_count"], json!(2));
    assert_eq!(data[1]["sub_category"].as_array().unwrap().len(), 2);

    // Projection applies here too, including into the nested list.
    let payload = get_json(&format!(
        "{}/api/catalog/categories?fields=name,sub_category__name",
        server.base_url
    ))
    .await?;
    let first = payload["data"][0].as_object().unwrap();
    assert_eq!(first.keys().collect::<Vec<_>>(), vec!["name", "sub_category"]);
    for sub in first["sub_category"].as_array().unwrap() {
        assert_eq!(sub.as_object().unwrap().keys().collect::<Vec<_>>(), vec!["name"]);
    }

    Ok(())
}

#[tokio::test]
async fn sub_category_list_scoped_to_a_category() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let categories = get_json(&format!(
        "{}/api/catalog/categories?fields=id,name",
        server.base_url
    ))
    .await?;
    let design_id = categories["data"][0]["id"].as_str().unwrap().to_string();

    let payload = get_json(&format!(
        "{}/api/catalog/sub-categories?category={}",
        server.base_url, design_id
    ))
    .await?;
    let data = payload["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], json!("UI Design"));
    assert_eq!(data[0]["category_name"], json!("Design"));

    Ok(())
}

#[tokio::test]
async fn seller_list_carries_storefront_aggregates() -> Result<()> {
    let server = common::spawn_demo_app().await?;

    let payload = get_json(&format!("{}/api/sellers", server.base_url)).await?;
    let data = payload["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);

    // Name ascending: Amy before Raj.
    let amy = data[0].as_object().unwrap();
    assert_eq!(amy["user_first_name"], json!("Amy"));
    assert_eq!(amy["courses_count"], json!(2));
    // Reviews across Amy's two courses: 5,5,4,5 and 4,4,3.
    assert_eq!(amy["ratings"]["total_reviews_count"], json!(7));
    assert_eq!(amy["ratings"]["total_rating"], json!(4.29));
    // One enrollment per Amy course in the demo data.
    assert_eq!(amy["student_count"], json!(2));

    // Detail by owning user id, with projection.
    let seller_id = amy["seller_id"].as_str().unwrap();
    let detail = get_json(&format!(
        "{}/api/sellers/{}?fields=designation,ratings",
        server.base_url, seller_id
    ))
    .await?;
    let fields = detail["data"].as_object().unwrap();
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["designation", "ratings"]);

    let res = reqwest::get(format!(
        "{}/api/sellers/00000000-0000-0000-0000-000000000000",
        server.base_url
    ))
    .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
