//! Integration tests for the discount configuration API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p seagrape-server)
//!
//! Run with: cargo test -p seagrape-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use seagrape_integration_tests::{fresh_shop_id, shop_url};

async fn replace_config(client: &Client, shop_id: &str, body: Value) -> reqwest::Response {
    client
        .post(shop_url(shop_id))
        .json(&body)
        .send()
        .await
        .expect("Failed to POST configuration")
}

async fn fetch_config(client: &Client, shop_id: &str) -> Value {
    let resp = client
        .get(shop_url(shop_id))
        .send()
        .await
        .expect("Failed to GET configuration");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse envelope")
}

fn group_names(envelope: &Value) -> Vec<String> {
    envelope["data"]["groups"]
        .as_array()
        .expect("groups should be an array")
        .iter()
        .map(|g| g["group"].as_str().expect("group name").to_owned())
        .collect()
}

fn product_ids(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("product list should be an array")
        .iter()
        .map(|p| p["productId"].as_str().expect("productId").to_owned())
        .collect()
}

// ============================================================================
// Fetch & Replace
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_replace_then_fetch_round_trip() {
    let client = Client::new();
    let shop = fresh_shop_id();

    let resp = replace_config(
        &client,
        &shop,
        json!({
            "groups": [
                {"group": "VIP", "percentage": 20},
                {"group": "Wholesale", "percentage": 35.5}
            ],
            "excludedProducts": ["p-excluded"]
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let envelope = fetch_config(&client, &shop).await;
    assert_eq!(envelope["success"], true);
    assert_eq!(group_names(&envelope), vec!["VIP", "Wholesale"]);
    assert_eq!(
        product_ids(&envelope["data"]["excludedProducts"]),
        vec!["p-excluded"]
    );
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_fetch_unknown_shop_returns_empty_without_persisting() {
    let client = Client::new();
    let shop = fresh_shop_id();

    let envelope = fetch_config(&client, &shop).await;
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["message"], "No configuration found for this shop");
    assert_eq!(envelope["data"]["groups"], json!([]));
    assert_eq!(envelope["data"]["excludedProducts"], json!([]));

    // Reads never materialize a record: a targeted mutation still 404s
    let resp = client
        .delete(format!("{}/group/{}", shop_url(&shop), uuid::Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to DELETE group");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_duplicate_group_names_rejected_and_state_untouched() {
    let client = Client::new();
    let shop = fresh_shop_id();

    let resp = replace_config(
        &client,
        &shop,
        json!({"groups": [{"group": "Members", "percentage": 5}]}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Same name under case-insensitive comparison
    let resp = replace_config(
        &client,
        &shop,
        json!({
            "groups": [
                {"group": "VIP", "percentage": 10},
                {"group": "vip", "percentage": 20}
            ]
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: Value = resp.json().await.expect("envelope");
    assert_eq!(envelope["success"], false);
    assert_eq!(
        envelope["errors"][0],
        "Duplicate group names are not allowed"
    );

    // Prior state untouched
    let envelope = fetch_config(&client, &shop).await;
    assert_eq!(group_names(&envelope), vec!["Members"]);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_percentage_boundaries() {
    let client = Client::new();
    let shop = fresh_shop_id();

    let resp = replace_config(
        &client,
        &shop,
        json!({
            "groups": [
                {"group": "Zero", "percentage": 0},
                {"group": "Full", "percentage": 100}
            ]
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    for (name, percentage) in [("Negative", -1), ("Over", 101)] {
        let resp = replace_config(
            &client,
            &shop,
            json!({"groups": [{"group": name, "percentage": percentage}]}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let envelope: Value = resp.json().await.expect("envelope");
        let message = envelope["errors"][0].as_str().expect("error message");
        assert!(message.contains(name), "error should name the group: {message}");
    }
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_replace_preserves_supplied_group_ids() {
    let client = Client::new();
    let shop = fresh_shop_id();

    let resp = replace_config(
        &client,
        &shop,
        json!({"groups": [{"group": "VIP", "percentage": 10}]}),
    )
    .await;
    let envelope: Value = resp.json().await.expect("envelope");
    let id = envelope["data"]["groups"][0]["id"]
        .as_str()
        .expect("group id")
        .to_owned();

    // Re-submit the same group with its id and a new percentage: same
    // identity, updated value
    let resp = replace_config(
        &client,
        &shop,
        json!({"groups": [{"id": id, "group": "VIP", "percentage": 15}]}),
    )
    .await;
    let envelope: Value = resp.json().await.expect("envelope");
    assert_eq!(envelope["data"]["groups"][0]["id"], id.as_str());
    assert_eq!(envelope["data"]["groups"][0]["percentage"], 15.0);
}

// ============================================================================
// Group deletion
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_delete_group_not_found_vs_noop() {
    let client = Client::new();
    let shop = fresh_shop_id();

    // Unknown shop: 404
    let resp = client
        .delete(format!("{}/group/{}", shop_url(&shop), uuid::Uuid::new_v4()))
        .send()
        .await
        .expect("DELETE");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Existing shop, unknown group id: success with unchanged groups
    replace_config(
        &client,
        &shop,
        json!({"groups": [{"group": "VIP", "percentage": 10}]}),
    )
    .await;

    let resp = client
        .delete(format!("{}/group/{}", shop_url(&shop), uuid::Uuid::new_v4()))
        .send()
        .await
        .expect("DELETE");
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Value = resp.json().await.expect("envelope");
    assert_eq!(group_names(&envelope), vec!["VIP"]);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_delete_group_cascades() {
    let client = Client::new();
    let shop = fresh_shop_id();

    let resp = replace_config(
        &client,
        &shop,
        json!({
            "groups": [{
                "group": "VIP",
                "percentage": 10,
                "discountedProducts": [{"productId": "p1", "title": "Hat"}]
            }]
        }),
    )
    .await;
    let envelope: Value = resp.json().await.expect("envelope");
    let id = envelope["data"]["groups"][0]["id"]
        .as_str()
        .expect("group id")
        .to_owned();

    let resp = client
        .delete(format!("{}/group/{id}", shop_url(&shop)))
        .send()
        .await
        .expect("DELETE");
    assert_eq!(resp.status(), StatusCode::OK);

    let envelope = fetch_config(&client, &shop).await;
    assert_eq!(envelope["data"]["groups"], json!([]));
}

// ============================================================================
// Excluded products
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_replace_excluded_is_full_replace() {
    let client = Client::new();
    let shop = fresh_shop_id();

    let excluded_url = format!("{}/excluded-products", shop_url(&shop));

    let resp = client
        .post(&excluded_url)
        .json(&json!({"excludedProducts": ["p1", "p2"]}))
        .send()
        .await
        .expect("POST excluded");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(&excluded_url)
        .json(&json!({"excludedProducts": ["p3"]}))
        .send()
        .await
        .expect("POST excluded");
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Value = resp.json().await.expect("envelope");

    // Full replace, not union
    assert_eq!(product_ids(&envelope["data"]["excludedProducts"]), vec!["p3"]);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_remove_excluded_product() {
    let client = Client::new();
    let shop = fresh_shop_id();

    // Unknown shop: 404
    let resp = client
        .delete(format!("{}/excluded-product/p1", shop_url(&shop)))
        .send()
        .await
        .expect("DELETE excluded");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    client
        .post(format!("{}/excluded-products", shop_url(&shop)))
        .json(&json!({"excludedProducts": ["p1", "p2"]}))
        .send()
        .await
        .expect("POST excluded");

    let resp = client
        .delete(format!("{}/excluded-product/p1", shop_url(&shop)))
        .send()
        .await
        .expect("DELETE excluded");
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Value = resp.json().await.expect("envelope");
    assert_eq!(product_ids(&envelope["data"]["excludedProducts"]), vec!["p2"]);
}

// ============================================================================
// Group products
// ============================================================================

async fn create_group(client: &Client, shop: &str, name: &str) -> String {
    let resp = replace_config(
        client,
        shop,
        json!({"groups": [{"group": name, "percentage": 10}]}),
    )
    .await;
    let envelope: Value = resp.json().await.expect("envelope");
    envelope["data"]["groups"][0]["id"]
        .as_str()
        .expect("group id")
        .to_owned()
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_add_products_to_group_is_idempotent() {
    let client = Client::new();
    let shop = fresh_shop_id();
    let group_id = create_group(&client, &shop, "VIP").await;

    let products_url = format!("{}/group/{group_id}/products", shop_url(&shop));
    let body = json!({"products": [{"productId": "p1", "title": "Hat"}]});

    for _ in 0..2 {
        let resp = client
            .post(&products_url)
            .json(&body)
            .send()
            .await
            .expect("POST products");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let envelope = fetch_config(&client, &shop).await;
    assert_eq!(
        product_ids(&envelope["data"]["groups"][0]["discountedProducts"]),
        vec!["p1"]
    );
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_add_products_requires_id_and_title() {
    let client = Client::new();
    let shop = fresh_shop_id();
    let group_id = create_group(&client, &shop, "VIP").await;

    let resp = client
        .post(format!("{}/group/{group_id}/products", shop_url(&shop)))
        .json(&json!({"products": [{"productId": "p1"}]}))
        .send()
        .await
        .expect("POST products");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_concurrent_adds_are_both_reflected() {
    let client = Client::new();
    let shop = fresh_shop_id();
    let group_id = create_group(&client, &shop, "VIP").await;

    let products_url = format!("{}/group/{group_id}/products", shop_url(&shop));

    let add = |id: &'static str| {
        let client = client.clone();
        let url = products_url.clone();
        async move {
            client
                .post(url)
                .json(&json!({"products": [{"productId": id, "title": id}]}))
                .send()
                .await
                .expect("POST products")
                .status()
        }
    };

    let (a, b) = tokio::join!(add("p-left"), add("p-right"));
    assert_eq!(a, StatusCode::OK);
    assert_eq!(b, StatusCode::OK);

    let envelope = fetch_config(&client, &shop).await;
    let mut ids = product_ids(&envelope["data"]["groups"][0]["discountedProducts"]);
    ids.sort();
    assert_eq!(ids, vec!["p-left", "p-right"]);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_remove_product_from_group() {
    let client = Client::new();
    let shop = fresh_shop_id();
    let group_id = create_group(&client, &shop, "VIP").await;

    client
        .post(format!("{}/group/{group_id}/products", shop_url(&shop)))
        .json(&json!({"products": [
            {"productId": "p1", "title": "Hat"},
            {"productId": "p2", "title": "Scarf"}
        ]}))
        .send()
        .await
        .expect("POST products");

    let resp = client
        .delete(format!("{}/group/{group_id}/product/p1", shop_url(&shop)))
        .send()
        .await
        .expect("DELETE product");
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Value = resp.json().await.expect("envelope");
    assert_eq!(
        product_ids(&envelope["data"]["groups"][0]["discountedProducts"]),
        vec!["p2"]
    );
}

// ============================================================================
// Sync
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_sync_requires_token_and_shop_id() {
    let client = Client::new();
    let sync_url = format!(
        "{}/api/group-discount/sync",
        seagrape_integration_tests::base_url()
    );

    // Missing token
    let resp = client
        .post(&sync_url)
        .json(&json!({"shopId": fresh_shop_id(), "groups": [], "excludedProducts": []}))
        .send()
        .await
        .expect("POST sync");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Missing shopId
    let resp = client
        .post(format!("{sync_url}?token=shpat_test"))
        .json(&json!({"groups": [], "excludedProducts": []}))
        .send()
        .await
        .expect("POST sync");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
