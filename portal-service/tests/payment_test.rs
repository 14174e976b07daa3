mod common;

use common::TestApp;
use serde_json::json;

fn payment() -> serde_json::Value {
    json!({
        "amount": 499.99,
        "currency": "INR",
        "gateway": "PayU",
        "customerId": "cust_001",
        "description": "Annual plan"
    })
}

#[tokio::test]
async fn approved_payment_completes_and_notifies_webhooks() {
    let app = TestApp::spawn_with_success_rate(1.0).await;
    app.post_json(
        "/webhooks",
        &json!({
            "name": "success only",
            "url": "https://example.com/ok",
            "secret": "whsec_test",
            "events": ["payment.success"]
        }),
    )
    .await;
    app.post_json(
        "/webhooks",
        &json!({ "url": "https://example.com/failed", "events": ["payment.failed"] }),
    )
    .await;

    let response = app.post_json("/payments", &payment()).await;
    assert!(response.status().is_success());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["success"], true);
    assert!(outcome.get("error").is_none());

    let id = outcome["transactionId"].as_str().unwrap();
    let tx = app.get_json(&format!("/transactions/{}", id)).await;
    assert_eq!(tx["status"], "completed");
    assert!(tx["gatewayReference"].as_str().unwrap().starts_with("REF-"));
    assert!(tx["completedAt"].is_string());

    let deliveries = app.get_json("/webhooks/deliveries").await;
    let deliveries = deliveries.as_array().unwrap();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0]["event"], "payment.success");
    assert_eq!(deliveries[0]["url"], "https://example.com/ok");
    assert!(deliveries[0]["signature"].is_string());

    let notices = app.get_json("/notices").await;
    assert_eq!(notices[0]["title"], "Payment Successful");
}

#[tokio::test]
async fn declined_payment_is_marked_failed() {
    let app = TestApp::spawn_with_success_rate(0.0).await;

    let outcome: serde_json::Value = app
        .post_json("/payments", &payment())
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["success"], false);
    assert_eq!(outcome["error"], "Payment declined by issuing bank");

    let id = outcome["transactionId"].as_str().unwrap();
    let tx = app.get_json(&format!("/transactions/{}", id)).await;
    assert_eq!(tx["status"], "failed");
    assert_eq!(tx["error"], "Payment declined by issuing bank");

    let notices = app.get_json("/notices").await;
    assert_eq!(notices[0]["title"], "Payment Failed");
    assert_eq!(notices[0]["variant"], "destructive");
}

#[tokio::test]
async fn invalid_payment_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/payments", &json!({ "amount": -5, "currency": "INR" }))
        .await;
    assert_eq!(response.status().as_u16(), 422);

    let malformed = app
        .client
        .post(app.url("/payments"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status().as_u16(), 400);

    assert_eq!(app.get_json("/transactions").await, json!([]));
}

#[tokio::test]
async fn transactions_filter_by_status_gateway_and_search() {
    let app = TestApp::spawn().await;

    app.post_json("/payments", &payment()).await;
    let pending = app
        .post_json(
            "/transactions",
            &json!({
                "amount": 20,
                "currency": "INR",
                "gateway": "PlatformPayments",
                "description": "Top-up"
            }),
        )
        .await;
    assert_eq!(pending.status().as_u16(), 201);
    let pending: serde_json::Value = pending.json().await.unwrap();
    assert_eq!(pending["status"], "pending");

    let all = app.get_json("/transactions").await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["id"], pending["id"]);

    let completed = app.get_json("/transactions?status=completed").await;
    assert_eq!(completed.as_array().unwrap().len(), 1);

    let platform = app
        .get_json("/transactions?gateway=PlatformPayments&status=all")
        .await;
    assert_eq!(platform.as_array().unwrap().len(), 1);

    let searched = app.get_json("/transactions?search=top").await;
    assert_eq!(searched.as_array().unwrap().len(), 1);

    let gateways = app.get_json("/transactions/gateways").await;
    assert_eq!(gateways, json!(["PlatformPayments", "PayU"]));
}

#[tokio::test]
async fn update_transaction_merges_fields() {
    let app = TestApp::spawn().await;
    let created: serde_json::Value = app
        .post_json(
            "/transactions",
            &json!({ "amount": 20, "currency": "INR", "gateway": "PayU" }),
        )
        .await
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let updated: serde_json::Value = app
        .patch_json(
            &format!("/transactions/{}", id),
            &json!({ "description": "Manual adjustment" }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["description"], "Manual adjustment");
    assert_eq!(updated["amount"], 20.0);
    assert_eq!(updated["status"], "pending");

    let missing = app
        .patch_json("/transactions/nope", &json!({ "description": "x" }))
        .await;
    assert_eq!(missing.status().as_u16(), 404);
}
