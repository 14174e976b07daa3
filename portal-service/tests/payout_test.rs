mod common;

use common::TestApp;
use serde_json::json;

async fn create_payout(app: &TestApp, name: &str, amount: f64) -> serde_json::Value {
    let response = app
        .post_json(
            "/payouts",
            &json!({
                "beneficiaryName": name,
                "accountNumber": "001122334455",
                "ifscCode": "HDFC0001234",
                "bankName": "HDFC Bank",
                "amount": amount,
                "description": "Vendor settlement"
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
async fn new_payout_is_pending_with_default_currency() {
    let app = TestApp::spawn().await;

    let payout = create_payout(&app, "Asha Rao", 1500.0).await;
    assert_eq!(payout["status"], "pending");
    assert_eq!(payout["currency"], "USD");
    assert!(payout["processedAt"].is_null());
}

#[tokio::test]
async fn status_change_stamps_and_clears_processed_at() {
    let app = TestApp::spawn().await;
    let payout = create_payout(&app, "Asha Rao", 1500.0).await;
    let id = payout["id"].as_str().unwrap();

    let completed: serde_json::Value = app
        .post_json(
            &format!("/payouts/{}/status", id),
            &json!({ "status": "completed" }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(completed["status"], "completed");
    assert!(completed["processedAt"].is_string());

    let reverted: serde_json::Value = app
        .post_json(
            &format!("/payouts/{}/status", id),
            &json!({ "status": "pending" }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert!(reverted["processedAt"].is_null());
}

#[tokio::test]
async fn payouts_list_newest_first_with_filters() {
    let app = TestApp::spawn().await;
    let first = create_payout(&app, "Asha Rao", 100.0).await;
    let second = create_payout(&app, "Ravi Kumar", 200.0).await;

    let all = app.get_json("/payouts").await;
    assert_eq!(all[0]["id"], second["id"]);
    assert_eq!(all[1]["id"], first["id"]);

    app.post_json(
        &format!("/payouts/{}/status", first["id"].as_str().unwrap()),
        &json!({ "status": "rejected" }),
    )
    .await;

    let rejected = app.get_json("/payouts?status=rejected").await;
    assert_eq!(rejected.as_array().unwrap().len(), 1);

    let ravi = app.get_json("/payouts?search=ravi").await;
    assert_eq!(ravi.as_array().unwrap().len(), 1);
    assert_eq!(ravi[0]["beneficiaryName"], "Ravi Kumar");
}

#[tokio::test]
async fn update_payout_merges_fields() {
    let app = TestApp::spawn().await;
    let payout = create_payout(&app, "Asha Rao", 100.0).await;

    let updated: serde_json::Value = app
        .patch_json(
            &format!("/payouts/{}", payout["id"].as_str().unwrap()),
            &json!({ "bankName": "SBI" }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["bankName"], "SBI");
    assert_eq!(updated["beneficiaryName"], "Asha Rao");
}

#[tokio::test]
async fn payout_requires_beneficiary() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/payouts",
            &json!({ "beneficiaryName": "", "accountNumber": "1", "amount": 10 }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 422);
}
