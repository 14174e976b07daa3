//! Request and response bodies for the HTTP API. Field names are camelCase
//! on the wire.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::webhook::EVENT_ALL;
use crate::models::{PaymentGateway, PayoutStatus};
use crate::services::payouts::{NewPayout, PayoutFilter};
use crate::services::transactions::{NewTransaction, TransactionFilter};
use crate::services::webhooks::NewWebhook;

fn default_true() -> bool {
    true
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn default_payout_currency() -> String {
    "USD".to_string()
}

/// Keep the last four characters of a credential and mask the rest.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

/// A gateway as shown to operators: credentials masked.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayView {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_secret: Option<String>,
    pub currency: String,
    pub credentials_complete: bool,
}

impl From<PaymentGateway> for GatewayView {
    fn from(gateway: PaymentGateway) -> Self {
        Self {
            credentials_complete: gateway.credentials_complete(),
            api_key: mask_secret(&gateway.api_key),
            salt: gateway.salt.as_deref().map(mask_secret),
            key_secret: gateway.key_secret.as_deref().map(mask_secret),
            id: gateway.id,
            name: gateway.name,
            is_active: gateway.is_active,
            merchant_id: gateway.merchant_id,
            currency: gateway.currency,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookRequest {
    #[serde(default)]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Webhook URL is required"))]
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<CreateWebhookRequest> for NewWebhook {
    fn from(req: CreateWebhookRequest) -> Self {
        let events = if req.events.is_empty() {
            vec![EVENT_ALL.to_string()]
        } else {
            req.events
        };
        Self {
            name: req.name,
            url: req.url.trim().to_string(),
            secret: req.secret,
            events,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SecretResponse {
    pub secret: String,
}

/// Body of `POST /payments` and `POST /transactions`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero"))]
    pub amount: f64,
    #[validate(length(min = 1, message = "Currency is required"))]
    pub currency: String,
    #[serde(default)]
    pub gateway: String,
    pub customer_id: Option<String>,
    pub description: Option<String>,
}

impl From<PaymentRequest> for NewTransaction {
    fn from(req: PaymentRequest) -> Self {
        Self {
            amount: req.amount,
            currency: req.currency,
            gateway: req.gateway,
            customer_id: req.customer_id,
            description: req.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub gateway: Option<String>,
}

impl From<TransactionQuery> for TransactionFilter {
    fn from(query: TransactionQuery) -> Self {
        Self {
            search: query.search,
            status: query.status,
            gateway: query.gateway,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayoutRequest {
    #[validate(length(min = 1, message = "Beneficiary name is required"))]
    pub beneficiary_name: String,
    #[validate(length(min = 1, message = "Account number is required"))]
    pub account_number: String,
    #[serde(default)]
    pub ifsc_code: String,
    #[serde(default)]
    pub bank_name: String,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero"))]
    pub amount: f64,
    #[serde(default = "default_payout_currency")]
    pub currency: String,
    #[serde(default)]
    pub description: String,
}

impl From<CreatePayoutRequest> for NewPayout {
    fn from(req: CreatePayoutRequest) -> Self {
        Self {
            beneficiary_name: req.beneficiary_name,
            account_number: req.account_number,
            ifsc_code: req.ifsc_code,
            bank_name: req.bank_name,
            amount: req.amount,
            currency: req.currency,
            description: req.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PayoutQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl From<PayoutQuery> for PayoutFilter {
    fn from(query: PayoutQuery) -> Self {
        Self {
            search: query.search,
            status: query.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PayoutStatusRequest {
    pub status: PayoutStatus,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMerchantRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub website: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferralRequest {
    #[validate(length(min = 1, message = "Referrer is required"))]
    pub referrer_id: String,
    #[validate(email(message = "Invalid email format"))]
    pub referred_email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub gateway: String,
    pub amount: f64,
}
