//! Account directories: users, managers and merchants.
//!
//! All three share the same list operations; merchants add KYC submission.

use std::sync::Arc;

use chrono::Utc;
use service_core::error::AppError;

use super::collection::{Collection, Placement};
use super::notifier::{Notice, Notifier};
use crate::models::user::{ROLE_CUSTOMER, ROLE_MANAGER, ROLE_MERCHANT};
use crate::models::{new_id, KycData, KycStatus, Merchant, MerchantPatch, Record, User};

pub const USERS_KEY: &str = "users";
pub const MANAGERS_KEY: &str = "managers";
pub const MERCHANTS_KEY: &str = "merchants";

/// A record that belongs in an account directory.
pub trait Account: Record {
    fn name(&self) -> &str;
    fn email(&self) -> &str;

    /// Case-insensitive substring match; `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name().to_lowercase().contains(needle) || self.email().to_lowercase().contains(needle)
    }
}

impl Account for User {
    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }
}

impl Account for Merchant {
    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.company_name.to_lowercase().contains(needle)
    }
}

pub fn new_user(name: String, email: String, role: Option<String>) -> User {
    User {
        id: new_id(),
        name,
        email,
        role: role
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| ROLE_CUSTOMER.to_string()),
        created_at: Utc::now(),
    }
}

/// Managers always carry the `manager` role unless one is given.
pub fn new_manager(name: String, email: String, role: Option<String>) -> User {
    User {
        role: role
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| ROLE_MANAGER.to_string()),
        ..new_user(name, email, None)
    }
}

pub fn new_merchant(name: String, email: String, company_name: String, website: String) -> Merchant {
    Merchant {
        id: new_id(),
        name,
        email,
        role: ROLE_MERCHANT.to_string(),
        company_name,
        website,
        kyc_status: KycStatus::Pending,
        kyc_data: None,
        created_at: Utc::now(),
    }
}

pub struct Directory<T> {
    label: &'static str,
    accounts: Arc<Collection<T>>,
    notifier: Arc<dyn Notifier>,
}

impl<T> Clone for Directory<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            accounts: self.accounts.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<T: Account> Directory<T> {
    /// `label` is the singular noun used in notices, e.g. "User".
    pub fn new(label: &'static str, accounts: Arc<Collection<T>>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            label,
            accounts,
            notifier,
        }
    }

    /// Accounts whose name or email contains `search`, ignoring case.
    /// A blank search returns every account.
    pub async fn list(&self, search: Option<&str>) -> Vec<T> {
        let needle = search.map(str::trim).unwrap_or_default().to_lowercase();
        self.accounts
            .all()
            .await
            .into_iter()
            .filter(|account| needle.is_empty() || account.matches(&needle))
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<T, AppError> {
        self.accounts
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found(self.label))
    }

    pub async fn add(&self, account: T) -> Result<T, AppError> {
        let account = self.accounts.insert(account, Placement::Back).await?;

        tracing::info!(
            key = self.accounts.key(),
            account_id = %account.id(),
            "Account added"
        );
        self.notifier.notify(Notice::info(
            format!("{} Added", self.label),
            format!("{} has been added.", account.name()),
        ));
        Ok(account)
    }

    pub async fn update(&self, id: &str, patch: T::Patch) -> Result<T, AppError> {
        let account = self
            .accounts
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(self.label))?;

        tracing::info!(key = self.accounts.key(), account_id = %id, "Account updated");
        self.notifier.notify(Notice::info(
            format!("{} Updated", self.label),
            format!("{} has been updated.", account.name()),
        ));
        Ok(account)
    }

    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        if self.accounts.remove(id).await? == 0 {
            return Err(AppError::not_found(self.label));
        }

        tracing::info!(key = self.accounts.key(), account_id = %id, "Account removed");
        self.notifier.notify(Notice::info(
            format!("{} Deleted", self.label),
            format!("{} has been removed.", self.label),
        ));
        Ok(())
    }
}

impl Directory<Merchant> {
    /// Store KYC documents and mark the merchant `submitted`.
    pub async fn submit_kyc(&self, id: &str, kyc: KycData) -> Result<Merchant, AppError> {
        let patch = MerchantPatch {
            kyc_status: Some(KycStatus::Submitted),
            kyc_data: Some(kyc),
            ..Default::default()
        };
        let merchant = self
            .accounts
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(self.label))?;

        tracing::info!(merchant_id = %id, "KYC submitted");
        self.notifier.notify(Notice::info(
            "KYC Submitted",
            "KYC documents have been submitted for verification.",
        ));
        Ok(merchant)
    }
}
