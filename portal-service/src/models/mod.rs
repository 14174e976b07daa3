//! Domain records held by the portal.
//!
//! Every collection entry carries a generated string id and is edited through
//! a shallow-merge patch: fields left out of the patch keep their value.

pub mod commission;
pub mod gateway;
pub mod payout;
pub mod referral;
pub mod transaction;
pub mod user;
pub mod webhook;

use serde::{de::DeserializeOwned, Serialize};

pub use commission::CommissionSettings;
pub use gateway::{GatewayKind, GatewayPatch, PaymentGateway};
pub use payout::{Payout, PayoutPatch, PayoutStatus};
pub use referral::{Referral, ReferralPatch, ReferralStatus};
pub use transaction::{Transaction, TransactionPatch, TransactionStatus};
pub use user::{KycData, KycStatus, Merchant, MerchantPatch, User, UserPatch};
pub use webhook::{Webhook, WebhookDelivery, WebhookEvent, WebhookPatch};

/// An entry in a persisted collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Partial update accepted by [`Record::apply`].
    type Patch: Send;

    fn id(&self) -> &str;

    /// Shallow merge: copy every field present in `patch` onto `self`.
    fn apply(&mut self, patch: Self::Patch);
}

/// Fresh record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
