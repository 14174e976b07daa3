use serde::{Deserialize, Serialize};

use super::GatewayKind;

/// Platform-wide commission rates. A single record, replaced as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSettings {
    pub payu_percentage: f64,
    pub platform_payments_percentage: f64,
    pub fixed_fee: f64,
    pub default_currency: String,
}

impl Default for CommissionSettings {
    fn default() -> Self {
        Self {
            payu_percentage: 2.0,
            platform_payments_percentage: 2.5,
            fixed_fee: 0.30,
            default_currency: "INR".to_string(),
        }
    }
}

impl CommissionSettings {
    /// Percentage charged by `gateway`; unknown gateways carry none.
    pub fn percentage_for(&self, gateway: &str) -> f64 {
        match GatewayKind::from_name(gateway) {
            GatewayKind::PayU => self.payu_percentage,
            GatewayKind::PlatformPayments => self.platform_payments_percentage,
            GatewayKind::Other => 0.0,
        }
    }

    /// Commission on `amount`: the gateway percentage plus the fixed fee.
    pub fn commission_on(&self, gateway: &str, amount: f64) -> f64 {
        amount * self.percentage_for(gateway) / 100.0 + self.fixed_fee
    }
}
