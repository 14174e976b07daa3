pub mod collection;
pub mod commission;
pub mod dashboard;
pub mod gateways;
pub mod metrics;
pub mod notifier;
pub mod payouts;
pub mod referrals;
pub mod store;
pub mod transactions;
pub mod users;
pub mod webhooks;

use std::sync::Arc;
use std::time::Duration;

pub use collection::{Collection, Placement, Singleton};
pub use commission::CommissionService;
pub use dashboard::DashboardService;
pub use gateways::GatewayService;
pub use metrics::{get_metrics, init_metrics};
pub use notifier::{Notice, NoticeBoard, Notifier, RecentLog};
pub use payouts::PayoutService;
pub use referrals::ReferralService;
pub use store::{KeyValueStore, MemoryStore, RedisStore, StoreError};
pub use transactions::{PaymentSimulation, TransactionService};
pub use users::Directory;
pub use webhooks::WebhookService;

use crate::models::{CommissionSettings, Merchant, PaymentGateway, User};

/// Notices kept for `GET /notices`.
pub const NOTICE_CAPACITY: usize = 50;

/// Timing knobs for the simulated processor.
#[derive(Debug, Clone, Copy)]
pub struct SimulationSettings {
    pub payment: PaymentSimulation,
    pub gateway_test_delay: Duration,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            payment: PaymentSimulation::default(),
            gateway_test_delay: Duration::from_millis(2000),
        }
    }
}

/// Every portal service, wired to one store and one notice board.
#[derive(Clone)]
pub struct PortalState {
    pub store: Arc<dyn KeyValueStore>,
    pub notices: Arc<NoticeBoard>,
    pub gateways: GatewayService,
    pub webhooks: WebhookService,
    pub transactions: TransactionService,
    pub payouts: PayoutService,
    pub users: Directory<User>,
    pub managers: Directory<User>,
    pub merchants: Directory<Merchant>,
    pub commission: CommissionService,
    pub referrals: ReferralService,
    pub dashboard: DashboardService,
}

impl PortalState {
    /// Load every collection from `store`, seeding defaults for absent keys.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        simulation: SimulationSettings,
    ) -> Result<Self, StoreError> {
        let notices = Arc::new(NoticeBoard::new(NOTICE_CAPACITY));
        let notifier: Arc<dyn Notifier> = notices.clone();

        let gateways = Arc::new(
            Collection::load(gateways::GATEWAYS_KEY, store.clone(), PaymentGateway::defaults)
                .await?,
        );
        let webhooks =
            Arc::new(Collection::load(webhooks::WEBHOOKS_KEY, store.clone(), Vec::new).await?);
        let transactions = Arc::new(
            Collection::load(transactions::TRANSACTIONS_KEY, store.clone(), Vec::new).await?,
        );
        let payouts =
            Arc::new(Collection::load(payouts::PAYOUTS_KEY, store.clone(), Vec::new).await?);
        let users = Arc::new(Collection::load(users::USERS_KEY, store.clone(), Vec::new).await?);
        let managers =
            Arc::new(Collection::load(users::MANAGERS_KEY, store.clone(), Vec::new).await?);
        let merchants =
            Arc::new(Collection::load(users::MERCHANTS_KEY, store.clone(), Vec::new).await?);
        let referrals =
            Arc::new(Collection::load(referrals::REFERRALS_KEY, store.clone(), Vec::new).await?);
        let commission = Arc::new(
            Singleton::load(
                commission::COMMISSION_KEY,
                store.clone(),
                CommissionSettings::default,
            )
            .await?,
        );

        let webhook_service = WebhookService::new(
            webhooks.clone(),
            Arc::new(RecentLog::new(webhooks::DELIVERY_LOG_CAPACITY)),
            notifier.clone(),
        );

        tracing::info!("Portal state loaded");

        Ok(Self {
            gateways: GatewayService::new(
                gateways.clone(),
                notifier.clone(),
                simulation.gateway_test_delay,
            ),
            transactions: TransactionService::new(
                transactions.clone(),
                webhook_service.clone(),
                notifier.clone(),
                simulation.payment,
            ),
            webhooks: webhook_service,
            payouts: PayoutService::new(payouts.clone(), notifier.clone()),
            users: Directory::new("User", users, notifier.clone()),
            managers: Directory::new("Manager", managers, notifier.clone()),
            merchants: Directory::new("Merchant", merchants.clone(), notifier.clone()),
            commission: CommissionService::new(commission, notifier.clone()),
            referrals: ReferralService::new(referrals, merchants, notifier),
            dashboard: DashboardService::new(gateways, webhooks, transactions, payouts),
            store,
            notices,
        })
    }
}
