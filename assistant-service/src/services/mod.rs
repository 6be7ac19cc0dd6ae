pub mod chat_proxy;
pub mod clock;
pub mod credentials;
pub mod ledger;
pub mod metrics;
pub mod pricing;
pub mod providers;

pub use chat_proxy::{ChatProxy, ChatRequest, ChatResult};
pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::{BudgetLimits, UsageCounter, UsageLedger, UsagePermit, UsageReport};
pub use pricing::{Pricing, TokenUsage};
