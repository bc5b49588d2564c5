//! Scheduled background work
//!
//! Currently just the market poll cadence. The scheduler only emits ticks;
//! whether a tick turns into a request is decided by the market panel, which
//! skips ticks while a poll is still in flight.

mod market_poll;

pub use market_poll::MarketPollScheduler;
