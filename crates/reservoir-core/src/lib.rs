//! Resource state machine and economy engine for the Reservoir plugin.
//!
//! Each chat turn spoken by the bound character produces resource up to
//! (and past) a capacity. Extraction empties the character into shared
//! pools and earns experience, and stored resource can be moved between
//! pools or sold for currency.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `reservoir.yaml` into
//!   strongly-typed structs.
//! - [`curves`] -- Capacity, yield, and experience tables.
//! - [`economy`] -- [`ResourceEconomy`], the per-character engine that
//!   ties every operation to persistence and notifications.
//! - [`error`] -- [`EconomyError`] and the conversion to host outcomes.
//! - [`exchange`] -- Pool transfers and sales.
//! - [`extraction`] -- Extraction methods, caps, and experience rewards.
//! - [`notify`] -- [`Notifier`] and [`TurnTrigger`] host seams.
//! - [`production`] -- Per-turn accrual and the overflow warning table.
//! - [`progression`] -- Experience accumulation and level-ups.
//! - [`store`] -- [`KvStore`] abstraction and record mapping.
//!
//! [`ResourceEconomy`]: economy::ResourceEconomy
//! [`EconomyError`]: error::EconomyError
//! [`Notifier`]: notify::Notifier
//! [`TurnTrigger`]: notify::TurnTrigger
//! [`KvStore`]: store::KvStore

pub mod config;
pub mod curves;
pub mod economy;
pub mod error;
pub mod exchange;
pub mod extraction;
pub mod notify;
pub mod production;
pub mod progression;
pub mod store;

pub use config::{ReservoirConfig, Settings};
pub use economy::ResourceEconomy;
pub use error::{EconomyError, outcome};
pub use notify::{NoOpNotifier, Notification, NotificationLog, Notifier, TurnTrigger};
pub use store::{KvStore, MemoryStore, Persistence, StoreError, StoreKey};
