pub mod audit;
pub mod config;
pub mod customer;
pub mod listing;
pub mod packet;
pub mod plugins;

pub use audit::{AuditRecord, SubRecordKind, UpdateSource};
pub use config::ConfigValues;
pub use customer::{Customer, CustomerFull, CustomerPatch, LicenseType};
pub use listing::{CustomerFilter, PagedResult, SortDirection, SortField, DEFAULT_PAGE_SIZE};
pub use packet::PacketValues;
pub use plugins::{PluginValue, PluginValues};
