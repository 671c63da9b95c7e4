//! Session log domain: interaction records and their persistence contract.

pub mod log;
pub mod record;
pub mod repository;

pub use log::SessionLog;
pub use record::InteractionRecord;
pub use repository::SessionLogRepository;
