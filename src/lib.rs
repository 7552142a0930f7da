pub mod checklist;
pub mod collection;
pub mod config;
pub mod dates;
pub mod environment;
pub mod errors;
pub mod export;
pub mod query;
pub mod record;
pub mod rms;
pub mod status;
pub mod store;
