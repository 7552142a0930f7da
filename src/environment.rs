use std::sync::Arc;

use log::{debug, Logger};
use time::OffsetDateTime;

use crate::collection::Collection;
use crate::config::Config;
use crate::query::Query;
use crate::record::{epoch_millis, ProductionRecord};
use crate::rms::RmsLinks;
use crate::store::{FileStore, Store};

/// A source of "now".
pub type Clock = dyn Fn() -> OffsetDateTime + Send + Sync;

pub fn system_clock() -> Arc<Clock> {
    Arc::new(OffsetDateTime::now_utc)
}

/// Everything the front end needs to drive the tracker.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub config: Config,
    pub links: RmsLinks,
    pub clock: Arc<Clock>,
}

impl Environment {
    pub fn new(logger: Arc<Logger>, config: Config, clock: Arc<Clock>) -> Self {
        let links = RmsLinks::new(&config.rms_base_url);

        Self {
            logger,
            config,
            links,
            clock,
        }
    }

    /// Opens the collection persisted at the configured snapshot path.
    pub fn open_collection(&self) -> Collection {
        let store = FileStore::new(&self.config.snapshot_path);
        debug!(self.logger, "Opening snapshot"; "path" => %store.path().display());

        self.open_collection_in(Arc::new(store))
    }

    pub fn open_collection_in(&self, store: Arc<dyn Store>) -> Collection {
        Collection::open(store, &self.logger)
    }

    pub fn query(&self) -> Query {
        Query::new(self.clock.clone(), self.links.clone())
    }

    /// A new draft stamped with this environment's clock.
    pub fn draft(&self) -> ProductionRecord {
        ProductionRecord::draft_at(epoch_millis((self.clock)()))
    }
}
