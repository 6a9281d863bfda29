//! Shared collaborators handed to every service.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use scripthub_core::config::limits::LimitsConfig;
use scripthub_core::traits::{Clock, IdGenerator, SystemClock, UuidGenerator};

use crate::validation::Validator;

/// Clock, id generator, and validator shared by the services.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// Timestamp source.
    pub clock: Arc<dyn Clock>,
    /// Identifier source.
    pub ids: Arc<dyn IdGenerator>,
    /// Document validator.
    pub validator: Validator,
}

impl ServiceContext {
    /// Create a context from explicit collaborators.
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>, limits: LimitsConfig) -> Self {
        Self {
            clock,
            ids,
            validator: Validator::new(limits),
        }
    }

    /// Wall clock, random UUIDs, and the given limits.
    pub fn system(limits: LimitsConfig) -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator), limits)
    }

    /// The current instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
