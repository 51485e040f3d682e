use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::BookingStore;
use crate::services::bookings::BookingCoordinator;
use crate::services::broadcaster::EventBroadcaster;
use crate::services::mailer::EmailTransport;
use crate::services::notifications::NotificationDispatcher;

pub struct AppState {
    pub config: AppConfig,
    pub store: BookingStore,
    pub coordinator: BookingCoordinator,
    pub broadcaster: EventBroadcaster,
}

impl AppState {
    pub fn new(config: AppConfig, conn: Connection, transport: Arc<dyn EmailTransport>) -> Self {
        let store = BookingStore::new(Arc::new(Mutex::new(conn)));
        let broadcaster = EventBroadcaster::new();
        let dispatcher = Arc::new(NotificationDispatcher::from_config(transport, &config));
        let coordinator = BookingCoordinator::new(store.clone(), dispatcher, broadcaster.clone());

        Self {
            config,
            store,
            coordinator,
            broadcaster,
        }
    }
}
