use mongodb::{
    bson::{doc, Bson},
    Client,
};

use crate::{
    data_types::{
        beverage::TourBeverageContainer, common::DocumentId, timer_pause::TourTimerPause,
    },
    error::Result,
    logln,
    util::config::DatabaseConfig,
};

use super::{
    mongodb::MongoDatabase,
    store::{EntityStore, MemoryStore, MongoStore},
};

pub struct TourDB {
    pub beverage_containers: Box<dyn EntityStore<TourBeverageContainer>>,
    pub timer_pauses: Box<dyn EntityStore<TourTimerPause>>,
}

impl TourDB {
    const CC: &str = "TourDB";

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db = Client::with_uri_str(&config.url)
            .await?
            .database(&config.name);

        // the client connects lazily, an unreachable server only shows up here
        db.run_command(doc! {"ping": 1}, None).await?;

        let db_conn = MongoDatabase::new(&db);

        logln!("Using database {} at {}", db_conn.name(), config.url);

        Ok(Self {
            beverage_containers: Box::new(MongoStore::new(&db_conn)),
            timer_pauses: Box::new(MongoStore::new(&db_conn)),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            beverage_containers: Box::new(MemoryStore::new()),
            timer_pauses: Box::new(MemoryStore::new()),
        }
    }

    /// Timer pauses of one tour, ordered by start time
    pub async fn tour_timer_pauses(&self, tour_id: DocumentId) -> Result<Vec<TourTimerPause>> {
        let mut pauses = self
            .timer_pauses
            .find_by("tour_id", Bson::Int64(tour_id))
            .await?;

        pauses.sort_by_key(|pause| pause.start_time);

        Ok(pauses)
    }
}
