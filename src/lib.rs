use std::{collections::BTreeMap, path::Path};

use serde_derive::Serialize;

use data_types::{
    beverage::TourBeverageContainer,
    common::{DocumentId, Entity, Identifiable},
    custom_track::{CustomTrackDefinition, CustomTrackStatistic},
    elevation::{ElevationGainLoss, FlatGainLoss},
    geo::NormalizedGeoData,
    segment::TourSegment,
    timer_pause::TourTimerPause,
    tour::TourData,
};
use database::tour_db::TourDB;
use error::{Error, Result};
use processors::{
    elevation::ElevationProcessor,
    geo_normalizer::GeoNormalizer,
    segmenter::{SegmenterType, TourSegmenter},
    swim::SwimSeries,
};
use util::config::Config;

pub mod data_types;
pub mod database;
pub mod error;
pub mod processors;
pub mod util;

/// Everything computed for one tour.
#[derive(Debug, Serialize, Clone, Default)]
pub struct TourAnalysis {
    pub elevation: Option<ElevationGainLoss>,
    pub flat_gain_loss: Option<FlatGainLoss>,
    /// Empty when the tour has not the series the segmenter needs
    pub segments: Vec<TourSegment>,
    pub custom_tracks: BTreeMap<String, CustomTrackStatistic>,
    /// Definitions of the tracks in `custom_tracks` which the tour defines
    pub custom_track_definitions: BTreeMap<String, CustomTrackDefinition>,
    pub swim: Option<SwimSeries>,
}

pub struct TourBook {
    config: Config,
    db: TourDB,
}

impl TourBook {
    const CC: &str = "TourBook";

    pub async fn open(config: Config) -> Result<Self> {
        let db = TourDB::connect(&config.database).await?;

        Ok(Self { config, db })
    }

    pub fn in_memory(config: Config) -> Self {
        Self {
            config,
            db: TourDB::in_memory(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn load_tour(path: impl AsRef<Path>) -> Result<TourData> {
        let content = std::fs::read_to_string(path)?;

        Ok(serde_json::from_str(&content)?)
    }

    pub fn analyze(&self, tour: &TourData, segmenter: SegmenterType) -> Result<TourAnalysis> {
        if !tour.has_time() {
            return Err(Error::MissingData("time serie"));
        }

        let elevation_config = &self.config.elevation;

        let elevation = if tour.has_altitude() {
            ElevationProcessor::compute(tour, elevation_config)
        } else {
            None
        };

        let flat_gain_loss = ElevationProcessor::flat_gain_loss(
            tour,
            elevation_config.dp_tolerance,
            elevation_config.flat_gradient,
        );

        let serie_indices = TourSegmenter::segment_indices(tour, &segmenter);
        let segments =
            TourSegmenter::create_segments(tour, &serie_indices, &self.config.break_time)
                .unwrap_or_default();

        let custom_track_series = tour.custom_track_series();
        let custom_tracks: BTreeMap<String, CustomTrackStatistic> = custom_track_series
            .ids()
            .filter_map(|id| {
                custom_track_series
                    .statistic(id)
                    .map(|statistic| (id.to_string(), statistic))
            })
            .collect();
        let custom_track_definitions = custom_tracks
            .keys()
            .filter_map(|id| tour.custom_track_definition(id))
            .map(|definition| (definition.id.clone(), definition.clone()))
            .collect();

        let swim = (!tour.swim_data.is_empty())
            .then(|| SwimSeries::from_samples(tour.tour_start_time, &tour.swim_data));

        logln!(
            "Tour {} analyzed: {} slices, {} segments",
            tour.as_i64(),
            tour.num_slices(),
            segments.len()
        );

        Ok(TourAnalysis {
            elevation,
            flat_gain_loss,
            segments,
            custom_tracks,
            custom_track_definitions,
            swim,
        })
    }

    /// Normalizes the whole geo track of a tour.
    pub fn normalize(&self, tour: &TourData) -> Result<NormalizedGeoData> {
        if !tour.has_geo() {
            return Err(Error::MissingData("latitude/longitude series"));
        }

        GeoNormalizer::from(&self.config.geo)
            .normalize(tour, 0, tour.num_slices() - 1)
            .ok_or(Error::MissingData("latitude/longitude series"))
    }

    pub async fn save_beverage_container(
        &self,
        container: &mut TourBeverageContainer,
    ) -> Result<DocumentId> {
        if container.name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "beverage container needs a name".to_string(),
            ));
        }

        if container.capacity <= 0. {
            return Err(Error::InvalidInput(format!(
                "beverage container capacity {} must be positive",
                container.capacity
            )));
        }

        self.db.beverage_containers.save(container).await
    }

    pub async fn beverage_containers(&self) -> Result<Vec<TourBeverageContainer>> {
        self.db.beverage_containers.all().await
    }

    pub async fn delete_beverage_container(&self, container_id: DocumentId) -> Result<()> {
        if self.db.beverage_containers.delete(container_id).await? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("beverage container {container_id}")))
        }
    }

    /// Replaces the timer pauses of a tour, stored pauses which are not in `pauses`
    /// are deleted. Saved pauses must already belong to `tour_id`.
    pub async fn save_timer_pauses(
        &self,
        tour_id: DocumentId,
        pauses: &mut [TourTimerPause],
    ) -> Result<Vec<DocumentId>> {
        if let Some(pause) = pauses.iter().find(|pause| pause.end_time < pause.start_time) {
            return Err(Error::InvalidInput(format!(
                "timer pause ends at {} before it starts at {}",
                pause.end_time, pause.start_time
            )));
        }

        let stored = self.db.tour_timer_pauses(tour_id).await?;

        if let Some(pause) = pauses.iter().find(|pause| {
            pause.is_saved() && !stored.iter().any(|stored| stored.as_i64() == pause.as_i64())
        }) {
            return Err(Error::InvalidInput(format!(
                "timer pause {} does not belong to tour {}",
                pause.as_i64(),
                tour_id
            )));
        }

        for stored in stored {
            let is_kept = pauses
                .iter()
                .any(|pause| pause.is_saved() && pause.as_i64() == stored.as_i64());

            if !is_kept {
                self.db.timer_pauses.delete(stored.as_i64()).await?;
            }
        }

        let mut ids = Vec::with_capacity(pauses.len());
        for pause in pauses.iter_mut() {
            pause.tour_id = tour_id;
            ids.push(self.db.timer_pauses.save(pause).await?);
        }

        logln!("Tour {}: {} timer pauses saved", tour_id, ids.len());

        Ok(ids)
    }

    pub async fn timer_pauses(&self, tour_id: DocumentId) -> Result<Vec<TourTimerPause>> {
        self.db.tour_timer_pauses(tour_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use data_types::custom_track::CustomTrackValue;

    fn tour() -> TourData {
        TourData {
            tour_id: 12,
            tour_start_time: 1_000_000,
            time_serie: vec![0, 100, 200, 300, 400],
            distance_serie: vec![0., 500., 1000., 1000., 1500.],
            altitude_serie: vec![100., 110., 130., 130., 120.],
            custom_tracks: vec![
                vec![CustomTrackValue::new("temperature", 20.)],
                vec![],
                vec![CustomTrackValue::new("temperature", 24.)],
                vec![],
                vec![],
            ],
            custom_track_definitions: vec![
                CustomTrackDefinition {
                    id: "temperature".to_string(),
                    name: "Temperature".to_string(),
                    unit: "°C".to_string(),
                },
                CustomTrackDefinition {
                    id: "smo2".to_string(),
                    name: "Muscle oxygen".to_string(),
                    unit: "%".to_string(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn analyze_tour() {
        let book = TourBook::in_memory(Config::default());

        let analysis = book.analyze(&tour(), SegmenterType::default()).unwrap();

        assert_eq!(analysis.elevation, Some(ElevationGainLoss::new(30., 10.)));
        assert_eq!(analysis.segments.len(), 3);
        assert!(analysis.segments[2].is_total);
        assert_eq!(analysis.custom_tracks["temperature"].avg, 22.);
        // smo2 is defined but not recorded
        assert_eq!(
            analysis.custom_track_definitions.keys().collect::<Vec<_>>(),
            vec!["temperature"]
        );
        assert_eq!(analysis.custom_track_definitions["temperature"].unit, "°C");
        assert!(analysis.swim.is_none());
    }

    #[test]
    fn analyze_needs_time() {
        let book = TourBook::in_memory(Config::default());

        assert!(matches!(
            book.analyze(&TourData::default(), SegmenterType::default()),
            Err(Error::MissingData(_))
        ));
    }

    #[test]
    fn normalize_needs_geo() {
        let book = TourBook::in_memory(Config::default());

        assert!(book.normalize(&tour()).is_err());

        let mut tour = tour();
        tour.latitude_serie = vec![47., 47.001, 47.002, 47.002, 47.003];
        tour.longitude_serie = vec![8.; 5];

        let geo = book.normalize(&tour).unwrap();
        assert_eq!(geo.tour_id, Some(12));
        assert_eq!(geo.normalized_to_original_indices, vec![0, 1, 2, 4]);
    }

    #[test]
    fn load_tour_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"_id": 3, "time_serie": [0, 1, 2]}}"#).unwrap();

        let tour = TourBook::load_tour(file.path()).unwrap();

        assert_eq!(tour.as_i64(), 3);
        assert_eq!(tour.num_slices(), 3);
        assert!(TourBook::load_tour("/nonexistent/tour.json").is_err());
    }

    #[tokio::test]
    async fn beverage_containers() {
        let book = TourBook::in_memory(Config::default());

        let mut bottle = TourBeverageContainer::new("Bottle", 0.75);
        assert_eq!(book.save_beverage_container(&mut bottle).await.unwrap(), 1);

        let mut empty = TourBeverageContainer::new(" ", 1.);
        assert!(book.save_beverage_container(&mut empty).await.is_err());

        assert_eq!(book.beverage_containers().await.unwrap(), vec![bottle]);

        book.delete_beverage_container(1).await.unwrap();
        assert!(matches!(
            book.delete_beverage_container(1).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn timer_pauses_are_replaced() {
        let book = TourBook::in_memory(Config::default());

        let mut pauses = vec![
            TourTimerPause::new(0, 1_000, 2_000).unwrap(),
            TourTimerPause::new(0, 5_000, 6_000).unwrap(),
        ];
        assert_eq!(book.save_timer_pauses(9, &mut pauses).await.unwrap(), vec![1, 2]);
        assert!(pauses.iter().all(|pause| pause.tour_id == 9));

        // keep the second, drop the first, add one
        let mut pauses = vec![
            pauses[1].clone(),
            TourTimerPause::new(9, 8_000, 9_000).unwrap(),
        ];
        book.save_timer_pauses(9, &mut pauses).await.unwrap();

        let stored = book.timer_pauses(9).await.unwrap();
        assert_eq!(
            stored.iter().map(|pause| pause.start_time).collect::<Vec<_>>(),
            vec![5_000, 8_000]
        );
    }

    #[tokio::test]
    async fn timer_pauses_of_another_tour_are_rejected() {
        let book = TourBook::in_memory(Config::default());

        let mut pauses = vec![TourTimerPause::new(0, 1_000, 2_000).unwrap()];
        book.save_timer_pauses(2, &mut pauses).await.unwrap();

        assert!(matches!(
            book.save_timer_pauses(9, &mut pauses).await,
            Err(Error::InvalidInput(_))
        ));

        let mut unknown = TourTimerPause::new(9, 3_000, 4_000).unwrap();
        unknown.set_id(42);
        assert!(book.save_timer_pauses(9, &mut [unknown]).await.is_err());

        assert_eq!(book.timer_pauses(2).await.unwrap().len(), 1);
        assert!(book.timer_pauses(9).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_fails_without_database() {
        let mut config = Config::default();
        config.database.url = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=500".to_string();

        assert!(TourBook::open(config).await.is_err());
    }
}
