use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{ContentType, Header, Status};
use rocket::{Build, Request, Response, Rocket, State};
use serde::Serialize;
use serde_derive::Deserialize;
use tour_book::{
    data_types::{
        beverage::TourBeverageContainer, common::DocumentId, timer_pause::TourTimerPause,
        tour::TourData,
    },
    error::Error,
    logln, logwarn,
    processors::segmenter::SegmenterType,
    util::config::Config,
    TourBook,
};

#[macro_use]
extern crate rocket;

type JsonResponse = (Status, (ContentType, String));

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Cross-Origin-Resource-Sharing Fairing",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, PATCH, PUT, DELETE, HEAD, OPTIONS, GET",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    tour: TourData,
    #[serde(default)]
    segmenter: SegmenterType,
}

fn json_response<T: Serialize>(status: Status, value: &T) -> JsonResponse {
    match serde_json::to_string(value) {
        Ok(json) => (status, (ContentType::JSON, json)),
        Err(err) => error_response(&Error::from(err)),
    }
}

fn error_response(err: &Error) -> JsonResponse {
    let status = match err {
        Error::InvalidInput(_) | Error::Json(_) => Status::BadRequest,
        Error::NotFound(_) => Status::NotFound,
        Error::Conflict(_) => Status::Conflict,
        Error::MissingData(_) => Status::UnprocessableEntity,
        _ => Status::InternalServerError,
    };

    (status, (ContentType::Text, err.to_string()))
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, JsonResponse> {
    serde_json::from_str(body).map_err(|err| error_response(&Error::from(err)))
}

#[options("/<_..>")]
fn all_options() {
    /* Intentionally left empty */
}

#[get("/beverage_containers")]
async fn beverage_containers(book: &State<TourBook>) -> JsonResponse {
    match book.beverage_containers().await {
        Ok(containers) => json_response(Status::Ok, &containers),
        Err(err) => error_response(&err),
    }
}

#[post("/beverage_containers", data = "<body>")]
async fn save_beverage_container(book: &State<TourBook>, body: String) -> JsonResponse {
    let mut container: TourBeverageContainer = match parse_body(&body) {
        Ok(container) => container,
        Err(response) => return response,
    };

    match book.save_beverage_container(&mut container).await {
        Ok(_) => json_response(Status::Ok, &container),
        Err(err) => error_response(&err),
    }
}

#[delete("/beverage_containers/<container_id>")]
async fn delete_beverage_container(
    book: &State<TourBook>,
    container_id: DocumentId,
) -> JsonResponse {
    match book.delete_beverage_container(container_id).await {
        Ok(()) => (Status::NoContent, (ContentType::Text, String::new())),
        Err(err) => error_response(&err),
    }
}

#[get("/tours/<tour_id>/timer_pauses")]
async fn timer_pauses(book: &State<TourBook>, tour_id: DocumentId) -> JsonResponse {
    match book.timer_pauses(tour_id).await {
        Ok(pauses) => json_response(Status::Ok, &pauses),
        Err(err) => error_response(&err),
    }
}

#[post("/tours/<tour_id>/timer_pauses", data = "<body>")]
async fn save_timer_pauses(
    book: &State<TourBook>,
    tour_id: DocumentId,
    body: String,
) -> JsonResponse {
    let mut pauses: Vec<TourTimerPause> = match parse_body(&body) {
        Ok(pauses) => pauses,
        Err(response) => return response,
    };

    match book.save_timer_pauses(tour_id, &mut pauses).await {
        Ok(_) => json_response(Status::Ok, &pauses),
        Err(err) => error_response(&err),
    }
}

#[post("/analyze", data = "<body>")]
fn analyze(book: &State<TourBook>, body: String) -> JsonResponse {
    let request: AnalyzeRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match book.analyze(&request.tour, request.segmenter) {
        Ok(analysis) => json_response(Status::Ok, &analysis),
        Err(err) => error_response(&err),
    }
}

#[post("/normalize", data = "<body>")]
fn normalize(book: &State<TourBook>, body: String) -> JsonResponse {
    let tour: TourData = match parse_body(&body) {
        Ok(tour) => tour,
        Err(response) => return response,
    };

    match book.normalize(&tour) {
        Ok(geo) => json_response(Status::Ok, &geo),
        Err(err) => error_response(&err),
    }
}

struct Server;

impl Server {
    const CC: &str = "Server";

    /// Configuration from the file in `TOUR_BOOK_CONFIG`, defaults otherwise.
    fn config() -> Config {
        let Ok(path) = std::env::var("TOUR_BOOK_CONFIG") else {
            return Config::default();
        };

        match Config::load(&path) {
            Ok(config) => {
                logln!("Configuration loaded from {}", path);
                config
            }
            Err(err) => {
                logwarn!("Cannot load {}: {}, using defaults", path, err);
                Config::default()
            }
        }
    }

    async fn tour_book() -> TourBook {
        let config = Self::config();

        match TourBook::open(config.clone()).await {
            Ok(book) => book,
            Err(err) => {
                logwarn!("Database not available: {}, keeping data in memory", err);
                TourBook::in_memory(config)
            }
        }
    }
}

fn build(book: TourBook) -> Rocket<Build> {
    // posted tours are larger than the default string limit
    let figment = rocket::Config::figment()
        .merge(("limits", Limits::default().limit("string", 32.mebibytes())));

    rocket::custom(figment)
        .manage(book)
        .attach(Cors)
        .mount(
            "/",
            routes![
                beverage_containers,
                save_beverage_container,
                delete_beverage_container,
                timer_pauses,
                save_timer_pauses,
                analyze,
                normalize,
                all_options
            ],
        )
}

#[launch]
async fn rocket() -> _ {
    build(Server::tour_book().await)
}

#[cfg(test)]
mod tests {
    use rocket::local::asynchronous::Client;

    use super::*;

    async fn client() -> Client {
        Client::tracked(build(TourBook::in_memory(Config::default())))
            .await
            .unwrap()
    }

    #[rocket::async_test]
    async fn beverage_containers_are_saved_and_deleted() {
        let client = client().await;

        let response = client
            .post("/beverage_containers")
            .body(r#"{"name": "Bottle", "capacity": 0.75}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let saved: TourBeverageContainer =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(saved.container_id, 1);

        let response = client.delete("/beverage_containers/1").dispatch().await;
        assert_eq!(response.status(), Status::NoContent);

        let response = client.delete("/beverage_containers/1").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn invalid_bodies_are_bad_requests() {
        let client = client().await;

        let response = client
            .post("/tours/9/timer_pauses")
            .body(r#"[{"start_time": 2000, "end_time": 1000}]"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client
            .post("/beverage_containers")
            .body("not json")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn timer_pauses_belong_to_their_tour() {
        let client = client().await;

        let response = client
            .post("/tours/2/timer_pauses")
            .body(r#"[{"start_time": 1000, "end_time": 2000}]"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client
            .post("/tours/9/timer_pauses")
            .body(r#"[{"_id": 1, "tour_id": 2, "start_time": 1000, "end_time": 2000}]"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client.get("/tours/2/timer_pauses").dispatch().await;
        let pauses: Vec<TourTimerPause> =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(pauses.len(), 1);
        assert_eq!(pauses[0].tour_id, 2);
    }

    #[rocket::async_test]
    async fn analyze_needs_a_time_serie() {
        let client = client().await;

        let response = client
            .post("/analyze")
            .body(r#"{"tour": {"altitude_serie": [100, 110]}}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);

        let response = client
            .post("/analyze")
            .body(r#"{"tour": {"time_serie": [0, 10, 20], "altitude_serie": [100, 110, 105]}}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }
}
