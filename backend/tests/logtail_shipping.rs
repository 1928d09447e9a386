//! Remote log shipping against a local collector.
//!
//! A throwaway actix server stands in for the Logtail ingestion endpoint and
//! records every request so the batch shape and credentials can be checked.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use rstest::rstest;
use serde_json::{Value, json};
use url::Url;

use users_api::domain::LogMetadata;
use users_api::domain::ports::{AppLogger, AppLoggerExt};
use users_api::outbound::logging::{FanOutLogger, LogtailConfig, LogtailSink};

#[derive(Debug, Clone)]
struct Received {
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Collector {
    requests: Arc<Mutex<Vec<Received>>>,
    status: StatusCode,
}

async fn ingest(req: HttpRequest, body: web::Json<Value>, collector: web::Data<Collector>) -> HttpResponse {
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    collector
        .requests
        .lock()
        .expect("collector lock")
        .push(Received {
            authorization,
            body: body.into_inner(),
        });
    HttpResponse::build(collector.status).finish()
}

fn start_collector(status: StatusCode) -> (SocketAddr, ServerHandle, Arc<Mutex<Vec<Received>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let collector = Collector {
        requests: requests.clone(),
        status,
    };
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(collector.clone()))
            .route("/", web::post().to(ingest))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind collector");
    let addr = *server.addrs().first().expect("bound address");
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);
    (addr, handle, requests)
}

fn endpoint(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}/")).expect("collector url")
}

#[rstest]
#[actix_web::test]
async fn entries_are_shipped_in_batches_with_bearer_token() {
    let (addr, handle, requests) = start_collector(StatusCode::ACCEPTED);
    let config = LogtailConfig::new(endpoint(addr), "source-token").with_batch_size(64);
    let (sink, worker) = LogtailSink::spawn(config).expect("spawn shipper");

    let logger = FanOutLogger::new().with_sink(Arc::new(sink));
    let mut metadata = LogMetadata::new();
    metadata.insert("id".into(), json!(1));
    logger.info("POST /users - user created: Ana", metadata);
    logger.alert("disk almost full", LogMetadata::new());
    drop(logger);

    tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("shipper drains after the last sender is dropped")
        .expect("shipper task joins");
    handle.stop(false).await;

    let received = requests.lock().expect("collector lock").clone();
    let records: Vec<Value> = received
        .iter()
        .flat_map(|request| request.body.as_array().cloned().unwrap_or_default())
        .collect();
    assert!(
        received
            .iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer source-token"))
    );
    assert_eq!(records.len(), 2);
    let first = records.first().expect("first record");
    assert_eq!(first["level"], "info");
    assert_eq!(first["message"], "POST /users - user created: Ana");
    assert_eq!(first["id"], 1);
    assert!(first["dt"].as_str().is_some_and(|dt| dt.ends_with('Z')));
    assert_eq!(records.get(1).map(|r| r["level"].clone()), Some(json!("alert")));
}

#[rstest]
#[case::rejected(StatusCode::INTERNAL_SERVER_ERROR)]
#[case::unauthorised(StatusCode::UNAUTHORIZED)]
#[actix_web::test]
async fn collector_failures_are_not_retried(#[case] status: StatusCode) {
    let (addr, handle, requests) = start_collector(status);
    let (sink, worker) =
        LogtailSink::spawn(LogtailConfig::new(endpoint(addr), "t")).expect("spawn shipper");

    let logger = FanOutLogger::new().with_sink(Arc::new(sink));
    logger.error("failed to list users", LogMetadata::new());
    drop(logger);

    tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("shipper drains")
        .expect("shipper task joins");
    handle.stop(false).await;

    assert_eq!(requests.lock().expect("collector lock").len(), 1);
}

#[rstest]
#[actix_web::test]
async fn unreachable_collector_never_reaches_the_caller() {
    let url = Url::parse("http://127.0.0.1:1/").expect("url");
    let config = LogtailConfig::new(url, "t").with_request_timeout(Duration::from_millis(500));
    let (sink, worker) = LogtailSink::spawn(config).expect("spawn shipper");

    let logger: Arc<dyn AppLogger> = Arc::new(FanOutLogger::new().with_sink(Arc::new(sink)));
    logger.warn("still logging", LogMetadata::new());
    drop(logger);

    tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("shipper gives up on the request and drains")
        .expect("shipper task joins");
}
