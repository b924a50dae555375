//! HTTP surface for the aggregation layer: `/availability` for the UI and a
//! `/cron` placeholder for the scheduled trigger.

use chrono::Utc;
use courtwatch::utils::logger;
use courtwatch::{envelope, AggregateError, Aggregator, Endpoints, LocationRegistry};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;

const DEFAULT_LOCATION: &str = "triangle-padel";

// Fresh for 5 minutes, servable-stale for an hour; bounds upstream load
// from repeated browser refreshes.
const CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate=3600";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    logger::init_server_logger();

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = TcpListener::bind(&bind).await?;
    tracing::info!("Serving availability on http://{}", bind);

    let aggregator = Arc::new(Aggregator::new(
        LocationRegistry::default(),
        Endpoints::default(),
    ));

    loop {
        let (socket, _) = listener.accept().await?;
        let io = TokioIo::new(socket);
        let aggregator = Arc::clone(&aggregator);
        let service = service_fn(move |req| {
            let aggregator = Arc::clone(&aggregator);
            async move { handle(aggregator, req).await }
        });
        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::error!("Error serving connection: {:?}", err);
            }
        });
    }
}

async fn handle(
    aggregator: Arc<Aggregator>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, std::convert::Infallible> {
    let response = match (req.method(), req.uri().path()) {
        (&Method::GET, "/availability") => availability(aggregator, &req).await,
        (&Method::GET, "/cron") => cron(&req),
        _ => json_response(
            StatusCode::NOT_FOUND,
            &serde_json::json!({"error": "Not found"}),
            None,
        ),
    };
    Ok(response)
}

async fn availability(
    aggregator: Arc<Aggregator>,
    req: &Request<Incoming>,
) -> Response<Full<Bytes>> {
    let location =
        query_param(req, "location").unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    match aggregator.aggregate(&location).await {
        Ok(aggregation) => json_response(
            StatusCode::OK,
            &envelope::success(aggregation),
            Some(CACHE_CONTROL),
        ),
        Err(AggregateError::UnknownLocation { location, known }) => {
            tracing::warn!("Rejected unknown location '{}'", location);
            json_response(
                StatusCode::BAD_REQUEST,
                &envelope::unknown_location(known),
                None,
            )
        }
        Err(e) => {
            tracing::error!("Aggregation for '{}' failed: {}", location, e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &serde_json::json!({"success": false, "error": "Aggregation failed"}),
                None,
            )
        }
    }
}

/// Scheduled-trigger placeholder: validates the shared secret and reports
/// back, nothing more.
fn cron(req: &Request<Incoming>) -> Response<Full<Bytes>> {
    let expected = std::env::var("CRON_SECRET").ok();
    let authorized = match (&expected, req.headers().get(header::AUTHORIZATION)) {
        (Some(secret), Some(value)) => value
            .to_str()
            .map(|v| v == format!("Bearer {}", secret))
            .unwrap_or(false),
        _ => false,
    };

    if !authorized {
        return json_response(
            StatusCode::UNAUTHORIZED,
            &serde_json::json!({"error": "Unauthorized"}),
            None,
        );
    }

    let now = Utc::now();
    tracing::info!("Cron trigger accepted at {}", now.to_rfc3339());
    json_response(
        StatusCode::OK,
        &serde_json::json!({
            "success": true,
            "message": "Cron job executed successfully",
            "timestamp": now.to_rfc3339(),
        }),
        None,
    )
}

fn query_param(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.uri().query().and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    })
}

fn json_response<T: serde::Serialize>(
    status: StatusCode,
    body: &T,
    cache_control: Option<&str>,
) -> Response<Full<Bytes>> {
    let payload = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(directive) = cache_control {
        builder = builder.header(header::CACHE_CONTROL, directive);
    }
    builder
        .body(Full::new(Bytes::from(payload)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}
