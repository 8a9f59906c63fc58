use anyhow::Context;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use opentelemetry::trace::TracerProvider as _; // Import as _ since we only need the trait methods
use opentelemetry::KeyValue;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    trace::{Sampler, SdkTracerProvider},
    Resource,
};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::activity::{ActivityClient, ContributionsApiClient};
use crate::api::handlers::{
    delete_user_handler, get_user_handler, group_ranking_handler, list_group_users_handler,
    register_user_handler, user_ranking_handler,
};
use crate::api::state::AppState;
use crate::config::{AppConfig, StoreBackend};
use crate::db::{DynamoUserStore, InMemoryUserStore, UserStore};

const SERVICE_NAME: &str = "contribution-ranking";

pub fn init_tracing() {
    // Check if we're in Lambda environment
    let is_lambda = env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok();

    let enable_otel = env::var("OTEL_ENABLED")
        .unwrap_or_else(|_| if is_lambda { "true" } else { "false" }.to_string())
        == "true";

    let otel_endpoint = env::var("OTEL_EXPORTER_OTLP_TRACES_ENDPOINT").unwrap_or_else(|_| {
        if is_lambda {
            "http://127.0.0.1:4318/v1/traces".to_string()
        } else {
            "http://localhost:4318/v1/traces".to_string()
        }
    });

    // Span close events only without OTEL, the exporter already records durations
    let fmt_layer = fmt::layer().json().with_target(false).with_span_events(if enable_otel {
        fmt::format::FmtSpan::NONE
    } else {
        fmt::format::FmtSpan::CLOSE
    });

    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,hyper=warn,tower=warn,h2=error,aws_smithy_runtime=warn")
        }),
    );

    if enable_otel {
        match init_opentelemetry(&otel_endpoint) {
            Ok(provider) => {
                opentelemetry::global::set_tracer_provider(provider.clone());

                // global::tracer returns a BoxedTracer, which OpenTelemetryLayer can't use
                let tracer = provider.tracer(SERVICE_NAME);

                subscriber.with(OpenTelemetryLayer::new(tracer)).init();

                info!("OpenTelemetry enabled: {}", otel_endpoint);
            }
            Err(e) => {
                subscriber.init();
                tracing::error!(
                    "Failed to initialize OpenTelemetry: {}. Continuing with logs only.",
                    e
                );
            }
        }
    } else {
        subscriber.init();
    }
}

fn init_opentelemetry(endpoint: &str) -> anyhow::Result<SdkTracerProvider> {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let service_name = env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.to_string());

    // Default 0.01 = 1%
    let sampling_rate = env::var("OTEL_TRACE_SAMPLING_RATE")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.01)
        .clamp(0.0, 1.0);

    let resource = Resource::builder()
        .with_attribute(KeyValue::new("service.name", service_name))
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .context("building OTLP span exporter")?;

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::TraceIdRatioBased(sampling_rate))
        .with_batch_exporter(exporter)
        .build();

    info!("OpenTelemetry sampling rate: {}%", sampling_rate * 100.0);

    Ok(provider)
}

/// Wire the configured store backend and the contributions client into handler state
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn UserStore> = match config.store.backend {
        StoreBackend::DynamoDb => {
            info!(
                table = %config.store.table_name,
                index = %config.store.group_index_name,
                region = %config.store.region,
                "Using DynamoDB user store"
            );
            Arc::new(DynamoUserStore::from_config(&config.store).await)
        }
        StoreBackend::Memory => {
            info!("Using in-memory user store");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let activity: Arc<dyn ActivityClient> = Arc::new(
        ContributionsApiClient::from_config(&config.activity)
            .context("building contributions API client")?,
    );

    Ok(AppState::new(store, activity, config))
}

fn cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(allowed_origin)
        .with_context(|| format!("invalid CORS origin `{}`", allowed_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::OPTIONS,
            Method::POST,
            Method::GET,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-amz-date"),
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("x-amz-security-token"),
        ]))
}

pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors_allowed_origin)?;

    Ok(Router::new()
        .route("/users", post(register_user_handler))
        .route(
            "/users/{user_name}",
            get(get_user_handler).delete(delete_user_handler),
        )
        .route("/users/{user_name}/ranking", get(user_ranking_handler))
        .route("/groups/{group_name}/users", get(list_group_users_handler))
        .route("/groups/{group_name}/ranking", get(group_ranking_handler))
        // Health check endpoint
        .route("/health", get(health_check))
        .with_state(state)
        .layer(cors)
        // Add tracing layer for observability
        .layer(TraceLayer::new_for_http()))
}

pub async fn create_app() -> anyhow::Result<Router> {
    let config = AppConfig::from_env().context("loading configuration")?;
    let state = build_state(config).await?;
    create_router(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for CTRL+C: {}", e);
        return;
    }
    info!("Shutting down gracefully...");
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting contribution ranking server");

    let config = AppConfig::from_env().context("loading configuration")?;
    let port = config.port;
    let app = create_router(build_state(config).await?)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_rejects_invalid_origin() {
        assert!(cors_layer("https://demetara.vercel.app").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
