#![recursion_limit = "256"]

mod config;
mod handler;

use std::sync::Arc;

use anyhow::Context;
use config::Config;
use delivery_entrypoint::Entrypoint;
use handler::handler;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use ses_events::{
    domain::services::NotificationNormalizer,
    outbound::{diagnostics::TracingDiagnostics, dynamodb::DynamoRecordStore},
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    Entrypoint::default().init();

    tracing::trace!("initiating lambda");

    let config = Config::from_env().context("all necessary env vars should be available")?;

    tracing::trace!("initialized config");

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoRecordStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        &config.dynamodb_table,
    );

    tracing::trace!("initialized dynamodb client");

    let normalizer = Arc::new(NotificationNormalizer::new_with_default_time(
        store,
        TracingDiagnostics,
        config.retention,
    ));

    let func = service_fn(move |event: LambdaEvent<serde_json::Value>| {
        let normalizer = normalizer.clone();
        async move { handler(normalizer, event).await }
    });

    run(func).await
}
