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
    domain::services::DeliveryLogAppender,
    outbound::{cloudwatch::CloudWatchLogSink, diagnostics::TracingDiagnostics},
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    Entrypoint::default().init();

    tracing::trace!("initiating lambda");

    let config = Config::from_env().context("all necessary env vars should be available")?;

    tracing::trace!("initialized config");

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let sink = CloudWatchLogSink::new(
        aws_sdk_cloudwatchlogs::Client::new(&aws_config),
        &config.log_group,
    );

    tracing::trace!("initialized cloudwatch logs client");

    let appender = Arc::new(DeliveryLogAppender::new_with_default_time(
        sink,
        TracingDiagnostics,
    ));

    let func = service_fn(move |event: LambdaEvent<serde_json::Value>| {
        let appender = appender.clone();
        async move { handler(appender, event).await }
    });

    run(func).await
}
