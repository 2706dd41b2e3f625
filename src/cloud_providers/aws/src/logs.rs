use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::FilteredLogEvent;

use lens_common::api::LogApi;
use lens_common::types::{LogEvent, LogPage, LogQuery};
use lens_common::LensError;

pub struct CloudWatchLogsClient {
    pub client: cloudwatchlogs::Client,
}

impl CloudWatchLogsClient {
    pub fn new_with_config(config: &SdkConfig) -> Self {
        Self {
            client: cloudwatchlogs::Client::new(config),
        }
    }
}

#[async_trait]
impl LogApi for CloudWatchLogsClient {
    async fn filter_log_events(&self, query: &LogQuery) -> Result<LogPage> {
        let result = self
            .client
            .filter_log_events()
            .log_group_name(&query.log_group_name)
            .start_time(query.start_time_ms)
            .set_log_stream_name_prefix(query.log_stream_name_prefix.clone())
            .set_next_token(query.next_token.clone())
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                if let Some(service_error) = err.as_service_error() {
                    if service_error.is_resource_not_found_exception() {
                        return Err(
                            LensError::LogGroupNotFound(query.log_group_name.clone()).into()
                        );
                    }
                }
                return Err(anyhow::anyhow!("{}", DisplayErrorContext(&err))).with_context(|| {
                    format!("FilterLogEvents failed for '{}'", query.log_group_name)
                });
            }
        };
        tracing::trace!(?output, "FilterLogEvents response");

        Ok(LogPage {
            events: output.events().iter().filter_map(event_from_sdk).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}

fn event_from_sdk(event: &FilteredLogEvent) -> Option<LogEvent> {
    Some(LogEvent {
        timestamp_ms: event.timestamp()?,
        message: event.message().unwrap_or_default().to_string(),
        log_stream_name: event.log_stream_name().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_timestamped_events() {
        let event = FilteredLogEvent::builder()
            .timestamp(1_700_000_000_000)
            .message("[Container] Running command cargo build\n")
            .log_stream_name("4b1c-build")
            .build();

        assert_eq!(
            event_from_sdk(&event),
            Some(LogEvent {
                timestamp_ms: 1_700_000_000_000,
                message: "[Container] Running command cargo build\n".into(),
                log_stream_name: Some("4b1c-build".into()),
            })
        );
    }

    #[test]
    fn drops_events_without_timestamp() {
        let event = FilteredLogEvent::builder().message("orphan").build();
        assert_eq!(event_from_sdk(&event), None);
    }
}
