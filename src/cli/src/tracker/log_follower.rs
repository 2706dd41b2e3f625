use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use lens_common::api::LogApi;
use lens_common::types::{LogQuery, LogTarget};

/// One printed log line: stage in yellow, action in cyan, then the raw message.
pub fn format_log_line(stage: &str, action: &str, message: &str) -> String {
    format!(
        "{} {} {}",
        stage.yellow(),
        action.bright_cyan(),
        message.trim_end_matches(&['\r', '\n'][..])
    )
}

/// Reads a log group forward from a time cursor.
#[derive(Debug)]
pub struct LogFollower {
    cursor_ms: i64,
}

impl LogFollower {
    pub fn starting_at(cursor_ms: i64) -> Self {
        Self { cursor_ms }
    }

    /// Epoch milliseconds the next query starts from.
    pub fn cursor_ms(&self) -> i64 {
        self.cursor_ms
    }

    /// Prints every event newer than the cursor and moves the cursor past the newest one.
    /// Returns the number of printed lines.
    pub async fn drain<L, W>(
        &mut self,
        logs: &L,
        target: &LogTarget,
        stage: &str,
        action: &str,
        out: &mut W,
    ) -> Result<usize>
    where
        L: LogApi + ?Sized,
        W: Write,
    {
        let mut query = LogQuery::starting_at(target, self.cursor_ms);
        let mut printed = 0;

        loop {
            let page = logs.filter_log_events(&query).await?;
            tracing::trace!(
                log_group = %query.log_group_name,
                events = page.events.len(),
                "Fetched log page"
            );

            for event in &page.events {
                writeln!(out, "{}", format_log_line(stage, action, &event.message))?;
                printed += 1;
            }
            if let Some(newest) = page.events.iter().map(|event| event.timestamp_ms).max() {
                self.cursor_ms = self.cursor_ms.max(newest + 1);
            }

            // CloudWatch hands back the token it was given once a stream is exhausted.
            match page.next_token {
                Some(token) if query.next_token.as_deref() != Some(token.as_str()) => {
                    query.next_token = Some(token);
                }
                _ => break,
            }
        }

        out.flush()?;
        Ok(printed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_common::api::MockLogApi;
    use lens_common::types::{LogEvent, LogPage};
    use lens_common::LensError;
    use std::sync::{Arc, Mutex};

    fn target() -> LogTarget {
        LogTarget {
            log_group_name: "/aws/codebuild/api-build".into(),
            log_stream_name_prefix: None,
        }
    }

    fn event(timestamp_ms: i64, message: &str) -> LogEvent {
        LogEvent {
            timestamp_ms,
            message: message.into(),
            log_stream_name: Some("build-1".into()),
        }
    }

    #[test]
    fn log_line_strips_trailing_newline() {
        colored::control::set_override(false);
        assert_eq!(
            format_log_line("Build", "Compile", "cargo build --release\r\n"),
            "Build Compile cargo build --release"
        );
    }

    #[tokio::test]
    async fn follows_pages_and_advances_cursor() {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&queries);

        let mut logs = MockLogApi::new();
        logs.expect_filter_log_events()
            .times(2)
            .returning(move |query| {
                recorded.lock().unwrap().push(query.clone());
                Ok(match query.next_token.as_deref() {
                    None => LogPage {
                        events: vec![event(1_000, "first\n"), event(1_500, "second\n")],
                        next_token: Some("page-2".into()),
                    },
                    Some(_) => LogPage {
                        events: vec![event(1_200, "third\n")],
                        next_token: None,
                    },
                })
            });

        let mut follower = LogFollower::starting_at(900);
        let mut out = Vec::new();
        let printed = follower
            .drain(&logs, &target(), "Build", "Compile", &mut out)
            .await
            .unwrap();

        assert_eq!(printed, 3);
        assert_eq!(follower.cursor_ms(), 1_501);

        let queries = queries.lock().unwrap();
        assert_eq!(queries[0].start_time_ms, 900);
        assert_eq!(queries[0].next_token, None);
        assert_eq!(queries[1].start_time_ms, 900);
        assert_eq!(queries[1].next_token.as_deref(), Some("page-2"));

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("first"));
        assert!(lines[2].ends_with("third"));
    }

    #[tokio::test]
    async fn repeated_token_ends_the_drain() {
        let mut logs = MockLogApi::new();
        logs.expect_filter_log_events()
            .times(2)
            .returning(|_| {
                Ok(LogPage {
                    events: vec![],
                    next_token: Some("same".into()),
                })
            });

        let mut follower = LogFollower::starting_at(42);
        let mut out = Vec::new();
        let printed = follower
            .drain(&logs, &target(), "Build", "Compile", &mut out)
            .await
            .unwrap();

        assert_eq!(printed, 0);
        assert_eq!(follower.cursor_ms(), 42);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn missing_log_group_is_propagated() {
        let mut logs = MockLogApi::new();
        logs.expect_filter_log_events().returning(|query| {
            Err(LensError::LogGroupNotFound(query.log_group_name.clone()).into())
        });

        let mut follower = LogFollower::starting_at(0);
        let err = follower
            .drain(&logs, &target(), "Build", "Compile", &mut Vec::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<LensError>(),
            Some(&LensError::LogGroupNotFound("/aws/codebuild/api-build".into()))
        );
    }
}
