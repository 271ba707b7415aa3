mod smtp;
mod templates;
mod webhook;

pub use smtp::SmtpSink;
pub use templates::EmailTemplate;
pub use webhook::{DiscordSink, SlackSink, WebhookSink};

use async_trait::async_trait;

use watch_core::{NotificationError, NotificationSink, TriggerEvent};

/// Configuration for the notification sinks.
#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
    pub discord_webhook_url: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_to: Vec<String>,
}

impl NotificationConfig {
    /// Load from environment variables. Unset or empty variables leave
    /// the corresponding sink disabled.
    pub fn from_env() -> Self {
        let smtp_to = std::env::var("ALERT_EMAIL_TO")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            webhook_url: env_nonempty("WEBHOOK_URL"),
            discord_webhook_url: env_nonempty("DISCORD_WEBHOOK_URL"),
            slack_webhook_url: env_nonempty("SLACK_WEBHOOK_URL"),
            smtp_host: env_nonempty("SMTP_HOST"),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            smtp_username: env_nonempty("SMTP_USERNAME"),
            smtp_password: env_nonempty("SMTP_PASSWORD"),
            smtp_from: env_nonempty("SMTP_FROM_ADDRESS"),
            smtp_to,
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Console sink — logs the alert. Always available, used when nothing
/// else is configured.
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn send(&self, event: &TriggerEvent) -> Result<(), NotificationError> {
        tracing::info!(
            symbol = %event.condition.symbol,
            price = event.price_at_trigger,
            threshold = event.condition.threshold,
            "{}",
            event.message()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Fans triggered-condition events out to every configured sink.
///
/// Delivery is best-effort: a failing sink is logged at warn and the
/// rest still receive the event. No retries — that is the caller's
/// policy, not this crate's.
pub struct Dispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Box<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }

    /// Builds the sink set from config: console always, the rest when
    /// their settings are present.
    pub fn from_config(config: &NotificationConfig) -> Self {
        let mut sinks: Vec<Box<dyn NotificationSink>> = vec![Box::new(ConsoleSink)];

        if let Some(ref url) = config.webhook_url {
            sinks.push(Box::new(WebhookSink::new(url.clone())));
            tracing::info!("webhook notifications enabled");
        }
        if let Some(ref url) = config.discord_webhook_url {
            sinks.push(Box::new(DiscordSink::new(url.clone())));
            tracing::info!("Discord notifications enabled");
        }
        if let Some(ref url) = config.slack_webhook_url {
            sinks.push(Box::new(SlackSink::new(url.clone())));
            tracing::info!("Slack notifications enabled");
        }
        if config.smtp_host.is_some() && config.smtp_from.is_some() && !config.smtp_to.is_empty() {
            match SmtpSink::new(config) {
                Ok(sink) => {
                    tracing::info!(
                        recipients = config.smtp_to.len(),
                        "email notifications enabled"
                    );
                    sinks.push(Box::new(sink));
                }
                Err(e) => tracing::warn!("failed to initialize SMTP sink: {}", e),
            }
        }

        Self { sinks }
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Send the event to every sink, awaiting completion.
    pub async fn dispatch(&self, event: &TriggerEvent) {
        for sink in &self.sinks {
            match sink.send(event).await {
                Ok(()) => tracing::debug!("sent notification via {}", sink.name()),
                Err(e) => tracing::warn!("failed to send notification via {}: {}", sink.name(), e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use watch_core::{AlertCondition, Direction};

    struct CountingSink {
        sent: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSink for CountingSink {
        async fn send(&self, _event: &TriggerEvent) -> Result<(), NotificationError> {
            if self.fail {
                return Err(NotificationError::Webhook("boom".into()));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn sample_event() -> TriggerEvent {
        let mut condition = AlertCondition::new("BTC", 50000.0, Direction::Above).unwrap();
        condition.mark_triggered(chrono::Utc::now());
        TriggerEvent::new(condition, 50100.0)
    }

    #[tokio::test]
    async fn dispatch_reaches_every_sink_despite_failures() {
        let sent = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![
            Box::new(CountingSink {
                sent: sent.clone(),
                fail: false,
            }),
            Box::new(CountingSink {
                sent: sent.clone(),
                fail: true,
            }),
            Box::new(CountingSink {
                sent: sent.clone(),
                fail: false,
            }),
        ]);

        dispatcher.dispatch(&sample_event()).await;
        assert_eq!(sent.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_config_enables_console_only() {
        let dispatcher = Dispatcher::from_config(&NotificationConfig::default());
        assert_eq!(dispatcher.sink_names(), vec!["console"]);
    }

    #[test]
    fn trigger_message_reads_like_an_alert() {
        let event = sample_event();
        let message = event.message();
        assert!(message.contains("BTC"));
        assert!(message.contains("above"));
        assert!(message.contains("50000"));
    }
}
