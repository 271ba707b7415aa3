use std::time::Duration;

use async_trait::async_trait;

use watch_core::{Direction, NotificationError, NotificationSink, TriggerEvent};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Generic JSON webhook: POSTs a flat payload to a configured URL.
pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn send(&self, event: &TriggerEvent) -> Result<(), NotificationError> {
        let payload = serde_json::json!({
            "type": "price_alert",
            "symbol": event.condition.symbol.to_uppercase(),
            "currentPrice": event.price_at_trigger,
            "threshold": event.condition.threshold,
            "direction": event.condition.direction,
            "triggeredAt": event.timestamp.to_rfc3339(),
            "message": event.message(),
        });

        self.client
            .post(&self.url)
            .json(&payload)
            .timeout(WEBHOOK_TIMEOUT)
            .send()
            .await
            .map_err(|e| NotificationError::Webhook(e.to_string()))?
            .error_for_status()
            .map_err(|e| NotificationError::Webhook(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

/// Discord webhook notifier: one embed per trigger, green for Above
/// crossings and red for Below.
pub struct DiscordSink {
    webhook_url: String,
    client: reqwest::Client,
}

impl DiscordSink {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    async fn send(&self, event: &TriggerEvent) -> Result<(), NotificationError> {
        let color = match event.condition.direction {
            Direction::Above => 0x00ff00,
            Direction::Below => 0xff0000,
        };

        let payload = serde_json::json!({
            "embeds": [{
                "title": "Price Alert",
                "color": color,
                "fields": [
                    {
                        "name": "Symbol",
                        "value": event.condition.symbol.to_uppercase(),
                        "inline": true,
                    },
                    {
                        "name": "Current Price",
                        "value": format!("${}", event.price_at_trigger),
                        "inline": true,
                    },
                    {
                        "name": "Alert Threshold",
                        "value": format!("{:?} ${}", event.condition.direction, event.condition.threshold),
                        "inline": true,
                    },
                ],
                "timestamp": event.timestamp.to_rfc3339(),
                "footer": { "text": "PriceWatch" },
            }]
        });

        self.client
            .post(&self.webhook_url)
            .json(&payload)
            .timeout(WEBHOOK_TIMEOUT)
            .send()
            .await
            .map_err(|e| NotificationError::Webhook(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "discord-webhook"
    }
}

/// Slack incoming-webhook notifier.
pub struct SlackSink {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackSink {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for SlackSink {
    async fn send(&self, event: &TriggerEvent) -> Result<(), NotificationError> {
        let color = match event.condition.direction {
            Direction::Above => "good",
            Direction::Below => "danger",
        };

        let payload = serde_json::json!({
            "text": "Price Alert Triggered",
            "attachments": [{
                "color": color,
                "fields": [
                    {
                        "title": "Symbol",
                        "value": event.condition.symbol.to_uppercase(),
                        "short": true,
                    },
                    {
                        "title": "Current Price",
                        "value": format!("${}", event.price_at_trigger),
                        "short": true,
                    },
                    {
                        "title": "Alert Threshold",
                        "value": format!("{:?} ${}", event.condition.direction, event.condition.threshold),
                        "short": true,
                    },
                ],
                "ts": event.timestamp.timestamp(),
            }]
        });

        self.client
            .post(&self.webhook_url)
            .json(&payload)
            .timeout(WEBHOOK_TIMEOUT)
            .send()
            .await
            .map_err(|e| NotificationError::Webhook(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "slack-webhook"
    }
}
