use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AlertError;

/// One observation of a symbol's price.
///
/// Samples are immutable once appended and ordered by append sequence;
/// callers append in time order and the stored order is canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self { price, timestamp }
    }
}

/// Which side of the threshold a condition watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Above,
    Below,
}

/// Lifecycle of a condition: armed, or fired exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionState {
    Active,
    Triggered,
}

/// A user-defined threshold rule on one symbol.
///
/// Field names and the Active/Triggered enumeration are the stable
/// interchange contract for persisting registry state across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCondition {
    pub id: Uuid,
    pub symbol: String,
    pub threshold: f64,
    pub direction: Direction,
    pub state: ConditionState,
    pub created_at: DateTime<Utc>,
    pub triggered_at: Option<DateTime<Utc>>,
}

impl AlertCondition {
    /// Builds an Active condition. The threshold must be a finite positive
    /// number; anything else is rejected here and never re-checked by the
    /// evaluator.
    pub fn new(symbol: &str, threshold: f64, direction: Direction) -> Result<Self, AlertError> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(AlertError::InvalidParameter(format!(
                "threshold must be a finite positive number, got {}",
                threshold
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            threshold,
            direction,
            state: ConditionState::Active,
            created_at: Utc::now(),
            triggered_at: None,
        })
    }

    pub fn is_active(&self) -> bool {
        self.state == ConditionState::Active
    }

    /// Threshold comparison only; state is the evaluator's concern.
    /// Bounds are inclusive, so a price exactly at the threshold crosses
    /// both an Above and a Below condition with that threshold.
    pub fn crossed_by(&self, price: f64) -> bool {
        match self.direction {
            Direction::Above => price >= self.threshold,
            Direction::Below => price <= self.threshold,
        }
    }

    /// The one-shot Active -> Triggered transition. Called by the
    /// evaluator under the symbol's lock; never partially applied.
    pub fn mark_triggered(&mut self, at: DateTime<Utc>) {
        self.state = ConditionState::Triggered;
        self.triggered_at = Some(at);
    }
}

/// What notification sinks receive when a condition fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub condition: AlertCondition,
    pub price_at_trigger: f64,
    pub timestamp: DateTime<Utc>,
}

impl TriggerEvent {
    pub fn new(condition: AlertCondition, price_at_trigger: f64) -> Self {
        Self {
            condition,
            price_at_trigger,
            timestamp: Utc::now(),
        }
    }

    /// Human-readable one-liner for console and email bodies.
    pub fn message(&self) -> String {
        let direction = match self.condition.direction {
            Direction::Above => "above",
            Direction::Below => "below",
        };
        format!(
            "PRICE ALERT: {} is now ${}, {} your threshold of ${}",
            self.condition.symbol.to_uppercase(),
            self.price_at_trigger,
            direction,
            self.condition.threshold
        )
    }
}

/// Price movement over a requested window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub old_price: f64,
    pub new_price: f64,
    pub delta: f64,
    pub percent: f64,
    pub window_label: String,
}

/// Direction of recent price movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Sideways,
    InsufficientData,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Sideways => "sideways",
            Trend::InsufficientData => "insufficient data",
        };
        f.write_str(s)
    }
}

/// Bands of the coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl VolatilityLevel {
    pub fn from_coefficient(coefficient: f64) -> Self {
        if coefficient < 5.0 {
            VolatilityLevel::Low
        } else if coefficient < 15.0 {
            VolatilityLevel::Moderate
        } else if coefficient < 30.0 {
            VolatilityLevel::High
        } else {
            VolatilityLevel::Extreme
        }
    }
}

impl std::fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VolatilityLevel::Low => "low",
            VolatilityLevel::Moderate => "moderate",
            VolatilityLevel::High => "high",
            VolatilityLevel::Extreme => "extreme",
        };
        f.write_str(s)
    }
}

/// Dispersion of prices in a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volatility {
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    pub level: VolatilityLevel,
}

/// On-demand analytics for one symbol. Ephemeral — recomputed each call,
/// never persisted. Each field is independently unavailable during
/// warm-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub current_price: Option<f64>,
    pub moving_average_20: Option<f64>,
    pub change_24h: Option<PriceChange>,
    pub change_7d: Option<PriceChange>,
    pub trend: Trend,
    pub volatility: Option<Volatility>,
    pub generated_at: DateTime<Utc>,
}

impl std::fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Analysis report for {}", self.symbol.to_uppercase())?;
        writeln!(f, "{}", "=".repeat(40))?;
        if let Some(price) = self.current_price {
            writeln!(f, "Current price: ${:.2}", price)?;
        }
        if let Some(ma) = self.moving_average_20 {
            writeln!(f, "20-period MA: ${:.2}", ma)?;
        }
        if let Some(ref change) = self.change_24h {
            writeln!(
                f,
                "24h change: {:.2}% (${:.2})",
                change.percent, change.delta
            )?;
        }
        if let Some(ref change) = self.change_7d {
            writeln!(
                f,
                "7d change: {:.2}% (${:.2})",
                change.percent, change.delta
            )?;
        }
        writeln!(f, "Trend: {}", self.trend)?;
        if let Some(ref vol) = self.volatility {
            writeln!(
                f,
                "Volatility: {} ({:.2}%)",
                vol.level, vol.coefficient_of_variation
            )?;
        }
        write!(f, "Generated: {}", self.generated_at.to_rfc3339())
    }
}
