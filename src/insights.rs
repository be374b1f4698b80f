//! FitCheck insight evaluation.
//!
//! Stateless: turns one day of submitted metrics into a summary and a list of
//! human readable insights using the thresholds from [`InsightsConfig`].

use crate::app_config::InsightsConfig;
use serde::Serialize;
use serde_json::Value;

/// Keys every evaluation request must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 4] = ["weight", "steps", "sleepHours", "calories"];

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub weight: f64,
    pub steps: i64,
    pub sleep_hours: f64,
    pub calories: i64,
}

#[derive(Debug, PartialEq)]
pub enum MetricsError {
    Missing(Vec<&'static str>),
    InvalidTypes,
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Missing(fields) => {
                let quoted: Vec<String> = fields.iter().map(|f| format!("'{}'", f)).collect();
                write!(f, "missing fields: [{}]", quoted.join(", "))
            }
            MetricsError::InvalidTypes => {
                f.write_str("invalid types; expected numbers for all fields")
            }
        }
    }
}

impl std::error::Error for MetricsError {}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        // Fractional counts are truncated toward zero.
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

impl Metrics {
    /// Read metrics out of a request body. Anything that is not a JSON object
    /// is treated as an empty object.
    pub fn from_json(body: &Value) -> Result<Self, MetricsError> {
        let empty = serde_json::Map::new();
        let fields = body.as_object().unwrap_or(&empty);

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|key| !fields.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(MetricsError::Missing(missing));
        }

        Ok(Metrics {
            weight: as_float(&fields["weight"]).ok_or(MetricsError::InvalidTypes)?,
            steps: as_int(&fields["steps"]).ok_or(MetricsError::InvalidTypes)?,
            sleep_hours: as_float(&fields["sleepHours"]).ok_or(MetricsError::InvalidTypes)?,
            calories: as_int(&fields["calories"]).ok_or(MetricsError::InvalidTypes)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub met_steps_goal: bool,
    pub good_sleep: bool,
    pub rest_day: bool,
}

#[derive(Debug, Serialize)]
pub struct Insight {
    pub key: &'static str,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Evaluation {
    pub summary: Summary,
    pub insights: Vec<Insight>,
}

/// Hours rendered with at least one decimal, e.g. `7.0` or `6.3`. Very large
/// or very small values switch to exponent form (`1e16`).
fn hours(value: f64) -> String {
    format!("{:?}", value)
}

pub fn evaluate(metrics: &Metrics, config: &InsightsConfig) -> Evaluation {
    let met_steps_goal = metrics.steps >= config.steps_goal_daily;
    let good_sleep = metrics.sleep_hours >= config.sleep_min_hours;
    let rest_day = !good_sleep;

    let steps_message = if met_steps_goal {
        "Great! You hit your daily steps goal.".to_string()
    } else {
        format!(
            "You're {} steps short of today's goal.",
            i128::from(config.steps_goal_daily) - i128::from(metrics.steps)
        )
    };

    let sleep_message = if good_sleep {
        "Sleep looks solid for training.".to_string()
    } else {
        format!(
            "Consider lighter training or rest – you slept {}h (< {}h).",
            hours(metrics.sleep_hours),
            hours(config.sleep_min_hours)
        )
    };

    let rest_message = if rest_day {
        "Recommended rest or light activity today."
    } else {
        "No rest day needed based on sleep alone."
    };

    // Widened so extreme submissions cannot overflow.
    let calorie_delta = i128::from(metrics.calories) - i128::from(config.calories_recommended);
    let calorie_verdict = if calorie_delta.abs() <= i128::from(config.calories_tolerance) {
        "On target."
    } else if calorie_delta > 0 {
        "Slightly above recommended."
    } else {
        "Slightly below recommended."
    };

    Evaluation {
        summary: Summary {
            met_steps_goal,
            good_sleep,
            rest_day,
        },
        insights: vec![
            Insight {
                key: "daily_steps_goal",
                ok: met_steps_goal,
                message: steps_message,
            },
            Insight {
                key: "sleep_quality",
                ok: good_sleep,
                message: sleep_message,
            },
            Insight {
                key: "rest_day_recommendation",
                ok: !rest_day,
                message: rest_message.to_string(),
            },
            Insight {
                key: "calories_delta",
                ok: true,
                message: format!(
                    "Calories: {} vs rec {}. {}",
                    metrics.calories, config.calories_recommended, calorie_verdict
                ),
            },
        ],
    }
}
