use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::SchedulingError;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const ADDR_VAR: &str = "EXAM_SCHEDULER_ADDR";

/// Knobs of a scheduling run. Every field has a default, so a request may omit any of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    pub horizon_days: u32,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub exam_duration_minutes: u32,
    pub max_exams_per_day: u32,
    /// Lets one instructor start an exam exactly when their previous one ends.
    pub allow_back_to_back: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            work_start: clock(9, 0),
            work_end: clock(19, 30),
            exam_duration_minutes: 180,
            max_exams_per_day: 20,
            allow_back_to_back: false,
        }
    }
}

impl SchedulerConfig {
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.exam_duration_minutes))
    }

    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.horizon_days == 0 {
            return Err(SchedulingError::InvalidConfig(
                "horizonDays must be positive".to_string(),
            ));
        }
        if self.exam_duration_minutes == 0 {
            return Err(SchedulingError::InvalidConfig(
                "examDurationMinutes must be positive".to_string(),
            ));
        }
        if self.max_exams_per_day == 0 {
            return Err(SchedulingError::InvalidConfig(
                "maxExamsPerDay must be positive".to_string(),
            ));
        }
        if self.work_end <= self.work_start {
            return Err(SchedulingError::InvalidConfig(format!(
                "workEnd {} is not after workStart {}",
                self.work_end, self.work_start
            )));
        }
        Ok(())
    }
}

/// Process-level settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind_addr = env::var(ADDR_VAR)
            .ok()
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        Self { bind_addr }
    }
}

// hour/minute literals are always in range
fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_working_day() {
        let config = SchedulerConfig::default();
        assert_eq!(config.work_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(config.work_end, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert_eq!(config.duration(), TimeDelta::minutes(180));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{"horizonDays": 5, "workStart": "08:00:00"}"#).unwrap();
        assert_eq!(config.horizon_days, 5);
        assert_eq!(config.work_start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(config.max_exams_per_day, 20);
        assert!(!config.allow_back_to_back);
    }

    #[test]
    fn rejects_non_positive_settings() {
        let zero_horizon = SchedulerConfig {
            horizon_days: 0,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            zero_horizon.validate(),
            Err(SchedulingError::InvalidConfig(_))
        ));

        let zero_duration = SchedulerConfig {
            exam_duration_minutes: 0,
            ..SchedulerConfig::default()
        };
        assert!(zero_duration.validate().is_err());

        let zero_cap = SchedulerConfig {
            max_exams_per_day: 0,
            ..SchedulerConfig::default()
        };
        assert!(zero_cap.validate().is_err());

        let inverted = SchedulerConfig {
            work_start: clock(18, 0),
            work_end: clock(9, 0),
            ..SchedulerConfig::default()
        };
        assert!(inverted.validate().is_err());
    }
}
