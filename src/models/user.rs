use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tier. Determines the daily ceiling for quota-gated calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Basic,
    Pro,
}

impl Plan {
    pub fn daily_ceiling(self) -> u32 {
        match self {
            Plan::Free => 10,
            Plan::Basic => 100,
            Plan::Pro => 1000,
        }
    }

    /// Unrecognized plan names fall back to the free tier (ceiling 10).
    pub fn parse(value: &str) -> Plan {
        match value {
            "basic" => Plan::Basic,
            "pro" => Plan::Pro,
            _ => Plan::Free,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub plan: Plan,
    pub completions_today: u32,
    /// Day marker (days since CE, server-local) of the last counter reset.
    pub last_reset_epoch_day: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_ceilings() {
        assert_eq!(Plan::Free.daily_ceiling(), 10);
        assert_eq!(Plan::Basic.daily_ceiling(), 100);
        assert_eq!(Plan::Pro.daily_ceiling(), 1000);
    }

    #[test]
    fn test_unknown_plan_defaults_to_free() {
        assert_eq!(Plan::parse("enterprise"), Plan::Free);
        assert_eq!(Plan::parse(""), Plan::Free);
        assert_eq!(Plan::parse("pro"), Plan::Pro);
    }
}
