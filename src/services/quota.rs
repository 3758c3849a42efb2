use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{Datelike, Local, Utc};
use tokio::sync::Mutex;

use crate::{
    errors::{ApiError, Result},
    models::{Plan, UserRecord},
};

/// Per-user daily usage counters. The single lock is the transaction
/// boundary: read, day-reset check, ceiling compare, and increment all
/// happen under one acquisition, so concurrent callers serialize and the
/// counter can never pass the plan ceiling. The durable user-profile
/// store is an external collaborator; this process-local store is its
/// stand-in and the only component that mutates quota state.
#[derive(Default)]
pub struct QuotaStore {
    users: Mutex<HashMap<String, UserRecord>>,
}

/// Days since CE at the server-local calendar day. Quota resets happen
/// lazily at local midnight, matching the product's "per day" wording.
pub fn today_epoch_day() -> i64 {
    i64::from(Local::now().date_naive().num_days_from_ce())
}

impl QuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants one unit of quota-gated work or fails with
    /// `ResourceExhausted`. Never partially increments.
    pub async fn check_and_consume(&self, uid: &str, email: &str) -> Result<Plan> {
        self.check_and_consume_at(uid, email, today_epoch_day()).await
    }

    pub(crate) async fn check_and_consume_at(
        &self,
        uid: &str,
        email: &str,
        epoch_day: i64,
    ) -> Result<Plan> {
        let mut users = self.users.lock().await;

        match users.entry(uid.to_string()) {
            Entry::Vacant(slot) => {
                // First-time user: create the record and grant the first request.
                slot.insert(UserRecord {
                    uid: uid.to_string(),
                    name: String::new(),
                    email: email.to_string(),
                    plan: Plan::Free,
                    completions_today: 1,
                    last_reset_epoch_day: epoch_day,
                    created_at: Utc::now(),
                });
                Ok(Plan::Free)
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                let count = if record.last_reset_epoch_day < epoch_day {
                    0
                } else {
                    record.completions_today
                };

                if count >= record.plan.daily_ceiling() {
                    return Err(ApiError::ResourceExhausted);
                }

                record.completions_today = count + 1;
                if record.last_reset_epoch_day < epoch_day {
                    record.last_reset_epoch_day = epoch_day;
                }

                Ok(record.plan)
            }
        }
    }

    /// Profile upsert for `initUser`. Merges name/email without touching
    /// the usage counter and without consuming quota.
    pub async fn upsert_profile(&self, uid: &str, name: &str, email: &str) {
        let mut users = self.users.lock().await;
        users
            .entry(uid.to_string())
            .and_modify(|record| {
                record.name = name.to_string();
                record.email = email.to_string();
            })
            .or_insert_with(|| UserRecord {
                uid: uid.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                plan: Plan::Free,
                completions_today: 0,
                last_reset_epoch_day: 0,
                created_at: Utc::now(),
            });
    }

    pub async fn get(&self, uid: &str) -> Option<UserRecord> {
        self.users.lock().await.get(uid).cloned()
    }

    #[cfg(test)]
    pub(crate) async fn set_plan(&self, uid: &str, plan: Plan) {
        let mut users = self.users.lock().await;
        if let Some(record) = users.get_mut(uid) {
            record.plan = plan;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const DAY: i64 = 739_000;

    #[tokio::test]
    async fn test_first_call_creates_record_and_counts() {
        let store = QuotaStore::new();

        let plan = store.check_and_consume_at("u1", "u1@example.com", DAY).await.unwrap();
        assert_eq!(plan, Plan::Free);

        let record = store.get("u1").await.unwrap();
        assert_eq!(record.completions_today, 1);
        assert_eq!(record.last_reset_epoch_day, DAY);
    }

    #[tokio::test]
    async fn test_ceiling_enforced() {
        let store = QuotaStore::new();

        for _ in 0..Plan::Free.daily_ceiling() {
            store.check_and_consume_at("u1", "", DAY).await.unwrap();
        }

        let err = store.check_and_consume_at("u1", "", DAY).await.unwrap_err();
        assert!(matches!(err, ApiError::ResourceExhausted));

        // Rejected call must not have incremented the counter.
        let record = store.get("u1").await.unwrap();
        assert_eq!(record.completions_today, Plan::Free.daily_ceiling());
    }

    #[tokio::test]
    async fn test_daily_reset_grants_again() {
        let store = QuotaStore::new();

        for _ in 0..Plan::Free.daily_ceiling() {
            store.check_and_consume_at("u1", "", DAY).await.unwrap();
        }
        assert!(store.check_and_consume_at("u1", "", DAY).await.is_err());

        // Next calendar day: counter effectively resets to 1.
        store.check_and_consume_at("u1", "", DAY + 1).await.unwrap();
        let record = store.get("u1").await.unwrap();
        assert_eq!(record.completions_today, 1);
        assert_eq!(record.last_reset_epoch_day, DAY + 1);
    }

    #[tokio::test]
    async fn test_concurrent_calls_grant_exactly_ceiling() {
        let store = Arc::new(QuotaStore::new());
        let ceiling = Plan::Free.daily_ceiling() as usize;
        let attempts = ceiling + 15;

        let mut handles = Vec::new();
        for _ in 0..attempts {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.check_and_consume_at("u1", "", DAY).await.is_ok()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, ceiling);
        let record = store.get("u1").await.unwrap();
        assert_eq!(record.completions_today as usize, ceiling);
    }

    #[tokio::test]
    async fn test_pro_plan_has_higher_ceiling() {
        let store = QuotaStore::new();
        store.check_and_consume_at("u1", "", DAY).await.unwrap();
        store.set_plan("u1", Plan::Pro).await;

        for _ in 0..100 {
            store.check_and_consume_at("u1", "", DAY).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_upsert_profile_does_not_consume_quota() {
        let store = QuotaStore::new();
        store.upsert_profile("u1", "Ada", "ada@example.com").await;

        let record = store.get("u1").await.unwrap();
        assert_eq!(record.name, "Ada");
        assert_eq!(record.completions_today, 0);

        // Upsert over an existing record keeps the counter.
        store.check_and_consume_at("u1", "", DAY).await.unwrap();
        store.upsert_profile("u1", "Ada L.", "ada@example.com").await;
        let record = store.get("u1").await.unwrap();
        assert_eq!(record.name, "Ada L.");
        assert_eq!(record.completions_today, 1);
    }
}
