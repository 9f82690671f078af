use async_trait::async_trait;

use bantam_core::plan::NotificationPlan;
use bantam_ports::error::PortError;
use bantam_ports::outbound::NotificationPlanRepository;

use super::SqliteDb;

#[async_trait]
impl NotificationPlanRepository for SqliteDb {
    async fn save(&self, plan: &NotificationPlan) -> Result<(), PortError> {
        let data = Self::encode(plan)?;
        self.put("notification_plans", &plan.username, &data).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<NotificationPlan>, PortError> {
        match self.get("notification_plans", username).await? {
            Some(data) => Ok(Some(Self::decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, username: &str) -> Result<(), PortError> {
        self.remove("notification_plans", username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bantam_core::plan::PlanStep;

    async fn db() -> SqliteDb {
        SqliteDb::new("sqlite::memory:").await.unwrap()
    }

    fn plan() -> NotificationPlan {
        NotificationPlan {
            username: "lancelot".into(),
            steps: vec![
                PlanStep {
                    method: "sms://15551234567".into(),
                    notify_every: Duration::from_secs(120),
                    notify_until: Duration::from_secs(600),
                },
                PlanStep {
                    method: "phone://15551234567".into(),
                    notify_every: Duration::from_secs(300),
                    notify_until: Duration::ZERO,
                },
            ],
        }
    }

    #[tokio::test]
    async fn round_trips_steps_in_order() {
        let db = db().await;
        db.save(&plan()).await.unwrap();

        let found = NotificationPlanRepository::find_by_username(&db, "lancelot")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, plan());
        assert_eq!(found.steps[0].method, "sms://15551234567");
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let db = db().await;
        let err = NotificationPlanRepository::delete(&db, "nobody")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound));
    }
}
