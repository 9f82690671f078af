use async_trait::async_trait;

use bantam_core::escalation::EscalationPlan;
use bantam_ports::error::PortError;
use bantam_ports::outbound::EscalationPlanRepository;

use super::SqliteDb;

#[async_trait]
impl EscalationPlanRepository for SqliteDb {
    async fn save(&self, plan: &EscalationPlan) -> Result<(), PortError> {
        let data = Self::encode(plan)?;
        self.put("escalation_plans", &plan.name, &data).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<EscalationPlan>, PortError> {
        match self.get("escalation_plans", name).await? {
            Some(data) => Ok(Some(Self::decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<EscalationPlan>, PortError> {
        let rows = self.get_all("escalation_plans").await?;
        let mut plans = Vec::with_capacity(rows.len());
        for data in rows {
            plans.push(Self::decode(&data)?);
        }
        Ok(plans)
    }

    async fn delete(&self, name: &str) -> Result<(), PortError> {
        self.remove("escalation_plans", name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bantam_core::escalation::{EscalationMethod, EscalationStepTemplate};

    async fn db() -> SqliteDb {
        SqliteDb::new("sqlite::memory:").await.unwrap()
    }

    fn plan() -> EscalationPlan {
        EscalationPlan {
            name: "kings".into(),
            description: String::new(),
            steps: vec![
                EscalationStepTemplate {
                    wait: Duration::from_secs(300),
                    method: EscalationMethod::NotifyOnDuty,
                    target: String::new(),
                },
                EscalationStepTemplate {
                    wait: Duration::from_secs(600),
                    method: EscalationMethod::NotifyWebhook,
                    target: "https://hooks.example.com/page".into(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn round_trips_methods_and_waits() {
        let db = db().await;
        db.save(&plan()).await.unwrap();

        let found = EscalationPlanRepository::find_by_name(&db, "kings")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, plan());
        assert_eq!(found.steps[1].method, EscalationMethod::NotifyWebhook);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let db = db().await;
        let err = EscalationPlanRepository::delete(&db, "nobody")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound));
    }
}
