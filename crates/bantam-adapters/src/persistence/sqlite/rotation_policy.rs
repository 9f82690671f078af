use async_trait::async_trait;

use bantam_core::rotation::RotationPolicy;
use bantam_ports::error::PortError;
use bantam_ports::outbound::RotationPolicyRepository;

use super::SqliteDb;

#[async_trait]
impl RotationPolicyRepository for SqliteDb {
    async fn save(&self, policy: &RotationPolicy) -> Result<(), PortError> {
        let data = Self::encode(policy)?;
        self.put("rotation_policies", &policy.name, &data).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<RotationPolicy>, PortError> {
        match self.get("rotation_policies", name).await? {
            Some(data) => Ok(Some(Self::decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<RotationPolicy>, PortError> {
        let rows = self.get_all("rotation_policies").await?;
        let mut policies = Vec::with_capacity(rows.len());
        for data in rows {
            policies.push(Self::decode(&data)?);
        }
        Ok(policies)
    }

    async fn delete(&self, name: &str) -> Result<(), PortError> {
        self.remove("rotation_policies", name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;

    async fn db() -> SqliteDb {
        SqliteDb::new("sqlite::memory:").await.unwrap()
    }

    fn weekly() -> RotationPolicy {
        RotationPolicy {
            name: "kings".into(),
            description: "weekly handoff".into(),
            frequency: Duration::from_secs(7 * 24 * 3600),
            rotate_time: "2026-01-05T09:00:00Z".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn round_trips_frequency_and_reference() {
        let db = db().await;
        db.save(&weekly()).await.unwrap();

        let found = RotationPolicyRepository::find_by_name(&db, "kings")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, weekly());
    }

    #[tokio::test]
    async fn zero_frequency_round_trips_as_disabled() {
        let db = db().await;
        let policy = RotationPolicy {
            name: "static".into(),
            description: String::new(),
            frequency: Duration::ZERO,
            rotate_time: Utc::now(),
        };
        db.save(&policy).await.unwrap();

        let found = RotationPolicyRepository::find_by_name(&db, "static")
            .await
            .unwrap()
            .unwrap();
        assert!(found.rotation_disabled());
    }

    #[tokio::test]
    async fn list_all_returns_every_policy() {
        let db = db().await;
        let mut other = weekly();
        other.name = "squires".into();
        db.save(&weekly()).await.unwrap();
        db.save(&other).await.unwrap();

        assert_eq!(
            RotationPolicyRepository::list_all(&db).await.unwrap().len(),
            2
        );
    }
}
