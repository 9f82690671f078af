use async_trait::async_trait;

use bantam_core::team::Team;
use bantam_ports::error::PortError;
use bantam_ports::outbound::TeamRepository;

use super::SqliteDb;

#[async_trait]
impl TeamRepository for SqliteDb {
    async fn save(&self, team: &Team) -> Result<(), PortError> {
        let data = Self::encode(team)?;
        self.put("teams", &team.name, &data).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, PortError> {
        match self.get("teams", name).await? {
            Some(data) => Ok(Some(Self::decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Team>, PortError> {
        let rows = self.get_all("teams").await?;
        let mut teams = Vec::with_capacity(rows.len());
        for data in rows {
            teams.push(Self::decode(&data)?);
        }
        Ok(teams)
    }

    async fn delete(&self, name: &str) -> Result<(), PortError> {
        self.remove("teams", name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn db() -> SqliteDb {
        SqliteDb::new("sqlite::memory:").await.unwrap()
    }

    fn kings() -> Team {
        Team {
            name: "kings".into(),
            description: "the round table".into(),
            members: vec!["arthur".into(), "lancelot".into(), "percival".into()],
            rotation_policy: "kings".into(),
            escalation_plan: "kings".into(),
        }
    }

    #[tokio::test]
    async fn member_order_survives_the_round_trip() {
        let db = db().await;
        db.save(&kings()).await.unwrap();

        let found = TeamRepository::find_by_name(&db, "kings")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.members, vec!["arthur", "lancelot", "percival"]);
    }

    #[tokio::test]
    async fn saving_a_rotated_team_persists_the_new_order() {
        let db = db().await;
        let mut team = kings();
        db.save(&team).await.unwrap();

        team.rotate();
        db.save(&team).await.unwrap();

        let found = TeamRepository::find_by_name(&db, "kings")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.members, vec!["lancelot", "percival", "arthur"]);
    }

    #[tokio::test]
    async fn list_all_returns_every_team() {
        let db = db().await;
        let mut other = kings();
        other.name = "squires".into();
        db.save(&kings()).await.unwrap();
        db.save(&other).await.unwrap();

        assert_eq!(TeamRepository::list_all(&db).await.unwrap().len(), 2);
    }
}
