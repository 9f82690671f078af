use async_trait::async_trait;

use bantam_core::person::Person;
use bantam_ports::error::PortError;
use bantam_ports::outbound::PersonRepository;

use super::SqliteDb;

#[async_trait]
impl PersonRepository for SqliteDb {
    async fn save(&self, person: &Person) -> Result<(), PortError> {
        let data = Self::encode(person)?;
        self.put("people", &person.username, &data).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Person>, PortError> {
        match self.get("people", username).await? {
            Some(data) => Ok(Some(Self::decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Person>, PortError> {
        let rows = self.get_all("people").await?;
        let mut people = Vec::with_capacity(rows.len());
        for data in rows {
            people.push(Self::decode(&data)?);
        }
        Ok(people)
    }

    async fn delete(&self, username: &str) -> Result<(), PortError> {
        self.remove("people", username).await
    }
}
