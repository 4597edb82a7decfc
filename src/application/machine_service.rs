// Machine service - Use cases for the list and detail pages
use crate::application::machine_repository::MachineRepository;
use crate::domain::error::MonitorError;
use crate::domain::machine::{Machine, MachineListing};
use std::sync::Arc;

#[derive(Clone)]
pub struct MachineService {
    repository: Arc<dyn MachineRepository>,
}

impl MachineService {
    pub fn new(repository: Arc<dyn MachineRepository>) -> Self {
        Self { repository }
    }

    /// Never fails: an unreachable data source becomes `MachineListing::Unavailable`
    pub async fn list_machines(&self) -> MachineListing {
        match self.repository.list_machines().await {
            Ok(machines) => MachineListing::from_machines(machines),
            Err(e) => {
                tracing::error!("Error fetching machines: {:#}", e);
                MachineListing::Unavailable(e.to_string())
            }
        }
    }

    pub async fn get_machine(&self, id: &str) -> Result<Machine, MonitorError> {
        match self.repository.get_machine(id).await {
            Ok(Some(machine)) => Ok(machine),
            Ok(None) => Err(MonitorError::NotFound(id.to_string())),
            Err(e) => {
                tracing::error!("Error fetching machine {}: {:#}", id, e);
                Err(MonitorError::Transport(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::machine::MachineStatus;
    use crate::infrastructure::memory_repository::MemoryRepository;
    use async_trait::async_trait;

    struct OfflineRepository;

    #[async_trait]
    impl MachineRepository for OfflineRepository {
        async fn list_machines(&self) -> anyhow::Result<Vec<Machine>> {
            anyhow::bail!("connection refused")
        }

        async fn get_machine(&self, _id: &str) -> anyhow::Result<Option<Machine>> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_empty_catalogue_is_a_valid_listing() {
        let service = MachineService::new(Arc::new(MemoryRepository::new(Vec::new())));
        assert_eq!(service.list_machines().await, MachineListing::Empty);
    }

    #[tokio::test]
    async fn test_listing_is_ordered_by_name() {
        let service = MachineService::new(Arc::new(MemoryRepository::new(vec![
            Machine::new("2", "Mill", "Hall A", MachineStatus::Idle),
            Machine::new("1", "Drill", "Hall B", MachineStatus::Active),
        ])));

        let listing = service.list_machines().await;
        let names: Vec<&str> = listing.machines().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Drill", "Mill"]);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_unavailable_listing() {
        let service = MachineService::new(Arc::new(OfflineRepository));
        let listing = service.list_machines().await;
        assert!(matches!(listing, MachineListing::Unavailable(ref reason) if reason.contains("refused")));
        assert!(matches!(
            service.get_machine("1").await,
            Err(MonitorError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_machine_is_not_found() {
        let service = MachineService::new(Arc::new(MemoryRepository::new(Vec::new())));
        assert!(matches!(
            service.get_machine("nope").await,
            Err(MonitorError::NotFound(id)) if id == "nope"
        ));
    }
}
