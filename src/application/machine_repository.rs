// Repository trait for machine records
use crate::domain::machine::Machine;
use async_trait::async_trait;

#[async_trait]
pub trait MachineRepository: Send + Sync {
    /// All monitored machines ordered by name
    async fn list_machines(&self) -> anyhow::Result<Vec<Machine>>;

    /// A single machine, `None` when no record has this id
    async fn get_machine(&self, id: &str) -> anyhow::Result<Option<Machine>>;
}
