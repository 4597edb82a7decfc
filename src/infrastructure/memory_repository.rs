// In-memory machine catalogue, used without a hosted database
use crate::application::machine_repository::MachineRepository;
use crate::domain::machine::Machine;
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    machines: Vec<Machine>,
}

impl MemoryRepository {
    pub fn new(mut machines: Vec<Machine>) -> Self {
        machines.sort_by(|a, b| a.name.cmp(&b.name));
        Self { machines }
    }
}

#[async_trait]
impl MachineRepository for MemoryRepository {
    async fn list_machines(&self) -> Result<Vec<Machine>> {
        Ok(self.machines.clone())
    }

    async fn get_machine(&self, id: &str) -> Result<Option<Machine>> {
        Ok(self.machines.iter().find(|m| m.id == id).cloned())
    }
}
