use beadstash_core::{color::ColorKey, ids::*};
use beadstash_engine::{EngineError, QuantitySink};
use beadstash_storage::{InventoryRecord, StorageError};

/// Records every write it receives; optionally fails them all.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub writes: Vec<(UserId, ColorKey, u32)>,
    pub failing: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            writes: Vec::new(),
            failing: true,
        }
    }

    pub fn writes_for(&self, key: &ColorKey) -> Vec<u32> {
        self.writes
            .iter()
            .filter(|(_, k, _)| k == key)
            .map(|(_, _, q)| *q)
            .collect()
    }
}

impl QuantitySink for RecordingSink {
    fn commit_quantity(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        quantity: u32,
    ) -> Result<InventoryRecord, EngineError> {
        self.writes.push((user_id, key.clone(), quantity));
        if self.failing {
            return Err(EngineError::PersistenceFailure(StorageError::NotFound(
                "backend unavailable".into(),
            )));
        }
        Ok(InventoryRecord {
            id: InventoryId::new(),
            user_id,
            key: key.clone(),
            quantity,
            is_custom_color: false,
            created_at: 0,
            updated_at: 0,
        })
    }
}
