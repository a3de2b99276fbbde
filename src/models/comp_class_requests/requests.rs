use serde::Deserialize;
use ts_rs::TS;

use crate::errors::{BigOError, Result};

/// 修改明细的数组规模
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "comp_class_request.ts")]
pub struct UpdateRequestItemRequest {
    pub array_size: i64,
}

impl UpdateRequestItemRequest {
    pub fn validate(&self) -> Result<()> {
        if self.array_size < 0 {
            return Err(BigOError::validation("array_size must be >= 0"));
        }
        Ok(())
    }
}
