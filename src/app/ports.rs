use async_trait::async_trait;

use crate::error::Result;
use crate::plss::PlssToken;
use crate::types::{OwnerRecord, RawRow};

/// Where raw owner rows come from (an uploaded workbook, in practice)
#[async_trait]
pub trait TabularInputPort: Send + Sync {
    /// Human-readable origin for logs
    fn describe(&self) -> String;

    async fn load_rows(&self) -> Result<Vec<RawRow>>;
}

/// Destination for a finished owner dataset
#[async_trait]
pub trait OwnerOutputPort: Send + Sync {
    async fn write_owners(&self, owners: &[OwnerRecord]) -> Result<String>;
}

/// Core seam for anything that can look up owners for PLSS locations
#[async_trait]
pub trait OwnerSource: Send + Sync {
    /// Unique identifier for this source
    fn source_name(&self) -> &'static str;

    /// Fetch owners for every token in `tokens`, in token order
    async fn fetch_owners(&self, county: &str, tokens: &[PlssToken]) -> Result<Vec<OwnerRecord>>;
}
