use crate::dataset::{Dataset, DatasetType};
use crate::error::Result;
use crate::river::RiverId;
use crate::transform::TransformTable;

/// Upstream provider of GEOGLOWS datasets.
///
/// The cache calls this only on a miss; plot assemblers never call it
/// directly except for the global bias-correction transform.
#[allow(async_fn_in_trait)]
pub trait StreamflowSource {
    /// Fetch one dataset for a river.
    async fn fetch(&self, kind: DatasetType, river_id: RiverId) -> Result<Dataset>;

    /// Fetch the precomputed monthly transform used by global bias correction.
    async fn global_transform(&self, river_id: RiverId) -> Result<TransformTable>;
}
