mod log;
mod maintenance;
mod record;
mod search;
mod similarity;

pub use log::RequestLogEntry;
pub use maintenance::{
    BuildReport, IndexStats, IndexedPostings, KindRepairReport, RepairOptions, RepairReport,
};
pub use record::CardRecord;
pub use search::{Candidate, SearchHit, SearchOutcome, SearchRequest};
pub use similarity::{ClusterMember, SimilarCluster};
