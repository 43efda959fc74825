//! Names of every metric the monitor publishes.

pub const NODE_COUNT: &str = "NodeCount";
pub const DATA_NODE_COUNT: &str = "DataNodeCount";

pub const ACTIVE_PRIMARY_SHARDS: &str = "ActivePrimaryShards";
pub const ACTIVE_SHARDS_PERCENT: &str = "ActiveShardsPercent";
pub const ACTIVE_SHARDS: &str = "ActiveShards";
pub const RELOCATING_SHARDS: &str = "RelocatingShards";
pub const INITIALIZING_SHARDS: &str = "InitializingShards";
pub const UNASSIGNED_SHARDS: &str = "UnassignedShards";
pub const DELAYED_UNASSIGNED_SHARDS: &str = "DelayedUnassignedShards";

pub const INIT_HEAP: &str = "InitHeap";
pub const MAX_HEAP: &str = "MaxHeap";
pub const INIT_NON_HEAP: &str = "InitNonHeap";
pub const MAX_NON_HEAP: &str = "MaxNonHeap";
pub const MAX_DIRECT: &str = "MaxDirect";

pub const INDEX_COUNT: &str = "IndexCount";
pub const SHARD_COUNT: &str = "ShardCount";

pub const DOC_COUNT: &str = "DocCount";
pub const DELETED_COUNT: &str = "DeletedCount";
pub const DOC_COUNT_PER_SECOND: &str = "DocCountPerSecond";
pub const DELETED_COUNT_PER_SECOND: &str = "DeletedCountPerSecond";

pub const STORE_SIZE: &str = "StoreSize";
pub const STORE_THROTTLE_TIME: &str = "StoreThrottleTime";
pub const INDEXING_THROTTLE_TIME: &str = "IndexingThrottleTime";
pub const INDEXING_CURRENT: &str = "IndexingCurrent";
pub const DELETE_CURRENT: &str = "DeleteCurrent";
pub const QUERY_CURRENT: &str = "QueryCurrent";
pub const FETCH_CURRENT: &str = "FetchCurrent";
pub const SCROLL_CURRENT: &str = "ScrollCurrent";
pub const QUERY_CACHE_SIZE: &str = "QueryCacheSize";
pub const FIELD_DATA_SIZE: &str = "FieldDataSize";
pub const FIELD_DATA_EVICTIONS: &str = "FieldDataEvictions";
pub const PERCOLATE_SIZE: &str = "PercolateSize";
pub const TRANSLOG_SIZE: &str = "TranslogSize";
pub const REQUEST_CACHE_SIZE: &str = "RequestCacheSize";
pub const RECOVERY_THROTTLE_TIME: &str = "RecoveryThrottleTime";
pub const RECOVERY_AS_SOURCE: &str = "RecoveryAsSource";
pub const RECOVERY_AS_TARGET: &str = "RecoveryAsTarget";

pub const COMPLETION_SIZE: &str = "CompletionSize";
pub const SEGMENT_COUNT: &str = "SegmentCount";
pub const SEGMENT_SIZE: &str = "SegmentSize";
pub const FILE_DESCRIPTOR_COUNT: &str = "FileDescriptorCount";
pub const FILE_DESCRIPTOR_LIMIT: &str = "FileDescriptorLimit";
pub const FILE_SYSTEM_SIZE: &str = "FileSystemSize";
pub const PERCOLATE_COUNT: &str = "PercolateCount";

pub const ALL_METRICS: &[&str] = &[
    NODE_COUNT,
    DATA_NODE_COUNT,
    ACTIVE_PRIMARY_SHARDS,
    ACTIVE_SHARDS_PERCENT,
    ACTIVE_SHARDS,
    RELOCATING_SHARDS,
    INITIALIZING_SHARDS,
    UNASSIGNED_SHARDS,
    DELAYED_UNASSIGNED_SHARDS,
    INIT_HEAP,
    MAX_HEAP,
    INIT_NON_HEAP,
    MAX_NON_HEAP,
    MAX_DIRECT,
    INDEX_COUNT,
    SHARD_COUNT,
    DOC_COUNT,
    DELETED_COUNT,
    DOC_COUNT_PER_SECOND,
    DELETED_COUNT_PER_SECOND,
    INDEXING_THROTTLE_TIME,
    INDEXING_CURRENT,
    DELETE_CURRENT,
    QUERY_CURRENT,
    FETCH_CURRENT,
    SCROLL_CURRENT,
    PERCOLATE_SIZE,
    TRANSLOG_SIZE,
    REQUEST_CACHE_SIZE,
    RECOVERY_THROTTLE_TIME,
    RECOVERY_AS_SOURCE,
    RECOVERY_AS_TARGET,
    COMPLETION_SIZE,
    SEGMENT_COUNT,
    SEGMENT_SIZE,
    FILE_DESCRIPTOR_COUNT,
    FILE_DESCRIPTOR_LIMIT,
    FILE_SYSTEM_SIZE,
    PERCOLATE_COUNT,
    STORE_SIZE,
    STORE_THROTTLE_TIME,
    QUERY_CACHE_SIZE,
    FIELD_DATA_SIZE,
    FIELD_DATA_EVICTIONS,
];
