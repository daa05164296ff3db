/// Default page size for file listings
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Owner id whose files any authenticated user may read
pub const PUBLIC_USER_ID: i64 = 0;

/// Buffer size used when streaming downloads
pub const DOWNLOAD_CHUNK_SIZE: usize = 4096;

/// Allowance on top of the max file size for multipart framing
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

pub const BYTES_PER_MB: u64 = 1024 * 1024;
pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;
