// Single source of truth for all default values.

// --- Models ---
pub const DEFAULT_BUNDLE_DIR: &str = "models";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_ARTIFACT_BYTES: u64 = 67_108_864; // 64 MB
pub const DEFAULT_RECOVER_AFTER_FAILURES: u32 = 3;

// --- Cache ---
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000;
pub const DEFAULT_CACHE_MAX_BYTES: usize = 8_388_608; // 8 MB
pub const DEFAULT_CACHE_MAX_ENTRY_BYTES: usize = 65_536; // 64 KB
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_TTL_HIGH_SECS: u64 = 1_800;
pub const DEFAULT_TTL_MEDIUM_SECS: u64 = 600;
pub const DEFAULT_TTL_LOW_SECS: u64 = 120;
pub const DEFAULT_TTL_FALLBACK_SECS: u64 = 60;
pub const DEFAULT_HIGH_CONFIDENCE: f64 = 80.0;
pub const DEFAULT_MEDIUM_CONFIDENCE: f64 = 50.0;

// --- Features ---
pub const DEFAULT_REFERENCE_WIDTH: f64 = 1920.0;
pub const DEFAULT_REFERENCE_HEIGHT: f64 = 1080.0;
pub const DEFAULT_REFERENCE_PIXEL_RATIO: f64 = 3.0;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
