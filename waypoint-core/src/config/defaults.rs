// Single source of truth for all default values.

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "hashed";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;
pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_L1_TTL_SECS: u64 = 86_400; // 24 hours
pub const DEFAULT_L1_TTI_SECS: u64 = 3_600; // 1 hour
pub const DEFAULT_LOAD_SEED_EXAMPLES: bool = true;
pub const DEFAULT_LOCAL_FALLBACK: bool = false;
pub const DEFAULT_PROVIDER_COOLDOWN_SECS: u64 = 30;

// --- Linear classifier ---
pub const DEFAULT_MAX_ITERATIONS: usize = 500;
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_L2_LAMBDA: f64 = 0.001;
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.01;
pub const DEFAULT_TRAIN_ON_STARTUP: bool = true;

// --- Router ---
pub const DEFAULT_CLASSIFIER_THRESHOLD: f64 = 0.8;
pub const DEFAULT_EMBEDDING_THRESHOLD: f64 = 0.7;
pub const DEFAULT_EMBEDDING_NEIGHBORS: usize = 10;

// --- Few-shot ---
pub const DEFAULT_META_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const DEFAULT_FEW_SHOT_EXAMPLES: usize = 5;
pub const DEFAULT_FEW_SHOT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_FEW_SHOT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_COMPLETION_TIMEOUT_MS: u64 = 8_000;

// --- Retrieval ---
pub const DEFAULT_RETRIEVAL_TOP_K: usize = 30;
pub const DEFAULT_EXPAND_NEIGHBORS: usize = 1;
pub const DEFAULT_INCLUDE_PARENTS: bool = true;
pub const DEFAULT_TOKEN_BUDGET: usize = 6_000;
pub const DEFAULT_RETRIEVAL_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SIBLING_DECAY: f64 = 0.85;
pub const DEFAULT_PARENT_DECAY: f64 = 0.75;
pub const DEFAULT_WEB_TOP_K: usize = 5;
pub const DEFAULT_ANSWER_MAX_TOKENS: usize = 1_024;

// --- Verifier ---
pub const DEFAULT_MIN_COVERAGE: f64 = 0.5;
pub const DEFAULT_RELAXED_COVERAGE: f64 = 0.25;
pub const DEFAULT_REQUIRE_COVERAGE: bool = true;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 1_000;

// --- Providers ---
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MAX_RETRIES: u32 = 2;
