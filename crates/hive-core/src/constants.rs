/// Hive — centralized constants.
/// Model names, endpoints, env var names and defaults live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const DEFAULT_CHAT_MODEL: &str = "deepseek-chat";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
    pub const TAVILY_BASE_URL: &str = "https://api.tavily.com";
}

// ─── Environment ─────────────────────────────────────────────────────────────

pub mod env {
    pub const LLM_API_KEY: &str = "DEEPSEEK_API_KEY";
    pub const SEARCH_API_KEY: &str = "TAVILY_API_KEY";
}

// ─── Limits & defaults ───────────────────────────────────────────────────────

pub mod limits {
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;
    /// Tavily hits fed to the research worker.
    pub const DEFAULT_SEARCH_RESULTS: u32 = 2;
    pub const SEARCH_TIMEOUT_SECS: u64 = 30;
    /// Characters of each worker output shown in swarm summaries.
    pub const PREVIEW_CHARS: usize = 100;
}

// ─── Messages ────────────────────────────────────────────────────────────────

pub mod messages {
    pub const UNSUPPORTED_TASK: &str = "Sorry, I can't handle this type of task.";
    pub const NO_SEARCH_RESULTS: &str = "No search results.";
}

// ─── Demo prompts ────────────────────────────────────────────────────────────

pub mod demo {
    pub const SUPERVISOR_PROMPTS: &[&str] = &[
        "Research the latest trends in artificial intelligence",
        "Analyze the pros and cons of Python versus Java",
        "Write a short poem about spring",
        "Design a simple user login system",
    ];

    pub const SWARM_PROMPTS: &[&str] = &[
        "How can a team improve its productivity?",
        "Which technology areas look most promising over the next five years?",
    ];
}
