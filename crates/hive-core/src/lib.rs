pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod search;
pub mod supervisor;
pub mod swarm;
pub mod worker;

// Re-export key types
pub use config::Settings;
pub use dispatch::{compare, Comparison, DispatchResult, Dispatcher, Timed, WorkerOutcome, WorkerTask};
pub use error::{HiveError, Result};
pub use llm::{LlmClient, LlmResponse, Message, OpenAIClient, Role, Usage};
pub use search::{format_hits, SearchClient, SearchHit, TavilySearch};
pub use supervisor::{Route, Supervisor, SupervisorOutcome};
pub use swarm::{Swarm, SwarmOutcome};
pub use uuid::Uuid;
pub use worker::{role_workers, BlockingWorker, FnWorker, LlmWorker, Worker, WorkerRole};
