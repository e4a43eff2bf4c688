use crate::error::{HiveError, Result};
use crate::llm::LlmClient;
use crate::search::{format_hits, SearchClient};
use crate::worker::Worker;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The specialist roles a request can be delegated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerRole {
    /// Web search followed by a written report
    Research,
    /// Comparison, evaluation and risk assessment
    Analysis,
    /// Writing and ideation
    Creative,
    /// Implementation plans and code
    Technical,
}

impl WorkerRole {
    pub fn all() -> &'static [WorkerRole] {
        &[
            WorkerRole::Research,
            WorkerRole::Analysis,
            WorkerRole::Creative,
            WorkerRole::Technical,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkerRole::Research => "research",
            WorkerRole::Analysis => "analysis",
            WorkerRole::Creative => "creative",
            WorkerRole::Technical => "technical",
        }
    }

    /// Exact match against [`WorkerRole::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|r| r.name() == name)
    }

    /// Parse a classifier reply. Case-insensitive; tolerates surrounding
    /// whitespace, quotes and trailing punctuation.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let cleaned = keyword
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        Self::all().iter().copied().find(|r| r.name() == cleaned)
    }

    /// Perspective label used when presenting this role's output to the
    /// consensus step.
    pub fn perspective(&self) -> &'static str {
        match self {
            WorkerRole::Research => "Research specialist",
            WorkerRole::Analysis => "Analyst",
            WorkerRole::Creative => "Creative specialist",
            WorkerRole::Technical => "Technical specialist",
        }
    }

    /// Build the prompt for this role. `search_results` is only used by
    /// the research role.
    pub fn prompt(&self, input: &str, search_results: Option<&str>) -> String {
        match self {
            WorkerRole::Research => format!(
                "As a professional research assistant, write a detailed report based on the search results.\n\n\
                 User question: {input}\n\
                 Search results:\n{}\n\n\
                 Provide:\n\
                 1. A summary of the key information\n\
                 2. Detailed analysis\n\
                 3. Related recommendations\n\
                 4. Sources",
                search_results.unwrap_or_default()
            ),
            WorkerRole::Analysis => format!(
                "As a professional analyst, analyze the following in depth.\n\n\
                 User question: {input}\n\n\
                 Provide:\n\
                 1. Detailed analysis\n\
                 2. Comparison of strengths and weaknesses\n\
                 3. Risk assessment\n\
                 4. Recommendations and conclusion"
            ),
            WorkerRole::Creative => format!(
                "As a creative expert, produce work for the following request.\n\n\
                 User question: {input}\n\n\
                 Provide:\n\
                 1. The creative concept\n\
                 2. The full content\n\
                 3. Suggestions for putting it to use\n\
                 4. Highlights"
            ),
            WorkerRole::Technical => format!(
                "As a technical expert, propose a technical solution for the following request.\n\n\
                 User question: {input}\n\n\
                 Provide:\n\
                 1. The technical approach\n\
                 2. Implementation steps\n\
                 3. Code examples where applicable\n\
                 4. Technical recommendations"
            ),
        }
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A worker that answers as one [`WorkerRole`] through an injected LLM client.
pub struct LlmWorker {
    role: WorkerRole,
    llm: Arc<dyn LlmClient>,
    search: Option<Arc<dyn SearchClient>>,
}

impl LlmWorker {
    pub fn new(role: WorkerRole, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            role,
            llm,
            search: None,
        }
    }

    pub fn with_search(mut self, search: Arc<dyn SearchClient>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn role(&self) -> WorkerRole {
        self.role
    }
}

#[async_trait::async_trait]
impl Worker for LlmWorker {
    async fn run(&self, input: &str) -> Result<String> {
        let search_results = match (self.role, &self.search) {
            (WorkerRole::Research, Some(search)) => Some(format_hits(&search.search(input).await?)),
            (WorkerRole::Research, None) => {
                return Err(HiveError::Config(
                    "research worker requires a search client".into(),
                ))
            }
            _ => None,
        };

        let prompt = self.role.prompt(input, search_results.as_deref());
        self.llm
            .complete(&prompt)
            .await
            .map_err(|e| HiveError::worker(self.role.name(), e.to_string()))
    }
}

/// Build one [`LlmWorker`] per role, all sharing the same clients.
pub fn role_workers(
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchClient>,
) -> Vec<(WorkerRole, Arc<dyn Worker>)> {
    WorkerRole::all()
        .iter()
        .map(|&role| {
            let mut worker = LlmWorker::new(role, Arc::clone(&llm));
            if role == WorkerRole::Research {
                worker = worker.with_search(Arc::clone(&search));
            }
            (role, Arc::new(worker) as Arc<dyn Worker>)
        })
        .collect()
}
