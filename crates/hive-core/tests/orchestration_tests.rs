use hive_core::{
    Dispatcher, HiveError, LlmClient, LlmResponse, LlmWorker, Message, SearchClient, SearchHit,
    Supervisor, Swarm, Worker, WorkerOutcome, WorkerRole,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock LLM: answers classification and consensus prompts from a script and
/// echoes the role line for everything else. Records every prompt.
struct MockLlm {
    classification: String,
    fail_on: Option<&'static str>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    fn new(classification: &str) -> Self {
        Self {
            classification: classification.to_string(),
            fail_on: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, marker: &'static str) -> Self {
        self.fail_on = Some(marker);
        self
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse, HiveError> {
        let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt.clone());

        if let Some(marker) = self.fail_on {
            if prompt.contains(marker) {
                return Err(HiveError::Llm("rate limited".into()));
            }
        }

        let reply = if prompt.contains("task dispatcher") {
            self.classification.clone()
        } else if prompt.contains("swarm coordinator") {
            "CONSENSUS".to_string()
        } else {
            let role_line = prompt.lines().next().unwrap_or_default();
            format!("reply to: {role_line}")
        };

        Ok(LlmResponse {
            message: Message::assistant(reply),
            usage: None,
        })
    }
}

struct MockSearch {
    calls: AtomicUsize,
}

impl MockSearch {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl SearchClient for MockSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, HiveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![SearchHit {
            title: "Tokio".into(),
            url: "https://tokio.rs".into(),
            content: "An asynchronous runtime".into(),
        }])
    }
}

struct FailingSearch;

#[async_trait::async_trait]
impl SearchClient for FailingSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, HiveError> {
        Err(HiveError::Search("quota exceeded".into()))
    }
}

// ========================================================================
// Workers
// ========================================================================

#[tokio::test]
async fn test_research_worker_embeds_search_hits() {
    let llm = Arc::new(MockLlm::new("research"));
    let search = Arc::new(MockSearch::new());
    let worker = LlmWorker::new(WorkerRole::Research, llm.clone()).with_search(search.clone());

    let output = worker.run("what is tokio?").await.unwrap();

    assert!(output.starts_with("reply to: As a professional research assistant"));
    assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    let prompt = &llm.prompts()[0];
    assert!(prompt.contains("https://tokio.rs"));
    assert!(prompt.contains("User question: what is tokio?"));
}

#[tokio::test]
async fn test_research_worker_requires_search() {
    let worker = LlmWorker::new(WorkerRole::Research, Arc::new(MockLlm::new("research")));
    let err = worker.run("x").await.unwrap_err();
    assert!(matches!(err, HiveError::Config(_)));
}

#[tokio::test]
async fn test_non_research_workers_skip_search() {
    let search = Arc::new(MockSearch::new());
    let worker = LlmWorker::new(WorkerRole::Creative, Arc::new(MockLlm::new("creative")))
        .with_search(search.clone());

    worker.run("a poem").await.unwrap();
    assert_eq!(search.calls.load(Ordering::SeqCst), 0);
}

// ========================================================================
// Supervisor
// ========================================================================

#[tokio::test]
async fn test_supervisor_assigns_classified_role() {
    let llm = Arc::new(MockLlm::new("  Technical\n"));
    let supervisor = Supervisor::from_roles(llm.clone(), Arc::new(MockSearch::new()));

    let outcome = supervisor.run("design a login system").await.unwrap();

    assert_eq!(outcome.task_type, "technical");
    assert_eq!(outcome.assigned, Some(WorkerRole::Technical));
    assert!(outcome.result.contains("As a technical expert"));
    assert_eq!(outcome.steps, 2);
    // one classification call + one worker call
    assert_eq!(llm.prompts().len(), 2);
}

#[tokio::test]
async fn test_supervisor_unknown_classification_finishes() {
    let llm = Arc::new(MockLlm::new("cooking"));
    let supervisor = Supervisor::from_roles(llm.clone(), Arc::new(MockSearch::new()));

    let outcome = supervisor.run("bake bread").await.unwrap();

    assert_eq!(outcome.assigned, None);
    assert_eq!(outcome.result, hive_core::constants::messages::UNSUPPORTED_TASK);
    assert_eq!(outcome.steps, 1);
    assert_eq!(llm.prompts().len(), 1);
}

#[tokio::test]
async fn test_supervisor_missing_worker_finishes() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::new("analysis"));
    let mut workers: HashMap<WorkerRole, Arc<dyn Worker>> = HashMap::new();
    workers.insert(
        WorkerRole::Creative,
        Arc::new(LlmWorker::new(WorkerRole::Creative, llm.clone())),
    );
    let supervisor = Supervisor::new(llm, workers);

    let outcome = supervisor.run("compare a and b").await.unwrap();
    assert_eq!(outcome.task_type, "analysis");
    assert_eq!(outcome.assigned, None);
}

#[tokio::test]
async fn test_supervisor_reports_worker_failure_as_result() {
    let llm = Arc::new(MockLlm::new("research"));
    let supervisor = Supervisor::from_roles(llm, Arc::new(FailingSearch));

    let outcome = supervisor.run("latest ai news").await.unwrap();

    assert_eq!(outcome.assigned, Some(WorkerRole::Research));
    assert!(outcome.result.starts_with("research worker failed"));
    assert!(outcome.result.contains("quota exceeded"));
}

#[tokio::test(start_paused = true)]
async fn test_supervisor_timeout_stops_stalled_worker() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::new("technical"));
    let stalled: Arc<dyn Worker> = Arc::new(hive_core::FnWorker::new(|_| async {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok("too late".to_string())
    }));
    let workers = HashMap::from([(WorkerRole::Technical, stalled)]);
    let supervisor = Supervisor::new(llm, workers).with_timeout(Some(Duration::from_secs(5)));

    let started = tokio::time::Instant::now();
    let outcome = supervisor.run("build a cache").await.unwrap();

    assert_eq!(outcome.assigned, Some(WorkerRole::Technical));
    assert_eq!(outcome.steps, 2);
    assert!(outcome.result.starts_with("technical worker timed out after 5s"));
    assert!(started.elapsed() < Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_supervisor_timeout_leaves_fast_worker_alone() {
    let llm = Arc::new(MockLlm::new("creative"));
    let supervisor = Supervisor::from_roles(llm, Arc::new(MockSearch::new()))
        .with_timeout(Some(Duration::from_secs(5)));

    let outcome = supervisor.run("a poem").await.unwrap();

    assert_eq!(supervisor.timeout(), Some(Duration::from_secs(5)));
    assert!(outcome.result.starts_with("reply to: As a creative expert"));
}

#[tokio::test]
async fn test_supervisor_classification_error_propagates() {
    let llm = Arc::new(MockLlm::new("research").failing_on("task dispatcher"));
    let supervisor = Supervisor::from_roles(llm, Arc::new(MockSearch::new()));

    assert!(matches!(supervisor.run("x").await, Err(HiveError::Llm(_))));
}

// ========================================================================
// Swarm
// ========================================================================

#[tokio::test]
async fn test_swarm_runs_every_role_then_builds_consensus() {
    let llm = Arc::new(MockLlm::new("unused"));
    let search = Arc::new(MockSearch::new());
    let swarm = Swarm::from_roles(llm.clone(), search.clone(), None).unwrap();

    let outcome = swarm.run("improve team productivity").await.unwrap();

    assert_eq!(outcome.consensus, "CONSENSUS");
    assert_eq!(outcome.steps, 2);
    assert_eq!(outcome.parallel_results.len(), 4);
    for role in WorkerRole::all() {
        let output = outcome.parallel_results.output(role.name()).unwrap();
        assert!(output.starts_with("reply to: As a"));
    }
    assert_eq!(search.calls.load(Ordering::SeqCst), 1);

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 5);
    let consensus_prompt = prompts.last().unwrap();
    assert!(consensus_prompt.contains("User question: improve team productivity"));
    assert!(consensus_prompt.contains("Research specialist view: reply to:"));
    assert!(consensus_prompt.contains("Technical specialist view: reply to:"));
}

#[tokio::test]
async fn test_swarm_keeps_going_when_a_worker_fails() {
    let llm = Arc::new(MockLlm::new("unused").failing_on("As a creative expert"));
    let swarm = Swarm::from_roles(llm.clone(), Arc::new(MockSearch::new()), None).unwrap();

    let outcome = swarm.run("future tech").await.unwrap();

    assert!(matches!(
        outcome.parallel_results.get("creative"),
        Some(WorkerOutcome::Failed(_))
    ));
    assert_eq!(outcome.parallel_results.failure_count(), 1);
    assert_eq!(outcome.consensus, "CONSENSUS");
    let consensus_prompt = llm.prompts().last().cloned().unwrap();
    assert!(consensus_prompt.contains("Creative specialist view: processing failed:"));
}

#[tokio::test]
async fn test_swarm_consensus_error_propagates() {
    let llm = Arc::new(MockLlm::new("unused").failing_on("swarm coordinator"));
    let swarm = Swarm::from_roles(llm, Arc::new(MockSearch::new()), None).unwrap();

    assert!(matches!(swarm.run("x").await, Err(HiveError::Llm(_))));
}

#[tokio::test]
async fn test_swarm_with_custom_dispatcher() {
    let llm = Arc::new(MockLlm::new("unused"));
    let dispatcher = Dispatcher::new()
        .with_worker(
            "critic",
            Arc::new(hive_core::FnWorker::new(|input| async move {
                Ok(format!("critique of {input}"))
            })),
        )
        .unwrap()
        .with_timeout(Duration::from_secs(10));
    let swarm = Swarm::new(llm.clone(), dispatcher);

    let outcome = swarm.run("plan").await.unwrap();

    assert_eq!(outcome.parallel_results.output("critic"), Some("critique of plan"));
    assert_eq!(swarm.dispatcher().timeout(), Some(Duration::from_secs(10)));
    assert!(llm.prompts()[0].contains("critic view: critique of plan"));
}

#[tokio::test]
async fn test_swarm_labels_only_exact_role_names() {
    let llm = Arc::new(MockLlm::new("unused"));
    let dispatcher = Dispatcher::new()
        .with_worker(
            "research!",
            Arc::new(hive_core::FnWorker::new(|_| async { Ok("custom".to_string()) })),
        )
        .unwrap()
        .with_worker(
            "analysis",
            Arc::new(hive_core::FnWorker::new(|_| async { Ok("numbers".to_string()) })),
        )
        .unwrap();
    let swarm = Swarm::new(llm.clone(), dispatcher);

    let outcome = swarm.run("plan").await.unwrap();

    assert_eq!(
        hive_core::swarm::ordered_names(&outcome.parallel_results),
        vec!["analysis", "research!"]
    );
    let prompt = &llm.prompts()[0];
    assert!(prompt.contains("research! view: custom"));
    assert!(prompt.contains("Analyst view: numbers"));
    assert!(!prompt.contains("Research specialist"));
}

#[test]
fn test_swarm_contribution_for_missing_name_is_empty() {
    let result = hive_core::DispatchResult::default();
    assert_eq!(hive_core::swarm::contribution(&result, "nobody"), "");
}
