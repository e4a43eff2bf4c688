use anyhow::Result;
use hive_core::constants::demo;
use hive_core::{compare, LlmClient, SearchClient, Settings, Supervisor, Swarm};
use std::sync::Arc;

use crate::cli::Command;
use crate::render;

struct Clients {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchClient>,
}

impl Clients {
    fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            llm: settings.build_llm_client()?,
            search: settings.build_search_client()?,
        })
    }

    fn supervisor(&self, settings: &Settings) -> Supervisor {
        Supervisor::from_roles(Arc::clone(&self.llm), Arc::clone(&self.search))
            .with_timeout(settings.worker_timeout())
    }

    fn swarm(&self, settings: &Settings) -> Result<Swarm> {
        Ok(Swarm::from_roles(
            Arc::clone(&self.llm),
            Arc::clone(&self.search),
            settings.worker_timeout(),
        )?)
    }
}

pub async fn run(settings: &Settings, command: Command) -> Result<()> {
    let clients = Clients::from_settings(settings)?;

    match command {
        Command::Supervise { prompt } => {
            let outcome = clients.supervisor(settings).run(&prompt).await?;
            print!("{}", render::supervisor(&outcome));
        }
        Command::Swarm { prompt } => {
            let outcome = clients.swarm(settings)?.run(&prompt).await?;
            print!("{}", render::swarm(&outcome));
        }
        Command::Compare { prompt } => {
            let swarm = clients.swarm(settings)?;
            let cmp = compare(swarm.dispatcher(), &prompt).await?;
            print!("{}", render::comparison(&cmp));
        }
        Command::Demo => run_demo(&clients, settings).await?,
    }

    Ok(())
}

async fn run_demo(clients: &Clients, settings: &Settings) -> Result<()> {
    println!("Started: {}", timestamp());

    println!("\nSupervisor mode");
    println!("{}", render::RULE);
    let supervisor = clients.supervisor(settings);
    for (i, prompt) in demo::SUPERVISOR_PROMPTS.iter().enumerate() {
        println!("\nCase {}: {prompt}", i + 1);
        match supervisor.run(prompt).await {
            Ok(outcome) => print!("{}", render::supervisor(&outcome)),
            Err(e) => eprintln!("Error: {e}"),
        }
        println!("{}", render::RULE);
    }

    println!("\nSwarm mode");
    println!("{}", render::RULE);
    let swarm = clients.swarm(settings)?;
    for (i, prompt) in demo::SWARM_PROMPTS.iter().enumerate() {
        println!("\nCase {}: {prompt}", i + 1);
        match swarm.run(prompt).await {
            Ok(outcome) => print!("{}", render::swarm(&outcome)),
            Err(e) => eprintln!("Error: {e}"),
        }
        println!("{}", render::RULE);
    }

    println!("\nFinished: {}", timestamp());
    Ok(())
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
