//! CLI entrypoint for toolweave
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use toolweave_application::{AgentStrategy, ToolCallingAgent, ToolExecutorPort, ToolPlanner};
use toolweave_infrastructure::{ConfigLoader, LocalToolExecutor, tool_registry_with};
use toolweave_presentation::{Cli, Command, StrategyArg, formatter_for};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command.clone() else {
        bail!("No command given. Run `toolweave --help` for usage.");
    };

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    let (config, issues) = file_config.resolve();
    for issue in &issues {
        warn!("{}", issue);
    }

    // === Dependency Injection ===
    let registry = Arc::new(tool_registry_with(&config.enabled_tools));
    info!(tools = registry.len(), "Tool registry ready");

    let mut executor = LocalToolExecutor::new(registry).with_config(config.executor);
    if let Some(dir) = cli.working_dir.clone().or(config.working_dir.clone()) {
        if !dir.is_dir() {
            bail!("Working directory does not exist: {}", dir.display());
        }
        executor = executor.with_working_dir(dir);
    }
    let executor = Arc::new(executor);

    let planner = Arc::new(
        ToolPlanner::new(executor.registry_arc(), config.policy)
            .context("Failed to build the tool planner")?,
    );

    let formatter = formatter_for(cli.output);

    let success = match command {
        Command::Plan { task } => {
            let plan = planner.create_plan(&task);
            let report = planner.validate_plan(&plan);
            println!("{}", formatter.format_plan(&plan, &report));
            report.valid
        }

        Command::Select { task } => {
            let selection = planner.select_tools(&task);
            println!("{}", formatter.format_selection(&selection));
            true
        }

        Command::Run { task, strategy } => {
            let mut params = config.agent;
            if let Some(strategy) = strategy {
                params.strategy = match strategy {
                    StrategyArg::Trigger => AgentStrategy::Trigger,
                    StrategyArg::Rules => AgentStrategy::Rules,
                };
            }
            debug!(strategy = %params.strategy, "Running agent");

            let agent = ToolCallingAgent::with_planner(Arc::clone(&executor), planner, params);
            let outcome = agent.run(&task).await;
            println!("{}", formatter.format_run(&outcome));
            outcome.success
        }

        Command::Step { task, max_steps } => {
            let mut params = config.agent;
            if let Some(max) = max_steps {
                params = params.with_max_steps(max.max(1));
            }

            let agent = ToolCallingAgent::with_planner(Arc::clone(&executor), planner, params);
            let outcome = agent.run_stepwise(&task).await;
            println!("{}", formatter.format_stepwise(&outcome));
            outcome.success
        }

        Command::Call {
            tool,
            args,
            timeout_ms,
        } => {
            let params = args.into_iter().collect();
            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(executor.config().timeout);

            let result = executor.execute_with_timeout(&tool, params, timeout, None).await;
            println!("{}", formatter.format_result(&tool, &result));
            result.success
        }

        Command::Tools => {
            let mut tools: Vec<_> = executor.registry().definitions().collect();
            tools.sort_by(|a, b| a.name.cmp(&b.name));
            println!("{}", formatter.format_tools(&tools));
            true
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
