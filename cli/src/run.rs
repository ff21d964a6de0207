//! Subcommand handlers

use crate::services::{self, Services};
use anyhow::{Context, Result, anyhow, bail};
use songmaster_application::{
    GenerateArtistsUseCase, LlmGateway, NoProgress, ProgressNotifier, RoundOutcome,
    RunIterationInput, RunRoundInput, RunRoundUseCase, SaveSongInput, SaveSongUseCase,
};
use songmaster_domain::{
    Agent, ArtistProfile, BaseSong, IterationContext, IterationFeedback, IterationState,
    PromptKey, SongRequest,
};
use songmaster_infrastructure::config::FileConfig;
use songmaster_presentation::{
    ApiDefaults, AppState, ArtistsArgs, ConsoleFormatter, GenerateArgs, IterateArgs,
    OutputFormat, ProgressReporter, PromptsCommand, RoundArgs, ServeArgs, SimpleProgress,
    server,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

pub async fn serve(config: &FileConfig, services: Services, args: ServeArgs) -> Result<()> {
    let gateway = services::gateway(config)?;
    let defaults = ApiDefaults {
        max_tokens: config.generation.max_tokens,
        orchestrator: config.orchestrator(),
        artist_model: config.provider.default_model.clone(),
    };
    let state = Arc::new(AppState::with_logger(
        gateway,
        config.generation_params(),
        services.prompts,
        defaults,
        services.logger,
    ));

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let port = args.port.unwrap_or(config.server.port);
    let listener = TcpListener::bind((bind.as_str(), port))
        .await
        .with_context(|| format!("Could not bind {}:{}", bind, port))?;

    server::serve(listener, state, shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

/// Token cancelled on the first Ctrl-C, settling pending agents.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling pending requests");
            token.cancel();
        }
    });
    cancel
}

fn progress_for(quiet: bool) -> Box<dyn ProgressNotifier> {
    if quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    }
}

/// The configured agents named by `ids`, or all of them when `ids` is empty.
fn select_agents(configured: Vec<Agent>, ids: &[String]) -> Result<Vec<Agent>> {
    if ids.is_empty() {
        return Ok(configured);
    }
    ids.iter()
        .map(|id| {
            configured
                .iter()
                .find(|agent| agent.id.as_str() == id)
                .cloned()
                .ok_or_else(|| {
                    let known: Vec<&str> = configured.iter().map(|a| a.id.as_str()).collect();
                    anyhow!("Unknown agent '{}' (configured: {})", id, known.join(", "))
                })
        })
        .collect()
}

fn orchestrator_for(config: &FileConfig, model: Option<&str>) -> Agent {
    let mut orchestrator = config.orchestrator();
    if let Some(model) = model.map(str::trim).filter(|m| !m.is_empty()) {
        orchestrator.model = model.to_string();
    }
    orchestrator
}

fn print_outcome(outcome: &RoundOutcome, format: OutputFormat) {
    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(outcome),
        OutputFormat::Winner => ConsoleFormatter::format_winner_only(outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(outcome),
    };
    println!("{}", output);
}

/// Everything a sequence of rounds on one song shares
struct Session<G: LlmGateway + 'static> {
    use_case: RunRoundUseCase<G>,
    request: SongRequest,
    agents: Vec<Agent>,
    orchestrator: Agent,
    progress: Box<dyn ProgressNotifier>,
    cancel: CancellationToken,
}

impl<G: LlmGateway + 'static> Session<G> {
    /// Run iterations until `remaining` reaches zero, the user interrupts,
    /// or a round produces no winner to revise.
    async fn iterate(
        &self,
        state: &mut IterationState,
        mut context: IterationContext,
        remaining: u32,
        format: OutputFormat,
    ) -> Option<RoundOutcome> {
        let mut last = None;
        for _ in 0..remaining {
            if self.cancel.is_cancelled() {
                break;
            }
            let input = RunIterationInput::new(
                context.clone(),
                self.agents.clone(),
                self.orchestrator.clone(),
            )
            .with_artist(self.request.artist.clone());

            match self
                .use_case
                .iterate_with_progress(state, input, self.progress.as_ref(), &self.cancel)
                .await
            {
                Ok(outcome) => {
                    print_outcome(&outcome, format);
                    let next = outcome.iteration_context(&self.request);
                    last = Some(outcome);
                    match next {
                        Some(next) => context = next,
                        None => break,
                    }
                }
                Err(e) => {
                    eprintln!("{}", e);
                    break;
                }
            }
        }
        last
    }
}

async fn save_winner(
    services: &Services,
    outcome: &RoundOutcome,
    state: &IterationState,
) -> Result<()> {
    let saved = SaveSongUseCase::new(Arc::clone(&services.library))
        .execute(
            outcome,
            SaveSongInput {
                iteration_count: state.completed(),
                original_title: state.original_title().map(str::to_string),
                artist_id: None,
            },
        )
        .await?;
    println!("Saved \"{}\" ({})", saved.name, saved.id);
    Ok(())
}

fn session<G: LlmGateway + 'static>(
    config: &FileConfig,
    services: &Services,
    gateway: Arc<G>,
    request: SongRequest,
    round: &RoundArgs,
    quiet: bool,
) -> Result<Session<G>> {
    Ok(Session {
        use_case: RunRoundUseCase::with_logger(
            gateway,
            config.generation_params(),
            Arc::clone(&services.prompts),
            Arc::clone(&services.logger),
        ),
        request,
        agents: select_agents(config.agents(), &round.agents)?,
        orchestrator: orchestrator_for(config, round.orchestrator.as_deref()),
        progress: progress_for(quiet),
        cancel: cancel_on_ctrl_c(),
    })
}

pub async fn generate(
    config: &FileConfig,
    services: Services,
    args: GenerateArgs,
    quiet: bool,
) -> Result<()> {
    let mut request = SongRequest::new(args.description, args.style);
    if let Some(name) = args.artist {
        request = request.with_artist(ArtistProfile::new(
            name,
            args.artist_style.unwrap_or_default(),
            args.artist_traits.unwrap_or_default(),
        ));
    }
    if let Some(instructions) = &args.round.instructions {
        request = request.with_custom_instructions(instructions.as_str());
    }

    let gateway = services::gateway(config)?;
    let session = session(config, &services, gateway, request, &args.round, quiet)?;

    let input = RunRoundInput::new(
        session.request.clone(),
        session.agents.clone(),
        session.orchestrator.clone(),
    );
    let first = session
        .use_case
        .execute_with_progress(input, session.progress.as_ref(), &session.cancel)
        .await?;
    print_outcome(&first, args.round.output);

    let mut state = IterationState::new();
    if let Some(winner) = first.winner() {
        state.establish_title(&winner.name);
    }

    let mut outcome = first;
    if args.round.iterations > 0 {
        match outcome.iteration_context(&session.request) {
            Some(context) => {
                if let Some(last) = session
                    .iterate(&mut state, context, args.round.iterations, args.round.output)
                    .await
                {
                    outcome = last;
                }
            }
            None => eprintln!("No winner to iterate on"),
        }
    }

    if args.round.save {
        save_winner(&services, &outcome, &state).await?;
    }
    Ok(())
}

pub async fn iterate(
    config: &FileConfig,
    services: Services,
    args: IterateArgs,
    quiet: bool,
) -> Result<()> {
    let id: Uuid = args
        .song_id
        .parse()
        .with_context(|| format!("'{}' is not a song id", args.song_id))?;
    let saved = services
        .library
        .get(id)
        .await?
        .ok_or_else(|| anyhow!("No saved song with id {}", id))?;

    let style = args
        .style
        .unwrap_or_else(|| saved.style_description.clone());
    let mut request = SongRequest::new(args.request, style);
    if let Some(instructions) = &args.round.instructions {
        request = request.with_custom_instructions(instructions.as_str());
    }
    let context = IterationContext::new(
        IterationFeedback::default(),
        &request,
        BaseSong::new(saved.style_description.as_str(), saved.lyrics.as_str()),
        0,
    );

    let gateway = services::gateway(config)?;
    let session = session(config, &services, gateway, request, &args.round, quiet)?;

    let mut state = IterationState::resume(
        Some(saved.base_title().to_string()),
        saved.iteration_count + 1,
    );
    let rounds = args.round.iterations.max(1);
    let Some(outcome) = session
        .iterate(&mut state, context, rounds, args.round.output)
        .await
    else {
        bail!("Iteration on \"{}\" did not complete", saved.name);
    };

    if args.round.save {
        save_winner(&services, &outcome, &state).await?;
    }
    Ok(())
}

pub async fn artists(config: &FileConfig, services: Services, args: ArtistsArgs) -> Result<()> {
    let gateway = services::gateway(config)?;
    let model = args
        .model
        .unwrap_or_else(|| config.provider.default_model.clone());
    let use_case =
        GenerateArtistsUseCase::new(gateway, config.generation_params(), services.prompts)
            .with_logger(services.logger);

    let options = use_case
        .execute(&args.idea, &Agent::from_model("artist", model))
        .await?;
    println!("{}", ConsoleFormatter::format_artists(&options));
    Ok(())
}

pub async fn prompts(services: Services, command: PromptsCommand) -> Result<()> {
    match command {
        PromptsCommand::List => {
            for entry in services.prompts.list().await {
                let first_line = entry.content.lines().next().unwrap_or_default();
                println!("{:<20} {}", entry.key, first_line);
            }
        }
        PromptsCommand::Show { key } => {
            let key: PromptKey = key.parse().map_err(|e: String| anyhow!(e))?;
            println!("{}", services.prompts.template(key).await);
        }
        PromptsCommand::Set { key, file } => {
            let key: PromptKey = key.parse().map_err(|e: String| anyhow!(e))?;
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Could not read {}", file.display()))?;
            services.prompts.update(key, &content).await?;
            println!("Updated {}", key);
        }
    }
    Ok(())
}

pub async fn library(services: Services) -> Result<()> {
    let songs = services.library.list().await?;
    print!("{}", ConsoleFormatter::format_library(&songs));
    Ok(())
}
