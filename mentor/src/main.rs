use std::path::PathBuf;
use clap::{Parser, Subcommand};
use anyhow::{bail, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mentor::api::{ApiServer, ApiServerConfig};
use mentor::GraphFile;
use mentor_kg::{
    Concept, ConceptPatch, Edge, GraphAccessor, MasteryLevel, MemoryGraphStore, Mentor,
    MentorConfig, RelationKind,
};

#[derive(Parser)]
#[command(name = "mentor")]
#[command(about = "Personal knowledge-graph tutor", long_about = None)]
struct Cli {
    /// Graph snapshot file (.yaml or .json)
    #[arg(short, long, global = true)]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty graph file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Add a concept, or update it if it already exists
    AddConcept {
        /// Concept ID (e.g. "kv-cache")
        id: String,

        /// Display title
        title: String,

        /// Short canonical description
        #[arg(short, long)]
        summary: Option<String>,

        /// Mastery level 0-3
        #[arg(short, long)]
        mastery: Option<u8>,

        /// Learner notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Link two concepts
    Link {
        source: String,
        target: String,

        /// Relation kind (prerequisite, example, related)
        #[arg(short, long, default_value = "prerequisite")]
        kind: RelationKind,

        /// Optional edge weight
        #[arg(short, long)]
        weight: Option<f64>,
    },

    /// Remove a link
    Unlink {
        source: String,
        target: String,

        #[arg(short, long, default_value = "prerequisite")]
        kind: RelationKind,
    },

    /// Remove a concept and its links
    Remove {
        id: String,
    },

    /// Show the context pack for a concept
    Pack {
        id: String,

        /// Maximum number of items (defaults to MENTOR_DEFAULT_BUDGET)
        #[arg(short, long)]
        budget: Option<usize>,

        /// Print JSON instead of an outline
        #[arg(long)]
        json: bool,
    },

    /// Show prerequisites in study order, foundations first
    Path {
        id: String,
    },

    /// Report prerequisite cycles
    Lint,

    /// Start API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "mentor=info,mentor_kg=info".into())
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let graph_path = cli.graph.clone().unwrap_or_else(GraphFile::default_path);
    let file = GraphFile::new(&graph_path);
    let config = MentorConfig::from_env()?;

    match cli.command {
        Commands::Init { force } => {
            if file.init(force)? {
                println!("Graph initialized at {:?}", file.path());
            } else {
                println!("Graph already exists at {:?} (use --force to overwrite)", file.path());
            }
        }

        Commands::AddConcept { id, title, summary, mastery, notes } => {
            let mastery = mastery.map(parse_mastery).transpose()?;
            let mentor = file.open(config)?;

            if mentor.store().get_concept(&id).await.is_ok() {
                let patch = ConceptPatch {
                    title: Some(title),
                    summary,
                    mastery,
                    notes,
                };
                let committed = mentor.writer().update_concept(&id, patch).await?;
                println!("Updated concept: {} - {}", id, committed.record.title);
            } else {
                let concept = Concept::new(id.clone(), title, summary.unwrap_or_default())
                    .with_mastery(mastery.unwrap_or_default())
                    .with_notes(notes.unwrap_or_default());
                let committed = mentor.writer().create_concept(concept).await?;
                println!("Added concept: {} - {}", id, committed.record.title);
            }

            file.save(&mentor).await?;
        }

        Commands::Link { source, target, kind, weight } => {
            let mentor = file.open(config)?;
            let mut edge = Edge::new(source, target, kind);
            if let Some(weight) = weight {
                edge = edge.with_weight(weight);
            }

            let committed = mentor.writer().create_edge(edge).await?;
            file.save(&mentor).await?;
            println!("Linked {}", committed.record.describe());
        }

        Commands::Unlink { source, target, kind } => {
            let mentor = file.open(config)?;
            let committed = mentor.writer().delete_edge(&source, &target, kind).await?;
            file.save(&mentor).await?;
            println!("Unlinked {}", committed.record.describe());
        }

        Commands::Remove { id } => {
            let mentor = file.open(config)?;
            let committed = mentor.writer().delete_concept(&id).await?;
            file.save(&mentor).await?;

            println!("Removed concept: {}", committed.record.concept.id);
            for edge in &committed.record.removed_edges {
                println!("  - {}", edge.describe());
            }
        }

        Commands::Pack { id, budget, json } => {
            let mentor = file.open(config)?;
            let pack = mentor.context_pack(&id, budget).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&pack)?);
            } else {
                println!(
                    "Context pack for {} ({} items{}, generated {})",
                    pack.root,
                    pack.item_count,
                    if pack.truncated { ", truncated" } else { "" },
                    pack.generated_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M:%S")
                );
                print!("{}", pack.render_markdown());
            }
        }

        Commands::Path { id } => {
            let mentor = file.open(config)?;
            let order = mentor.study_order(&id).await?;

            println!("Study order for {}:", id);
            for (step, concept) in order.iter().enumerate() {
                let status = mastery_icon(concept.mastery);
                println!("  {:>2}. {} {} - {}", step + 1, status, concept.id, concept.title);
            }
        }

        Commands::Lint => {
            let mentor = file.open(config)?;
            lint(&mentor).await?;
        }

        Commands::Serve { host, port } => {
            let server = ApiServer::new(ApiServerConfig {
                host,
                port,
                graph_path: Some(graph_path),
                mentor: config,
            });
            server.start().await?;
        }
    }

    Ok(())
}

async fn lint(mentor: &Mentor<MemoryGraphStore>) -> Result<()> {
    let cycles = mentor.cycles().await?;
    if cycles.is_empty() {
        println!("No prerequisite cycles found.");
        return Ok(());
    }

    println!("Found {} prerequisite cycle(s):", cycles.len());
    for cycle in &cycles {
        println!("  [✗] {}", cycle.join(" <-> "));
    }
    bail!("prerequisite graph contains cycles")
}

fn parse_mastery(level: u8) -> Result<MasteryLevel> {
    match MasteryLevel::from_u8(level) {
        Some(mastery) => Ok(mastery),
        None => bail!("mastery must be between 0 and 3, got {}", level),
    }
}

fn mastery_icon(mastery: MasteryLevel) -> &'static str {
    match mastery {
        MasteryLevel::Unseen => "[ ]",
        MasteryLevel::Introduced => "[.]",
        MasteryLevel::Practicing => "[~]",
        MasteryLevel::Mastered => "[✓]",
    }
}
