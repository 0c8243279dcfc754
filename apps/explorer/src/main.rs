use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use client_core::{load_settings, Orchestrator, ViewState};
use shared::{
    domain::Backend,
    filters::{FilterCategory, FilterSelection},
    pagination::{page, page_count, visible_ids},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Browse, search and filter chess puzzle images")]
struct Cli {
    /// Config file with endpoint base URLs (defaults to ./explorer.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Serve recommendations from the ML backend instead of RDF.
    #[arg(long, global = true)]
    ml_recommendations: bool,
    /// Filter game state with the ML backend instead of RDF.
    #[arg(long, global = true)]
    ml_game_state: bool,
    /// Print the view state as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the unfiltered collection.
    Browse {
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Search the collection and show the matching puzzles.
    Search {
        query: String,
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    Filter {
        /// Search first, then filter the search results.
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        selection: SelectionArgs,
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Print the schema.org JSON-LD for the loaded images.
    Schema {
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Args, Debug)]
struct SelectionArgs {
    #[arg(long)]
    rooks: Vec<String>,
    #[arg(long)]
    queens: Vec<String>,
    #[arg(long)]
    bishops: Vec<String>,
    #[arg(long)]
    knights: Vec<String>,
    #[arg(long)]
    pawns: Vec<String>,
    #[arg(long)]
    game_state: Vec<String>,
}

impl From<SelectionArgs> for FilterSelection {
    fn from(args: SelectionArgs) -> Self {
        Self {
            rooks: args.rooks,
            queens: args.queens,
            bishops: args.bishops,
            knights: args.knights,
            pawns: args.pawns,
            game_state: args.game_state,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;
    info!(initial = %settings.initial_base_url, search = %settings.search_base_url, "loaded settings");
    let orchestrator = Orchestrator::new(settings);
    if cli.ml_recommendations {
        orchestrator.set_recommendation_backend(Backend::Ml);
    }
    if cli.ml_game_state {
        orchestrator.set_game_state_backend(Backend::Ml);
    }

    // Request failures are logged by the orchestrator; the view just keeps
    // whatever it had, so the results are not inspected here.
    let _ = orchestrator.load_initial().await;

    let page_index = match cli.command {
        Command::Browse { page } => page,
        Command::Search { query, page } => {
            let _ = orchestrator.search(&query).await;
            page
        }
        Command::Filter {
            search,
            selection,
            page,
        } => {
            if let Some(query) = search {
                let _ = orchestrator.search(&query).await;
            }
            let _ = orchestrator.filter(selection.into()).await;
            page
        }
        Command::Schema { search } => {
            if let Some(query) = search {
                let _ = orchestrator.search(&query).await;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&orchestrator.structured_data())?
            );
            return Ok(());
        }
    };

    if page_index > 0 {
        let view = orchestrator.snapshot();
        let _ = orchestrator
            .on_page_change(&visible_ids(&view.images, page_index))
            .await;
    }

    let view = orchestrator.snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        render(&view, page_index, &orchestrator.settings().image_base_url);
    }
    Ok(())
}

fn render(view: &ViewState, page_index: usize, image_base_url: &str) {
    let total_pages = page_count(view.images.len());
    println!(
        "{} puzzles ({:?}), page {}/{}",
        view.images.len(),
        view.phase(),
        if total_pages == 0 { 0 } else { page_index + 1 },
        total_pages
    );
    for image in page(&view.images, page_index) {
        println!("  #{:<8} {image_base_url}{}", image.puzzle_id, image.filename);
    }

    let active: Vec<String> = FilterCategory::ALL
        .into_iter()
        .filter(|category| !view.selected_filters.values(*category).is_empty())
        .map(|category| {
            format!(
                "{category}={}",
                view.selected_filters.values(category).join(",")
            )
        })
        .collect();
    if !active.is_empty() {
        println!("filters: {}", active.join(" "));
    }

    if view.recommendations.is_empty() {
        return;
    }
    println!("recommended ({}):", view.recommendation_backend);
    for recommendation in &view.recommendations {
        match &recommendation.filename {
            Some(filename) => println!(
                "  #{:<8} {image_base_url}{filename}",
                recommendation.puzzle_id
            ),
            None => println!("  #{}", recommendation.puzzle_id),
        }
    }
}
