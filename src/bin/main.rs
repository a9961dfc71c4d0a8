use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use image_search_client::api::base_api::BaseSearchApi;
use image_search_client::api::design_api::DesignSearchApi;
use image_search_client::api::search_structs::{
    format_patent_date, ApiEnvelope, BaseMatch, PatentMatch, StatsData,
};
use image_search_client::common::api_client::ApiClient;
use image_search_client::common::logging::init_logging;
use image_search_client::common::selected_file::SelectedFile;
use image_search_client::common::settings::{Settings, DEFAULT_CONFIG_PATH};
use image_search_client::components::upload::UploadCapture;
use image_search_client::pages::general_search::GeneralSearchPage;
use image_search_client::pages::patent_search::PatentSearchPage;
use image_search_client::pages::search_state::{SearchFields, SearchPhase, SearchState};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Search image collections by example image", long_about = None)]
struct Args {
    /// Settings file (yaml).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the general collection; the search starts as soon as the image is accepted.
    Search {
        file: PathBuf,
        #[arg(long)]
        top_k: Option<u32>,
        #[arg(long)]
        min_score: Option<f64>,
    },
    /// Search design patents, optionally filtered.
    DesignSearch {
        file: PathBuf,
        #[arg(long)]
        top_k: Option<u32>,
        #[arg(long)]
        min_score: Option<f64>,
        #[arg(long, default_value = "")]
        keyword: String,
        #[arg(long, default_value = "")]
        loc_class: String,
        #[arg(long, default_value = "")]
        applicant: String,
        /// Open result N (0-based) in the detail view.
        #[arg(long)]
        detail: Option<usize>,
    },
    /// General collection statistics.
    Stats,
    /// Design patent collection statistics.
    DesignStats,
    /// Batch import control for the general collection.
    Batch {
        #[command(subcommand)]
        action: BatchAction,
    },
    /// Look up one design patent.
    Patent { id: String },
    /// Download a design patent image.
    DownloadImage {
        patent_id: String,
        file_name: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = false)]
        thumbnail: bool,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum BatchAction {
    Start,
    Status,
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(&args.config)?;
    init_logging(&settings.logging).map_err(|e| anyhow!(e))?;
    info!("Using search service at {}", settings.api.base_url);

    let client = ApiClient::new(&settings.api.base_url)?;
    let defaults = SearchFields::new(settings.search.top_k, settings.search.min_score);

    match args.command {
        Command::Search {
            file,
            top_k,
            min_score,
        } => run_general_search(client, defaults, &file, top_k, min_score).await,
        Command::DesignSearch {
            file,
            top_k,
            min_score,
            keyword,
            loc_class,
            applicant,
            detail,
        } => {
            let page = PatentSearchPage::new(DesignSearchApi::new(client), defaults);
            page.update_fields(|fields| {
                fields.top_k = top_k.unwrap_or(fields.top_k);
                fields.min_score = min_score.unwrap_or(fields.min_score);
                fields.keyword = keyword;
                fields.loc_class = loc_class;
                fields.applicant = applicant;
            });
            run_patent_search(&page, &file, detail).await
        }
        Command::Stats => {
            print_stats(BaseSearchApi::new(client).collection_stats().await?);
            Ok(())
        }
        Command::DesignStats => {
            print_stats(DesignSearchApi::new(client).stats().await?);
            Ok(())
        }
        Command::Batch { action } => {
            let api = BaseSearchApi::new(client);
            let envelope = match action {
                BatchAction::Start => api.start_batch().await?,
                BatchAction::Status => api.batch_status().await?,
                BatchAction::Reset => api.reset_batch().await?,
            };
            print_envelope(&envelope)
        }
        Command::Patent { id } => {
            let detail = DesignSearchApi::new(client)
                .patent_detail(&id)
                .await?
                .into_data()?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
            Ok(())
        }
        Command::DownloadImage {
            patent_id,
            file_name,
            out,
            thumbnail,
        } => {
            let bytes = DesignSearchApi::new(client)
                .fetch_image(&patent_id, &file_name, thumbnail)
                .await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("Cannot write {}", out.display()))?;
            info!("Wrote {} bytes to {}", bytes.len(), out.display());
            Ok(())
        }
    }
}

async fn run_general_search(
    client: ApiClient,
    defaults: SearchFields,
    file: &Path,
    top_k: Option<u32>,
    min_score: Option<f64>,
) -> Result<()> {
    let page = GeneralSearchPage::new(BaseSearchApi::new(client), defaults);
    page.update_fields(|fields| {
        fields.top_k = top_k.unwrap_or(fields.top_k);
        fields.min_score = min_score.unwrap_or(fields.min_score);
    });

    let mut updates = page.subscribe();
    let mut capture = UploadCapture::new(page.upload_handler());
    capture.accept(SelectedFile::from_path(file).await?)?;

    let state = updates
        .wait_for(|state| state.phase.is_terminal())
        .await?
        .clone();
    print_base_results(&state);
    finish(&state)
}

async fn run_patent_search(
    page: &PatentSearchPage<DesignSearchApi>,
    file: &Path,
    detail: Option<usize>,
) -> Result<()> {
    let mut capture = UploadCapture::new(page.upload_handler());
    capture.accept(SelectedFile::from_path(file).await?)?;

    page.trigger_search().await?;
    let state = page.state();
    print_patent_results(&state);

    if let Some(index) = detail {
        let view = page
            .open_detail(index)
            .ok_or_else(|| anyhow!("No result at index {index}"))?;
        println!("\nDetail: {}", view.record.patent_id);
        println!("  image: {}", view.display_url);
        println!("{}", serde_json::to_string_pretty(&view.record.metadata)?);
        page.close_detail();
    }
    finish(&state)
}

fn finish<R>(state: &SearchState<R>) -> Result<()> {
    match (state.phase, &state.error) {
        (SearchPhase::Failed, Some(message)) => bail!("Search failed: {message}"),
        (SearchPhase::Failed, None) => bail!("Search failed"),
        _ => Ok(()),
    }
}

fn print_timing<R>(state: &SearchState<R>) {
    if let Some(outcome) = &state.outcome {
        for (stage, ms) in &outcome.timing {
            println!("  {stage}: {ms:.1} ms");
        }
    }
}

fn print_base_results(state: &SearchState<BaseMatch>) {
    println!("{} results", state.results().len());
    for (i, result) in state.results().iter().enumerate() {
        println!(
            "[{i}] {} score={:.3} pages={}",
            result.patent_id,
            result.max_score,
            result.pages.len()
        );
        for page in &result.pages {
            println!("      {} ({:.3}) {}", page.file_name, page.score, page.thumbnail_url);
        }
    }
    print_timing(state);
}

fn print_patent_results(state: &SearchState<PatentMatch>) {
    println!("{} results", state.results().len());
    for (i, result) in state.results().iter().enumerate() {
        let meta = &result.metadata;
        println!(
            "[{i}] {} score={:.3} {}",
            result.patent_id,
            result.max_score,
            meta.title.as_deref().unwrap_or("-")
        );
        println!(
            "      LOC {} | applicant {} | published {}",
            meta.loc_class.as_deref().unwrap_or("-"),
            meta.applicant_name.as_deref().unwrap_or("-"),
            meta.pub_date.map_or_else(|| "-".to_string(), format_patent_date)
        );
        println!("      page scores {:?}", result.page_scores());
    }
    print_timing(state);
}

fn print_stats(envelope: ApiEnvelope<StatsData>) {
    match envelope.into_data() {
        Ok(stats) => {
            let collection = stats.collection;
            println!(
                "{}: {} entities",
                collection.name.as_deref().unwrap_or("collection"),
                collection.num_entities
            );
            if let Some(error) = collection.error {
                println!("  error: {error}");
            }
        }
        Err(e) => println!("Stats unavailable: {e}"),
    }
}

fn print_envelope(envelope: &ApiEnvelope<Value>) -> Result<()> {
    if let Some(message) = &envelope.message {
        println!("{message}");
    }
    if let Some(data) = &envelope.data {
        println!("{}", serde_json::to_string_pretty(data)?);
    }
    if !envelope.is_success() {
        bail!("Request failed with code {}", envelope.code);
    }
    Ok(())
}
