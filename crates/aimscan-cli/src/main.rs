use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

mod output;

use output::ColorMode;

/// Mine sustainability-aim sections out of annual report PDFs and annotate
/// them with sentiment and change columns
#[derive(Parser, Debug)]
#[command(name = "aimscan", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract aim sections from yearly report PDFs into a CSV
    Extract {
        /// Directory containing <year>.pdf report files
        #[arg(long)]
        reports_dir: Option<PathBuf>,

        /// Output CSV path (appended to if it already exists)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First report year (inclusive)
        #[arg(long, default_value_t = 2020)]
        from_year: i32,

        /// Last report year (inclusive)
        #[arg(long, default_value_t = 2023)]
        to_year: i32,

        /// Minimum glyph font size for a line to count as body text
        #[arg(long)]
        min_font_size: Option<f32>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Annotate extracted rows with sentiment and change columns
    Annotate {
        /// Input CSV with Aim,Year,Content columns
        input: PathBuf,

        /// Output CSV path (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// OpenAI API key
        #[arg(long)]
        api_key: Option<String>,

        /// Chat model name
        #[arg(long)]
        model: Option<String>,

        /// OpenAI-compatible endpoint base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Rows per completion request
        #[arg(long)]
        batch_size: Option<usize>,

        /// Per-request timeout in seconds
        #[arg(long)]
        request_timeout: Option<u64>,
    },

    /// Copy a page range out of a PDF into a new file
    Split {
        /// Path to the input PDF
        input: PathBuf,

        /// Output PDF (defaults to the last four characters of the input stem)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First page to copy, 0-based
        #[arg(long, default_value_t = 30)]
        from: usize,

        /// One past the last page to copy, 0-based
        #[arg(long, default_value_t = 32)]
        to: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            reports_dir,
            output,
            from_year,
            to_year,
            min_font_size,
            no_color,
        } => extract(reports_dir, output, from_year, to_year, min_font_size, no_color),
        Command::Annotate {
            input,
            output,
            api_key,
            model,
            base_url,
            batch_size,
            request_timeout,
        } => {
            annotate(
                input,
                output,
                api_key,
                model,
                base_url,
                batch_size,
                request_timeout,
            )
            .await
        }
        Command::Split {
            input,
            output,
            from,
            to,
        } => split(input, output, from, to),
    }
}

fn extract(
    reports_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    from_year: i32,
    to_year: i32,
    min_font_size: Option<f32>,
    no_color: bool,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > config file > defaults
    let config = aimscan_core::config_file::load_config();
    let extraction = config.extraction.unwrap_or_default();

    let reports_dir = reports_dir
        .or_else(|| extraction.reports_dir.as_deref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let output = output
        .or_else(|| extraction.output.as_deref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("aims.csv"));
    let min_font_size = min_font_size
        .or(extraction.min_font_size)
        .unwrap_or(aimscan_pdf::DEFAULT_MIN_FONT_SIZE);

    if from_year > to_year {
        anyhow::bail!("--from-year {} is after --to-year {}", from_year, to_year);
    }

    let color = ColorMode(!no_color);
    let mut writer: Box<dyn Write> = Box::new(std::io::stdout());

    let backend = aimscan_pdf_mupdf::MupdfBackend::new();
    let scanner = aimscan_pdf::SectionScanner::new(min_font_size);

    let mut appended = 0usize;
    for year in from_year..=to_year {
        let pdf_path = reports_dir.join(format!("{year}.pdf"));
        if !pdf_path.exists() {
            output::print_year_missing(&mut writer, year, &pdf_path, color)?;
            continue;
        }

        let sections = aimscan_pdf::extract_aim_sections(&pdf_path, &backend, &scanner)?;
        let found = sections.iter().filter(|(_, c)| !c.is_empty()).count();
        let records: Vec<aimscan_core::ParagraphRecord> = sections
            .into_iter()
            .map(|(aim, content)| aimscan_core::ParagraphRecord::new(aim, year, content))
            .collect();

        appended += records.len();
        aimscan_core::append_paragraphs(&output, &records)?;
        output::print_year_extracted(&mut writer, year, found, color)?;
    }

    writeln!(writer)?;
    writeln!(writer, "Appended {} rows to {}", appended, output.display())?;

    Ok(())
}

async fn annotate(
    input: PathBuf,
    output: Option<PathBuf>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    batch_size: Option<usize>,
    request_timeout: Option<u64>,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let config = aimscan_core::config_file::load_config();
    let api = config.api.unwrap_or_default();
    let analysis = config.analysis.unwrap_or_default();

    let api_key = api_key
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .or(api.openai_key)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No API key. Pass --api-key, set OPENAI_API_KEY, or add [api] openai_key to the config file"
            )
        })?;
    let model = model
        .or(analysis.model)
        .unwrap_or_else(|| aimscan_sentiment::DEFAULT_MODEL.to_string());
    let batch_size = batch_size
        .or(analysis.batch_size)
        .unwrap_or(aimscan_sentiment::DEFAULT_BATCH_SIZE);
    if batch_size == 0 {
        anyhow::bail!("--batch-size must be at least 1");
    }
    let request_timeout = request_timeout
        .or(analysis.request_timeout_secs)
        .map(Duration::from_secs)
        .unwrap_or(aimscan_sentiment::DEFAULT_REQUEST_TIMEOUT);
    let output = output.unwrap_or_else(|| input.clone());

    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }

    let records = aimscan_core::read_paragraphs(&input)?;
    if records.is_empty() {
        println!("No rows to annotate.");
        return Ok(());
    }

    let mut backend = aimscan_sentiment::OpenAiBackend::new(api_key).with_model(model);
    if let Some(url) = base_url.or(api.base_url) {
        backend = backend.with_base_url(url);
    }

    let client = reqwest::Client::new();

    let total = aimscan_sentiment::batch_count(records.len(), batch_size) as u64;
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {msg} [{bar:40.cyan/dim}] {pos}/{len} batches (eta {eta})",
        )
        .unwrap()
        .progress_chars("=> "),
    );
    bar.set_message(format!("Analyzing {} rows", records.len()));
    bar.enable_steady_tick(Duration::from_millis(120));

    // Set up Ctrl+C handler
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    let opts = aimscan_sentiment::AnnotateOptions {
        batch_size,
        request_timeout,
    };
    let progress = |event: aimscan_sentiment::BatchEvent| match event {
        aimscan_sentiment::BatchEvent::Sending { .. } => {}
        aimscan_sentiment::BatchEvent::Received { .. } => bar.inc(1),
        aimscan_sentiment::BatchEvent::Failed { index, error } => {
            bar.println(format!("Batch {} failed: {}", index + 1, error));
            bar.inc(1);
        }
    };

    let rows =
        aimscan_sentiment::annotate_records(&records, &backend, &client, &opts, progress, &cancel)
            .await;
    bar.finish_with_message("Analysis complete");

    aimscan_core::write_sentiments(&output, &rows)?;
    println!("Wrote {} annotated rows to {}", rows.len(), output.display());

    Ok(())
}

fn split(input: PathBuf, output: Option<PathBuf>, from: usize, to: usize) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }

    let output = resolve_split_output(&input, output)?;

    let copied = aimscan_pdf::copy_page_range(&input, &output, from..to)?;
    println!("Copied {} pages to {}", copied, output.display());

    Ok(())
}

/// Resolve the split output path, defaulting to the last four characters
/// of the input stem plus `.pdf`, next to the input. An output equal to
/// the input is refused: lopdf would truncate the source while saving.
fn resolve_split_output(input: &Path, output: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let output = output.unwrap_or_else(|| default_split_output(input));
    if output.as_path() == input {
        anyhow::bail!(
            "Output {} would overwrite the input; pass a different --output",
            output.display()
        );
    }
    Ok(output)
}

fn default_split_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let chars: Vec<char> = stem.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    input.with_file_name(format!("{tail}.pdf"))
}
