use std::path::{Path, PathBuf};

use anyhow::Result;
use bytes::Bytes;
use clap::Parser;

use filedrop_core::{Config, FileCategory, FileData, UploadOptions};
use filedrop_upload::Uploader;

#[derive(Parser, Debug)]
#[command(name = "upload")]
#[command(about = "Upload files through the configured storage provider")]
struct Args {
    /// Paths of the files to upload
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Accepted categories, comma separated: images, videos, documents, audio, all
    #[arg(long, default_value = "images")]
    types: String,

    /// Maximum file size in megabytes
    #[arg(long, default_value = "5")]
    max_size: u64,

    /// Retry attempts after the first failure (catbox provider only)
    #[arg(long, default_value = "3")]
    max_retries: u32,

    /// Upload one file at a time instead of in concurrent windows
    #[arg(long)]
    sequential: bool,

    /// Width of the concurrency window
    #[arg(long, default_value = "3")]
    max_concurrency: usize,

    /// Output format: json or table (default: table)
    #[arg(long, default_value = "table")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let accepted_types = parse_categories(&args.types)?;
    let options = UploadOptions {
        accepted_types,
        max_size_mb: args.max_size,
        max_retries: args.max_retries,
        concurrent: !args.sequential,
        max_concurrency: args.max_concurrency,
    };

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(read_file(path).await?);
    }

    let uploader = Uploader::new(config);
    let summary = uploader.upload_many(&files, &options).await;

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            print_summary_table(&args.files, &summary);
        }
    }

    if summary.failure_count > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn parse_categories(raw: &str) -> Result<Vec<FileCategory>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            FileCategory::parse(s).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid category '{}'. Must be: images, videos, documents, audio, or all",
                    s
                )
            })
        })
        .collect()
}

async fn read_file(path: &Path) -> Result<FileData> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file path: {}", path.display()))?
        .to_string();
    let content_type = guess_content_type(&name);
    Ok(FileData::new(name, content_type, Bytes::from(bytes)))
}

fn guess_content_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

fn print_summary_table(paths: &[PathBuf], summary: &filedrop_core::MultipleUploadResult) {
    println!("\n=== Upload Results ===\n");
    println!(
        "{:<40} {:<10} {:<50}",
        "File", "Status", "Stored Name / Error"
    );
    println!("{}", "-".repeat(100));

    for (path, result) in paths.iter().zip(&summary.results) {
        let (status, detail) = if let Some(ref name) = result.name {
            ("ok", name.as_str())
        } else {
            ("failed", result.error.as_deref().unwrap_or("unknown error"))
        };
        println!("{:<40} {:<10} {:<50}", path.display(), status, detail);
    }

    println!(
        "\n{} uploaded, {} failed\n",
        summary.success_count, summary.failure_count
    );
}
