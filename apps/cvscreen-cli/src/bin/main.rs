use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;

use cvscreen_core::config::{Config, EmbeddingBackend, ScreenConfig};
use cvscreen_embed::load_embedder;
use cvscreen_select::{select_applicants, SelectionPolicy};

const USAGE: &str = "Usage: cvscreen [--config-dir <dir>] [--job <file>] [--candidates <dir>] \
[--destination <dir>] [--threshold <int>] [--model-dir <dir>] [--hash-embeddings] [--no-progress]";

/// Command-line overrides; anything unset falls back to configuration.
#[derive(Debug, Default, PartialEq)]
struct Args {
    config_dir: Option<PathBuf>,
    job: Option<PathBuf>,
    candidates: Option<PathBuf>,
    destination: Option<PathBuf>,
    threshold: Option<i32>,
    model_dir: Option<PathBuf>,
    hash_embeddings: bool,
    no_progress: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || -> anyhow::Result<String> {
            i += 1;
            args.get(i).cloned().ok_or_else(|| anyhow!("{flag} requires a value"))
        };
        match flag {
            "--config-dir" => parsed.config_dir = Some(PathBuf::from(value()?)),
            "--job" | "-j" => parsed.job = Some(PathBuf::from(value()?)),
            "--candidates" | "-c" => parsed.candidates = Some(PathBuf::from(value()?)),
            "--destination" | "-d" => parsed.destination = Some(PathBuf::from(value()?)),
            "--threshold" | "-t" => {
                let raw = value()?;
                parsed.threshold = Some(raw.parse().map_err(|_| anyhow!("--threshold requires an integer, got {raw:?}"))?);
            }
            "--model-dir" => parsed.model_dir = Some(PathBuf::from(value()?)),
            "--hash-embeddings" => parsed.hash_embeddings = true,
            "--no-progress" => parsed.no_progress = true,
            "--help" | "-h" => parsed.help = true,
            other => return Err(anyhow!("Unknown argument: {other}\n{USAGE}")),
        }
        i += 1;
    }
    Ok(parsed)
}

impl Args {
    fn apply(&self, config: &mut ScreenConfig) {
        if let Some(p) = &self.job { config.job_path = p.clone(); }
        if let Some(p) = &self.candidates { config.candidates_dir = p.clone(); }
        if let Some(p) = &self.destination { config.destination_dir = p.clone(); }
        if let Some(t) = self.threshold { config.threshold = t; }
        if let Some(p) = &self.model_dir { config.embedding.model_dir = Some(p.clone()); }
        if self.hash_embeddings { config.embedding.backend = EmbeddingBackend::Hash; }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args(&env::args().skip(1).collect::<Vec<_>>())?;
    if args.help { println!("{USAGE}"); return Ok(()); }

    let config = match &args.config_dir {
        Some(dir) => Config::load_in(dir),
        None => Config::load(),
    }
    .context("Error loading config")?;
    let mut screen = config.screening()?;
    args.apply(&mut screen);
    screen.validate()?;

    println!("CV Screening\n============");
    println!("Config dir:      {}", config.base_dir().display());
    println!("Job description: {}", screen.job_path.display());
    println!("Candidates:      {}", screen.candidates_dir.display());
    println!("Destination:     {}", screen.destination_dir.display());
    println!("Threshold:       {}", screen.threshold);

    // loaded once; every candidate borrows the same instance
    let embedder = load_embedder(&screen.embedding).context("Failed to load embedding model")?;
    let policy = SelectionPolicy {
        threshold: screen.threshold,
        destination: screen.destination_dir.clone(),
        show_progress: !args.no_progress,
    };
    let report = select_applicants(embedder.as_ref(), &screen.job_path, &screen.candidates_dir, policy)?;

    println!("\n✅ Screening completed!");
    println!("📊 {} selected, {} rejected, {} errored", report.selected, report.rejected, report.errored);
    println!("📁 {} CVs are stored in {}", report.destination_total, screen.destination_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> { raw.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn parses_overrides() {
        let parsed = parse_args(&args(&["--job", "j.txt", "-c", "cvs", "--threshold", "-5", "--hash-embeddings"])).unwrap();
        assert_eq!(parsed.job, Some(PathBuf::from("j.txt")));
        assert_eq!(parsed.candidates, Some(PathBuf::from("cvs")));
        assert_eq!(parsed.threshold, Some(-5));
        assert!(parsed.hash_embeddings);
        assert!(!parsed.no_progress);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&args(&["--threshold", "high"])).is_err());
        assert!(parse_args(&args(&["--job"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let mut config = ScreenConfig::default();
        let parsed = parse_args(&args(&["--destination", "out", "--threshold", "80", "--hash-embeddings"])).unwrap();
        parsed.apply(&mut config);
        assert_eq!(config.destination_dir, PathBuf::from("out"));
        assert_eq!(config.threshold, 80);
        assert_eq!(config.embedding.backend, EmbeddingBackend::Hash);
        assert_eq!(config.job_path, PathBuf::from("Job.txt"));
    }
}
