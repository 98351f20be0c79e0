mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use buddio_core::pipeline::capture_session_use_case::CaptureSessionUseCase;
use buddio_core::pipeline::create_project_use_case::{CreateProjectUseCase, EnrollmentRequest};
use buddio_core::pipeline::project_analytics::ProjectAnalytics;
use buddio_core::recognition::domain::embedding_provider::EmbeddingProvider;
use buddio_core::recognition::domain::identity_matcher::IdentityMatcher;
use buddio_core::recognition::infrastructure::model_resolver::{self, ProgressFn};
use buddio_core::recognition::infrastructure::onnx_face_provider::OnnxFaceProvider;
use buddio_core::roster::domain::project_store::ProjectStore;
use buddio_core::roster::infrastructure::json_file_store::JsonFileProjectStore;
use buddio_core::roster::infrastructure::system_clock::SystemClock;
use buddio_core::shared::constants::IMAGE_EXTENSIONS;

use crate::settings::Settings;

/// Face-recognition attendance and collaboration analytics for small groups.
#[derive(Parser)]
#[command(name = "buddio")]
struct Cli {
    /// Project store file (defaults to the platform data directory).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Minimum cosine similarity for a face to match a member (-1.0-1.0).
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, global = true)]
    confidence: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a project, enrolling each member from a single-face photo.
    Create {
        project: String,
        /// Member to enroll, as NAME=PHOTO. Repeat for each member.
        #[arg(long = "member", value_name = "NAME=PHOTO", required = true, value_parser = parse_member)]
        members: Vec<(String, PathBuf)>,
    },
    /// List stored projects.
    Projects,
    /// Set a project's free-text details.
    Details { project: String, details: String },
    /// Record a group photo as a session.
    Capture {
        project: String,
        photo: PathBuf,
        #[arg(long, default_value = "")]
        caption: String,
    },
    /// Rank participants by number of sessions attended.
    Leaderboard { project: String },
    /// Pairwise collaboration scores, highest first.
    Scores { project: String },
    /// Social graph as JSON (empty graph when unavailable).
    Graph { project: String },
    /// Show effective settings, optionally persisting them.
    Config {
        #[arg(long)]
        save: bool,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = effective_settings(&cli, Settings::load());
    settings.validate()?;

    match cli.command {
        Command::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            if save {
                let path = settings.save()?;
                log::info!("Settings saved to {}", path.display());
            }
        }
        Command::Projects => run_projects(&open_store(&settings)?)?,
        Command::Details { project, details } => {
            open_store(&settings)?.update_details(&project, &details)?;
            log::info!("Updated details for {project}");
        }
        Command::Create { project, members } => run_create(&settings, &project, members)?,
        Command::Capture {
            project,
            photo,
            caption,
        } => run_capture(&settings, &project, &photo, &caption)?,
        Command::Leaderboard { project } => {
            let analytics = ProjectAnalytics::new(Arc::new(open_store(&settings)?));
            for (rank, entry) in analytics.leaderboard(&project)?.iter().enumerate() {
                let photo = entry.photo.as_deref().unwrap_or("-");
                println!("{:>3}. {:<20} {:>4}  {photo}", rank + 1, entry.name, entry.count);
            }
        }
        Command::Scores { project } => {
            let analytics = ProjectAnalytics::new(Arc::new(open_store(&settings)?));
            for pair in analytics.collaboration_pairs(&project)? {
                println!(
                    "{} & {}: {:.3}",
                    pair.pair.first(),
                    pair.pair.second(),
                    pair.score
                );
            }
        }
        Command::Graph { project } => {
            let analytics = ProjectAnalytics::new(Arc::new(open_store(&settings)?));
            let graph = analytics.social_graph(&project);
            println!("{}", serde_json::to_string_pretty(&graph)?);
        }
    }

    Ok(())
}

fn run_projects(store: &JsonFileProjectStore) -> Result<(), Box<dyn std::error::Error>> {
    let projects = store.list_projects()?;
    if projects.is_empty() {
        log::info!("No projects in {}", store.path().display());
    }
    for summary in projects {
        println!(
            "{}  members: {}  sessions: {}  created: {}",
            summary.name,
            summary.member_count,
            summary.session_count,
            summary.created_at.to_rfc3339()
        );
        if let Some(details) = summary.details {
            println!("    {details}");
        }
    }
    Ok(())
}

fn run_create(
    settings: &Settings,
    project: &str,
    members: Vec<(String, PathBuf)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut requests = Vec::with_capacity(members.len());
    for (name, photo) in members {
        requests.push(EnrollmentRequest {
            name,
            photo: read_photo(&photo)?,
            photo_ref: photo.display().to_string(),
        });
    }

    let use_case = CreateProjectUseCase::new(
        build_provider(settings)?,
        Arc::new(open_store(settings)?),
        Arc::new(SystemClock::new()),
    );
    let created = use_case.execute(project, requests)?;
    println!(
        "Created {} with {} member(s)",
        created.name,
        created.members.len()
    );
    Ok(())
}

fn run_capture(
    settings: &Settings,
    project: &str,
    photo: &Path,
    caption: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_photo(photo)?;
    let use_case = CaptureSessionUseCase::new(
        build_provider(settings)?,
        Arc::new(open_store(settings)?),
        Arc::new(SystemClock::new()),
        IdentityMatcher::new(settings.match_threshold),
    );
    let session = use_case.execute(project, &photo.display().to_string(), &bytes, caption)?;
    if session.participants.is_empty() {
        println!("No members recognized");
    } else {
        println!("Recognized: {}", session.participants.join(", "));
    }
    Ok(())
}

fn effective_settings(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(threshold) = cli.threshold {
        settings.match_threshold = threshold;
    }
    if let Some(confidence) = cli.confidence {
        settings.detection_confidence = confidence;
    }
    if let Some(store) = &cli.store {
        settings.store_path = Some(store.clone());
    }
    settings
}

fn open_store(settings: &Settings) -> Result<JsonFileProjectStore, Box<dyn std::error::Error>> {
    let path = settings
        .resolved_store_path()
        .ok_or("Could not determine data directory; pass --store")?;
    log::debug!("Using project store {}", path.display());
    Ok(JsonFileProjectStore::new(path))
}

fn build_provider(
    settings: &Settings,
) -> Result<Arc<dyn EmbeddingProvider>, Box<dyn std::error::Error>> {
    let progress: ProgressFn = Box::new(download_progress);
    let models = model_resolver::resolve_face_models(None, Some(&progress))?;
    eprintln!();
    Ok(Arc::new(OnnxFaceProvider::new(
        &models,
        settings.detection_confidence,
    )?))
}

fn read_photo(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Photo not found: {}", path.display()).into());
    }
    if !is_image(path) {
        return Err(format!(
            "Unsupported photo format: {} (expected one of {})",
            path.display(),
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    Ok(fs::read(path)?)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn parse_member(value: &str) -> Result<(String, PathBuf), String> {
    let (name, photo) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PHOTO, got '{value}'"))?;
    if name.trim().is_empty() || photo.is_empty() {
        return Err(format!("expected NAME=PHOTO, got '{value}'"));
    }
    Ok((name.to_string(), PathBuf::from(photo)))
}

fn download_progress(model: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {model}... {pct}%");
    } else {
        eprint!("\rDownloading {model}... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member() {
        assert_eq!(
            parse_member("alice=photos/a.jpg").unwrap(),
            ("alice".to_string(), PathBuf::from("photos/a.jpg"))
        );
        assert!(parse_member("alice").is_err());
        assert!(parse_member("=a.jpg").is_err());
        assert!(parse_member("alice=").is_err());
    }

    #[test]
    fn test_is_image_ignores_case() {
        assert!(is_image(Path::new("group.JPG")));
        assert!(is_image(Path::new("group.png")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("no_extension")));
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from(["buddio", "--threshold", "0.8", "--store", "s.json", "projects"]);
        let settings = effective_settings(&cli, Settings::default());
        assert_eq!(settings.match_threshold, 0.8);
        assert_eq!(settings.store_path, Some(PathBuf::from("s.json")));
        assert_eq!(settings.detection_confidence, 0.5);
    }

    #[test]
    fn test_create_requires_members() {
        assert!(Cli::try_parse_from(["buddio", "create", "team"]).is_err());
        let cli = Cli::try_parse_from([
            "buddio", "create", "team", "--member", "a=a.jpg", "--member", "b=b.jpg",
        ])
        .unwrap();
        match cli.command {
            Command::Create { members, .. } => assert_eq!(members.len(), 2),
            _ => panic!("expected create"),
        }
    }
}
