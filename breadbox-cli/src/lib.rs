//! Argument parsing and command execution for the `breadbox` binary.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use breadbox_engine::{BreadService, EngineConfig, EngineError, FormRequest, UploadedFile};
use breadbox_model::{MenuOrderNode, ResourceConfig, ResourceRegistry};
use breadbox_storage::{DiskManager, LocalDisk, SqliteRecordStore};
use breadbox_types::RecordId;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "breadbox")]
#[command(about = "Write records through the Breadbox content engine")]
pub struct Cli {
    /// SQLite database file
    #[arg(long, default_value = "breadbox.db")]
    pub db: PathBuf,

    /// JSON file listing resource types and their fields
    #[arg(short, long, default_value = "resources.json")]
    pub resources: PathBuf,

    /// Engine configuration (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory backing the default upload disk
    #[arg(long, default_value = "storage")]
    pub disk_root: PathBuf,

    /// Locale whose translations become field values (overrides the config)
    #[arg(long)]
    pub locale: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a record, or update one with --id
    Upsert {
        slug: String,
        /// Request file: {"values": {...}, "files": {"field": ["path", ...]}}
        request: PathBuf,
        #[arg(long)]
        id: Option<i64>,
    },
    /// Delete a record with its files, translations and pivot rows
    Delete { slug: String, id: i64 },
    /// Apply a menu order tree: [{"id": 1, "children": [...]}, ...]
    ReorderMenu {
        tree: PathBuf,
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Check a request against a resource's rules without writing
    Validate {
        slug: String,
        request: PathBuf,
        #[arg(long)]
        id: Option<i64>,
    },
}

/// What a command printed and whether it succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: String,
    pub success: bool,
}

impl Outcome {
    fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
        }
    }

    fn failed(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: false,
        }
    }
}

/// A request file before its uploads are read.
#[derive(Debug, Default, Deserialize)]
struct RequestFile {
    #[serde(default)]
    values: Map<String, Value>,
    /// Upload paths, relative to the request file.
    #[serde(default)]
    files: BTreeMap<String, Vec<PathBuf>>,
}

pub fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(locale) = &cli.locale {
        config.default_locale = locale.clone();
    }
    Ok(config)
}

pub fn load_registry(path: &Path) -> Result<ResourceRegistry> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read resources {}", path.display()))?;
    let configs: Vec<ResourceConfig> =
        serde_json::from_str(&raw).context("Failed to parse resources file")?;
    let registry = ResourceRegistry::from_configs(&configs).context("Invalid resource definitions")?;
    debug!("Loaded {} resource type(s)", registry.len());
    Ok(registry)
}

/// Reads a request file and the uploads it points at.
pub fn load_request(path: &Path) -> Result<FormRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {}", path.display()))?;
    let parsed: RequestFile = serde_json::from_str(&raw).context("Failed to parse request file")?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut request = FormRequest::from_values(parsed.values);
    for (field, uploads) in parsed.files {
        for upload in uploads {
            let full = base.join(&upload);
            let bytes = fs::read(&full)
                .with_context(|| format!("Failed to read upload {}", full.display()))?;
            let name = upload
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            request.attach(field.clone(), UploadedFile::new(name, bytes));
        }
    }
    Ok(request)
}

pub fn build_service(cli: &Cli) -> Result<BreadService> {
    let config = load_config(cli)?;
    let registry = load_registry(&cli.resources)?;
    let store = SqliteRecordStore::open(&cli.db)
        .with_context(|| format!("Failed to open database {}", cli.db.display()))?;
    let disks = DiskManager::new(config.default_disk.clone())
        .with_disk(Arc::new(LocalDisk::new(config.default_disk.clone(), cli.disk_root.clone())));
    Ok(BreadService::new(config, registry, Arc::new(store), disks))
}

/// Runs the parsed command.
///
/// Validation failures are reported through [`Outcome`] as a JSON object of
/// field messages; every other failure is an error.
pub fn execute(cli: &Cli) -> Result<Outcome> {
    let service = build_service(cli)?;

    match &cli.command {
        Command::Upsert { slug, request, id } => {
            let request = load_request(request)?;
            let result = match id {
                Some(id) => service.update(slug, RecordId::new(*id), &request),
                None => service.store(slug, &request),
            };
            match result {
                Ok(record) => {
                    info!("Saved {} {:?}", slug, record.id);
                    Ok(Outcome::ok(serde_json::to_string_pretty(&record.to_json())?))
                }
                Err(EngineError::Validation(errors)) => {
                    Ok(Outcome::failed(serde_json::to_string_pretty(&errors)?))
                }
                Err(e) => Err(e).with_context(|| format!("Failed to save {slug}")),
            }
        }
        Command::Delete { slug, id } => {
            let record = service
                .destroy(slug, RecordId::new(*id))
                .with_context(|| format!("Failed to delete {slug} {id}"))?;
            Ok(Outcome::ok(serde_json::to_string_pretty(&record.to_json())?))
        }
        Command::ReorderMenu { tree, parent } => {
            let raw = fs::read_to_string(tree)
                .with_context(|| format!("Failed to read menu tree {}", tree.display()))?;
            let nodes: Vec<MenuOrderNode> =
                serde_json::from_str(&raw).context("Failed to parse menu tree")?;
            service
                .menus()
                .reorder(&nodes, parent.map(RecordId::new))
                .context("Failed to reorder menu")?;
            Ok(Outcome::ok(format!("Reordered {} top-level item(s)", nodes.len())))
        }
        Command::Validate { slug, request, id } => {
            let request = load_request(request)?;
            match service.validate(slug, &request, id.map(RecordId::new)) {
                Ok(()) => Ok(Outcome::ok("valid")),
                Err(EngineError::Validation(errors)) => {
                    Ok(Outcome::failed(serde_json::to_string_pretty(&errors)?))
                }
                Err(e) => Err(e).with_context(|| format!("Failed to validate {slug}")),
            }
        }
    }
}
