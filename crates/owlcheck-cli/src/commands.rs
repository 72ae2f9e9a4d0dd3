//! CLI command definitions and handlers

use crate::config::Config;
use anyhow::{anyhow, Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use owlcheck_core::{load_json, DataGraph, Diagnostic, DiagnosticKind, OntologyDocument};
use owlcheck_owl::{OntologyResolver, ResolvedOntology};
use owlcheck_store::{Metadata, StoredKind};
use owlcheck_validate::{ValidationReport, Validator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Main CLI structure
#[derive(Parser, Debug)]
#[command(name = "owlcheck")]
#[command(about = "Resolve OWL ontologies and validate instance data against them")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate data files against an ontology
    Validate {
        /// Serialized ontology, ontology JSON document, or directory of documents
        ontology: PathBuf,

        /// Serialized case data or data JSON documents
        data: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Diagnostic kinds that make the run fail
        #[arg(long, value_delimiter = ',')]
        fail_on: Vec<DiagnosticKind>,
    },

    /// Resolve or ingest a source and store the result
    Serialize {
        /// Ontology document (or directory of them) or data document
        source: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// What the source holds
        #[arg(short, long, default_value = "ontology")]
        kind: SourceKind,

        /// Free-text comment stored with the file
        #[arg(long)]
        comment: Option<String>,
    },

    /// Show the metadata of a stored file
    Describe {
        file: PathBuf,
    },

    /// Show resolved class constraints
    Show {
        /// Serialized ontology, ontology JSON document, or directory of documents
        ontology: PathBuf,

        /// Only this class (IRI or qname)
        #[arg(short, long)]
        class: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

/// Source kinds accepted by `serialize`
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum SourceKind {
    Ontology,
    Casedata,
}

/// Command execution result
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    /// Text for stdout
    pub output: String,
    pub data: Option<serde_json::Value>,
}

/// Execute CLI commands
pub struct CommandExecutor {
    config: Config,
}

impl CommandExecutor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Validate {
                ontology,
                data,
                format,
                fail_on,
            } => self.execute_validate(ontology, data, format, fail_on).await,
            Commands::Serialize {
                source,
                output,
                kind,
                comment,
            } => self.execute_serialize(source, output, kind, comment),
            Commands::Describe { file } => self.execute_describe(file),
            Commands::Show { ontology, class, format } => self.execute_show(ontology, class, format),
        }
    }

    async fn execute_validate(
        &self,
        ontology_path: PathBuf,
        data_paths: Vec<PathBuf>,
        format: OutputFormat,
        fail_on: Vec<DiagnosticKind>,
    ) -> Result<CommandResult> {
        let ontology = Arc::new(self.load_ontology(&ontology_path)?);
        let ctx = ontology.context();

        // One blocking task per data file; results are collected in input order
        let handles: Vec<_> = data_paths
            .iter()
            .cloned()
            .map(|path| {
                let ontology = Arc::clone(&ontology);
                let validation = self.config.validation.clone();
                tokio::task::spawn_blocking(move || -> Result<ValidationReport> {
                    let graph = load_data(&path)?;
                    Ok(Validator::new(&ontology, validation).validate(&graph))
                })
            })
            .collect();
        let mut reports = Vec::with_capacity(handles.len());
        for (path, handle) in data_paths.iter().zip(handles) {
            let report = handle
                .await
                .context("validation task failed")?
                .with_context(|| format!("cannot validate {}", path.display()))?;
            reports.push((path.clone(), report));
        }

        let failed = has_any(&ontology.diagnostics, &fail_on)
            || reports.iter().any(|(_, report)| report.has_any(&fail_on));

        let data = serde_json::json!({
            "ontology": {
                "path": ontology_path,
                "diagnostics": ontology.diagnostics,
            },
            "data": reports
                .iter()
                .map(|(path, report)| serde_json::json!({ "path": path, "report": report }))
                .collect::<Vec<_>>(),
        });

        let output = match format {
            OutputFormat::Text => {
                let mut output = String::new();
                for diagnostic in &ontology.diagnostics {
                    output.push_str(&diagnostic.format(&ctx));
                    output.push('\n');
                }
                for (path, report) in &reports {
                    output.push_str(&format!("== {} ==\n", path.display()));
                    output.push_str(&report.to_simple_string(&ctx));
                }
                output
            }
            OutputFormat::Json => serde_json::to_string(&data)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&data)?,
        };

        Ok(CommandResult {
            success: !failed,
            output,
            data: Some(data),
        })
    }

    fn execute_serialize(
        &self,
        source: PathBuf,
        output: PathBuf,
        kind: SourceKind,
        comment: Option<String>,
    ) -> Result<CommandResult> {
        let stored_kind = match kind {
            SourceKind::Ontology => StoredKind::Ontology,
            SourceKind::Casedata => StoredKind::CaseData,
        };
        let mut metadata = Metadata::for_source(stored_kind, &source)?;
        metadata.comment = comment;

        match kind {
            SourceKind::Ontology => {
                let ontology = self.resolve_documents(&source)?;
                owlcheck_store::save(&ontology, &metadata, &output)?;
            }
            SourceKind::Casedata => {
                let graph: DataGraph = load_json(&source)?;
                owlcheck_store::save(&graph, &metadata, &output)?;
            }
        }

        Ok(CommandResult {
            success: true,
            output: format!("Stored {} from {} in {}\n", stored_kind, source.display(), output.display()),
            data: Some(serde_json::json!({ "kind": stored_kind, "output": output })),
        })
    }

    fn execute_describe(&self, file: PathBuf) -> Result<CommandResult> {
        let mut output = owlcheck_store::describe(&file)?;
        output.push('\n');
        Ok(CommandResult {
            success: true,
            output,
            data: None,
        })
    }

    fn execute_show(&self, ontology_path: PathBuf, class: Option<String>, format: OutputFormat) -> Result<CommandResult> {
        let ontology = self.load_ontology(&ontology_path)?;
        let ctx = ontology.context();

        let selected: Vec<_> = match &class {
            Some(name) => {
                let iri = ctx.expand(name).map_or_else(|| name.clone(), |iri| iri.0);
                let definition = ontology
                    .get(&iri)
                    .ok_or_else(|| anyhow!("class {} is not in the ontology", name))?;
                vec![(iri, definition)]
            }
            None => ontology
                .class_definitions
                .iter()
                .map(|(iri, definition)| (iri.0.clone(), definition))
                .collect(),
        };

        let data = serde_json::json!(selected
            .iter()
            .map(|(iri, definition)| serde_json::json!({ "class": iri, "definition": definition }))
            .collect::<Vec<_>>());
        let output = match format {
            OutputFormat::Text => {
                let mut output = String::new();
                for (iri, definition) in &selected {
                    output.push_str(&format!("{}\n", ctx.format(iri)));
                    for line in definition.describe(&ctx).lines() {
                        output.push_str(&format!("    {}\n", line));
                    }
                }
                output
            }
            OutputFormat::Json => serde_json::to_string(&data)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&data)?,
        };

        Ok(CommandResult {
            success: true,
            output,
            data: Some(data),
        })
    }

    /// Stored ontology, or resolve JSON documents
    pub fn load_ontology(&self, path: &Path) -> Result<ResolvedOntology> {
        if path.is_file() && owlcheck_store::read_marker(path).ok() == Some(StoredKind::Ontology) {
            let (ontology, metadata) = owlcheck_store::load::<ResolvedOntology, _>(path)?;
            debug!(version = %metadata.version, "using stored ontology");
            return Ok(ontology);
        }
        self.resolve_documents(path)
    }

    fn resolve_documents(&self, path: &Path) -> Result<ResolvedOntology> {
        let document = load_ontology_documents(path)?;
        let resolved = OntologyResolver::new(self.config.resolver.clone()).resolve(&document);
        info!(
            classes = resolved.class_definitions.len(),
            diagnostics = resolved.diagnostics.len(),
            "ontology resolved from {}",
            path.display()
        );
        Ok(resolved)
    }
}

/// One ontology document, or every `.json` document below a directory merged
/// in file-name order
pub fn load_ontology_documents(path: &Path) -> Result<OntologyDocument> {
    if !path.is_dir() {
        return load_json(path).with_context(|| format!("cannot read ontology {}", path.display()));
    }

    let mut merged = OntologyDocument::default();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("cannot read ontology directory {}", path.display()))?;
        let is_json = entry.path().extension().map_or(false, |extension| extension == "json");
        if !entry.file_type().is_file() || !is_json {
            continue;
        }
        let document: OntologyDocument = load_json(entry.path())?;
        merged.bindings.extend(document.bindings);
        merged.classes.extend(document.classes);
        merged.properties.extend(document.properties);
    }
    Ok(merged)
}

/// Stored case data, or a data JSON document
pub fn load_data(path: &Path) -> Result<DataGraph> {
    if owlcheck_store::read_marker(path).ok() == Some(StoredKind::CaseData) {
        let (graph, _) = owlcheck_store::load::<DataGraph, _>(path)?;
        return Ok(graph);
    }
    load_json(path).with_context(|| format!("cannot read data {}", path.display()))
}

fn has_any(diagnostics: &[Diagnostic], kinds: &[DiagnosticKind]) -> bool {
    diagnostics.iter().any(|d| kinds.contains(&d.kind))
}
