//! Minimal CLI: load JSON documents → report empty fields
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use blankscan::path_de::rules_from_str;
use blankscan::{check_value, MatcherConfig, Report, Value};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// find null, blank and empty fields anywhere inside JSON/NDJSON documents
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// walk every document and list the paths of empty values
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct RuleSettings {
    /// field path to skip, together with everything below it (repeatable)
    #[arg(long = "ignore")]
    ignored_paths: Vec<String>,

    /// object type whose fields are not walked (repeatable)
    #[arg(long = "stop-type")]
    stop_types: Vec<String>,

    /// walk types named Url/Uri/Duration/SystemTime instead of stopping at them
    #[arg(long, default_value_t = false)]
    no_default_stop_types: bool,

    /// JSON rules file: {"skip_default_stop_types": bool, "stop_recursion_types": [..], "ignored_paths": [..], "max_depth": N}
    #[arg(long)]
    rules: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    rule_settings: RuleSettings,

    /// report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

/// One loaded document and where it came from (`file`, `file:3`, `file#1`).
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub json: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub source: String,
    #[serde(flatten)]
    pub report: Report,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            for (label, json_value) in parse_source(&source_path_str, &source, self.ndjson)? {
                let Some(json_value) = self.select_pointer(&label, json_value) else {
                    continue;
                };
                self.apply_jq(label, json_value, &mut documents)?;
            }
        }
        debug!(count = documents.len(), "documents loaded");
        Ok(documents)
    }

    fn select_pointer(&self, label: &str, json_value: serde_json::Value) -> Option<serde_json::Value> {
        let Some(pointer) = self.json_pointer.as_ref() else {
            return Some(json_value);
        };
        let selected = json_value.pointer(pointer).cloned();
        if selected.is_none() {
            info!(source = label, pointer = pointer.as_str(), "json pointer selected nothing");
        }
        selected
    }

    fn apply_jq(
        &self,
        label: String,
        json_value: serde_json::Value,
        out: &mut Vec<Document>,
    ) -> Result<()> {
        match self.jq_expr.as_ref() {
            None => out.push(Document { source: label, json: json_value }),
            Some(jq_expr) => {
                let results = crate::jq_exec::select_documents(jq_expr, &json_value)
                    .with_context(|| format!("failed to apply jq expression to {label}"))?;
                for (ix, json) in results.into_iter().enumerate() {
                    out.push(Document { source: format!("{label}#{ix}"), json });
                }
            }
        }
        Ok(())
    }
}

impl RuleSettings {
    fn config(&self) -> Result<MatcherConfig> {
        let mut config = MatcherConfig::new();
        if self.no_default_stop_types {
            config = config.without_default_stop_types();
        }
        if let Some(rules_path) = self.rules.as_ref() {
            config = load_rules(rules_path)?.apply(config);
        }
        Ok(config
            .with_stop_types(&self.stop_types)
            .with_ignored_paths(&self.ignored_paths))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Check(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS);
                }

                let config = target.rule_settings.config()?;
                let documents = target.input_settings.load_documents()?;
                let reports = check_documents(&documents, &config);

                match target.format {
                    Format::Text => print!("{}", render_text(&reports)),
                    Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
                }

                if reports.iter().all(|r| r.report.is_clean()) {
                    Ok(ExitCode::SUCCESS)
                } else {
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

/// Each document gets its own accumulator, so they can be walked in parallel.
pub fn check_documents(documents: &[Document], config: &MatcherConfig) -> Vec<DocumentReport> {
    documents
        .par_iter()
        .map(|doc| DocumentReport {
            source: doc.source.clone(),
            report: check_value(&Value::from_json_document(&doc.json), config),
        })
        .collect()
}

pub fn render_text(reports: &[DocumentReport]) -> String {
    let mut out = String::new();
    let mut failing = 0usize;
    for entry in reports {
        if entry.report.is_clean() {
            continue;
        }
        failing += 1;
        out.push_str(&format!(
            "{} {}\n",
            entry.source.bold(),
            entry.report.describe().red()
        ));
        for violation in &entry.report.violations {
            out.push_str(&format!("    {} ({:?})\n", violation.path, violation.kind));
        }
    }
    let summary = format!("{} of {} documents have empty fields", failing, reports.len());
    if failing == 0 {
        out.push_str(&format!("{}\n", summary.green()));
    } else {
        out.push_str(&format!("{}\n", summary.yellow()));
    }
    out
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_rules(path: &Path) -> Result<blankscan::Rules> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file ({})", path.display()))?;
    rules_from_str(&source).with_context(|| format!("in rules file {}", path.display()))
}

fn parse_source(
    source_path: &str,
    source: &str,
    ndjson: bool,
) -> Result<Vec<(String, serde_json::Value)>> {
    if !ndjson {
        let json_value = serde_json::from_str::<serde_json::Value>(source)
            .with_context(|| format!("failed to parse JSON source file ({source_path})"))?;
        return Ok(vec![(source_path.to_string(), json_value)]);
    }
    let mut out = Vec::new();
    for (ix, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = ix + 1;
        let json_value = serde_json::from_str::<serde_json::Value>(line)
            .with_context(|| format!("failed to parse NDJSON line ({source_path}:{line_no})"))?;
        out.push((format!("{source_path}:{line_no}"), json_value));
    }
    Ok(out)
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
