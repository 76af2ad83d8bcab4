use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, BufRead, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use botbuilder_wizard::{
    CatalogSet, DocumentFormat, HostMessage, JsonLinesBridge, OutputDestination, OutputOptions,
    PageLayout, RecordingBridge, SetupError, TypeCatalog, WizardContext, WizardEvent,
    WizardOptions, config_schema, emit, load_config, page_from_value, parse_document_str,
};

#[derive(Debug, Parser)]
#[command(
    name = "botbuilder-wizard",
    version,
    about = "Drive and render botbuilder code-generation wizard pages"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a headless wizard session: JSON lines in on stdin, host messages out on stdout
    Session {
        /// Page spec: file path or inline payload
        #[arg(short = 'p', long = "page", value_name = "SPEC")]
        page: String,

        /// Milliseconds between a pointer release and its autosave
        #[arg(long = "autosave-delay", value_name = "MS")]
        autosave_delay: Option<u64>,

        /// Never post `update` snapshots on key or pointer releases
        #[arg(long = "no-autosave")]
        no_autosave: bool,

        /// Offer Java primitives in selectors that do not say otherwise
        #[arg(long = "primitives")]
        primitives: bool,
    },
    /// Print the page as HTML
    Render {
        /// Page spec: file path, inline payload, or "-" for stdin
        #[arg(short = 'p', long = "page", value_name = "SPEC")]
        page: String,

        /// State entries (`setState` payload) applied before rendering
        #[arg(short = 's', long = "state", value_name = "SPEC")]
        state: Option<String>,

        /// Offer Java primitives in selectors that do not say otherwise
        #[arg(long = "primitives")]
        primitives: bool,
    },
    /// Print the JSON Schema of the botbuilder configuration file
    Schema {
        /// Output destinations ("-" writes to stdout)
        #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
        outputs: Vec<String>,

        /// Emit compact JSON/TOML rather than pretty formatting
        #[arg(long = "no-pretty")]
        no_pretty: bool,
    },
    /// Validate a configuration and print the type catalogs it yields
    Catalog {
        /// Config spec: file path, inline payload, or "-" for stdin
        #[arg(short = 'c', long = "config", value_name = "SPEC")]
        config: String,

        /// Subsystem catalog found by the host (grouped `{descriptor, name}` lists)
        #[arg(long = "subsystems", value_name = "SPEC")]
        subsystems: Option<String>,

        /// Emit compact JSON rather than pretty formatting
        #[arg(long = "no-pretty")]
        no_pretty: bool,
    },
}

/// One line of a session transcript.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum SessionInput {
    Event(WizardEvent),
    Message(HostMessage),
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Session {
            page,
            autosave_delay,
            no_autosave,
            primitives,
        } => {
            if page == "-" {
                return Err(eyre!(
                    "the session reads events from stdin; pass the page as a file or inline payload"
                ));
            }
            let mut options = WizardOptions::default()
                .with_autosave(!no_autosave)
                .with_primitives(primitives);
            if let Some(ms) = autosave_delay {
                options = options.with_autosave_delay(std::time::Duration::from_millis(ms));
            }
            let page = load_page(&page)?;
            run_session(&page, options)
        }
        Command::Render {
            page,
            state,
            primitives,
        } => {
            if page == "-" && state.as_deref() == Some("-") {
                return Err(eyre!(
                    "cannot read page and state from stdin simultaneously; provide inline content or files"
                ));
            }
            let page = load_page(&page)?;
            let options = WizardOptions::default()
                .with_autosave(false)
                .with_primitives(primitives);
            let mut wizard = WizardContext::from_page(&page, RecordingBridge::new(), options)?;
            if let Some(spec) = state {
                let entries = match load_value(&spec, "state")? {
                    Value::Array(entries) => entries,
                    other => vec![other],
                };
                let applied = wizard.apply_state(&entries);
                info!(applied, total = entries.len(), "applied state before rendering");
            }
            print!("{}", wizard.render());
            Ok(())
        }
        Command::Schema { outputs, no_pretty } => {
            let schema = config_schema().map_err(Report::msg)?;
            let options = build_output_options(&outputs, !no_pretty)?;
            emit(&schema, &options).map_err(Report::msg)
        }
        Command::Catalog {
            config,
            subsystems,
            no_pretty,
        } => {
            let value = load_value(&config, "config")?;
            let config = load_config(&value).map_err(Report::msg)?;
            let subsystems = match subsystems {
                Some(spec) => serde_json::from_value::<TypeCatalog>(load_value(&spec, "subsystems")?)
                    .wrap_err("subsystems must map group names to {descriptor, name} lists")?,
                None => TypeCatalog::new(),
            };
            let catalogs = CatalogSet::from_config(&config, subsystems);
            info!(hardware_types = config.hardware.len(), "configuration is valid");
            let value = serde_json::to_value(&catalogs).wrap_err("failed to serialize catalogs")?;
            emit(&value, &OutputOptions::default().with_pretty(!no_pretty)).map_err(Report::msg)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,botbuilder_wizard={level},botbuilder_wizard_cli={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_session(page: &PageLayout, options: WizardOptions) -> Result<()> {
    let bridge = JsonLinesBridge::new(io::stdout().lock());
    let mut wizard = WizardContext::from_page(page, bridge, options)?;

    let stdin = io::stdin();
    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line.wrap_err("failed to read session input")?;
        let now = Instant::now();
        wizard.poll_autosave(now).map_err(Report::msg)?;
        if line.trim().is_empty() {
            continue;
        }
        let input = match serde_json::from_str::<SessionInput>(&line) {
            Ok(input) => input,
            Err(err) => {
                warn!(line = number + 1, error = %err, "skipping unreadable session input");
                continue;
            }
        };
        match input {
            SessionInput::Event(event) => match wizard.dispatch(event, now) {
                Ok(changed) => debug!(line = number + 1, changed, "event handled"),
                Err(err) if err.downcast_ref::<SetupError>().is_some() => {
                    warn!(line = number + 1, error = %format_args!("{err:#}"), "event rejected");
                }
                Err(err) => return Err(Report::msg(err)),
            },
            SessionInput::Message(message) => {
                let applied = wizard.handle_message(&message);
                debug!(line = number + 1, applied, "host message handled");
            }
        }
        wizard.poll_autosave(Instant::now()).map_err(Report::msg)?;
    }

    let flushed = wizard.flush_autosave().map_err(Report::msg)?;
    let valid = wizard.validate();
    info!(flushed, valid, "session finished");
    Ok(())
}

fn load_page(spec: &str) -> Result<PageLayout> {
    let value = load_value(spec, "page")?;
    page_from_value(value).map_err(Report::msg)
}

fn load_value(spec: &str, label: &str) -> Result<Value> {
    let format = match format_from_extension(Path::new(spec)) {
        ExtensionFormat::Known(format) => format,
        ExtensionFormat::UnsupportedFeature {
            format_name,
            feature_flag,
        } => {
            return Err(eyre!(
                "{label} '{spec}' requires {format_name} support, but this build lacks the '{feature_flag}' feature"
            ));
        }
        ExtensionFormat::Unknown => DocumentFormat::default(),
    };

    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, format, label);
    }
    if spec.trim_start().starts_with(['{', '[']) {
        return parse_contents(spec, format, &format!("inline {label}"));
    }

    let path = PathBuf::from(spec);
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => parse_contents(&contents, format, label),
        Err(err) => {
            if is_not_found(&err) {
                let inline_label = format!("inline {label}");
                return parse_contents(spec, format, &inline_label);
            }
            Err(err.wrap_err(format!("failed to load {label} from {}", path.display())))
        }
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
    })
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available_formats() {
                if candidate == format {
                    continue;
                }
                if let Ok(value) = parse_document_str(contents, candidate) {
                    return Ok(value);
                }
            }
            Err(Report::msg(format!(
                "failed to parse {label}: tried {} (first error: {primary})",
                format_list()
            )))
        }
    }
}

fn format_list() -> String {
    let items: Vec<String> = DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect();
    items.join(", ")
}

fn build_output_options(outputs: &[String], pretty: bool) -> Result<OutputOptions> {
    let mut problems = Vec::new();
    let mut destinations = Vec::new();
    let mut format: Option<DocumentFormat> = None;

    for raw in outputs {
        if raw.trim().is_empty() {
            problems.push("output destination cannot be empty".to_string());
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
            continue;
        }
        let path = PathBuf::from(raw);
        match format_from_extension(&path) {
            ExtensionFormat::Known(detected) => match format {
                Some(existing) if existing != detected => problems.push(format!(
                    "output file {} uses {detected} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                _ => format = Some(detected),
            },
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => problems.push(format!(
                "output file {} requires {format_name} support, but this build was compiled without the '{feature_flag}' feature",
                path.display()
            )),
            ExtensionFormat::Unknown => problems.push(format!(
                "cannot infer format from output file {}; use .json/.yaml/.toml",
                path.display()
            )),
        }
        destinations.push(OutputDestination::File(path));
    }

    if !problems.is_empty() {
        let mut body = String::from("encountered output issues:\n");
        for (idx, msg) in problems.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        return Err(eyre!(body));
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    Ok(OutputOptions::new(format.unwrap_or_default())
        .with_pretty(pretty)
        .with_destinations(destinations))
}

fn format_from_extension(path: &Path) -> ExtensionFormat {
    let Some(ext) = path.extension() else {
        return ExtensionFormat::Unknown;
    };
    let normalized = ext.to_string_lossy().to_ascii_lowercase();
    match normalized.as_str() {
        "json" => ExtensionFormat::Known(DocumentFormat::Json),
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => ExtensionFormat::Known(DocumentFormat::Yaml),
        #[cfg(not(feature = "yaml"))]
        "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
            format_name: "yaml",
            feature_flag: "yaml",
        },
        #[cfg(feature = "toml")]
        "toml" => ExtensionFormat::Known(DocumentFormat::Toml),
        #[cfg(not(feature = "toml"))]
        "toml" => ExtensionFormat::UnsupportedFeature {
            format_name: "toml",
            feature_flag: "toml",
        },
        _ => ExtensionFormat::Unknown,
    }
}

#[derive(Debug)]
enum ExtensionFormat {
    Known(DocumentFormat),
    #[allow(dead_code)]
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_lines_are_externally_tagged() {
        let input: SessionInput =
            serde_json::from_value(json!({"event": {"type": "addParameter", "selector": "hw"}}))
                .unwrap();
        assert!(matches!(input, SessionInput::Event(WizardEvent::AddParameter { .. })));

        let input: SessionInput =
            serde_json::from_value(json!({"message": {"id": "setState", "payload": []}})).unwrap();
        assert!(matches!(input, SessionInput::Message(_)));
    }

    #[test]
    fn output_defaults_to_stdout_json() {
        let options = build_output_options(&[], true).unwrap();
        assert_eq!(options.format, DocumentFormat::Json);
        assert!(matches!(options.destinations[..], [OutputDestination::Stdout]));
        assert!(build_output_options(&["schema.txt".to_string()], true).is_err());
    }
}
