use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use reqwest::Url;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::args::CliArgs;
use crate::cli::validation::{self, Step};
use crate::config::{self, ConfigFile, NavEntry};
use crate::dom::{Document, NavTrigger, PageSection, TriggerRole};
use crate::location::MemoryHistory;
use crate::navigation::{NavigationOptions, DEFAULT_PAGE};
use crate::output::{self, OutputFormat, Snapshot};
use crate::records::{loader, AssetResolver, RecordSource, RecordsOptions, PERSON_PARAM};
use crate::session::{Event, Session, SessionOptions};

const DEFAULT_SITE: &str = "http://localhost/";
const DEFAULT_PAGES: [&str; 4] = ["home", "records", "former", "people"];

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn render_custom_help() -> String {
    let mut cmd = CliArgs::command();
    cmd.render_long_help().to_string()
}

#[derive(Clone, Debug)]
struct RunConfig {
    site: String,
    records: String,
    location: Url,
    default_page: String,
    person_param: String,
    pages: Vec<String>,
    nav: Option<Vec<NavEntry>>,
    steps: Vec<Step>,
    output: Option<String>,
    output_format: OutputFormat,
    timeout: u64,
    proxy: Option<String>,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let site = args
        .site
        .or(cfg.site)
        .unwrap_or_else(|| DEFAULT_SITE.to_string())
        .trim()
        .to_string();
    let assets = AssetResolver::parse(&site).map_err(|e| e.to_string())?;

    let records = args
        .records
        .or(cfg.records)
        .map(|r| config::expand_tilde_string(r.trim()))
        .unwrap_or_else(|| assets.records_url().to_string());

    let location_raw = args
        .location
        .or(cfg.location)
        .unwrap_or_else(|| assets.site_root().to_string());
    let location = Url::parse(location_raw.trim())
        .map_err(|e| format!("invalid --location '{location_raw}': {e}"))?;

    let default_page = args
        .default_page
        .or(cfg.default_page)
        .unwrap_or_else(|| DEFAULT_PAGE.to_string())
        .trim()
        .to_string();

    let person_param = args
        .person_param
        .or(cfg.person_param)
        .unwrap_or_else(|| PERSON_PARAM.to_string())
        .trim()
        .to_string();
    if person_param.is_empty() {
        return Err("invalid person_param, expected a name".to_string());
    }

    let pages = match args.pages {
        Some(raw) => validation::parse_pages_csv(&raw)?,
        None => cfg
            .pages
            .unwrap_or_else(|| DEFAULT_PAGES.iter().map(|p| p.to_string()).collect()),
    };

    let raw_steps = if args.steps.is_empty() {
        cfg.steps.unwrap_or_default()
    } else {
        args.steps
    };
    let steps = raw_steps
        .iter()
        .map(|raw| validation::parse_step(raw).map_err(|e| format!("invalid step '{raw}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    let output = args.output.or(cfg.output).filter(|o| !o.trim().is_empty());
    let format_raw = args.output_format.or(cfg.output_format);
    let output_format = match format_raw.as_deref() {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    Ok(RunConfig {
        site,
        records,
        location,
        default_page,
        person_param,
        pages,
        nav: cfg.nav,
        steps,
        output: output.map(|o| config::expand_tilde_string(o.trim())),
        output_format,
        timeout,
        proxy,
        no_color,
        verbose: args.verbose,
    })
}

/// The page markup: one section per page id and either the configured nav
/// triggers or one tab per page.
fn build_document(run: &RunConfig) -> Document {
    let Some(nav) = run.nav.as_ref() else {
        return Document::standard(run.pages.as_slice());
    };
    let mut doc = Document::new().with_all_containers().with_stats();
    for id in run.pages.iter() {
        doc.pages.push(PageSection::new(id.as_str()));
    }
    for entry in nav {
        let mut trigger = match entry.target.as_deref() {
            Some(target) => NavTrigger::new(target.trim()),
            None => NavTrigger {
                target: None,
                ..NavTrigger::new("")
            },
        };
        trigger.role = entry.role.as_deref().and_then(TriggerRole::parse);
        doc.nav_triggers.push(trigger);
    }
    doc
}

fn init_tracing(verbose: u8, no_color: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info,recordbook=debug",
        _ => "debug,recordbook=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!no_color)
                .with_target(false),
        )
        .try_init();
}

fn step_event(session: &Session, step: &Step) -> Option<Event> {
    match step {
        Step::Click(page) => match session.trigger_for(page) {
            Some(index) => Some(Event::NavClick(index)),
            None => {
                tracing::warn!(page = %page, "no nav trigger targets this page");
                None
            }
        },
        Step::Hash(page) => Some(Event::HashNavigate(page.clone())),
        Step::Open(name) => Some(Event::OpenProfile(name.clone())),
        Step::Back => Some(Event::ProfileBack),
        Step::HistoryBack => Some(Event::HistoryBack),
        Step::HistoryForward => Some(Event::HistoryForward),
    }
}

/// Replays the steps in order. Returns how many changed the page.
fn apply_steps(session: &mut Session, steps: &[Step]) -> usize {
    let mut changed = 0;
    for step in steps {
        let Some(event) = step_event(session, step) else {
            continue;
        };
        if session.dispatch(event) {
            changed += 1;
        } else {
            tracing::info!(?step, "step left the page unchanged");
        }
    }
    changed
}

async fn write_output(path: &str, bytes: &[u8]) -> Result<(), String> {
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file '{path}': {e}"))?;
    outfile
        .write_all(bytes)
        .await
        .map_err(|e| format!("failed to write output file '{path}': {e}"))?;
    outfile
        .flush()
        .await
        .map_err(|e| format!("failed to flush output file '{path}': {e}"))?;
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let assets = AssetResolver::parse(&run.site).map_err(|e| e.to_string())?;
    let source = RecordSource::parse(&run.records);
    let client =
        loader::build_client(run.timeout, run.proxy.as_deref()).map_err(|e| e.to_string())?;

    format_kv_line("Site", assets.site_root().as_str());
    format_kv_line("Records", &run.records);
    format_kv_line("Location", run.location.as_str());
    format_kv_line("Pages", &run.pages.join(","));
    if !run.steps.is_empty() {
        format_kv_line("Steps", &run.steps.len().to_string());
    }
    println!();

    let mut records_options = RecordsOptions::new(assets);
    records_options.person_param = run.person_param.clone();
    let options = SessionOptions {
        navigation: NavigationOptions {
            default_page: run.default_page.clone(),
        },
        records: records_options,
    };
    let document = build_document(&run);
    let history = MemoryHistory::new(run.location.clone());
    let mut session = Session::start(document, history, options).map_err(|e| e.to_string())?;

    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: Loading  : {spinner} {msg} [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress bar style: {e}"))?,
    );
    pb.set_message(source.resource_name());

    let now = Instant::now();
    session.load(&source, &client).await;
    pb.finish_and_clear();

    let changed = apply_steps(&mut session, &run.steps);

    let snapshot = Snapshot::from_session(&session);
    let bytes = output::render(run.output_format, &snapshot);
    match run.output.as_deref() {
        Some(path) => {
            write_output(path, &bytes).await?;
            format_kv_line("Output", path);
        }
        None => {
            print!("{}", String::from_utf8_lossy(&bytes));
            println!();
        }
    }

    match session.records() {
        Some(records) => match records.error() {
            Some(error) => format_kv_line("Error", &error.red().to_string()),
            None => {
                format_kv_line(
                    "Records",
                    &records.records().len().to_string().bold().green().to_string(),
                );
                format_kv_line("People", &records.leaders().len().to_string());
            }
        },
        None => format_kv_line("Records", &"not mounted".yellow().to_string()),
    }
    if !run.steps.is_empty() {
        format_kv_line(
            "Changed",
            &format!("{}/{} steps", changed, run.steps.len()),
        );
    }

    let elapsed_time = now.elapsed();
    println!();
    println!(
        ":: Completed :: took {}ms ::",
        elapsed_time.as_millis()
    );

    Ok(())
}

fn build_runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));

    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine config path".to_string())?;
        config::ensure_default_config_file(&path)?;
        format_kv_line("Config", &path.display().to_string());
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    init_tracing(run.verbose, run.no_color);

    let rt = build_runtime()?;
    rt.block_on(run_async(run))?;
    Ok(())
}
