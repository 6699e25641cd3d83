// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use runtime::{ApiRuntime, DemoRuntime};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tripdesk_api::Client;
use tripdesk_app::{BrowserState, CollectionKind, LoginInput, Record, Report, SessionContext};
use tripdesk_testkit::DemoData;

const DEMO_SEED: u64 = 2026;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `tripdesk --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let log_path = init_logging(&config)?;
    info!(log = %log_path.display(), demo = options.demo, "starting tripdesk");

    let collection = options
        .collection
        .unwrap_or_else(|| config.default_collection());
    let mut state = BrowserState::new(collection, config.page_size());
    let mut session = SessionContext::new();

    if options.demo {
        let mut runtime = DemoRuntime::new(DemoData::generate(DEMO_SEED));
        if options.check_only {
            return Ok(());
        }
        if let Some(kind) = options.report {
            print_report(kind, runtime.records(kind));
            return Ok(());
        }
        return tripdesk_tui::run_app(&mut state, &mut session, &mut runtime);
    }

    let mut client = Client::new(config.api_base_url(), config.api_timeout()?).with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    if let Some(email) = options.email {
        let password = read_password(&email)?;
        let signed_in = client
            .login(&LoginInput::new(email, password))
            .context("sign in")?;
        client.set_token(Some(signed_in.token.clone()));
        session.begin(signed_in);
    }

    if let Some(kind) = options.report {
        let records = client
            .fetch_records(kind)
            .with_context(|| format!("fetch {} for report", kind.as_str()))?;
        print_report(kind, &records);
        return Ok(());
    }

    info!(
        base_url = client.base_url(),
        timeout_ms = u64::try_from(client.timeout().as_millis()).unwrap_or(u64::MAX),
        signed_in = client.has_token(),
        "starting browser against the booking API"
    );
    let mut runtime = ApiRuntime::new(client, config.console_base_url());
    tripdesk_tui::run_app(&mut state, &mut session, &mut runtime)
}

/// Sends `tracing` output to the log file; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<PathBuf> {
    let path = config.log_file()?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {} -- set [log].file", path.display()))?;

    let filter = EnvFilter::try_from_env("TRIPDESK_LOG")
        .or_else(|_| EnvFilter::try_new(config.log_level()))
        .context("build log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("initialize logging: {error}"))?;
    Ok(path)
}

fn read_password(email: &str) -> Result<String> {
    if let Ok(password) = env::var("TRIPDESK_PASSWORD")
        && !password.is_empty()
    {
        return Ok(password);
    }

    eprint!("password for {email}: ");
    io::stderr().flush().context("flush password prompt")?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn print_report(kind: CollectionKind, records: &[Record]) {
    print!("{}", Report::build(kind, records).render());
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    collection: Option<CollectionKind>,
    email: Option<String>,
    report: Option<CollectionKind>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        collection: None,
        email: None,
        report: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--collection" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--collection requires a collection name"))?;
                options.collection = Some(parse_collection("--collection", value.as_ref())?);
            }
            "--report" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--report requires a collection name"))?;
                options.report = Some(parse_collection("--report", value.as_ref())?);
            }
            "--email" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--email requires an address"))?;
                options.email = Some(value.as_ref().trim().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn parse_collection(flag: &str, value: &str) -> Result<CollectionKind> {
    CollectionKind::parse(value).ok_or_else(|| {
        anyhow!("{flag} {value:?} is not a collection; expected hotels, destinations, or users")
    })
}

fn print_help() {
    println!("tripdesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --collection <name>      Start on hotels, destinations, or users");
    println!("  --email <address>        Sign in first (password from TRIPDESK_PASSWORD or prompt)");
    println!("  --report <name>          Print a collection report and exit");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Browse generated sample data (in-memory)");
    println!("  --check                  Validate config + logging + API client setup");
    println!("  --help                   Show this help");
}
