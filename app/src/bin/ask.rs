use std::io;

use nlq_app::logging::{init_logging, LogTarget};
use nlq_core::api::GraphQueryApi;
use nlq_core::config::AppConfig;
use nlq_core::model::{QueryResult, SchemaInfo};
use nlq_core::state::{self, Msg, QueryEdit, ViewState};
use nlq_core::view::{rows_view, schema_listing, RowsView};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseOutcome {
    Config,
    HelpRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Ask,
    Schema,
    Health,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AskConfig {
    backend_url: Option<String>,
    command: Command,
    question: Vec<String>,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            command: Command::Ask,
            question: Vec::new(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ask = parse_args()?;

    let mut config = AppConfig::load_default()?;
    if let Some(url) = ask.backend_url.clone() {
        config.backend_url = url;
        config.validate()?;
    }
    init_logging(&config.log.level, &LogTarget::Stderr)?;

    let api = nlq_app::http_api(&config)?;
    let output = run_command(&api, &ask).await?;
    print!("{output}");
    Ok(())
}

async fn run_command(api: &dyn GraphQueryApi, config: &AskConfig) -> io::Result<String> {
    match config.command {
        Command::Ask => {
            let result = ask(api, &config.question.join(" ")).await?;
            Ok(format_query_result(&result))
        }
        Command::Schema => {
            let schema = api.fetch_schema().await.map_err(io_other)?;
            Ok(format_schema(&schema))
        }
        Command::Health => {
            let health = api.health().await.map_err(io_other)?;
            Ok(format!("{}\n", health.message))
        }
    }
}

/// Drives a single question through the same submit flow the TUI uses.
async fn ask(api: &dyn GraphQueryApi, question: &str) -> io::Result<QueryResult> {
    let mut view = ViewState::default();
    state::update(&mut view, Msg::Edit(QueryEdit::Replace(question.to_string())));
    let effect = state::update(&mut view, Msg::Submit)
        .ok_or_else(|| io_other("missing question; pass it as trailing arguments"))?;

    let completion = effect.run(api).await;
    state::update(&mut view, completion);

    if let Some(error) = view.error() {
        return Err(io_other(error));
    }
    view.result()
        .cloned()
        .ok_or_else(|| io_other("backend call did not complete"))
}

fn format_query_result(result: &QueryResult) -> String {
    let rows = match rows_view(&result.results) {
        RowsView::Json(json) => json,
        RowsView::Empty(text) => text.to_string(),
    };
    let mut output = format!(
        "Generated Cypher Query:\n{}\n\nResults:\n{rows}\n",
        result.cypher_query
    );
    if let Some(explanation) = result
        .explanation
        .as_deref()
        .filter(|explanation| !explanation.is_empty())
    {
        output.push_str(&format!("\nExplanation:\n{explanation}\n"));
    }
    output
}

fn format_schema(schema: &SchemaInfo) -> String {
    let listing = schema_listing(schema);
    let nodes: String = listing
        .nodes
        .iter()
        .map(|node| format!("  {}\n    {}\n", node.heading(), node.properties))
        .collect();
    let relationships: String = listing
        .relationships
        .iter()
        .map(|relationship| format!("  {}\n", relationship.text()))
        .collect();
    format!("Node Types:\n{nodes}Relationships:\n{relationships}")
}

fn parse_args() -> io::Result<AskConfig> {
    let mut config = AskConfig::default();
    let outcome = parse_args_from(std::env::args().skip(1), &mut config)?;
    if outcome == ParseOutcome::HelpRequested {
        print_help();
        std::process::exit(0);
    }
    Ok(config)
}

fn parse_args_from(
    args: impl IntoIterator<Item = String>,
    config: &mut AskConfig,
) -> io::Result<ParseOutcome> {
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(ParseOutcome::HelpRequested),
            "--backend-url" => config.backend_url = Some(next_value(&mut args, "--backend-url")?),
            "--schema" => config.command = Command::Schema,
            "--health" => config.command = Command::Health,
            "--" => {
                config.question.extend(args.by_ref());
            }
            flag if flag.starts_with("--") => {
                return Err(io_other(format!("unknown argument `{flag}`")));
            }
            _ => config.question.push(arg),
        }
    }

    if config.command == Command::Ask && config.question.is_empty() {
        return Err(io_other("missing question; pass it as trailing arguments"));
    }

    Ok(ParseOutcome::Config)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> io::Result<String> {
    args.next()
        .ok_or_else(|| io_other(format!("missing value for `{flag}`")))
}

fn print_help() {
    println!(
        "nlq one-shot query\n\n\
Usage:\n  nlq-ask [OPTIONS] <QUESTION>...\n  nlq-ask [OPTIONS] --schema\n  nlq-ask [OPTIONS] --health\n\n\
Options:\n  --backend-url <url>  Backend base url (default: config file, NLQ_BACKEND_URL, or http://localhost:8000)\n  --schema             Print the graph schema instead of asking a question\n  --health             Print the backend health message\n\n\
Environment:\n  NLQ_CONFIG_DIR overrides the config directory; RUST_LOG overrides the log level.\n"
    );
}

fn io_other(error: impl std::fmt::Display) -> io::Error {
    io::Error::other(error.to_string())
}
