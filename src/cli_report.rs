use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::{colors, get_styles, CommandGroup, CommandHelp, TableBuilder};
use engagement_dashboard::config::{AppConfig, CliConfig, FileConfig};
use engagement_dashboard::dataset::{load_dataset, Dataset, SchemaPreset};
use engagement_dashboard::filter::{Dimension, SelectionRequest};
use engagement_dashboard::report::DashboardView;

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to the engagement export, a CSV file or a workbook.
    #[clap(value_parser = parse_path)]
    pub data_path: Option<PathBuf>,

    /// Path to a TOML config file, only `data_path`, `schema`, `sheet_name` and `[columns]` are used.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Column layout of the source file.
    #[clap(long, default_value = "pt-br")]
    pub schema: SchemaPreset,

    /// Worksheet to read when the data source is a workbook.
    #[clap(long)]
    pub sheet_name: Option<String>,
}

#[derive(Parser)]
#[command(styles=get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Shows the candidates of every dimension, selected ones are marked.
    Options,

    /// Selects exactly the given values of a dimension.
    Select {
        dimension: Dimension,
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Selects every available value of a dimension.
    SelectAll { dimension: Dimension },

    /// Deselects every value of a dimension.
    Clear { dimension: Dimension },

    /// Restores the initial selection.
    Reset,

    /// Shows the counters and the per-topic and per-week breakdowns.
    Report,

    /// Shows the matching records.
    Rows {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Shows how the source file was loaded.
    Stats,

    /// Shows the available commands.
    Help,

    /// Close this program.
    Exit,
}

const COMMANDS_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "options",
        args: "",
        description: "Show candidates and current selection",
        group: CommandGroup::Filters,
    },
    CommandHelp {
        name: "select",
        args: "<dimension> <values...>",
        description: "Select exactly these values",
        group: CommandGroup::Filters,
    },
    CommandHelp {
        name: "select-all",
        args: "<dimension>",
        description: "Select every available value",
        group: CommandGroup::Filters,
    },
    CommandHelp {
        name: "clear",
        args: "<dimension>",
        description: "Select nothing",
        group: CommandGroup::Filters,
    },
    CommandHelp {
        name: "reset",
        args: "",
        description: "Back to the initial selection",
        group: CommandGroup::Filters,
    },
    CommandHelp {
        name: "report",
        args: "",
        description: "Counters, topics and weekly trend",
        group: CommandGroup::Reports,
    },
    CommandHelp {
        name: "rows",
        args: "[--limit N]",
        description: "Matching records",
        group: CommandGroup::Reports,
    },
    CommandHelp {
        name: "stats",
        args: "",
        description: "Load statistics of the source",
        group: CommandGroup::Reports,
    },
    CommandHelp {
        name: "help",
        args: "",
        description: "This message",
        group: CommandGroup::System,
    },
    CommandHelp {
        name: "exit",
        args: "",
        description: "Close this program",
        group: CommandGroup::System,
    },
];

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

/// What the REPL remembers between commands.
struct Session {
    dataset: Dataset,
    source_path: PathBuf,
    request: SelectionRequest,
}

impl Session {
    fn view(&self) -> DashboardView {
        DashboardView::compute(&self.dataset, &self.request)
    }
}

fn print_options(view: &DashboardView) {
    let years = |values: &[i32]| values.iter().map(i32::to_string).collect::<Vec<_>>();

    cli_style::print_section_header("Filters");
    cli_style::print_choices(
        "Network",
        &view.options.networks,
        &view.selection.networks,
    );
    cli_style::print_choices("Topic", &view.options.topics, &view.selection.topics);
    cli_style::print_choices(
        "Year",
        &years(&view.options.years),
        &years(&view.selection.years),
    );
    cli_style::print_choices("Month", &view.options.months, &view.selection.months);
    cli_style::print_choices("Week", &view.options.weeks, &view.selection.weeks);
    cli_style::print_section_footer();
}

fn print_report(view: &DashboardView) {
    let report = &view.report;
    if report.is_empty {
        cli_style::print_warning("No data matches the current filters.");
        return;
    }

    cli_style::print_section_header("Summary");
    cli_style::print_key_value_highlight("Comments", &report.summary.comment_count.to_string());
    cli_style::print_key_value_highlight("Votes", &report.summary.total_votes.to_string());
    cli_style::print_section_footer();

    cli_style::print_section_header("Records by topic");
    let topics: Vec<(String, usize)> = report
        .topic_counts
        .iter()
        .map(|t| (t.topic.clone(), t.count))
        .collect();
    cli_style::print_bars(&topics, colors::HIGHLIGHT);
    cli_style::print_section_footer();

    cli_style::print_section_header("Weekly trend");
    let mut table = TableBuilder::new(vec!["Year", "Week", "Records"]);
    for week in &report.weekly_counts {
        table.add_row(vec![
            week.year.to_string(),
            week.week_label.clone(),
            week.count.to_string(),
        ]);
    }
    table.print();
    cli_style::print_section_footer();
}

fn print_rows(view: &DashboardView, limit: usize) {
    let rows = &view.report.rows;
    if rows.is_empty() {
        cli_style::print_warning("No data matches the current filters.");
        return;
    }

    let mut table = TableBuilder::new(vec![
        "Date", "Week", "ID", "Action", "Network", "Topic", "Votes", "Link",
    ]);
    for record in rows.iter().take(limit) {
        table.add_row(vec![
            record.date.to_string(),
            record.bucket.week_label.clone(),
            record.id.clone().unwrap_or_default(),
            record.action.clone(),
            record.network.clone(),
            record.topic.clone(),
            record.vote_count.to_string(),
            record.link.clone(),
        ]);
    }
    table.print();
    if rows.len() > limit {
        cli_style::print_empty_list(&format!("{} more rows not shown", rows.len() - limit));
    }
}

fn print_stats(session: &Session) {
    let stats = session.dataset.stats();
    cli_style::print_section_header("Source");
    cli_style::print_key_value("Path", &session.source_path.display().to_string());
    cli_style::print_key_value("Rows read", &stats.total_rows.to_string());
    cli_style::print_key_value("Rows kept", &stats.kept_rows().to_string());
    cli_style::print_key_value(
        "Dropped (invalid date)",
        &stats.dropped_invalid_dates.to_string(),
    );
    cli_style::print_key_value("Malformed rows", &stats.malformed_rows.to_string());
    cli_style::print_key_value(
        "Unreadable vote cells",
        &stats.invalid_vote_cells.to_string(),
    );
    cli_style::print_section_footer();
}

fn execute_command(line: String, session: &mut Session) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => match cli.command {
            InnerCommand::Options => print_options(&session.view()),
            InnerCommand::Select { dimension, values } => {
                if let Err(err) = session.request.set(dimension, Some(values)) {
                    return CommandExecutionResult::Error(format!("{}", err));
                }
                print_options(&session.view());
            }
            InnerCommand::SelectAll { dimension } => {
                if let Err(err) = session.request.set(dimension, None) {
                    return CommandExecutionResult::Error(format!("{}", err));
                }
                cli_style::print_success(&format!("Every {} selected", dimension));
            }
            InnerCommand::Clear { dimension } => {
                if let Err(err) = session.request.set(dimension, Some(Vec::new())) {
                    return CommandExecutionResult::Error(format!("{}", err));
                }
                cli_style::print_success(&format!("No {} selected", dimension));
            }
            InnerCommand::Reset => {
                session.request = SelectionRequest::default();
                cli_style::print_success("Selection reset");
            }
            InnerCommand::Report => print_report(&session.view()),
            InnerCommand::Rows { limit } => print_rows(&session.view(), limit),
            InnerCommand::Stats => print_stats(session),
            InnerCommand::Help => cli_style::print_help(COMMANDS_HELP),
            InnerCommand::Exit => return CommandExecutionResult::Exit,
        },
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
        }
    }
    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        data_path: cli_args.data_path.clone(),
        schema_preset: cli_args.schema,
        sheet_name: cli_args.sheet_name.clone(),
        ..Default::default()
    };
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    let dataset = load_dataset(&app_config.data_path, app_config.schema.clone())
        .with_context(|| format!("Could not load {:?}", app_config.data_path))?;

    let mut session = Session {
        dataset,
        source_path: app_config.data_path,
        request: SelectionRequest::default(),
    };

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<MyHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(MyHelper::new()));

    cli_style::print_welcome(
        &session.source_path.display().to_string(),
        session.dataset.len(),
    );

    loop {
        let readline = rl.readline(&cli_style::get_prompt());

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &mut session) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        cli_style::print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                cli_style::print_error(&format!("{:?}", e));
                break;
            }
        }
    }
    cli_style::print_goodbye();
    Ok(())
}
