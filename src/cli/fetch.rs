use super::CliError;
use crate::config::Config;
use crate::format::{ColorRegistry, Formatter, OutputFormat, Template, VERBOSE_TEMPLATE};
use crate::reader::{LogReader, ReaderOptions, TimeWindow};
use crate::remote::LogService;
use crate::time::resolve_now;
use clap::Args;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const SLOW_HINT: &str = "logs are taking a while to load... possibly try a smaller time window";

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Log group to read
    pub group: String,

    /// Task UUID or stream name prefix
    #[arg(short, long)]
    pub task: Option<String>,

    /// Keep polling for new events until interrupted
    #[arg(short, long)]
    pub follow: bool,

    /// Output template, e.g. '[ {task} ] {time} {level} - {message}'
    #[arg(short = 'o', long)]
    pub format: Option<String>,

    /// Start of the window: a timestamp (2013-01-02T13:23:37), a relative
    /// duration (42m), or 'all'
    #[arg(short, long, default_value = "1h")]
    pub since: String,

    /// End of the window; defaults to now
    #[arg(short, long, conflicts_with = "follow")]
    pub until: Option<String>,

    /// Include data fields and errors in each line
    #[arg(short, long)]
    pub verbose: bool,

    /// Print each event as JSON
    #[arg(short, long, conflicts_with = "verbose")]
    pub raw: bool,
}

impl FetchArgs {
    /// Pick the output format: flags first, then the config file, then the default.
    pub fn output_format(&self, config: &Config) -> Result<OutputFormat, CliError> {
        if self.raw {
            return Ok(OutputFormat::Raw);
        }
        let template = if self.verbose {
            Template::parse(VERBOSE_TEMPLATE)?
        } else if let Some(format) = self.format.as_deref().or(config.output.format.as_deref()) {
            Template::parse(format)?
        } else {
            Template::default()
        };
        Ok(OutputFormat::Template(template))
    }

    pub fn window(&self) -> Result<TimeWindow, CliError> {
        let start = resolve_now(&self.since)?;
        let end = self.until.as_deref().map(resolve_now).transpose()?;
        Ok(TimeWindow::new(start, end))
    }
}

pub async fn run(
    args: &FetchArgs,
    config: &Config,
    service: Arc<dyn LogService>,
    color: bool,
) -> Result<(), CliError> {
    let window = args.window()?;
    let mut formatter = Formatter::new(args.output_format(config)?, ColorRegistry::new(color));

    let reader = LogReader::open(
        service,
        &args.group,
        args.task.as_deref(),
        window,
        ReaderOptions::from(&config.reader),
    )
    .await?;

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupted, stopping reader");
                cancel.cancel();
            }
        }
    });

    let stdout = std::io::stdout();
    let result = print_events(
        reader,
        args.follow,
        cancel,
        &mut formatter,
        &mut stdout.lock(),
        config.output.slow_warning,
    )
    .await;

    interrupt.abort();
    result
}

/// Render every event to `out` until the reader finishes.
///
/// In bounded mode a hint goes to stderr once if nothing arrives within
/// `slow_warning`.
pub async fn print_events<W: Write>(
    reader: LogReader,
    follow: bool,
    cancel: CancellationToken,
    formatter: &mut Formatter,
    out: &mut W,
    slow_warning: Duration,
) -> Result<(), CliError> {
    let mut events = reader.stream_events(follow, cancel);
    let mut warned = false;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    writeln!(out, "{}", formatter.render(&event)?)?;
                }
                None => break,
            },
            _ = tokio::time::sleep(slow_warning), if !follow && !warned => {
                eprintln!("{}", SLOW_HINT);
                warned = true;
            }
        }
    }
    out.flush()?;

    events.result()?;
    Ok(())
}
