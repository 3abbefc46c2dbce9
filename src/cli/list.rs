use super::CliError;
use crate::config::Config;
use crate::format::time_short;
use crate::reader::{LogReader, ReaderOptions, TimeWindow};
use crate::remote::{LogService, LogStreamDescriptor};
use crate::time::resolve_now;
use clap::Args;
use std::io::Write;
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Log group to inspect
    pub group: String,

    /// Task UUID or stream name prefix
    #[arg(short, long)]
    pub task: Option<String>,

    /// Only streams with activity since this time
    #[arg(short, long, default_value = "1h")]
    pub since: String,

    /// Only streams created before this time
    #[arg(short, long)]
    pub until: Option<String>,
}

pub async fn run(args: &ListArgs, config: &Config, service: Arc<dyn LogService>) -> Result<(), CliError> {
    let start = resolve_now(&args.since)?;
    let end = args.until.as_deref().map(resolve_now).transpose()?;

    let reader = LogReader::open(
        service,
        &args.group,
        args.task.as_deref(),
        TimeWindow::new(start, end),
        ReaderOptions::from(&config.reader),
    )
    .await?;

    let mut streams = reader.list_streams().await?;
    // Oldest activity first.
    streams.reverse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(render_table(&streams).as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Stream name, last event and creation time, one stream per row.
pub fn render_table(streams: &[LogStreamDescriptor]) -> String {
    const HEADER: [&str; 3] = ["Task", "Last Event", "Creation"];

    let rows: Vec<[String; 3]> = streams
        .iter()
        .map(|s| {
            [
                s.name.clone(),
                time_short(s.last_event_or_epoch()),
                time_short(s.creation_time),
            ]
        })
        .collect();

    let name_width = rows
        .iter()
        .map(|r| r[0].chars().count())
        .chain(std::iter::once(HEADER[0].len()))
        .max()
        .unwrap_or(0);
    let last_width = rows
        .iter()
        .map(|r| r[1].chars().count())
        .chain(std::iter::once(HEADER[1].len()))
        .max()
        .unwrap_or(0);

    let mut table = String::new();
    let mut push_row = |cols: [&str; 3]| {
        table.push_str(&format!(
            "{:<name_width$}  {:<last_width$}  {}\n",
            cols[0], cols[1], cols[2]
        ));
    };

    push_row(HEADER);
    for row in &rows {
        push_row([row[0].as_str(), row[1].as_str(), row[2].as_str()]);
    }
    table
}
