use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter: a colored level symbol, the emitting module on
/// verbose levels, then the message.
pub struct SyncFormatter;

impl<S, N> FormatEvent<S, N> for SyncFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let level = *meta.level();

        let color_func: fn(ColoredString) -> ColoredString = match level {
            Level::TRACE => |s| s.dimmed(),
            Level::DEBUG => |s| s.blue(),
            Level::INFO => |s| s.green().bold(),
            Level::WARN => |s| s.yellow().bold(),
            Level::ERROR => |s| s.red().bold(),
        };

        write!(writer, "{} ", color_func(level_symbol(level).into()))?;

        if shows_target(level) {
            write!(writer, "{} ", meta.target().dimmed())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

fn level_symbol(level: Level) -> &'static str {
    match level {
        Level::TRACE => "[ ]",
        Level::DEBUG => "[?]",
        Level::INFO => "[+]",
        Level::WARN => "[*]",
        Level::ERROR => "[-]",
    }
}

/// Verbose levels also carry the emitting module path, so debug output
/// can be traced back to its source without cluttering normal runs.
fn shows_target(level: Level) -> bool {
    matches!(level, Level::DEBUG | Level::TRACE)
}

/// Installs the global subscriber; `--debug` lowers the floor to DEBUG,
/// and `RUST_LOG` still wins when set.
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(SyncFormatter)
        .with_writer(std::io::stderr)
        .init();
}
