use std::fmt;

use battcheck_common::macros::SUCCESS_TARGET;
use colored::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::IndicatifFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::terminal::print::{PRINT_TARGET, RAW_FIELD};

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let level: &str = if verbose { "debug" } else { "info" };
    let filter: EnvFilter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,battcheck={level}")));

    let indicatif_layer = IndicatifLayer::new();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(BattcheckFormatter)
        .with_writer(indicatif_layer.get_stdout_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .init();
}

pub struct BattcheckFormatter;

impl<S, N> FormatEvent<S, N> for BattcheckFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if meta.target() == PRINT_TARGET {
            let mut raw = RawMessage::default();
            event.record(&mut raw);
            return writeln!(writer, "{}", raw.0);
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
            match (*meta.level(), meta.target() == SUCCESS_TARGET) {
                (Level::INFO, true) => ("[+]", |s| s.green().bold()),
                (Level::TRACE, _) => ("[ ]", |s| s.dimmed()),
                (Level::DEBUG, _) => ("[?]", |s| s.blue()),
                (Level::INFO, _) => ("[>]", |s| s.cyan()),
                (Level::WARN, _) => ("[*]", |s| s.yellow().bold()),
                (Level::ERROR, _) => ("[-]", |s| s.red().bold()),
            };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Pulls the pre-rendered line out of a `print` event.
#[derive(Default)]
struct RawMessage(String);

impl Visit for RawMessage {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == RAW_FIELD {
            self.0.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == RAW_FIELD {
            self.0 = format!("{value:?}");
        }
    }
}
