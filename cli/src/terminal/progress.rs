use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.blue} [{bar:32.green/bright_black}] {pos}/{len} devices {msg} ({elapsed})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▓░")
    .tick_strings(TICK_STRINGS)
}

/// Turns `span` into a progress bar counting `total` devices.
pub fn prepare(span: &Span, total: usize) {
    span.pb_set_style(&bar_style());
    span.pb_set_length(total as u64);
    span.pb_set_message("checked");
}

pub fn advance(span: &Span) {
    span.pb_inc(1);
}
