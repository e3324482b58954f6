mod commands;
mod terminal;

use battcheck_common::config::ScanConfig;
use battcheck_common::network::source::AddressSource;
use commands::{CommandLine, check};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    let cfg: ScanConfig = commands.scan_config();

    logging::init_logging(cfg.verbose);
    print::banner();

    let source: AddressSource = commands.address_source();

    print::header("validating addresses");
    check::check(&source, &cfg, &commands.output_dir).await
}
