mod cli;

use touchhelper::logging;

fn main() -> anyhow::Result<()> {
    logging::init();
    cli::run()
}
