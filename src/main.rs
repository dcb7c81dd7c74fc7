use canvas_tracker::{Cli, Config, Result, util::LOCAL_OFFSET};
use clap::CommandFactory;
use clap_complete::CompleteEnv;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    CompleteEnv::with_factory(Cli::command).complete();
    pretty_env_logger::init();
    color_backtrace::install();
    // The local offset can only be read while we're still single-threaded.
    lazy_static::initialize(&LOCAL_OFFSET);
    let cli = Cli::default();
    let config = Config::load()?;
    cli.execute(config)
}
