use std::io::{self, BufRead, Write};

use anyhow::Context;
use log::info;

use dining::{bench, Config, Strategy};

// Compared against each other, in this order, on every pass
const CONTENDERS: [Strategy; 2] = [Strategy::Ordered, Strategy::SmartAndPolite];

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = Config::default();

    // Time to attach a profiler
    eprint!("Press enter to start...");
    io::stderr().flush().context("failed to prompt")?;
    io::stdin()
        .lock()
        .read_line(&mut String::new())
        .context("failed to wait for the start signal")?;

    let mut out = io::stdout().lock();
    let mut pass = 0u64;
    loop {
        pass += 1;
        info!("pass {pass}");
        for strategy in CONTENDERS {
            bench::sweep(strategy, &config, &mut out)?;
        }
    }
}
