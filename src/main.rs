use anyhow::Context;
use mandel_strategies::timing::{timed_fill, Timed};
use mandel_strategies::RunConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = RunConfig::from_args(std::env::args().skip(1))
        .context("invalid command line")?;
    config.validate().context("invalid render configuration")?;
    let job = config.job();
    let mut last = None;
    for strategy in config.resolve_strategies()? {
        let timed = timed_fill(strategy.as_ref(), &job, config.height, config.width)
            .with_context(|| format!("{} fill failed", strategy.name()))?;
        println!("{}", timed.report_line());
        last = Some(timed);
    }

    if config.show {
        show(config, last)?;
    }
    Ok(())
}

#[cfg(feature = "gui")]
fn show(config: RunConfig, last: Option<Timed>) -> anyhow::Result<()> {
    let code = mandel_strategies::gui::run(config, last);
    if code != gtk::glib::ExitCode::SUCCESS {
        anyhow::bail!("display window exited with {:?}", code);
    }
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn show(_config: RunConfig, _last: Option<Timed>) -> anyhow::Result<()> {
    log::warn!("built without the gui feature, nothing to show");
    Ok(())
}
