use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = stim_synth::config::Config::parse();
    if cfg.dump_params {
        let params = stim_synth::app::resolve_parameters(&cfg)?;
        print!("{}", params.dump());
        return Ok(());
    }

    stim_synth::app::run(cfg)
}
