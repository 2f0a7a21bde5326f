/// guardband main: analytic and Monte-Carlo guard-band evaluation subcommands.
use clap::Parser; // trait import enables GuardbandCli::parse()

use guardband::cli::{Command, GuardbandCli};
use guardband::commands;
use guardband::config::{resolve_config_path, Settings};
use guardband::core::debug;
use guardband::core::harness::ComparisonHarness;
use guardband::core::MonteCarloEvaluator;

fn main() -> anyhow::Result<()> {
    let args = GuardbandCli::parse();
    if args.debug {
        debug::force_enable();
    }

    let settings = Settings::load(&args.config)?;
    if let Some(p) = resolve_config_path(&args.config) {
        guardband::debug_log!("config: {} (exists: {})", p.display(), p.exists());
    }
    let evaluator = settings.analytic();

    match args.cmd {
        Command::Evaluate { channel, json } => {
            commands::evaluate::main_with_opts(&evaluator, channel, json)
        }

        Command::Compare {
            channel,
            samples,
            seed,
            json,
        } => {
            let montecarlo = match samples {
                Some(n) => MonteCarloEvaluator::new(n)?,
                None => settings.montecarlo()?,
            };
            let harness = ComparisonHarness::new(evaluator, montecarlo);
            let code = commands::compare::main_with_opts(
                &harness,
                channel,
                seed.unwrap_or(settings.montecarlo.seed),
                json,
            )?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }

        Command::Sweep {
            grid,
            sigma_noise,
            out,
            format,
        } => commands::sweep::main_with_opts(&settings, grid, sigma_noise, out, format),

        Command::Band {
            noise,
            ber,
            sigma_x,
            beta_max,
        } => commands::band::main_with_opts(&evaluator, noise, ber, sigma_x, beta_max),

        Command::Generate {
            noise,
            sigma_x,
            mu_x,
            samples,
            seed,
            out,
        } => commands::generate::main_with_opts(
            noise,
            sigma_x,
            mu_x,
            samples,
            seed.unwrap_or(settings.montecarlo.seed),
            out,
        ),

        Command::Config => {
            print!("{}", settings.to_toml_string()?);
            Ok(())
        }
    }
}
