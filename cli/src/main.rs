use log::{error, info, warn};
use std::process::ExitCode;
use treewm_core::serialization::{self, layout_to_string};
use treewm_core::{Config, ContainerTree, LayoutManager, TreeWMResult};

mod cli;
mod logger;

use cli::Args;
use logger::Verbosity;

fn main() -> ExitCode {
    let args = cli::parse_args();

    if let Err(e) = logger::init_logger(Verbosity::from_flags(args.quiet, args.verbose)) {
        eprintln!("Failed to initialize logger: {e}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> TreeWMResult<()> {
    info!("Starting TreeWM {}", treewm_core::version());

    let config = if args.use_defaults {
        Config::default()
    } else {
        Config::load(args.config_path.as_deref(), true)?
    };
    Config::set_config(config.clone());

    if args.reset_layout {
        if treewm_core::reset_layout()? {
            info!("Removed saved layout");
        } else {
            info!("No saved layout to remove");
        }
        return Ok(());
    }

    let tree = load_tree(args, &config)?;
    tree.validate()?;

    if args.dry_run {
        info!(
            "Configuration and layout are valid ({} containers, {} windows)",
            tree.len(),
            tree.windows().count()
        );
        return Ok(());
    }

    let manager = LayoutManager::with_config(tree, &config);
    let manager = treewm_core::start(manager, args.actions())?;

    if args.yaml {
        print!("{}", layout_to_string(manager.tree())?);
    } else {
        print!("{}", manager.debug_layout());
    }

    if serialization::save_persisted_layout(manager.tree())? {
        info!("Saved layout");
    }

    Ok(())
}

fn load_tree(args: &Args, config: &Config) -> TreeWMResult<ContainerTree> {
    if let Some(path) = &args.layout_path {
        return Ok(serialization::load_layout(path, config)?);
    }

    match serialization::load_persisted_layout(config)? {
        Some(tree) => {
            info!("Using saved layout");
            Ok(tree)
        }
        None => {
            if !config.persistence {
                warn!("Persistence is disabled, so there is no saved layout to fall back on");
            }
            Err("No layout given, pass one with --layout".into())
        }
    }
}
