use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use treewm_core::LayoutAction;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "TreeWM",
    version = treewm_core::version(),
    about = "TreeWM - Move containers around a tiling layout tree while keeping focus history intact",
)]
pub struct Args {
    /// Specify custom configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Use default configuration and ignore config files
    #[arg(long = "defaults")]
    pub use_defaults: bool,

    /// Layout file to load. Falls back to the saved layout when persistence is enabled
    #[arg(short = 'l', long = "layout", value_name = "FILE")]
    pub layout_path: Option<PathBuf>,

    /// Move a container, given as CONTAINER:TARGET:INDEX using container names
    #[arg(short = 'm', long = "move", value_name = "CONTAINER:TARGET:INDEX")]
    pub moves: Vec<MoveArg>,

    /// Focus a container before applying moves
    #[arg(long = "focus", value_name = "NAME")]
    pub focus: Option<String>,

    /// Print the resulting layout as YAML instead of the debug view
    #[arg(long = "yaml")]
    pub yaml: bool,

    /// Delete the saved layout and exit
    #[arg(long = "reset-layout", conflicts_with_all = ["layout_path", "moves", "focus", "dry_run"])]
    pub reset_layout: bool,

    /// Validate configuration and layout and exit without applying moves
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Only log info and above
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log everything, including trace output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Focus first, then moves in the order given
    pub fn actions(&self) -> Vec<LayoutAction> {
        self.focus
            .iter()
            .map(|name| LayoutAction::Focus(name.as_str().into()))
            .chain(self.moves.iter().map(MoveArg::to_action))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveArg {
    pub container: String,
    pub target_parent: String,
    pub target_index: usize,
}

impl MoveArg {
    pub fn to_action(&self) -> LayoutAction {
        LayoutAction::Move {
            container: self.container.as_str().into(),
            target_parent: self.target_parent.as_str().into(),
            target_index: self.target_index,
        }
    }
}

impl FromStr for MoveArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let (Some(index), Some(target_parent), Some(container)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected CONTAINER:TARGET:INDEX, got '{s}'"));
        };

        if container.is_empty() || target_parent.is_empty() {
            return Err(format!("container names cannot be empty in '{s}'"));
        }

        let target_index = index
            .parse()
            .map_err(|e| format!("invalid index '{index}': {e}"))?;

        Ok(Self {
            container: container.to_string(),
            target_parent: target_parent.to_string(),
            target_index,
        })
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}
