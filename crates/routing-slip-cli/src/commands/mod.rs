mod activities;
mod run;

use std::path::PathBuf;

use clap::Subcommand;

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the saga described by an itinerary file
    Run(RunArgs),
    /// List the activities itineraries can use
    Activities,
}

#[derive(clap::Args)]
pub(crate) struct RunArgs {
    /// Itinerary TOML file
    pub itinerary: PathBuf,

    /// Give up after this many deliveries
    #[arg(long, default_value_t = 1000)]
    pub max_deliveries: usize,

    /// Print the final routing slip as JSON instead of the step summary
    #[arg(long)]
    pub json: bool,
}

impl Commands {
    pub(crate) fn execute(self) -> Result<()> {
        match self {
            Self::Run(args) => run::run(&args),
            Self::Activities => {
                activities::run();
                Ok(())
            }
        }
    }
}
