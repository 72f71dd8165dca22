use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "desk-clock")]
#[command(version)]
#[command(about = "A full-screen touch desk clock built from pluggable feature widgets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill the screen with one feature type and log its handling times
    TryFeature(TryFeatureArgs),
}

#[derive(Args)]
pub struct TryFeatureArgs {
    /// Registered feature type, e.g. Clock
    pub type_id: String,
    #[arg(long, default_value_t = 1)]
    pub rows: usize,
    #[arg(long, default_value_t = 1)]
    pub cols: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_the_clock() {
        let cli = Cli::try_parse_from(["desk-clock"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_try_feature_arguments() {
        let cli = Cli::try_parse_from(["desk-clock", "try-feature", "Clock", "--rows", "2", "--cols", "3"]).unwrap();
        let Some(Commands::TryFeature(args)) = cli.command else {
            panic!("expected try-feature");
        };
        assert_eq!(args.type_id, "Clock");
        assert_eq!((args.rows, args.cols), (2, 3));
    }
}
