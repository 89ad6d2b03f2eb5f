use std::{path::PathBuf, time::Duration};

use clap::Parser;
use mazecarve::{
    app::App,
    config::{Config, Mode},
    logging,
    maze::Layout,
};

/// Carve a perfect maze and find the way from the top-left entrance to the bottom-right exit
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of columns
    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    cols: i64,

    /// Number of rows
    #[arg(long, default_value_t = 12, allow_negative_numbers = true)]
    rows: i64,

    /// Random seed, for reproducible mazes
    #[arg(long)]
    seed: Option<u64>,

    /// Pause after each step of the animation, in milliseconds
    #[arg(long, default_value_t = 10)]
    delay_ms: u64,

    /// Skip the animation and only report the result
    #[arg(long)]
    headless: bool,

    /// Print the solved maze (headless mode)
    #[arg(long)]
    print: bool,

    /// Horizontal offset of the grid. Stored in cell bounds only, the terminal view ignores it
    #[arg(long, default_value_t = 0.0)]
    origin_x: f64,

    /// Vertical offset of the grid. Stored in cell bounds only, the terminal view ignores it
    #[arg(long, default_value_t = 0.0)]
    origin_y: f64,

    /// Cell width. Stored in cell bounds only, the terminal view ignores it
    #[arg(long, default_value_t = Layout::DEFAULT_CELL_SIZE)]
    cell_width: f64,

    /// Cell height. Stored in cell bounds only, the terminal view ignores it
    #[arg(long, default_value_t = Layout::DEFAULT_CELL_SIZE)]
    cell_height: f64,

    /// Write logs to this file. Filter with the MAZECARVE_LOG environment variable
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            cols: args.cols,
            rows: args.rows,
            seed: args.seed,
            layout: Layout {
                origin: (args.origin_x, args.origin_y),
                cell_size: (args.cell_width, args.cell_height),
            },
            step_delay: Duration::from_millis(args.delay_ms),
            mode: if args.headless {
                Mode::Headless
            } else {
                Mode::Animate
            },
            print: args.print,
            log_file: args.log_file,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from(Args::parse());
    let _guard = logging::init(config.log_file.as_deref(), config.mode == Mode::Headless)?;
    tracing::debug!("Starting with {:?}", config);

    App::new(config).run()
}
