mod aggregate;
mod charts;
mod classify;
mod cli;
mod plot;
mod reading;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Monthly { data, out, chart } => {
            match command::monthly(data, out, chart.as_deref()) {
                Ok(dir) => println!("Charts saved to `{}`", dir),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Commands::Cities { data, out, metric } => match command::cities(data, out, *metric) {
            Ok(dir) => println!("Charts saved to `{}`", dir),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::Pies {
            data,
            out,
            start_date,
            end_date,
            city,
        } => match command::pies(data, out, *start_date, *end_date, city.as_deref()) {
            Ok(dir) => println!("Charts saved to `{}`", dir),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::List {} => {
            for chart in charts::MONTHLY_CHARTS {
                println!("{:24} {}", chart.name, chart.title);
            }
        }
    }

    Ok(())
}
