/// List the longitude groups and their grid locations
use clap::Parser;

use gost_boundary_layer::export::location_grids_json;
use gost_boundary_layer::reference::{all_locations, LONGITUDE_GROUPS};

#[derive(Parser)]
#[command(name = "list-locations")]
#[command(about = "Print the longitude-group location reference", long_about = None)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.json {
        println!("{}", location_grids_json()?);
        return Ok(());
    }

    for group in LONGITUDE_GROUPS.iter() {
        let locs: Vec<String> = group
            .locations
            .iter()
            .map(|l| format!("({}, {})", l.lat, l.lon))
            .collect();
        println!("{:2} {:<10} {}", group.index, group.label, locs.join(", "));
    }

    println!("\nTotal locations: {}", all_locations().len());

    Ok(())
}
