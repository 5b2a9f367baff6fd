use anyhow::Result;
use canvas_nav::app::App;
use canvas_nav::config::Config;
use clap::{crate_version, App as ClapApp, Arg};

fn main() -> Result<()> {
    let matches = ClapApp::new("canvas-nav")
        .version(crate_version!())
        .about("Scroll between the skills and library canvases")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Sets a custom configuration directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("reset-preferences")
                .long("reset-preferences")
                .help("Discards stored preferences before starting"),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    App::start(config, matches.is_present("reset-preferences"))
}
