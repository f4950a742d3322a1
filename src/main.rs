use clap::{App, Arg};
use herald::build::{build_site, BuildFlags};
use herald::config::Config;
use std::path::Path;

fn main() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init();

    let matches = App::new("herald")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Derives the prerender route list and the Atom feed for the site build")
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .takes_value(true)
                .help("Project directory (defaults to the current directory)"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("build")
                .help("Directory for the generated artifacts"),
        )
        .arg(
            Arg::with_name("no-prerender")
                .long("no-prerender")
                .help("Skip the prerender handoff (also implied by the PREVIEW environment variable)"),
        )
        .get_matches();

    let project = matches.value_of("project").unwrap_or(".");
    let output = matches.value_of("output").unwrap(); // has a default value
    let flags = BuildFlags {
        prerender: !matches.is_present("no-prerender") && std::env::var_os("PREVIEW").is_none(),
    };

    let config = match Config::from_directory(Path::new(project)) {
        Ok(config) => config,
        Err(e) => exit_with(&format!("{:#}", e)),
    };

    if let Err(e) = build_site(&config, Path::new(output), &flags) {
        exit_with(&e.to_string());
    }
}

fn exit_with(message: &str) -> ! {
    eprintln!("herald: {}", message);
    std::process::exit(1)
}
