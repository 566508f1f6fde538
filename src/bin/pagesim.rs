use std::fs;
use std::io;
use std::process;

use log::LevelFilter;

use pagesim::config::Config;
use pagesim::driver;
use pagesim::render::TextRenderer;
use pagesim::script::ScriptReader;
use pagesim::vmm::paging::engine::PagingEngine;

fn main() {
    let args = clap::command!()
        .about("Replays a paging command script against a simulated memory manager")
        .arg(
            clap::Arg::new("file")
                .short('f')
                .long("file")
                .required(true)
                .help("Command script to replay"),
        )
        .arg(
            clap::Arg::new("swap")
                .short('s')
                .long("swap")
                .help("Replacement policy, fifo or lru (overrides the config file)"),
        )
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .default_value("config/pagesim.yaml"),
        )
        .get_matches();

    if let Err(error) = run(&args) {
        eprintln!("Error: {}", error);
        process::exit(1);
    }
}

fn run(args: &clap::ArgMatches) -> Result<(), String> {
    let config_path = args.get_one::<String>("config").unwrap();
    let mut cfg = Config::new(config_path).map_err(|e| format!("configuration: {}", e))?;
    if let Some(swap) = args.get_one::<String>("swap") {
        cfg.swap = swap.parse().map_err(|e| format!("configuration: {}", e))?;
    }

    let level = cfg
        .log_level
        .parse::<LevelFilter>()
        .map_err(|_| format!("configuration: unknown log level '{}'", cfg.log_level))?;
    env_logger::Builder::new().filter_level(level).init();

    let engine_config = cfg.engine_config().map_err(|e| format!("configuration: {}", e))?;

    let script_path = args.get_one::<String>("file").unwrap();
    let script = fs::read_to_string(script_path)
        .map_err(|e| format!("cannot read script {}: {}", script_path, e))?;

    let mut engine = PagingEngine::new(engine_config);
    let mut renderer = TextRenderer::new(io::stdout().lock());
    driver::run(&mut engine, ScriptReader::new(&script), &mut renderer)
        .map_err(|e| format!("cannot write transcript: {}", e))?;
    Ok(())
}
