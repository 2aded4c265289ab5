use clap::Parser;
use exif_rename::args::{resolve_files, trailing_argument, Args};
use exif_rename::metadata::ExifToolSource;
use exif_rename::processor::{Processor, ProcessorOptions};

fn main() {
    if let Err(e) = run() {
        println!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let positional = args.positional();
    let files = resolve_files(&positional)?;

    let options = ProcessorOptions {
        device_marker: args.device_marker.clone(),
        tag: trailing_argument(&positional).map(str::to_string),
        json: args.json,
        ..ProcessorOptions::default()
    };

    let source = ExifToolSource::new()?;
    let mut processor = Processor::new(source, options);
    processor.process(&files)?;

    Ok(())
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
