use clap::Parser;
use std::io;
use std::process::ExitCode;
use temp_history::app::{self, Config};
use temp_history::meteostat::Client;
use temp_history::style::{Palette, Style};

#[derive(Debug, Parser)]
struct Args {
    #[clap(short, long, default_value_t=String::from("temp-history/0.1 (https://github.com/temp-history)"))]
    user_agent: String,

    /// Disable colored output
    #[clap(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let palette = if args.no_color {
        Palette::plain()
    } else {
        Palette::ansi()
    };

    if palette.is_enabled() {
        // Start from a clean screen, as `clear` would.
        print!("\x1b[2J\x1b[1;1H");
    }

    let config = Config::new(palette);
    let client = Client::new(&args.user_agent);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    match app::run(&config, &client, &mut input, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{}", palette.paint(Style::Alert, &err.to_string()));
            ExitCode::FAILURE
        }
    }
}
