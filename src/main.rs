use std::io::{self, BufRead, Write};

use color_eyre::eyre::WrapErr;
use log::info;
use maxrate::{run, write_json, write_text, write_text_header, DisplayService, RunOptions, Tolerance};
use structopt::StructOpt;

/// Sets every display to the highest refresh rate it supports.
#[derive(Debug, StructOpt)]
#[structopt(name = "maxrate")]
struct Opt {
    /// Relative tolerance within which the active rate counts as already at maximum
    #[structopt(long, default_value = "0.01")]
    tolerance: Tolerance,

    /// Skip displays that are not attached to the desktop
    #[structopt(long)]
    attached_only: bool,

    /// Print one JSON object per display instead of text
    #[structopt(long)]
    json: bool,

    /// Exit without waiting for Enter
    #[structopt(long)]
    no_pause: bool,

    /// More log output on stderr (-v: info, -vv: debug)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let service = system_displays()?;
    execute(&*service, &opt)?;

    if !opt.no_pause {
        pause()?;
    }
    Ok(())
}

#[cfg(windows)]
fn system_displays() -> color_eyre::Result<Box<dyn DisplayService>> {
    Ok(Box::new(maxrate::Win32Displays::new()))
}

#[cfg(not(windows))]
fn system_displays() -> color_eyre::Result<Box<dyn DisplayService>> {
    color_eyre::eyre::bail!("changing display settings is only supported on Windows")
}

fn execute<S: DisplayService + ?Sized>(service: &S, opt: &Opt) -> color_eyre::Result<()> {
    let options = RunOptions {
        tolerance: opt.tolerance,
        attached_only: opt.attached_only,
    };
    info!("tolerance {}, attached only: {}", options.tolerance, options.attached_only);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !opt.json {
        write_text_header(&mut out)?;
    }

    run(service, &options, |report| {
        let written = if opt.json {
            write_json(&mut out, &report)
        } else {
            write_text(&mut out, &report)
        };
        written.and_then(|_| out.flush())
    })
    .wrap_err("failed to write report")?;

    Ok(())
}

fn pause() -> io::Result<()> {
    print!("Press Enter to exit...");
    io::stdout().flush()?;
    io::stdin().lock().read_line(&mut String::new())?;
    Ok(())
}
