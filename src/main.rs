#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;

use dframe::common::logger::{install_logger, parse_level};
use dframe::config::Config;
use dframe::print_err;
use dframe::{Completion, Frame, Output};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "dframe", about = "A data-frame style command REPL.")]
struct Opt {
    /// Keep parsing after `-help` and log every parsed argument.
    #[structopt(long)]
    debug: bool,

    /// One of off, error, warn, info, debug or trace.
    #[structopt(long = "log-level")]
    log_level: Option<String>,

    /// Hides file names matching the glob from path completion.
    #[structopt(long)]
    ignore: Vec<String>,

    /// Prints the completion of <line> with the cursor at its end.
    #[structopt(long)]
    complete: Option<String>,

    /// Runs the commands in the file instead of reading stdin.
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,
}

fn print_output(output: &Output) {
    match output {
        Output::Error(text) => print_err!("{}", text),
        Output::Text(text) if text.is_empty() => {}
        other => {
            let text = other.text();
            if text.ends_with('\n') {
                print!("{}", text);
            } else {
                println!("{}", text);
            }
        }
    }
}

/// Feeds lines to the frame, joining continuation lines until each command
/// is complete. Returns false if any command failed.
fn run_lines<R: BufRead>(frame: &mut Frame, reader: R, prompt: Option<&str>) -> io::Result<bool> {
    let mut ok = true;
    let mut buf = String::new();
    let mut lines = reader.lines();
    loop {
        if let Some(prompt) = prompt {
            print!("{}", if buf.is_empty() { prompt } else { "... " });
            io::stdout().flush()?;
        }

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        if buf.is_empty() && line.trim().is_empty() {
            continue;
        }

        if !buf.is_empty() {
            buf.push('\n');
        }

        buf.push_str(&line);
        if !frame.is_complete_line(&buf) {
            continue;
        }

        for output in frame.process_line(&buf) {
            ok &= !output.is_error();
            print_output(&output);
        }

        buf.clear();
    }

    if !buf.is_empty() {
        warn!("incomplete command at end of input: {:?}", buf);
        for output in frame.process_line(&buf) {
            ok &= !output.is_error();
            print_output(&output);
        }
    }

    Ok(ok)
}

fn run_script(frame: &mut Frame, script: &Path) -> Result<bool, failure::Error> {
    let file = File::open(script)
        .map_err(|err| format_err!("{}: {}", script.display(), err))?;
    Ok(run_lines(frame, BufReader::new(file), None)?)
}

fn complete(frame: &Frame, line: &str) {
    match frame.complete(line, line.len()) {
        Completion::Replaced { line, .. } => println!("{}", line),
        Completion::Candidates(candidates) => {
            for candidate in candidates {
                println!("{}", candidate);
            }
        }
        Completion::Unchanged => println!("{}", line),
    }
}

fn main() {
    let opt = Opt::from_args();

    let mut config = Config::from_env();
    config.debug |= opt.debug;
    config.ignore_patterns.extend(opt.ignore.iter().cloned());
    if let Some(level) = &opt.log_level {
        match parse_level(level) {
            Some(level) => config.log_level = Some(level),
            None => print_err!("invalid log level: `{}'", level),
        }
    }

    if let Err(err) = install_logger("dframe", config.log_level) {
        print_err!("failed to initialize the logger: {}", err);
    }

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            print_err!("failed to get the current directory: {}", err);
            process::exit(1);
        }
    };

    info!("starting dframe in {}", cwd.display());
    let prompt = config.prompt.clone();
    let mut frame = Frame::new(config, cwd);

    if let Some(line) = &opt.complete {
        complete(&frame, line);
        return;
    }

    let result = match &opt.script {
        Some(script) => run_script(&mut frame, script),
        None => {
            let stdin = io::stdin();
            // Failed commands do not fail an interactive session.
            let result = run_lines(&mut frame, stdin.lock(), Some(&prompt)).map(|_| true);
            println!();
            result.map_err(failure::Error::from)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            print_err!("{}", err);
            process::exit(1);
        }
    }
}
