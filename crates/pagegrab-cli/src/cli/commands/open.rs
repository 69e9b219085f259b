//! `pagegrab open <url>` – interactive session.
//!
//! Reads one command per line from stdin and maps it to a session event.
//! Downloads keep running while the session continues; `quit` (or EOF) waits
//! for them and prints what happened.

use anyhow::Result;
use pagegrab_core::config::PagegrabConfig;
use pagegrab_core::{Event, Outcome};
use std::io::{self, BufRead, Write};

use crate::cli::{load_session, print_report, save_as, transfer_queue, PageArgs, SaveArgs};

const HELP: &str = "\
commands:
  list               show the current view
  images on|off      show or hide images
  files on|off       show or hide file links
  get N              download row N
  all                download every visible row
  export             save the visible rows as a JSON manifest
  quit               wait for downloads and exit";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line {
    Event(Event),
    List,
    Help,
    Quit,
    Blank,
}

pub(crate) fn parse_line(input: &str) -> Result<Line, String> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let toggle = |arg: Option<&&str>| match arg.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        _ => Err("expected `on` or `off`".to_string()),
    };
    match words.first().map(|w| w.to_ascii_lowercase()).as_deref() {
        None => Ok(Line::Blank),
        Some("list" | "ls") => Ok(Line::List),
        Some("help" | "?") => Ok(Line::Help),
        Some("quit" | "exit" | "q") => Ok(Line::Quit),
        Some("images") => Ok(Line::Event(Event::ShowImages(toggle(words.get(1))?))),
        Some("files") => Ok(Line::Event(Event::ShowFiles(toggle(words.get(1))?))),
        Some("get") => {
            let n = words
                .get(1)
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or_else(|| "usage: get N".to_string())?;
            Ok(Line::Event(Event::DownloadRow(n)))
        }
        Some("all") => Ok(Line::Event(Event::DownloadAll)),
        Some("export") => Ok(Line::Event(Event::Export)),
        Some(other) => Err(format!("unknown command `{other}` (try `help`)")),
    }
}

pub fn run_open(cfg: &PagegrabConfig, page: &PageArgs, save: &SaveArgs) -> Result<()> {
    let mut session = load_session(cfg, page, save_as(cfg, save))?;
    let queue = transfer_queue(cfg, save)?;

    print!("{}", session.render());
    println!("Type `help` for commands.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = match parse_line(&input) {
            Ok(line) => line,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };
        match line {
            Line::Blank => {}
            Line::Help => println!("{HELP}"),
            Line::List => print!("{}", session.render()),
            Line::Quit => break,
            Line::Event(event) => match session.handle(event, &queue) {
                Outcome::Rendered(view) => print!("{view}"),
                Outcome::Dispatched(n) => println!("Started {n} download(s)"),
                Outcome::Exported(exported) => println!("Exporting {}", exported.filename),
                Outcome::Notice(notice) => println!("{notice}"),
            },
        }
    }

    if queue.pending() > 0 {
        println!("Waiting for {} download(s)...", queue.pending());
    }
    print_report(&queue.wait());
    Ok(())
}
