//! Interactive event loop.
//!
//! Page fetches run as spawned tasks and report back over a channel, so the
//! user can keep typing while a page loads. A newer page command supersedes
//! the one in flight; the controller discards the older result when it lands.

use std::io;
use std::sync::Arc;

use log::debug;
use log::info;
use pageselect_lib::error::FetchError;
use pageselect_lib::model::Page;
use pageselect_lib::source::PageSource;
use pageselect_lib::{Dispatch, LoadState, PageRequest, TableController};
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::command::Command;
use crate::command::HELP;
use crate::render::render;

/// Page source shared between the controller and fetch tasks.
pub type SharedSource = Arc<dyn PageSource>;

type FetchResult = (PageRequest, Result<Page, FetchError>);

pub struct App {
    table: TableController<SharedSource>,
    columns: Vec<String>,
    results: mpsc::UnboundedSender<FetchResult>,
}

enum Flow {
    Continue,
    Quit,
}

impl App {
    /// Runs until the user quits or stdin closes.
    pub async fn run(table: TableController<SharedSource>, columns: Vec<String>) -> io::Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App {
            table,
            columns,
            results: tx,
        };

        if let LoadState::Loading(request) = app.table.state() {
            app.spawn_fetch(request);
        }
        println!("{}\n", HELP);
        println!("loading page 1...");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                Some((request, result)) = rx.recv() => {
                    match app.table.complete_page(request, result) {
                        Dispatch::Stale => {}
                        _ => app.show(),
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("stdin closed");
                        break;
                    };
                    if let Flow::Quit = app.handle_line(&line) {
                        break;
                    }
                }
            }
        }

        info!("exiting with {} rows selected", app.table.selection().len());
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                return Flow::Continue;
            }
        };

        match command {
            Command::Next => match self.table.next_page() {
                Some(request) => self.spawn_fetch(request),
                None => println!("already on the last page"),
            },
            Command::Previous => match self.table.previous_page() {
                Some(request) => self.spawn_fetch(request),
                None => println!("already on the first page"),
            },
            Command::Goto(page) => {
                let request = self.table.request_page(page);
                self.spawn_fetch(request);
            }
            Command::Toggle(id) => {
                let dispatch = self.table.manual_toggle(id);
                self.report(dispatch);
            }
            Command::Select(text) => match self.table.bulk_select_text(&text) {
                Ok(dispatch) => self.report(dispatch),
                Err(e) => println!("{}", e),
            },
            Command::Clear => {
                let dispatch = self.table.clear_selection();
                self.report(dispatch);
            }
            Command::Render => self.show(),
            Command::Help => println!("{}", HELP),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn spawn_fetch(&self, request: PageRequest) {
        println!("loading page {}...", request.page);
        let source = self.table.source().clone();
        let results = self.results.clone();
        tokio::spawn(async move {
            let result = source.fetch(request.page).await;
            // Receiver only goes away on exit.
            let _ = results.send((request, result));
        });
    }

    fn report(&self, dispatch: Dispatch) {
        match dispatch {
            Dispatch::Busy => println!("still loading, try again in a moment"),
            _ => self.show(),
        }
    }

    fn show(&self) {
        print!("{}", render(&self.table.view(), &self.columns));
    }
}
