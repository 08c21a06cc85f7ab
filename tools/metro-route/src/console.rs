//! Interactive console menu
//!
//! Reads answers line by line from any `BufRead` and writes prompts to any
//! `Write`, so the whole session can be driven from a test. End of input is
//! treated like choosing "Exit".

use std::io::{BufRead, Write};

use anyhow::Result;
use metro_common::Error;
use metro_routing::{find_shortest, Metric, TransitGraph};
use tracing::debug;

use crate::report::{format_route, run_checks};

const MENU: &str = "Choose:
1) Find optimal route (time/distance, minimal interchanges)
2) Add station
3) Remove station
4) Add route
5) Remove route
6) Update route (distance/time)
7) Print graph
8) Run sample checks
9) Exit";

pub struct Console<R, W> {
    graph: TransitGraph,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(graph: TransitGraph, input: R, output: W) -> Self {
        Self {
            graph,
            input,
            output,
        }
    }

    pub fn graph(&self) -> &TransitGraph {
        &self.graph
    }

    /// Run the menu loop until "Exit" or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Metro Route Finder (Console)")?;

        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("> ")? else {
                break;
            };

            let outcome: Result<()> = match choice.as_str() {
                "1" => self.find_route(),
                "2" => self.add_station(),
                "3" => self.remove_station(),
                "4" => self.add_route(),
                "5" => self.remove_route(),
                "6" => self.update_route(),
                "7" => write!(self.output, "{}", self.graph).map_err(Into::into),
                "8" => run_checks(&self.graph, &mut self.output)
                    .map(|_| ())
                    .map_err(Into::into),
                "9" => break,
                _ => writeln!(self.output, "Invalid choice. Try again.").map_err(Into::into),
            };

            match outcome {
                Ok(()) => {}
                Err(e) if e.is::<EndOfInput>() => break,
                Err(e) => match e.downcast::<Error>() {
                    Ok(domain) => writeln!(self.output, "{domain}")?,
                    Err(other) => return Err(other),
                },
            }
            writeln!(self.output)?;
        }

        writeln!(self.output, "Bye!")?;
        Ok(())
    }

    fn find_route(&mut self) -> Result<()> {
        let from = self.ask("From (name or id): ")?;
        let to = self.ask("To (name or id): ")?;
        let metric = Metric::from(self.ask("Metric (time/distance) [time]: ")?.as_str());

        match find_shortest(&self.graph, &from, &to, metric) {
            Ok(route) => writeln!(self.output, "{}", format_route(&route))?,
            Err(Error::NoPath { .. }) => {
                writeln!(self.output, "No path found between those stations.")?
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn add_station(&mut self) -> Result<()> {
        let id = self.ask("Station id (unique): ")?;
        let name = self.ask("Station name: ")?;
        if id.is_empty() {
            return Err(Error::InvalidInput("station id must not be empty".to_string()).into());
        }

        let station = self.graph.add_station(&id, &name);
        writeln!(self.output, "Added {station}")?;
        Ok(())
    }

    fn remove_station(&mut self) -> Result<()> {
        let id = self.ask("Station id: ")?;
        let message = if self.graph.remove_station(&id) {
            "Removed."
        } else {
            "Station not found."
        };
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn add_route(&mut self) -> Result<()> {
        let from = self.ask("From station id: ")?;
        let to = self.ask("To station id: ")?;
        let distance = parse_number(&self.ask("Distance (km): ")?)?;
        let time = parse_number(&self.ask("Time (min): ")?)?;
        let line = self.ask("Line name: ")?;
        let bidirectional = self.ask("Bidirectional? (y/n) [y]: ")?;
        let bidirectional = bidirectional.is_empty() || bidirectional.eq_ignore_ascii_case("y");

        self.graph
            .add_route(&from, &to, distance, time, &line, bidirectional)?;
        writeln!(self.output, "Route added.")?;
        Ok(())
    }

    fn remove_route(&mut self) -> Result<()> {
        let from = self.ask("From station id: ")?;
        let to = self.ask("To station id: ")?;
        let line = self.ask("Line name: ")?;

        let message = if self.graph.remove_route(&from, &to, &line)? {
            "Route removed."
        } else {
            "No such route."
        };
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn update_route(&mut self) -> Result<()> {
        let from = self.ask("From station id: ")?;
        let to = self.ask("To station id: ")?;
        let line = self.ask("Line name: ")?;
        let distance = parse_optional(&self.ask("New distance (km) or leave blank: ")?)?;
        let time = parse_optional(&self.ask("New time (min) or leave blank: ")?)?;

        let message = if self
            .graph
            .update_route(&from, &to, &line, distance, time)?
        {
            "Route updated."
        } else {
            "No such route."
        };
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Prompt and read one trimmed line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("console input closed");
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like `prompt`, but end of input aborts the current action
    fn ask(&mut self, text: &str) -> Result<String> {
        self.prompt(text)?.ok_or_else(|| EndOfInput.into())
    }
}

#[derive(Debug)]
struct EndOfInput;

impl std::fmt::Display for EndOfInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "end of input")
    }
}

impl std::error::Error for EndOfInput {}

fn parse_number(s: &str) -> Result<f64, Error> {
    s.parse::<f64>()
        .map_err(|_| Error::InvalidInput(format!("'{s}' is not a number")))
}

fn parse_optional(s: &str) -> Result<Option<f64>, Error> {
    if s.is_empty() {
        Ok(None)
    } else {
        parse_number(s).map(Some)
    }
}
