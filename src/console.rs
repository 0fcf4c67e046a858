// src/console.rs
//! Terminal rendition of the dashboard widgets and its line commands.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::dashboard::{Coordinates, DashboardView, MapView};
use crate::present::{ChartPayload, ListItem, SelectOption};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(String),
    Compare(String, String),
    Locate,
    Help,
    Quit,
}

pub const HELP: &str = "commands: list | show <district> | compare <a> | <b> | locate | help | quit";

impl Command {
    /// Parse one input line. Blank lines and unknown verbs yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((v, r)) => (v, r.trim()),
            None => (line, ""),
        };
        match verb.to_ascii_lowercase().as_str() {
            "list" => Some(Command::List),
            "show" => Some(Command::Show(rest.to_string())),
            "compare" => {
                let (a, b) = rest.split_once('|').unwrap_or((rest, ""));
                Some(Command::Compare(a.trim().to_string(), b.trim().to_string()))
            }
            "locate" => Some(Command::Locate),
            "help" | "?" => Some(Command::Help),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Prints each widget update to stdout. Keeps the last option list so
/// `list` can redisplay it without another fetch.
#[derive(Debug, Default)]
pub struct ConsoleView {
    options: Mutex<Vec<String>>,
}

impl ConsoleView {
    pub fn options(&self) -> Vec<String> {
        self.options.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn emit(&self, text: &str) {
        let mut out = io::stdout().lock();
        // stdout going away is not something the dashboard can act on
        let _ = writeln!(out, "{}", text);
    }
}

fn chart_json(chart: &ChartPayload) -> String {
    serde_json::to_string(chart).unwrap_or_default()
}

impl DashboardView for ConsoleView {
    fn set_loading(&self, loading: bool) {
        if loading {
            self.emit("… loading");
        }
    }

    fn show_options(&self, options: &[SelectOption]) {
        let names: Vec<String> = options
            .iter()
            .filter(|o| !o.value.is_empty())
            .map(|o| o.text.clone())
            .collect();
        self.emit(&format!("{} districts available", names.len()));
        *self.options.lock().unwrap_or_else(|e| e.into_inner()) = names;
    }

    fn hide_detail(&self) {}

    fn show_detail(&self, title: &str, items: &[ListItem], chart: Option<&ChartPayload>) {
        let mut text = format!("== {} ==", title);
        for item in items {
            text.push_str(&format!("\n  {}", item));
        }
        if let Some(chart) = chart {
            text.push_str(&format!("\nchart: {}", chart_json(chart)));
        }
        self.emit(&text);
    }

    fn show_comparison(&self, chart: &ChartPayload) {
        self.emit(&format!("comparison: {}", chart_json(chart)));
    }

    fn notify(&self, message: &str) {
        self.emit(&format!("! {}", message));
    }
}

impl MapView for ConsoleView {
    fn center(&self, at: Coordinates, zoom: u8) {
        self.emit(&format!("map centered on ({:.4}, {:.4}) zoom {}", at.lat, at.lon, zoom));
    }

    fn place_marker(&self, at: Coordinates, popup: &str) {
        self.emit(&format!("marker at ({:.4}, {:.4}): {}", at.lat, at.lon, popup));
    }
}
