use console::style;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

fn eprint_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => eprintln!("{}", text),
        Err(_) => eprintln!("{}", value),
    }
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn info(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("ℹ").blue().bold(), message);
            }
            OutputFormat::Json => {
                eprint_json(&serde_json::json!({
                    "status": "info",
                    "message": message.to_string(),
                }));
            }
        }
    }

    pub fn warning(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("⚠").yellow().bold(), message);
            }
            OutputFormat::Json => {
                eprint_json(&serde_json::json!({
                    "status": "warning",
                    "message": message.to_string(),
                }));
            }
        }
    }

    /// Print a plain text result; JSON mode wraps it in a status envelope
    pub fn text(&self, text: impl Display) {
        match self.format {
            OutputFormat::Human => println!("{}", text),
            OutputFormat::Json => print_json(&serde_json::json!({
                "status": "success",
                "data": text.to_string(),
            })),
        }
    }

    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", serde_json::to_string_pretty(&data)?);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "success",
                    "data": data,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Ok(())
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{}: {}", style(key).bold(), value);
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({
                    key.to_string(): value.to_string(),
                }));
            }
        }
    }

    pub fn section(&self, title: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("\n{}", style(title).bold().underlined());
        }
    }
}
