//! Line-oriented terminal front end for the calculator.
//!
//! Each input line is either a key name (`Enter`, `Escape`, `Backspace`) or a
//! run of instruction characters, e.g. `12+30=`. `q` or EOF quits.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use calc_client::{instruction_for_key, Calculator, ClientConfig};
use calc_core::{CalculatorSnapshot, Instruction};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    println!("Calculator service: {}", config.base_url);
    let calc = Calculator::connect(&config)?;
    calc.set_listener(Some(Arc::new(|snap: &CalculatorSnapshot| {
        if snap.processing {
            println!("{:>24}", "processing...");
        }
    })));
    render(&calc);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "q" {
            break;
        }

        for inst in parse_line(line) {
            match inst {
                Ok(inst) => {
                    calc.handle_instruction(inst).await?;
                }
                Err(c) => eprintln!("Ignoring unknown key {:?}", c),
            }
        }
        render(&calc);
    }

    Ok(())
}

/// Split a line into instructions, keeping unknown characters as errors.
fn parse_line(line: &str) -> Vec<Result<Instruction, char>> {
    if let Some(inst) = instruction_for_key(line).filter(|_| line.chars().count() > 1) {
        return vec![Ok(inst)];
    }
    line.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| Instruction::try_from(c).map_err(|_| c))
        .collect()
}

fn render(calc: &Calculator) {
    println!("{:>24}", calc.expression());
    println!("{:>24}", calc.display());
}
