//! Calculator client - state machine and arithmetic service client.
//!
//! # Example
//!
//! ```no_run
//! use calc_client::{Calculator, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let calc = Calculator::connect(&ClientConfig::from_env())?;
//!
//!     calc.handle_sequence("12+30=").await?;
//!     println!("{}", calc.display());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod keymap;
mod state_machine;

pub use client::{ArithmeticClient, HttpArithmeticClient};
pub use config::{ClientConfig, BASE_URL_ENV, TIMEOUT_ENV};
pub use keymap::instruction_for_key;
pub use state_machine::{Calculator, Listener};
