//! Line-oriented command parsing.
//!
//! One command per line, whitespace separated, keywords case-insensitive:
//!
//! ```text
//! bind <name>              turn <speaker>
//! enable | disable         tier <small|medium|large>
//! route <pool_a|pool_b|discard>
//! extract <manual|direct|mechanical>
//! transfer <a|b> <a|b> <amount>
//! sell <a|b> <amount>      preview <amount>
//! status | reload | help | quit
//! ```
//!
//! Character names may contain spaces; everything after the keyword is
//! the name.

use std::str::FromStr;

use rust_decimal::Decimal;

use reservoir_core::EconomyError;
use reservoir_core::exchange::parse_amount;
use reservoir_types::{
    CapacityTier, CharacterId, ExtractionMethod, ParseSelectorError, Pool, RoutingPolicy,
};

/// Usage text printed by `help`.
pub const USAGE: &str = "\
commands:
  bind <name>                       select the active character
  turn <speaker>                    a chat turn by <speaker>
  enable | disable                  toggle production
  tier <small|medium|large>         set capacity tier
  route <pool_a|pool_b|discard>     set extraction destination
  extract <manual|direct|mechanical>
  transfer <a|b> <a|b> <amount>     move stored resource between pools
  sell <a|b> <amount>               sell stored resource for currency
  preview <amount>                  currency a sale of <amount> would earn
  status                            show progress, pools, wallet
  reload                            re-read the active character
  help | quit";

/// A parsed host command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bind a character.
    Bind(CharacterId),
    /// Deliver a chat turn spoken by a character.
    Turn(CharacterId),
    /// Enable or disable production.
    SetEnabled(bool),
    /// Change capacity tier.
    Tier(CapacityTier),
    /// Change routing policy.
    Route(RoutingPolicy),
    /// Extract with a method.
    Extract(ExtractionMethod),
    /// Move stored resource between pools.
    Transfer {
        /// Pool debited.
        source: Pool,
        /// Pool credited.
        destination: Pool,
        /// Quantity moved.
        amount: Decimal,
    },
    /// Sell stored resource.
    Sell {
        /// Pool debited.
        source: Pool,
        /// Quantity sold.
        amount: Decimal,
    },
    /// Show what a sale would earn.
    Preview(Decimal),
    /// Show the panel snapshot.
    Status,
    /// Re-read the bound character.
    Reload,
    /// Print usage.
    Help,
    /// Leave the command loop.
    Quit,
}

/// Errors produced while parsing a command line.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The keyword is not a known command.
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    /// A required argument is missing.
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command keyword.
        command: &'static str,
        /// Description of the missing argument.
        argument: &'static str,
    },

    /// A selector or quantity argument was rejected.
    #[error(transparent)]
    Invalid(#[from] EconomyError),
}

fn required<'a>(
    arg: Option<&'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    arg.filter(|a| !a.is_empty())
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn selector<T>(arg: &str) -> Result<T, EconomyError>
where
    T: FromStr<Err = ParseSelectorError>,
{
    arg.parse().map_err(EconomyError::InvalidSelector)
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`CommandError`] for unknown keywords, missing arguments, and
/// unparseable selectors or amounts.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let mut args = rest.split_whitespace();

    let command = match keyword.to_ascii_lowercase().as_str() {
        "bind" => Command::Bind(CharacterId::from(required(
            Some(rest),
            "bind",
            "a character name",
        )?)),
        "turn" => Command::Turn(CharacterId::from(required(
            Some(rest),
            "turn",
            "a speaker name",
        )?)),
        "enable" => Command::SetEnabled(true),
        "disable" => Command::SetEnabled(false),
        "tier" => Command::Tier(selector(required(args.next(), "tier", "a capacity tier")?)?),
        "route" => Command::Route(selector(required(args.next(), "route", "a destination")?)?),
        "extract" => Command::Extract(selector(required(
            args.next(),
            "extract",
            "an extraction method",
        )?)?),
        "transfer" => Command::Transfer {
            source: selector(required(args.next(), "transfer", "a source pool")?)?,
            destination: selector(required(args.next(), "transfer", "a destination pool")?)?,
            amount: parse_amount(required(args.next(), "transfer", "an amount")?)?,
        },
        "sell" => Command::Sell {
            source: selector(required(args.next(), "sell", "a source pool")?)?,
            amount: parse_amount(required(args.next(), "sell", "an amount")?)?,
        },
        "preview" => Command::Preview(parse_amount(required(
            args.next(),
            "preview",
            "an amount",
        )?)?),
        "status" => Command::Status,
        "reload" => Command::Reload,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(keyword.to_owned())),
    };
    Ok(Some(command))
}
