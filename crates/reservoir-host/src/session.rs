//! Command dispatch against a shared economy.
//!
//! The economy lives behind `Rc<RefCell<_>>` so the [`TurnTrigger`]
//! callback and the command dispatcher can both reach it. `turn` commands
//! go through the trigger exactly as a chat host's message hook would;
//! every other command calls the economy directly.

use std::cell::RefCell;
use std::rc::Rc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use reservoir_core::exchange::sale_value;
use reservoir_core::{EconomyError, KvStore, Notifier, ResourceEconomy, TurnTrigger, outcome};
use reservoir_types::Progress;

use crate::commands::{Command, USAGE};

/// Economy handle shared between the dispatcher and the turn callback.
pub type SharedEconomy<S, N> = Rc<RefCell<ResourceEconomy<S, N>>>;

/// A command loop's view of one economy.
pub struct Session<'a, S, N> {
    economy: SharedEconomy<S, N>,
    trigger: TurnTrigger<'a>,
}

impl<'a, S, N> Session<'a, S, N>
where
    S: KvStore + 'a,
    N: Notifier + 'a,
{
    /// Wrap `economy` and register its turn callback.
    pub fn new(economy: SharedEconomy<S, N>) -> Self {
        let mut trigger = TurnTrigger::new();
        let handle = Rc::clone(&economy);
        trigger.on_turn_advance(move |speaker| {
            if let Err(err) = handle.borrow_mut().on_turn(speaker) {
                warn!(%speaker, error = %err, "Turn not applied");
            }
        });
        Self { economy, trigger }
    }

    /// The shared economy.
    pub const fn economy(&self) -> &SharedEconomy<S, N> {
        &self.economy
    }

    /// Run one command and return the text to print, if any.
    ///
    /// [`Command::Quit`] is handled by the caller and produces no output.
    pub fn execute(&mut self, command: Command) -> Option<String> {
        if let Command::Turn(speaker) = &command {
            self.trigger.fire(speaker);
            return None;
        }

        let mut economy = self.economy.borrow_mut();
        let reply = match command {
            Command::Bind(id) => economy
                .bind_character(id)
                .map(|()| describe_binding(&economy)),
            Command::SetEnabled(enabled) => economy.set_enabled(enabled),
            Command::Tier(tier) => economy.set_capacity_tier(tier),
            Command::Route(policy) => economy.set_routing_policy(policy),
            Command::Extract(method) => Ok(outcome(economy.extract(method)).message),
            Command::Transfer {
                source,
                destination,
                amount,
            } => Ok(outcome(economy.transfer(source, destination, amount)).message),
            Command::Sell { source, amount } => Ok(outcome(economy.sell(source, amount)).message),
            Command::Preview(amount) => {
                sale_value(amount).map(|earned| format!("Selling {amount} would earn ${earned:.2}"))
            }
            Command::Status => economy.progress().map(|progress| {
                let name = economy
                    .character()
                    .map_or_else(String::new, ToString::to_string);
                let level = economy.state().map_or(0, |s| s.level);
                let amount = economy.state().map_or(Decimal::ZERO, |s| s.current_amount);
                render_status(&name, level, amount, &progress)
            }),
            Command::Reload => economy.reload().map(|()| describe_binding(&economy)),
            Command::Help => Ok(String::from(USAGE)),
            Command::Turn(_) | Command::Quit => return None,
        };
        Some(reply.unwrap_or_else(|err| render_error(&err)))
    }
}

fn describe_binding<S: KvStore, N: Notifier>(economy: &ResourceEconomy<S, N>) -> String {
    match (economy.character(), economy.state()) {
        (Some(id), Some(state)) => format!(
            "Bound {id} (level {}, {}, production {})",
            state.level,
            state.capacity_tier,
            if state.enabled { "on" } else { "off" }
        ),
        _ => String::from("No character bound"),
    }
}

fn render_error(err: &EconomyError) -> String {
    info!(error = %err, "Command rejected");
    format!("error: {err}")
}

/// One-screen status panel.
pub fn render_status(name: &str, level: u32, amount: Decimal, progress: &Progress) -> String {
    format!(
        "{name} | level {level}\n\
         amount     {amount:.1} / {capacity} ({amount_pct:.1}%)\n\
         experience {exp_pct:.1}% of {next}\n\
         yield      {yield_per_turn} per turn\n\
         pool A     {pool_a}\n\
         pool B     {pool_b}\n\
         wallet     ${wallet:.2}",
        capacity = progress.capacity,
        amount_pct = progress.amount_percent,
        exp_pct = progress.experience_percent,
        next = progress.next_level_experience,
        yield_per_turn = progress.yield_per_turn,
        pool_a = progress.pools.pool_a,
        pool_b = progress.pools.pool_b,
        wallet = progress.wallet,
    )
}
