//! Line commands understood by the console driver.

use anyhow::{Context, Result, bail};
use game_core::{Action, CardId, PackId, Position};

pub const HELP: &str = "\
commands:
  place <card> <x> <y>   put one card from the inventory on the board
  pickup <card>          return a board card to the inventory
  select <card>          select every board copy of a card
  deselect <card>        drop a card from the selection
  clear                  clear the selection
  sell <card>            sell one inventory card
  open <pack>            buy and open a card pack
  turn                   advance to the next turn
  cancel                 cancel the running synthesis
  state                  print the session
  reset                  wipe the save and start over
  help                   show this text
  quit                   save and exit";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Forwarded to the session as is.
    Act(Action),
    OpenPack(PackId),
    Cancel,
    State,
    Reset,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "place" => {
                let [card, x, y] = args[..] else {
                    bail!("usage: place <card> <x> <y>");
                };
                let x = x.parse().with_context(|| format!("invalid x `{x}`"))?;
                let y = y.parse().with_context(|| format!("invalid y `{y}`"))?;
                Command::Act(Action::place_card(card, Position::new(x, y)))
            }
            "pickup" => Command::Act(Action::pick_up_card(card_arg("pickup", &args)?)),
            "select" => Command::Act(Action::select_card(card_arg("select", &args)?)),
            "deselect" => Command::Act(Action::deselect_card(card_arg("deselect", &args)?)),
            "sell" => Command::Act(Action::sell_card(card_arg("sell", &args)?)),
            "clear" => Command::Act(Action::clear_selection()),
            "turn" => Command::Act(Action::advance_turn()),
            "open" => {
                let [pack] = args[..] else {
                    bail!("usage: open <pack>");
                };
                Command::OpenPack(PackId::from(pack))
            }
            "cancel" => Command::Cancel,
            "state" => Command::State,
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command `{other}`, try `help`"),
        };
        Ok(Some(command))
    }
}

fn card_arg(verb: &str, args: &[&str]) -> Result<CardId> {
    match args {
        [card] => Ok(CardId::from(*card)),
        _ => bail!("usage: {verb} <card>"),
    }
}
