use std::fmt;
use std::str::FromStr;
use tectosphere::World;
use tectosphere::tools::generate_seed8;

/// One named world command, as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Rebuild the world; without a seed a fresh one is drawn
    Reset(Option<u64>),
    Relax,
    Tweak,
    Distort(usize),
    Settle,
    RecreatePlates,
    GrowPlates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTriggerError(String);

impl fmt::Display for ParseTriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseTriggerError {}

impl FromStr for Trigger {
    type Err = ParseTriggerError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (name, argument) = match text.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (text, None),
        };
        let number = |argument: &str| {
            argument
                .parse::<u64>()
                .map_err(|_| ParseTriggerError(format!("'{argument}' is not a number in '{text}'")))
        };

        let trigger = match (name, argument) {
            ("reset", None) => Trigger::Reset(None),
            ("reset", Some(seed)) => Trigger::Reset(Some(number(seed)?)),
            ("relax", None) => Trigger::Relax,
            ("tweak", None) => Trigger::Tweak,
            ("distort", None) => Trigger::Distort(1),
            ("distort", Some(passes)) => Trigger::Distort(number(passes)? as usize),
            ("settle", None) => Trigger::Settle,
            ("recreate-plates", None) => Trigger::RecreatePlates,
            ("grow", None) => Trigger::GrowPlates,
            _ => return Err(ParseTriggerError(format!("unknown step '{text}'"))),
        };
        Ok(trigger)
    }
}

impl Trigger {
    pub fn apply(self, world: &mut World) {
        match self {
            Trigger::Reset(seed) => world.reset(seed.unwrap_or_else(generate_seed8)),
            Trigger::Relax => {
                world.relax_once();
            }
            Trigger::Tweak => {
                world.tweak_once();
            }
            Trigger::Distort(passes) => world.distort(passes),
            Trigger::Settle => {
                world.settle();
            }
            Trigger::RecreatePlates => world.recreate_plates(),
            Trigger::GrowPlates => {
                world.grow_plates_once();
            }
        }
    }
}
