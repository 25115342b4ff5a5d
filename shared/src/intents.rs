//! Intents understood by the skill and the label fields each one reads.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Drug-information intents, each answered from the label record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrugIntent {
    Info,
    Usage,
    Manufacturer,
    SideEffects,
    ActiveIngredients,
    InactiveIngredients,
    Conflicts,
    Questions,
}

impl DrugIntent {
    pub const ALL: [DrugIntent; 8] = [
        DrugIntent::Info,
        DrugIntent::Usage,
        DrugIntent::Manufacturer,
        DrugIntent::SideEffects,
        DrugIntent::ActiveIngredients,
        DrugIntent::InactiveIngredients,
        DrugIntent::Conflicts,
        DrugIntent::Questions,
    ];

    /// Intent name as registered in the interaction model.
    pub fn name(self) -> &'static str {
        match self {
            DrugIntent::Info => "DrugInfoIntent",
            DrugIntent::Usage => "DrugUsageIntent",
            DrugIntent::Manufacturer => "DrugManufacturerIntent",
            DrugIntent::SideEffects => "DrugSideEffectsIntent",
            DrugIntent::ActiveIngredients => "DrugActiveIngredientsIntent",
            DrugIntent::InactiveIngredients => "DrugInactiveIngredientsIntent",
            DrugIntent::Conflicts => "DrugConflictsIntent",
            DrugIntent::Questions => "DrugQuestionsIntent",
        }
    }

    /// Label fields to read, in the order they are spoken.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            DrugIntent::Info => &["purpose", "indications_and_usage"],
            DrugIntent::Usage => &["dosage_and_administration"],
            DrugIntent::Manufacturer => &["manufacturer_name"],
            DrugIntent::SideEffects => &["stop_use", "warnings"],
            DrugIntent::ActiveIngredients => &["active_ingredient"],
            DrugIntent::InactiveIngredients => &["inactive_ingredient"],
            DrugIntent::Conflicts => &["do_not_use"],
            DrugIntent::Questions => &["questions"],
        }
    }
}

/// Every intent the router dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillIntent {
    Drug(DrugIntent),
    SetReminder,
    ThankYou,
    Help,
    Stop,
    Cancel,
}

impl SkillIntent {
    pub fn name(self) -> &'static str {
        match self {
            SkillIntent::Drug(intent) => intent.name(),
            SkillIntent::SetReminder => "SetReminderIntent",
            SkillIntent::ThankYou => "ThankYouIntent",
            SkillIntent::Help => "AMAZON.HelpIntent",
            SkillIntent::Stop => "AMAZON.StopIntent",
            SkillIntent::Cancel => "AMAZON.CancelIntent",
        }
    }
}

impl FromStr for SkillIntent {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if let Some(intent) = DrugIntent::ALL.into_iter().find(|i| i.name() == name) {
            return Ok(SkillIntent::Drug(intent));
        }

        match name {
            "SetReminderIntent" => Ok(SkillIntent::SetReminder),
            "ThankYouIntent" => Ok(SkillIntent::ThankYou),
            "AMAZON.HelpIntent" => Ok(SkillIntent::Help),
            "AMAZON.StopIntent" => Ok(SkillIntent::Stop),
            "AMAZON.CancelIntent" => Ok(SkillIntent::Cancel),
            _ => Err(Error::InvalidIntent(name.to_string())),
        }
    }
}

impl fmt::Display for SkillIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
