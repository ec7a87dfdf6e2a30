//! Frontend Models
//!
//! The fixed five-item checklist and the record pairing it with a scanned code.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One checklist item. The set is closed and its order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Mass,
    Communion,
    Confession,
    Instruments,
    Prayer,
}

impl Flag {
    /// All flags in display/export order.
    pub const ALL: [Flag; 5] = [
        Flag::Mass,
        Flag::Communion,
        Flag::Confession,
        Flag::Instruments,
        Flag::Prayer,
    ];

    /// Key used in the persisted JSON object and the export header.
    pub fn key(&self) -> &'static str {
        match self {
            Flag::Mass => "قداس",
            Flag::Communion => "تناول",
            Flag::Confession => "اعتراف",
            Flag::Instruments => "ادوات",
            Flag::Prayer => "صلاة",
        }
    }

    /// Checkbox label shown on the scanner page.
    pub fn label(&self) -> &'static str {
        match self {
            Flag::Mass => "القداس",
            Flag::Communion => "التناول",
            Flag::Confession => "اعتراف",
            Flag::Instruments => "الادوات",
            Flag::Prayer => "الصلاة",
        }
    }

    /// DOM id for the flag's checkbox
    pub fn input_id(&self) -> &'static str {
        match self {
            Flag::Mass => "flag-mass",
            Flag::Communion => "flag-communion",
            Flag::Confession => "flag-confession",
            Flag::Instruments => "flag-instruments",
            Flag::Prayer => "flag-prayer",
        }
    }
}

/// Completion state of the five items for one scanned code.
///
/// Serialized as an object with exactly the five flag keys; anything else
/// fails to deserialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Checklist {
    #[serde(rename = "قداس")]
    pub mass: bool,
    #[serde(rename = "تناول")]
    pub communion: bool,
    #[serde(rename = "اعتراف")]
    pub confession: bool,
    #[serde(rename = "ادوات")]
    pub instruments: bool,
    #[serde(rename = "صلاة")]
    pub prayer: bool,
}

impl Checklist {
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Mass => self.mass,
            Flag::Communion => self.communion,
            Flag::Confession => self.confession,
            Flag::Instruments => self.instruments,
            Flag::Prayer => self.prayer,
        }
    }

    pub fn set(&mut self, flag: Flag, checked: bool) {
        let slot = match flag {
            Flag::Mass => &mut self.mass,
            Flag::Communion => &mut self.communion,
            Flag::Confession => &mut self.confession,
            Flag::Instruments => &mut self.instruments,
            Flag::Prayer => &mut self.prayer,
        };
        *slot = checked;
    }

    /// Builder-style [`Checklist::set`]
    pub fn with(mut self, flag: Flag, checked: bool) -> Self {
        self.set(flag, checked);
        self
    }

    /// `(flag, checked)` pairs in [`Flag::ALL`] order.
    pub fn entries(&self) -> impl Iterator<Item = (Flag, bool)> + '_ {
        Flag::ALL.into_iter().map(move |flag| (flag, self.get(flag)))
    }
}

// Going through a JSON map keeps arrays and other non-objects out; the
// derived struct visitor would also accept a sequence of five booleans.
impl TryFrom<Map<String, Value>> for Checklist {
    type Error = String;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        if let Some(unknown) = object
            .keys()
            .find(|key| !Flag::ALL.iter().any(|flag| flag.key() == key.as_str()))
        {
            return Err(format!("unknown field `{}`", unknown));
        }

        let mut checklist = Checklist::default();
        for flag in Flag::ALL {
            match object.get(flag.key()) {
                Some(Value::Bool(checked)) => checklist.set(flag, *checked),
                Some(other) => {
                    return Err(format!("field `{}` is not a boolean: {}", flag.key(), other))
                }
                None => return Err(format!("missing field `{}`", flag.key())),
            }
        }
        Ok(checklist)
    }
}

/// A scanned code and its checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub code: String,
    pub checklist: Checklist,
}

impl Record {
    pub fn new(code: impl Into<String>, checklist: Checklist) -> Self {
        Self {
            code: code.into(),
            checklist,
        }
    }
}
