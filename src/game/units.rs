//! Unit types and the per-game unit catalog.
//!
//! The game host sends a configuration object once, before the first turn.
//! Its `unitInformation` array is positional: the index of an entry is the
//! unit's class id, which is also how frames refer to units. The catalog
//! resolves that array once into shorthands and costs and is then read-only
//! for the rest of the game.

use serde::Deserialize;

use crate::error::FrameError;

/// Number of unit classes that take part in play (walls through interceptors).
pub const PLAYABLE_UNIT_COUNT: usize = 6;

/// Class id the host uses for upgrade markers in unit lists.
pub(crate) const UPGRADE_CLASS_ID: u8 = 7;

/// Shorthand used for upgrade requests when the configuration omits it.
const DEFAULT_UPGRADE_SHORTHAND: &str = "UP";

/// A unit class, in host class-id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum UnitType {
    /// Cheap blocking structure.
    Wall = 0,
    /// Structure that shields friendly mobile units.
    Support = 1,
    /// Damage-dealing structure.
    Turret = 2,
    /// Cheap, fast offensive mobile unit.
    Scout = 3,
    /// Costly, long-range offensive mobile unit.
    Demolisher = 4,
    /// Mobile unit that hunts enemy mobile units.
    Interceptor = 5,
}

impl UnitType {
    /// All unit types, in class-id order.
    pub const ALL: [UnitType; PLAYABLE_UNIT_COUNT] = [
        UnitType::Wall,
        UnitType::Support,
        UnitType::Turret,
        UnitType::Scout,
        UnitType::Demolisher,
        UnitType::Interceptor,
    ];

    /// Look up a unit type from a host class id.
    #[must_use]
    pub fn from_class_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Host class id of this unit type.
    #[must_use]
    pub const fn class_id(self) -> u8 {
        self as u8
    }

    /// Whether this is a stationary structure.
    #[must_use]
    pub const fn is_structure(self) -> bool {
        matches!(self, UnitType::Wall | UnitType::Support | UnitType::Turret)
    }

    /// Whether this is one of the two offensive mobile classes.
    #[must_use]
    pub const fn is_offensive_mobile(self) -> bool {
        matches!(self, UnitType::Scout | UnitType::Demolisher)
    }
}

/// Which resource a cost or ledger entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Spent on stationary structures.
    Structure,
    /// Spent on mobile units.
    Unit,
}

/// Cost of a unit in both resources.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cost {
    /// Structure-resource component.
    pub structure: f64,
    /// Unit-resource component.
    pub unit: f64,
}

impl Cost {
    /// The component for one resource.
    #[must_use]
    pub const fn of(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Structure => self.structure,
            Resource::Unit => self.unit,
        }
    }
}

/// Everything the strategy needs to know about one unit class.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInfo {
    /// Two-letter identifier used in submissions.
    pub shorthand: String,
    /// Cost to place the unit.
    pub cost: Cost,
    /// Cost to upgrade the unit in place.
    pub upgrade_cost: Cost,
}

/// Immutable unit catalog resolved from the start-of-game configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCatalog {
    units: Vec<UnitInfo>,
    upgrade_shorthand: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "unitInformation")]
    unit_information: Vec<RawUnit>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUnit {
    shorthand: Option<String>,
    cost: Option<f64>,
    cost1: Option<f64>,
    cost2: Option<f64>,
    upgrade: Option<RawUpgrade>,
}

#[derive(Debug, Deserialize)]
struct RawUpgrade {
    cost1: Option<f64>,
    cost2: Option<f64>,
}

impl UnitCatalog {
    /// Build a catalog from the host's configuration JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, fewer than six unit
    /// classes are described, or a playable class has no shorthand.
    pub fn from_config_json(json: &str) -> Result<Self, FrameError> {
        let raw: RawConfig =
            serde_json::from_str(json).map_err(|e| FrameError::Json(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Build a catalog from an already-parsed configuration value.
    ///
    /// # Errors
    ///
    /// Same as [`UnitCatalog::from_config_json`].
    pub fn from_config_value(value: &serde_json::Value) -> Result<Self, FrameError> {
        let raw = RawConfig::deserialize(value).map_err(|e| FrameError::Json(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, FrameError> {
        if raw.unit_information.len() < PLAYABLE_UNIT_COUNT {
            return Err(FrameError::MissingField("unitInformation"));
        }

        let mut units = Vec::with_capacity(PLAYABLE_UNIT_COUNT);
        for (unit_type, entry) in UnitType::ALL.iter().zip(&raw.unit_information) {
            let shorthand = entry
                .shorthand
                .clone()
                .ok_or(FrameError::MissingField("unitInformation.shorthand"))?;
            let cost = resolve_cost(*unit_type, entry);
            let upgrade_cost = entry.upgrade.as_ref().map_or(cost, |up| Cost {
                structure: up.cost1.unwrap_or(cost.structure),
                unit: up.cost2.unwrap_or(cost.unit),
            });
            units.push(UnitInfo {
                shorthand,
                cost,
                upgrade_cost,
            });
        }

        let upgrade_shorthand = raw
            .unit_information
            .get(usize::from(UPGRADE_CLASS_ID))
            .and_then(|entry| entry.shorthand.clone())
            .unwrap_or_else(|| DEFAULT_UPGRADE_SHORTHAND.to_string());

        Ok(Self {
            units,
            upgrade_shorthand,
        })
    }

    /// Build a catalog directly from per-class info, in class-id order.
    ///
    /// Used by tests and tools that do not have a host configuration.
    #[must_use]
    pub fn new(units: [UnitInfo; PLAYABLE_UNIT_COUNT], upgrade_shorthand: &str) -> Self {
        Self {
            units: units.into(),
            upgrade_shorthand: upgrade_shorthand.to_string(),
        }
    }

    /// Info for a unit type.
    #[must_use]
    pub fn info(&self, unit: UnitType) -> &UnitInfo {
        // The constructors guarantee one entry per playable class.
        &self.units[usize::from(unit.class_id())]
    }

    /// Placement cost of a unit type.
    #[must_use]
    pub fn cost(&self, unit: UnitType) -> Cost {
        self.info(unit).cost
    }

    /// Upgrade cost of a unit type.
    #[must_use]
    pub fn upgrade_cost(&self, unit: UnitType) -> Cost {
        self.info(unit).upgrade_cost
    }

    /// Submission shorthand of a unit type.
    #[must_use]
    pub fn shorthand(&self, unit: UnitType) -> &str {
        &self.info(unit).shorthand
    }

    /// Submission shorthand for upgrade requests.
    #[must_use]
    pub fn upgrade_shorthand(&self) -> &str {
        &self.upgrade_shorthand
    }
}

impl Default for UnitCatalog {
    /// The stock catalog of the current game season.
    fn default() -> Self {
        let entry = |shorthand: &str, structure: f64, unit: f64, upgrade: Cost| UnitInfo {
            shorthand: shorthand.to_string(),
            cost: Cost { structure, unit },
            upgrade_cost: upgrade,
        };
        Self::new(
            [
                entry("FF", 1.0, 0.0, Cost { structure: 1.0, unit: 0.0 }),
                entry("EF", 4.0, 0.0, Cost { structure: 4.0, unit: 0.0 }),
                entry("DF", 2.0, 0.0, Cost { structure: 4.0, unit: 0.0 }),
                entry("PI", 0.0, 1.0, Cost::default()),
                entry("EI", 0.0, 3.0, Cost::default()),
                entry("SI", 0.0, 1.0, Cost::default()),
            ],
            DEFAULT_UPGRADE_SHORTHAND,
        )
    }
}

/// Resolve an entry's placement cost, accepting the legacy single `cost` field.
fn resolve_cost(unit_type: UnitType, entry: &RawUnit) -> Cost {
    match (entry.cost1, entry.cost2, entry.cost) {
        (None, None, Some(legacy)) if unit_type.is_structure() => Cost {
            structure: legacy,
            unit: 0.0,
        },
        (None, None, Some(legacy)) => Cost {
            structure: 0.0,
            unit: legacy,
        },
        (structure, unit, _) => Cost {
            structure: structure.unwrap_or(0.0),
            unit: unit.unwrap_or(0.0),
        },
    }
}
