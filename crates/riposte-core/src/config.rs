//! Tuning knobs for the built-in formulas.
//!
//! Every constant a designer might want to rebalance without writing a
//! formula override lives here. The defaults reproduce the stock rules.
//! Hosts usually ship a JSON file and load it with
//! [`CombatConfig::from_json_str`], which validates every clamp range.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============================================================================
// Bounds
// ============================================================================

/// Inclusive clamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound.
    pub min: i32,
    /// Upper bound.
    pub max: i32,
}

impl Bounds {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Clamps `value` into the range.
    ///
    /// # Example
    ///
    /// ```
    /// use riposte_core::config::Bounds;
    ///
    /// let b = Bounds::new(3, 97);
    /// assert_eq!(b.clamp(-20), 3);
    /// assert_eq!(b.clamp(150), 97);
    /// assert_eq!(b.clamp(50), 50);
    /// ```
    #[must_use]
    pub const fn clamp(self, value: i32) -> i32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    fn validate(self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidBounds {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Hit-chance constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitConfig {
    /// Final clamp applied to the accumulated hit chance.
    pub chance: Bounds,
    /// Armor term used against the protagonist and humanoid targets.
    pub humanoid_armor_to_hit: i32,
    /// Adrenaline triggers when health is below `max / health_divisor`.
    pub adrenaline_health_divisor: i32,
    /// Adrenaline bonus (and defensive penalty) for a plain rush.
    pub adrenaline_bonus: i32,
    /// Adrenaline bonus for the improved rush.
    pub improved_adrenaline_bonus: i32,
    /// Divisor applied to a protagonist defender's dodge skill.
    pub protagonist_dodge_divisor: i32,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            chance: Bounds::new(3, 97),
            humanoid_armor_to_hit: 45,
            adrenaline_health_divisor: 8,
            adrenaline_bonus: 5,
            improved_adrenaline_bonus: 8,
            protagonist_dodge_divisor: 4,
        }
    }
}

/// Critical-strike constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalConfig {
    /// Skill divisor for the protagonist.
    pub protagonist_divisor: i32,
    /// Skill divisor for everyone else.
    pub other_divisor: i32,
    /// Width of one luck band above or below 50.
    pub luck_band: i32,
    /// Maximum number of luck bands applied to the divisor.
    pub max_luck_bands: i32,
}

impl Default for CriticalConfig {
    fn default() -> Self {
        Self {
            protagonist_divisor: 4,
            other_divisor: 5,
            luck_band: 25,
            max_luck_bands: 2,
        }
    }
}

/// Shield-block constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Clamp for blocks against regions the shield covers.
    pub hard: Bounds,
    /// Clamp for blocks against regions the shield does not cover.
    pub soft: Bounds,
    /// Shields lighter than this (kg) are light.
    pub light_shield_kg: f32,
    /// Shields at or above this (kg) are heavy.
    pub heavy_shield_kg: f32,
    /// Hard-block shift for weight class (light subtracts, heavy adds).
    pub weight_class_shift: i32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            hard: Bounds::new(7, 95),
            soft: Bounds::new(0, 50),
            light_shield_kg: 3.0,
            heavy_shield_kg: 7.0,
            weight_class_shift: 5,
        }
    }
}

/// Saving-throw constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingThrowConfig {
    /// Starting threshold.
    pub base: i32,
    /// Clamp applied after the willpower term.
    pub threshold: Bounds,
    /// Rolls within this many points under the threshold are prorated.
    pub prorate_window: i32,
    /// Racial bonus (Nord frost, Breton magic).
    pub racial_bonus: i32,
}

impl Default for SavingThrowConfig {
    fn default() -> Self {
        Self {
            base: 50,
            threshold: Bounds::new(5, 95),
            prorate_window: 20,
            racial_bonus: 30,
        }
    }
}

/// Equipment-wear constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WearConfig {
    /// Percentage thresholds that raise a warning when crossed downward.
    pub warn_thresholds: [i32; 2],
    /// A single-hit drop of at least this many percentage points warns.
    pub heavy_drop: i32,
    /// Armor wear multiplier when the hit was unarmed.
    pub unarmed_armor_factor: f32,
    /// Chance that a weapon wear rounding to zero still loses one point.
    pub weapon_wear_floor_chance: i32,
    /// Fixed wear for ranged weapons.
    pub ranged_weapon_wear: i32,
    /// Weapon wear multiplier when the struck armor was metal.
    pub metal_armor_weapon_factor: f32,
    /// Fraction of magical damage converted into armor wear.
    pub magical_wear_fraction: f32,
}

impl Default for WearConfig {
    fn default() -> Self {
        Self {
            warn_thresholds: [48, 15],
            heavy_drop: 15,
            unarmed_armor_factor: 0.5,
            weapon_wear_floor_chance: 40,
            ranged_weapon_wear: 1,
            metal_armor_weapon_factor: 1.5,
            magical_wear_fraction: 0.25,
        }
    }
}

/// Collateral-effect constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialConfig {
    /// Chance (percent, fractional) of lycanthropy or vampirism.
    pub infection_chance: f32,
    /// Level-one protagonists never catch diseases.
    pub spare_level_one: bool,
    /// A critical limb hit cripples when `damage * divisor >= max health`.
    pub crippling_health_divisor: i32,
}

impl Default for SpecialConfig {
    fn default() -> Self {
        Self {
            infection_chance: 0.6,
            spare_level_one: true,
            crippling_health_divisor: 4,
        }
    }
}

// ============================================================================
// CombatConfig
// ============================================================================

/// Complete tuning for a [`CombatPipeline`](crate::pipeline::CombatPipeline).
///
/// # Example
///
/// ```
/// use riposte_core::CombatConfig;
///
/// let config = CombatConfig::from_json_str(r#"{ "hit": { "chance": { "min": 5, "max": 95 } } }"#)
///     .unwrap();
/// assert_eq!(config.hit.chance.min, 5);
/// // Unspecified sections keep their defaults.
/// assert_eq!(config.block.hard.max, 95);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Hit chance.
    pub hit: HitConfig,
    /// Critical strikes.
    pub critical: CriticalConfig,
    /// Shield blocks.
    pub block: BlockConfig,
    /// Saving throws.
    pub saving_throw: SavingThrowConfig,
    /// Equipment wear.
    pub wear: WearConfig,
    /// Collateral effects.
    pub special: SpecialConfig,
}

impl CombatConfig {
    /// Parses and validates a JSON document.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the validation
    /// errors listed on [`CombatConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every clamp range and divisor.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidBounds`] when a range is inverted
    /// - [`ConfigError::InvalidValue`] when a divisor is not positive or a
    ///   fraction is outside `0.0..=1.0`
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hit.chance.validate("hit.chance")?;
        self.block.hard.validate("block.hard")?;
        self.block.soft.validate("block.soft")?;
        self.saving_throw.threshold.validate("saving_throw.threshold")?;

        positive("hit.adrenaline_health_divisor", self.hit.adrenaline_health_divisor)?;
        positive("hit.protagonist_dodge_divisor", self.hit.protagonist_dodge_divisor)?;
        positive("critical.protagonist_divisor", self.critical.protagonist_divisor)?;
        positive("critical.other_divisor", self.critical.other_divisor)?;
        positive("critical.luck_band", self.critical.luck_band)?;
        positive(
            "special.crippling_health_divisor",
            self.special.crippling_health_divisor,
        )?;

        if !(0.0..=1.0).contains(&self.wear.magical_wear_fraction) {
            return Err(ConfigError::InvalidValue {
                field: "wear.magical_wear_fraction",
                reason: format!("{} is outside 0.0..=1.0", self.wear.magical_wear_fraction),
            });
        }
        if self.block.light_shield_kg > self.block.heavy_shield_kg {
            return Err(ConfigError::InvalidValue {
                field: "block.light_shield_kg",
                reason: "light threshold exceeds heavy threshold".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: i32) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} must be positive"),
        });
    }
    Ok(())
}
