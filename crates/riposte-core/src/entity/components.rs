//! Attribute blocks shared by every combatant.
//!
//! These are the inputs the formulas read: primary stats, combat skills,
//! career traits (tolerances, proficiencies, enemy affinities) and the
//! small biography adjustments a protagonist picks at creation.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ============================================================================
// Stats
// ============================================================================

/// Primary attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    /// Strength.
    Strength,
    /// Intelligence.
    Intelligence,
    /// Willpower.
    Willpower,
    /// Agility.
    Agility,
    /// Endurance.
    Endurance,
    /// Personality.
    Personality,
    /// Speed.
    Speed,
    /// Luck.
    Luck,
}

/// Primary attributes. 50 is the neutral baseline every formula measures
/// deviation from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Strength.
    pub strength: i32,
    /// Intelligence.
    pub intelligence: i32,
    /// Willpower.
    pub willpower: i32,
    /// Agility.
    pub agility: i32,
    /// Endurance.
    pub endurance: i32,
    /// Personality.
    pub personality: i32,
    /// Speed.
    pub speed: i32,
    /// Luck.
    pub luck: i32,
}

impl Stats {
    /// All attributes set to `value`.
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self {
            strength: value,
            intelligence: value,
            willpower: value,
            agility: value,
            endurance: value,
            personality: value,
            speed: value,
            luck: value,
        }
    }

    /// Reads one attribute.
    #[must_use]
    pub const fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Intelligence => self.intelligence,
            Stat::Willpower => self.willpower,
            Stat::Agility => self.agility,
            Stat::Endurance => self.endurance,
            Stat::Personality => self.personality,
            Stat::Speed => self.speed,
            Stat::Luck => self.luck,
        }
    }

    /// Writes one attribute.
    pub fn set(&mut self, stat: Stat, value: i32) {
        let slot = match stat {
            Stat::Strength => &mut self.strength,
            Stat::Intelligence => &mut self.intelligence,
            Stat::Willpower => &mut self.willpower,
            Stat::Agility => &mut self.agility,
            Stat::Endurance => &mut self.endurance,
            Stat::Personality => &mut self.personality,
            Stat::Speed => &mut self.speed,
            Stat::Luck => &mut self.luck,
        };
        *slot = value;
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::uniform(50)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// Combat skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    /// Unarmed fighting.
    HandToHand,
    /// Daggers and short swords.
    ShortBlade,
    /// Swords.
    LongBlade,
    /// Axes.
    Axe,
    /// Maces, hammers, flails, staves.
    BluntWeapon,
    /// Bows.
    Archery,
    /// Critical strike chance and strength.
    CriticalStrike,
    /// Avoiding blows.
    Dodging,
    /// Attacks against an exposed back.
    Backstabbing,
}

impl Skill {
    /// Number of skills.
    pub const COUNT: usize = 9;

    /// Array index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Combat skill levels, 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Skills {
    values: [i32; Skill::COUNT],
}

impl Skills {
    /// All skills at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [0; Skill::COUNT],
        }
    }

    /// All skills at `value`.
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self {
            values: [value; Skill::COUNT],
        }
    }

    /// Reads one skill.
    #[must_use]
    pub const fn get(&self, skill: Skill) -> i32 {
        self.values[skill.index()]
    }

    /// Writes one skill.
    pub fn set(&mut self, skill: Skill, value: i32) {
        self.values[skill.index()] = value;
    }

    /// Builder form of [`Skills::set`].
    #[must_use]
    pub fn with(mut self, skill: Skill, value: i32) -> Self {
        self.set(skill, value);
        self
    }
}

// ============================================================================
// Career
// ============================================================================

bitflags! {
    /// How a career tolerates one category of effect.
    ///
    /// An empty set is normal tolerance.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ToleranceFlags: u8 {
        /// +50 to saving throws.
        const IMMUNE            = 1 << 0;
        /// +25 to saving throws.
        const RESISTANT         = 1 << 1;
        /// -25 to saving throws.
        const LOW_TOLERANCE     = 1 << 2;
        /// -50 to saving throws.
        const CRITICAL_WEAKNESS = 1 << 3;
    }
}

bitflags! {
    /// Effect categories a saving throw is made against.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EffectFlags: u8 {
        /// Paralysis.
        const PARALYSIS = 1 << 0;
        /// Generic magic.
        const MAGIC     = 1 << 1;
        /// Poison.
        const POISON    = 1 << 2;
        /// Fire.
        const FIRE      = 1 << 3;
        /// Frost.
        const FROST     = 1 << 4;
        /// Shock.
        const SHOCK     = 1 << 5;
        /// Disease.
        const DISEASE   = 1 << 6;
    }
}

bitflags! {
    /// Weapon families a career is expert in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ProficiencyFlags: u8 {
        /// Short blades.
        const SHORT_BLADES    = 1 << 0;
        /// Long blades.
        const LONG_BLADES     = 1 << 1;
        /// Unarmed.
        const HAND_TO_HAND    = 1 << 2;
        /// Axes.
        const AXES            = 1 << 3;
        /// Blunt weapons.
        const BLUNT_WEAPONS   = 1 << 4;
        /// Bows.
        const MISSILE_WEAPONS = 1 << 5;
    }
}

bitflags! {
    /// Affinity toward an enemy group.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AttackModifier: u8 {
        /// Fights this group with extra confidence.
        const BONUS  = 1 << 0;
        /// Fights this group with dread.
        const PHOBIA = 1 << 1;
    }
}

/// Broad classification of a combat target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyGroup {
    /// Nothing special.
    None,
    /// Undead.
    Undead,
    /// Daedra.
    Daedra,
    /// Humanoids, including the protagonist.
    Humanoid,
    /// Animals.
    Animals,
}

/// Per-effect tolerance flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tolerances {
    /// Paralysis.
    pub paralysis: ToleranceFlags,
    /// Magic.
    pub magic: ToleranceFlags,
    /// Poison.
    pub poison: ToleranceFlags,
    /// Fire.
    pub fire: ToleranceFlags,
    /// Frost.
    pub frost: ToleranceFlags,
    /// Shock.
    pub shock: ToleranceFlags,
    /// Disease.
    pub disease: ToleranceFlags,
}

impl Tolerances {
    /// Union of the tolerance flags of every effect in `effects`.
    #[must_use]
    pub fn combined(&self, effects: EffectFlags) -> ToleranceFlags {
        let pairs = [
            (EffectFlags::PARALYSIS, self.paralysis),
            (EffectFlags::MAGIC, self.magic),
            (EffectFlags::POISON, self.poison),
            (EffectFlags::FIRE, self.fire),
            (EffectFlags::FROST, self.frost),
            (EffectFlags::SHOCK, self.shock),
            (EffectFlags::DISEASE, self.disease),
        ];
        pairs
            .into_iter()
            .filter(|(flag, _)| effects.contains(*flag))
            .fold(ToleranceFlags::empty(), |acc, (_, tol)| acc | tol)
    }
}

/// Enemy affinities of a career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnemyAffinities {
    /// Against undead.
    pub undead: AttackModifier,
    /// Against daedra.
    pub daedra: AttackModifier,
    /// Against humanoids.
    pub humanoid: AttackModifier,
    /// Against animals.
    pub animals: AttackModifier,
}

/// Career (class) traits relevant to combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Career {
    /// Effect tolerances.
    pub tolerances: Tolerances,
    /// Weapon families the career is expert in.
    pub expert_proficiencies: ProficiencyFlags,
    /// Enemy affinities.
    pub affinities: EnemyAffinities,
    /// Fights harder when near death.
    pub adrenaline_rush: bool,
    /// Stronger adrenaline rush.
    pub improved_adrenaline_rush: bool,
}

impl Career {
    /// Affinity toward `group`.
    #[must_use]
    pub const fn attack_modifier(&self, group: EnemyGroup) -> AttackModifier {
        match group {
            EnemyGroup::Undead => self.affinities.undead,
            EnemyGroup::Daedra => self.affinities.daedra,
            EnemyGroup::Humanoid => self.affinities.humanoid,
            EnemyGroup::Animals => self.affinities.animals,
            EnemyGroup::None => AttackModifier::empty(),
        }
    }

    /// Returns `true` if the career is expert with `proficiency`.
    #[must_use]
    pub const fn is_expert(&self, proficiency: ProficiencyFlags) -> bool {
        self.expert_proficiencies.contains(proficiency)
    }
}

// ============================================================================
// Biography
// ============================================================================

/// Flat adjustments chosen during protagonist creation.
///
/// Non-protagonists keep the zero default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Biography {
    /// Added to the protagonist's hit chance.
    pub to_hit: i32,
    /// Subtracted from enemies' hit chance against the protagonist.
    pub avoid_hit: i32,
    /// Added to magic saving throws.
    pub resist_magic: i32,
    /// Added to poison saving throws.
    pub resist_poison: i32,
    /// Added to disease saving throws.
    pub resist_disease: i32,
}

// ============================================================================
// Vital
// ============================================================================

/// A current/max resource such as health or fatigue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vital {
    /// Current value.
    pub current: i32,
    /// Maximum value.
    pub max: i32,
}

impl Vital {
    /// Full resource.
    #[must_use]
    pub const fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Adds `delta`, clamping into `0..=max`.
    pub fn adjust(&mut self, delta: i32) {
        self.current = (self.current + delta).clamp(0, self.max.max(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_default_to_baseline() {
        let stats = Stats::default();
        assert_eq!(stats.get(Stat::Luck), 50);
        assert_eq!(stats.get(Stat::Strength), 50);
    }

    #[test]
    fn stats_set_get() {
        let mut stats = Stats::default();
        stats.set(Stat::Agility, 77);
        assert_eq!(stats.agility, 77);
        assert_eq!(stats.get(Stat::Agility), 77);
    }

    #[test]
    fn skills_builder() {
        let skills = Skills::new()
            .with(Skill::Dodging, 40)
            .with(Skill::CriticalStrike, 15);
        assert_eq!(skills.get(Skill::Dodging), 40);
        assert_eq!(skills.get(Skill::CriticalStrike), 15);
        assert_eq!(skills.get(Skill::Archery), 0);
    }

    #[test]
    fn tolerances_combine_selected_effects() {
        let tolerances = Tolerances {
            paralysis: ToleranceFlags::IMMUNE,
            fire: ToleranceFlags::CRITICAL_WEAKNESS,
            ..Tolerances::default()
        };
        let combined = tolerances.combined(EffectFlags::PARALYSIS | EffectFlags::MAGIC);
        assert_eq!(combined, ToleranceFlags::IMMUNE);

        let combined = tolerances.combined(EffectFlags::FIRE | EffectFlags::PARALYSIS);
        assert!(combined.contains(ToleranceFlags::IMMUNE));
        assert!(combined.contains(ToleranceFlags::CRITICAL_WEAKNESS));
    }

    #[test]
    fn attack_modifier_lookup() {
        let career = Career {
            affinities: EnemyAffinities {
                undead: AttackModifier::BONUS,
                daedra: AttackModifier::PHOBIA,
                ..EnemyAffinities::default()
            },
            ..Career::default()
        };
        assert_eq!(career.attack_modifier(EnemyGroup::Undead), AttackModifier::BONUS);
        assert_eq!(career.attack_modifier(EnemyGroup::Daedra), AttackModifier::PHOBIA);
        assert!(career.attack_modifier(EnemyGroup::None).is_empty());
    }

    #[test]
    fn vital_adjust_clamps() {
        let mut health = Vital::full(40);
        health.adjust(-100);
        assert_eq!(health.current, 0);
        health.adjust(500);
        assert_eq!(health.current, 40);
    }

    #[test]
    fn career_serializes() {
        let career = Career {
            expert_proficiencies: ProficiencyFlags::AXES | ProficiencyFlags::SHORT_BLADES,
            ..Career::default()
        };
        let json = serde_json::to_string(&career).unwrap();
        let back: Career = serde_json::from_str(&json).unwrap();
        assert_eq!(back, career);
    }
}
