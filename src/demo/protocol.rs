//! Demo record wire types
//! These are the tags, enumerations and payloads carried by the record stream

use serde::Serialize;

/// Account platform of a joining player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Steam,
    Epic,
    Other(u8),
}

impl UserType {
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Self::Steam,
            2 => Self::Epic,
            other => Self::Other(other),
        }
    }

    /// Length in bytes of the unique id that follows the user type byte
    pub fn unique_id_len(self) -> usize {
        match self {
            Self::Steam => 17,
            _ => 18,
        }
    }
}

/// Player class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Perk {
    Berserker,
    Commando,
    Support,
    /// Buffs handed out by this class benefit teammates, not the medic
    FieldMedic,
    Demolitionist,
    Firebug,
    Gunslinger,
    Sharpshooter,
    Swat,
    Survivalist,
    Unknown(u8),
}

impl Perk {
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Self::Berserker,
            2 => Self::Commando,
            3 => Self::Support,
            4 => Self::FieldMedic,
            5 => Self::Demolitionist,
            6 => Self::Firebug,
            7 => Self::Gunslinger,
            8 => Self::Sharpshooter,
            9 => Self::Swat,
            10 => Self::Survivalist,
            other => Self::Unknown(other),
        }
    }
}

/// Scoring tier of a zed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZedTier {
    Trash,
    Medium,
    Large,
    Boss,
}

/// Enemy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZedType {
    Cyst,
    AlphaClot,
    Slasher,
    Rioter,
    Crawler,
    Gorefast,
    Gorefiend,
    Stalker,
    Bloat,
    Siren,
    Husk,
    EdarTrapper,
    EdarBlaster,
    EdarBomber,
    Scrake,
    Fleshpound,
    QuarterPound,
    Hans,
    Patriarch,
    KingFleshpound,
    Abomination,
    Matriarch,
    Unknown(u8),
}

impl ZedType {
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Self::Cyst,
            2 => Self::AlphaClot,
            3 => Self::Slasher,
            4 => Self::Rioter,
            5 => Self::Crawler,
            6 => Self::Gorefast,
            7 => Self::Gorefiend,
            8 => Self::Stalker,
            9 => Self::Bloat,
            10 => Self::Siren,
            11 => Self::Husk,
            12 => Self::EdarTrapper,
            13 => Self::EdarBlaster,
            14 => Self::EdarBomber,
            15 => Self::Scrake,
            16 => Self::Fleshpound,
            17 => Self::QuarterPound,
            18 => Self::Hans,
            19 => Self::Patriarch,
            20 => Self::KingFleshpound,
            21 => Self::Abomination,
            22 => Self::Matriarch,
            other => Self::Unknown(other),
        }
    }

    /// Tier used by the kill-mix and difficulty scoring.
    /// Unknown zeds count as kills but belong to no tier.
    pub fn tier(self) -> Option<ZedTier> {
        use ZedType::*;
        match self {
            Cyst | AlphaClot | Slasher | Rioter | Crawler | Gorefast | Gorefiend | Stalker => {
                Some(ZedTier::Trash)
            }
            Bloat | Siren | Husk | EdarTrapper | EdarBlaster | EdarBomber => Some(ZedTier::Medium),
            Scrake | Fleshpound | QuarterPound => Some(ZedTier::Large),
            Hans | Patriarch | KingFleshpound | Abomination | Matriarch => Some(ZedTier::Boss),
            Unknown(_) => None,
        }
    }
}

/// Event tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTag {
    PlayerJoin,
    PlayerDisconnect,
    PerkChange,
    PlayerDied,
    WaveStart,
    ZedsLeft,
    Kill,
    Buff,
    HealthChange,
    HuskRage,
    ZedtimeStart,
    ZedtimeExtend,
    ZedtimeEnd,
    Unknown(u8),
}

impl EventTag {
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Self::PlayerJoin,
            2 => Self::PlayerDisconnect,
            3 => Self::PerkChange,
            4 => Self::PlayerDied,
            5 => Self::WaveStart,
            6 => Self::ZedsLeft,
            7 => Self::Kill,
            8 => Self::Buff,
            9 => Self::HealthChange,
            10 => Self::HuskRage,
            11 => Self::ZedtimeStart,
            12 => Self::ZedtimeExtend,
            13 => Self::ZedtimeEnd,
            other => Self::Unknown(other),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::PlayerJoin => 1,
            Self::PlayerDisconnect => 2,
            Self::PerkChange => 3,
            Self::PlayerDied => 4,
            Self::WaveStart => 5,
            Self::ZedsLeft => 6,
            Self::Kill => 7,
            Self::Buff => 8,
            Self::HealthChange => 9,
            Self::HuskRage => 10,
            Self::ZedtimeStart => 11,
            Self::ZedtimeExtend => 12,
            Self::ZedtimeEnd => 13,
            Self::Unknown(b) => b,
        }
    }

    /// Payload size in bytes, trailing zero terminator included.
    ///
    /// Player joins are the only variable-size event; their size depends on
    /// the user type byte and is resolved by the decoder.
    pub fn fixed_payload_size(self) -> Option<usize> {
        match self {
            Self::PlayerJoin => None,
            Self::PlayerDisconnect => Some(2),
            Self::PerkChange => Some(3),
            Self::PlayerDied => Some(3),
            Self::WaveStart => Some(6),
            Self::ZedsLeft => Some(5),
            Self::Kill => Some(3),
            Self::Buff => Some(3),
            Self::HealthChange => Some(7),
            Self::HuskRage => Some(2),
            Self::ZedtimeStart | Self::ZedtimeExtend | Self::ZedtimeEnd => Some(1),
            // forward-compatible: unknown tags carry only the terminator
            Self::Unknown(_) => Some(1),
        }
    }
}

/// Player join payload size for a given user type
pub fn player_join_size(user_type: UserType) -> usize {
    // user_id + user_type + unique id + terminator
    2 + user_type.unique_id_len() + 1
}

/// Decoded, type-specific event body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    PlayerJoin {
        user_id: u8,
        user_type: UserType,
        unique_id: String,
    },
    PlayerDisconnect {
        user_id: u8,
    },
    PerkChange {
        user_id: u8,
        perk: Perk,
    },
    PlayerDied {
        user_id: u8,
        cause: ZedType,
    },
    WaveStart {
        wave: u8,
        zeds_left: i32,
    },
    ZedsLeft {
        zeds_left: i32,
    },
    Kill {
        user_id: u8,
        zed: ZedType,
    },
    Buff {
        user_id: u8,
        max_buffs: u8,
    },
    HealthChange {
        user_id: u8,
        health: u16,
        armor: u16,
        hit_by: ZedType,
    },
    HuskRage {
        user_id: u8,
    },
    ZedtimeStart,
    ZedtimeExtend,
    ZedtimeEnd,
    Unknown {
        tag: u8,
    },
}

/// One decoded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub tick: i32,
    pub payload: EventPayload,
}
