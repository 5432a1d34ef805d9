pub mod client;
pub mod wire;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned identifier. `0` marks a record that has not been persisted yet.
pub type RecordId = u32;

/// The fixed set of playing positions a player form offers, in display order.
pub const POSITIONS: [&str; 10] = [
    "Portero",
    "Defensa Central",
    "Lateral Derecho",
    "Lateral Izquierdo",
    "Pivote",
    "Mediocentro",
    "Mediapunta",
    "Extremo Derecho",
    "Extremo Izquierdo",
    "Delantero Centro",
];

// ---------------------------------------------------------------------------
// Domain records; field names mirror the backend JSON contract via serde
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "estadio")]
    pub stadium: String,
    #[serde(rename = "anioFundacion")]
    pub founding_year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "posicion")]
    pub position: String,
    #[serde(rename = "edad")]
    pub age: i32,
    #[serde(rename = "idEquipo")]
    pub team_id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub id: RecordId,
    #[serde(rename = "equipoLocalId")]
    pub home_team_id: RecordId,
    #[serde(rename = "equipoVisitanteId")]
    pub away_team_id: RecordId,
    #[serde(rename = "fecha", with = "wire::datetime")]
    pub date: NaiveDateTime,
    /// Free-text score such as "2-1"; absent until the match is played.
    #[serde(rename = "resultado", default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(rename = "estadio")]
    pub stadium: String,
}

// ---------------------------------------------------------------------------
// Kind tags and the type-erased record used on channels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Team,
    Player,
    Match,
}

impl EntityKind {
    /// Resource segment under `/api`.
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::Team => "Teams",
            EntityKind::Player => "Players",
            EntityKind::Match => "Matches",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Team => "team",
            EntityKind::Player => "player",
            EntityKind::Match => "match",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Team => "teams",
            EntityKind::Player => "players",
            EntityKind::Match => "matches",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Team(Team),
    Player(Player),
    Match(Match),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Team(_) => EntityKind::Team,
            Record::Player(_) => EntityKind::Player,
            Record::Match(_) => EntityKind::Match,
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            Record::Team(t) => t.id,
            Record::Player(p) => p.id,
            Record::Match(m) => m.id,
        }
    }
}

/// A record type served from its own collection endpoint.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> RecordId;

    fn into_record(self) -> Record;

    /// Returns `None` when the record belongs to a different collection.
    fn from_record(record: Record) -> Option<Self>;
}

impl Entity for Team {
    const KIND: EntityKind = EntityKind::Team;

    fn id(&self) -> RecordId {
        self.id
    }

    fn into_record(self) -> Record {
        Record::Team(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Team(t) => Some(t),
            _ => None,
        }
    }
}

impl Entity for Player {
    const KIND: EntityKind = EntityKind::Player;

    fn id(&self) -> RecordId {
        self.id
    }

    fn into_record(self) -> Record {
        Record::Player(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Player(p) => Some(p),
            _ => None,
        }
    }
}

impl Entity for Match {
    const KIND: EntityKind = EntityKind::Match;

    fn id(&self) -> RecordId {
        self.id
    }

    fn into_record(self) -> Record {
        Record::Match(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Match(m) => Some(m),
            _ => None,
        }
    }
}
