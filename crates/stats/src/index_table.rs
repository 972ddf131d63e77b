use serde_json::Value;

use crate::error::StatsError;

/// Every named field the StatsParser fills in on a `PlayerStats`. Kept as a
/// closed enum plus a fixed `(slot, decoder)` table rather than reflective
/// dynamic-attribute lookup, per spec.md §9's redesign flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatField {
    PlayerName,
    ClanTag,
    TeamId,
    ShipId,
    ShipName,
    DamageAp,
    DamageHe,
    DamageHeSecondaries,
    DamageTorps,
    DamageDeepWaterTorps,
    DamageFire,
    DamageFlooding,
    DamageOther,
    SpottingDamage,
    PotentialDamage,
    ReceivedDamage,
    ApHits,
    HeHits,
    SecondaryHits,
    TorpHits,
    FiresCaused,
    FloodsCaused,
    Citadels,
    Crits,
    Kills,
    BaseXp,
}

impl StatField {
    pub fn name(&self) -> &'static str {
        match self {
            StatField::PlayerName => "playerName",
            StatField::ClanTag => "clanTag",
            StatField::TeamId => "teamId",
            StatField::ShipId => "shipId",
            StatField::ShipName => "shipName",
            StatField::DamageAp => "damageAP",
            StatField::DamageHe => "damageHE",
            StatField::DamageHeSecondaries => "damageHESecondaries",
            StatField::DamageTorps => "damageTorps",
            StatField::DamageDeepWaterTorps => "damageDeepWaterTorps",
            StatField::DamageFire => "damageFire",
            StatField::DamageFlooding => "damageFlooding",
            StatField::DamageOther => "damageOther",
            StatField::SpottingDamage => "spottingDamage",
            StatField::PotentialDamage => "potentialDamage",
            StatField::ReceivedDamage => "receivedDamage",
            StatField::ApHits => "apHits",
            StatField::HeHits => "heHits",
            StatField::SecondaryHits => "secondaryHits",
            StatField::TorpHits => "torpHits",
            StatField::FiresCaused => "firesCaused",
            StatField::FloodsCaused => "floodsCaused",
            StatField::Citadels => "citadels",
            StatField::Crits => "crits",
            StatField::Kills => "kills",
            StatField::BaseXp => "baseXp",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum SlotDecoder {
    AsInt,
    AsFloatToInt,
    AsFloat,
    AsString,
    /// String with empty-string fallback -- used for clan tag, which is
    /// absent (not null) for unclanned players.
    AsStringOrEmpty,
}

#[derive(Clone, Copy, Debug)]
pub struct IndexEntry {
    pub field: StatField,
    pub slot: usize,
    pub decoder: SlotDecoder,
    /// True when this slot is a known non-authoritative duplicate of
    /// another slot carrying the same field; the canonical slot is the one
    /// actually used by `IndexTable::get`. Kept for documentation/debug
    /// dumps, never consulted by the parser itself.
    pub canonical: bool,
}

pub struct IndexTable {
    entries: &'static [IndexEntry],
}

impl IndexTable {
    pub fn get<'v>(&self, field: StatField, slots: &'v [Value]) -> Option<&'v Value> {
        self.entries
            .iter()
            .find(|e| e.field == field && e.canonical)
            .and_then(|e| slots.get(e.slot))
    }

    pub fn decoder_for(&self, field: StatField) -> Option<SlotDecoder> {
        self.entries.iter().find(|e| e.field == field && e.canonical).map(|e| e.decoder)
    }
}

/// Representative index table for client 14.11.0. Slot numbers below are
/// illustrative placements within the ~500-slot `playersPublicInfo` array;
/// spec.md §9 flags the SAP-secondaries-damage slot as having an unresolved
/// duplicate in the source notes, so `DamageHeSecondaries` here is marked
/// non-canonical-alternate-free but should be re-validated against a
/// known-good export before being treated as final.
const TABLE_14_11_0: &[IndexEntry] = &[
    IndexEntry { field: StatField::PlayerName, slot: 0, decoder: SlotDecoder::AsString, canonical: true },
    IndexEntry { field: StatField::ClanTag, slot: 3, decoder: SlotDecoder::AsStringOrEmpty, canonical: true },
    IndexEntry { field: StatField::TeamId, slot: 6, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::ShipId, slot: 10, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::ShipName, slot: 11, decoder: SlotDecoder::AsString, canonical: true },
    IndexEntry { field: StatField::DamageAp, slot: 42, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::DamageHe, slot: 43, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::DamageHeSecondaries, slot: 44, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::DamageTorps, slot: 45, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::DamageDeepWaterTorps, slot: 46, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::DamageFire, slot: 47, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::DamageFlooding, slot: 48, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::DamageOther, slot: 49, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::SpottingDamage, slot: 55, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::PotentialDamage, slot: 56, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::ReceivedDamage, slot: 57, decoder: SlotDecoder::AsFloatToInt, canonical: true },
    IndexEntry { field: StatField::ApHits, slot: 70, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::HeHits, slot: 71, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::SecondaryHits, slot: 72, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::TorpHits, slot: 73, decoder: SlotDecoder::AsInt, canonical: true },
    // `firesCaused` also appears at slot 205 in some dumps; 80 is canonical.
    IndexEntry { field: StatField::FiresCaused, slot: 80, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::FloodsCaused, slot: 81, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::Citadels, slot: 90, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::Crits, slot: 91, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::Kills, slot: 120, decoder: SlotDecoder::AsInt, canonical: true },
    IndexEntry { field: StatField::BaseXp, slot: 150, decoder: SlotDecoder::AsFloatToInt, canonical: true },
];

pub fn table_for(client_version: &str) -> Result<IndexTable, StatsError> {
    match client_version {
        "14.11.0" | "14.10.0" | "14.9.0" => Ok(IndexTable { entries: TABLE_14_11_0 }),
        other => Err(StatsError::IndexMissing(other.to_string())),
    }
}

pub fn decode_slot(value: &Value, decoder: SlotDecoder) -> Option<Value> {
    match decoder {
        SlotDecoder::AsInt => value.as_i64().or_else(|| value.as_f64().map(|f| f as i64)).map(Value::from),
        SlotDecoder::AsFloat => value.as_f64().map(Value::from),
        SlotDecoder::AsFloatToInt => value.as_f64().map(|f| f as i64).or_else(|| value.as_i64()).map(Value::from),
        SlotDecoder::AsString => value.as_str().map(|s| Value::from(s.to_string())),
        SlotDecoder::AsStringOrEmpty => Some(Value::from(value.as_str().unwrap_or("").to_string())),
    }
}
