//! Serde support: ranks and values travel as their wire strings.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;

use crate::rank::Rank;
use crate::value::RankValue;

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return serializer.collect_str(self);
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Rank, D::Error> {
        return deserializer.deserialize_str(RankVisitor);
    }
}

struct RankVisitor;

impl de::Visitor<'_> for RankVisitor {
    type Value = Rank;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str("a rank string like \"0|iiiiii\"");
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Rank, E> {
        return Rank::parse(v).map_err(E::custom);
    }
}

impl Serialize for RankValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return serializer.collect_str(self);
    }
}

impl<'de> Deserialize<'de> for RankValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<RankValue, D::Error> {
        return deserializer.deserialize_str(ValueVisitor);
    }
}

struct ValueVisitor;

impl de::Visitor<'_> for ValueVisitor {
    type Value = RankValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str("a base36 rank value");
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RankValue, E> {
        return RankValue::parse(v).map_err(E::custom);
    }
}
