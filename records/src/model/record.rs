// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The `Record` data type and its building blocks.

use crate::model::{Id, null_as_empty, present};
use bazaar_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use derive_more::Constructor;
use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Name of a record.  Names are required and cannot be empty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordName(String);

impl RecordName {
    /// Creates a new name from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(ModelError("name: cannot be empty".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A deserialization visitor for a `RecordName`.
struct RecordNameVisitor;

impl Visitor<'_> for RecordNameVisitor {
    type Value = RecordName;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a non-empty string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        RecordName::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        RecordName::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for RecordName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(RecordNameVisitor)
    }
}

/// Price of a record.  Prices are finite numbers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    /// Creates a new price from an untrusted number, making sure it is valid.
    pub fn new(value: f64) -> ModelResult<Self> {
        if !value.is_finite() {
            return Err(ModelError(format!("price: {} is not a finite number", value)));
        }
        Ok(Self(value))
    }

    /// Creates a new price from the textual representation of a number.
    pub fn parse(s: &str) -> ModelResult<Self> {
        match s.trim().parse::<f64>() {
            Ok(value) => Price::new(value),
            Err(_) => Err(ModelError(format!("price: cannot convert \"{}\" to a number", s))),
        }
    }

    /// Returns the price as a floating point number.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A deserialization visitor for a `Price`.
///
/// Accepts both numbers and strings holding numbers, as clients commonly send form values as-is.
struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or a string holding a number")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Price::new(v as f64).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Price::new(v as f64).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Price::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Price::parse(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(PriceVisitor)
    }
}

/// Contents of a record as provided by a client on creation.
#[derive(Constructor, Debug, Deserialize, PartialEq, Serialize)]
pub struct RecordFields {
    /// The record's name.
    pub name: RecordName,

    /// The record's price.
    pub price: Price,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Labels attached to the record.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

/// A partial update to a record.  Fields that are `None` are left untouched.
#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RecordPatch {
    /// New name for the record.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<RecordName>,

    /// New price for the record.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    /// New description for the record.  `Some(None)` clears the description.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    /// New set of tags for the record, replacing the previous ones.
    #[serde(
        default,
        deserialize_with = "present_or_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
}

/// Deserializes a list that, when present, treats an explicit null as the empty list.
fn present_or_empty<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    null_as_empty(deserializer).map(Some)
}

/// A stored record.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier of the record.
    id: Id,

    /// The record's name.
    name: RecordName,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// The record's price.
    price: Price,

    /// Labels attached to the record.
    #[serde(default)]
    tags: Vec<String>,

    /// Time when the record was created.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Record {
    /// Creates a new record with identifier `id` and creation time `created_at` from the fields
    /// provided by a client.
    pub fn from_fields(id: Id, fields: RecordFields, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            tags: fields.tags,
            created_at,
        }
    }

    /// Overwrites the fields present in `patch`, leaving the others untouched.
    ///
    /// The identifier and the creation time are immutable.
    pub fn apply(mut self, patch: RecordPatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self
    }

    /// Returns the list projection of this record.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            created_at: self.created_at,
        }
    }
}

/// The projection of a record returned when listing records.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    /// Unique identifier of the record.
    pub id: Id,

    /// The record's name.
    pub name: RecordName,

    /// The record's price.
    pub price: Price,

    /// Time when the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
