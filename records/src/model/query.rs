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

//! Parameters to select a window of entities out of a collection.

/// Order in which listed entities are returned.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOrder {
    /// Whatever order the database returns rows in.
    #[default]
    Natural,

    /// Newest entities first.
    Recent,

    /// Oldest entities first.
    Oldest,
}

impl SortOrder {
    /// Maps the textual `option` a client provides to a sort order.  Unknown values select the
    /// natural order.
    pub fn from_option(option: Option<&str>) -> Self {
        match option {
            Some("recent") => SortOrder::Recent,
            Some("oldest") => SortOrder::Oldest,
            _ => SortOrder::Natural,
        }
    }
}

/// Filter, sort order and pagination window for a list operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListQuery {
    /// Text to look for, case-insensitively, in the searchable fields.  `None` matches everything.
    pub search: Option<String>,

    /// Order of the results.
    pub order: SortOrder,

    /// Number of matching entities to skip.
    pub offset: u64,

    /// Maximum number of entities to return.
    pub limit: u64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { search: None, order: SortOrder::Natural, offset: 0, limit: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_from_option() {
        assert_eq!(SortOrder::Recent, SortOrder::from_option(Some("recent")));
        assert_eq!(SortOrder::Oldest, SortOrder::from_option(Some("oldest")));
        assert_eq!(SortOrder::Natural, SortOrder::from_option(Some("Recent")));
        assert_eq!(SortOrder::Natural, SortOrder::from_option(Some("")));
        assert_eq!(SortOrder::Natural, SortOrder::from_option(None));
    }
}
