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

//! Translation of the query parameters accepted by list APIs.

use crate::model::{ListQuery, SortOrder};

/// Page returned when the client does not request a valid one.
const DEFAULT_PAGE: u64 = 1;

/// Page size used when the client does not request a valid one.
const DEFAULT_PAGE_SIZE: u64 = 10;

/// Raw query parameters of a list request.
///
/// All fields are kept as text because malformed values are not errors: they fall back to their
/// defaults during the conversion into a `ListQuery`.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ListParams {
    /// The 1-based page number.
    pub(crate) page: Option<String>,

    /// The number of entities per page.  Sent as `pageSize`.
    pub(crate) page_size: Option<String>,

    /// The sort order: `recent` or `oldest`.
    pub(crate) option: Option<String>,

    /// Text to look for in the searchable fields.
    pub(crate) search: Option<String>,
}

impl ListParams {
    /// Extracts the parameters out of the `raw` query string of a request.
    ///
    /// This never fails: an undecodable query yields no parameters, unknown keys are ignored, and
    /// only the first value of a repeated key is kept.
    pub(crate) fn from_query(raw: Option<&str>) -> Self {
        let pairs: Vec<(String, String)> =
            raw.and_then(|raw| serde_urlencoded::from_str(raw).ok()).unwrap_or_default();

        let mut params = ListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "pageSize" => &mut params.page_size,
                "option" => &mut params.option,
                "search" => &mut params.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Parses the leading integer in `raw` and returns it if it is strictly positive.
///
/// Leading whitespace and an optional sign are accepted, and anything after the leading digits is
/// ignored, so `" 2abc"` yields 2.
fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let s = raw?.trim_start();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let n = s[..end].parse::<u64>().ok()?;
    if negative || n == 0 { None } else { Some(n) }
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        let page = parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let page_size = parse_positive(params.page_size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE);
        ListQuery {
            search: params.search.filter(|s| !s.is_empty()),
            order: SortOrder::from_option(params.option.as_deref()),
            offset: (page - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}
