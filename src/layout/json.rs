// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use jiff::Zoned;
use jiff::tz::TimeZone;
use serde::Serialize;

use crate::Error;
use crate::layout::Layout;
use crate::record::Record;

/// A JSON layout for formatting log records.
///
/// Output format:
///
/// ```json
/// {"timestamp":"2024-08-11T22:44:57.172051+08:00","severity":"ERROR","logger":"billing","message":"charge rejected","cause":"card expired"}
/// {"timestamp":"2024-08-11T22:44:57.172187+08:00","severity":"WARN","logger":"billing","message":"retrying charge"}
/// ```
///
/// # Examples
///
/// ```
/// use logfacade::layout::JsonLayout;
///
/// let json_layout = JsonLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
pub struct JsonLayout {
    tz: Option<TimeZone>,
}

impl JsonLayout {
    /// Sets the timezone for timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logfacade::layout::JsonLayout;
    ///
    /// let json_layout = JsonLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
struct RecordLine<'a> {
    #[serde(serialize_with = "serialize_time_zone")]
    timestamp: Zoned,
    severity: &'a str,
    logger: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<String>,
}

fn serialize_time_zone<S>(timestamp: &Zoned, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&timestamp.strftime("%Y-%m-%dT%H:%M:%S.%6f%:z"))
}

impl Layout for JsonLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let record_line = RecordLine {
            timestamp: record.time().to_zoned(tz),
            severity: record.severity().as_str(),
            logger: record.name(),
            message: record.message(),
            cause: record.cause().map(|cause| format!("{cause:#}")),
        };

        serde_json::to_vec(&record_line)
            .map_err(|err| Error::new("failed to serialize record").with_source(err))
    }
}
