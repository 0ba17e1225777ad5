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

use jiff::tz::TimeZone;

use crate::Error;
use crate::Severity;
use crate::layout::Layout;
use crate::record::Record;

/// A layout that formats log record as text.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172105+08:00 FATAL billing: ledger corrupted cause=checksum mismatch
/// 2024-08-11T22:44:57.172105+08:00 ERROR billing: charge rejected
/// 2024-08-11T22:44:57.172219+08:00  WARN billing: retrying charge
/// 2024-08-11T22:44:57.172276+08:00  INFO billing: charge accepted
/// 2024-08-11T22:44:57.172329+08:00 DEBUG billing: charge payload built
/// ```
///
/// With the `colored` feature enabled, severities are colored unless [`TextLayout::no_color`] is
/// set.
///
/// You can customize the timezone of the timestamp with [`TextLayout::timezone`]. Otherwise, the
/// system timezone is used.
///
/// # Examples
///
/// ```
/// use logfacade::layout::TextLayout;
///
/// let text_layout = TextLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
pub struct TextLayout {
    tz: Option<TimeZone>,
    #[cfg_attr(not(feature = "colored"), allow(dead_code))]
    no_color: bool,
}

impl TextLayout {
    /// Sets the timezone for timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logfacade::layout::TextLayout;
    ///
    /// let text_layout = TextLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    /// Disables colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    fn severity(&self, severity: Severity) -> String {
        #[cfg(feature = "colored")]
        if !self.no_color {
            use colored::Color;
            use colored::Colorize;

            let color = match severity {
                Severity::Fatal => Color::BrightRed,
                Severity::Error => Color::Red,
                Severity::Warn => Color::Yellow,
                Severity::Info => Color::Green,
                Severity::Debug => Color::Blue,
            };
            return format!("{:>5}", severity.as_str()).color(color).to_string();
        }

        format!("{severity:>5}")
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let time = record
            .time()
            .to_zoned(tz)
            .strftime("%Y-%m-%dT%H:%M:%S.%6f%:z");
        let severity = self.severity(record.severity());
        let name = record.name();
        let message = record.message();

        let mut text = format!("{time} {severity} {name}: {message}");
        if let Some(cause) = record.cause() {
            text.push_str(&format!(" cause={cause:#}"));
        }

        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::Cause;

    fn render(record: &Record) -> String {
        let layout = TextLayout::default().timezone(TimeZone::UTC).no_color();
        let bytes = layout.format(record).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_text_layout_with_cause() {
        let time: Timestamp = "2024-08-11T14:44:57Z".parse().unwrap();
        let cause = Cause::from(std::io::Error::other("checksum mismatch"));
        let record = Record::builder()
            .time(time)
            .name("billing")
            .severity(Severity::Fatal)
            .message("ledger corrupted")
            .cause(Some(cause))
            .build();

        let line = render(&record);
        let (time, rest) = line.split_once(' ').unwrap();
        assert!(time.starts_with("2024-08-11T14:44:57"));
        assert!(time.ends_with("+00:00"));
        insta::assert_snapshot!(rest, @"FATAL billing: ledger corrupted cause=checksum mismatch");
    }

    #[test]
    fn test_text_layout_pads_severity() {
        let record = Record::builder()
            .name("billing")
            .severity(Severity::Warn)
            .message("retrying charge")
            .build();

        let line = render(&record);
        assert!(line.contains("  WARN billing: retrying charge"), "{line}");
        assert!(!line.contains("cause="));
    }
}
