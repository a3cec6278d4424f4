use chrono::{Datelike, NaiveDateTime, Timelike};

/// Default format for `frontend/date`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Default format for `frontend/time`.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Wall-clock source for locally computed values.
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock frozen at a fixed instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Format the date tokens `%Y %m %d %B %b %A %a`; other tokens stay verbatim.
pub fn format_date(at: NaiveDateTime, fmt: &str) -> String {
    substitute(fmt, |token| match token {
        'Y' => Some(at.year().to_string()),
        'm' => Some(format!("{:02}", at.month())),
        'd' => Some(format!("{:02}", at.day())),
        'B' => Some(at.format("%B").to_string()),
        'b' => Some(at.format("%b").to_string()),
        'A' => Some(at.format("%A").to_string()),
        'a' => Some(at.format("%a").to_string()),
        _ => None,
    })
}

/// Format the time tokens `%H %I %M %S %p`; other tokens stay verbatim.
pub fn format_time(at: NaiveDateTime, fmt: &str) -> String {
    substitute(fmt, |token| match token {
        'H' => Some(format!("{:02}", at.hour())),
        'I' => {
            let h = at.hour() % 12;
            Some(format!("{:02}", if h == 0 { 12 } else { h }))
        }
        'M' => Some(format!("{:02}", at.minute())),
        'S' => Some(format!("{:02}", at.second())),
        'p' => Some(if at.hour() < 12 { "AM" } else { "PM" }.to_owned()),
        _ => None,
    })
}

fn substitute(fmt: &str, mut lookup: impl FnMut(char) -> Option<String>) -> String {
    let mut out = String::with_capacity(fmt.len() + 8);
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(token) => match lookup(token) {
                Some(s) => {
                    chars.next();
                    out.push_str(&s);
                }
                None => out.push('%'),
            },
            None => out.push('%'),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/theme/clock.rs"]
mod tests;
