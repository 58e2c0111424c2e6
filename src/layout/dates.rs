use chrono::{Datelike, Locale, NaiveDate, NaiveTime};

/// The chrono locale for a language and region, trying the language's home region when the
/// pair is unknown (`de` becomes `de_DE`).
fn chrono_locale(lang: &str, region: &str) -> Option<Locale> {
    let with_region =
        |r: &str| Locale::try_from(format!("{lang}_{}", r.to_ascii_uppercase()).as_str()).ok();
    if region.is_empty() {
        with_region(lang)
    } else {
        with_region(region).or_else(|| with_region(lang))
    }
}

fn month_name(date: NaiveDate, locale: Locale) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized("%B", locale)
        .to_string()
}

/// Long-form date for the title slide caption.
///
/// `locale` is a language tag such as `en-US`, `de` or `pt_BR`; unknown tags use US English.
pub fn format_long_date(date: NaiveDate, locale: Option<&str>) -> String {
    let tag = locale.unwrap_or("en-US").trim().replace('_', "-").to_ascii_lowercase();
    let (lang, region) = tag.split_once('-').unwrap_or((tag.as_str(), ""));
    let (d, y) = (date.day(), date.year());

    match lang {
        "ja" | "zh" => return format!("{y}年{}月{d}日", date.month()),
        "ko" => return format!("{y}년 {}월 {d}일", date.month()),
        _ => {}
    }

    let Some(loc) = chrono_locale(lang, region).filter(|_| lang != "en") else {
        let month = month_name(date, Locale::en_US);
        return match (lang, region) {
            ("en", r) if r != "us" && !r.is_empty() => format!("{d} {month} {y}"),
            _ => format!("{month} {d}, {y}"),
        };
    };
    let month = month_name(date, loc);
    match lang {
        "de" => format!("{d}. {month} {y}"),
        "es" | "pt" => format!("{d} de {month} de {y}"),
        _ => format!("{d} {month} {y}"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/dates.rs"]
mod tests;
