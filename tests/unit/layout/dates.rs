use super::*;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

#[test]
fn us_english_is_the_default() {
    assert_eq!(format_long_date(day(), None), "October 16, 2026");
    assert_eq!(format_long_date(day(), Some("en-US")), "October 16, 2026");
    assert_eq!(format_long_date(day(), Some("xx")), "October 16, 2026");
}

#[test]
fn other_english_regions_put_the_day_first() {
    assert_eq!(format_long_date(day(), Some("en-GB")), "16 October 2026");
    assert_eq!(format_long_date(day(), Some("en")), "October 16, 2026");
}

#[test]
fn european_and_asian_patterns() {
    assert_eq!(format_long_date(day(), Some("de-DE")), "16. Oktober 2026");
    assert_eq!(format_long_date(day(), Some("fr")), "16 octobre 2026");
    assert_eq!(format_long_date(day(), Some("es")), "16 de octubre de 2026");
    assert_eq!(format_long_date(day(), Some("pt_BR")), "16 de outubro de 2026");
    assert_eq!(format_long_date(day(), Some("ja-JP")), "2026年10月16日");
}

#[test]
fn languages_without_a_pattern_use_day_month_year() {
    assert_eq!(format_long_date(day(), Some("nl")), "16 oktober 2026");
    assert_eq!(format_long_date(day(), Some("sv-SE")), "16 oktober 2026");
    assert_eq!(format_long_date(day(), Some("it")), "16 ottobre 2026");
    assert_eq!(format_long_date(day(), Some("de-XX")), "16. Oktober 2026");
}
